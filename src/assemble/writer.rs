//! Low-level PDF serialization.
//!
//! Takes the per-page content streams and rasterized math images produced by
//! the assembler and writes the final document: fonts, image XObjects,
//! Flate-compressed content streams, page tree, and metadata.

use std::io::{BufReader, Cursor};

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use super::fonts::Face;
use super::PageGeometry;
use crate::error::{Error, Result};
use crate::options::DocumentOptions;

/// A math raster scheduled for embedding, keyed by its content-stream name.
pub struct PendingImage {
    /// XObject resource name referenced from the content stream (e.g. `Im1`)
    pub name: String,
    /// PNG-encoded raster
    pub png: Vec<u8>,
}

/// Serialize finished pages into PDF bytes.
///
/// This is the terminal, fatal step: any failure here is an
/// [`Error::Assembly`] and the caller receives no partial output.
pub fn serialize(
    contents: Vec<Content>,
    images: Vec<PendingImage>,
    geometry: &PageGeometry,
    options: &DocumentOptions,
) -> Result<Vec<u8>> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Base-14 faces: nothing embedded, WinAnsi predefined encoding.
    let mut font_refs = Vec::new();
    for face in [Face::Regular, Face::Bold] {
        let font_ref = alloc();
        pdf.type1_font(font_ref)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        font_refs.push((face, font_ref));
    }

    let mut image_refs: Vec<(String, Ref)> = Vec::new();
    for pending in &images {
        let image_ref = embed_png(&mut pdf, &mut alloc, &pending.png)?;
        image_refs.push((pending.name.clone(), image_ref));
    }

    let page_count = contents.len();
    let page_ids: Vec<Ref> = (0..page_count).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..page_count).map(|_| alloc()).collect();

    for (i, content) in contents.into_iter().enumerate() {
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_count as i32);

    for i in 0..page_count {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (face, font_ref) in &font_refs {
                fonts.pair(Name(face.resource_name()), *font_ref);
            }
        }
        if !image_refs.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, image_ref) in &image_refs {
                xobjects.pair(Name(name.as_bytes()), *image_ref);
            }
        }
        resources.finish();
        page.finish();
    }

    write_metadata(&mut pdf, info_id, options);

    Ok(pdf.finish())
}

/// Decode a PNG and embed it as an RGB image XObject, with a soft mask when
/// the raster carries meaningful alpha.
fn embed_png(pdf: &mut Pdf, alloc: &mut dyn FnMut() -> Ref, png: &[u8]) -> Result<Ref> {
    let reader = image::ImageReader::with_format(
        BufReader::new(Cursor::new(png)),
        image::ImageFormat::Png,
    );
    let decoded = reader
        .decode()
        .map_err(|e| Error::Assembly(format!("math image decode failed: {e}")))?;
    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(width as i32);
        mask.height(height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let image_ref = alloc();
    let mut xobj = pdf.image_xobject(image_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(width as i32);
    xobj.height(height as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }

    Ok(image_ref)
}

/// Write the document information dictionary from the options.
fn write_metadata(pdf: &mut Pdf, info_id: Ref, options: &DocumentOptions) {
    use chrono::{Datelike, Timelike};

    let now = chrono::Utc::now();
    let date = pdf_writer::Date::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8);

    let mut info = pdf.document_info(info_id);
    info.title(TextStr(&options.title));
    info.author(TextStr(&options.author));
    info.subject(TextStr(&options.subject));
    info.keywords(TextStr(&options.keywords));
    info.producer(TextStr(concat!("mathpress ", env!("CARGO_PKG_VERSION"))));
    info.creation_date(date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::PageGeometry;

    #[test]
    fn test_serialize_empty_page_is_valid_pdf() {
        let geometry = PageGeometry::a4(20.0);
        let contents = vec![Content::new()];
        let bytes =
            serialize(contents, Vec::new(), &geometry, &DocumentOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.ends_with(b"%%EOF") || bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_serialize_rejects_broken_image() {
        let geometry = PageGeometry::a4(20.0);
        let images = vec![PendingImage {
            name: "Im1".to_string(),
            png: b"not a png".to_vec(),
        }];
        let result = serialize(vec![Content::new()], images, &geometry, &DocumentOptions::default());
        assert!(matches!(result, Err(Error::Assembly(_))));
    }
}
