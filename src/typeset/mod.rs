//! Math typesetting and rasterization.
//!
//! Renders one math segment's source string to a PNG raster. The production
//! implementation drives MicroTeX for layout and resvg for rasterization;
//! the `MathRenderer` trait is the seam that lets the assembler (and tests)
//! swap in other engines.

use crate::error::Result;

/// Inline vs. display rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Math flowing within a line of prose
    Inline,
    /// Math rendered on its own block, typically larger
    Display,
}

/// A rasterized math segment.
///
/// Transient: created on demand during one document's assembly and dropped
/// when the document is finished. Never cached across documents.
#[derive(Debug, Clone)]
pub struct RenderedMath {
    /// The typesetting source this raster was produced from
    pub source: String,
    /// Natural raster width in pixels (positive)
    pub width_px: u32,
    /// Natural raster height in pixels (positive)
    pub height_px: u32,
    /// PNG-encoded pixel buffer
    pub png: Vec<u8>,
}

impl RenderedMath {
    /// Width/height ratio of the raster.
    pub fn aspect_ratio(&self) -> f32 {
        self.width_px as f32 / self.height_px as f32
    }
}

/// Renders math source strings into raster images.
///
/// Implementations must be infallible to *construct*; rendering itself may
/// fail with [`Error::Render`], which callers recover from by substituting a
/// textual fallback.
pub trait MathRenderer {
    /// Render one math source string in the given mode.
    fn render(&self, source: &str, mode: MathMode) -> Result<RenderedMath>;
}

/// Supersampling factor applied during rasterization for output quality.
pub const SUPERSAMPLE: f32 = 2.0;

#[cfg(feature = "typeset")]
pub use engine::TypesetRenderer;

#[cfg(feature = "typeset")]
mod engine {
    use super::{MathMode, MathRenderer, RenderedMath, SUPERSAMPLE};
    use crate::error::{Error, Result};
    use std::sync::OnceLock;

    /// Rendering resolution handed to MicroTeX.
    const ENGINE_DPI: i32 = 220;
    /// Maximum layout width, bounding how wide expressions wrap.
    const ENGINE_LINE_WIDTH: f32 = 20.0;

    /// Global MicroTeX engine. The engine crashes if initialized twice, so it
    /// lives for the process and renders are strictly sequential.
    static ENGINE: OnceLock<microtex_rs::MicroTex> = OnceLock::new();

    fn engine() -> Result<&'static microtex_rs::MicroTex> {
        if let Some(engine) = ENGINE.get() {
            return Ok(engine);
        }
        match microtex_rs::MicroTex::new() {
            Ok(engine) => {
                let _ = ENGINE.set(engine);
                Ok(ENGINE.get().unwrap())
            }
            Err(e) => Err(Error::Render(format!(
                "failed to initialize typesetting engine: {e:?}"
            ))),
        }
    }

    /// MicroTeX + resvg based [`MathRenderer`].
    ///
    /// Layout runs in non-throwing mode: malformed input degrades to a
    /// best-effort visual where the engine can manage it, and only outright
    /// engine rejection surfaces as [`Error::Render`].
    pub struct TypesetRenderer {
        config: microtex_rs::RenderConfig,
    }

    impl TypesetRenderer {
        /// Create a renderer with the fixed document rendering profile.
        pub fn new() -> Self {
            Self {
                config: microtex_rs::RenderConfig {
                    dpi: ENGINE_DPI,
                    line_width: ENGINE_LINE_WIDTH,
                    line_height: ENGINE_LINE_WIDTH / 3.0,
                    text_color: 0xff000000,
                    has_background: false,
                    render_glyph_use_path: true,
                    ..Default::default()
                },
            }
        }

        /// Wrap bare math source in the delimiters MicroTeX expects.
        fn delimit(source: &str, mode: MathMode) -> String {
            match mode {
                MathMode::Display => format!("\\[{source}\\]"),
                MathMode::Inline => format!("${{{source}}}$"),
            }
        }

        fn rasterize(svg: &str) -> Result<(u32, u32, Vec<u8>)> {
            let tree = resvg::usvg::Tree::from_str(svg, &resvg::usvg::Options::default())
                .map_err(|e| Error::Render(format!("SVG parse failed: {e}")))?;

            let size = tree.size();
            let width = (size.width() * SUPERSAMPLE).ceil() as u32;
            let height = (size.height() * SUPERSAMPLE).ceil() as u32;
            if width == 0 || height == 0 {
                return Err(Error::Render("rendered math has zero size".to_string()));
            }

            let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
                .ok_or_else(|| Error::Render("could not allocate pixel buffer".to_string()))?;
            // White page background; MicroTeX SVG is transparent by default.
            pixmap.fill(resvg::tiny_skia::Color::WHITE);

            let transform = resvg::tiny_skia::Transform::from_scale(SUPERSAMPLE, SUPERSAMPLE);
            resvg::render(&tree, transform, &mut pixmap.as_mut());

            let png = pixmap
                .encode_png()
                .map_err(|e| Error::Render(format!("PNG encoding failed: {e}")))?;
            Ok((width, height, png))
        }
    }

    impl Default for TypesetRenderer {
        fn default() -> Self {
            Self::new()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_delimit_modes() {
            assert_eq!(
                TypesetRenderer::delimit("x^2", MathMode::Display),
                "\\[x^2\\]"
            );
            assert_eq!(TypesetRenderer::delimit("x^2", MathMode::Inline), "${x^2}$");
        }
    }

    impl MathRenderer for TypesetRenderer {
        fn render(&self, source: &str, mode: MathMode) -> Result<RenderedMath> {
            let trimmed = source.trim();
            if trimmed.is_empty() {
                return Err(Error::Render("math source is empty".to_string()));
            }

            let delimited = Self::delimit(trimmed, mode);
            let svg = engine()?
                .render(&delimited, &self.config)
                .map_err(|e| Error::Render(format!("typesetting failed: {e:?}")))?;

            let (width_px, height_px, png) = Self::rasterize(&svg)?;
            log::debug!(
                "rendered {:?} math ({} chars) to {}x{} px",
                mode,
                trimmed.len(),
                width_px,
                height_px
            );

            Ok(RenderedMath {
                source: trimmed.to_string(),
                width_px,
                height_px,
                png,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let math = RenderedMath {
            source: "x".to_string(),
            width_px: 200,
            height_px: 50,
            png: Vec::new(),
        };
        assert_eq!(math.aspect_ratio(), 4.0);
    }
}
