//! mathpress CLI - math-aware PDF generation tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mathpress::{DocumentOptions, Pipeline, RemoteClient, TypesetRenderer};

#[derive(Parser)]
#[command(name = "mathpress")]
#[command(version)]
#[command(about = "Generate paginated PDF documents from text with LaTeX math", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a PDF from a text file
    Pdf {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file (defaults to the input name with .pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title (also the page-1 header)
        #[arg(long)]
        title: Option<String>,

        /// Body font size in points
        #[arg(long, default_value = "12")]
        font_size: f32,

        /// Page margin in points
        #[arg(long, default_value = "20")]
        margin: f32,

        /// Remote LaTeX compilation service URL, tried first for full
        /// LaTeX documents
        #[arg(long, env = "MATHPRESS_SERVICE_URL")]
        service: Option<String>,
    },

    /// Show how a document splits into text and math segments
    Segment {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Emit segments as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Recognize handwriting in an image via the OCR service
    Ocr {
        /// Input image file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// OCR service URL
        #[arg(long, env = "MATHPRESS_SERVICE_URL")]
        service: String,

        /// Print the raw recognition instead of the beautified text
        #[arg(long)]
        raw: bool,
    },

    /// Compile a full LaTeX document through the remote service
    Compile {
        /// Input LaTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file (defaults to the input name with .pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compilation service URL
        #[arg(long, env = "MATHPRESS_SERVICE_URL")]
        service: String,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Pdf {
            input,
            output,
            title,
            font_size,
            margin,
            service,
        }) => cmd_pdf(
            &input,
            output.as_deref(),
            title,
            font_size,
            margin,
            service.as_deref(),
        ),
        Some(Commands::Segment { input, json }) => cmd_segment(&input, json),
        Some(Commands::Ocr {
            input,
            service,
            raw,
        }) => cmd_ocr(&input, &service, raw),
        Some(Commands::Compile {
            input,
            output,
            service,
        }) => cmd_compile(&input, output.as_deref(), &service),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: generate a PDF if input is provided
            if let Some(input) = cli.input {
                cmd_pdf(&input, cli.output.as_deref(), None, 12.0, 20.0, None)
            } else {
                println!("{}", "Usage: mathpress <FILE> [OUTPUT]".yellow());
                println!("       mathpress --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_pdf_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

fn cmd_pdf(
    input: &Path,
    output: Option<&Path>,
    title: Option<String>,
    font_size: f32,
    margin: f32,
    service: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = fs::read_to_string(input)?;
    let output_path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_pdf_path(input));

    let mut options = DocumentOptions::new()
        .with_font_size(font_size)
        .with_margin(margin);
    if let Some(title) = title {
        options = options.with_title(title);
    }

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Segmenting...");
    let mut pipeline = Pipeline::new(Box::new(TypesetRenderer::new())).with_options(options);
    if let Some(url) = service {
        pipeline = pipeline.with_remote(RemoteClient::new(url)?);
    }
    let segments = pipeline.segment(&document);
    pb.inc(1);

    pb.set_message("Rendering math and flowing pages...");
    let pdf = pipeline.produce(&document)?;
    pb.inc(1);

    pb.set_message("Writing output...");
    fs::write(&output_path, &pdf)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    let math_count = segments.iter().filter(|s| s.kind.is_math()).count();
    println!(
        "\n{} {} ({} segments, {} math)",
        "Saved".green().bold(),
        output_path.display(),
        segments.len(),
        math_count
    );

    Ok(())
}

fn cmd_segment(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let document = fs::read_to_string(input)?;
    let segments = mathpress::segment_text(&document);

    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    println!("{}", "Segments".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, segment) in segments.iter().enumerate() {
        let kind = format!("{:?}", segment.kind);
        println!("{:>3} {:<12} {}", i + 1, kind.bold(), segment.content);
    }
    println!(
        "\n{}: {} total, {} math",
        "Summary".bold(),
        segments.len(),
        segments.iter().filter(|s| s.kind.is_math()).count()
    );

    Ok(())
}

fn cmd_ocr(input: &Path, service: &str, raw: bool) -> Result<(), Box<dyn std::error::Error>> {
    let image = fs::read(input)?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or("input path has no file name")?;

    println!("{}", "Submitting image for recognition...".cyan());
    let client = RemoteClient::new(service)?;
    let result = client.convert_image(image, &file_name)?;

    if let Some(ref warning) = result.error {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }

    if raw {
        println!("{}", result.raw_text);
    } else {
        println!("{}", result.best_text());
    }

    Ok(())
}

fn cmd_compile(
    input: &Path,
    output: Option<&Path>,
    service: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = fs::read_to_string(input)?;
    let output_path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_pdf_path(input));

    if !mathpress::looks_like_latex_document(&document) {
        eprintln!(
            "{}: input has no LaTeX markers, sending anyway",
            "Warning".yellow().bold()
        );
    }

    println!("{}", "Compiling remotely...".cyan());
    let client = RemoteClient::new(service)?;
    let pdf = client.compile_latex(&document)?;
    fs::write(&output_path, &pdf)?;

    println!(
        "{} {} ({} bytes)",
        "Saved".green().bold(),
        output_path.display(),
        pdf.len()
    );

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "mathpress".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Math-aware PDF generation tool");
    println!("License: MIT");
}
