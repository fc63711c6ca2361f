//! Segui: from UI segmentation maps to layout documents.
//!
//! Segui covers both ends of a UI segmentation workflow: preparing
//! image/label pairs for training, and turning a predicted class-index map
//! into a positioned list of typed components.
//!
//! # Modules
//!
//! - [`ingest`]: Fault-tolerant image decoding with a fallback chain
//! - [`dataset`]: Image/label pairing and training sample loading
//! - [`label`]: Label space transforms, rasterization and bounds import
//! - [`extract`]: Connected-component extraction of typed regions
//! - [`layout`]: Layout documents, JSON and HTML output
//! - [`config`]: YAML class configuration
//! - [`report`]: Structured diagnostics
//! - [`error`]: Error types for segui operations

pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod label;
pub mod layout;
pub mod model;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::SeguiError;

use dataset::{IndexOptions, SampleLoader, SampleRecord};
use ingest::ColorMode;
use report::{Report, TracingReporter};

/// The segui CLI application.
#[derive(Parser)]
#[command(name = "segui")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Pair label maps with their images and report problems.
    Index(IndexArgs),
    /// Write transformed training label maps for a dataset split.
    Prepare(PrepareArgs),
    /// Extract components from a class-index map and write a layout.
    Layout(LayoutArgs),
    /// Paint a layout document back into a class-index map.
    Rasterize(RasterizeArgs),
    /// Paint a bounds annotation into a training label map.
    Mask(MaskArgs),
}

/// Arguments for the index subcommand.
#[derive(clap::Args)]
struct IndexArgs {
    /// Dataset root containing <split>/image and <split>/label.
    root: PathBuf,

    /// Split directory to index.
    #[arg(long, default_value = "train")]
    split: String,

    /// When indexing 'train', also include 'val' pairs.
    #[arg(long)]
    include_val: bool,

    /// Drop pairs whose image and label sizes differ.
    #[arg(long)]
    verify_dimensions: bool,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the prepare subcommand.
#[derive(clap::Args)]
struct PrepareArgs {
    /// Dataset root containing <split>/image and <split>/label.
    root: PathBuf,

    /// Class configuration (YAML).
    #[arg(long)]
    config: PathBuf,

    /// Output directory; label maps land in <out>/<split>/label/.
    #[arg(long)]
    out: PathBuf,

    /// Split directory to prepare.
    #[arg(long, default_value = "train")]
    split: String,

    /// Also include 'val' pairs (overrides the config's include_val).
    #[arg(long)]
    include_val: bool,

    /// Channel order for decoded images ('rgb', 'bgr' or 'gray').
    #[arg(long, default_value = "rgb")]
    image_mode: String,
}

/// Arguments for the layout subcommand.
#[derive(clap::Args)]
struct LayoutArgs {
    /// Predicted class-index map (8-bit greyscale or indexed PNG).
    prediction: PathBuf,

    /// Class configuration (YAML).
    #[arg(long)]
    config: PathBuf,

    /// Where to write the layout JSON (stdout if omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also render an HTML preview to this path.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Screenshot path or URL shown behind the components.
    #[arg(long)]
    background: Option<String>,

    /// Minimum component width in pixels (overrides the config).
    #[arg(long)]
    min_width: Option<u32>,

    /// Minimum component height in pixels (overrides the config).
    #[arg(long)]
    min_height: Option<u32>,
}

/// Arguments for the rasterize subcommand.
#[derive(clap::Args)]
struct RasterizeArgs {
    /// Layout JSON document.
    input: PathBuf,

    /// Output PNG path for the class-index map.
    #[arg(long)]
    out: PathBuf,
}

/// Arguments for the mask subcommand.
#[derive(clap::Args)]
struct MaskArgs {
    /// Bounds annotation JSON ({"bounds": [{"class", "bounds"}]}).
    input: PathBuf,

    /// Screenshot the annotation belongs to; sets the mask size.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path for the label map.
    #[arg(long)]
    out: PathBuf,
}

/// Run the segui CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SeguiError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Index(args)) => run_index(args),
        Some(Commands::Prepare(args)) => run_prepare(args),
        Some(Commands::Layout(args)) => run_layout(args),
        Some(Commands::Rasterize(args)) => run_rasterize(args),
        Some(Commands::Mask(args)) => run_mask(args),
        None => {
            println!("segui {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("From UI segmentation maps to layout documents.");
            println!();
            println!("Run 'segui --help' for usage information.");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct IndexOutput<'a> {
    split: &'a str,
    sample_count: usize,
    error_count: usize,
    warning_count: usize,
    samples: &'a [SampleRecord],
    issues: &'a [report::Issue],
}

/// Execute the index subcommand.
fn run_index(args: IndexArgs) -> Result<(), SeguiError> {
    let options = IndexOptions {
        include_val: args.include_val,
        verify_dimensions: args.verify_dimensions,
    };
    let mut report = Report::new();
    let records = dataset::index(&args.root, &args.split, &options, &mut report);

    match args.output.as_str() {
        "json" => {
            let output = IndexOutput {
                split: &args.split,
                sample_count: records.len(),
                error_count: report.error_count(),
                warning_count: report.warning_count(),
                samples: &records,
                issues: &report.issues,
            };
            let json = serde_json::to_string_pretty(&output).map_err(|source| {
                SeguiError::LayoutJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        "text" => {
            println!(
                "Indexed {} sample(s) in '{}' under {}",
                records.len(),
                args.split,
                args.root.display()
            );
            print!("{}", report);
        }
        other => {
            return Err(SeguiError::UnsupportedFormat(format!(
                "output '{}' (supported: text, json)",
                other
            )));
        }
    }

    if report.is_ok() && (!args.strict || report.is_ok_strict()) {
        Ok(())
    } else {
        Err(SeguiError::IndexFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    }
}

/// Execute the prepare subcommand.
fn run_prepare(args: PrepareArgs) -> Result<(), SeguiError> {
    let config = config::read_config(&args.config)?;
    let image_mode: ColorMode = args.image_mode.parse()?;
    if image_mode == ColorMode::Palette {
        return Err(SeguiError::UnsupportedFormat(
            "image mode 'palette' is reserved for label maps".to_string(),
        ));
    }

    let options = IndexOptions {
        include_val: args.include_val || config.include_val,
        verify_dimensions: false,
    };
    let mut report = Report::new();
    let records = dataset::index(&args.root, &args.split, &options, &mut report);
    if !report.is_ok() {
        print!("{}", report);
        return Err(SeguiError::IndexFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        });
    }

    let loader = SampleLoader::new(image_mode, config.label_transform());
    for record in &records {
        let sample = loader.load(record, &mut TracingReporter)?;
        let out_dir = args.out.join(&record.split).join("label");
        fs::create_dir_all(&out_dir)?;
        let out_path = out_dir.join(label_file_name(&record.label_path));
        save_gray(sample.label.as_gray(), &out_path)?;
    }

    println!(
        "Prepared {} sample(s) from '{}' into {}",
        records.len(),
        args.split,
        args.out.display()
    );
    print!("{}", report);
    Ok(())
}

/// Execute the layout subcommand.
fn run_layout(args: LayoutArgs) -> Result<(), SeguiError> {
    let config = config::read_config(&args.config)?;
    let mut options = config.extract;
    if let Some(min_width) = args.min_width {
        options.min_width = min_width;
    }
    if let Some(min_height) = args.min_height {
        options.min_height = min_height;
    }

    let labels = ingest::load_path(&args.prediction, ColorMode::Palette, &mut TracingReporter)?
        .into_label_map()?;
    let components = extract::extract_with_options(&labels, &config.class_names, &options)?;
    let canvas = layout::CanvasSize::new(labels.width(), labels.height());
    let document = layout::build(components, canvas, args.background)?;

    match &args.out {
        Some(path) => {
            layout::write_layout_json(path, &document)?;
            println!(
                "Wrote {} component(s) to {}",
                document.components.len(),
                path.display()
            );
        }
        None => {
            let json = layout::to_json_string(&document).map_err(|source| {
                SeguiError::LayoutJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
    }

    if let Some(path) = &args.html {
        layout::write_html(path, &document)?;
    }
    Ok(())
}

/// Execute the rasterize subcommand.
fn run_rasterize(args: RasterizeArgs) -> Result<(), SeguiError> {
    let document = layout::read_layout_json(&args.input)?;
    let labels = label::rasterize(
        document.canvas_width,
        document.canvas_height,
        &document.components,
    )?;
    save_gray(labels.as_gray(), &args.out)?;
    println!(
        "Rasterized {} component(s) into {}",
        document.components.len(),
        args.out.display()
    );
    Ok(())
}

/// Execute the mask subcommand.
fn run_mask(args: MaskArgs) -> Result<(), SeguiError> {
    let screenshot = ingest::load_path(&args.image, ColorMode::Rgb, &mut TracingReporter)?;
    let annotation = label::read_bounds_json(&args.input)?;
    let labels = label::rasterize(
        screenshot.width(),
        screenshot.height(),
        &annotation.components,
    )?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    save_gray(labels.as_gray(), &args.out)?;

    println!(
        "Painted {} box(es) into {}",
        annotation.components.len(),
        args.out.display()
    );
    println!("class_names: [{}]", annotation.class_names.join(", "));
    Ok(())
}

/// Label maps are always written as PNG, whatever the source extension.
fn label_file_name(label_path: &Path) -> PathBuf {
    let stem = label_path.file_stem().unwrap_or_default();
    PathBuf::from(dataset::with_extension(stem, "png"))
}

fn save_gray(image: &image::GrayImage, path: &Path) -> Result<(), SeguiError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SeguiError::ImageWrite {
            path: path.to_path_buf(),
            source,
        })
}
