//! photofilter CLI - apply a photo filter to an image file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photofilter::io::save_image;
use photofilter::{Filter, FilterConfig, Session, SessionConfig};

/// Apply one of eight photo filters to an image.
#[derive(Parser, Debug)]
#[command(name = "photofilter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter an image and save the result.
    Apply(ApplyArgs),
    /// List the available filters.
    List,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Input image path (jpg, jpeg, png, bmp, tif, tiff).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path. Format follows the extension, `.jpg` if none.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Filter name or label (see `photofilter list`).
    #[arg(short, long, default_value = "normal", value_name = "NAME")]
    filter: Filter,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Also write a downscaled preview to this path.
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Preview bounds as WIDTHxHEIGHT.
    #[arg(long, default_value = "780x580", value_name = "WxH", value_parser = parse_size)]
    preview_size: (u32, u32),

    /// Gaussian kernel size for the blur filter (odd).
    #[arg(long, default_value = "15", value_name = "INT")]
    blur_size: usize,

    /// Canny low threshold for the edge filter.
    #[arg(long, default_value = "100", value_name = "FLOAT")]
    canny_low: f32,

    /// Canny high threshold for the edge filter.
    #[arg(long, default_value = "200", value_name = "FLOAT")]
    canny_high: f32,

    /// Sharpen strength, 1.0 = classic 3x3 kernel.
    #[arg(long, default_value = "1.0", value_name = "FLOAT")]
    sharpen_amount: f32,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("preview size must be non-zero".to_string());
    }
    Ok((w, h))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("photofilter={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match &cli.command {
        Command::Apply(args) => run_apply(args),
        Command::List => {
            list_filters();
            Ok(())
        }
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn list_filters() {
    for filter in Filter::ALL {
        println!("{:<10} {}", filter.name(), filter.label());
    }
}

fn run_apply(args: &ApplyArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let config = SessionConfig {
        filters: FilterConfig {
            blur_ksize: args.blur_size,
            canny_low: args.canny_low,
            canny_high: args.canny_high,
            sharpen_amount: args.sharpen_amount,
            ..FilterConfig::default()
        },
        jpeg_quality: args.quality,
        preview_max: args.preview_size,
    };
    let mut session = Session::new(config);

    session
        .open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    session.apply(args.filter);

    let written = session
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    if let Some(preview_path) = &args.preview {
        let preview = session
            .preview()
            .context("Failed to build preview")?
            .context("No image loaded")?;
        save_image(preview.view(), preview_path, args.quality)
            .with_context(|| format!("Failed to save preview {}", preview_path.display()))?;
    }

    println!(
        "Applied {} to {} -> {}",
        args.filter,
        args.input.display(),
        written.display()
    );

    Ok(())
}
