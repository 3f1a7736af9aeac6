use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use slottie::{
    AnimationSource, CropRect, ExtractionConfig, FrameExtractor, PixelFormat, RlottieEngine,
    SlottieError,
};

#[cfg(feature = "gif")]
use slottie::{ExtractOptions, GifOptions};

const CLI_AFTER_HELP: &str = "Examples:\n  slottie info loader.json --json\n  slottie extract loader.json --out frames --scale 2 --progress\n  slottie extract loader.json --out frames --crop 0,0,128,128 --start 10 --end 20\n  slottie completions zsh > _slottie";

#[derive(Debug, Parser)]
#[command(
    name = "slottie",
    version,
    about = "Render Lottie animations into timed frame sequences",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// Draw a progress bar while rendering.
    #[arg(long)]
    progress: bool,

    /// Replace existing output files.
    #[arg(long)]
    overwrite: bool,

    /// Directory that image assets referenced by the animation live in.
    #[arg(long)]
    resources: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
struct RenderArgs {
    /// Output width before scaling (defaults to the animation's width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height before scaling (defaults to the animation's height).
    #[arg(long)]
    height: Option<u32>,

    /// Pixel density multiplier; 0 uses the default display scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Crop rectangle in canvas pixels: x,y,width,height.
    #[arg(long)]
    crop: Option<String>,

    /// Pixel format (rgba8, rgba8-premultiplied, rgb8).
    #[arg(long)]
    pixel_format: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print animation metadata.
    #[command(
        about = "Print animation metadata",
        visible_alias = "inspect",
        after_help = "Examples:\n  slottie info loader.json\n  slottie info loader.json --json"
    )]
    Info {
        /// Input animation path.
        input: PathBuf,

        /// Print metadata as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render frames to an output directory.
    #[command(
        about = "Render animation frames",
        after_help = "Examples:\n  slottie extract loader.json --out frames --ext png\n  slottie extract loader.json --out frames --width 64 --height 64 --scale 3"
    )]
    Extract {
        /// Input animation path.
        input: PathBuf,
        /// Output directory for frame images.
        #[arg(long)]
        out: PathBuf,
        /// First frame to render (inclusive).
        #[arg(long)]
        start: Option<usize>,
        /// Last frame to render (inclusive).
        #[arg(long)]
        end: Option<usize>,
        /// Output image extension (png, tiff, bmp).
        #[arg(long, default_value = "png")]
        ext: String,
        #[command(flatten)]
        render: RenderArgs,
    },

    #[cfg(feature = "gif")]
    /// Render one pass into an animated GIF.
    #[command(about = "Export an animated GIF")]
    Gif {
        /// Input animation path.
        input: PathBuf,
        /// Output GIF path.
        #[arg(long)]
        out: PathBuf,
        /// Fixed frame delay in hundredths of a second.
        #[arg(long)]
        delay: Option<u16>,
        /// Repeat count (loops forever when omitted).
        #[arg(long)]
        repeat: Option<u16>,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Print a shell completion script.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_pixel_format(value: &str) -> Option<PixelFormat> {
    match value.to_ascii_lowercase().as_str() {
        "rgba8" | "rgba" => Some(PixelFormat::Rgba8),
        "rgba8-premultiplied" | "premultiplied" | "premul" => {
            Some(PixelFormat::Rgba8Premultiplied)
        }
        "rgb8" | "rgb" => Some(PixelFormat::Rgb8),
        _ => None,
    }
}

fn parse_crop(value: &str) -> Result<CropRect, Box<dyn std::error::Error>> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, width, height] => Ok(CropRect::new(x, y, width, height)),
        _ => Err(format!("invalid crop rectangle: {value} (expected x,y,width,height)").into()),
    }
}

fn warn(message: String) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

#[cfg(feature = "gif")]
fn check_output_file(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    match (path.exists(), overwrite) {
        (false, _) => Ok(()),
        (true, true) => {
            warn(format!("replacing {}", path.display()));
            Ok(())
        }
        (true, false) => {
            Err(format!("{} exists; pass --overwrite to replace it", path.display()).into())
        }
    }
}

fn prepare_output_dir(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() {
        log::debug!("writing into existing directory {}", dir.display());
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Path of one extracted frame inside `dir`. Existing files are only
/// replaced with `--overwrite`.
fn frame_output_path(
    dir: &Path,
    frame_index: usize,
    ext: &str,
    overwrite: bool,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(format!("frame_{frame_index:06}.{ext}"));
    if path.exists() {
        if !overwrite {
            return Err(format!("{} exists; pass --overwrite to replace it", path.display()).into());
        }
        warn(format!("replacing {}", path.display()));
    }
    Ok(path)
}

/// Resolve `--start`/`--end` against the animation's frames, both inclusive.
fn frame_range(
    frame_count: usize,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<(usize, usize), String> {
    let last = frame_count.saturating_sub(1);
    let start_frame = start.unwrap_or(0);
    let end_frame = end.unwrap_or(last);
    for (flag, frame) in [("--start", start_frame), ("--end", end_frame)] {
        if frame > last {
            return Err(format!("{flag} {frame} is past the last frame ({last})"));
        }
    }
    if start_frame > end_frame {
        return Err(format!("--start {start_frame} is after --end {end_frame}"));
    }
    Ok((start_frame, end_frame))
}

fn open_source(path: &Path, global: &GlobalOptions) -> Result<AnimationSource, SlottieError> {
    let mut engine = RlottieEngine::new();
    let resources = global
        .resources
        .clone()
        .or_else(|| path.parent().map(Path::to_path_buf));
    if let Some(dir) = resources {
        engine = engine.with_resource_dir(dir);
    }
    AnimationSource::open(&engine, path)
}

fn build_config(
    source: &AnimationSource,
    render: &RenderArgs,
    allows_looping: bool,
) -> Result<ExtractionConfig, Box<dyn std::error::Error>> {
    let (intrinsic_width, intrinsic_height) = source.size();
    let mut config = ExtractionConfig::new(
        render.width.unwrap_or(intrinsic_width),
        render.height.unwrap_or(intrinsic_height),
    )
    .with_scale(render.scale)
    .with_looping(allows_looping);

    if let Some(crop) = &render.crop {
        config = config.with_visible_rect(parse_crop(crop)?);
    }
    if let Some(format) = &render.pixel_format {
        let format =
            parse_pixel_format(format).ok_or(format!("unsupported --pixel-format: {format}"))?;
        config = config.with_pixel_format(format);
    }
    Ok(config)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.global.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    match cli.command {
        Commands::Info { input, json } => {
            let source = open_source(&input, &cli.global)?;
            let metadata = source.metadata();
            if json {
                let payload = json!({
                    "frame_count": metadata.frame_count,
                    "duration_seconds": metadata.duration_seconds,
                    "frame_duration_seconds": metadata.frame_duration.as_secs_f64(),
                    "frame_rate": metadata.frame_rate,
                    "width": metadata.width,
                    "height": metadata.height,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Size: {}x{}", metadata.width, metadata.height);
                println!(
                    "Frames: {} @ {:.2} fps",
                    metadata.frame_count, metadata.frame_rate
                );
                println!(
                    "Duration: {:.3}s ({} per frame)",
                    metadata.duration_seconds, metadata.frame_duration
                );
            }
        }
        Commands::Extract {
            input,
            out,
            start,
            end,
            ext,
            render,
        } => {
            let source = open_source(&input, &cli.global)?;
            let (start_frame, end_frame) = frame_range(source.frame_count(), start, end)?;
            prepare_output_dir(&out)?;

            let config = build_config(&source, &render, false)?;
            let mut extractor = FrameExtractor::new(source, config)?;
            extractor.seek(start_frame)?;

            let progress_bar = if cli.global.progress {
                let pb = ProgressBar::new((end_frame - start_frame + 1) as u64);
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?;
                pb.set_style(style.progress_chars("##-"));
                Some(pb)
            } else {
                None
            };

            let ext_clean = ext.trim_start_matches('.').to_ascii_lowercase();
            let mut extracted = 0_u64;
            while extractor.next_frame_index() <= end_frame {
                let frame = extractor.next_frame()?;
                let output_path =
                    frame_output_path(&out, frame.frame_index, &ext_clean, cli.global.overwrite)?;

                frame.image.save(&output_path)?;
                extracted += 1;

                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }

                log::debug!(
                    "saved frame {} ({}) -> {}",
                    frame.frame_index,
                    frame.presentation_time,
                    output_path.display()
                );
            }

            if let Some(pb) = progress_bar {
                pb.finish_with_message("done");
            }

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Rendered {extracted} frame(s) to {}", out.display()).green()
            );
        }
        #[cfg(feature = "gif")]
        Commands::Gif {
            input,
            out,
            delay,
            repeat,
            render,
        } => {
            check_output_file(&out, cli.global.overwrite)?;
            let source = open_source(&input, &cli.global)?;
            let config = build_config(&source, &render, false)?;
            let mut extractor = FrameExtractor::new(source, config)?;

            let mut gif_options = GifOptions::new().with_repeat(repeat);
            if let Some(delay) = delay {
                gif_options = gif_options.with_frame_delay(delay);
            }
            extractor.export_gif(&out, &gif_options, &ExtractOptions::new())?;
            println!("{} {}", "saved".green().bold(), out.display());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "slottie", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
