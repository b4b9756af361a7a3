//! craterfit CLI: turn segmentation masks into a deduplicated list of crater circles.

use clap::{Parser, ValueEnum};
use craterfit::detect::{self, RunError};
use craterfit::io::{InputError, MaskSet, RunConfig};
use craterfit::report::{self, DetectionReport};
use log::{info, warn, LevelFilter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "craterfit")]
#[command(about = "Fit, filter and deduplicate crater circles from region masks")]
#[command(version)]
struct Cli {
    /// Masks JSON produced by the segmentation + contour stage.
    masks: Option<PathBuf>,

    /// Run config JSON (paths and filter parameters); flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source image: provides the dimensions and the overlay background.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Minimum accepted radius in pixels.
    #[arg(long)]
    min_radius: Option<f64>,

    /// Maximum accepted radius in pixels.
    #[arg(long)]
    max_radius: Option<f64>,

    /// Minimum isoperimetric circularity in [0, 1].
    #[arg(long)]
    min_circularity: Option<f64>,

    /// Minimum mask area in pixels.
    #[arg(long)]
    min_area: Option<u32>,

    /// Overlap above which the lower-scored circle is dropped.
    #[arg(long)]
    iou_dedup: Option<f64>,

    /// Required clearance between a circle and the image edge, in pixels.
    #[arg(long)]
    border_margin: Option<f64>,

    /// Output CSV (default: craters.csv).
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Output JSON report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output overlay PNG (needs --image).
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Log verbosity.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    /// Merge the optional config file with the command-line overrides.
    fn run_config(&self) -> Result<RunConfig, InputError> {
        let mut run = match &self.config {
            Some(path) => RunConfig::load_json(path)?,
            None => RunConfig::default(),
        };
        let path_str = |p: &PathBuf| p.to_string_lossy().into_owned();
        if let Some(p) = &self.masks {
            run.masks_path = Some(path_str(p));
        }
        if let Some(p) = &self.image {
            run.image_path = Some(path_str(p));
        }
        if let Some(p) = &self.csv {
            run.csv_path = Some(path_str(p));
        }
        if let Some(p) = &self.report {
            run.report_path = Some(path_str(p));
        }
        if let Some(p) = &self.overlay {
            run.overlay_path = Some(path_str(p));
        }

        let f = &mut run.filter;
        if let Some(v) = self.min_radius {
            f.min_radius = v;
        }
        if let Some(v) = self.max_radius {
            f.max_radius = v;
        }
        if let Some(v) = self.min_circularity {
            f.min_circularity = v;
        }
        if let Some(v) = self.min_area {
            f.min_area = v;
        }
        if let Some(v) = self.iou_dedup {
            f.iou_dedup_threshold = v;
        }
        if let Some(v) = self.border_margin {
            f.border_margin = v;
        }
        Ok(run)
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        craterfit::core::init_tracing(cli.log_level.into(), cli.json_logs);
    }
    #[cfg(not(feature = "tracing"))]
    craterfit::core::init_with_level(cli.log_level.into())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let run = cli.run_config().map_err(RunError::from)?;
    let Some(masks_path) = run.masks_path.as_deref() else {
        return Err("no masks file given (positional argument or `masks_path` in --config)"
            .to_string()
            .into());
    };
    let image_path = run.image_path.as_deref().map(Path::new);

    let set = MaskSet::load_json(masks_path).map_err(RunError::from)?;
    info!("loaded {} masks from {masks_path}", set.masks.len());
    let image = load_image(image_path, run.overlay_path.is_some())?;
    let size = image.as_ref().map(|img| img.size);
    let detection = detect::detect_mask_set(set, size, &run.filter)?;

    for line in report::summary_lines(&detection.circles) {
        println!("{line}");
    }
    println!("final circles: {}", detection.circles.len());

    let csv_path = run.csv_path();
    report::write_csv_file(&csv_path, &detection.circles).map_err(RunError::from)?;
    info!("wrote {}", csv_path.display());

    if let Some(path) = &run.report_path {
        DetectionReport::new(
            &detection,
            &run.filter,
            run.masks_path.clone(),
            run.image_path.clone(),
        )
        .write_json(path)
        .map_err(RunError::from)?;
        info!("wrote {path}");
    }

    if let Some(path) = &run.overlay_path {
        write_overlay(image, &detection.circles, Path::new(path))?;
    }
    Ok(())
}

struct LoadedImage {
    size: craterfit::core::ImageSize,
    #[cfg(feature = "image")]
    pixels: Option<image::RgbImage>,
}

#[cfg(feature = "image")]
fn load_image(path: Option<&Path>, want_pixels: bool) -> CliResult<Option<LoadedImage>> {
    use craterfit::render;

    let Some(path) = path else {
        return Ok(None);
    };
    if want_pixels {
        let img = render::load_rgb(path).map_err(RunError::from)?;
        let size = craterfit::core::ImageSize::new(img.width(), img.height());
        Ok(Some(LoadedImage {
            size,
            pixels: Some(img),
        }))
    } else {
        let size = render::image_size(path).map_err(RunError::from)?;
        Ok(Some(LoadedImage { size, pixels: None }))
    }
}

#[cfg(not(feature = "image"))]
fn load_image(path: Option<&Path>, _want_pixels: bool) -> CliResult<Option<LoadedImage>> {
    match path {
        Some(p) => {
            Err(format!("cannot read {}: built without the `image` feature", p.display()).into())
        }
        None => Ok(None),
    }
}

#[cfg(feature = "image")]
fn write_overlay(
    image: Option<LoadedImage>,
    circles: &[craterfit::CircleCandidate],
    path: &Path,
) -> CliResult<()> {
    match image.and_then(|img| img.pixels) {
        Some(pixels) => {
            craterfit::render::write_overlay(pixels, circles, path).map_err(RunError::from)?;
            info!("wrote {}", path.display());
        }
        None => warn!("--overlay needs --image; skipping {}", path.display()),
    }
    Ok(())
}

#[cfg(not(feature = "image"))]
fn write_overlay(
    _image: Option<LoadedImage>,
    _circles: &[craterfit::CircleCandidate],
    path: &Path,
) -> CliResult<()> {
    warn!("built without the `image` feature; skipping overlay {}", path.display());
    Ok(())
}
