//! Render a scene to an image file
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};

use weekend_tracer::config::RenderConfig;
use weekend_tracer::output;
use weekend_tracer::scenes::SCENE_NAMES;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "weekend-tracer")]
#[command(about = "A multithreaded path tracer")]
struct Args {
    /// YAML render config
    #[arg(short, long, conflicts_with = "scene")]
    config: Option<PathBuf>,

    /// Built-in scene to render when no config is given
    #[arg(short, long, default_value = "random_spheres", value_parser = SCENE_NAMES)]
    scene: String,

    /// Image width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for scene generation and pixel sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Render on a fixed pool of this many threads instead of the rayon pool
    #[arg(short, long)]
    threads: Option<usize>,

    /// Output file, .ppm or .png
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> weekend_tracer::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::builtin(args.scene.as_str()),
    };
    if let Some(width) = args.width {
        config.image.width = width;
    }
    if let Some(samples) = args.samples {
        config.image.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        config.image.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        config.image.seed = seed;
    }
    let start = Instant::now();
    let renderer = config.into_renderer()?;
    let settings = renderer.settings();
    info!(
        "Image {}x{}, {} samples per pixel, depth {}, scene ready in {:.2?}",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        settings.max_depth,
        start.elapsed()
    );

    let bar = ProgressBar::new(settings.height as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} scanlines [{elapsed}]") {
        bar.set_style(style);
    }
    let renderer = renderer.with_progress(bar);

    let start = Instant::now();
    let image = match args.threads {
        Some(workers) => renderer.render_with_pool(workers)?,
        None => renderer.render(),
    };
    info!("Rendered in {:.2?}", start.elapsed());

    output::save(&image, &args.output)
}
