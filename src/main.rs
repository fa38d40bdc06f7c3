use ambient_light::capture::ImageSequence;
use ambient_light::diagnostics::init_diagnostics;
use ambient_light::estimation::{save_report, ReportMetadata, SampleRecord, SampleReport};
use ambient_light::{Config, EstimatorError, LightEstimator, PixelLayout};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Estimate ambient light intensity from a sequence of camera frames
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of frame images (or a video file with --video)
    input: PathBuf,

    /// Config file (defaults to the user config, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the emitted intensities to this JSON file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Treat INPUT as a video file
    #[arg(long)]
    video: bool,

    #[arg(long)]
    baseline: Option<f32>,

    #[arg(long)]
    blend_weight: Option<f32>,

    #[arg(long)]
    damping: Option<f32>,

    /// Spacing in samples between sampled pixels
    #[arg(long)]
    stride: Option<usize>,

    /// grayscale or rgb888
    #[arg(long)]
    layout: Option<PixelLayout>,

    /// Frames between two estimations
    #[arg(long)]
    frame_interval: Option<u32>,

    /// Store the effective settings as the user config before running
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        let filter = &mut config.filter;
        if let Some(layout) = self.layout {
            *filter = filter.with_layout(layout);
        }
        if let Some(stride) = self.stride {
            filter.stride = stride;
        }
        if let Some(baseline) = self.baseline {
            filter.baseline_intensity = baseline;
        }
        if let Some(weight) = self.blend_weight {
            filter.blend_weight = weight;
        }
        if let Some(damping) = self.damping {
            filter.damping = damping;
        }
        if let Some(interval) = self.frame_interval {
            config.frame_interval = interval;
        }
        if let Some(ref report) = self.report {
            config.report_path = Some(report.clone());
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut config, load_error) = match cli.config {
        Some(ref path) => match Config::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => {
                eprintln!("Failed to load config {:?}: {e}", path);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load(),
    };
    cli.apply_overrides(&mut config);

    let _guard = match init_diagnostics(&config.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging in {:?}: {e}", config.log_dir);
            return ExitCode::FAILURE;
        }
    };

    if let Some(e) = load_error {
        tracing::warn!(
            "Failed to load config {:?}: {e}, using defaults",
            Config::config_path()
        );
    }

    if cli.save_config {
        match config.save() {
            Ok(()) => tracing::info!("Config saved to: {:?}", Config::config_path()),
            Err(e) => {
                tracing::error!("Failed to save config: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Light estimation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), EstimatorError> {
    let mut estimator = LightEstimator::from_config(config)?;
    let layout = config.filter.layout;

    tracing::info!(
        "Estimating light from {:?} ({:?}, stride {}, every {} frames)",
        cli.input,
        layout,
        config.filter.stride,
        config.frame_interval
    );

    let mut report = SampleReport::new(ReportMetadata {
        source: cli.input.display().to_string(),
        layout,
        frame_interval: config.frame_interval,
    });

    let mut sink = |record: SampleRecord| {
        println!("frame {:>6}  intensity {:.4}", record.frame_index, record.intensity);
        report.samples.push(record);
    };

    let summary = if cli.video {
        run_video(&mut estimator, cli, layout, &mut sink)?
    } else {
        let frames = ImageSequence::open(&cli.input, layout)?;
        estimator.run(frames, &mut sink)?
    };

    println!(
        "Final intensity {:.4} after {} frames ({} estimations)",
        summary.final_intensity, summary.frames_seen, summary.samples_emitted
    );

    if let Some(ref path) = config.report_path {
        save_report(&report, path)?;
        tracing::info!("Report saved to: {:?}", path);
    }

    Ok(())
}

#[cfg(feature = "video")]
fn run_video(
    estimator: &mut LightEstimator,
    cli: &Cli,
    layout: PixelLayout,
    sink: &mut impl FnMut(SampleRecord),
) -> Result<ambient_light::estimation::RunSummary, EstimatorError> {
    let frames = ambient_light::capture::VideoSource::open(&cli.input, layout)?;
    estimator.run(frames, sink)
}

#[cfg(not(feature = "video"))]
fn run_video(
    _estimator: &mut LightEstimator,
    _cli: &Cli,
    _layout: PixelLayout,
    _sink: &mut impl FnMut(SampleRecord),
) -> Result<ambient_light::estimation::RunSummary, EstimatorError> {
    Err(EstimatorError::video(
        "built without the `video` feature, rebuild with --features video",
    ))
}
