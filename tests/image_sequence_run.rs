use ambient_light::capture::ImageSequence;
use ambient_light::estimation::{load_report, save_report, ReportMetadata};
use ambient_light::{Config, FilterConfig, LightEstimator, PixelLayout, SampleReport};
use image::{Rgb, RgbImage};

fn write_frames(dir: &std::path::Path, values: &[u8]) {
    for (i, value) in values.iter().enumerate() {
        RgbImage::from_pixel(4, 4, Rgb([*value, *value, *value]))
            .save(dir.join(format!("frame_{i:03}.png")))
            .unwrap();
    }
}

#[test]
fn dark_scene_dims_the_light() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_frames(tmp.path(), &[0; 10]);

    let mut config = Config::default();
    config.filter = FilterConfig::new(1.0, 1.0, 0.6);
    config.frame_interval = 1;

    let mut estimator = LightEstimator::from_config(&config).expect("valid config");
    let mut report = SampleReport::new(ReportMetadata {
        source: "dark".to_string(),
        layout: PixelLayout::Rgb888,
        frame_interval: 1,
    });

    let frames = ImageSequence::open(tmp.path(), PixelLayout::Rgb888).unwrap();
    let summary = estimator.run(frames, &mut report).unwrap();

    assert_eq!(summary.frames_seen, 10);
    assert_eq!(summary.samples_emitted, 10);
    let intensities: Vec<f32> = report.samples.iter().map(|s| s.intensity).collect();
    assert!(intensities.windows(2).all(|w| w[1] < w[0]));
    assert!((summary.final_intensity - 0.6f32.powi(10)).abs() < 1e-5);
}

#[test]
fn grayscale_run_matches_rgb_run_on_neutral_frames() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_frames(tmp.path(), &[40, 80, 120, 160, 200, 240]);

    let mut results = Vec::new();
    for layout in [PixelLayout::Rgb888, PixelLayout::Grayscale] {
        let mut config = Config::default();
        config.filter = FilterConfig::new(0.5, 0.5, 0.6).with_layout(layout);
        config.frame_interval = 2;

        let mut estimator = LightEstimator::from_config(&config).unwrap();
        let mut report = SampleReport::new(ReportMetadata {
            source: "neutral".to_string(),
            layout,
            frame_interval: 2,
        });
        let frames = ImageSequence::open(tmp.path(), layout).unwrap();
        estimator.run(frames, &mut report).unwrap();
        results.push(report);
    }

    let (rgb, gray) = (&results[0], &results[1]);
    assert_eq!(rgb.samples.len(), 3);
    assert_eq!(gray.samples.len(), 3);
    for (a, b) in rgb.samples.iter().zip(&gray.samples) {
        assert_eq!(a.frame_index, b.frame_index);
        // Gray conversion rounds to whole levels
        assert!((a.intensity - b.intensity).abs() < 0.02);
    }
}

#[test]
fn report_survives_disk_round_trip() {
    let tmp = tempfile::TempDir::new().unwrap();
    let frames_dir = tmp.path().join("frames");
    std::fs::create_dir_all(&frames_dir).unwrap();
    write_frames(&frames_dir, &[255, 255, 255]);

    let config = Config {
        frame_interval: 1,
        ..Config::default()
    };
    let mut estimator = LightEstimator::from_config(&config).unwrap();
    let mut report = SampleReport::new(ReportMetadata {
        source: frames_dir.display().to_string(),
        layout: PixelLayout::Rgb888,
        frame_interval: 1,
    });
    estimator
        .run(ImageSequence::open(&frames_dir, PixelLayout::Rgb888).unwrap(), &mut report)
        .unwrap();

    let path = tmp.path().join("out").join("report.json");
    save_report(&report, &path).unwrap();
    let loaded = load_report(&path).unwrap();

    assert_eq!(loaded, report);
    // Bright frames push the light above its baseline
    assert!(loaded.last_intensity().unwrap() > config.filter.baseline_intensity);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = Config::default();
    config.filter.damping = 1.2;
    assert!(LightEstimator::from_config(&config).is_err());
}
