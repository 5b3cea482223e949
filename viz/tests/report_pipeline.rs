//! Load an image file, estimate limits and render the text report parts.

use scaling::io::{load_sample, save_u8_image};
use scaling::{DisplayConfig, ImageDisplay, ImageNormalize, Limits, Method, Sample, SampleKind, Stretch};
use tempfile::TempDir;
use test_helpers::{output_path, star_field};
use viz::histogram::{format_colour_histogram, HistogramConfig, Scale};
use viz::preview::{render_preview, PreviewConfig};

/// Write a synthetic star field as an 8-bit PNG and return its path.
fn write_star_field(dir: &TempDir) -> std::path::PathBuf {
    let field = star_field((60, 90), 12, 40.0, 3.0, 200.0, 17);
    let norm = ImageNormalize::new(Limits::new(0.0, 255.0), Stretch::linear(), true).unwrap();
    let bytes = norm.to_u8(&Sample::new(field));
    let path = dir.path().join("stars.png");
    save_u8_image(&bytes, &path).unwrap();
    path
}

#[test]
fn test_png_report_uses_minmax_for_8bit() {
    let dir = TempDir::new().unwrap();
    let path = write_star_field(&dir);

    let sample = load_sample(&path).unwrap();
    assert_eq!(sample.kind(), SampleKind::Integer);
    assert_eq!(sample.dim(), (60, 90));

    let display = ImageDisplay::from_sample(sample, DisplayConfig::default()).unwrap();
    assert_eq!(display.estimate().method, Method::MinMax);

    let histogram = display.histogram().unwrap();
    let config = HistogramConfig {
        scale: Scale::from_log(display.config().histogram.log),
        ..HistogramConfig::default()
    };
    let table = format_colour_histogram(histogram, display.clim(), &config).unwrap();
    assert!(table.contains("<- low"));
    assert!(table.contains("<- high"));
    assert!(table.contains("log10"));

    let preview = render_preview(
        &display.levels(),
        &PreviewConfig {
            width: 30,
            ..PreviewConfig::default()
        },
    )
    .unwrap();
    // 60 rows * 30 / 90 * 0.5 = 10 rows plus borders
    assert_eq!(preview.lines().count(), 12);
}

#[test]
fn test_normalized_export_spans_full_range() {
    let dir = TempDir::new().unwrap();
    let path = write_star_field(&dir);
    let sample = load_sample(&path).unwrap();

    let config = DisplayConfig {
        interval: Method::MinMax,
        stretch: Stretch::Sqrt,
        ..DisplayConfig::default()
    };
    let display = ImageDisplay::from_sample(sample, config).unwrap();
    let bytes = display.to_u8();
    assert_eq!(bytes.iter().copied().min(), Some(0));
    assert_eq!(bytes.iter().copied().max(), Some(255));

    let out = output_path("star_field_sqrt.png");
    save_u8_image(&bytes, &out).unwrap();
    assert!(out.exists());
}
