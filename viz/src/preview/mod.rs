//! ASCII preview of a normalized image.
//!
//! Display levels are block-averaged down to the requested character width
//! and mapped onto a character ramp. Terminal cells are about twice as tall
//! as they are wide, so rows are sampled at half the column density by
//! default.

use crate::histogram::level_char;
use crate::{Result, VizError};
use ndarray::{s, Array2};
use std::fmt::Write;

/// Configuration for image previews.
#[derive(Debug, Clone)]
pub struct PreviewConfig<'a> {
    /// Optional title displayed above the preview
    pub title: Option<&'a str>,
    /// Character ramp from level 0 to level 1
    pub level_chars: &'a str,
    /// Character for cells with no valid pixels
    pub bad_char: char,
    /// Width of the preview in character columns
    pub width: usize,
    /// Character cell width / height
    pub cell_aspect: f64,
    /// Draw row 0 at the bottom, as image displays do by default
    pub origin_lower: bool,
}

impl Default for PreviewConfig<'_> {
    fn default() -> Self {
        Self {
            title: None,
            level_chars: " .:-=+*#%@",
            bad_char: '?',
            width: 64,
            cell_aspect: 0.5,
            origin_lower: true,
        }
    }
}

/// Block-average `levels` onto a (rows, cols) grid; cells without finite
/// values become NaN.
pub fn downsample(levels: &Array2<f64>, rows: usize, cols: usize) -> Array2<f64> {
    let (src_rows, src_cols) = levels.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let r0 = r * src_rows / rows;
        let r1 = ((r + 1) * src_rows / rows).max(r0 + 1).min(src_rows);
        let c0 = c * src_cols / cols;
        let c1 = ((c + 1) * src_cols / cols).max(c0 + 1).min(src_cols);

        let (sum, n) = levels
            .slice(s![r0..r1, c0..c1])
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(sum, n), &v| (sum + v, n + 1));
        if n == 0 {
            f64::NAN
        } else {
            sum / n as f64
        }
    })
}

/// Render display levels (NaN = bad pixel) as text.
pub fn render_preview(levels: &Array2<f64>, config: &PreviewConfig) -> Result<String> {
    let (rows, cols) = levels.dim();
    if rows == 0 || cols == 0 {
        return Err(VizError::PreviewError("Image has no pixels".to_string()));
    }
    if config.level_chars.is_empty() {
        return Err(VizError::PreviewError(
            "Empty character set for preview".to_string(),
        ));
    }
    if config.width == 0 || !(config.cell_aspect > 0.0) {
        return Err(VizError::PreviewError(format!(
            "Invalid preview size: width {}, cell aspect {}",
            config.width, config.cell_aspect
        )));
    }

    let out_cols = config.width.min(cols);
    let out_rows = ((rows as f64 * out_cols as f64 / cols as f64) * config.cell_aspect)
        .round()
        .clamp(1.0, rows as f64) as usize;
    let grid = downsample(levels, out_rows, out_cols);

    let mut output = String::new();
    if let Some(title) = config.title {
        writeln!(output, "{title}")?;
        writeln!(output, "{}", "=".repeat(title.len()))?;
    }

    writeln!(output, "+{}+", "-".repeat(out_cols))?;
    let row_order: Vec<usize> = if config.origin_lower {
        (0..out_rows).rev().collect()
    } else {
        (0..out_rows).collect()
    };
    for r in row_order {
        output.push('|');
        for &level in grid.row(r) {
            output.push(if level.is_nan() {
                config.bad_char
            } else {
                level_char(level, config.level_chars)
            });
        }
        output.push_str("|\n");
    }
    writeln!(output, "+{}+", "-".repeat(out_cols))?;

    Ok(output)
}
