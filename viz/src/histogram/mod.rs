//! Text rendering of the colour-bar histogram
//!
//! Each bin is printed as a table row with its value range, count, the
//! shade it gets under the current colour limits, and a bar.

use crate::{Result, VizError};
use scaling::{ColourBarHistogram, Limits, Shade};
use std::fmt::Write;

/// Scale type for bar lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Linear scale
    Linear,
    /// Logarithmic scale (base 10)
    Log10,
}

impl Scale {
    /// Scale matching a log/linear count axis flag.
    pub fn from_log(log: bool) -> Self {
        if log {
            Scale::Log10
        } else {
            Scale::Linear
        }
    }
}

/// Configuration for histogram display
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    /// Title for the histogram
    pub title: Option<String>,
    /// Character to use for bars
    pub bar_char: char,
    /// Whether to show counts
    pub show_counts: bool,
    /// Whether to show empty bins
    pub show_empty_bins: bool,
    pub scale: Scale,
    /// Whether to show the colour-bar shade column and legend
    pub show_shades: bool,
    /// Maximum bar width in characters
    pub max_bar_width: usize,
    /// Shade ramp from darkest to brightest display level
    pub shade_chars: String,
    /// Shade for bins below the low colour limit
    pub under_char: char,
    /// Shade for bins above the high colour limit
    pub over_char: char,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            title: None,
            bar_char: '#',
            show_counts: true,
            show_empty_bins: true,
            scale: Scale::Linear,
            show_shades: true,
            max_bar_width: 40,
            shade_chars: " .:-=+*%@".to_string(),
            under_char: '<',
            over_char: '>',
        }
    }
}

/// Character for a bar shade.
pub fn shade_char(shade: Shade, config: &HistogramConfig) -> char {
    match shade {
        Shade::Under => config.under_char,
        Shade::Over => config.over_char,
        Shade::Level(level) => level_char(level, &config.shade_chars),
    }
}

/// Character from `ramp` for a display level in [0, 1].
pub(crate) fn level_char(level: f64, ramp: &str) -> char {
    let n = ramp.chars().count();
    if n == 0 {
        return ' ';
    }
    let idx = (level.clamp(0.0, 1.0) * (n - 1) as f64).round() as usize;
    ramp.chars().nth(idx).unwrap_or(' ')
}

fn bar_length(count: u64, max_count: u64, config: &HistogramConfig) -> usize {
    if count == 0 || max_count == 0 {
        return 0;
    }
    let fraction = match config.scale {
        Scale::Linear => count as f64 / max_count as f64,
        Scale::Log10 => (1.0 + (count as f64).log10()) / (1.0 + (max_count as f64).log10()),
    };
    ((fraction * config.max_bar_width as f64).round() as usize).max(1)
}

/// Format the histogram bins with shades for the colour `limits`.
pub fn format_colour_histogram(
    histogram: &ColourBarHistogram,
    limits: Limits,
    config: &HistogramConfig,
) -> Result<String> {
    let counts = histogram.counts();
    let edges = histogram.edges();
    if counts.is_empty() || edges.len() != counts.len() + 1 {
        return Err(VizError::HistogramError(
            "Histogram must have at least 1 bin".to_string(),
        ));
    }
    if config.show_shades && config.shade_chars.is_empty() {
        return Err(VizError::HistogramError(
            "Empty character set for bar shades".to_string(),
        ));
    }

    let mut output = String::new();

    if let Some(title) = &config.title {
        writeln!(output, "{title}")?;
        writeln!(output, "{}", "=".repeat(title.len()))?;
    }

    let max_count = histogram.max_count();
    let count_width = max_count.to_string().len().max(5);
    let last = counts.len() - 1;

    let mut header = String::new();
    write!(header, "{:<21} ", "Range")?;
    if config.show_counts {
        write!(header, "| {:<count_width$} ", "Count")?;
    }
    if config.show_shades {
        write!(header, "| S ")?;
    }
    write!(header, "| Bar")?;
    writeln!(output, "{header}")?;
    writeln!(output, "{}", "-".repeat(header.len()))?;

    for (i, (&count, &shade)) in counts.iter().zip(histogram.shades()).enumerate() {
        let (lo, hi) = (edges[i], edges[i + 1]);
        let in_bin = |v: f64| v >= lo && (v < hi || (i == last && v == hi));
        let marker = match (in_bin(limits.low), in_bin(limits.high)) {
            (true, true) => "  <- low, high",
            (true, false) => "  <- low",
            (false, true) => "  <- high",
            (false, false) => "",
        };

        if count == 0 && !config.show_empty_bins && marker.is_empty() {
            continue;
        }

        write!(output, "{lo:>+10.3} - {hi:<+8.3} ")?;
        if config.show_counts {
            write!(output, "| {count:<count_width$} ")?;
        }
        let bar = config
            .bar_char
            .to_string()
            .repeat(bar_length(count, max_count, config));
        if config.show_shades {
            write!(output, "| {} ", shade_char(shade, config))?;
        }
        writeln!(output, "| {bar}{marker}")?;
    }

    writeln!(output)?;
    writeln!(output, "Colour limits: ({:.3}, {:.3})", limits.low, limits.high)?;
    if config.show_shades {
        writeln!(
            output,
            "Shades: '{}' = below limits, '{}' = above limits, '{}'..'{}' = display level",
            config.under_char,
            config.over_char,
            config.shade_chars.chars().next().unwrap_or(' '),
            config.shade_chars.chars().last().unwrap_or(' '),
        )?;
    }
    if config.scale == Scale::Log10 {
        writeln!(output, "Note: Bar lengths use log10 scale")?;
    }

    Ok(output)
}
