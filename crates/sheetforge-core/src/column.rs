//! Column addressing and width estimation

use crate::error::{Error, Result};
use crate::MAX_COLS;

/// Convert a zero-based column index to letters (0 = "A", 25 = "Z", 26 = "AA")
pub fn column_letters(mut col: u16) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    // Only ASCII uppercase letters were pushed
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert column letters to a zero-based index ("A" = 0, "XFD" = 16383)
pub fn column_index_from_letters(letters: &str) -> Result<u16> {
    if letters.is_empty() {
        return Err(Error::InvalidColumn("empty column reference".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return Err(Error::InvalidColumn(format!(
                "invalid character in column reference '{}'",
                letters
            )));
        }
        col = col * 26 + (c as u32 - 'A' as u32 + 1);
        if col > MAX_COLS as u32 {
            return Err(Error::InvalidColumn(format!(
                "column reference '{}' out of range",
                letters
            )));
        }
    }
    Ok((col - 1) as u16)
}

/// Per-font-size metrics used to convert pixel widths to Excel column units
///
/// Measured from real Excel output; index is point size.
struct FontMetric {
    size: u8,
    px: f64,
    width: f64,
}

const ARIAL_METRICS: &[FontMetric] = &[
    FontMetric { size: 1, px: 24.0, width: 12.0 },
    FontMetric { size: 2, px: 24.0, width: 12.0 },
    FontMetric { size: 3, px: 32.0, width: 10.664_062_5 },
    FontMetric { size: 4, px: 32.0, width: 10.664_062_5 },
    FontMetric { size: 5, px: 40.0, width: 10.0 },
    FontMetric { size: 6, px: 48.0, width: 9.597_656_25 },
    FontMetric { size: 7, px: 48.0, width: 9.597_656_25 },
    FontMetric { size: 8, px: 56.0, width: 9.332_031_25 },
    FontMetric { size: 9, px: 64.0, width: 9.140_625 },
    FontMetric { size: 10, px: 64.0, width: 9.140_625 },
];

const CALIBRI_METRICS: &[FontMetric] = &[
    FontMetric { size: 1, px: 24.0, width: 12.0 },
    FontMetric { size: 2, px: 24.0, width: 12.0 },
    FontMetric { size: 3, px: 32.0, width: 10.664_062_5 },
    FontMetric { size: 4, px: 32.0, width: 10.664_062_5 },
    FontMetric { size: 5, px: 40.0, width: 10.0 },
    FontMetric { size: 6, px: 48.0, width: 9.597_656_25 },
    FontMetric { size: 7, px: 48.0, width: 9.597_656_25 },
    FontMetric { size: 8, px: 56.0, width: 9.332_031_25 },
    FontMetric { size: 9, px: 56.0, width: 9.332_031_25 },
    FontMetric { size: 10, px: 64.0, width: 9.140_625 },
    FontMetric { size: 11, px: 64.0, width: 9.140_625 },
];

const VERDANA_METRICS: &[FontMetric] = &[
    FontMetric { size: 1, px: 24.0, width: 12.0 },
    FontMetric { size: 2, px: 24.0, width: 12.0 },
    FontMetric { size: 3, px: 32.0, width: 10.664_062_5 },
    FontMetric { size: 4, px: 32.0, width: 10.664_062_5 },
    FontMetric { size: 5, px: 40.0, width: 10.0 },
    FontMetric { size: 6, px: 48.0, width: 9.597_656_25 },
    FontMetric { size: 7, px: 48.0, width: 9.597_656_25 },
    FontMetric { size: 8, px: 64.0, width: 9.140_625 },
    FontMetric { size: 9, px: 72.0, width: 9.0 },
    FontMetric { size: 10, px: 72.0, width: 9.0 },
];

fn metrics_for(font_name: &str) -> Option<&'static [FontMetric]> {
    match font_name {
        "Arial" => Some(ARIAL_METRICS),
        "Calibri" => Some(CALIBRI_METRICS),
        "Verdana" => Some(VERDANA_METRICS),
        _ => None,
    }
}

fn metric_for(font_name: &str, font_size: u8) -> Option<&'static FontMetric> {
    metrics_for(font_name).and_then(|m| m.iter().find(|e| e.size == font_size))
}

/// Default column width for a font, in Excel column units
///
/// Falls back to the largest tabulated size of the font, then to Calibri 11
/// for fonts with no metrics at all.
pub fn default_column_width(font_name: &str, font_size: u8) -> f64 {
    if let Some(metric) = metric_for(font_name, font_size) {
        return metric.width;
    }
    if let Some(metrics) = metrics_for(font_name) {
        if let Some(last) = metrics.last() {
            return last.width;
        }
    }
    9.140_625
}

/// Estimate the column width needed to display a cell's text,
/// in Excel column units rounded to 4 decimal places
///
/// Multiline text is measured as its widest line. The per-font factors
/// (8 px/char for Arial and Verdana at 10pt, 8.26 for Calibri at 11pt)
/// were interpolated from real Excel output.
pub fn estimate_cell_width(font_name: &str, font_size: u8, text: &str) -> f64 {
    if text.contains('\n') {
        return text
            .split('\n')
            .map(|line| estimate_cell_width(font_name, font_size, line))
            .fold(0.0, f64::max);
    }

    let chars = text.chars().count() as f64;
    let pixels = match font_name {
        "Arial" | "Verdana" => (8.0 * chars).trunc() * font_size as f64 / 10.0,
        _ => (8.26 * chars).trunc() * font_size as f64 / 11.0,
    };
    let units = pixels_to_column_units(font_name, font_size, pixels.trunc());
    (units * 10_000.0).round() / 10_000.0
}

fn pixels_to_column_units(font_name: &str, font_size: u8, pixels: f64) -> f64 {
    match metric_for(font_name, font_size) {
        Some(metric) => pixels * metric.width / metric.px,
        // Scale Calibri 11 metrics for untabulated sizes
        None => pixels * 11.0 * 9.140_625 / 64.0 / font_size as f64,
    }
}
