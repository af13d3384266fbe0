//! WCAG 2.1 contrast checking.
//!
//! Relative luminance and contrast ratio per WCAG 2.1 §1.4.3. The ratio is
//! kept at full precision for threshold comparisons; rounding to two decimals
//! happens only for display. Malformed input is always an error, never a
//! fallback ratio.

use crate::services::profile::{ProfileError, ProfileResult};
use crate::utils::color::hex_to_rgb;

/// AA threshold for normal text.
pub const AA_THRESHOLD: f64 = 4.5;
/// AA threshold for large text.
pub const AA_LARGE_THRESHOLD: f64 = 3.0;
/// AAA threshold for normal text.
pub const AAA_THRESHOLD: f64 = 7.0;
/// AAA threshold for large text.
pub const AAA_LARGE_THRESHOLD: f64 = 4.5;

/// Result of a contrast check: the ratio plus WCAG classification flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastReport {
    pub ratio: f64,
    pub aa: bool,
    pub aa_large: bool,
    pub aaa: bool,
    pub aaa_large: bool,
}

impl ContrastReport {
    /// Ratio rounded to two decimals for display.
    pub fn display_ratio(&self) -> f64 {
        (self.ratio * 100.0).round() / 100.0
    }
}

/// Relative luminance of an sRGB color, in [0, 1].
pub fn relative_luminance(color: &str) -> ProfileResult<f64> {
    let (r, g, b) = hex_to_rgb(color).ok_or_else(|| ProfileError::InvalidColor(color.to_string()))?;

    let r = channel_to_linear(r);
    let g = channel_to_linear(g);
    let b = channel_to_linear(b);

    Ok(0.2126 * r + 0.7152 * g + 0.0722 * b)
}

/// sRGB transfer function for a single channel.
fn channel_to_linear(channel: u8) -> f64 {
    let v = channel as f64 / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Contrast ratio between two colors, in [1.0, 21.0].
pub fn contrast_ratio(color_a: &str, color_b: &str) -> ProfileResult<f64> {
    let l1 = relative_luminance(color_a)?;
    let l2 = relative_luminance(color_b)?;

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    Ok((lighter + 0.05) / (darker + 0.05))
}

/// Classify a ratio against the WCAG thresholds. Pure; no side effects.
pub fn classify(ratio: f64) -> ContrastReport {
    ContrastReport {
        ratio,
        aa: ratio >= AA_THRESHOLD,
        aa_large: ratio >= AA_LARGE_THRESHOLD,
        aaa: ratio >= AAA_THRESHOLD,
        aaa_large: ratio >= AAA_LARGE_THRESHOLD,
    }
}

/// Compute the ratio between two colors and classify it in one step.
pub fn check_contrast(color_a: &str, color_b: &str) -> ProfileResult<ContrastReport> {
    Ok(classify(contrast_ratio(color_a, color_b)?))
}
