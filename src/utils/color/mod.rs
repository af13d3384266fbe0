//! Hex color parsing and normalization.
//!
//! Profiles store colors canonically as upper-case `#RRGGBB`. Input may omit
//! the leading `#` and use either case; anything else is rejected.

/// Check if a string is an acceptable 6-digit hex color (leading `#` optional).
pub fn is_valid_hex_color(color: &str) -> bool {
    let trimmed = color.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize a hex color to canonical `#RRGGBB` (upper-case, `#`-prefixed).
///
/// Returns `None` for anything that is not a 6-digit hex color.
pub fn normalize_hex_color(color: &str) -> Option<String> {
    let trimmed = color.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(format!("#{}", hex.to_ascii_uppercase()))
}

/// Decompose a hex color into its (r, g, b) channels.
pub fn hex_to_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let normalized = normalize_hex_color(color)?;
    let hex = &normalized[1..];

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
