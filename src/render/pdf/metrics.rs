//! Fitting text into table cells using the embedded face's advances.

use super::fonts::EmbeddedFont;

/// Largest font size in `min..=max` at which `text` fits in `width`.
///
/// Returns `min` when even the smallest size overflows.
pub(crate) fn fit_font_size(
    font: &EmbeddedFont,
    text: &str,
    width: f32,
    max: f32,
    min: f32,
) -> f32 {
    let natural = font.text_width(text, max);
    if natural <= width || natural <= 0.0 {
        return max;
    }
    (max * width / natural).max(min)
}

/// Longest prefix of `text` that fits in `width` at `size`.
pub(crate) fn clip_to_width<'t>(
    font: &EmbeddedFont,
    text: &'t str,
    width: f32,
    size: f32,
) -> &'t str {
    let mut used = 0.0;
    for (idx, c) in text.char_indices() {
        used += font.char_width(c, size);
        if used > width {
            return text.get(..idx).unwrap_or("");
        }
    }
    text
}
