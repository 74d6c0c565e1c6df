/// Rampe de 24 glyphes, du bloc plein à l'espace.
///
/// Index 0 ↔ luminance 0.0, dernier index ↔ luminance 1.0.
pub const GLYPH_RAMP: [char; 24] = [
    '█', '▓', '▒', '░', '@', '%', '#', '&', '8', 'B', 'W', 'M', '*', 'o', '+', '=', '~', '-',
    ':', ';', ',', '.', '`', ' ',
];

/// Index dans la rampe pour une luminance normalisée.
///
/// `floor(lum * (len - 1))`, luminance bornée à [0.0, 1.0].
///
/// # Example
/// ```
/// use tvp_core::charset::{ramp_index, GLYPH_RAMP};
/// assert_eq!(ramp_index(0.0), 0);
/// assert_eq!(ramp_index(1.0), GLYPH_RAMP.len() - 1);
/// ```
#[inline(always)]
#[must_use]
pub fn ramp_index(lum: f32) -> usize {
    let lum = lum.clamp(0.0, 1.0);
    ((lum * (GLYPH_RAMP.len() - 1) as f32) as usize).min(GLYPH_RAMP.len() - 1)
}

/// Glyphe de la rampe pour une luminance normalisée.
///
/// # Example
/// ```
/// use tvp_core::charset::ramp_glyph;
/// assert_eq!(ramp_glyph(0.0), '█');
/// assert_eq!(ramp_glyph(1.0), ' ');
/// ```
#[inline(always)]
#[must_use]
pub fn ramp_glyph(lum: f32) -> char {
    GLYPH_RAMP[ramp_index(lum)]
}
