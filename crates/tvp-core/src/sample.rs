//! Échantillonnage nearest-neighbor, partagé par tous les renderers.
//!
//! Aucune interpolation : même buffer + mêmes dimensions = même valeur, toujours.

use crate::frame::{RawFrame, Rgb};

/// Projette une coordonnée de grille de sortie sur la source.
///
/// `floor(pos * src_len / out_len)`, calculé en entiers, borné à `src_len - 1`.
///
/// # Example
/// ```
/// use tvp_core::sample::source_coord;
/// assert_eq!(source_coord(0, 4, 1920), 0);
/// assert_eq!(source_coord(1, 4, 1920), 480);
/// assert_eq!(source_coord(3, 4, 2), 1);
/// ```
#[inline(always)]
#[must_use]
pub fn source_coord(pos: u32, out_len: u32, src_len: u32) -> u32 {
    let mapped = u64::from(pos) * u64::from(src_len) / u64::from(out_len.max(1));
    (mapped as u32).min(src_len.saturating_sub(1))
}

/// Échantillonne le pixel source correspondant à la cellule (x, y) d'une
/// grille `out_w × out_h`.
///
/// Les renderers sub-cellule passent une grille multipliée (ex. `2w × 4h`
/// pour Braille) et des coordonnées de sous-point.
///
/// # Example
/// ```
/// use tvp_core::frame::RawFrame;
/// use tvp_core::sample::sample_at;
/// let frame = RawFrame::from_pixels(2, 2, &[(1, 1, 1), (2, 2, 2), (3, 3, 3), (4, 4, 4)]);
/// assert_eq!(sample_at(&frame, 4, 4, 3, 3), (4, 4, 4));
/// assert_eq!(sample_at(&frame, 1, 1, 0, 0), (1, 1, 1));
/// ```
#[inline(always)]
#[must_use]
pub fn sample_at(frame: &RawFrame, out_w: u32, out_h: u32, x: u32, y: u32) -> Rgb {
    let sx = source_coord(x, out_w, frame.width);
    let sy = source_coord(y, out_h, frame.height);
    frame.pixel(sx, sy)
}
