//! Renderer Braille (U+2800), 2×4 points par cellule.
//!
//! Numérotation des points (bits 0..7 = points 1..8) :
//! +---+---+
//! | 1 | 4 |
//! +---+---+
//! | 2 | 5 |
//! +---+---+
//! | 3 | 6 |
//! +---+---+
//! | 7 | 8 |
//! +---+---+

use rayon::prelude::*;
use tvp_core::frame::{RawFrame, is_dark};
use tvp_core::sample::sample_at;

use crate::base::{COLOR_RESET, EncodedFrame, RenderBase, push_fg};

/// Chaque cellule empile des sous-échantillons verticaux (4 lignes de points).
pub const BRAILLE_CELL_ASPECT: f64 = 0.5;

/// Braille base codepoint (U+2800).
const BRAILLE_BASE: u32 = 0x2800;

/// Bit du point en (colonne, ligne), indexé `[ligne][colonne]`.
const DOT_BITS: [[u8; 2]; 4] = [[0, 3], [1, 4], [2, 5], [6, 7]];

/// Bit associé au sous-point (cx, cy), cx ∈ 0..2, cy ∈ 0..4.
///
/// # Example
/// ```
/// use tvp_render::braille::dot_bit;
/// assert_eq!(dot_bit(1, 0), 3);
/// assert_eq!(dot_bit(0, 3), 6);
/// ```
#[inline(always)]
#[must_use]
pub const fn dot_bit(cx: u32, cy: u32) -> u8 {
    DOT_BITS[cy as usize][cx as usize]
}

/// Map un masque 8 bits vers le caractère Braille `U+2800 + mask`.
///
/// # Example
/// ```
/// use tvp_render::braille::braille_char;
/// assert_eq!(braille_char(0), '\u{2800}');
/// assert_eq!(braille_char(0xFF), '\u{28FF}');
/// ```
#[inline(always)]
#[must_use]
pub const fn braille_char(mask: u8) -> char {
    match char::from_u32(BRAILLE_BASE + mask as u32) {
        Some(c) => c,
        None => ' ',
    }
}

/// Renderer Braille : 8 sous-pixels par cellule, seuil sombre → point levé.
#[derive(Clone, Debug)]
pub struct BrailleRenderer {
    /// Terminal cible et layout calculé.
    pub base: RenderBase,
    /// Émettre la couleur moyenne des 8 sous-pixels.
    pub color: bool,
}

impl BrailleRenderer {
    /// Renderer non initialisé sur `base`.
    #[must_use]
    pub fn new(base: RenderBase, color: bool) -> Self {
        Self { base, color }
    }

    /// Encode une frame.
    #[must_use]
    pub fn render(&self, frame: &RawFrame) -> EncodedFrame {
        let w = self.base.layout.cell_width;
        let h = self.base.layout.cell_height;
        let pixel_w = w * 2;
        let pixel_h = h * 4;

        let lines = (0..h)
            .into_par_iter()
            .map(|cy| {
                let mut line = String::with_capacity(w as usize * if self.color { 24 } else { 3 });
                for cx in 0..w {
                    let mut mask = 0u8;
                    let (mut sum_r, mut sum_g, mut sum_b) = (0u32, 0u32, 0u32);

                    for dy in 0..4 {
                        for dx in 0..2 {
                            let rgb = sample_at(frame, pixel_w, pixel_h, cx * 2 + dx, cy * 4 + dy);
                            if is_dark(rgb) {
                                mask |= 1 << dot_bit(dx, dy);
                            }
                            sum_r += u32::from(rgb.0);
                            sum_g += u32::from(rgb.1);
                            sum_b += u32::from(rgb.2);
                        }
                    }

                    if self.color {
                        push_fg(
                            &mut line,
                            ((sum_r / 8) as u8, (sum_g / 8) as u8, (sum_b / 8) as u8),
                        );
                    }
                    line.push(braille_char(mask));
                }
                if self.color {
                    line.push_str(COLOR_RESET);
                }
                line
            })
            .collect();

        EncodedFrame::Lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use tvp_core::frame::Rgb;
    use tvp_core::layout::{FrameLayout, TerminalGeometry};

    use super::*;

    const BLACK: Rgb = (0, 0, 0);
    const WHITE: Rgb = (255, 255, 255);

    fn renderer(color: bool) -> BrailleRenderer {
        let term = TerminalGeometry { cols: 1, rows: 1 };
        let layout = FrameLayout {
            cell_width: 1,
            cell_height: 1,
            pad_x: 0,
            pad_y: 0,
        };
        BrailleRenderer::new(RenderBase::with_layout(term, layout), color)
    }

    /// Frame 2×4 avec un seul pixel sombre en (x, y).
    fn single_dot(x: u32, y: u32) -> RawFrame {
        let pixels: Vec<Rgb> = (0..8)
            .map(|i| if i % 2 == x && i / 2 == y { BLACK } else { WHITE })
            .collect();
        RawFrame::from_pixels(2, 4, &pixels)
    }

    #[test]
    fn dot_permutation_is_not_row_major() {
        let expected = [(0, 0, 0), (1, 0, 3), (0, 1, 1), (1, 1, 4), (0, 2, 2), (1, 2, 5), (0, 3, 6), (1, 3, 7)];
        for (cx, cy, bit) in expected {
            assert_eq!(dot_bit(cx, cy), bit, "({cx},{cy})");
        }
    }

    #[test]
    fn top_right_dot_sets_bit_three() {
        let out = renderer(false).render(&single_dot(1, 0));
        assert_eq!(out, EncodedFrame::Lines(vec![braille_char(1 << 3).to_string()]));
        assert_eq!(braille_char(1 << 3), '⠈');
    }

    #[test]
    fn every_single_dot() {
        for y in 0..4 {
            for x in 0..2 {
                let out = renderer(false).render(&single_dot(x, y));
                let expected = braille_char(1 << dot_bit(x, y)).to_string();
                assert_eq!(out, EncodedFrame::Lines(vec![expected]));
            }
        }
    }

    #[test]
    fn all_dark_is_full_cell() {
        let frame = RawFrame::from_pixels(2, 4, &[BLACK; 8]);
        assert_eq!(
            renderer(false).render(&frame),
            EncodedFrame::Lines(vec!["⣿".into()])
        );
    }

    #[test]
    fn color_is_mean_of_samples() {
        // 4 pixels (200,100,0), 4 pixels blancs → moyenne (227,177,127).
        let c: Rgb = (200, 100, 0);
        let frame = RawFrame::from_pixels(2, 4, &[c, c, WHITE, WHITE, c, c, WHITE, WHITE]);
        let EncodedFrame::Lines(lines) = renderer(true).render(&frame) else {
            panic!("braille renders lines");
        };
        assert!(lines[0].starts_with("\x1b[38;2;227;177;127m"));
        assert!(lines[0].ends_with(COLOR_RESET));
    }
}
