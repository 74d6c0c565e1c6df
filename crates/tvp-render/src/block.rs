use rayon::prelude::*;
use tvp_core::frame::{RawFrame, Rgb, is_dark};
use tvp_core::sample::sample_at;

use crate::base::{COLOR_RESET, EncodedFrame, RenderBase, push_fg};

/// Chaque cellule empile 2 sous-pixels verticaux.
pub const BLOCK_CELL_ASPECT: f64 = 0.5;

/// Choisit le glyphe demi-bloc et la couleur pour une paire haut/bas.
///
/// Sombre = glyphe dessiné. La couleur retenue est celle du sous-pixel dessiné
/// (haut si les deux, haut pour l'espace).
///
/// # Example
/// ```
/// use tvp_render::block::half_block;
/// assert_eq!(half_block((0, 0, 0), (255, 255, 255)).0, '▀');
/// assert_eq!(half_block((255, 255, 255), (9, 9, 9)), ('▄', (9, 9, 9)));
/// ```
#[inline]
#[must_use]
pub fn half_block(top: Rgb, bottom: Rgb) -> (char, Rgb) {
    match (is_dark(top), is_dark(bottom)) {
        (true, true) => ('█', top),
        (true, false) => ('▀', top),
        (false, true) => ('▄', bottom),
        (false, false) => (' ', top),
    }
}

/// Renderer demi-blocs : résolution verticale doublée.
#[derive(Clone, Debug)]
pub struct BlockRenderer {
    /// Terminal cible et layout calculé.
    pub base: RenderBase,
    /// Émettre les séquences truecolor.
    pub color: bool,
}

impl BlockRenderer {
    /// Renderer non initialisé sur `base`.
    #[must_use]
    pub fn new(base: RenderBase, color: bool) -> Self {
        Self { base, color }
    }

    /// Encode une frame, sous-pixels haut/bas seuillés indépendamment.
    #[must_use]
    pub fn render(&self, frame: &RawFrame) -> EncodedFrame {
        let w = self.base.layout.cell_width;
        let h = self.base.layout.cell_height;
        let pixel_h = h * 2;

        let lines = (0..h)
            .into_par_iter()
            .map(|cy| {
                let mut line = String::with_capacity(w as usize * if self.color { 24 } else { 3 });
                for cx in 0..w {
                    let top = sample_at(frame, w, pixel_h, cx, cy * 2);
                    let bottom = sample_at(frame, w, pixel_h, cx, cy * 2 + 1);
                    let (ch, rgb) = half_block(top, bottom);
                    if self.color {
                        push_fg(&mut line, rgb);
                    }
                    line.push(ch);
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
    use tvp_core::layout::{FrameLayout, TerminalGeometry};

    use super::*;

    const BLACK: Rgb = (0, 0, 0);
    const WHITE: Rgb = (255, 255, 255);

    fn renderer(w: u32, h: u32, color: bool) -> BlockRenderer {
        let term = TerminalGeometry { cols: w, rows: h };
        let layout = FrameLayout {
            cell_width: w,
            cell_height: h,
            pad_x: 0,
            pad_y: 0,
        };
        BlockRenderer::new(RenderBase::with_layout(term, layout), color)
    }

    #[test]
    fn four_cases() {
        assert_eq!(half_block(BLACK, BLACK), ('█', BLACK));
        assert_eq!(half_block(BLACK, WHITE), ('▀', BLACK));
        assert_eq!(half_block(WHITE, BLACK), ('▄', BLACK));
        assert_eq!(half_block(WHITE, WHITE), (' ', WHITE));
    }

    #[test]
    fn monochrome_row() {
        // 4 colonnes × 2 lignes de pixels → 4 cellules × 1 ligne.
        let frame = RawFrame::from_pixels(
            4,
            2,
            &[BLACK, BLACK, WHITE, WHITE, BLACK, WHITE, BLACK, WHITE],
        );
        assert_eq!(
            renderer(4, 1, false).render(&frame),
            EncodedFrame::Lines(vec!["█▀▄ ".into()])
        );
    }

    #[test]
    fn color_uses_true_rgb_and_resets() {
        let red: Rgb = (200, 0, 0);
        let frame = RawFrame::from_pixels(1, 2, &[red, WHITE]);
        let EncodedFrame::Lines(lines) = renderer(1, 1, true).render(&frame) else {
            panic!("block renders lines");
        };
        assert_eq!(lines, vec!["\x1b[38;2;200;0;0m▀\x1b[0m".to_string()]);
    }
}
