use rayon::prelude::*;
use tvp_core::charset::ramp_glyph;
use tvp_core::frame::{RawFrame, luminance};
use tvp_core::sample::sample_at;

use crate::base::{EncodedFrame, RenderBase};

/// Un échantillon par cellule ; la cellule terminal est ~2× plus haute que large.
pub const ASCII_CELL_ASPECT: f64 = 0.5;

/// Renderer par rampe de luminance. Monochrome.
#[derive(Clone, Debug)]
pub struct AsciiRenderer {
    /// Terminal cible et layout calculé.
    pub base: RenderBase,
}

impl AsciiRenderer {
    /// Renderer non initialisé sur `base`.
    #[must_use]
    pub fn new(base: RenderBase) -> Self {
        Self { base }
    }

    /// Encode une frame : `cell_width` glyphes × `cell_height` lignes.
    ///
    /// Pour chaque cellule, échantillonne un pixel, calcule sa luminance
    /// BT.709 et la projette sur la rampe de glyphes.
    ///
    /// # Example
    /// ```
    /// use tvp_core::frame::RawFrame;
    /// use tvp_core::layout::{FrameLayout, TerminalGeometry};
    /// use tvp_render::ascii::AsciiRenderer;
    /// use tvp_render::{EncodedFrame, RenderBase};
    ///
    /// let term = TerminalGeometry { cols: 2, rows: 1 };
    /// let layout = FrameLayout { cell_width: 2, cell_height: 1, pad_x: 0, pad_y: 0 };
    /// let renderer = AsciiRenderer::new(RenderBase::with_layout(term, layout));
    /// let frame = RawFrame::from_pixels(2, 1, &[(0, 0, 0), (255, 255, 255)]);
    /// assert_eq!(renderer.render(&frame), EncodedFrame::Lines(vec!["█ ".into()]));
    /// ```
    #[must_use]
    pub fn render(&self, frame: &RawFrame) -> EncodedFrame {
        let w = self.base.layout.cell_width;
        let h = self.base.layout.cell_height;

        let lines = (0..h)
            .into_par_iter()
            .map(|cy| {
                (0..w)
                    .map(|cx| ramp_glyph(luminance(sample_at(frame, w, h, cx, cy))))
                    .collect::<String>()
            })
            .collect();

        EncodedFrame::Lines(lines)
    }
}
