use std::collections::HashMap;
use std::fmt::Write;

use tvp_core::frame::{RawFrame, Rgb};
use tvp_core::sample::sample_at;

use crate::base::{EncodedFrame, RenderBase};

/// Pixels sixel carrés : un échantillon par pixel de sortie.
pub const SIXEL_CELL_ASPECT: f64 = 1.0;

/// Nombre maximal de registres couleur.
pub const PALETTE_CAPACITY: usize = 256;

/// Hauteur d'une bande sixel, en pixels.
pub const BAND_HEIGHT: u32 = 6;

/// Début de séquence DCS sixel.
pub const SIXEL_START: &str = "\x1bPq";
/// Fin de séquence (String Terminator).
pub const SIXEL_END: &str = "\x1b\\";

/// Palette premier-arrivé-premier-servi, reconstruite à chaque frame.
///
/// Au-delà de 256 couleurs distinctes, les nouvelles couleurs n'ont pas
/// d'index et ne sont pas dessinées.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    index: HashMap<u32, u8>,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Enregistre une couleur ; retourne son index, `None` si la palette est pleine.
    ///
    /// # Example
    /// ```
    /// use tvp_render::sixel::Palette;
    /// let mut palette = Palette::default();
    /// assert_eq!(palette.insert((1, 2, 3)), Some(0));
    /// assert_eq!(palette.insert((9, 9, 9)), Some(1));
    /// assert_eq!(palette.insert((1, 2, 3)), Some(0));
    /// ```
    pub fn insert(&mut self, rgb: Rgb) -> Option<u8> {
        let key = rgb_key(rgb);
        if let Some(&idx) = self.index.get(&key) {
            return Some(idx);
        }
        if self.colors.len() >= PALETTE_CAPACITY {
            return None;
        }
        let idx = self.colors.len() as u8;
        self.index.insert(key, idx);
        self.colors.push(rgb);
        Some(idx)
    }

    /// Index d'une couleur déjà enregistrée.
    #[must_use]
    pub fn get(&self, rgb: Rgb) -> Option<u8> {
        self.index.get(&rgb_key(rgb)).copied()
    }

    /// Couleurs enregistrées, dans l'ordre des index.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Nombre de couleurs enregistrées (256 au plus).
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// `true` tant qu'aucune couleur n'est enregistrée.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[inline(always)]
fn rgb_key((r, g, b): Rgb) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Composante 0..255 → échelle sixel 0..100.
#[inline(always)]
fn percent(c: u8) -> u32 {
    u32::from(c) * 100 / 255
}

/// Renderer sixel. Couleur uniquement, pas de variante monochrome.
#[derive(Clone, Debug)]
pub struct SixelRenderer {
    /// Terminal cible et layout calculé.
    pub base: RenderBase,
}

impl SixelRenderer {
    /// Renderer non initialisé sur `base`.
    #[must_use]
    pub fn new(base: RenderBase) -> Self {
        Self { base }
    }

    /// Échantillonne la grille de sortie et construit la palette de la frame.
    ///
    /// Retourne la palette et, pour chaque pixel, son index (`None` = hors palette).
    #[must_use]
    pub fn quantize(&self, frame: &RawFrame) -> (Palette, Vec<Option<u8>>) {
        let w = self.base.layout.cell_width;
        let h = self.base.layout.cell_height;

        let mut palette = Palette::default();
        let mut indices = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                indices.push(palette.insert(sample_at(frame, w, h, x, y)));
            }
        }
        (palette, indices)
    }

    /// Encode une frame en séquence sixel complète.
    ///
    /// Passe 1 : palette + définitions `#i;2;r;g;b`. Passe 2 : bandes de
    /// 6 lignes, une passe par couleur présente (`#i` + un octet par colonne,
    /// `$` pour revenir en début de bande), `-` en fin de bande.
    ///
    /// # Example
    /// ```
    /// use tvp_core::frame::RawFrame;
    /// use tvp_core::layout::{FrameLayout, TerminalGeometry};
    /// use tvp_render::sixel::SixelRenderer;
    /// use tvp_render::{EncodedFrame, RenderBase};
    ///
    /// let term = TerminalGeometry { cols: 1, rows: 1 };
    /// let layout = FrameLayout { cell_width: 1, cell_height: 1, pad_x: 0, pad_y: 0 };
    /// let renderer = SixelRenderer::new(RenderBase::with_layout(term, layout));
    /// let frame = RawFrame::from_pixels(1, 1, &[(255, 0, 0)]);
    /// assert_eq!(
    ///     renderer.render(&frame),
    ///     EncodedFrame::Blob("\x1bPq#0;2;100;0;0#0@$-\x1b\\".into())
    /// );
    /// ```
    #[must_use]
    pub fn render(&self, frame: &RawFrame) -> EncodedFrame {
        let w = self.base.layout.cell_width as usize;
        let h = self.base.layout.cell_height as usize;
        let (palette, indices) = self.quantize(frame);

        let mut out = String::with_capacity(palette.len() * 16 + w * h.div_ceil(6) * 4 + 16);
        out.push_str(SIXEL_START);

        for (i, &(r, g, b)) in palette.colors().iter().enumerate() {
            let _ = write!(out, "#{i};2;{};{};{}", percent(r), percent(g), percent(b));
        }

        let band = BAND_HEIGHT as usize;
        let mut present = [false; PALETTE_CAPACITY];
        for y0 in (0..h).step_by(band) {
            let rows = band.min(h - y0);
            let band_indices = &indices[y0 * w..(y0 + rows) * w];

            present.fill(false);
            for idx in band_indices.iter().flatten() {
                present[*idx as usize] = true;
            }

            for color in (0..palette.len()).filter(|&c| present[c]) {
                let _ = write!(out, "#{color}");
                for x in 0..w {
                    let mut mask = 0u8;
                    for dy in 0..rows {
                        if band_indices[dy * w + x] == Some(color as u8) {
                            mask |= 1 << dy;
                        }
                    }
                    out.push(char::from(0x3F + mask));
                }
                out.push('$');
            }
            out.push('-');
        }

        out.push_str(SIXEL_END);
        EncodedFrame::Blob(out)
    }
}

#[cfg(test)]
mod tests {
    use tvp_core::layout::{FrameLayout, TerminalGeometry};

    use super::*;

    fn renderer(w: u32, h: u32) -> SixelRenderer {
        let term = TerminalGeometry { cols: w, rows: h };
        let layout = FrameLayout {
            cell_width: w,
            cell_height: h,
            pad_x: 0,
            pad_y: 0,
        };
        SixelRenderer::new(RenderBase::with_layout(term, layout))
    }

    fn blob(frame: &EncodedFrame) -> &str {
        match frame {
            EncodedFrame::Blob(s) => s,
            EncodedFrame::Lines(_) => panic!("sixel renders a blob"),
        }
    }

    #[test]
    fn palette_caps_at_256() {
        // 20×20 = 400 couleurs distinctes.
        let pixels: Vec<Rgb> = (0..400u32).map(|i| ((i % 256) as u8, (i / 256) as u8, 7)).collect();
        let frame = RawFrame::from_pixels(20, 20, &pixels);
        let r = renderer(20, 20);

        let (palette, indices) = r.quantize(&frame);
        assert_eq!(palette.len(), PALETTE_CAPACITY);
        assert_eq!(indices.iter().filter(|i| i.is_none()).count(), 400 - 256);
        assert_eq!(indices[255], Some(255));
        assert_eq!(indices[256], None);
        assert_eq!(palette.get((255, 0, 7)), Some(255));
        assert_eq!(palette.get((0, 1, 7)), None);

        let out = r.render(&frame);
        let text = blob(&out);
        let definitions = text.split('#').filter(|s| s.contains(";2;")).count();
        assert_eq!(definitions, PALETTE_CAPACITY);
    }

    #[test]
    fn overflow_colors_are_empty_columns() {
        // Ligne unique : 256 couleurs puis une 257e en dernière colonne.
        let mut pixels: Vec<Rgb> = (0..256u32).map(|i| (i as u8, 0, 0)).collect();
        pixels.push((0, 0, 255));
        let frame = RawFrame::from_pixels(257, 1, &pixels);
        let out = renderer(257, 1).render(&frame);
        let text = blob(&out);
        let body = text
            .strip_prefix(SIXEL_START)
            .and_then(|s| s.strip_suffix(SIXEL_END))
            .unwrap();
        let runs: Vec<&str> = body
            .split('#')
            .filter(|s| !s.is_empty() && !s.contains(';'))
            .collect();
        assert_eq!(runs.len(), PALETTE_CAPACITY);
        // Aucune passe couleur ne dessine la dernière colonne.
        for run in runs {
            let data = run
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_end_matches(['$', '-']);
            assert_eq!(data.chars().count(), 257);
            assert_eq!(data.chars().last(), Some('?'), "run {run:?}");
        }
    }

    #[test]
    fn band_bitmask_and_line_advance() {
        // 1 colonne × 7 lignes : noir, blanc alternés → 2 bandes.
        let k: Rgb = (0, 0, 0);
        let wh: Rgb = (255, 255, 255);
        let frame = RawFrame::from_pixels(1, 7, &[k, wh, k, wh, k, wh, k]);
        let out = renderer(1, 7).render(&frame);
        // Bande 1 : noir = bits 0,2,4 (0x15), blanc = bits 1,3,5 (0x2A).
        // Bande 2 : noir = bit 0 seulement, blanc absent.
        let expected = format!(
            "{SIXEL_START}#0;2;0;0;0#1;2;100;100;100#0{}$#1{}$-#0@$-{SIXEL_END}",
            char::from(0x3F + 0x15),
            char::from(0x3F + 0x2A),
        );
        assert_eq!(blob(&out), expected);
    }

    #[test]
    fn palette_is_rebuilt_every_frame() {
        let r = renderer(1, 1);
        let first = r.render(&RawFrame::from_pixels(1, 1, &[(255, 0, 0)]));
        let second = r.render(&RawFrame::from_pixels(1, 1, &[(0, 255, 0)]));
        assert!(blob(&second).starts_with("\x1bPq#0;2;0;100;0"));
        assert_ne!(first, second);
    }

    #[test]
    fn rendering_is_idempotent() {
        let pixels: Vec<Rgb> = (0..64u8).map(|i| (i * 4, 0, 255 - i)).collect();
        let frame = RawFrame::from_pixels(8, 8, &pixels);
        let r = renderer(8, 8);
        assert_eq!(r.render(&frame), r.render(&frame));
    }
}
