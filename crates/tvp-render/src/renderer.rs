use tvp_core::config::RenderMode;
use tvp_core::error::CoreError;
use tvp_core::frame::RawFrame;
use tvp_core::layout::{FrameLayout, TerminalGeometry};

use crate::ascii::{ASCII_CELL_ASPECT, AsciiRenderer};
use crate::base::{EncodedFrame, RenderBase};
use crate::block::{BLOCK_CELL_ASPECT, BlockRenderer};
use crate::braille::{BRAILLE_CELL_ASPECT, BrailleRenderer};
use crate::sixel::{SIXEL_CELL_ASPECT, SixelRenderer};

/// Renderer sélectionné au démarrage. Ensemble fermé de variantes.
///
/// # Example
/// ```
/// use tvp_core::config::RenderMode;
/// use tvp_core::frame::RawFrame;
/// use tvp_core::layout::TerminalGeometry;
/// use tvp_render::Renderer;
///
/// let term = TerminalGeometry { cols: 80, rows: 24 };
/// let mut renderer = Renderer::new(RenderMode::Braille, true, term);
/// renderer.initialize(1920, 1080).unwrap();
/// assert_eq!(renderer.dimensions(), (80, 22));
/// assert_eq!(renderer.decode_size(), (160, 88));
/// let (w, h) = renderer.decode_size();
/// let _out = renderer.render(&RawFrame::new(w, h));
/// ```
#[derive(Clone, Debug)]
pub enum Renderer {
    /// Rampe de luminance, monochrome.
    Ascii(AsciiRenderer),
    /// Demi-blocs, 2 sous-pixels verticaux par cellule.
    Block(BlockRenderer),
    /// Points Braille, 2×4 sous-pixels par cellule.
    Braille(BrailleRenderer),
    /// Flux sixel, palette reconstruite à chaque frame.
    Sixel(SixelRenderer),
}

impl Renderer {
    /// Construit le renderer du mode demandé, non initialisé.
    ///
    /// `color` est ignoré par ascii (monochrome) et sixel (couleur seule).
    #[must_use]
    pub fn new(mode: RenderMode, color: bool, term: TerminalGeometry) -> Self {
        let base = RenderBase::new(term);
        match mode {
            RenderMode::Ascii => Self::Ascii(AsciiRenderer::new(base)),
            RenderMode::Block => Self::Block(BlockRenderer::new(base, color)),
            RenderMode::Braille => Self::Braille(BrailleRenderer::new(base, color)),
            RenderMode::Sixel => Self::Sixel(SixelRenderer::new(base)),
        }
    }

    /// Mode correspondant à la variante.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Ascii(_) => RenderMode::Ascii,
            Self::Block(_) => RenderMode::Block,
            Self::Braille(_) => RenderMode::Braille,
            Self::Sixel(_) => RenderMode::Sixel,
        }
    }

    /// Ratio d'aspect de cellule propre au mode.
    #[must_use]
    pub fn cell_aspect(&self) -> f64 {
        match self {
            Self::Ascii(_) => ASCII_CELL_ASPECT,
            Self::Block(_) => BLOCK_CELL_ASPECT,
            Self::Braille(_) => BRAILLE_CELL_ASPECT,
            Self::Sixel(_) => SIXEL_CELL_ASPECT,
        }
    }

    /// Sous-échantillons (colonnes, lignes) par cellule.
    #[must_use]
    pub fn subsamples(&self) -> (u32, u32) {
        match self {
            Self::Ascii(_) | Self::Sixel(_) => (1, 1),
            Self::Block(_) => (1, 2),
            Self::Braille(_) => (2, 4),
        }
    }

    /// `false` si le mode n'a pas de rendu en niveaux de gris.
    #[must_use]
    pub fn supports_monochrome(&self) -> bool {
        !matches!(self, Self::Sixel(_))
    }

    fn base(&self) -> &RenderBase {
        match self {
            Self::Ascii(r) => &r.base,
            Self::Block(r) => &r.base,
            Self::Braille(r) => &r.base,
            Self::Sixel(r) => &r.base,
        }
    }

    fn base_mut(&mut self) -> &mut RenderBase {
        match self {
            Self::Ascii(r) => &mut r.base,
            Self::Block(r) => &mut r.base,
            Self::Braille(r) => &mut r.base,
            Self::Sixel(r) => &mut r.base,
        }
    }

    /// Calcule le layout pour la vidéo source. Une fois par session.
    ///
    /// # Errors
    /// `CoreError::InvalidGeometry` si une dimension vidéo ou terminal est nulle.
    pub fn initialize(&mut self, video_w: u32, video_h: u32) -> Result<FrameLayout, CoreError> {
        let aspect = self.cell_aspect();
        let layout = self.base_mut().initialize(video_w, video_h, aspect)?;
        log::debug!(
            "renderer {}: {video_w}x{video_h} → {}x{} cellules, padding ({}, {})",
            self.mode(),
            layout.cell_width,
            layout.cell_height,
            layout.pad_x,
            layout.pad_y
        );
        Ok(layout)
    }

    /// Layout courant.
    #[must_use]
    pub fn layout(&self) -> FrameLayout {
        self.base().layout
    }

    /// Dimensions de la frame en cellules (largeur, hauteur).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        let l = self.base().layout;
        (l.cell_width, l.cell_height)
    }

    /// Offsets de centrage (colonnes, lignes).
    #[must_use]
    pub fn padding(&self) -> (u32, u32) {
        let l = self.base().layout;
        (l.pad_x, l.pad_y)
    }

    /// Résolution de décodage qui donne un pixel source par sous-échantillon.
    #[must_use]
    pub fn decode_size(&self) -> (u32, u32) {
        let (w, h) = self.dimensions();
        let (sx, sy) = self.subsamples();
        (w * sx, h * sy)
    }

    /// Encode une frame. Pure : même frame, même sortie.
    #[must_use]
    pub fn render(&self, frame: &RawFrame) -> EncodedFrame {
        match self {
            Self::Ascii(r) => r.render(frame),
            Self::Block(r) => r.render(frame),
            Self::Braille(r) => r.render(frame),
            Self::Sixel(r) => r.render(frame),
        }
    }
}
