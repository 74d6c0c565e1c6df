use std::fmt::Write;

use tvp_core::error::CoreError;
use tvp_core::frame::Rgb;
use tvp_core::layout::{FrameLayout, TerminalGeometry};

/// Reset couleur ANSI (fin de ligne).
pub const COLOR_RESET: &str = "\x1b[0m";

/// État commun à tous les renderers : terminal cible + layout calculé.
///
/// Embarqué par valeur dans chaque renderer.
#[derive(Clone, Copy, Debug)]
pub struct RenderBase {
    /// Terminal de la session.
    pub term: TerminalGeometry,
    /// Layout calculé par `initialize`. Vide avant.
    pub layout: FrameLayout,
}

impl RenderBase {
    /// Base non initialisée pour un terminal donné.
    #[must_use]
    pub fn new(term: TerminalGeometry) -> Self {
        Self {
            term,
            layout: FrameLayout::default(),
        }
    }

    /// Calcule et mémorise le layout pour la vidéo source.
    ///
    /// # Errors
    /// `CoreError::InvalidGeometry` si une dimension est nulle.
    pub fn initialize(
        &mut self,
        video_w: u32,
        video_h: u32,
        cell_aspect: f64,
    ) -> Result<FrameLayout, CoreError> {
        self.layout =
            FrameLayout::fit(video_w, video_h, self.term.cols, self.term.rows, cell_aspect)?;
        Ok(self.layout)
    }

    /// Base avec un layout imposé (tests, tailles fixes).
    #[must_use]
    pub fn with_layout(term: TerminalGeometry, layout: FrameLayout) -> Self {
        Self { term, layout }
    }
}

/// Sortie encodée d'une frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodedFrame {
    /// Lignes de texte (ascii, block, braille).
    ///
    /// Aucune ligne ne porte de `\n` : la composition les sépare sans saut
    /// final, une frame pleine hauteur ne fait donc jamais défiler le terminal.
    Lines(Vec<String>),
    /// Séquence d'échappement opaque (sixel).
    Blob(String),
}

/// Ajoute une séquence truecolor foreground `ESC[38;2;R;G;Bm`.
#[inline]
pub fn push_fg(out: &mut String, (r, g, b): Rgb) {
    // Écrire dans une String ne peut pas échouer.
    let _ = write!(out, "\x1b[38;2;{r};{g};{b}m");
}
