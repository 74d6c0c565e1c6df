use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Dimensions vidéo ou terminal nulles : aucun layout calculable.
    #[error("Géométrie invalide : {width}×{height}")]
    InvalidGeometry {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Mode de rendu inconnu (choix fermé : ascii, block, braille, sixel).
    #[error("Mode de rendu non supporté : {mode}")]
    UnsupportedRenderMode {
        /// The mode string that was requested.
        mode: String,
    },

    /// Détection fps/résolution échouée. Récupérable avec les valeurs par défaut.
    #[error("Probe échoué : {0}")]
    Probe(String),

    /// Lecture du flux décodé échouée (autre qu'une fin de flux propre).
    #[error("Flux de décodage interrompu : {0}")]
    DecodeStream(String),

    /// Erreur I/O brute pendant la lecture d'une frame.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
