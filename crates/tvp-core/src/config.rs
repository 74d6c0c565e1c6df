use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Configuration complète d'une session de lecture.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use tvp_core::config::{PlayerConfig, RenderMode};
/// let config = PlayerConfig::default();
/// assert_eq!(config.render_mode, RenderMode::Ascii);
/// assert_eq!(config.fallback.fps, 24.0);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PlayerConfig {
    /// Renderer utilisé pour toute la session.
    pub render_mode: RenderMode,
    /// Activer la couleur truecolor. Désactivé : frames converties en gris.
    pub color_enabled: bool,
    /// FPS forcé. `None` = fps détecté par ffprobe.
    pub target_fps: Option<f64>,
    /// Valeurs de repli quand un probe échoue.
    pub fallback: FallbackConfig,
}

/// Valeurs utilisées quand ffprobe ou la requête terminal échouent.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FallbackConfig {
    /// Images par seconde.
    pub fps: f64,
    /// Largeur vidéo en pixels.
    pub video_width: u32,
    /// Hauteur vidéo en pixels.
    pub video_height: u32,
    /// Colonnes terminal.
    pub term_cols: u32,
    /// Lignes terminal.
    pub term_rows: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            fps: 24.0,
            video_width: 1920,
            video_height: 1080,
            term_cols: 80,
            term_rows: 24,
        }
    }
}

/// Render mode enumeration. Ensemble fermé.
///
/// # Example
/// ```
/// use tvp_core::config::RenderMode;
/// let mode: RenderMode = "braille".parse().unwrap();
/// assert_eq!(mode, RenderMode::Braille);
/// assert!("vt100".parse::<RenderMode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rampe de luminance, un glyphe par pixel échantillonné.
    #[default]
    Ascii,
    /// Demi-blocs (▀/▄/█), 2 sous-pixels verticaux par cellule.
    Block,
    /// Braille Unicode (2×4 sous-pixels).
    Braille,
    /// Protocole sixel, palette quantifiée par frame.
    Sixel,
}

impl RenderMode {
    /// Tous les modes, dans l'ordre d'affichage.
    pub const ALL: [Self; 4] = [Self::Ascii, Self::Block, Self::Braille, Self::Sixel];

    /// Nom canonique (CLI, config).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Block => "block",
            Self::Braille => "braille",
            Self::Sixel => "sixel",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "block" | "halfblock" => Ok(Self::Block),
            "braille" => Ok(Self::Braille),
            "sixel" | "wire" | "wire-color" => Ok(Self::Sixel),
            _ => Err(CoreError::UnsupportedRenderMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Ascii,
            color_enabled: true,
            target_fps: None,
            fallback: FallbackConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        if let Some(fps) = self.target_fps
            && !(1.0..=240.0).contains(&fps)
        {
            log::warn!("fps {fps} hors de [1, 240], valeur corrigée");
        }
        self.target_fps = self
            .target_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| fps.clamp(1.0, 240.0));
        if !self.fallback.fps.is_finite() || self.fallback.fps <= 0.0 {
            self.fallback.fps = FallbackConfig::default().fps;
        }
        self.fallback.fps = self.fallback.fps.clamp(1.0, 240.0);
        self.fallback.video_width = self.fallback.video_width.max(1);
        self.fallback.video_height = self.fallback.video_height.max(1);
        self.fallback.term_cols = self.fallback.term_cols.max(1);
        self.fallback.term_rows = self.fallback.term_rows.max(1);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    fallback: Option<FallbackSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    mode: Option<String>,
    color: Option<bool>,
    fps: Option<f64>,
}

/// Fallback section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct FallbackSection {
    fps: Option<f64>,
    video_width: Option<u32>,
    video_height: Option<u32>,
    term_cols: Option<u32>,
    term_rows: Option<u32>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or names an
/// unknown render mode.
///
/// # Example
/// ```no_run
/// use tvp_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("tvp.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PlayerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config =
        parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))?;
    log::debug!("config chargée : {} ({})", path.display(), config.render_mode);
    Ok(config)
}

/// Parse une config TOML (sections `[render]` et `[fallback]`).
///
/// # Errors
/// Returns an error on TOML syntax errors or an unknown render mode.
///
/// # Example
/// ```
/// use tvp_core::config::{parse_config, RenderMode};
/// let config = parse_config("[render]\nmode = \"block\"\ncolor = false\n").unwrap();
/// assert_eq!(config.render_mode, RenderMode::Block);
/// assert!(!config.color_enabled);
/// ```
pub fn parse_config(content: &str) -> Result<PlayerConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = PlayerConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.mode {
            config.render_mode = v.parse()?;
        }
        if let Some(v) = r.color {
            config.color_enabled = v;
        }
        if r.fps.is_some() {
            config.target_fps = r.fps;
        }
    }

    if let Some(f) = file.fallback {
        if let Some(v) = f.fps {
            config.fallback.fps = v;
        }
        if let Some(v) = f.video_width {
            config.fallback.video_width = v;
        }
        if let Some(v) = f.video_height {
            config.fallback.video_height = v;
        }
        if let Some(v) = f.term_cols {
            config.fallback.term_cols = v;
        }
        if let Some(v) = f.term_rows {
            config.fallback.term_rows = v;
        }
    }

    config.clamp_all();
    Ok(config)
}
