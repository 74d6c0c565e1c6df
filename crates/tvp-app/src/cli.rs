use std::path::PathBuf;

use clap::Parser;

/// tvp — lecteur vidéo dans le terminal (ascii, block, braille, sixel).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier vidéo à lire (tout format lisible par ffmpeg).
    #[arg(short, long)]
    pub file: PathBuf,

    /// Mode de rendu : ascii, block, braille, sixel.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Désactiver la couleur (frames converties en niveaux de gris).
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// FPS forcé (ignore le fps détecté).
    #[arg(long)]
    pub fps: Option<f64>,

    /// Fichier de configuration TOML. Défaut : tvp.toml.
    #[arg(short, long, default_value = "tvp.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_is_required() {
        assert!(Cli::try_parse_from(["tvp"]).is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["tvp", "-f", "clip.mp4"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("clip.mp4"));
        assert_eq!(cli.config, PathBuf::from("tvp.toml"));
        assert_eq!(cli.log_level, "warn");
        assert!(cli.mode.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "tvp", "--file", "a.mkv", "--mode", "braille", "--no-color", "--fps", "12.5",
        ])
        .unwrap();
        assert_eq!(cli.mode.as_deref(), Some("braille"));
        assert!(cli.no_color);
        assert_eq!(cli.fps, Some(12.5));
    }
}
