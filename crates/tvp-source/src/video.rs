// Décodage via ffmpeg/ffprobe en subprocess (std::process::Command).
// Prérequis : `ffmpeg` et `ffprobe` accessibles dans PATH.
//
// Architecture :
//   - `probe_video`      : interroge ffprobe (JSON) pour width/height/fps
//   - `PipeSource`       : découpe un flux RGB24 brut en frames de taille fixe
//   - `FfmpegSource`     : lance ffmpeg → flux rgb24 sur stdout, implémente `FrameSource`

use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tvp_core::error::CoreError;
use tvp_core::frame::RawFrame;
use tvp_core::traits::FrameSource;

/// Réponse `ffprobe -print_format json -show_streams`.
#[derive(Debug, Deserialize)]
struct FfprobeResponse {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

/// Premier flux vidéo tel que rapporté par ffprobe.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ProbeStream {
    /// Type de flux (`"video"`, `"audio"`, ...).
    #[serde(default)]
    pub codec_type: String,
    /// FPS moyen, rationnel (`"24000/1001"`).
    #[serde(default)]
    pub avg_frame_rate: String,
    /// FPS nominal, rationnel.
    #[serde(default)]
    pub r_frame_rate: String,
    /// Largeur en pixels.
    #[serde(default)]
    pub width: u32,
    /// Hauteur en pixels.
    #[serde(default)]
    pub height: u32,
}

impl ProbeStream {
    /// FPS moyen, repli sur `r_frame_rate` si absent ou invalide.
    ///
    /// # Errors
    /// Retourne une erreur si aucun des deux champs n'est un fps positif.
    ///
    /// # Example
    /// ```
    /// use tvp_source::video::ProbeStream;
    /// let stream = ProbeStream {
    ///     avg_frame_rate: "0/0".into(),
    ///     r_frame_rate: "30000/1001".into(),
    ///     ..Default::default()
    /// };
    /// assert!((stream.fps().unwrap() - 29.97).abs() < 0.01);
    /// ```
    pub fn fps(&self) -> Result<f64> {
        parse_frame_rate(&self.avg_frame_rate)
            .or_else(|_| parse_frame_rate(&self.r_frame_rate))
            .context("Frame rate illisible")
    }

    /// Résolution native (largeur, hauteur).
    ///
    /// # Errors
    /// Retourne une erreur si une dimension est nulle.
    pub fn resolution(&self) -> Result<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            bail!("Résolution invalide : {}x{}", self.width, self.height);
        }
        Ok((self.width, self.height))
    }
}

/// Parse un frame rate rationnel ffprobe (`"24/1"`, `"30000/1001"`).
///
/// # Errors
/// Chaîne vide, `0/0`, format invalide, dénominateur nul ou fps ≤ 0.
///
/// # Example
/// ```
/// use tvp_source::video::parse_frame_rate;
/// assert_eq!(parse_frame_rate("24/1").unwrap(), 24.0);
/// assert!(parse_frame_rate("0/0").is_err());
/// assert!(parse_frame_rate("25").is_err());
/// ```
pub fn parse_frame_rate(rate: &str) -> Result<f64> {
    let rate = rate.trim();
    if rate.is_empty() || rate == "0/0" {
        bail!("Frame rate absent");
    }
    let Some((num, den)) = rate.split_once('/') else {
        bail!("Format de frame rate invalide : {rate}");
    };
    let num: f64 = num.parse().with_context(|| format!("Numérateur invalide : {num}"))?;
    let den: f64 = den.parse().with_context(|| format!("Dénominateur invalide : {den}"))?;
    if den == 0.0 {
        bail!("Division par zéro dans le frame rate : {rate}");
    }
    let fps = num / den;
    if !fps.is_finite() || fps <= 0.0 {
        bail!("Frame rate non positif : {rate}");
    }
    Ok(fps)
}

/// Parse la sortie JSON de ffprobe et retourne le premier flux, qui doit être vidéo.
///
/// # Errors
/// JSON invalide, aucun flux, ou premier flux non vidéo.
pub fn parse_probe(json: &str) -> Result<ProbeStream> {
    let response: FfprobeResponse =
        serde_json::from_str(json).context("Sortie ffprobe non parsable")?;
    let Some(stream) = response.streams.into_iter().next() else {
        bail!("Aucun flux vidéo trouvé");
    };
    if stream.codec_type != "video" {
        bail!("Le premier flux n'est pas vidéo ({})", stream.codec_type);
    }
    Ok(stream)
}

/// Interroge `ffprobe` pour obtenir les métadonnées du flux vidéo principal.
///
/// # Errors
/// Retourne une erreur si `ffprobe` est introuvable, échoue, ou si le
/// fichier ne contient aucun flux vidéo.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use tvp_source::video::probe_video;
/// let stream = probe_video(Path::new("video.mkv")).unwrap();
/// let (w, h) = stream.resolution().unwrap();
/// ```
pub fn probe_video(path: &Path) -> Result<ProbeStream> {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_streams", "-select_streams", "v:0"])
        .arg(path)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .context(
            "Impossible de lancer ffprobe. Vérifiez que ffprobe est installé et dans le PATH.",
        )?;

    if !output.status.success() {
        bail!("ffprobe a échoué ({}) sur {}", output.status, path.display());
    }

    let stream = parse_probe(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("Probe de {}", path.display()))?;
    log::info!(
        "probe_video: {}x{} avg={} r={} — {}",
        stream.width,
        stream.height,
        stream.avg_frame_rate,
        stream.r_frame_rate,
        path.display()
    );
    Ok(stream)
}

/// Lit exactement `buf.len()` bytes depuis `reader`.
///
/// # Errors
/// Retourne `Ok(true)` si lu avec succès, `Ok(false)` sur EOF avant complétion
/// (frame partielle comprise), `Err` sur erreur I/O fatale.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => {
                if total > 0 {
                    log::debug!("frame partielle en fin de flux ({total}/{} bytes)", buf.len());
                }
                return Ok(false);
            }
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Découpe un flux RGB24 brut en frames `width × height`.
pub struct PipeSource<R: Read> {
    reader: R,
    width: u32,
    height: u32,
}

impl<R: Read> PipeSource<R> {
    /// Lecteur de frames `width × height` sur `reader`.
    #[must_use]
    pub fn new(reader: R, width: u32, height: u32) -> Self {
        Self {
            reader,
            width,
            height,
        }
    }
}

impl<R: Read> FrameSource for PipeSource<R> {
    fn read_frame(&mut self, frame: &mut RawFrame) -> Result<bool, CoreError> {
        if frame.width != self.width || frame.height != self.height {
            *frame = RawFrame::new(self.width, self.height);
        }
        Ok(read_exact_or_eof(&mut self.reader, &mut frame.data)?)
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Process `ffmpeg` qui écrit des frames RGB24 brutes sur stdout.
///
/// Chaque frame = `w × h × 3` bytes (row-major, sans padding). Le process est
/// tué et récolté au drop.
pub struct FfmpegSource {
    child: Child,
    pipe: PipeSource<ChildStdout>,
}

impl FfmpegSource {
    /// Lance ffmpeg, sortie redimensionnée à `width × height`.
    ///
    /// `-an` supprime l'audio (non lu).
    ///
    /// # Errors
    /// Retourne une erreur si ffmpeg est introuvable ou si stdout n'est pas capturé.
    pub fn spawn(path: &Path, width: u32, height: u32) -> Result<Self> {
        let size = format!("{width}x{height}");

        let mut child = Command::new("ffmpeg")
            .arg("-i")
            .arg(path)
            .args([
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "-s",
                size.as_str(),
                "-an",
                "-hide_banner",
                "-loglevel",
                "error",
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Impossible de lancer ffmpeg. Vérifiez qu'il est installé et dans le PATH.")?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            bail!("stdout de ffmpeg non capturé");
        };

        log::debug!("ffmpeg spawné: {width}x{height} rgb24 depuis {}", path.display());

        Ok(Self {
            child,
            pipe: PipeSource::new(stdout, width, height),
        })
    }
}

impl FrameSource for FfmpegSource {
    fn read_frame(&mut self, frame: &mut RawFrame) -> Result<bool, CoreError> {
        self.pipe.read_frame(frame)
    }

    fn frame_size(&self) -> (u32, u32) {
        self.pipe.frame_size()
    }

    fn finish(&mut self) -> Result<(), CoreError> {
        let status = self.child.wait()?;
        if status.success() {
            log::debug!("ffmpeg terminé proprement");
            Ok(())
        } else {
            Err(CoreError::DecodeStream(format!("ffmpeg s'est terminé en échec ({status})")))
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        // Déjà récolté par `finish` : try_wait retourne Some, rien à tuer.
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const FFPROBE_JSON: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "width": 1280,
                "height": 720,
                "r_frame_rate": "25/1",
                "avg_frame_rate": "24000/1001"
            }
        ]
    }"#;

    #[test]
    fn parses_ffprobe_output() {
        let stream = parse_probe(FFPROBE_JSON).unwrap();
        assert_eq!(stream.resolution().unwrap(), (1280, 720));
        assert!((stream.fps().unwrap() - 23.976).abs() < 0.001);
    }

    #[test]
    fn falls_back_to_r_frame_rate() {
        let stream = ProbeStream {
            codec_type: "video".into(),
            avg_frame_rate: "0/0".into(),
            r_frame_rate: "25/1".into(),
            width: 1,
            height: 1,
        };
        assert_eq!(stream.fps().unwrap(), 25.0);
        let broken = ProbeStream {
            r_frame_rate: "x/1".into(),
            ..stream
        };
        assert!(broken.fps().is_err());
    }

    #[test]
    fn rejects_non_video_or_empty() {
        assert!(parse_probe(r#"{"streams": []}"#).is_err());
        assert!(parse_probe(r#"{}"#).is_err());
        assert!(parse_probe(r#"{"streams": [{"codec_type": "audio"}]}"#).is_err());
        assert!(parse_probe("not json").is_err());
    }

    #[test]
    fn frame_rate_edge_cases() {
        assert!(parse_frame_rate("").is_err());
        assert!(parse_frame_rate("24/0").is_err());
        assert!(parse_frame_rate("-24/1").is_err());
        assert!(parse_frame_rate("0/1").is_err());
        assert_eq!(parse_frame_rate(" 60/2 ").unwrap(), 30.0);
    }

    #[test]
    fn zero_resolution_is_error() {
        assert!(ProbeStream::default().resolution().is_err());
    }

    #[test]
    fn pipe_source_splits_frames_and_stops_on_partial() {
        // 2 frames complètes de 2×1 (6 bytes) + 4 bytes orphelins.
        let bytes: Vec<u8> = (0..16).collect();
        let mut source = PipeSource::new(Cursor::new(bytes), 2, 1);
        let mut frame = RawFrame::new(2, 1);

        assert!(source.read_frame(&mut frame).unwrap());
        assert_eq!(frame.pixel(1, 0), (3, 4, 5));
        assert!(source.read_frame(&mut frame).unwrap());
        assert_eq!(frame.pixel(0, 0), (6, 7, 8));
        assert!(!source.read_frame(&mut frame).unwrap());
        assert!(!source.read_frame(&mut frame).unwrap());
    }

    #[test]
    fn pipe_source_resizes_mismatched_buffer() {
        let mut source = PipeSource::new(Cursor::new(vec![1u8; 12]), 2, 2);
        let mut frame = RawFrame::new(1, 1);
        assert!(source.read_frame(&mut frame).unwrap());
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(source.frame_size(), (2, 2));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "boom"))
        }
    }

    #[test]
    fn read_error_is_propagated() {
        let mut source = PipeSource::new(FailingReader, 1, 1);
        let mut frame = RawFrame::new(1, 1);
        assert!(matches!(source.read_frame(&mut frame), Err(CoreError::Io(_))));
    }
}
