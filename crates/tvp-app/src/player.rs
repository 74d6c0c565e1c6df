use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use tvp_core::clock::{FramePacer, frame_interval};
use tvp_core::config::{FallbackConfig, PlayerConfig};
use tvp_core::error::CoreError;
use tvp_core::frame::RawFrame;
use tvp_core::layout::{TerminalGeometry, VideoGeometry};
use tvp_core::traits::FrameSource;
use tvp_render::{EncodedFrame, Renderer};

use crate::terminal::TerminalSession;

/// Cycle de vie d'une session de lecture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Player construit, rien de résolu.
    Idle,
    /// Géométries résolues, renderer initialisé.
    Initializing,
    /// Boucle lecture, rendu, écriture en cours.
    Running,
    /// Fin de flux propre : attente du décodeur.
    Draining,
    /// Erreur de lecture ou d'écriture, propagée à l'appelant.
    Failed,
    /// Session close, curseur restauré.
    Terminated,
}

/// Bilan d'une session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames écrites sur le terminal.
    pub frames: u64,
    /// Frames dont le rendu a dépassé l'intervalle.
    pub overruns: u64,
}

/// Géométrie terminal, repli sur la config si la requête échoue.
pub fn resolve_terminal(
    query: std::io::Result<TerminalGeometry>,
    fallback: &FallbackConfig,
) -> TerminalGeometry {
    query.unwrap_or_else(|e| {
        log::warn!(
            "Taille terminal indisponible ({e}), repli sur {}x{}",
            fallback.term_cols,
            fallback.term_rows
        );
        TerminalGeometry {
            cols: fallback.term_cols,
            rows: fallback.term_rows,
        }
    })
}

/// Résolution vidéo, repli sur la config si le probe échoue.
pub fn resolve_video(
    probe: Result<(u32, u32), CoreError>,
    fallback: &FallbackConfig,
) -> VideoGeometry {
    match probe {
        Ok((width, height)) => VideoGeometry { width, height },
        Err(e) => {
            log::warn!(
                "{e}, repli sur {}x{}",
                fallback.video_width,
                fallback.video_height
            );
            VideoGeometry {
                width: fallback.video_width,
                height: fallback.video_height,
            }
        }
    }
}

/// FPS de lecture : forcé, sinon détecté, sinon repli.
///
/// # Example
/// ```
/// use tvp_app::player::resolve_fps;
/// use tvp_core::error::CoreError;
/// assert_eq!(resolve_fps(None, Ok(30.0), 24.0), 30.0);
/// assert_eq!(resolve_fps(Some(10.0), Ok(30.0), 24.0), 10.0);
/// assert_eq!(resolve_fps(None, Err(CoreError::Probe("x".into())), 24.0), 24.0);
/// ```
pub fn resolve_fps(target: Option<f64>, probe: Result<f64, CoreError>, fallback: f64) -> f64 {
    if let Some(fps) = target {
        return fps;
    }
    match probe {
        Ok(fps) => fps,
        Err(e) => {
            log::warn!("{e}, repli sur {fallback} fps");
            fallback
        }
    }
}

/// Applique le padding de centrage à une frame encodée.
///
/// `pad_y` lignes vides, puis chaque ligne préfixée de `pad_x` espaces,
/// séparées par `\n` sans saut final. Un blob reçoit le même décalage une fois.
///
/// # Example
/// ```
/// use tvp_app::player::compose_frame;
/// use tvp_render::EncodedFrame;
/// let frame = EncodedFrame::Lines(vec!["ab".into(), "cd".into()]);
/// assert_eq!(compose_frame(&frame, 2, 1), "\n  ab\n  cd");
/// ```
#[must_use]
pub fn compose_frame(encoded: &EncodedFrame, pad_x: u32, pad_y: u32) -> String {
    let indent = " ".repeat(pad_x as usize);
    let mut out = "\n".repeat(pad_y as usize);
    match encoded {
        EncodedFrame::Lines(lines) => {
            out.reserve(lines.iter().map(|l| l.len() + indent.len() + 1).sum());
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push_str(line);
            }
        }
        EncodedFrame::Blob(blob) => {
            out.push_str(&indent);
            out.push_str(blob);
        }
    }
    out
}

/// Boucle de lecture : lit, rend, écrit et cadence une frame à la fois.
pub struct Player {
    renderer: Renderer,
    interval: Duration,
    grayscale: bool,
    state: PlaybackState,
}

impl Player {
    /// Sélectionne et initialise le renderer pour la session.
    ///
    /// # Errors
    /// `CoreError::InvalidGeometry` si une dimension terminal ou vidéo est nulle.
    pub fn new(
        config: &PlayerConfig,
        term: TerminalGeometry,
        video: VideoGeometry,
        fps: f64,
    ) -> Result<Self, CoreError> {
        let mut player = Self {
            renderer: Renderer::new(config.render_mode, config.color_enabled, term),
            interval: frame_interval(fps),
            grayscale: false,
            state: PlaybackState::Idle,
        };
        player.transition(PlaybackState::Initializing);

        if !config.color_enabled {
            if player.renderer.supports_monochrome() {
                player.grayscale = true;
            } else {
                log::warn!(
                    "Le mode {} n'a pas de rendu monochrome, --no-color ignoré",
                    config.render_mode
                );
            }
        }

        let layout = player.renderer.initialize(video.width, video.height)?;
        log::info!(
            "{} @ {fps:.3} fps, terminal {}x{}, frame {}x{}, vidéo {}x{}",
            config.render_mode,
            term.cols,
            term.rows,
            layout.cell_width,
            layout.cell_height,
            video.width,
            video.height
        );
        Ok(player)
    }

    /// Renderer initialisé.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Intervalle cible entre deux frames.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Résolution à demander au décodeur.
    #[must_use]
    pub fn decode_size(&self) -> (u32, u32) {
        self.renderer.decode_size()
    }

    /// État courant du cycle de vie.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    fn transition(&mut self, next: PlaybackState) {
        log::debug!("lecture : {:?} → {next:?}", self.state);
        self.state = next;
    }

    /// Joue `source` jusqu'à la fin de flux, une erreur, ou `stop`.
    ///
    /// Le curseur est masqué pendant la lecture et restauré sur tous les
    /// chemins de sortie.
    ///
    /// # Errors
    /// Erreur de lecture source, échec du décodeur en fin de flux, ou erreur
    /// d'écriture terminal.
    pub fn run<S: FrameSource, W: Write>(
        &mut self,
        source: &mut S,
        out: W,
        stop: &AtomicBool,
    ) -> Result<SessionStats> {
        let session = TerminalSession::begin(out).context("Initialisation du terminal")?;
        self.transition(PlaybackState::Running);

        let result = self.play(source, session, stop);
        match &result {
            Ok(stats) => {
                log::info!(
                    "Lecture terminée : {} frames, {} dépassements",
                    stats.frames,
                    stats.overruns
                );
            }
            Err(e) => {
                self.transition(PlaybackState::Failed);
                log::error!("Lecture interrompue : {e:#}");
            }
        }
        self.transition(PlaybackState::Terminated);
        result
    }

    fn play<S: FrameSource, W: Write>(
        &mut self,
        source: &mut S,
        mut session: TerminalSession<W>,
        stop: &AtomicBool,
    ) -> Result<SessionStats> {
        let (w, h) = source.frame_size();
        let mut frame = RawFrame::new(w, h);
        let mut pacer = FramePacer::new(self.interval);
        let mut stats = SessionStats::default();
        let (pad_x, pad_y) = self.renderer.padding();

        loop {
            if stop.load(Ordering::Relaxed) {
                log::info!("Interruption demandée");
                break;
            }
            pacer.begin_frame();

            let more = match source.read_frame(&mut frame) {
                Ok(more) => more,
                Err(e) if stop.load(Ordering::Relaxed) => {
                    log::info!("Interruption demandée ({e})");
                    break;
                }
                Err(e) => return Err(e).context("Lecture de frame"),
            };
            if !more {
                // Ctrl-C atteint aussi le décodeur : son code de sortie ne compte pas.
                if stop.load(Ordering::Relaxed) {
                    log::info!("Interruption demandée, décodeur arrêté");
                    break;
                }
                self.transition(PlaybackState::Draining);
                source.finish().context("Fin du décodage")?;
                break;
            }

            if self.grayscale {
                frame.to_grayscale();
            }
            let encoded = self.renderer.render(&frame);
            session
                .present(&compose_frame(&encoded, pad_x, pad_y))
                .context("Écriture terminal")?;
            stats.frames += 1;

            pacer.wait();
        }

        stats.overruns = pacer.overruns;
        Ok(stats)
    }
}
