use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use tvp_app::cli::Cli;
use tvp_app::player::{self, Player};
use tvp_app::terminal;
use tvp_core::config::{PlayerConfig, RenderMode};
use tvp_core::error::CoreError;
use tvp_source::video::{FfmpegSource, probe_video};

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config et appliquer les overrides CLI
    let config = resolve_config(&cli)?;

    // 4. Probe (non fatal : repli sur la config)
    let (fps_probe, res_probe) = match probe_video(&cli.file) {
        Ok(stream) => (
            stream.fps().map_err(probe_error),
            stream.resolution().map_err(probe_error),
        ),
        Err(e) => {
            let msg = format!("{e:#}");
            (Err(CoreError::Probe(msg.clone())), Err(CoreError::Probe(msg)))
        }
    };
    let fps = player::resolve_fps(config.target_fps, fps_probe, config.fallback.fps);
    let video = player::resolve_video(res_probe, &config.fallback);
    let term = player::resolve_terminal(terminal::query_size(), &config.fallback);

    // 5. Initialiser le renderer (géométrie nulle = fatal)
    let mut player = Player::new(&config, term, video, fps)?;

    // 6. Lancer le décodeur à la résolution d'échantillonnage du renderer
    let (decode_w, decode_h) = player.decode_size();
    let mut source = FfmpegSource::spawn(&cli.file, decode_w, decode_h)
        .with_context(|| format!("Décodage de {}", cli.file.display()))?;

    // 7. Ctrl-C : arrêt propre en fin de frame
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
            .context("Installation du handler Ctrl-C")?;
    }

    // 8. Boucle principale (curseur restauré sur tous les chemins)
    let stdout = std::io::stdout().lock();
    player.run(&mut source, stdout, &stop)?;
    Ok(())
}

fn probe_error(e: anyhow::Error) -> CoreError {
    CoreError::Probe(format!("{e:#}"))
}

/// Config fichier (défauts si absent), puis overrides CLI.
fn resolve_config(cli: &Cli) -> Result<PlayerConfig> {
    let mut config = if cli.config.exists() {
        tvp_core::config::load_config(&cli.config)?
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        PlayerConfig::default()
    };

    if let Some(ref mode) = cli.mode {
        config.render_mode = mode.parse::<RenderMode>()?;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = Some(fps);
    }
    if cli.no_color {
        config.color_enabled = false;
    }
    config.clamp_all();
    Ok(config)
}
