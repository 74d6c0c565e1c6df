//! tvp : lecture vidéo dans le terminal.
//!
//! `player` porte la boucle de lecture, `terminal` la session d'affichage.

pub mod cli;
pub mod player;
pub mod terminal;
