use std::io::{self, Write};

use crossterm::{cursor, execute, queue, style, terminal};
use tvp_core::layout::TerminalGeometry;

/// Taille courante du terminal attaché.
///
/// # Errors
/// Échec de la requête, ou taille nulle (sortie redirigée).
pub fn query_size() -> io::Result<TerminalGeometry> {
    let (cols, rows) = terminal::size()?;
    if cols == 0 || rows == 0 {
        return Err(io::Error::other(format!("taille terminal nulle : {cols}x{rows}")));
    }
    Ok(TerminalGeometry {
        cols: u32::from(cols),
        rows: u32::from(rows),
    })
}

/// Session d'affichage : curseur masqué tant qu'elle vit.
///
/// L'écran est effacé une seule fois à l'ouverture. Le drop restaure le
/// curseur sur tous les chemins de sortie (fin normale, erreur, interruption).
pub struct TerminalSession<W: Write> {
    out: W,
}

impl<W: Write> TerminalSession<W> {
    /// Masque le curseur et efface l'écran.
    ///
    /// # Errors
    /// Erreur d'écriture sur la sortie.
    pub fn begin(out: W) -> io::Result<Self> {
        let mut session = Self { out };
        execute!(
            session.out,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(session)
    }

    /// Ramène le curseur en haut à gauche et écrit la frame composée.
    ///
    /// # Errors
    /// Erreur d'écriture sur la sortie.
    pub fn present(&mut self, frame: &str) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, style::ResetColor, cursor::Show) {
            log::warn!("Restauration du curseur impossible : {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIDE: &str = "\x1b[?25l";
    const SHOW: &str = "\x1b[?25h";

    #[test]
    fn hides_then_restores_cursor() {
        let mut sink = Vec::new();
        {
            let mut session = TerminalSession::begin(&mut sink).unwrap();
            session.present("ab").unwrap();
        }
        let text = String::from_utf8(sink).unwrap();
        assert!(text.starts_with(HIDE));
        assert!(text.contains("\x1b[2J"));
        assert!(text.contains("\x1b[1;1Hab"));
        assert!(text.ends_with(SHOW));
    }

    #[test]
    fn screen_is_cleared_once() {
        let mut sink = Vec::new();
        {
            let mut session = TerminalSession::begin(&mut sink).unwrap();
            for _ in 0..3 {
                session.present("x").unwrap();
            }
        }
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.matches("\x1b[2J").count(), 1);
        assert_eq!(text.matches("\x1b[1;1H").count(), 3);
    }
}
