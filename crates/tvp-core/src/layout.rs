use crate::error::CoreError;

/// Taille du terminal en cellules. Lue une fois par session, pas de resize live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalGeometry {
    /// Colonnes.
    pub cols: u32,
    /// Lignes.
    pub rows: u32,
}

/// Dimensions natives de la vidéo, en pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Dimensions de la frame en cellules terminal + offsets de centrage.
///
/// Calculé une seule fois à l'initialisation du renderer, immuable ensuite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameLayout {
    /// Largeur en cellules.
    pub cell_width: u32,
    /// Hauteur en cellules.
    pub cell_height: u32,
    /// Colonnes vides à gauche.
    pub pad_x: u32,
    /// Lignes vides en haut.
    pub pad_y: u32,
}

impl FrameLayout {
    /// Plus grande frame qui tient dans le terminal en préservant l'aspect vidéo.
    ///
    /// On remplit d'abord la hauteur ; si la largeur déborde, on la borne à
    /// `term_cols` et on recalcule la hauteur. `cell_aspect` = 0.5 pour une
    /// cellule qui empile deux sous-échantillons verticaux, 1.0 pour des
    /// pixels carrés.
    ///
    /// # Errors
    /// `CoreError::InvalidGeometry` si une dimension vidéo ou terminal est nulle.
    ///
    /// # Example
    /// ```
    /// use tvp_core::layout::FrameLayout;
    /// let layout = FrameLayout::fit(1920, 1080, 80, 24, 0.5).unwrap();
    /// assert_eq!((layout.cell_width, layout.cell_height), (80, 22));
    /// assert_eq!((layout.pad_x, layout.pad_y), (0, 1));
    /// ```
    pub fn fit(
        video_w: u32,
        video_h: u32,
        term_cols: u32,
        term_rows: u32,
        cell_aspect: f64,
    ) -> Result<Self, CoreError> {
        if video_w == 0 || video_h == 0 {
            return Err(CoreError::InvalidGeometry {
                width: video_w,
                height: video_h,
            });
        }
        if term_cols == 0 || term_rows == 0 {
            return Err(CoreError::InvalidGeometry {
                width: term_cols,
                height: term_rows,
            });
        }

        let video_aspect = f64::from(video_w) / f64::from(video_h);

        let mut cell_height = term_rows;
        let mut cell_width = (f64::from(cell_height) * video_aspect / cell_aspect) as u32;

        if cell_width > term_cols {
            cell_width = term_cols;
            cell_height = (f64::from(cell_width) * cell_aspect / video_aspect) as u32;
        }

        // Vidéo extrême (très haute ou très large) : au moins une cellule par axe.
        let cell_width = cell_width.clamp(1, term_cols);
        let cell_height = cell_height.clamp(1, term_rows);

        Ok(Self {
            cell_width,
            cell_height,
            pad_x: (term_cols - cell_width) / 2,
            pad_y: (term_rows - cell_height) / 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECTS: [f64; 4] = [0.25, 0.5, 1.0, 2.0];

    #[test]
    fn never_overflows_terminal() {
        for &(vw, vh) in &[(1920, 1080), (1080, 1920), (640, 480), (1, 1000), (1000, 1), (7, 3)] {
            for &(cols, rows) in &[(80, 24), (1, 1), (300, 90), (24, 80), (13, 7)] {
                for &aspect in &ASPECTS {
                    let l = FrameLayout::fit(vw, vh, cols, rows, aspect).unwrap();
                    assert!(l.cell_width >= 1 && l.cell_width <= cols);
                    assert!(l.cell_height >= 1 && l.cell_height <= rows);
                    assert_eq!(l.pad_x, (cols - l.cell_width) / 2);
                    assert_eq!(l.pad_y, (rows - l.cell_height) / 2);
                }
            }
        }
    }

    #[test]
    fn preserves_aspect_within_one_cell() {
        for &(vw, vh) in &[(1920, 1080), (1080, 1920), (640, 480), (720, 576)] {
            for &(cols, rows) in &[(80, 24), (200, 60), (120, 120)] {
                for &aspect in &ASPECTS {
                    let l = FrameLayout::fit(vw, vh, cols, rows, aspect).unwrap();
                    let w = f64::from(l.cell_width);
                    let h = f64::from(l.cell_height);
                    let video = f64::from(vw) / f64::from(vh);
                    // Un arrondi d'une cellule sur chaque axe.
                    let lo = (w - 1.0).max(0.0) * aspect / (h + 1.0);
                    let hi = (w + 1.0) * aspect / (h - 1.0).max(1.0);
                    assert!(
                        lo <= video && video <= hi,
                        "{vw}x{vh} in {cols}x{rows} @ {aspect}: {l:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn height_bound_branch() {
        // 4:3 vidéo, terminal très large : la hauteur est le facteur limitant.
        let l = FrameLayout::fit(640, 480, 300, 40, 0.5).unwrap();
        assert_eq!(l.cell_height, 40);
        assert_eq!(l.cell_width, 106);
        assert_eq!(l.pad_x, 97);
        assert_eq!(l.pad_y, 0);
    }

    #[test]
    fn width_bound_branch() {
        let l = FrameLayout::fit(1920, 1080, 80, 24, 1.0).unwrap();
        assert_eq!(l.cell_width, 42);
        assert_eq!(l.cell_height, 24);

        let l = FrameLayout::fit(1920, 1080, 40, 100, 0.5).unwrap();
        assert_eq!(l.cell_width, 40);
        assert_eq!(l.cell_height, 11);
        assert_eq!(l.pad_y, 44);
    }

    #[test]
    fn zero_video_dimension_is_invalid() {
        assert!(matches!(
            FrameLayout::fit(0, 1080, 80, 24, 0.5),
            Err(CoreError::InvalidGeometry { width: 0, height: 1080 })
        ));
        assert!(FrameLayout::fit(1920, 0, 80, 24, 0.5).is_err());
        assert!(FrameLayout::fit(1920, 1080, 0, 24, 0.5).is_err());
    }
}
