use crate::error::CoreError;
use crate::frame::RawFrame;

/// Fournit des frames RGB24 de taille fixe à la boucle de lecture.
///
/// Implémenté par : `FfmpegSource` (pipe ffmpeg), et des sources mémoire en test.
///
/// # Example
/// ```
/// use tvp_core::traits::FrameSource;
/// use tvp_core::frame::RawFrame;
/// use tvp_core::error::CoreError;
///
/// struct EmptySource;
/// impl FrameSource for EmptySource {
///     fn read_frame(&mut self, _frame: &mut RawFrame) -> Result<bool, CoreError> { Ok(false) }
///     fn frame_size(&self) -> (u32, u32) { (2, 2) }
/// }
/// let mut frame = RawFrame::new(2, 2);
/// assert!(!EmptySource.read_frame(&mut frame).unwrap());
/// ```
pub trait FrameSource {
    /// Lit la prochaine frame dans `frame` (bloquant).
    ///
    /// `Ok(true)` : frame complète. `Ok(false)` : fin de flux, ce n'est pas
    /// une erreur. `Err` : flux interrompu.
    ///
    /// # Errors
    /// `CoreError::DecodeStream` ou `CoreError::Io` si la lecture échoue.
    fn read_frame(&mut self, frame: &mut RawFrame) -> Result<bool, CoreError>;

    /// Dimensions de décodage (largeur, hauteur) de chaque frame.
    fn frame_size(&self) -> (u32, u32);

    /// Appelé une fois après la fin de flux propre.
    ///
    /// # Errors
    /// Signale un décodeur qui s'est terminé en échec.
    fn finish(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}
