/// Couleur RGB 24 bits.
pub type Rgb = (u8, u8, u8);

/// Frame brute décodée, réutilisée d'une lecture à l'autre.
///
/// Stocke les pixels en RGB24 row-major, 3 bytes par pixel, sans padding.
///
/// # Example
/// ```
/// use tvp_core::frame::RawFrame;
/// let frame = RawFrame::new(10, 10);
/// assert_eq!(frame.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// Pixels RGB, row-major, 3 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RawFrame {
    /// Crée une frame noire pré-allouée aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; Self::byte_len(width, height)],
            width,
            height,
        }
    }

    /// Construit une frame à partir d'une liste de pixels row-major.
    ///
    /// # Example
    /// ```
    /// use tvp_core::frame::RawFrame;
    /// let frame = RawFrame::from_pixels(2, 1, &[(255, 0, 0), (0, 0, 255)]);
    /// assert_eq!(frame.pixel(1, 0), (0, 0, 255));
    /// ```
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgb]) -> Self {
        let mut frame = Self::new(width, height);
        for (chunk, &(r, g, b)) in frame.data.chunks_exact_mut(3).zip(pixels) {
            chunk.copy_from_slice(&[r, g, b]);
        }
        frame
    }

    /// Taille en bytes d'une frame RGB24 `width × height`.
    #[inline]
    #[must_use]
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Accès au pixel (x, y) → (r, g, b).
    ///
    /// Hors bornes → noir.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }

    /// Convertit la frame en niveaux de gris BT.709, en place.
    ///
    /// # Example
    /// ```
    /// use tvp_core::frame::RawFrame;
    /// let mut frame = RawFrame::from_pixels(1, 1, &[(255, 255, 255)]);
    /// frame.to_grayscale();
    /// assert_eq!(frame.pixel(0, 0), (255, 255, 255));
    /// ```
    pub fn to_grayscale(&mut self) {
        for px in self.data.chunks_exact_mut(3) {
            let y = ((u32::from(px[0]) * 2126 + u32::from(px[1]) * 7152 + u32::from(px[2]) * 722)
                / 10000) as u8;
            px.fill(y);
        }
    }
}

/// Luminance perceptuelle BT.709 normalisée dans [0.0, 1.0].
///
/// # Example
/// ```
/// use tvp_core::frame::luminance;
/// assert_eq!(luminance((0, 0, 0)), 0.0);
/// assert_eq!(luminance((255, 255, 255)), 1.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance((r, g, b): Rgb) -> f32 {
    let weighted = u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722;
    weighted as f32 / 2_550_000.0
}

/// Seuil binaire sombre/clair à mi-luminance.
#[inline(always)]
#[must_use]
pub fn is_dark(rgb: Rgb) -> bool {
    luminance(rgb) < 0.5
}
