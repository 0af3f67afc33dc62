/// Straight-alpha RGBA color in 8-bit sRGB channels.
///
/// This is the exact value a frame is cleared to: channel bytes are what ends up
/// in the framebuffer, independent of whether the surface stores sRGB or linear
/// texels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClearColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for ClearColor {
    /// Opaque white.
    fn default() -> Self {
        Self::WHITE
    }
}

impl ClearColor {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from arbitrary integers, keeping the low byte of each.
    ///
    /// No range check is performed: `256` becomes `0` and `-1` becomes `255`,
    /// the same thing a byte-typed draw-color call does with an `int` argument.
    #[inline]
    pub const fn from_low_bytes(r: i64, g: i64, b: i64, a: i64) -> Self {
        Self::new(r as u8, g as u8, b as u8, a as u8)
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to a wgpu clear value for a surface of the given encoding.
    ///
    /// sRGB surfaces encode on store, so the channels are decoded to linear first.
    /// Alpha is always linear.
    pub fn to_wgpu(self, srgb_surface: bool) -> wgpu::Color {
        let channel = |c: u8| {
            let v = c as f64 / 255.0;
            if srgb_surface { srgb_to_linear(v) } else { v }
        };

        wgpu::Color {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a as f64 / 255.0,
        }
    }
}

fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
