//! RGBA colour type used by materials, uniforms and the picking pass.
//!
//! Stored as four `f32` values (0.0 – 1.0).  Hotspot documents describe
//! colours as CSS hex strings, so parsing lives here too; the picking pass
//! encodes object identity as a packed 24-bit value, hence `from_u24` /
//! `to_u24`.
//!
//! # Example
//! ```rust,ignore
//! use vista_core::Color;
//!
//! let green = Color::parse_css("#00ff00")?;
//! let id    = Color::from_u24(0x000102);
//! assert_eq!(id.to_u24(), 0x000102);
//! ```

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("colour string `{0}` is not a #rgb, #rrggbb or #rrggbbaa value")]
    InvalidFormat(String),
}

/// Linear RGBA, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Each byte maps linearly onto `0.0..=1.0`.
    fn from_bytes([r, g, b, a]: [u8; 4]) -> Self {
        let unit = |byte: u8| f32::from(byte) / 255.0;
        Self::rgba(unit(r), unit(g), unit(b), unit(a))
    }

    /// Opaque colour whose channels are the low three bytes of `code`
    /// (`0xRRGGBB`).  Anything above bit 23 is dropped.
    pub fn from_u24(code: u32) -> Self {
        let [_, r, g, b] = code.to_be_bytes();
        Self::from_bytes([r, g, b, 0xFF])
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`; the `#` may be omitted.
    pub fn parse_css(s: &str) -> Result<Self, ColorError> {
        let digits = s.trim().trim_start_matches('#');
        let invalid = || ColorError::InvalidFormat(s.to_string());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        let bytes = match digits.len() {
            3 => {
                let nibble = |shift: u32| (((value >> shift) & 0xF) * 0x11) as u8;
                [nibble(8), nibble(4), nibble(0), 0xFF]
            }
            6 => {
                let [_, r, g, b] = value.to_be_bytes();
                [r, g, b, 0xFF]
            }
            8 => value.to_be_bytes(),
            _ => return Err(invalid()),
        };
        Ok(Self::from_bytes(bytes))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Inverse of [`Color::from_u24`]; alpha is ignored and each channel is
    /// clamped then rounded to the nearest byte.
    pub fn to_u24(self) -> u32 {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        byte(self.r) << 16 | byte(self.g) << 8 | byte(self.b)
    }

    #[cfg(feature = "gpu")]
    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_array().map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}
