use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::from_rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::from_rgba(0, 0, 0, 0);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgba(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::from_rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over blend of `self` onto an opaque-or-not `dst` pixel.
    pub fn blend_over(self, dst: [u8; 4]) -> [u8; 4] {
        let a = self.a as u32;
        let inv = 255 - a;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
        [
            mix(self.r, dst[0]),
            mix(self.g, dst[1]),
            mix(self.b, dst[2]),
            (a + (dst[3] as u32 * inv + 127) / 255).min(255) as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
