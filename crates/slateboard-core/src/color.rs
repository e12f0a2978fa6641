//! Serializable RGBA color with hex string conversions.

use serde::{Deserialize, Serialize};

/// RGBA8 color carried on every draw action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Default ink color (slate-800).
    pub const INK: Rgba = Rgba::opaque(0x1e, 0x29, 0x3b);

    /// Selection accent (blue-500).
    pub const SELECTION: Rgba = Rgba::opaque(0x3b, 0x82, 0xf6);

    /// Canvas background.
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);

    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    /// Parse a `#rgb` or `#rrggbb` hex string. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        match hex.len() {
            3 => {
                let mut it = hex.chars();
                let (r, g, b) = (it.next()?, it.next()?, it.next()?);
                let expand = |c: char| {
                    let v = c.to_digit(16)? as u8;
                    Some(v << 4 | v)
                };
                Some(Self::opaque(expand(r)?, expand(g)?, expand(b)?))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::opaque(r, g, b))
            }
            _ => None,
        }
    }

    /// Format as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::INK
    }
}
