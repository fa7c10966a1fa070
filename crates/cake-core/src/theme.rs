//! Closed table of cake themes.

use crate::error::CakeError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one of the built-in themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Elegant,
    Classic,
    Modern,
    Luxury,
}

impl ThemeId {
    pub const ALL: [ThemeId; 4] = [
        ThemeId::Elegant,
        ThemeId::Classic,
        ThemeId::Modern,
        ThemeId::Luxury,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Elegant => "elegant",
            ThemeId::Classic => "classic",
            ThemeId::Modern => "modern",
            ThemeId::Luxury => "luxury",
        }
    }

    /// Next theme in table order, wrapping around.
    pub fn next(self) -> ThemeId {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    #[inline]
    pub fn theme(self) -> &'static Theme {
        theme(self)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = CakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CakeError::UnknownTheme(s.to_string()))
    }
}

/// Palette for one theme. Colors are sRGB hex values.
#[derive(Clone, Debug)]
pub struct Theme {
    pub id: ThemeId,
    pub background: u32,
    pub cake: u32,
    pub accent: u32,
    pub display_name: &'static str,
}

impl Theme {
    pub fn background_linear(&self) -> Vec3 {
        srgb_hex_to_linear(self.background)
    }
    pub fn cake_linear(&self) -> Vec3 {
        srgb_hex_to_linear(self.cake)
    }
    pub fn accent_linear(&self) -> Vec3 {
        srgb_hex_to_linear(self.accent)
    }
    /// CSS color string for the page background.
    pub fn background_css(&self) -> String {
        format!("#{:06x}", self.background)
    }
}

pub static THEMES: [Theme; 4] = [
    Theme {
        id: ThemeId::Elegant,
        background: 0xF8F4EF,
        cake: 0xFFE5D9,
        accent: 0xD4A5A5,
        display_name: "Rose Gold",
    },
    Theme {
        id: ThemeId::Classic,
        background: 0xFFF9F0,
        cake: 0xFFD1DC,
        accent: 0xFF69B4,
        display_name: "Pink Dream",
    },
    Theme {
        id: ThemeId::Modern,
        background: 0xF0F4F8,
        cake: 0xE8F4F8,
        accent: 0x9BA4B5,
        display_name: "Sky Blue",
    },
    Theme {
        id: ThemeId::Luxury,
        background: 0xFAF7F2,
        cake: 0xF5E6D3,
        accent: 0xD4AF37,
        display_name: "Golden",
    },
];

#[inline]
pub fn theme(id: ThemeId) -> &'static Theme {
    // Table order matches ThemeId::ALL
    &THEMES[ThemeId::ALL.iter().position(|t| *t == id).unwrap_or(0)]
}

/// Convert a packed 0xRRGGBB sRGB color to linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_id() {
        for id in ThemeId::ALL {
            assert_eq!(theme(id).id, id);
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Luxury".parse::<ThemeId>().unwrap(), ThemeId::Luxury);
        assert!("neon".parse::<ThemeId>().is_err());
    }

    #[test]
    fn hex_conversion_endpoints() {
        assert_eq!(srgb_hex_to_linear(0x000000), Vec3::ZERO);
        let white = srgb_hex_to_linear(0xFFFFFF);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
    }
}
