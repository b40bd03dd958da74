//! RGB colours and the unlockable palettes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unlock::{Gated, Requirement, ids};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColourError {
    #[error("colour must be 6 hex digits, optionally prefixed with '#' (got '{0}')")]
    Malformed(String),
}

/// An opaque 24-bit colour, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(u32);

impl Colour {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn parse(raw: &str) -> Result<Self, ColourError> {
        let trimmed = raw.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColourError::Malformed(raw.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| ColourError::Malformed(raw.to_string()))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.to_string()
    }
}

/// Colours available to everyone.
pub const BASE_PALETTE: &[Colour] = &[
    Colour::rgb(0xff, 0xff, 0xff),
    Colour::rgb(0x00, 0x00, 0x00),
    Colour::rgb(0x9e, 0x9e, 0x9e),
    Colour::rgb(0xe5, 0x39, 0x35),
    Colour::rgb(0xfb, 0x8c, 0x00),
    Colour::rgb(0xfd, 0xd8, 0x35),
    Colour::rgb(0x43, 0xa0, 0x47),
    Colour::rgb(0x1e, 0x88, 0xe5),
    Colour::rgb(0x8e, 0x24, 0xaa),
];

/// Colours gated behind `fill.colours.pack1`.
pub const PACK1_PALETTE: &[Colour] = &[
    Colour::rgb(0xec, 0x40, 0x7a),
    Colour::rgb(0x00, 0x89, 0x7b),
    Colour::rgb(0x1a, 0x23, 0x7e),
    Colour::rgb(0xff, 0xb3, 0x00),
    Colour::rgb(0xa5, 0xd6, 0xa7),
    Colour::rgb(0xff, 0x70, 0x43),
    Colour::rgb(0xb3, 0x9d, 0xdb),
    Colour::rgb(0x6d, 0x4c, 0x41),
];

impl Gated for Colour {
    fn requirement(&self) -> Requirement {
        if BASE_PALETTE.contains(self) {
            Requirement::Free
        } else if PACK1_PALETTE.contains(self) {
            Requirement::Unlock(ids::FILL_COLOURS_PACK1)
        } else {
            Requirement::Unavailable
        }
    }
}
