//! Appearance configuration for the bit.
//!
//! An [`Appearance`] is an immutable value. It is produced only by
//! [`normalize`] (from an untrusted [`RawAppearance`]), by
//! [`Appearance::default`], or by one of the `with_*` mutations, all of which
//! keep the cross-field invariants:
//!
//! - fill secondary colour is present whenever the fill style needs it;
//! - border thickness is `none` exactly when the border style is `none`;
//! - border colours are present exactly when the border style uses them;
//! - shadow colour is present exactly when the shadow style is not `none`;
//! - nothing selected requires an unlock the caller did not hold.

mod mutate;
mod normalize;

use std::fmt;

use serde::Serialize;

use crate::colour::Colour;
use crate::unlock::{Gated, Requirement, ids};

pub use mutate::{AppearanceChange, ColourSlot};
pub use normalize::{RawAppearance, RawBorder, RawFill, RawShadow, normalize};

pub const DEFAULT_FILL_PRIMARY: Colour = Colour::rgb(0x1e, 0x88, 0xe5);
pub const DEFAULT_FILL_SECONDARY: Colour = Colour::rgb(0xff, 0xff, 0xff);
pub const DEFAULT_BORDER_PRIMARY: Colour = Colour::rgb(0x00, 0x00, 0x00);
pub const DEFAULT_BORDER_SECONDARY: Colour = Colour::rgb(0xff, 0xff, 0xff);
pub const DEFAULT_SHADOW_COLOUR: Colour = Colour::rgb(0x9e, 0x9e, 0x9e);
pub const DEFAULT_BORDER_THICKNESS: BorderThickness = BorderThickness::Medium;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Parse the canonical lowercase name (case-insensitive).
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                let lower = raw.trim().to_ascii_lowercase();
                match lower.as_str() {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            #[must_use]
            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    FillStyle {
        Solid => "solid",
        Gradient => "gradient",
        Stripes => "stripes",
        Pattern => "pattern",
    }
}

string_enum! {
    StripeDirection {
        Horizontal => "horizontal",
        Vertical => "vertical",
        Diagonal => "diagonal",
    }
}

string_enum! {
    StripeThickness {
        Thin => "thin",
        Medium => "medium",
        Thick => "thick",
    }
}

string_enum! {
    BorderStyle {
        None => "none",
        Solid => "solid",
        Pattern => "pattern",
    }
}

string_enum! {
    BorderThickness {
        None => "none",
        Thin => "thin",
        Medium => "medium",
        Thick => "thick",
    }
}

string_enum! {
    ShadowStyle {
        None => "none",
        Soft => "soft",
        Hard => "hard",
        Grounded => "grounded",
    }
}

impl FillStyle {
    /// Whether this style draws a secondary colour.
    #[must_use]
    pub const fn uses_secondary(self) -> bool {
        !matches!(self, Self::Solid)
    }

    /// Next style to try when this one is locked.
    #[must_use]
    pub const fn fallback(self) -> Option<Self> {
        match self {
            Self::Pattern => Some(Self::Stripes),
            Self::Stripes => Some(Self::Gradient),
            Self::Gradient => Some(Self::Solid),
            Self::Solid => None,
        }
    }
}

impl Gated for FillStyle {
    fn requirement(&self) -> Requirement {
        match self {
            Self::Solid => Requirement::Free,
            Self::Gradient => Requirement::Unlock(ids::FILL_GRADIENT),
            Self::Stripes => Requirement::Unlock(ids::FILL_STRIPES),
            Self::Pattern => Requirement::Unlock(ids::FILL_PATTERNS_PACK1),
        }
    }
}

impl Gated for StripeDirection {
    fn requirement(&self) -> Requirement {
        Requirement::Unlock(ids::FILL_STRIPES)
    }
}

impl Gated for StripeThickness {
    fn requirement(&self) -> Requirement {
        Requirement::Unlock(ids::FILL_STRIPES)
    }
}

impl BorderStyle {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub const fn uses_secondary(self) -> bool {
        matches!(self, Self::Pattern)
    }

    #[must_use]
    pub const fn fallback(self) -> Option<Self> {
        match self {
            Self::Pattern => Some(Self::Solid),
            Self::Solid | Self::None => None,
        }
    }
}

impl Gated for BorderStyle {
    fn requirement(&self) -> Requirement {
        match self {
            Self::None | Self::Solid => Requirement::Free,
            Self::Pattern => Requirement::Unlock(ids::FILL_PATTERNS_PACK1),
        }
    }
}

impl Gated for ShadowStyle {
    fn requirement(&self) -> Requirement {
        Requirement::Free
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Stripes {
    direction: StripeDirection,
    thickness: StripeThickness,
}

impl Stripes {
    #[must_use]
    pub const fn new(direction: StripeDirection, thickness: StripeThickness) -> Self {
        Self {
            direction,
            thickness,
        }
    }

    #[must_use]
    pub const fn direction(self) -> StripeDirection {
        self.direction
    }

    #[must_use]
    pub const fn thickness(self) -> StripeThickness {
        self.thickness
    }
}

impl Default for Stripes {
    fn default() -> Self {
        Self::new(StripeDirection::Horizontal, StripeThickness::Medium)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fill {
    style: FillStyle,
    primary: Colour,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary: Option<Colour>,
    #[serde(flatten)]
    stripes: Option<Stripes>,
}

impl Fill {
    #[must_use]
    pub const fn style(&self) -> FillStyle {
        self.style
    }

    #[must_use]
    pub const fn primary(&self) -> Colour {
        self.primary
    }

    /// Secondary colour. May linger (unused) after switching to `solid`.
    #[must_use]
    pub const fn secondary(&self) -> Option<Colour> {
        self.secondary
    }

    #[must_use]
    pub const fn stripes(&self) -> Option<Stripes> {
        self.stripes
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            style: FillStyle::Solid,
            primary: DEFAULT_FILL_PRIMARY,
            secondary: None,
            stripes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Border {
    style: BorderStyle,
    thickness: BorderThickness,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary: Option<Colour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary: Option<Colour>,
}

impl Border {
    #[must_use]
    pub const fn style(&self) -> BorderStyle {
        self.style
    }

    #[must_use]
    pub const fn thickness(&self) -> BorderThickness {
        self.thickness
    }

    #[must_use]
    pub const fn primary(&self) -> Option<Colour> {
        self.primary
    }

    #[must_use]
    pub const fn secondary(&self) -> Option<Colour> {
        self.secondary
    }

    const fn hidden() -> Self {
        Self {
            style: BorderStyle::None,
            thickness: BorderThickness::None,
            primary: None,
            secondary: None,
        }
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::hidden()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Shadow {
    style: ShadowStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    colour: Option<Colour>,
}

impl Shadow {
    #[must_use]
    pub const fn style(&self) -> ShadowStyle {
        self.style
    }

    #[must_use]
    pub const fn colour(&self) -> Option<Colour> {
        self.colour
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            style: ShadowStyle::None,
            colour: None,
        }
    }
}

/// Validated appearance of a bit.
///
/// The `Default` value is the canonical configuration every new profile
/// starts with; it requires no unlocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Appearance {
    fill: Fill,
    border: Border,
    shadow: Shadow,
}

impl Appearance {
    #[must_use]
    pub const fn fill(&self) -> &Fill {
        &self.fill
    }

    #[must_use]
    pub const fn border(&self) -> &Border {
        &self.border
    }

    #[must_use]
    pub const fn shadow(&self) -> &Shadow {
        &self.shadow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unlock::UnlockSet;

    #[test]
    fn default_requires_no_unlocks() {
        let appearance = Appearance::default();
        let none = UnlockSet::new();
        assert!(none.permits(&appearance.fill().style()));
        assert!(none.permits(&appearance.fill().primary()));
        assert_eq!(appearance.border().thickness(), BorderThickness::None);
        assert_eq!(appearance.shadow().colour(), None);
    }

    #[test]
    fn default_colours_are_in_base_palette() {
        let none = UnlockSet::new();
        for colour in [
            DEFAULT_FILL_PRIMARY,
            DEFAULT_FILL_SECONDARY,
            DEFAULT_BORDER_PRIMARY,
            DEFAULT_BORDER_SECONDARY,
            DEFAULT_SHADOW_COLOUR,
        ] {
            assert!(none.permits(&colour), "{colour}");
        }
    }

    #[test]
    fn enum_names_round_trip() {
        for style in FillStyle::all() {
            assert_eq!(FillStyle::parse(style.as_str()), Some(*style));
        }
        for style in BorderStyle::all() {
            assert_eq!(BorderStyle::parse(style.as_str()), Some(*style));
        }
        for style in ShadowStyle::all() {
            assert_eq!(ShadowStyle::parse(style.as_str()), Some(*style));
        }
        assert_eq!(FillStyle::parse(" Gradient "), Some(FillStyle::Gradient));
        assert_eq!(FillStyle::parse("plaid"), None);
    }

    #[test]
    fn fill_fallback_chain_ends_at_solid() {
        let mut style = FillStyle::Pattern;
        let mut seen = vec![style];
        while let Some(next) = style.fallback() {
            seen.push(next);
            style = next;
        }
        assert_eq!(
            seen,
            vec![
                FillStyle::Pattern,
                FillStyle::Stripes,
                FillStyle::Gradient,
                FillStyle::Solid
            ]
        );
    }

    #[test]
    fn serializes_without_absent_colours() {
        let json = serde_json::to_value(Appearance::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fill": { "style": "solid", "primary": "#1e88e5" },
                "border": { "style": "none", "thickness": "none" },
                "shadow": { "style": "none" }
            })
        );
    }
}
