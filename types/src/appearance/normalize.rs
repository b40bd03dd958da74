//! Repair of persisted or legacy-shaped appearance data.

use serde::{Deserialize, Serialize};

use super::{
    Appearance, Border, BorderStyle, BorderThickness, DEFAULT_BORDER_PRIMARY,
    DEFAULT_BORDER_SECONDARY, DEFAULT_BORDER_THICKNESS, DEFAULT_FILL_PRIMARY,
    DEFAULT_FILL_SECONDARY, DEFAULT_SHADOW_COLOUR, Fill, FillStyle, Shadow, ShadowStyle,
    StripeDirection, StripeThickness, Stripes,
};
use crate::colour::Colour;
use crate::unlock::UnlockSet;

/// Appearance as it arrives from storage: every field optional, every value
/// an unchecked string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAppearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<RawFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<RawBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<RawShadow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(
        alias = "color",
        alias = "colour",
        alias = "primaryColour",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary: Option<String>,
    #[serde(alias = "secondaryColour", skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBorder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(alias = "width", skip_serializing_if = "Option::is_none")]
    pub thickness: Option<String>,
    #[serde(
        alias = "color",
        alias = "colour",
        alias = "primaryColour",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary: Option<String>,
    #[serde(alias = "secondaryColour", skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawShadow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(alias = "color", skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
}

impl From<&Appearance> for RawAppearance {
    fn from(appearance: &Appearance) -> Self {
        let fill = appearance.fill();
        let border = appearance.border();
        let shadow = appearance.shadow();
        Self {
            fill: Some(RawFill {
                style: Some(fill.style().as_str().to_string()),
                primary: Some(fill.primary().to_string()),
                secondary: fill.secondary().map(|c| c.to_string()),
                direction: fill.stripes().map(|s| s.direction().as_str().to_string()),
                thickness: fill.stripes().map(|s| s.thickness().as_str().to_string()),
            }),
            border: Some(RawBorder {
                style: Some(border.style().as_str().to_string()),
                thickness: Some(border.thickness().as_str().to_string()),
                primary: border.primary().map(|c| c.to_string()),
                secondary: border.secondary().map(|c| c.to_string()),
            }),
            shadow: Some(RawShadow {
                style: Some(shadow.style().as_str().to_string()),
                colour: shadow.colour().map(|c| c.to_string()),
            }),
        }
    }
}

/// Parse a colour and keep it only if the caller may use it.
fn permitted_colour(raw: Option<&str>, unlocks: &UnlockSet) -> Option<Colour> {
    raw.and_then(|s| Colour::parse(s).ok())
        .filter(|colour| unlocks.permits(colour))
}

fn permitted_fill_style(style: FillStyle, unlocks: &UnlockSet) -> FillStyle {
    let mut candidate = style;
    while !unlocks.permits(&candidate) {
        match candidate.fallback() {
            Some(next) => candidate = next,
            None => break,
        }
    }
    candidate
}

fn permitted_border_style(style: BorderStyle, unlocks: &UnlockSet) -> BorderStyle {
    let mut candidate = style;
    while !unlocks.permits(&candidate) {
        match candidate.fallback() {
            Some(next) => candidate = next,
            None => break,
        }
    }
    candidate
}

fn normalize_fill(raw: Option<&RawFill>, unlocks: &UnlockSet) -> Fill {
    let defaults = Fill::default();
    let Some(raw) = raw else { return defaults };

    let requested = raw
        .style
        .as_deref()
        .and_then(FillStyle::parse)
        .unwrap_or(defaults.style);
    let style = permitted_fill_style(requested, unlocks);

    let primary = permitted_colour(raw.primary.as_deref(), unlocks).unwrap_or(DEFAULT_FILL_PRIMARY);
    let secondary = style.uses_secondary().then(|| {
        permitted_colour(raw.secondary.as_deref(), unlocks).unwrap_or(DEFAULT_FILL_SECONDARY)
    });
    let stripes = (style == FillStyle::Stripes).then(|| {
        let fallback = Stripes::default();
        Stripes::new(
            raw.direction
                .as_deref()
                .and_then(StripeDirection::parse)
                .unwrap_or(fallback.direction()),
            raw.thickness
                .as_deref()
                .and_then(StripeThickness::parse)
                .unwrap_or(fallback.thickness()),
        )
    });

    Fill {
        style,
        primary,
        secondary,
        stripes,
    }
}

fn normalize_border(raw: Option<&RawBorder>, unlocks: &UnlockSet) -> Border {
    let Some(raw) = raw else {
        return Border::default();
    };

    let requested = raw
        .style
        .as_deref()
        .and_then(BorderStyle::parse)
        .unwrap_or(BorderStyle::None);
    let style = permitted_border_style(requested, unlocks);
    if !style.is_visible() {
        return Border::hidden();
    }

    let thickness = match raw.thickness.as_deref().and_then(BorderThickness::parse) {
        Some(BorderThickness::None) | None => DEFAULT_BORDER_THICKNESS,
        Some(thickness) => thickness,
    };
    let primary =
        permitted_colour(raw.primary.as_deref(), unlocks).unwrap_or(DEFAULT_BORDER_PRIMARY);
    let secondary = style.uses_secondary().then(|| {
        permitted_colour(raw.secondary.as_deref(), unlocks).unwrap_or(DEFAULT_BORDER_SECONDARY)
    });

    Border {
        style,
        thickness,
        primary: Some(primary),
        secondary,
    }
}

fn normalize_shadow(raw: Option<&RawShadow>, unlocks: &UnlockSet) -> Shadow {
    let Some(raw) = raw else {
        return Shadow::default();
    };

    let style = raw
        .style
        .as_deref()
        .and_then(ShadowStyle::parse)
        .unwrap_or(ShadowStyle::None);
    let colour = (style != ShadowStyle::None).then(|| {
        permitted_colour(raw.colour.as_deref(), unlocks).unwrap_or(DEFAULT_SHADOW_COLOUR)
    });

    Shadow { style, colour }
}

/// Produce a valid [`Appearance`] from possibly partial, stale or malformed
/// input.
///
/// Missing or unparseable fields take the canonical default. Values that need
/// an unlock missing from `unlocks` are downgraded to the nearest permitted
/// fallback, and fields the resulting styles do not use are dropped.
/// Idempotent: normalizing the output again yields the same value.
#[must_use]
pub fn normalize(raw: &RawAppearance, unlocks: &UnlockSet) -> Appearance {
    Appearance {
        fill: normalize_fill(raw.fill.as_ref(), unlocks),
        border: normalize_border(raw.border.as_ref(), unlocks),
        shadow: normalize_shadow(raw.shadow.as_ref(), unlocks),
    }
}
