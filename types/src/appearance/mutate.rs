//! Unlock-gated appearance mutations.
//!
//! Every mutation returns a new [`Appearance`]. A request the caller is not
//! entitled to (locked value, or a slot the current style does not use) is
//! refused by returning an unchanged copy; nothing here fails.

use super::{
    Appearance, Border, BorderStyle, BorderThickness, DEFAULT_BORDER_PRIMARY,
    DEFAULT_BORDER_SECONDARY, DEFAULT_BORDER_THICKNESS, DEFAULT_FILL_SECONDARY,
    DEFAULT_SHADOW_COLOUR, FillStyle, RawAppearance, ShadowStyle, StripeDirection,
    StripeThickness, normalize,
};
use crate::colour::Colour;
use crate::unlock::UnlockSet;

/// Which colour of a two-colour element is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourSlot {
    Primary,
    Secondary,
}

impl Appearance {
    #[must_use]
    pub fn with_fill_style(&self, style: FillStyle, unlocks: &UnlockSet) -> Self {
        if !unlocks.permits(&style) {
            return *self;
        }
        let mut next = *self;
        next.fill.style = style;
        if style.uses_secondary() && next.fill.secondary.is_none() {
            next.fill.secondary = Some(DEFAULT_FILL_SECONDARY);
        }
        if style == FillStyle::Stripes && next.fill.stripes.is_none() {
            next.fill.stripes = Some(Default::default());
        }
        next
    }

    #[must_use]
    pub fn with_fill_colour(&self, slot: ColourSlot, colour: Colour, unlocks: &UnlockSet) -> Self {
        if !unlocks.permits(&colour) {
            return *self;
        }
        let mut next = *self;
        match slot {
            ColourSlot::Primary => next.fill.primary = colour,
            ColourSlot::Secondary if self.fill.style.uses_secondary() => {
                next.fill.secondary = Some(colour);
            }
            ColourSlot::Secondary => return *self,
        }
        next
    }

    #[must_use]
    pub fn with_fill_stripe_direction(
        &self,
        direction: StripeDirection,
        unlocks: &UnlockSet,
    ) -> Self {
        if !unlocks.permits(&direction) || self.fill.style != FillStyle::Stripes {
            return *self;
        }
        let mut next = *self;
        let current = self.fill.stripes.unwrap_or_default();
        next.fill.stripes = Some(super::Stripes::new(direction, current.thickness()));
        next
    }

    #[must_use]
    pub fn with_fill_stripe_thickness(
        &self,
        thickness: StripeThickness,
        unlocks: &UnlockSet,
    ) -> Self {
        if !unlocks.permits(&thickness) || self.fill.style != FillStyle::Stripes {
            return *self;
        }
        let mut next = *self;
        let current = self.fill.stripes.unwrap_or_default();
        next.fill.stripes = Some(super::Stripes::new(current.direction(), thickness));
        next
    }

    /// Change the border style.
    ///
    /// `none` hides the border entirely (thickness `none`, no colours).
    /// Showing a hidden border assigns the default thickness and colour.
    #[must_use]
    pub fn with_border_style(&self, style: BorderStyle, unlocks: &UnlockSet) -> Self {
        if !unlocks.permits(&style) {
            return *self;
        }
        let mut next = *self;
        if !style.is_visible() {
            next.border = Border::hidden();
            return next;
        }

        let border = &mut next.border;
        border.style = style;
        if border.thickness == BorderThickness::None {
            border.thickness = DEFAULT_BORDER_THICKNESS;
        }
        border.primary.get_or_insert(DEFAULT_BORDER_PRIMARY);
        if style.uses_secondary() {
            border.secondary.get_or_insert(DEFAULT_BORDER_SECONDARY);
        } else {
            border.secondary = None;
        }
        next
    }

    /// Change the border thickness.
    ///
    /// `none` on a visible border hides it. Any other thickness on a hidden
    /// border is refused.
    #[must_use]
    pub fn with_border_thickness(&self, thickness: BorderThickness, unlocks: &UnlockSet) -> Self {
        if thickness == BorderThickness::None {
            return self.with_border_style(BorderStyle::None, unlocks);
        }
        if !self.border.style.is_visible() {
            return *self;
        }
        let mut next = *self;
        next.border.thickness = thickness;
        next
    }

    #[must_use]
    pub fn with_border_colour(
        &self,
        slot: ColourSlot,
        colour: Colour,
        unlocks: &UnlockSet,
    ) -> Self {
        if !unlocks.permits(&colour) {
            return *self;
        }
        let style = self.border.style;
        let mut next = *self;
        match slot {
            ColourSlot::Primary if style.is_visible() => next.border.primary = Some(colour),
            ColourSlot::Secondary if style.uses_secondary() => {
                next.border.secondary = Some(colour);
            }
            ColourSlot::Primary | ColourSlot::Secondary => return *self,
        }
        next
    }

    /// Change the shadow style. `none` removes the colour.
    #[must_use]
    pub fn with_shadow_style(&self, style: ShadowStyle, unlocks: &UnlockSet) -> Self {
        if !unlocks.permits(&style) {
            return *self;
        }
        let mut next = *self;
        next.shadow.style = style;
        if style == ShadowStyle::None {
            next.shadow.colour = None;
        } else {
            next.shadow.colour.get_or_insert(DEFAULT_SHADOW_COLOUR);
        }
        next
    }

    #[must_use]
    pub fn with_shadow_colour(&self, colour: Colour, unlocks: &UnlockSet) -> Self {
        if !unlocks.permits(&colour) || self.shadow.style == ShadowStyle::None {
            return *self;
        }
        let mut next = *self;
        next.shadow.colour = Some(colour);
        next
    }
}

/// A single user edit, or a wholesale replacement, of the appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppearanceChange {
    FillStyle(FillStyle),
    FillColour(ColourSlot, Colour),
    FillStripeDirection(StripeDirection),
    FillStripeThickness(StripeThickness),
    BorderStyle(BorderStyle),
    BorderThickness(BorderThickness),
    BorderColour(ColourSlot, Colour),
    ShadowStyle(ShadowStyle),
    ShadowColour(Colour),
    /// Replace everything; the value is normalized against the caller's unlocks.
    Replace(RawAppearance),
}

impl AppearanceChange {
    /// Apply this change to `current`. Refused changes return `current`.
    #[must_use]
    pub fn apply(&self, current: &Appearance, unlocks: &UnlockSet) -> Appearance {
        match self {
            Self::FillStyle(style) => current.with_fill_style(*style, unlocks),
            Self::FillColour(slot, colour) => current.with_fill_colour(*slot, *colour, unlocks),
            Self::FillStripeDirection(direction) => {
                current.with_fill_stripe_direction(*direction, unlocks)
            }
            Self::FillStripeThickness(thickness) => {
                current.with_fill_stripe_thickness(*thickness, unlocks)
            }
            Self::BorderStyle(style) => current.with_border_style(*style, unlocks),
            Self::BorderThickness(thickness) => current.with_border_thickness(*thickness, unlocks),
            Self::BorderColour(slot, colour) => current.with_border_colour(*slot, *colour, unlocks),
            Self::ShadowStyle(style) => current.with_shadow_style(*style, unlocks),
            Self::ShadowColour(colour) => current.with_shadow_colour(*colour, unlocks),
            Self::Replace(raw) => normalize(raw, unlocks),
        }
    }
}
