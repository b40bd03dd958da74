//! Core domain types for Bitflip.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the unlock ladder, the appearance model with its gated mutations and
//! normalization, and the profile aggregate.

pub mod appearance;
pub mod colour;
pub mod profile;
pub mod settings;
pub mod unlock;

pub use appearance::{
    Appearance, AppearanceChange, Border, BorderStyle, BorderThickness, ColourSlot, Fill,
    FillStyle, RawAppearance, RawBorder, RawFill, RawShadow, Shadow, ShadowStyle,
    StripeDirection, StripeThickness, Stripes, normalize,
};
pub use colour::{BASE_PALETTE, Colour, ColourError, PACK1_PALETTE};
pub use profile::{EmptyUserIdError, FlipState, Profile, UserId};
pub use settings::SyncSettings;
pub use unlock::{Gated, Requirement, UnlockSet, compute_unlocks};
