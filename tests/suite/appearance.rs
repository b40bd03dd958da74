//! Appearance mutation and normalization tests

use bitflip_types::unlock::ids;
use bitflip_types::{
    Appearance, AppearanceChange, BorderStyle, BorderThickness, FillStyle, RawAppearance,
    ShadowStyle, UnlockSet, compute_unlocks, normalize,
};

fn everything() -> UnlockSet {
    compute_unlocks(64, &UnlockSet::new())
}

/// A spread of appearances reachable through edits with every unlock held.
fn samples() -> Vec<Appearance> {
    let all = everything();
    let base = Appearance::default();
    let edits = [
        vec![],
        vec![AppearanceChange::FillStyle(FillStyle::Gradient)],
        vec![
            AppearanceChange::FillStyle(FillStyle::Stripes),
            AppearanceChange::BorderStyle(BorderStyle::Solid),
        ],
        vec![
            AppearanceChange::FillStyle(FillStyle::Pattern),
            AppearanceChange::BorderStyle(BorderStyle::Pattern),
            AppearanceChange::BorderThickness(BorderThickness::Thick),
            AppearanceChange::ShadowStyle(ShadowStyle::Grounded),
        ],
        vec![AppearanceChange::ShadowStyle(ShadowStyle::Hard)],
    ];
    edits
        .iter()
        .map(|steps| steps.iter().fold(base, |acc, change| change.apply(&acc, &all)))
        .collect()
}

#[test]
fn locked_fill_style_is_silently_refused() {
    let unlocks: UnlockSet = [ids::FILL_STRIPES].into_iter().collect();
    for appearance in samples() {
        let result = appearance.with_fill_style(FillStyle::Gradient, &unlocks);
        assert_eq!(result, appearance);
    }
}

#[test]
fn border_none_always_clears_thickness() {
    for appearance in samples() {
        let result = appearance.with_border_style(BorderStyle::None, &UnlockSet::new());
        assert_eq!(result.border().thickness(), BorderThickness::None);
        assert_eq!(result.border().primary(), None);
    }
}

#[test]
fn shadow_none_always_drops_colour() {
    for appearance in samples() {
        let result = appearance.with_shadow_style(ShadowStyle::None, &UnlockSet::new());
        assert_eq!(result.shadow().colour(), None);
    }
}

#[test]
fn normalize_is_idempotent_on_malformed_input() {
    let inputs = [
        serde_json::json!({}),
        serde_json::json!({ "fill": { "style": "gradient" } }),
        serde_json::json!({ "fill": { "style": "plaid", "color": "red" } }),
        serde_json::json!({ "fill": { "style": "stripes", "direction": "sideways" } }),
        serde_json::json!({ "border": { "style": "pattern", "width": "huge" } }),
        serde_json::json!({ "border": { "style": "solid", "thickness": "none" } }),
        serde_json::json!({ "shadow": { "style": "soft", "colour": "#123456" } }),
        serde_json::json!({ "fill": null, "shadow": { "style": "none", "colour": "#000000" } }),
    ];
    for unlocks in [UnlockSet::new(), everything()] {
        for input in &inputs {
            let raw: RawAppearance = serde_json::from_value(input.clone()).unwrap();
            let once = normalize(&raw, &unlocks);
            let twice = normalize(&RawAppearance::from(&once), &unlocks);
            assert_eq!(twice, once, "input {input}");
        }
    }
}

#[test]
fn gradient_without_unlock_normalizes_to_solid() {
    let raw: RawAppearance =
        serde_json::from_value(serde_json::json!({ "fill": { "style": "gradient" } })).unwrap();
    assert_eq!(
        normalize(&raw, &UnlockSet::new()).fill().style(),
        FillStyle::Solid
    );
}

#[test]
fn replace_normalizes_against_caller_unlocks() {
    let raw: RawAppearance = serde_json::from_value(serde_json::json!({
        "fill": { "style": "pattern" },
        "border": { "style": "pattern" }
    }))
    .unwrap();
    let unlocks: UnlockSet = [ids::FILL_STRIPES].into_iter().collect();
    let result = AppearanceChange::Replace(raw).apply(&Appearance::default(), &unlocks);
    assert_eq!(result.fill().style(), FillStyle::Stripes);
    assert_eq!(result.border().style(), BorderStyle::Solid);
}
