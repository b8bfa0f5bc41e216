use super::*;
use serde_json::json;

#[test]
fn entity_defaults_match_reference_values() {
    let config = EntityConfig::default();
    assert_eq!(config.duration.dot_collapse, 125.0);
    assert_eq!(config.duration.text_expand, 125.0);
    assert_eq!(config.duration.dot_to_text, 125.0);
    assert_eq!(config.easing.dot_collapse, CubicBezier([0.8, 1.5, 0.8, 1.0]));
    assert_eq!(config.size, 144);
    assert_eq!(config.font, "Inter");
    assert_eq!(config.font_size, 144.0);
    assert_eq!(config.font_weight, 700.0);
    assert_eq!(config.dot_size, 32.0);
    assert_eq!(config.smoothing, 1.0);
    assert_eq!(config.color, Rgb([18, 16, 14]));
    assert_eq!(config.mix_threshold, 0.1);
}

#[test]
fn partial_duration_override_preserves_siblings() {
    let config =
        EntityConfig::with_overrides(&json!({"duration": {"dot_collapse": 200.0}})).unwrap();
    assert_eq!(config.duration.dot_collapse, 200.0);
    assert_eq!(config.duration.text_expand, 125.0);
    assert_eq!(config.duration.dot_to_text, 125.0);
    assert_eq!(config.size, 144);
}

#[test]
fn easing_curve_overrides_replace_wholesale() {
    let config =
        EntityConfig::with_overrides(&json!({"easing": {"dot_collapse": [0.0, 0.0, 1.0, 1.0]}}))
            .unwrap();
    assert_eq!(config.easing.dot_collapse, CubicBezier([0.0, 0.0, 1.0, 1.0]));
    assert_eq!(config.easing.text_expand, CubicBezier([0.8, 1.5, 0.8, 1.0]));
}

#[test]
fn color_overrides_replace_wholesale() {
    let config = EntityConfig::with_overrides(&json!({"color": [255, 0, 0]})).unwrap();
    assert_eq!(config.color, Rgb([255, 0, 0]));
}

#[test]
fn mistyped_override_is_a_validation_error() {
    let err = EntityConfig::with_overrides(&json!({"size": "large"})).unwrap_err();
    assert!(matches!(err, DotmorphError::Validation(_)));
}

#[test]
fn renderer_defaults_match_reference_values() {
    let config = RendererConfig::default();
    assert_eq!(config.background_color, Rgb([253, 233, 62]));
    assert_eq!(config.glyph_count, 5);
    assert_eq!(config.spacing, 160.0);
    assert_eq!(config.interval, 500.0);
    assert_eq!(config.glyph, json!({}));
}

#[test]
fn renderer_rejects_out_of_range_glyph_count() {
    for count in [0usize, 11] {
        let err = RendererConfig::with_overrides(&json!({"glyph_count": count})).unwrap_err();
        assert!(matches!(err, DotmorphError::Validation(_)));
    }
    assert!(RendererConfig::with_overrides(&json!({"glyph_count": 10})).is_ok());
}

#[test]
fn nested_glyph_partial_is_carried_sparse() {
    let config =
        RendererConfig::with_overrides(&json!({"glyph": {"dot_size": 48.0}})).unwrap();
    assert_eq!(config.glyph, json!({"dot_size": 48.0}));
}
