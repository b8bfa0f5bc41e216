use serde_json::Value;

use crate::animation::ease::CubicBezier;
use crate::foundation::core::Rgb;
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::foundation::merge::merge;

/// Per-phase animation durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseDurations {
    /// The dot collapsing horizontally.
    pub dot_collapse: f64,
    /// The glyph expanding out of the collapsed dot.
    pub text_expand: f64,
    /// The dot/text blend window.
    pub dot_to_text: f64,
}

/// Per-phase easing curves.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseCurves {
    pub dot_collapse: CubicBezier,
    pub text_expand: CubicBezier,
    pub dot_to_text: CubicBezier,
}

/// Immutable-per-instance glyph entity configuration.
///
/// Built once at entity construction by merging these defaults with a sparse caller
/// override (see [`EntityConfig::with_overrides`]); never mutated afterwards except
/// through an explicit re-merge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityConfig {
    /// Phase durations, milliseconds.
    pub duration: PhaseDurations,
    /// Phase easing curves.
    pub easing: PhaseCurves,
    /// Square glyph texture dimension, pixels.
    pub size: u32,
    /// Font family name, resolved against the host's installed fonts.
    pub font: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight (CSS-style scale, 400 regular / 700 bold).
    pub font_weight: f32,
    /// Placeholder dot diameter, pixels.
    pub dot_size: f64,
    /// Edge-smoothing width, pixels.
    pub smoothing: f64,
    /// Glyph and dot fill color.
    pub color: Rgb,
    /// Fraction of the blend window treated as the dot/text mix edge.
    pub mix_threshold: f64,
}

const DEFAULT_CURVE: CubicBezier = CubicBezier([0.8, 1.5, 0.8, 1.0]);

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            duration: PhaseDurations {
                dot_collapse: 125.0,
                text_expand: 125.0,
                dot_to_text: 125.0,
            },
            easing: PhaseCurves {
                dot_collapse: DEFAULT_CURVE,
                text_expand: DEFAULT_CURVE,
                dot_to_text: DEFAULT_CURVE,
            },
            size: 144,
            font: "Inter".to_owned(),
            font_size: 144.0,
            font_weight: 700.0,
            dot_size: 32.0,
            smoothing: 1.0,
            color: Rgb([18, 16, 14]),
            mix_threshold: 0.1,
        }
    }
}

impl EntityConfig {
    /// Merge a sparse JSON override onto the defaults.
    pub fn with_overrides(partial: &Value) -> DotmorphResult<Self> {
        Self::default().merged_with(partial)
    }

    /// Merge a sparse JSON override onto this configuration, producing a new one.
    pub fn merged_with(&self, partial: &Value) -> DotmorphResult<Self> {
        let base = serde_json::to_value(self)
            .map_err(|e| DotmorphError::validation(format!("entity config serialize: {e}")))?;
        serde_json::from_value(merge(&base, partial))
            .map_err(|e| DotmorphError::validation(format!("invalid entity config override: {e}")))
    }
}

/// Scene controller configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RendererConfig {
    /// Background clear color.
    pub background_color: Rgb,
    /// Number of glyph slots, `1..=10`.
    pub glyph_count: usize,
    /// Horizontal distance between glyph anchors, pixels.
    pub spacing: f64,
    /// Per-glyph stagger interval, milliseconds.
    pub interval: f64,
    /// Sparse [`EntityConfig`] override applied to every glyph.
    pub glyph: Value,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background_color: Rgb([253, 233, 62]),
            glyph_count: 5,
            spacing: 160.0,
            interval: 500.0,
            glyph: Value::Object(serde_json::Map::new()),
        }
    }
}

impl RendererConfig {
    /// Merge a sparse JSON override onto the defaults and validate the result.
    pub fn with_overrides(partial: &Value) -> DotmorphResult<Self> {
        let base = serde_json::to_value(Self::default())
            .map_err(|e| DotmorphError::validation(format!("renderer config serialize: {e}")))?;
        let config: Self = serde_json::from_value(merge(&base, partial))
            .map_err(|e| DotmorphError::validation(format!("invalid renderer config override: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check configuration bounds.
    pub fn validate(&self) -> DotmorphResult<()> {
        if !(1..=10).contains(&self.glyph_count) {
            return Err(DotmorphError::validation(
                "glyph_count must be in 1..=10",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
