use serde_json::Value;

use crate::animation::ease::Timeline;
use crate::assets::glyph::GlyphSurface;
use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::render::context::{DrawUniforms, GpuContext, MeshId, ProgramId, TextureId};
use crate::render::geometry::glyph_quad;
use crate::scene::config::EntityConfig;

/// The mutable per-slot state the controller rewrites when the displayed string or
/// the viewport changes.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityData {
    /// A single glyph; empty means "no glyph".
    pub character: String,
    /// Anchor position in pixels, origin top-left.
    pub position: Point,
}

struct PhaseTimelines {
    dot_collapse: Timeline,
    text_expand: Timeline,
    dot_to_text: Timeline,
}

impl PhaseTimelines {
    fn derive(config: &EntityConfig) -> Self {
        let d = config.duration;
        let total = d.dot_collapse + d.text_expand;
        Self {
            dot_collapse: Timeline::new(config.easing.dot_collapse, d.dot_collapse, 0.0),
            text_expand: Timeline::new(config.easing.text_expand, d.text_expand, d.dot_collapse),
            // Centered on the collapse->expand handoff, independent of its own length.
            dot_to_text: Timeline::new(
                config.easing.dot_to_text,
                d.dot_to_text,
                (total - d.dot_to_text) / 2.0,
            ),
        }
    }
}

/// One animated character slot: a glyph texture, a quad mesh, and three chained
/// easing timelines.
///
/// GPU resources are allocated by [`GlyphEntity::initialize`] and tracked
/// independently so that [`GlyphEntity::free`] stays idempotent per resource.
pub struct GlyphEntity {
    /// Character and anchor position, rewritten by the controller.
    pub data: EntityData,
    config: EntityConfig,
    timing: PhaseTimelines,
    texture: Option<TextureId>,
    mesh: Option<MeshId>,
}

impl GlyphEntity {
    /// Build an entity from its slot data and a sparse configuration override.
    pub fn new(data: EntityData, overrides: &Value) -> DotmorphResult<Self> {
        let config = EntityConfig::with_overrides(overrides)?;
        let timing = PhaseTimelines::derive(&config);
        Ok(Self {
            data,
            config,
            timing,
            texture: None,
            mesh: None,
        })
    }

    /// The entity's effective configuration.
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Re-merge a sparse override onto the current configuration and rebuild the
    /// derived timelines.
    pub fn set_config(&mut self, partial: &Value) -> DotmorphResult<()> {
        self.config = self.config.merged_with(partial)?;
        self.timing = PhaseTimelines::derive(&self.config);
        Ok(())
    }

    /// Total animation length in milliseconds: collapse plus expand.
    pub fn animation_duration(&self) -> f64 {
        self.config.duration.dot_collapse + self.config.duration.text_expand
    }

    /// Allocate GPU resources and upload the initial texture and geometry.
    ///
    /// Must be called exactly once before any render or update call.
    pub fn initialize(
        &mut self,
        gpu: &mut dyn GpuContext,
        surface: &mut dyn GlyphSurface,
        viewport: Viewport,
    ) -> DotmorphResult<()> {
        if self.texture.is_some() || self.mesh.is_some() {
            return Err(DotmorphError::validation("entity is already initialized"));
        }

        self.texture = Some(gpu.create_texture(self.config.size)?);
        self.update_character(gpu, surface)?;

        self.mesh = Some(gpu.create_mesh()?);
        self.update_size(gpu, viewport)?;
        Ok(())
    }

    /// Regenerate only the texture from the current character. Silent no-op before
    /// initialization.
    pub fn update_character(
        &mut self,
        gpu: &mut dyn GpuContext,
        surface: &mut dyn GlyphSurface,
    ) -> DotmorphResult<()> {
        let Some(texture) = self.texture else {
            return Ok(());
        };
        let raster = surface.rasterize(&self.data.character, &self.config)?;
        gpu.write_texture(texture, &raster)
    }

    /// Regenerate only the geometry from the current anchor and viewport. Silent
    /// no-op before initialization.
    pub fn update_size(&mut self, gpu: &mut dyn GpuContext, viewport: Viewport) -> DotmorphResult<()> {
        let Some(mesh) = self.mesh else {
            return Ok(());
        };
        let quad = glyph_quad(self.data.position, f64::from(self.config.size), viewport);
        gpu.write_mesh(mesh, &quad)
    }

    /// Evaluate the three timelines at `tick` and issue this glyph's draw call
    /// against the shared `program`.
    ///
    /// The tick is clamped into `[0, animation_duration]` before evaluation, so
    /// out-of-window frames draw the settled first/last state. Returns whether the
    /// local animation has fully elapsed (exclusive at the boundary).
    pub fn render(
        &mut self,
        gpu: &mut dyn GpuContext,
        program: ProgramId,
        tick: f64,
    ) -> DotmorphResult<bool> {
        let (Some(texture), Some(mesh)) = (self.texture, self.mesh) else {
            return Err(DotmorphError::uninitialized(
                "entity render called before initialize",
            ));
        };

        let duration = self.animation_duration();
        // min/max rather than clamp: a pathological negative duration must not panic.
        let inner = tick.min(duration).max(0.0);
        let text_scale = self.timing.text_expand.sample(inner) as f32;
        let size = f64::from(self.config.size);

        let uniforms = DrawUniforms {
            glyph_color: self.config.color.to_unit(),
            dot_size: (self.config.dot_size / size) as f32,
            dot_scale_x: self.timing.dot_collapse.sample(inner) as f32,
            text_scale_x: text_scale,
            text_scale_y: text_scale,
            mix_threshold: self.config.mix_threshold as f32,
            mix_transition: self.timing.dot_to_text.sample(inner).min(1.0).max(0.0) as f32,
            smoothing: (self.config.smoothing / size) as f32,
        };
        gpu.draw(program, mesh, texture, &uniforms)?;

        Ok(tick > duration)
    }

    /// Release GPU resources. Safe to call repeatedly; each release is a no-op on an
    /// already-absent resource.
    pub fn free(&mut self, gpu: &mut dyn GpuContext) {
        if let Some(mesh) = self.mesh.take() {
            gpu.delete_mesh(mesh);
        }
        if let Some(texture) = self.texture.take() {
            gpu.delete_texture(texture);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entity.rs"]
mod tests;
