use std::time::Instant;

use serde_json::Value;

use crate::assets::glyph::{GlyphSurface, TextSurface};
use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::render::context::{GpuContext, ProgramId, ProgramSource};
use crate::scene::config::RendererConfig;
use crate::scene::entity::{EntityData, GlyphEntity};

/// Handle for a scheduled-but-not-yet-fired frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(pub u64);

/// Host frame-scheduling primitive.
///
/// `request_frame` registers interest in one upcoming frame callback and returns a
/// handle; `cancel_frame` revokes a request that has not fired yet. The engine holds
/// at most one outstanding request per controller.
pub trait FrameScheduler {
    /// Schedule the next frame callback.
    fn request_frame(&mut self) -> FrameRequest;
    /// Cancel a pending request. Requests that already fired are simply unknown.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Scene controller: owns the shared program, the fixed glyph roster, the animation
/// clock, and the frame-loop bookkeeping.
///
/// The controller never self-terminates. The composition layer (see
/// [`crate::scene::reveal::Reveal`]) is responsible for calling [`Renderer::stop`]
/// and [`Renderer::free`] once completion is reported; otherwise the controller keeps
/// rescheduling frames forever, settled final frame included.
pub struct Renderer {
    config: RendererConfig,
    entities: Vec<GlyphEntity>,
    surface: Box<dyn GlyphSurface>,
    viewport: Viewport,
    program: Option<ProgramId>,
    tick: f64,
    last_update: Option<Instant>,
    pending_frame: Option<FrameRequest>,
    callback: Option<Box<dyn FnMut(bool)>>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("entity_count", &self.entities.len())
            .field("viewport", &self.viewport)
            .field("program", &self.program)
            .field("tick", &self.tick)
            .field("last_update", &self.last_update)
            .field("pending_frame", &self.pending_frame)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Construct a controller with the built-in text surface.
    pub fn new(
        gpu: &mut dyn GpuContext,
        source: &ProgramSource<'_>,
        viewport: Viewport,
        overrides: &Value,
    ) -> DotmorphResult<Self> {
        Self::with_surface(gpu, source, Box::new(TextSurface::new()), viewport, overrides)
    }

    /// Construct a controller with a caller-supplied glyph surface.
    #[tracing::instrument(skip(gpu, source, surface, overrides))]
    pub fn with_surface(
        gpu: &mut dyn GpuContext,
        source: &ProgramSource<'_>,
        surface: Box<dyn GlyphSurface>,
        viewport: Viewport,
        overrides: &Value,
    ) -> DotmorphResult<Self> {
        let config = RendererConfig::with_overrides(overrides)?;

        // The program is compiled once and shared by every entity.
        let program = gpu.compile_program(source)?;
        tracing::debug!(glyphs = config.glyph_count, "compiled shared glyph program");

        let entities = (0..config.glyph_count)
            .map(|index| {
                GlyphEntity::new(
                    EntityData {
                        character: String::new(),
                        position: anchor_position(
                            index,
                            config.glyph_count,
                            config.spacing,
                            viewport,
                        ),
                    },
                    &config.glyph,
                )
            })
            .collect::<DotmorphResult<Vec<_>>>()?;

        Ok(Self {
            config,
            entities,
            surface,
            viewport,
            program: Some(program),
            tick: 0.0,
            last_update: None,
            pending_frame: None,
            callback: None,
        })
    }

    /// The controller's effective configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The glyph roster, left to right.
    pub fn entities(&self) -> &[GlyphEntity] {
        &self.entities
    }

    /// Current accumulated tick in milliseconds.
    pub fn tick(&self) -> f64 {
        self.tick
    }

    /// Install the per-frame completion callback.
    pub fn set_callback(&mut self, callback: impl FnMut(bool) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Initialize every entity's GPU resources and start the animation clock.
    pub fn initialize(&mut self, gpu: &mut dyn GpuContext) -> DotmorphResult<()> {
        for entity in &mut self.entities {
            entity.initialize(gpu, self.surface.as_mut(), self.viewport)?;
        }
        self.last_update = Some(Instant::now());
        tracing::debug!(glyphs = self.entities.len(), "renderer initialized");
        Ok(())
    }

    /// Schedule the next frame callback.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.pending_frame = Some(scheduler.request_frame());
    }

    /// Cancel the pending frame callback, if any. Idempotent.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(request) = self.pending_frame.take() {
            scheduler.cancel_frame(request);
        }
    }

    /// Render one frame: advance the clock, clear, draw every entity at its
    /// staggered local tick, reschedule, and report aggregate completion.
    ///
    /// Every entity is evaluated and drawn every frame; the aggregate deliberately
    /// does not short-circuit.
    pub fn render(
        &mut self,
        gpu: &mut dyn GpuContext,
        scheduler: &mut dyn FrameScheduler,
    ) -> DotmorphResult<bool> {
        let program = self
            .program
            .ok_or_else(|| DotmorphError::uninitialized("renderer has been freed"))?;

        let now = Instant::now();
        if let Some(last) = self.last_update {
            self.tick += now.duration_since(last).as_secs_f64() * 1000.0;
        }
        self.last_update = Some(now);

        gpu.clear(self.config.background_color)?;

        let mut finished = true;
        for (index, entity) in self.entities.iter_mut().enumerate() {
            let local = self.tick - index as f64 * self.config.interval;
            let entity_finished = entity.render(gpu, program, local)?;
            finished = finished && entity_finished;
        }

        self.pending_frame = Some(scheduler.request_frame());

        if let Some(callback) = self.callback.as_mut() {
            callback(finished);
        }
        Ok(finished)
    }

    /// Force-set the tick counter (deterministic testing and seeking).
    pub fn set_tick(&mut self, tick: f64) {
        self.tick = tick;
    }

    /// Distribute the first N characters across the roster in order.
    ///
    /// Entities beyond the input keep their previous character; only affected
    /// entities regenerate their texture.
    pub fn update_characters(
        &mut self,
        gpu: &mut dyn GpuContext,
        characters: &str,
    ) -> DotmorphResult<()> {
        for (entity, character) in self.entities.iter_mut().zip(characters.chars()) {
            entity.data.character = character.to_string();
            entity.update_character(gpu, self.surface.as_mut())?;
        }
        Ok(())
    }

    /// Adopt a new viewport: re-derive the roster anchors around its horizontal
    /// center and regenerate every entity's geometry.
    pub fn update_size(&mut self, gpu: &mut dyn GpuContext, viewport: Viewport) -> DotmorphResult<()> {
        self.viewport = viewport;
        let count = self.entities.len();
        for (index, entity) in self.entities.iter_mut().enumerate() {
            entity.data.position = anchor_position(index, count, self.config.spacing, viewport);
            entity.update_size(gpu, viewport)?;
        }
        Ok(())
    }

    /// Release every entity's GPU resources and the shared program. Idempotent.
    pub fn free(&mut self, gpu: &mut dyn GpuContext) {
        for entity in &mut self.entities {
            entity.free(gpu);
        }
        if let Some(program) = self.program.take() {
            gpu.delete_program(program);
        }
    }
}

/// Roster layout: left to right around the viewport's horizontal center, vertically
/// centered, `spacing` pixels between anchors.
fn anchor_position(index: usize, count: usize, spacing: f64, viewport: Viewport) -> Point {
    let centered = index as f64 - (count as f64 - 1.0) / 2.0;
    Point::new(
        f64::from(viewport.width) / 2.0 + centered * spacing,
        f64::from(viewport.height) / 2.0,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/renderer.rs"]
mod tests;
