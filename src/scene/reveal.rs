use serde_json::Value;

use crate::assets::glyph::GlyphSurface;
use crate::foundation::core::Viewport;
use crate::foundation::error::DotmorphResult;
use crate::render::context::{GpuContext, ProgramSource};
use crate::scene::renderer::{FrameScheduler, Renderer};

/// Text shown when the caller does not supply any.
const DEFAULT_TEXT: &str = "MORPH";

/// Composition entry point: a wired, seeded, running reveal animation.
///
/// Owns the controller and the stop-and-free-on-completion behavior the controller
/// itself never performs. The host forwards each fired frame callback to
/// [`Reveal::on_frame`]; once the animation completes, the loop is stopped, GPU
/// resources are released, and the reveal latches as done.
pub struct Reveal {
    renderer: Renderer,
    done: bool,
}

impl Reveal {
    /// Wire a controller with the built-in text surface, seed it, and start the
    /// frame loop.
    pub fn new(
        gpu: &mut dyn GpuContext,
        scheduler: &mut dyn FrameScheduler,
        source: &ProgramSource<'_>,
        viewport: Viewport,
        text: Option<&str>,
        overrides: &Value,
    ) -> DotmorphResult<Self> {
        let renderer = Renderer::new(gpu, source, viewport, overrides)?;
        Self::start(renderer, gpu, scheduler, text)
    }

    /// Same as [`Reveal::new`] with a caller-supplied glyph surface.
    pub fn with_surface(
        gpu: &mut dyn GpuContext,
        scheduler: &mut dyn FrameScheduler,
        source: &ProgramSource<'_>,
        surface: Box<dyn GlyphSurface>,
        viewport: Viewport,
        text: Option<&str>,
        overrides: &Value,
    ) -> DotmorphResult<Self> {
        let renderer = Renderer::with_surface(gpu, source, surface, viewport, overrides)?;
        Self::start(renderer, gpu, scheduler, text)
    }

    fn start(
        mut renderer: Renderer,
        gpu: &mut dyn GpuContext,
        scheduler: &mut dyn FrameScheduler,
        text: Option<&str>,
    ) -> DotmorphResult<Self> {
        renderer.initialize(gpu)?;
        renderer.update_characters(gpu, text.unwrap_or(DEFAULT_TEXT))?;
        renderer.start(scheduler);
        Ok(Self {
            renderer,
            done: false,
        })
    }

    /// Drive one frame. On completion, stops the loop, frees GPU resources, and
    /// latches; later calls return `Ok(true)` without touching the GPU.
    pub fn on_frame(
        &mut self,
        gpu: &mut dyn GpuContext,
        scheduler: &mut dyn FrameScheduler,
    ) -> DotmorphResult<bool> {
        if self.done {
            return Ok(true);
        }

        let finished = self.renderer.render(gpu, scheduler)?;
        if finished {
            self.renderer.stop(scheduler);
            self.renderer.free(gpu);
            self.done = true;
            tracing::debug!("reveal complete; frame loop stopped and gpu resources released");
        }
        Ok(finished)
    }

    /// Whether the animation has completed and released its resources.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The underlying controller (seeking, resizing, re-seeding).
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Mutable access to the underlying controller.
    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}
