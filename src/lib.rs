//! Dotmorph renders a short looping text-reveal animation: a row of placeholder dots
//! collapses and morphs into the glyphs of a target string, drawn with a GPU shader.
//!
//! The embedding host supplies shader program source text and a frame-scheduling
//! primitive; the crate supplies the per-glyph animation engine:
//!
//! - Build a [`Reveal`] with a [`GpuContext`] implementation (the `gpu` feature ships
//!   an offscreen `wgpu` one) and a [`ProgramSource`]
//! - Forward each fired frame callback to [`Reveal::on_frame`]
//! - The reveal stops its loop and releases GPU resources once every glyph settles
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod foundation;
pub mod render;
pub mod scene;

pub use animation::ease::{CubicBezier, Timeline};
pub use assets::glyph::{GlyphRaster, GlyphSurface, TextSurface};
pub use foundation::core::{Point, Rgb, Viewport};
pub use foundation::error::{DotmorphError, DotmorphResult};
pub use foundation::merge::merge;
pub use render::context::{DrawUniforms, GpuContext, MeshId, ProgramId, ProgramSource, TextureId};
pub use render::geometry::{QuadVertex, glyph_quad};
pub use render::shaders::dot_to_text_source;
pub use scene::config::{EntityConfig, PhaseCurves, PhaseDurations, RendererConfig};
pub use scene::entity::{EntityData, GlyphEntity};
pub use scene::renderer::{FrameRequest, FrameScheduler, Renderer};
pub use scene::reveal::Reveal;

#[cfg(feature = "gpu")]
pub use render::gpu::{FrameRgba, WgpuContext};
