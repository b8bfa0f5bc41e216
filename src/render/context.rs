use crate::assets::glyph::GlyphRaster;
use crate::foundation::core::Rgb;
use crate::foundation::error::DotmorphResult;
use crate::render::geometry::QuadVertex;

/// Opaque handle for a compiled-and-linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u64);

/// Opaque handle for a 2D glyph texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Opaque handle for a vertex array and its interleaved buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Vertex and fragment shader source text, supplied by the embedding collaborator at
/// program-link time. The engine does not parse or validate it beyond the GPU's own
/// compile/link status.
#[derive(Clone, Copy, Debug)]
pub struct ProgramSource<'a> {
    /// Vertex stage source.
    pub vertex: &'a str,
    /// Fragment stage source.
    pub fragment: &'a str,
}

/// The shader parameters written once per glyph draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawUniforms {
    /// Glyph and dot fill color, unit floats.
    pub glyph_color: [f32; 3],
    /// Dot diameter as a fraction of the glyph quad.
    pub dot_size: f32,
    /// Horizontal dot scale from the collapse timeline.
    pub dot_scale_x: f32,
    /// Horizontal text scale from the expand timeline.
    pub text_scale_x: f32,
    /// Vertical text scale from the expand timeline.
    pub text_scale_y: f32,
    /// Dot/text blend edge width, `0..=1`.
    pub mix_threshold: f32,
    /// Dot/text blend progress, clamped to `0..=1`.
    pub mix_transition: f32,
    /// Edge-smoothing width as a fraction of the glyph quad.
    pub smoothing: f32,
}

/// GPU collaborator: compiles programs, owns textures and meshes, issues draw calls.
///
/// One context is created by the embedder and passed by reference into every engine
/// operation that touches the GPU; resource handles are only meaningful on the
/// context that created them. All creation failures are fatal and never retried.
pub trait GpuContext {
    /// Compile and link a shader pair. Rejection surfaces the GPU's diagnostic as a
    /// [`crate::DotmorphError::Shader`].
    fn compile_program(&mut self, source: &ProgramSource<'_>) -> DotmorphResult<ProgramId>;

    /// Release a program. No-op for an unknown handle.
    fn delete_program(&mut self, program: ProgramId);

    /// Allocate a square RGBA8 texture.
    fn create_texture(&mut self, size: u32) -> DotmorphResult<TextureId>;

    /// Replace a texture's contents with a fresh raster (whole-texture upload).
    fn write_texture(&mut self, texture: TextureId, raster: &GlyphRaster) -> DotmorphResult<()>;

    /// Release a texture. No-op for an unknown handle.
    fn delete_texture(&mut self, texture: TextureId);

    /// Allocate a glyph quad mesh (vertex array + interleaved buffer).
    fn create_mesh(&mut self) -> DotmorphResult<MeshId>;

    /// Replace a mesh's vertex data (full buffer replace, never partial).
    fn write_mesh(&mut self, mesh: MeshId, vertices: &[QuadVertex; 6]) -> DotmorphResult<()>;

    /// Release a mesh. No-op for an unknown handle.
    fn delete_mesh(&mut self, mesh: MeshId);

    /// Clear the render target to an opaque color.
    fn clear(&mut self, color: Rgb) -> DotmorphResult<()>;

    /// Draw one alpha-blended 6-vertex glyph quad.
    fn draw(
        &mut self,
        program: ProgramId,
        mesh: MeshId,
        texture: TextureId,
        uniforms: &DrawUniforms,
    ) -> DotmorphResult<()>;
}
