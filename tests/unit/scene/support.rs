//! Shared doubles for scene unit tests: a recording GPU, a font-free glyph surface,
//! and a counting frame scheduler.

use crate::assets::glyph::{GlyphRaster, GlyphSurface};
use crate::foundation::core::Rgb;
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::render::context::{
    DrawUniforms, GpuContext, MeshId, ProgramId, ProgramSource, TextureId,
};
use crate::render::geometry::QuadVertex;
use crate::scene::config::EntityConfig;
use crate::scene::renderer::{FrameRequest, FrameScheduler};

/// Records every GPU interaction for assertions.
#[derive(Default)]
pub struct RecordingGpu {
    pub next_id: u64,
    pub programs: Vec<ProgramId>,
    pub deleted_programs: Vec<ProgramId>,
    pub textures: Vec<TextureId>,
    pub deleted_textures: Vec<TextureId>,
    pub meshes: Vec<MeshId>,
    pub deleted_meshes: Vec<MeshId>,
    pub texture_writes: Vec<(TextureId, u32)>,
    pub mesh_writes: Vec<(MeshId, [QuadVertex; 6])>,
    pub clears: Vec<Rgb>,
    pub draws: Vec<DrawUniforms>,
    pub fail_texture_creation: bool,
}

impl RecordingGpu {
    fn id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl GpuContext for RecordingGpu {
    fn compile_program(&mut self, _source: &ProgramSource<'_>) -> DotmorphResult<ProgramId> {
        let id = ProgramId(self.id());
        self.programs.push(id);
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.deleted_programs.push(program);
    }

    fn create_texture(&mut self, _size: u32) -> DotmorphResult<TextureId> {
        if self.fail_texture_creation {
            return Err(DotmorphError::resource("texture allocation refused"));
        }
        let id = TextureId(self.id());
        self.textures.push(id);
        Ok(id)
    }

    fn write_texture(&mut self, texture: TextureId, raster: &GlyphRaster) -> DotmorphResult<()> {
        self.texture_writes.push((texture, raster.size));
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.deleted_textures.push(texture);
    }

    fn create_mesh(&mut self) -> DotmorphResult<MeshId> {
        let id = MeshId(self.id());
        self.meshes.push(id);
        Ok(id)
    }

    fn write_mesh(&mut self, mesh: MeshId, vertices: &[QuadVertex; 6]) -> DotmorphResult<()> {
        self.mesh_writes.push((mesh, *vertices));
        Ok(())
    }

    fn delete_mesh(&mut self, mesh: MeshId) {
        self.deleted_meshes.push(mesh);
    }

    fn clear(&mut self, color: Rgb) -> DotmorphResult<()> {
        self.clears.push(color);
        Ok(())
    }

    fn draw(
        &mut self,
        _program: ProgramId,
        _mesh: MeshId,
        _texture: TextureId,
        uniforms: &DrawUniforms,
    ) -> DotmorphResult<()> {
        self.draws.push(*uniforms);
        Ok(())
    }
}

/// Glyph surface that never touches the font stack; logs requested characters.
#[derive(Default)]
pub struct BlankSurface {
    pub characters: Vec<String>,
}

impl GlyphSurface for BlankSurface {
    fn rasterize(
        &mut self,
        character: &str,
        config: &EntityConfig,
    ) -> DotmorphResult<GlyphRaster> {
        self.characters.push(character.to_owned());
        Ok(GlyphRaster::transparent(config.size))
    }
}

/// Frame scheduler handing out sequential requests and logging cancellations.
#[derive(Default)]
pub struct CountingScheduler {
    pub requested: u64,
    pub canceled: Vec<FrameRequest>,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.requested += 1;
        FrameRequest(self.requested)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.canceled.push(request);
    }
}
