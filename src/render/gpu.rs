use std::collections::HashMap;

use crate::assets::glyph::GlyphRaster;
use crate::foundation::core::{Rgb, Viewport};
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::render::context::{
    DrawUniforms, GpuContext, MeshId, ProgramId, ProgramSource, TextureId,
};
use crate::render::geometry::QuadVertex;

// Interleaved [plane.xy, tex.uv] f32 layout.
const VERTEX_STRIDE: u64 = 16;
const VERTEX_COUNT: u32 = 6;
// Params uniform block: vec3 color + 7 scalars, padded to a 16-byte multiple.
const PARAMS_SIZE: u64 = 48;

/// A rendered frame as premultiplied RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    params: wgpu::Buffer,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: u32,
}

struct GpuMesh {
    buffer: wgpu::Buffer,
}

/// Offscreen `wgpu` implementation of [`GpuContext`].
///
/// Renders into an RGBA8 target texture sized to the viewport; [`WgpuContext::read_frame`]
/// copies the target back to host memory. Headless: no window or surface is required.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,

    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    readback: wgpu::Buffer,
    readback_bytes_per_row: u32,
    width: u32,
    height: u32,

    programs: HashMap<ProgramId, GpuProgram>,
    textures: HashMap<TextureId, GpuTexture>,
    meshes: HashMap<MeshId, GpuMesh>,
    next_id: u64,
}

impl WgpuContext {
    /// Acquire an adapter and device, and allocate the offscreen target.
    pub fn new(viewport: Viewport) -> DotmorphResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                DotmorphError::resource("no gpu adapter available")
            }
            other => DotmorphError::resource(format!("wgpu request_adapter failed: {other:?}")),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| DotmorphError::resource(format!("wgpu request_device failed: {e:?}")))?;

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("dotmorph_target"),
            size: wgpu::Extent3d {
                width: viewport.width,
                height: viewport.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row_unpadded = viewport
            .width
            .checked_mul(4)
            .ok_or_else(|| DotmorphError::resource("render target width overflow"))?;
        let bytes_per_row = align_to(bytes_per_row_unpadded, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer_size = u64::from(bytes_per_row)
            .checked_mul(u64::from(viewport.height))
            .ok_or_else(|| DotmorphError::resource("readback buffer size overflow"))?;

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dotmorph_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            target,
            target_view,
            readback,
            readback_bytes_per_row: bytes_per_row,
            width: viewport.width,
            height: viewport.height,
            programs: HashMap::new(),
            textures: HashMap::new(),
            meshes: HashMap::new(),
            next_id: 0,
        })
    }

    /// Copy the offscreen target back to host memory.
    pub fn read_frame(&mut self) -> DotmorphResult<FrameRgba> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dotmorph_readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.readback_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| DotmorphError::resource(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| DotmorphError::resource("readback channel closed"))?
            .map_err(|e| DotmorphError::resource(format!("readback map failed: {e:?}")))?;

        let mapped = buffer_slice.get_mapped_range();
        let row_bytes = (self.width as usize) * 4;
        let padded_row_bytes = self.readback_bytes_per_row as usize;
        let mut out = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height as usize {
            let start = row * padded_row_bytes;
            out.extend_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        self.readback.unmap();

        Ok(FrameRgba {
            width: self.width,
            height: self.height,
            data: out,
        })
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn compile_module(&mut self, label: &str, source: &str) -> DotmorphResult<wgpu::ShaderModule> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(DotmorphError::shader(format!(
                "{label} failed to compile: {err}"
            )));
        }
        Ok(module)
    }

    fn allocate_texture(&self, size: u32) -> GpuTexture {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("dotmorph_glyph"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GpuTexture {
            texture,
            view,
            size,
        }
    }
}

impl GpuContext for WgpuContext {
    fn compile_program(&mut self, source: &ProgramSource<'_>) -> DotmorphResult<ProgramId> {
        let vertex = self.compile_module("dotmorph_vertex_shader", source.vertex)?;
        let fragment = self.compile_module("dotmorph_fragment_shader", source.fragment)?;

        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("dotmorph_glyph_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let params = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dotmorph_params"),
            size: PARAMS_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("dotmorph_bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                multisampled: false,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(PARAMS_SIZE),
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("dotmorph_pl"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        // Pipeline creation is the link step; surface its validation error as such.
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("dotmorph_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex,
                    entry_point: None,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: VERTEX_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 0,
                                shader_location: 0,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 8,
                                shader_location: 1,
                            },
                        ],
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment,
                    entry_point: None,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu::TextureFormat::Rgba8Unorm,
                        blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(DotmorphError::shader(format!(
                "program failed to link: {err}"
            )));
        }

        let id = ProgramId(self.fresh_id());
        self.programs.insert(
            id,
            GpuProgram {
                pipeline,
                bind_group_layout,
                sampler,
                params,
            },
        );
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
    }

    fn create_texture(&mut self, size: u32) -> DotmorphResult<TextureId> {
        let entry = self.allocate_texture(size);
        let id = TextureId(self.fresh_id());
        self.textures.insert(id, entry);
        Ok(id)
    }

    fn write_texture(&mut self, texture: TextureId, raster: &GlyphRaster) -> DotmorphResult<()> {
        let needs_realloc = match self.textures.get(&texture) {
            Some(entry) => entry.size != raster.size,
            None => return Err(DotmorphError::resource("write to unknown texture")),
        };
        // GL-style whole-image upload: a size change reallocates the storage in place.
        if needs_realloc {
            let entry = self.allocate_texture(raster.size);
            self.textures.insert(texture, entry);
        }

        let entry = self
            .textures
            .get(&texture)
            .ok_or_else(|| DotmorphError::resource("write to unknown texture"))?;
        let expected = (raster.size as usize) * (raster.size as usize) * 4;
        if raster.rgba8_premul.len() != expected {
            return Err(DotmorphError::resource("glyph raster byte length mismatch"));
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &entry.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &raster.rgba8_premul,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(raster.size * 4),
                rows_per_image: Some(raster.size),
            },
            wgpu::Extent3d {
                width: raster.size,
                height: raster.size,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn create_mesh(&mut self) -> DotmorphResult<MeshId> {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dotmorph_quad"),
            size: VERTEX_STRIDE * u64::from(VERTEX_COUNT),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let id = MeshId(self.fresh_id());
        self.meshes.insert(id, GpuMesh { buffer });
        Ok(id)
    }

    fn write_mesh(&mut self, mesh: MeshId, vertices: &[QuadVertex; 6]) -> DotmorphResult<()> {
        let entry = self
            .meshes
            .get(&mesh)
            .ok_or_else(|| DotmorphError::resource("write to unknown mesh"))?;

        let mut bytes = [0u8; (VERTEX_STRIDE as usize) * (VERTEX_COUNT as usize)];
        for (chunk, vertex) in bytes.chunks_exact_mut(VERTEX_STRIDE as usize).zip(vertices) {
            write_f32s(chunk, &[vertex.plane[0], vertex.plane[1], vertex.tex[0], vertex.tex[1]]);
        }
        self.queue.write_buffer(&entry.buffer, 0, &bytes);
        Ok(())
    }

    fn delete_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
    }

    fn clear(&mut self, color: Rgb) -> DotmorphResult<()> {
        let [r, g, b] = color.0;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dotmorph_clear_encoder"),
            });
        {
            let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("dotmorph_clear_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r) / 255.0,
                            g: f64::from(g) / 255.0,
                            b: f64::from(b) / 255.0,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn draw(
        &mut self,
        program: ProgramId,
        mesh: MeshId,
        texture: TextureId,
        uniforms: &DrawUniforms,
    ) -> DotmorphResult<()> {
        let program = self
            .programs
            .get(&program)
            .ok_or_else(|| DotmorphError::resource("draw with unknown program"))?;
        let mesh = self
            .meshes
            .get(&mesh)
            .ok_or_else(|| DotmorphError::resource("draw with unknown mesh"))?;
        let texture = self
            .textures
            .get(&texture)
            .ok_or_else(|| DotmorphError::resource("draw with unknown texture"))?;

        let mut params = [0u8; PARAMS_SIZE as usize];
        write_f32s(
            &mut params,
            &[
                uniforms.glyph_color[0],
                uniforms.glyph_color[1],
                uniforms.glyph_color[2],
                uniforms.dot_size,
                uniforms.dot_scale_x,
                uniforms.text_scale_x,
                uniforms.text_scale_y,
                uniforms.mix_threshold,
                uniforms.mix_transition,
                uniforms.smoothing,
            ],
        );
        self.queue.write_buffer(&program.params, 0, &params);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dotmorph_bg"),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&program.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: program.params.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dotmorph_draw_encoder"),
            });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("dotmorph_draw_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(&program.pipeline);
            rp.set_bind_group(0, &bind_group, &[]);
            rp.set_vertex_buffer(0, mesh.buffer.slice(..));
            rp.draw(0..VERTEX_COUNT, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

fn write_f32s(out: &mut [u8], values: &[f32]) {
    for (chunk, v) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}
