/// `GpuContext` on top of wgpu.
///
/// wgpu has no immediate-mode program state, so this backend emulates it:
/// every linked program keeps a CPU copy of its uniforms, `draw` snapshots
/// that copy into a [`UniformBlock`] and queues a command, and [`finish`]
/// uploads all blocks into one dynamic-offset buffer and replays the queue in
/// a single render pass.
///
/// [`finish`]: WgpuContext::finish
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{Mat4, Vec4};
use vista_core::Color;
use wgpu::util::DeviceExt;

use super::{DrawCall, GpuContext, GpuError};
use crate::geometry::Vertex;
use crate::material::{names, MaterialName, ProgramId, ShaderMaterial, Side, UniformValue, Uniforms};
use crate::mesh::MeshId;
use crate::resources::uniform_slots::{UniformBlock, UniformSlots};
use crate::resources::TextureRef;

struct Program {
    pipeline: wgpu::RenderPipeline,
    declared: HashSet<String>,
    values: Uniforms,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: usize,
    index_count: u32,
}

struct Command {
    program: ProgramId,
    mesh: MeshId,
    block: UniformBlock,
    texture: Arc<wgpu::BindGroup>,
}

pub struct WgpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    target_format: wgpu::TextureFormat,
    shader: wgpu::ShaderModule,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    slots: UniformSlots,
    programs: Vec<Program>,
    bound: Option<ProgramId>,
    meshes: HashMap<MeshId, GpuMesh>,
    // The Arc is held so the pointer key can never be reused while cached.
    textures: HashMap<usize, (TextureRef, Arc<wgpu::BindGroup>)>,
    fallback_texture: Arc<wgpu::BindGroup>,
    commands: Vec<Command>,
}

impl WgpuContext {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("../../shaders/hotspot.wgsl"));

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Layout: Draw uniforms (dynamic)"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<UniformBlock>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Layout: Texture"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Hotspot Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Hotspot Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let slots = UniformSlots::new(&device, &uniform_layout, 64);
        let fallback = create_texture_bind_group(&device, &queue, &texture_layout, &sampler, 1, 1, &[255; 4], "fallback");

        Self {
            device,
            queue,
            target_format,
            shader,
            uniform_layout,
            texture_layout,
            pipeline_layout,
            sampler,
            slots,
            programs: Vec::new(),
            bound: None,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            fallback_texture: Arc::new(fallback),
            commands: Vec::new(),
        }
    }

    /// Number of draws queued since the last [`finish`](Self::finish).
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Upload the queued draws and replay them into `target`, then submit.
    pub fn finish(&mut self, target: &wgpu::TextureView, clear: Option<Color>) {
        self.slots.ensure_capacity(&self.device, &self.uniform_layout, self.commands.len());
        for (i, cmd) in self.commands.iter().enumerate() {
            self.slots.write(&self.queue, i, &cmd.block);
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Hotspot Encoder"),
        });
        {
            let load = match clear {
                Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
                None => wgpu::LoadOp::Load,
            };
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Hotspot Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (i, cmd) in self.commands.iter().enumerate() {
                let (Some(program), Some(mesh)) = (self.programs.get(cmd.program.0 as usize), self.meshes.get(&cmd.mesh))
                else {
                    continue;
                };
                rpass.set_pipeline(&program.pipeline);
                rpass.set_bind_group(0, &*self.slots.bind_group, &[self.slots.offset(i)]);
                rpass.set_bind_group(1, &*cmd.texture, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        self.commands.clear();
    }

    fn bound(&mut self) -> Result<(ProgramId, &mut Program), GpuError> {
        let id = self.bound.ok_or(GpuError::NoProgramBound)?;
        let program = self.programs.get_mut(id.0 as usize).ok_or(GpuError::UnknownProgram(id))?;
        Ok((id, program))
    }

    fn texture_bind_group(&mut self, texture: Option<&TextureRef>) -> Arc<wgpu::BindGroup> {
        let Some(texture) = texture else {
            return Arc::clone(&self.fallback_texture);
        };
        let key = Arc::as_ptr(texture) as usize;
        if let Some((_, group)) = self.textures.get(&key) {
            return Arc::clone(group);
        }
        let group = Arc::new(create_texture_bind_group(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            texture.width,
            texture.height,
            &texture.rgba,
            &texture.label,
        ));
        self.textures.insert(key, (Arc::clone(texture), Arc::clone(&group)));
        group
    }

    fn ensure_mesh(&mut self, call: &DrawCall<'_>) {
        let fresh = self
            .meshes
            .get(&call.mesh)
            .is_some_and(|m| m.vertex_count == call.geometry.vertex_count());
        if fresh {
            return;
        }
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(call.name),
            contents: bytemuck::cast_slice(&call.geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(call.name),
            contents: bytemuck::cast_slice(&call.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.meshes.insert(
            call.mesh,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                vertex_count: call.geometry.vertex_count(),
                index_count: call.geometry.index_count() as u32,
            },
        );
    }
}

impl GpuContext for WgpuContext {
    fn link_program(&mut self, material: &ShaderMaterial) -> Result<ProgramId, GpuError> {
        let (fragment, blend) = match material.name {
            MaterialName::Hotspot => ("fs_hotspot", wgpu::BlendState::ALPHA_BLENDING),
            MaterialName::Picking => ("fs_picking", wgpu::BlendState::REPLACE),
            MaterialName::Custom(ref name) => return Err(GpuError::UnsupportedMaterial(name.clone())),
        };
        let cull_mode = match material.side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        };

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(material.name.as_str()),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(fragment),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.target_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let id = ProgramId(self.programs.len() as u32);
        self.programs.push(Program {
            pipeline,
            declared: material.uniforms.names().map(str::to_string).collect(),
            values: Uniforms::new(),
        });
        log::debug!("linked {} as {:?}", material.name, id);
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), GpuError> {
        if program.0 as usize >= self.programs.len() {
            return Err(GpuError::UnknownProgram(program));
        }
        self.bound = Some(program);
        Ok(())
    }

    fn bound_program(&self) -> Option<ProgramId> {
        self.bound
    }

    fn upload_uniforms(&mut self, uniforms: &Uniforms) -> Result<(), GpuError> {
        let (_, program) = self.bound()?;
        for (name, value) in uniforms.iter() {
            if program.declared.contains(name) {
                program.values.set(name, value.clone());
            }
        }
        Ok(())
    }

    fn write_bound_uniform(&mut self, name: &str, value: &UniformValue) -> Result<(), GpuError> {
        let (id, program) = self.bound()?;
        if !program.declared.contains(name) {
            return Err(GpuError::UnknownUniform { program: id, name: name.to_string() });
        }
        program.values.set(name, value.clone());
        Ok(())
    }

    fn draw(&mut self, call: DrawCall<'_>) -> Result<(), GpuError> {
        let (id, program) = self.bound()?;
        let values = program.values.clone();
        self.ensure_mesh(&call);

        let texture = self.texture_bind_group(values.get(names::TEXTURE).and_then(UniformValue::as_texture));
        let mat = |name: &str| match values.get(name) {
            Some(UniformValue::Mat4(m)) => *m,
            _ => Mat4::IDENTITY,
        };
        let vec4 = |name: &str| match values.get(name) {
            Some(UniformValue::Vec4(v)) => *v,
            _ => Vec4::ZERO,
        };
        let float = |name: &str, default: f32| values.get(name).and_then(UniformValue::as_float).unwrap_or(default);
        let has_texture = values.get(names::TEXTURE).and_then(UniformValue::as_texture).is_some();

        let block = UniformBlock {
            view_proj: mat(names::VIEW_PROJECTION).to_cols_array_2d(),
            model: call.model.to_cols_array_2d(),
            color: values.color(names::COLOR).unwrap_or(Color::WHITE).to_array(),
            viewport: vec4(names::VIEWPORT).to_array(),
            params: [
                float(names::OPACITY, 1.0),
                float(names::PROJECTION_KIND, 0.0),
                if has_texture { 1.0 } else { 0.0 },
                0.0,
            ],
        };
        self.commands.push(Command { program: id, mesh: call.mesh, block, texture });
        Ok(())
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
        // Textures only this cache still references belonged to destroyed materials.
        self.textures.retain(|_, (texture, _)| Arc::strong_count(texture) > 1);
    }
}

#[allow(clippy::too_many_arguments)]
fn create_texture_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    rgba: &[u8],
    label: &str,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::ImageDataLayout { offset: 0, bytes_per_row: Some(width * 4), rows_per_image: Some(height) },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
        ],
    })
}
