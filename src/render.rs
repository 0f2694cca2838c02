//! The wgpu backend of the scene.
//!
//! [`Renderer`] implements the three scene collaborators on the GPU:
//!
//! - [`TextureStore`] uploads decoded images and binds them to slots
//! - [`ShaderUniforms`] accumulates named uniform values like a bound shader program
//! - [`ShapeMeshes`] keeps one vertex/index buffer pair per primitive and
//!   records draws
//!
//! Every draw snapshots the current object uniforms. [`Renderer::render`] then
//! writes all snapshots into one uniform buffer and replays the draws in a
//! single render pass, addressing each snapshot with a dynamic offset.

use std::{collections::HashMap, iter};

use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        shape::{self, MeshData},
        texture::Texture,
        transform::normal_matrix,
    },
    error::SceneError,
    pipelines::scene::{
        FrameUniform, ObjectUniform, mk_frame_bind_group_layout, mk_object_bind_group_layout,
        mk_scene_pipeline, mk_texture_bind_group_layout, pad_matrix3,
    },
    resources::texture::DecodedImage,
    scene::{
        lighting::MAX_LIGHT_SOURCES,
        meshes::{Shape, ShapeMeshes},
        texture_registry::{TextureSlot, TextureStore},
        uniforms::{self, LightField, ShaderUniforms, UniformValue, parse_light_uniform},
    },
};

const INITIAL_OBJECT_CAPACITY: usize = 128;

/// Vertex and index buffers of one primitive.
#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, shape: Shape, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vertex buffer", shape.name())),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} index buffer", shape.name())),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }
}

/// A recorded draw: which mesh, with which uniforms and texture.
#[derive(Clone, Copy, Debug)]
struct Draw {
    shape: Shape,
    object: ObjectUniform,
    texture_slot: Option<usize>,
}

#[derive(Debug)]
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,

    frame: FrameUniform,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    object: ObjectUniform,
    texture_unit: i32,
    object_layout: wgpu::BindGroupLayout,
    object_stride: u64,
    object_capacity: usize,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,

    texture_layout: wgpu::BindGroupLayout,
    slot_bind_groups: Vec<wgpu::BindGroup>,
    placeholder_bind_group: wgpu::BindGroup,

    meshes: HashMap<Shape, GpuMesh>,
    draws: Vec<Draw>,
}

impl Renderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let frame_layout = mk_frame_bind_group_layout(device);
        let object_layout = mk_object_bind_group_layout(device);
        let texture_layout = mk_texture_bind_group_layout(device);
        let pipeline = mk_scene_pipeline(
            device,
            color_format,
            &frame_layout,
            &object_layout,
            &texture_layout,
        );

        let frame = FrameUniform::new();
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Buffer"),
            contents: bytemuck::cast_slice(&[frame]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let object_stride = align_to(std::mem::size_of::<ObjectUniform>() as u64, alignment);
        let (object_buffer, object_bind_group) = mk_object_buffer(
            device,
            &object_layout,
            object_stride,
            INITIAL_OBJECT_CAPACITY,
        );

        let placeholder = Texture::create_solid(device, queue, [255; 4], "placeholder texture");
        let placeholder_bind_group =
            mk_texture_bind_group(device, &texture_layout, &placeholder, "placeholder");

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            frame,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            frame_buffer,
            frame_bind_group,
            object: ObjectUniform::new(),
            texture_unit: 0,
            object_layout,
            object_stride,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            object_buffer,
            object_bind_group,
            texture_layout,
            slot_bind_groups: Vec::new(),
            placeholder_bind_group,
            meshes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    /// Forgets the draws of the previous frame. Uniform state is kept.
    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn frame_uniform(&self) -> &FrameUniform {
        &self.frame
    }

    pub fn object_uniform(&self) -> &ObjectUniform {
        &self.object
    }

    /// Replays the recorded draws into `target`, clearing it to `clear` first.
    pub fn render(&mut self, target: &wgpu::TextureView, depth: &wgpu::TextureView, clear: wgpu::Color) {
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[self.frame]));
        self.upload_objects();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (index, draw) in self.draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.shape) else {
                    continue;
                };
                let offset = (index as u64 * self.object_stride) as wgpu::DynamicOffset;
                render_pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                let texture = draw
                    .texture_slot
                    .and_then(|slot| self.slot_bind_groups.get(slot))
                    .unwrap_or(&self.placeholder_bind_group);
                render_pass.set_bind_group(2, texture, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
            }
        }
        self.queue.submit(iter::once(encoder.finish()));
        log::trace!("Rendered {} draws", self.draws.len());
    }

    fn upload_objects(&mut self) {
        if self.draws.is_empty() {
            return;
        }
        if self.draws.len() > self.object_capacity {
            let capacity = self.draws.len().next_power_of_two();
            log::debug!("Growing object uniform buffer to {capacity} entries");
            let (buffer, bind_group) =
                mk_object_buffer(&self.device, &self.object_layout, self.object_stride, capacity);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            self.object_capacity = capacity;
        }
        let stride = self.object_stride as usize;
        let mut staging = vec![0u8; stride * self.draws.len()];
        for (chunk, draw) in staging.chunks_exact_mut(stride).zip(&self.draws) {
            let bytes = bytemuck::bytes_of(&draw.object);
            chunk[..bytes.len()].copy_from_slice(bytes);
        }
        self.queue.write_buffer(&self.object_buffer, 0, &staging);
    }

    fn update_view_proj(&mut self) {
        self.frame.view_proj = (self.projection * self.view).into();
    }

    fn set_light_field(&mut self, index: usize, field: LightField, value: UniformValue) {
        let Some(light) = self.frame.lights.get_mut(index) else {
            log::warn!("Light source {index} is out of range (max {MAX_LIGHT_SOURCES})");
            return;
        };
        match (field, value) {
            (LightField::Position, UniformValue::Vec3(v)) => light.position = v.into(),
            (LightField::AmbientColor, UniformValue::Vec3(v)) => light.ambient_color = v.into(),
            (LightField::DiffuseColor, UniformValue::Vec3(v)) => light.diffuse_color = v.into(),
            (LightField::SpecularColor, UniformValue::Vec3(v)) => light.specular_color = v.into(),
            (LightField::FocalStrength, UniformValue::Float(f)) => light.focal_strength = f,
            (LightField::SpecularIntensity, UniformValue::Float(f)) => {
                light.specular_intensity = f
            }
            (field, value) => log::warn!(
                "Light field {} cannot be set to {:?}",
                field.name(),
                value
            ),
        }
    }
}

impl ShaderUniforms for Renderer {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        log::trace!("{name} = {value:?}");
        match (name, value) {
            (uniforms::MODEL, UniformValue::Mat4(m)) => {
                self.object.model = m.into();
                self.object.normal = pad_matrix3(normal_matrix(&m));
            }
            (uniforms::VIEW, UniformValue::Mat4(m)) => {
                self.view = m;
                self.update_view_proj();
            }
            (uniforms::PROJECTION, UniformValue::Mat4(m)) => {
                self.projection = m;
                self.update_view_proj();
            }
            (uniforms::VIEW_POSITION, UniformValue::Vec3(v)) => {
                self.frame.view_position = v.extend(1.0).into();
            }
            (uniforms::OBJECT_COLOR, UniformValue::Vec4(v)) => self.object.color = v.into(),
            (uniforms::OBJECT_TEXTURE, UniformValue::Sampler2D(unit) | UniformValue::Int(unit)) => {
                self.texture_unit = unit;
            }
            (uniforms::USE_TEXTURE, UniformValue::Bool(b)) => self.object.use_texture = b.into(),
            (uniforms::USE_LIGHTING, UniformValue::Bool(b)) => self.frame.use_lighting = b.into(),
            (uniforms::UV_SCALE, UniformValue::Vec2(v)) => self.object.uv_scale = v.into(),
            (uniforms::GLOBAL_AMBIENT_COLOR, UniformValue::Vec3(v)) => {
                self.frame.global_ambient = v.into();
            }
            (uniforms::MATERIAL_AMBIENT_COLOR, UniformValue::Vec3(v)) => {
                self.object.ambient_color = v.into();
            }
            (uniforms::MATERIAL_AMBIENT_STRENGTH, UniformValue::Float(f)) => {
                self.object.ambient_strength = f;
            }
            (uniforms::MATERIAL_DIFFUSE_COLOR, UniformValue::Vec3(v)) => {
                self.object.diffuse_color = v.into();
            }
            (uniforms::MATERIAL_SPECULAR_COLOR, UniformValue::Vec3(v)) => {
                self.object.specular_color = v.into();
            }
            (uniforms::MATERIAL_SHININESS, UniformValue::Float(f)) => self.object.shininess = f,
            (name, value) => match parse_light_uniform(name) {
                Some((index, field)) => self.set_light_field(index, field, value),
                None => log::warn!("Ignoring unknown uniform {name} = {value:?}"),
            },
        }
    }
}

impl ShapeMeshes for Renderer {
    fn load_mesh(&mut self, shape: Shape) -> Result<(), SceneError> {
        if self.meshes.contains_key(&shape) {
            return Ok(());
        }
        let data = shape::build(shape);
        log::debug!(
            "Loaded {} mesh: {} vertices, {} indices",
            shape.name(),
            data.vertices.len(),
            data.indices.len()
        );
        self.meshes.insert(shape, GpuMesh::new(&self.device, shape, &data));
        Ok(())
    }

    fn draw_mesh(&mut self, shape: Shape) -> Result<(), SceneError> {
        if !self.meshes.contains_key(&shape) {
            return Err(SceneError::MeshNotLoaded(shape));
        }
        let texture_slot = if self.object.use_texture != 0 {
            usize::try_from(self.texture_unit).ok()
        } else {
            None
        };
        self.draws.push(Draw {
            shape,
            object: self.object,
            texture_slot,
        });
        Ok(())
    }
}

impl TextureStore for Renderer {
    type Handle = Texture;

    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> anyhow::Result<Texture> {
        Texture::from_decoded(&self.device, &self.queue, image, label)
    }

    fn bind_textures(&mut self, slots: &[TextureSlot<Texture>]) {
        self.slot_bind_groups = slots
            .iter()
            .map(|slot| mk_texture_bind_group(&self.device, &self.texture_layout, &slot.handle, &slot.tag))
            .collect();
        log::debug!("Bound {} textures", self.slot_bind_groups.len());
    }

    fn release_textures(&mut self, handles: Vec<Texture>) {
        self.slot_bind_groups.clear();
        for handle in handles {
            handle.texture.destroy();
        }
    }
}

fn mk_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
        label: Some("object_bind_group"),
    });
    (buffer, bind_group)
}

fn mk_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    let fallback_sampler;
    let sampler = match &texture.sampler {
        Some(sampler) => sampler,
        None => {
            fallback_sampler = crate::data_structures::texture::create_default_sampler(device);
            &fallback_sampler
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    })
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment.max(1)) * alignment.max(1)
}
