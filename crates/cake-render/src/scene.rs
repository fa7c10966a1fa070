//! Draws a `cake_core` scene graph: one shared mesh per distinct shape,
//! instanced per node, opaque pass first and transparent nodes back-to-front.

use crate::helpers::{create_depth_texture, make_mesh_pipeline};
use bytemuck::Zeroable;
use cake_core::animation::FrameInput;
use cake_core::mesh::MeshVertex;
use cake_core::scene::{Light, NodeKind, ShapeKey};
use cake_core::{constants, Shape};
use fnv::FnvHashMap;
use glam::Vec3;
use std::ops::Range;
use wgpu::util::DeviceExt;

pub const MAX_DIR_LIGHTS: usize = 4;
pub const MAX_POINT_LIGHTS: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LightRaw {
    a: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    fog_color: [f32; 4],
    params: [f32; 4],
    dir_lights: [LightRaw; MAX_DIR_LIGHTS],
    point_lights: [LightRaw; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    material: [f32; 4],
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct Draw {
    key: ShapeKey,
    instances: Range<u32>,
    transparent: bool,
}

pub struct SceneRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    blend_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    meshes: FnvHashMap<ShapeKey, GpuMesh>,
    #[allow(dead_code)]
    depth_tex: wgpu::Texture, // owns the storage behind depth_view
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    // scratch reused every frame
    instances: Vec<InstanceRaw>,
    draws: Vec<Draw>,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(cake_core::SCENE_WGSL.into()),
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let buffers = [
            // slot 0: mesh vertices
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
            },
            // slot 1: per-node instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceRaw>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    2 => Float32x4,
                    3 => Float32x4,
                    4 => Float32x4,
                    5 => Float32x4,
                    6 => Float32x4,
                    7 => Float32x4
                ],
            },
        ];
        let opaque_pipeline = make_mesh_pipeline(device, &layout, &shader, &buffers, color_format, false);
        let blend_pipeline = make_mesh_pipeline(device, &layout, &shader, &buffers, color_format, true);

        let instance_capacity = 256;
        let instance_buffer = create_instance_buffer(device, instance_capacity);
        let (depth_tex, depth_view) = create_depth_texture(device, width, height);

        Self {
            opaque_pipeline,
            blend_pipeline,
            globals_buffer,
            bind_group,
            instance_buffer,
            instance_capacity,
            meshes: FnvHashMap::default(),
            depth_tex,
            depth_view,
            depth_size: (width, height),
            instances: Vec::new(),
            draws: Vec::new(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) != self.depth_size && width > 0 && height > 0 {
            let (tex, view) = create_depth_texture(device, width, height);
            self.depth_tex = tex;
            self.depth_view = view;
            self.depth_size = (width, height);
        }
    }

    /// Number of distinct shapes uploaded so far.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn ensure_mesh(&mut self, device: &wgpu::Device, shape: &Shape) -> ShapeKey {
        let key = shape.key();
        self.meshes.entry(key).or_insert_with(|| {
            let data = shape.tessellate();
            GpuMesh {
                vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vb"),
                    contents: bytemuck::cast_slice(&data.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_ib"),
                    contents: bytemuck::cast_slice(&data.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: data.indices.len() as u32,
            }
        });
        key
    }

    /// Record the scene pass into `encoder`, targeting `view`.
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &FrameInput<'_>,
    ) {
        let (width, height) = self.depth_size;
        let camera = frame.camera.camera(width as f32 / height.max(1) as f32);
        let eye = camera.eye;

        let mut globals = Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_pos: eye.extend(1.0).to_array(),
            ambient: [0.0; 4],
            fog_color: frame.background.extend(1.0).to_array(),
            params: [constants::FOG_NEAR, constants::FOG_FAR, 0.0, 0.0],
            dir_lights: [LightRaw::zeroed(); MAX_DIR_LIGHTS],
            point_lights: [LightRaw::zeroed(); MAX_POINT_LIGHTS],
        };

        // Lights
        let mut ambient = Vec3::ZERO;
        let mut dir_count = 0;
        for (_, node) in frame.scene.iter() {
            if !node.visible {
                continue;
            }
            match node.kind {
                NodeKind::Light(Light::Ambient { color, intensity }) => ambient += color * intensity,
                NodeKind::Light(Light::Directional {
                    color,
                    intensity,
                    direction,
                }) if dir_count < MAX_DIR_LIGHTS => {
                    globals.dir_lights[dir_count] = LightRaw {
                        a: direction.extend(0.0).to_array(),
                        color: color.extend(intensity).to_array(),
                    };
                    dir_count += 1;
                }
                _ => {}
            }
        }
        let mut point_count = 0;
        for (position, color, intensity, range) in frame
            .scene
            .active_point_lights()
            .take(frame.max_point_lights.min(MAX_POINT_LIGHTS))
        {
            globals.point_lights[point_count] = LightRaw {
                a: position.extend(range).to_array(),
                color: color.extend(intensity).to_array(),
            };
            point_count += 1;
        }
        globals.ambient = ambient.extend(1.0).to_array();
        globals.params[2] = dir_count as f32;
        globals.params[3] = point_count as f32;
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        // Instances: opaque grouped by shape, transparent sorted far to near
        let mut opaque: FnvHashMap<ShapeKey, Vec<InstanceRaw>> = FnvHashMap::default();
        let mut blended: Vec<(f32, ShapeKey, InstanceRaw)> = Vec::new();
        let mut visible_meshes = Vec::new();
        for (_, node) in frame.scene.iter() {
            if let NodeKind::Mesh { shape, material } = node.kind {
                if node.visible && material.opacity > 0.0 {
                    visible_meshes.push((shape, material, node.model_matrix(), node.position));
                }
            }
        }
        for (shape, material, model, position) in visible_meshes {
            let key = self.ensure_mesh(device, &shape);
            let raw = InstanceRaw {
                model: model.to_cols_array_2d(),
                color: material.color.extend(material.opacity).to_array(),
                material: [
                    material.roughness,
                    material.metalness,
                    material.emissive,
                    if material.unlit { 1.0 } else { 0.0 },
                ],
            };
            if material.is_transparent() {
                blended.push((position.distance_squared(eye), key, raw));
            } else {
                opaque.entry(key).or_default().push(raw);
            }
        }
        blended.sort_by(|a, b| b.0.total_cmp(&a.0));

        self.instances.clear();
        self.draws.clear();
        for (key, list) in opaque {
            let start = self.instances.len() as u32;
            self.instances.extend(list);
            self.draws.push(Draw {
                key,
                instances: start..self.instances.len() as u32,
                transparent: false,
            });
        }
        for (_, key, raw) in blended {
            let start = self.instances.len() as u32;
            self.instances.push(raw);
            self.draws.push(Draw {
                key,
                instances: start..start + 1,
                transparent: true,
            });
        }

        if self.instances.len() > self.instance_capacity {
            self.instance_capacity = self.instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            log::debug!("[render] instance buffer grown to {}", self.instance_capacity);
        }
        if !self.instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }

        let bg = frame.background;
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: bg.x as f64,
                        g: bg.y as f64,
                        b: bg.z as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        let mut current_transparent = None;
        for draw in &self.draws {
            if current_transparent != Some(draw.transparent) {
                rpass.set_pipeline(if draw.transparent {
                    &self.blend_pipeline
                } else {
                    &self.opaque_pipeline
                });
                current_transparent = Some(draw.transparent);
            }
            let Some(mesh) = self.meshes.get(&draw.key) else {
                continue;
            };
            rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
            rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, draw.instances.clone());
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_vb"),
        size: (std::mem::size_of::<InstanceRaw>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
