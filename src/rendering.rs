//! Rendering system with wgpu pipeline and shader management.
//!
//! One pipeline draws every sphere in a frame; per-draw uniforms live in a
//! single buffer addressed with dynamic offsets, so a whole `FramePlan` costs
//! one buffer write and one bind group.

use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera;
use crate::mesh::{SphereMesh, Vertex};
use crate::params::RenderConfig;
use crate::scene::{FramePlan, Primitive};

/// Per-draw uniform block; must match the `Uniforms` struct in shader.wgsl
/// byte for byte
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GpuUniforms {
    mvp: [[f32; 4]; 4],
    resolution: [f32; 2],
    time: f32,
    seed: f32,
    bass: f32,
    mid: f32,
    treble: f32,
    avg_amplitude: f32,
    offset: [f32; 3],
    scale: f32,
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<GpuUniforms>() as u64;

/// WebGPU minimum uniform offset alignment; every draw gets one slot
const UNIFORM_STRIDE: u64 = 256;

const INITIAL_UNIFORM_SLOTS: u64 = 64;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Rendering system managing wgpu device, pipeline, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_config: RenderConfig,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    index_count: u32,
    window_size: (u32, u32),
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: std::sync::Arc<winit::window::Window>,
        render_config: RenderConfig,
    ) -> Result<Self> {
        let size = window.inner_size();
        let window_size = (size.width, size.height);

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("no suitable GPU adapter found"))?;

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("failed to request device")?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Load shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create mesh buffers
        let mesh = SphereMesh::new(render_config.sphere_segments);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: INITIAL_UNIFORM_SLOTS * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // One bind group over the whole buffer; per-draw slots are selected
        // with a dynamic offset at draw time
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let uniform_bind_group = bind_uniforms(&device, &uniform_layout, &uniform_buffer);

        // Create render pipeline
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The displacement waves can fold faces inside out
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_config,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_layout,
            uniform_bind_group,
            depth_view,
            index_count: mesh.indices.len() as u32,
            window_size,
        })
    }

    /// Current drawable size in pixels
    pub fn viewport(&self) -> (f32, f32) {
        (self.window_size.0 as f32, self.window_size.1 as f32)
    }

    /// Resize the surface and depth buffer; zero-sized updates are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        log::debug!("surface resized to {width}x{height}");
        self.window_size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_texture(&self.device, &self.config);
    }

    /// Reapply the current surface configuration after a Lost/Outdated error
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_texture(&self.device, &self.config);
    }

    /// Render one composed frame
    pub fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        if !plan.draws.is_empty() {
            self.ensure_uniform_capacity(plan.draws.len());
            self.upload_uniforms(plan);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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

            if !plan.draws.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for slot in 0..plan.draws.len() {
                    let offset = (slot as u64 * UNIFORM_STRIDE) as wgpu::DynamicOffset;
                    render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                    render_pass.draw_indexed(0..self.index_count, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Pack every draw's uniforms into stride-aligned slots and upload them
    /// in one write
    fn upload_uniforms(&self, plan: &FramePlan) {
        let view_proj = camera::view_proj_matrix(&plan.camera, &self.render_config, plan.viewport);

        let mut staging = Vec::with_capacity(plan.draws.len() * UNIFORM_STRIDE as usize);
        for draw in &plan.draws {
            let Primitive::Sphere { radius } = draw.primitive;
            let model = model_matrix(draw.uniforms.offset.into(), draw.spin, radius);

            let uniforms = GpuUniforms {
                mvp: (view_proj * model).to_cols_array_2d(),
                resolution: draw.uniforms.resolution,
                time: draw.uniforms.time,
                seed: draw.uniforms.seed,
                bass: draw.uniforms.bass,
                mid: draw.uniforms.mid,
                treble: draw.uniforms.treble,
                avg_amplitude: draw.uniforms.avg_amplitude,
                offset: draw.uniforms.offset,
                scale: radius,
            };

            staging.extend_from_slice(bytemuck::bytes_of(&uniforms));
            staging.resize(staging.len() + (UNIFORM_STRIDE - UNIFORM_SIZE) as usize, 0);
        }

        self.queue.write_buffer(&self.uniform_buffer, 0, &staging);
    }

    /// Grow the uniform buffer when a frame has more draws than slots
    fn ensure_uniform_capacity(&mut self, draw_count: usize) {
        let required = draw_count as u64 * UNIFORM_STRIDE;
        if required <= self.uniform_buffer.size() {
            return;
        }

        let mut size = self.uniform_buffer.size();
        while size < required {
            size *= 2;
        }

        self.uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.uniform_bind_group =
            bind_uniforms(&self.device, &self.uniform_layout, &self.uniform_buffer);
    }
}

fn bind_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Uniform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(UNIFORM_SIZE),
            }),
        }],
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Model matrix: place at the world offset, apply the per-object spin about
/// the vertical axis, then scale the unit sphere up to its radius
fn model_matrix(offset: Vec3, spin: f32, radius: f32) -> Mat4 {
    Mat4::from_translation(offset) * Mat4::from_rotation_y(spin) * Mat4::from_scale(Vec3::splat(radius))
}
