//! wgpu renderer for the backdrop.
//!
//! One instanced billboard-quad shader draws every field; each field gets
//! its own vertex buffer, uniforms and blend mode. Stars draw first with
//! alpha blending, then the sphere and marks with additive blending. No
//! depth buffer, matching a depth-write-off transparent point look.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::config::{BackdropConfig, CameraConfig, SPHERE_CAMERA, STAR_CAMERA};
use crate::error::GpuError;
use crate::scene::{SphereScene, Starfield};

pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PointVertex {
    position: [f32; 3],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    point_size: f32,
    opacity: f32,
    _padding: [f32; 2],
}

/// View-projection for a camera on the +z axis looking at the origin.
fn view_proj(camera: &CameraConfig, aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(camera.fov_deg.to_radians(), aspect, camera.near, camera.far);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, camera.z), Vec3::ZERO, Vec3::Y);
    proj * view
}

fn pack_vertices(positions: &[Vec3], colors: &[Vec3]) -> Vec<PointVertex> {
    positions
        .iter()
        .zip(colors)
        .map(|(p, c)| PointVertex {
            position: p.to_array(),
            color: c.to_array(),
        })
        .collect()
}

/// One drawable particle field: vertices plus its uniform slot.
struct PointBatch {
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
    point_size: f32,
    opacity: f32,
}

impl PointBatch {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        vertices: &[PointVertex],
        point_size: f32,
        opacity: f32,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                model: Mat4::IDENTITY.to_cols_array_2d(),
                point_size,
                opacity,
                _padding: [0.0; 2],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertex_buffer,
            uniform_buffer,
            bind_group,
            count: vertices.len() as u32,
            point_size,
            opacity,
        }
    }

    fn write_uniforms(&self, queue: &wgpu::Queue, view_proj: Mat4, model: Mat4) {
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            point_size: self.point_size,
            opacity: self.opacity,
            _padding: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}

/// GPU context and per-field batches. Created on mount, dropped with the
/// app; dropping releases the surface, device and every buffer.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    additive_pipeline: wgpu::RenderPipeline,
    alpha_pipeline: wgpu::RenderPipeline,
    stars: PointBatch,
    sphere: PointBatch,
    marks: PointBatch,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        cfg: &BackdropConfig,
        scene: &SphereScene,
        starfield: &Starfield,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

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
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let additive_pipeline = create_point_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            additive,
            "Additive Point Pipeline",
        );
        let alpha_pipeline = create_point_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::BlendState::ALPHA_BLENDING,
            "Alpha Point Pipeline",
        );

        let star_colors = vec![cfg.starfield.color; starfield.positions.len()];
        let stars = PointBatch::new(
            &device,
            &bind_group_layout,
            "Star Batch",
            &pack_vertices(&starfield.positions, &star_colors),
            cfg.starfield.point_size,
            cfg.starfield.opacity,
        );
        let sphere = PointBatch::new(
            &device,
            &bind_group_layout,
            "Sphere Batch",
            &pack_vertices(&scene.sphere.positions, &scene.sphere.colors),
            cfg.sphere.point_size,
            cfg.sphere.opacity,
        );
        let marks = PointBatch::new(
            &device,
            &bind_group_layout,
            "Mark Batch",
            &pack_vertices(&scene.marks.positions, &scene.marks.colors),
            cfg.marks.point_size,
            cfg.marks.opacity,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            additive_pipeline,
            alpha_pipeline,
            stars,
            sphere,
            marks,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the frame's vertices and uniforms, then draw all three fields.
    pub fn render(
        &mut self,
        scene: &SphereScene,
        starfield: &Starfield,
    ) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let sphere_vp = view_proj(&SPHERE_CAMERA, aspect);
        let star_vp = view_proj(&STAR_CAMERA, aspect);

        // Star positions are rigid; only their rotation uniform changes.
        self.stars
            .write_uniforms(&self.queue, star_vp, starfield.model());
        self.sphere
            .write_uniforms(&self.queue, sphere_vp, scene.sphere_model());
        self.marks
            .write_uniforms(&self.queue, sphere_vp, scene.marks_model());

        self.queue.write_buffer(
            &self.sphere.vertex_buffer,
            0,
            bytemuck::cast_slice(&pack_vertices(
                &scene.sphere.positions,
                &scene.sphere.colors,
            )),
        );
        self.queue.write_buffer(
            &self.marks.vertex_buffer,
            0,
            bytemuck::cast_slice(&pack_vertices(&scene.marks.positions, &scene.marks.colors)),
        );

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
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.01,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.alpha_pipeline);
            self.stars.draw(&mut pass);

            pass.set_pipeline(&self.additive_pipeline);
            self.sphere.draw(&mut pass);
            self.marks.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_point_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: 12,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_parses() {
        naga::front::wgsl::parse_str(SHADER_SOURCE).expect("shader should be valid WGSL");
    }

    #[test]
    fn test_uniforms_size_matches_wgsl_layout() {
        // Two mat4x4 plus two f32, rounded up to 16-byte struct alignment.
        assert_eq!(std::mem::size_of::<Uniforms>(), 144);
        assert_eq!(std::mem::size_of::<PointVertex>(), 24);
    }

    #[test]
    fn test_view_proj_centers_origin() {
        let vp = view_proj(&SPHERE_CAMERA, 16.0 / 9.0);
        let clip = vp * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }
}
