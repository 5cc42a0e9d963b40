//! WebGPU render pipeline
//!
//! Draws the bug as flat triangles onto a transparent surface laid over the
//! page.

use glam::Vec2;

use super::shapes::{self, MAX_BUG_VERTICES};
use super::vertex::{Vertex, colors};
use super::{BackendError, RenderBackend};
use crate::sim::{Camera, Pose, Projector};

/// Vertex storage for the bug model
struct BugGeometry {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

/// wgpu-backed [`RenderBackend`]
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    geometry: Option<BugGeometry>,
    pose: Option<Pose>,
    camera: Camera,
    /// Surface pixels per CSS pixel
    pixel_ratio: f32,
}

impl WgpuBackend {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        camera: Camera,
        pixel_ratio: f32,
    ) -> Result<Self, BackendError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| BackendError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("bug-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| BackendError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| BackendError::Surface("surface reports no formats".to_string()))?;

        // The overlay must stay see-through around the bug
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let (width, height) = surface_size(&camera, pixel_ratio);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "Surface config: {}x{}, format: {:?}, alpha: {:?}",
            width,
            height,
            surface_format,
            alpha_mode
        );
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bug_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("bug_pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("bug_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
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
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            geometry: None,
            pose: None,
            camera,
            pixel_ratio,
        })
    }

    /// Reconfigure the surface if the camera's size no longer matches it
    fn resize_surface(&mut self) {
        let (width, height) = surface_size(&self.camera, self.pixel_ratio);
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        log::debug!("Resizing surface to {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}

/// Physical surface size for a camera, never zero
fn surface_size(camera: &Camera, pixel_ratio: f32) -> (u32, u32) {
    let w = (camera.width * pixel_ratio).round().max(1.0) as u32;
    let h = (camera.height * pixel_ratio).round().max(1.0) as u32;
    (w, h)
}

impl Projector for WgpuBackend {
    fn sync_camera(&mut self, camera: &Camera) {
        self.camera = *camera;
        self.resize_surface();
    }

    fn project_to_screen(&self, world: Vec2) -> Vec2 {
        self.camera.world_to_screen(world)
    }

    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.camera.screen_to_world(screen)
    }
}

impl RenderBackend for WgpuBackend {
    fn create_entity_geometry(&mut self) -> Result<(), BackendError> {
        let vertex_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("bug_vertex_buffer"),
            size: (MAX_BUG_VERTICES * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.geometry = Some(BugGeometry {
            vertex_buffer,
            vertex_count: 0,
        });
        Ok(())
    }

    fn set_pose(&mut self, pose: &Pose) -> Result<(), BackendError> {
        if self.geometry.is_none() {
            return Err(BackendError::MissingGeometry);
        }
        self.pose = Some(*pose);
        Ok(())
    }

    fn render(&mut self) -> Result<(), BackendError> {
        let geometry = self.geometry.as_mut().ok_or(BackendError::MissingGeometry)?;

        let vertices = self
            .pose
            .map(|pose| shapes::bug(&pose, &self.camera))
            .unwrap_or_default();
        let count = vertices.len().min(MAX_BUG_VERTICES / 3 * 3);
        if count > 0 {
            self.queue.write_buffer(
                &geometry.vertex_buffer,
                0,
                bytemuck::cast_slice(&vertices[..count]),
            );
        }
        geometry.vertex_count = count as u32;

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(BackendError::SurfaceLost);
            }
            Err(e) => return Err(BackendError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("bug_encoder"),
            });

        {
            let [r, g, b, a] = colors::CLEAR.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bug_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if geometry.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                render_pass.draw(0..geometry.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn dispose_geometry(&mut self) {
        if let Some(geometry) = self.geometry.take() {
            geometry.vertex_buffer.destroy();
            log::debug!("Bug geometry disposed");
        }
        self.pose = None;
    }
}
