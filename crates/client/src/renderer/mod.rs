//! wgpu renderer for the showcase scene.
//!
//! Draws every scene object as a flat-lit mesh, then the loaded model's
//! node hierarchy posed from the animation driver, then the egui panel
//! on top with the same encoder.

pub mod camera;
pub mod mesh;
pub mod orbit;
pub mod pipeline;
pub mod primitives;

use std::collections::HashMap;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec4};
use wgpu::{
    util::DeviceExt, Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor,
    PowerPreference, Queue, RequestAdapterOptions, Surface, SurfaceConfiguration, TextureUsages,
};
use winit::{dpi::PhysicalSize, window::Window};

use vitrine_core::{ClipPlane, GeometryKind, ObjectId, Stage, Transform};

use crate::assets::CpuModel;
use crate::panel::DebugPanel;
use camera::Camera;
use mesh::MeshData;
use pipeline::{GlobalUniforms, InstanceUniforms, ScenePipeline};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU resources for one drawable mesh.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One primitive of the loaded model, bound to a node in its hierarchy.
struct GpuModelPart {
    mesh: GpuMesh,
    node: usize,
    color: Vec4,
}

/// The loaded model on the GPU plus its CPU-side hierarchy and clips.
struct GpuModel {
    parts: Vec<GpuModelPart>,
    cpu: CpuModel,
}

/// The main renderer.
pub struct Renderer {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
    scene_pipeline: ScenePipeline,
    meshes: HashMap<ObjectId, GpuMesh>,
    model: Option<GpuModel>,
    global_clip: Option<ClipPlane>,
    global_clip_enabled: bool,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No suitable GPU adapter found"))?;

        tracing::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("vitrine_device"),
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

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);
        let scene_pipeline = ScenePipeline::new(&device, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            clear_color: wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.04,
                a: 1.0,
            },
            scene_pipeline,
            meshes: HashMap::new(),
            model: None,
            global_clip: None,
            global_clip_enabled: false,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
            tracing::debug!("Resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Upload a scene object's mesh and allocate its per-object uniforms.
    pub fn register_mesh(&mut self, id: ObjectId, data: &MeshData) {
        let gpu_mesh = self.upload_mesh(data);
        self.meshes.insert(id, gpu_mesh);
    }

    /// Upload the loaded model: one GPU mesh per primitive, posed from
    /// the node hierarchy at draw time.
    pub fn set_model(&mut self, cpu: CpuModel) {
        let parts = cpu
            .meshes
            .iter()
            .map(|part| GpuModelPart {
                mesh: self.upload_mesh(&part.data),
                node: part.node,
                color: part.color,
            })
            .collect();
        self.model = Some(GpuModel { parts, cpu });
    }

    /// Install the plane the cut-plane toggle switches on and off.
    pub fn set_global_clip_plane(&mut self, plane: ClipPlane) {
        self.global_clip = Some(plane);
    }

    pub fn set_global_clip_enabled(&mut self, enabled: bool) {
        self.global_clip_enabled = enabled;
    }

    fn upload_mesh(&self, data: &MeshData) -> GpuMesh {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let (instance_buffer, bind_group) = self.scene_pipeline.create_instance(&self.device);
        GpuMesh {
            vertex_buffer,
            vertex_count: data.vertex_count(),
            instance_buffer,
            bind_group,
        }
    }

    pub fn render(
        &mut self,
        stage: &Stage,
        camera: &Camera,
        panel: &mut DebugPanel,
        window: &Window,
    ) -> Result<(), wgpu::SurfaceError> {
        let globals = GlobalUniforms::new(
            camera.projection_matrix(),
            camera.view_matrix(),
            self.global_clip_enabled
                .then_some(self.global_clip)
                .flatten(),
        );
        self.scene_pipeline
            .update_global_uniforms(&self.queue, &globals);

        // Per-object uniforms for everything except the model root, which
        // is drawn part by part below.
        for object in stage.scene.objects() {
            let Some(gpu_mesh) = self.meshes.get(&object.id) else {
                continue;
            };
            let uniforms = InstanceUniforms::new(
                transform_matrix(&object.transform),
                object.material.color.extend(1.0),
                object.material.clip_planes.first().copied(),
            );
            self.queue.write_buffer(
                &gpu_mesh.instance_buffer,
                0,
                bytemuck::cast_slice(&[uniforms]),
            );
        }

        // Model parts: root transform from the scene, node pose from the
        // animation driver's clip times.
        if let Some(model) = &self.model {
            let root_matrix = stage
                .scene
                .model_root()
                .and_then(|id| stage.scene.get(id))
                .map(|root| transform_matrix(&root.transform))
                .unwrap_or(Mat4::IDENTITY);

            let clip_times: Vec<(&str, f32)> = stage
                .driver()
                .map(|driver| {
                    driver
                        .bindings()
                        .iter()
                        .map(|b| (b.name.as_str(), b.time()))
                        .collect()
                })
                .unwrap_or_default();

            let node_globals = model.cpu.node_global_transforms(&clip_times);
            for part in &model.parts {
                let uniforms = InstanceUniforms::new(
                    root_matrix * node_globals[part.node],
                    part.color,
                    None,
                );
                self.queue.write_buffer(
                    &part.mesh.instance_buffer,
                    0,
                    bytemuck::cast_slice(&[uniforms]),
                );
            }
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        panel.prepare(&self.device, &self.queue, &mut encoder, &screen);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
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
            let mut render_pass = render_pass.forget_lifetime();

            render_pass.set_pipeline(&self.scene_pipeline.pipeline);
            render_pass.set_bind_group(0, &self.scene_pipeline.global_bind_group, &[]);

            for object in stage.scene.objects() {
                // The model root has no mesh of its own.
                if object.kind == GeometryKind::LoadedModel {
                    continue;
                }
                let Some(gpu_mesh) = self.meshes.get(&object.id) else {
                    continue;
                };
                render_pass.set_bind_group(1, &gpu_mesh.bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                render_pass.draw(0..gpu_mesh.vertex_count, 0..1);
            }

            if let Some(model) = &self.model {
                for part in &model.parts {
                    render_pass.set_bind_group(1, &part.mesh.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, part.mesh.vertex_buffer.slice(..));
                    render_pass.draw(0..part.mesh.vertex_count, 0..1);
                }
            }

            panel.paint(&mut render_pass, &screen);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        DEPTH_FORMAT
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }
}

fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Model matrix from position plus XYZ Euler rotation.
fn transform_matrix(transform: &Transform) -> Mat4 {
    Mat4::from_translation(transform.position)
        * Mat4::from_euler(
            EulerRot::XYZ,
            transform.rotation.x,
            transform.rotation.y,
            transform.rotation.z,
        )
}
