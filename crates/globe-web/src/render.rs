use globe_core::constants::{GLOBE_RADIUS, MARKER_PICK_RADIUS};
use globe_core::frames::{decal_world_transform, marker_world_position};
use globe_core::layout::{billboard_rotation, PinLine};
use globe_core::state::Panel;
use globe_core::{FrameKind, GlobeControls, InteractionContext, LocationType};
use glam::{Mat4, Vec3, Vec4};
use web_sys as web;
use wgpu::util::DeviceExt;

const SHAPE_DISC: f32 = 0.0;
const SHAPE_RING: f32 = 1.0;
const SHAPE_SPHERE: f32 = 2.0;
const SHAPE_QUAD: f32 = 3.0;

const PIN_LINE_WIDTH: f32 = 0.004;
const HOVER_EMISSIVE: f32 = 0.5;
const INITIAL_INSTANCE_CAPACITY: usize = 256;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: Vec4, shape: f32, emissive: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
            params: [shape, emissive, 0.0, 0.0],
        }
    }
}

fn location_color(location: LocationType) -> Vec3 {
    match location {
        LocationType::Earth => Vec3::new(1.0, 0.55, 0.15),
        LocationType::Moon => Vec3::new(0.85, 0.85, 0.9),
        LocationType::Mars => Vec3::new(0.95, 0.35, 0.25),
        LocationType::Station => Vec3::new(0.3, 0.85, 1.0),
    }
}

/// Quad spanning `line` with a constant width, turned toward the camera.
fn pin_line_model(line: &PinLine, eye: Vec3) -> Option<Mat4> {
    let along = line.end - line.start;
    let mid = (line.start + line.end) * 0.5;
    let side = along.cross(eye - mid).try_normalize()?;
    let normal = side.cross(along).try_normalize()?;
    Some(Mat4::from_cols(
        along.extend(0.0),
        (side * PIN_LINE_WIDTH).extend(0.0),
        normal.extend(0.0),
        mid.extend(1.0),
    ))
}

fn panel_instance(panel: &Panel, rgb: Vec3) -> Option<InstanceData> {
    (panel.opacity > 0.01).then(|| {
        InstanceData::new(
            panel.world_matrix(),
            rgb.extend(0.85 * panel.opacity),
            SHAPE_QUAD,
            panel.emissive,
        )
    })
}

/// Globe markers on the far hemisphere are not drawn.
fn facing_camera(ctx: &InteractionContext, frame: FrameKind, center: Vec3) -> bool {
    frame != FrameKind::Globe || (center - ctx.globe.position).dot(ctx.camera.eye - center) > 0.0
}

/// Flatten the scene into draw-ordered instances, back to front.
pub fn collect_instances(controls: &GlobeControls) -> Vec<InstanceData> {
    let ctx = controls.context();
    let hovered = controls.hovered();
    let decal = Mat4::from_scale(Vec3::new(
        2.0 * MARKER_PICK_RADIUS,
        2.0 * MARKER_PICK_RADIUS,
        1.0,
    ));
    let mut out = Vec::with_capacity(ctx.markers.len() * 2 + 8);

    out.push(InstanceData::new(
        Mat4::from_scale_rotation_translation(
            Vec3::new(2.0 * GLOBE_RADIUS, 2.0 * GLOBE_RADIUS, 1.0),
            billboard_rotation(&ctx.camera),
            ctx.globe.position,
        ),
        Vec4::new(0.1, 0.28, 0.55, 1.0),
        SHAPE_SPHERE,
        0.0,
    ));

    out.extend(panel_instance(&ctx.flat_map, Vec3::new(0.2, 0.3, 0.45)));
    out.extend(panel_instance(&ctx.moon, Vec3::new(0.45, 0.45, 0.5)));
    out.extend(panel_instance(&ctx.mars, Vec3::new(0.5, 0.25, 0.18)));

    for line in &ctx.pin_lines {
        if let Some(model) = pin_line_model(line, ctx.camera.eye) {
            out.push(InstanceData::new(
                model,
                Vec4::new(0.3, 0.85, 1.0, 0.6),
                SHAPE_QUAD,
                0.0,
            ));
        }
    }

    for marker in ctx.markers.iter() {
        if !ctx.frame_visible(marker.frame) {
            continue;
        }
        let Ok(center) = marker_world_position(ctx, marker) else {
            continue;
        };
        if !facing_camera(ctx, marker.frame, center) {
            continue;
        }
        let fade = ctx.panel(marker.frame).map(|p| p.opacity).unwrap_or(1.0);
        let rgb = location_color(marker.location);

        for ring in &marker.rings {
            if let Some(world) = ring.world {
                out.push(InstanceData::new(
                    world * decal,
                    rgb.extend(ring.opacity * fade),
                    SHAPE_RING,
                    0.0,
                ));
            }
        }

        let Ok(world) = decal_world_transform(ctx, marker, marker.scale) else {
            continue;
        };
        let alpha = if marker.is_locked { 0.45 } else { 1.0 };
        let emissive = if hovered == Some(marker.id) {
            HOVER_EMISSIVE
        } else {
            0.0
        };
        out.push(InstanceData::new(
            world * decal,
            rgb.extend(alpha * fade),
            SHAPE_DISC,
            emissive,
        ));
    }
    out
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("markers"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/markers.wgsl").into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Unit quad, two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let instance_attributes = wgpu::vertex_attr_array![
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: model matrix columns, color, params
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &instance_attributes,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("markers"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        log::info!("[render] WebGPU ready, {:?} {}x{}", format, width, height);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            quad_vb,
            instance_vb,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            bind_group,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(
        &mut self,
        view_proj: Mat4,
        instances: &[InstanceData],
    ) -> Result<(), wgpu::SurfaceError> {
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_vb = create_instance_buffer(&self.device, self.instance_capacity);
        }
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(instances));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("rpass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.01,
                        g: 0.015,
                        b: 0.04,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..6, 0..(instances.len() as u32));
        drop(rpass);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_vb"),
        size: (std::mem::size_of::<InstanceData>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
