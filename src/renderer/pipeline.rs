//! WebGPU render backend

use std::borrow::Cow;

use wgpu::util::DeviceExt;

use super::backend::RenderBackend;
use super::shader::{ShaderProgram, UniformBlock};
use super::shapes::{Mesh, Topology};
use super::transforms::Transforms;
use super::vertex::{COLOR_SLOT, POSITION_SLOT, VertexStreams};
use crate::error::RenderError;

/// Pipeline state built from the linked program
struct InstalledProgram {
    triangles: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: UniformBlock,
}

/// Main render state
pub struct WgpuBackend {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    program: Option<InstalledProgram>,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl WgpuBackend {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        clear_color: [f64; 4],
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flappy-circle-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RenderError::IncompatibleSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let [r, g, b, a] = clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            clear_color: wgpu::Color { r, g, b, a },
            program: None,
            size: (width, height),
        })
    }

    fn build_pipeline(
        &self,
        label: &str,
        layout: &wgpu::PipelineLayout,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        program: &ShaderProgram,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let streams = VertexStreams::new(&program.attributes);
        let buffers = streams.layouts();

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: Some(program.vertex_entry.as_str()),
                    buffers: &buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: Some(program.fragment_entry.as_str()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
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
            })
    }
}

impl RenderBackend for WgpuBackend {
    fn install_program(&mut self, program: &ShaderProgram) -> Result<(), RenderError> {
        if self.program.is_some() {
            return Err(RenderError::Program(
                "a shader program is already installed".to_string(),
            ));
        }

        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vertex_shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(program.vertex_source.clone())),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fragment_shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(program.fragment_source.clone())),
        });

        let uniforms = program.uniforms;
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("transforms"),
            size: uniforms.size as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("transforms_bind_group_layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: uniforms.binding,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("transforms_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: uniforms.binding,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let triangles = self.build_pipeline(
            "triangle_pipeline",
            &pipeline_layout,
            &vertex,
            &fragment,
            program,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let points = self.build_pipeline(
            "point_pipeline",
            &pipeline_layout,
            &vertex,
            &fragment,
            program,
            wgpu::PrimitiveTopology::PointList,
        );

        self.program = Some(InstalledProgram {
            triangles,
            points,
            uniform_buffer,
            bind_group,
            uniforms,
        });
        log::info!("Shader program installed");
        Ok(())
    }

    fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(&mut self, transforms: &Transforms, meshes: &[Mesh]) -> Result<(), RenderError> {
        let program = self.program.as_ref().ok_or(RenderError::NoProgram)?;

        self.queue.write_buffer(
            &program.uniform_buffer,
            0,
            &transforms.to_uniform_bytes(&program.uniforms),
        );

        // Fresh buffers every frame; dropped once the frame is submitted
        let uploads: Vec<(&Mesh, wgpu::Buffer, wgpu::Buffer)> = meshes
            .iter()
            .filter(|mesh| mesh.vertex_count() > 0)
            .map(|mesh| {
                let positions = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("position_buffer"),
                        contents: bytemuck::cast_slice(&mesh.positions),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                let colors = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("color_buffer"),
                        contents: bytemuck::cast_slice(&mesh.colors),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                (mesh, positions, colors)
            })
            .collect();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for (mesh, positions, colors) in &uploads {
                let pipeline = match mesh.topology {
                    Topology::Triangles => &program.triangles,
                    Topology::Points => &program.points,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(program.uniforms.group, &program.bind_group, &[]);
                render_pass.set_vertex_buffer(POSITION_SLOT, positions.slice(..));
                render_pass.set_vertex_buffer(COLOR_SLOT, colors.slice(..));
                render_pass.draw(0..mesh.vertex_count(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn release(&mut self) {
        if self.program.take().is_some() {
            log::info!("Shader program released");
        }
    }
}
