//! Standard lit material used by every non-water mesh.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::light::HemisphericLight;
use super::mesh::Vertex;
use crate::rendering::{RenderContext, DEPTH_FORMAT};

const SHADER_SOURCE: &str = include_str!("standard.wgsl");

/// Uniform buffer for the standard material
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StandardUniforms {
    pub world_view_projection: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    pub light: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    pub diffuse: [f32; 4],
}

impl StandardUniforms {
    fn new(world_view_projection: Mat4, world: Mat4, light: &HemisphericLight, light_dir: Vec3, diffuse: Vec3) -> Self {
        Self {
            world_view_projection: world_view_projection.to_cols_array_2d(),
            world: world.to_cols_array_2d(),
            light: light_dir.extend(light.intensity).to_array(),
            sky_color: light.sky_color.extend(1.0).to_array(),
            ground_color: light.ground_color.extend(1.0).to_array(),
            diffuse: diffuse.extend(1.0).to_array(),
        }
    }
}

/// Pipeline shared by all standard materials
pub struct StandardPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl StandardPipeline {
    pub fn new(context: &RenderContext) -> Self {
        let device = &context.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Standard Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Standard Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Standard Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Standard Pipeline"),
            layout: Some(&layout),
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
                    format: context.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
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

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
    }
}

/// Per-mesh uniforms for the standard pipeline
pub struct StandardMaterial {
    diffuse: Vec3,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl StandardMaterial {
    pub fn new(device: &wgpu::Device, pipeline: &StandardPipeline, diffuse: Vec3) -> Self {
        let uniforms = StandardUniforms::zeroed();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Standard Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Standard Bind Group"),
            layout: &pipeline.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            diffuse,
            uniform_buffer,
            bind_group,
        }
    }

    /// Upload this frame's transforms and light
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        world_view_projection: Mat4,
        world: Mat4,
        light: &HemisphericLight,
        light_dir: Vec3,
    ) {
        let uniforms = StandardUniforms::new(world_view_projection, world, light, light_dir, self.diffuse);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(0, &self.bind_group, &[]);
    }
}
