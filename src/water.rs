//! Binds the generated water program to a surface mesh and keeps its
//! per-frame uniforms current.

use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::error::WaterError;
use crate::rendering::{RenderContext, DEPTH_FORMAT};
use crate::scene::{Material, SceneMesh, Vertex};
use crate::wave::shader::{FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::wave::{build_program_source, WaveSet};

/// Uniform block of the water program, laid out as the generated WGSL declares it
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterUniforms {
    pub world_view_projection: [[f32; 4]; 4],
    pub wave_a: [f32; 4],
    pub wave_b: [f32; 4],
    pub wave_c: [f32; 4],
    pub light_dir: [f32; 3],
    pub time: f32,
}

impl WaterUniforms {
    pub fn new(wave_set: &WaveSet) -> Self {
        let [wave_a, wave_b, wave_c] = wave_set.packed();
        Self {
            world_view_projection: Mat4::IDENTITY.to_cols_array_2d(),
            wave_a,
            wave_b,
            wave_c,
            light_dir: [0.0, 1.0, 0.0],
            time: 0.0,
        }
    }
}

/// Water program bound to one mesh: pipeline plus its own uniform buffer
pub struct BoundProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl BoundProgram {
    /// Push the latest time and light direction
    pub fn on_frame(&self, queue: &wgpu::Queue, elapsed_seconds: f32, light_direction: Vec3) {
        queue.write_buffer(
            &self.uniform_buffer,
            offset_of!(WaterUniforms, light_dir) as wgpu::BufferAddress,
            bytemuck::cast_slice(&light_direction.to_array()),
        );
        queue.write_buffer(
            &self.uniform_buffer,
            offset_of!(WaterUniforms, time) as wgpu::BufferAddress,
            bytemuck::bytes_of(&elapsed_seconds),
        );
    }

    pub fn set_world_view_projection(&self, queue: &wgpu::Queue, world_view_projection: Mat4) {
        queue.write_buffer(
            &self.uniform_buffer,
            offset_of!(WaterUniforms, world_view_projection) as wgpu::BufferAddress,
            bytemuck::cast_slice(&world_view_projection.to_cols_array()),
        );
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

/// The water surface is visible from below, so no face is culled
fn water_primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, WaterError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(WaterError::ProgramCompilation {
            label: label.to_string(),
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}

/// Compile the water program and make it `mesh`'s material
pub fn attach(
    context: &RenderContext,
    mesh: &mut SceneMesh,
    wave_set: &WaveSet,
) -> Result<(), WaterError> {
    let device = &context.device;
    let source = build_program_source();

    let vertex = compile_stage(device, "Water Vertex Shader", &source.vertex)?;
    let fragment = compile_stage(device, "Water Fragment Shader", &source.fragment)?;

    // Waves are fixed for the program's lifetime; only time, light and transform change
    let uniforms = WaterUniforms::new(wave_set);
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Water Uniform Buffer"),
        contents: bytemuck::cast_slice(&[uniforms]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Water Bind Group Layout"),
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

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Water Bind Group"),
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Water Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Water Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: context.config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: water_primitive_state(),
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
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(WaterError::ProgramCompilation {
            label: "Water Pipeline".to_string(),
            message: error.to_string(),
        });
    }

    log::info!(
        "Water program attached to '{}' (waves: {:?})",
        mesh.name,
        wave_set.packed()
    );

    mesh.material = Some(Material::Water(BoundProgram {
        pipeline,
        uniform_buffer,
        bind_group,
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::shader::UNIFORM_STRUCT;
    use crate::wave::WaveParameters;

    fn shader_uniform_layout() -> (Vec<(String, u32)>, u32) {
        let source = build_program_source();
        let module = naga::front::wgsl::parse_str(&source.vertex).unwrap();
        let layout = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { members, span }) if name == UNIFORM_STRUCT => {
                    let offsets = members
                        .iter()
                        .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                        .collect();
                    Some((offsets, *span))
                }
                _ => None,
            })
            .expect("uniform struct missing");
        layout
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 128);
    }

    #[test]
    fn test_uniform_offsets_match_shader() {
        let (members, span) = shader_uniform_layout();
        assert_eq!(span as usize, std::mem::size_of::<WaterUniforms>());

        let rust_offsets = [
            ("worldViewProjection", offset_of!(WaterUniforms, world_view_projection)),
            ("waveA", offset_of!(WaterUniforms, wave_a)),
            ("waveB", offset_of!(WaterUniforms, wave_b)),
            ("waveC", offset_of!(WaterUniforms, wave_c)),
            ("lightDir", offset_of!(WaterUniforms, light_dir)),
            ("time", offset_of!(WaterUniforms, time)),
        ];

        assert_eq!(members.len(), rust_offsets.len());
        for ((name, offset), (rust_name, rust_offset)) in members.iter().zip(rust_offsets) {
            assert_eq!(name, rust_name);
            assert_eq!(*offset as usize, rust_offset, "{}", name);
        }
    }

    #[test]
    fn test_waves_fill_slots_in_order() {
        let uniforms = WaterUniforms::new(&WaveSet::default());
        let packed = WaveSet::default().packed();

        assert_eq!(uniforms.wave_a, packed[0]);
        assert_eq!(uniforms.wave_b, packed[1]);
        assert_eq!(uniforms.wave_c, packed[2]);
        assert_eq!(uniforms.time, 0.0);
    }

    #[test]
    fn test_primary_only_uses_sentinel_slots() {
        let primary = WaveParameters::new(0.5, 10.5, glam::Vec2::new(1.0, 0.0));
        let wave_set = crate::wave::build_wave_set(primary, [None, None]).unwrap();
        let uniforms = WaterUniforms::new(&wave_set);

        assert_eq!(uniforms.wave_a, [1.0, 0.0, 0.5, 10.5]);
        assert_eq!(uniforms.wave_b, [0.0001; 4]);
        assert_eq!(uniforms.wave_c, [0.0001; 4]);
    }

    #[test]
    fn test_no_face_culling() {
        assert_eq!(water_primitive_state().cull_mode, None);
    }
}
