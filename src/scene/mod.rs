//! Demo scene: a water-shaded ground plane and a lit sphere under a
//! hemispheric light, viewed through an orbit camera.

mod light;
mod mesh;
mod standard;

pub use light::HemisphericLight;
pub use mesh::{GpuMesh, MeshData, Vertex};
pub use standard::{StandardMaterial, StandardPipeline, StandardUniforms};

use glam::{Mat4, Vec3};

use crate::camera::ArcRotateCamera;
use crate::clock::FrameTime;
use crate::error::WaterError;
use crate::params::{AppConfig, RenderConfig};
use crate::rendering::RenderContext;
use crate::water::{self, BoundProgram};

/// Shading assigned to a mesh
pub enum Material {
    Standard(StandardMaterial),
    Water(BoundProgram),
}

/// Named mesh with its material slot; meshes without a material are not drawn
pub struct SceneMesh {
    pub name: String,
    pub mesh: GpuMesh,
    pub material: Option<Material>,
}

impl SceneMesh {
    pub fn new(name: &str, mesh: GpuMesh) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            material: None,
        }
    }
}

pub struct Scene {
    meshes: Vec<SceneMesh>,
    pub light: HemisphericLight,
    pub camera: ArcRotateCamera,
    standard: StandardPipeline,
    render_config: RenderConfig,
}

impl Scene {
    pub fn new(context: &RenderContext, config: &AppConfig) -> Result<Self, WaterError> {
        let scene = &config.scene;
        let standard = StandardPipeline::new(context);

        let (vertex_bytes, index_bytes) = MeshData::ground_buffer_sizes(scene.ground_subdivisions);
        if vertex_bytes.max(index_bytes) > context.device.limits().max_buffer_size {
            return Err(WaterError::invalid(
                "subdivisions",
                scene.ground_subdivisions,
                "ground buffers would exceed the GPU buffer size limit",
            ));
        }

        let ground_data = MeshData::ground(
            scene.ground_width_m,
            scene.ground_depth_m,
            scene.ground_subdivisions,
        );
        log::info!(
            "Ground: {}x{} m, {} subdivisions ({} vertices)",
            scene.ground_width_m,
            scene.ground_depth_m,
            scene.ground_subdivisions,
            ground_data.vertices.len()
        );
        let mut ground = SceneMesh::new(
            "ground",
            GpuMesh::upload(
                &context.device,
                "Ground",
                &ground_data,
                Mat4::from_translation(Vec3::new(0.0, scene.ground_elevation_m, 0.0)),
            ),
        );
        water::attach(context, &mut ground, &config.waves)?;

        let mut sphere = SceneMesh::new(
            "sphere",
            GpuMesh::upload(
                &context.device,
                "Sphere",
                &MeshData::sphere(scene.sphere_diameter_m, scene.sphere_segments),
                Mat4::from_translation(Vec3::new(0.0, scene.sphere_elevation_m, 0.0)),
            ),
        );
        sphere.material = Some(Material::Standard(StandardMaterial::new(
            &context.device,
            &standard,
            Vec3::from_array(scene.sphere_color),
        )));

        Ok(Self {
            meshes: vec![ground, sphere],
            light: HemisphericLight::new(&scene.light),
            camera: ArcRotateCamera::new(config.camera.clone()),
            standard,
            render_config: config.render.clone(),
        })
    }

    /// Advance the camera and push this frame's uniforms
    pub fn update(&mut self, queue: &wgpu::Queue, time: FrameTime, aspect: f32) {
        self.camera.update(time.delta);
        let view_proj = self.camera.view_proj(aspect, &self.render_config);
        let light_dir = self.light.direction_at(time.elapsed);

        for scene_mesh in &self.meshes {
            let world = scene_mesh.mesh.world;
            match &scene_mesh.material {
                Some(Material::Standard(material)) => {
                    material.update(queue, view_proj * world, world, &self.light, light_dir);
                }
                Some(Material::Water(program)) => {
                    program.set_world_view_projection(queue, view_proj * world);
                    program.on_frame(queue, time.elapsed, light_dir);
                }
                None => {}
            }
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        for scene_mesh in &self.meshes {
            match &scene_mesh.material {
                Some(Material::Standard(material)) => {
                    self.standard.bind(render_pass);
                    material.bind(render_pass);
                }
                Some(Material::Water(program)) => program.bind(render_pass),
                None => continue,
            }
            scene_mesh.mesh.draw(render_pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Headless device, or `None` on machines without an adapter
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;
        pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Test Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .ok()
    }

    #[test]
    fn test_new_mesh_has_no_material() {
        let Some((device, _queue)) = headless_device() else {
            eprintln!("no GPU adapter, skipping");
            return;
        };

        let mesh = GpuMesh::upload(
            &device,
            "Ground",
            &MeshData::ground(1.0, 1.0, 2),
            Mat4::IDENTITY,
        );
        let ground = SceneMesh::new("ground", mesh);

        assert_eq!(ground.name, "ground");
        assert!(ground.material.is_none());
    }
}
