//! Mesh primitives and their GPU upload.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// Vertex data shared by every mesh (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Buffer layout; programs that only read `position` ignore location 1
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side triangle mesh
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Flat XZ grid centered on the origin with `subdivisions` quads per side
    pub fn ground(width: f32, depth: f32, subdivisions: u32) -> Self {
        let n = subdivisions.max(1) as usize;
        let half_width = width / 2.0;
        let half_depth = depth / 2.0;

        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        let mut indices = Vec::with_capacity(n * n * 6);

        for z in 0..=n {
            for x in 0..=n {
                let x_pos = x as f32 / n as f32 * width - half_width;
                let z_pos = z as f32 / n as f32 * depth - half_depth;

                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    normal: [0.0, 1.0, 0.0],
                });
            }
        }

        // Counter-clockwise seen from +Y
        for z in 0..n {
            for x in 0..n {
                let top_left = (z * (n + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (n + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self { vertices, indices }
    }

    /// Vertex and index buffer sizes (bytes) of a ground with `subdivisions` quads per side
    pub fn ground_buffer_sizes(subdivisions: u32) -> (u64, u64) {
        let n = subdivisions.max(1) as u64;
        let vertex_bytes = (n + 1) * (n + 1) * std::mem::size_of::<Vertex>() as u64;
        let index_bytes = n * n * 6 * std::mem::size_of::<u32>() as u64;
        (vertex_bytes, index_bytes)
    }

    /// UV sphere centered on the origin; `segments` rings and twice as many sectors
    pub fn sphere(diameter: f32, segments: u32) -> Self {
        let rings = segments.max(2);
        let sectors = rings * 2;
        let radius = diameter / 2.0;

        let mut vertices = Vec::with_capacity(((rings + 1) * (sectors + 1)) as usize);
        let mut indices = Vec::with_capacity((rings * sectors * 6) as usize);

        for i in 0..=rings {
            let phi = std::f32::consts::PI * i as f32 / rings as f32;
            for j in 0..=sectors {
                let theta = std::f32::consts::TAU * j as f32 / sectors as f32;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

                vertices.push(Vertex {
                    position: (normal * radius).to_array(),
                    normal: normal.to_array(),
                });
            }
        }

        // Counter-clockwise seen from outside
        for i in 0..rings {
            for j in 0..sectors {
                let a = i * (sectors + 1) + j;
                let b = a + sectors + 1;
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }

        Self { vertices, indices }
    }
}

/// Mesh uploaded to the GPU with its world transform
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    pub world: Mat4,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData, world: Mat4) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            world,
        }
    }

    /// Bind buffers and issue the indexed draw; the caller sets pipeline and bind groups
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
