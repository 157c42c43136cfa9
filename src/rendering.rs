//! Render context: wgpu device, window surface, depth buffer and frame capture.

use std::path::PathBuf;
use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::WaterError;
use crate::params::{CaptureConfig, RenderConfig};
use crate::scene::Scene;

/// Depth buffer format shared by every pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// What happened to a rendered frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Presented,

    /// Frame was presented and also written to this PNG
    Captured(PathBuf),
}

/// GPU state owned by the application for the lifetime of the window
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
    capture: Option<CaptureConfig>,
}

impl RenderContext {
    /// Create device, surface and depth buffer for `window`
    pub async fn new(
        window: Arc<Window>,
        render_config: &RenderConfig,
        capture: Option<CaptureConfig>,
    ) -> Result<Self, WaterError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(WaterError::NoAdapter)?;
        log::info!("Using adapter: {:?}", adapter.get_info());

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
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;

        // Frame capture copies straight out of the surface texture
        let capture = match capture {
            Some(capture) if surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC) => {
                usage |= wgpu::TextureUsages::COPY_SRC;
                Some(capture)
            }
            Some(capture) => {
                log::warn!(
                    "Surface does not support copies; screenshot {} disabled",
                    capture.path.display()
                );
                None
            }
            None => None,
        };

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let [r, g, b] = render_config.clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            capture,
        })
    }

    /// Reconfigure surface and depth buffer; zero sizes (minimized) are ignored
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Render a frame, capturing it when a pending screenshot is due
    pub fn render(&mut self, scene: &Scene, elapsed: f32) -> Result<FrameOutcome, WaterError> {
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

            scene.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        let outcome = match self.capture.take_if(|capture| capture.is_due(elapsed)) {
            Some(capture) => {
                self.capture_frame(&capture, &output)?;
                FrameOutcome::Captured(capture.path)
            }
            None => FrameOutcome::Presented,
        };

        output.present();

        Ok(outcome)
    }

    /// Copy the surface texture to a buffer and save it as PNG
    fn capture_frame(
        &self,
        capture: &CaptureConfig,
        texture: &wgpu::SurfaceTexture,
    ) -> Result<(), WaterError> {
        let width = self.config.width;
        let height = self.config.height;
        let bytes_per_pixel = 4; // RGBA8 / BGRA8
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Capture Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        mapping_outcome(receiver.recv())?;

        let swap_bgra = matches!(
            self.config.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );
        let image_data = {
            let data = buffer_slice.get_mapped_range();
            unpad_rows(&data, width, height, padded_bytes_per_row, swap_bgra)
        };
        buffer.unmap();

        image::save_buffer(
            &capture.path,
            &image_data,
            width,
            height,
            image::ColorType::Rgba8,
        )
        .map_err(|source| WaterError::Capture {
            path: capture.path.display().to_string(),
            source,
        })?;

        log::info!("Saved screenshot {}", capture.path.display());
        Ok(())
    }

    /// Wait for outstanding GPU work before the device is dropped
    pub fn teardown(self) {
        self.device.poll(wgpu::Maintain::Wait);
        log::info!("Render context released");
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
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

/// Result delivered by a `map_async` callback; a callback dropped unsent is a failed map
fn mapping_outcome(
    received: Result<Result<(), wgpu::BufferAsyncError>, std::sync::mpsc::RecvError>,
) -> Result<(), WaterError> {
    match received {
        Ok(result) => result.map_err(WaterError::from),
        Err(_) => Err(WaterError::MapBuffer(wgpu::BufferAsyncError)),
    }
}

/// Drop per-row copy padding and optionally swizzle BGRA to RGBA
pub fn unpad_rows(
    data: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    swap_bgra: bool,
) -> Vec<u8> {
    let unpadded_bytes_per_row = (width * 4) as usize;
    let mut image_data = Vec::with_capacity(unpadded_bytes_per_row * height as usize);

    for y in 0..height as usize {
        let start = y * padded_bytes_per_row as usize;
        image_data.extend_from_slice(&data[start..start + unpadded_bytes_per_row]);
    }

    if swap_bgra {
        for pixel in image_data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }

    image_data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpad_drops_row_padding() {
        // 2x2 image, rows padded to 12 bytes
        let data: Vec<u8> = vec![
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];
        let out = unpad_rows(&data, 2, 2, 12, false);
        assert_eq!(out, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_unpad_swizzles_bgra() {
        let data = vec![10, 20, 30, 255, 0, 0, 0, 0];
        let out = unpad_rows(&data, 1, 1, 8, true);
        assert_eq!(out, vec![30, 20, 10, 255]);
    }

    #[test]
    fn test_dropped_map_callback_is_an_error() {
        let (sender, receiver) =
            std::sync::mpsc::channel::<Result<(), wgpu::BufferAsyncError>>();
        drop(sender);
        assert!(matches!(
            mapping_outcome(receiver.recv()),
            Err(WaterError::MapBuffer(_))
        ));

        let (sender, receiver) = std::sync::mpsc::channel();
        sender.send(Ok(())).unwrap();
        assert!(mapping_outcome(receiver.recv()).is_ok());

        let (sender, receiver) = std::sync::mpsc::channel();
        sender.send(Err(wgpu::BufferAsyncError)).unwrap();
        assert!(mapping_outcome(receiver.recv()).is_err());
    }

    #[test]
    fn test_unpad_without_padding() {
        let data: Vec<u8> = (0..32).collect();
        assert_eq!(unpad_rows(&data, 4, 2, 16, false), data);
    }
}
