//! Scene layout: ground, sphere and light.

/// Hemispheric light parameters
#[derive(Debug, Clone)]
pub struct LightConfig {
    /// Direction toward the sky hemisphere (world space, used as given)
    pub direction: [f32; 3],

    /// Overall intensity multiplier (dimensionless)
    pub intensity: f32,

    /// Color for surfaces facing `direction` (linear RGB)
    pub sky_color: [f32; 3],

    /// Color for surfaces facing away from `direction` (linear RGB)
    pub ground_color: [f32; 3],

    /// Rotation of the direction around the world Y axis (radians per second)
    /// 0.0 = static light
    pub orbit_speed_rad_per_s: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [1.0, 1.0, 0.0],
            intensity: 1.0,
            sky_color: [1.0, 1.0, 1.0],
            ground_color: [0.0, 0.0, 0.0],
            orbit_speed_rad_per_s: 0.0,
        }
    }
}

/// Largest accepted ground subdivision count
/// 3000 keeps both ground buffers under wgpu's default 256 MiB `max_buffer_size`
pub const MAX_GROUND_SUBDIVISIONS: u32 = 3000;

/// Scene geometry parameters
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Water ground extent along X (meters)
    pub ground_width_m: f32,

    /// Water ground extent along Z (meters)
    pub ground_depth_m: f32,

    /// Quads per side of the water ground ((n+1)² vertices)
    /// Range: 1 to [`MAX_GROUND_SUBDIVISIONS`]
    /// 1000 gives 10cm spacing, fine enough for the 3m wave
    pub ground_subdivisions: u32,

    /// Water ground rest height (meters)
    pub ground_elevation_m: f32,

    /// Sphere diameter (meters)
    pub sphere_diameter_m: f32,

    /// Sphere tessellation (rings; sectors = 2x rings)
    pub sphere_segments: u32,

    /// Sphere center height (meters)
    pub sphere_elevation_m: f32,

    /// Sphere base color (linear RGB)
    pub sphere_color: [f32; 3],

    pub light: LightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_width_m: 100.0,
            ground_depth_m: 100.0,
            ground_subdivisions: 1000,
            ground_elevation_m: -1.0,
            sphere_diameter_m: 2.0,
            sphere_segments: 16,
            sphere_elevation_m: 2.0,
            sphere_color: [1.0, 1.0, 1.0],
            light: LightConfig::default(),
        }
    }
}
