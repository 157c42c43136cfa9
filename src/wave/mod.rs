//! Gerstner wave model: parameters, the three-slot wave set, the CPU reference
//! evaluation and WGSL generation for the water program.

mod model;
mod params;
mod set;
pub mod shader;

pub use model::{displace, Displacement, GRAVITY};
pub use params::{sanitize, WaveParameters, INTEGER_NUDGE};
pub use set::{build_wave_set, WaveSet, WAVE_SLOTS};
pub use shader::{build_program_source, ProgramSource};
