//! WGSL generation for the water program.
//!
//! The program interface is fixed: one vertex attribute (`position`) and one
//! uniform block whose members are listed in [`UNIFORM_LAYOUT`]. Wave values
//! are never baked into the source; they arrive through the `waveA`, `waveB`
//! and `waveC` uniform vectors packed as `(dir.x, dir.y, steepness, wavelength)`.

use std::f32::consts::PI;

use super::model::GRAVITY;
use super::set::WAVE_SLOTS;

/// Vertex attributes consumed by the vertex stage, by location
pub const ATTRIBUTES: [&str; 1] = ["position"];

/// Uniform slots holding the packed waves, in primary/secondary/tertiary order
pub const WAVE_UNIFORMS: [&str; WAVE_SLOTS] = ["waveA", "waveB", "waveC"];

/// Uniform block members and their WGSL types, in declaration order
pub const UNIFORM_LAYOUT: [(&str, &str); 6] = [
    ("worldViewProjection", "mat4x4<f32>"),
    ("waveA", "vec4<f32>"),
    ("waveB", "vec4<f32>"),
    ("waveC", "vec4<f32>"),
    ("lightDir", "vec3<f32>"),
    ("time", "f32"),
];

/// Name of the uniform block struct in both stages
pub const UNIFORM_STRUCT: &str = "WaterUniforms";

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Source for both stages of the water program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub vertex: String,
    pub fragment: String,
}

/// Names of every uniform the program declares
pub fn uniform_names() -> impl Iterator<Item = &'static str> {
    UNIFORM_LAYOUT.iter().map(|(name, _)| *name)
}

fn uniform_block() -> String {
    let mut block = format!("struct {} {{\n", UNIFORM_STRUCT);
    for (name, ty) in UNIFORM_LAYOUT {
        block.push_str(&format!("    {}: {},\n", name, ty));
    }
    block.push_str("};\n\n@group(0) @binding(0)\nvar<uniform> u: ");
    block.push_str(UNIFORM_STRUCT);
    block.push_str(";\n");
    block
}

const VARYINGS: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};
"#;

const GERSTNER_FN: &str = r#"
fn gerstner_wave(
    wave: vec4<f32>,
    p: vec3<f32>,
    tangent: ptr<function, vec3<f32>>,
    binormal: ptr<function, vec3<f32>>
) -> vec3<f32> {
    let steepness = wave.z;
    let wavelength = wave.w;
    let k = 2.0 * PI / wavelength;
    let c = sqrt(GRAVITY / k);
    let d = normalize(wave.xy);
    let f = k * (dot(d, p.xz) - c * u.time);
    let a = steepness / k;

    *tangent += vec3<f32>(
        -d.x * d.x * (steepness * sin(f)),
        d.x * (steepness * cos(f)),
        -d.x * d.y * (steepness * sin(f))
    );
    *binormal += vec3<f32>(
        -d.x * d.y * (steepness * sin(f)),
        d.y * (steepness * cos(f)),
        -d.y * d.y * (steepness * sin(f))
    );

    return vec3<f32>(
        d.x * (a * cos(f)),
        a * sin(f),
        d.y * (a * cos(f))
    );
}
"#;

fn vertex_stage() -> String {
    let mut src = format!("const PI: f32 = {:?};\n", PI);
    src.push_str(&format!("const GRAVITY: f32 = {:?};\n\n", GRAVITY));
    src.push_str(&uniform_block());
    src.push_str(VARYINGS);
    src.push_str(GERSTNER_FN);

    src.push_str(&format!(
        "\n@vertex\nfn {}(@location(0) {}: vec3<f32>) -> VertexOutput {{\n",
        VERTEX_ENTRY, ATTRIBUTES[0]
    ));
    src.push_str("    let grid_point = position;\n");
    src.push_str("    var tangent = vec3<f32>(1.0, 0.0, 0.0);\n");
    src.push_str("    var binormal = vec3<f32>(0.0, 0.0, 1.0);\n");
    src.push_str("    var p = grid_point;\n\n");
    for slot in WAVE_UNIFORMS {
        src.push_str(&format!(
            "    p += gerstner_wave(u.{}, grid_point, &tangent, &binormal);\n",
            slot
        ));
    }
    src.push_str(
        r#"
    var out: VertexOutput;
    out.normal = normalize(cross(binormal, tangent));
    out.clip_position = u.worldViewProjection * vec4<f32>(p, 1.0);
    return out;
}
"#,
    );
    src
}

fn fragment_stage() -> String {
    let mut src = uniform_block();
    src.push_str(VARYINGS);
    src.push_str(&format!(
        r#"
@fragment
fn {}(input: VertexOutput) -> @location(0) vec4<f32> {{
    let diff = max(dot(input.normal, u.lightDir), 0.0);
    return vec4<f32>(0.5 + 0.5 * diff, 1.0, 1.0, 1.0);
}}
"#,
        FRAGMENT_ENTRY
    ));
    src
}

/// Generate the vertex and fragment stages of the water program
pub fn build_program_source() -> ProgramSource {
    ProgramSource {
        vertex: vertex_stage(),
        fragment: fragment_stage(),
    }
}
