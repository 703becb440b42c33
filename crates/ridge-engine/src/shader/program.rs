use super::interface::{self, StageInterface};
use super::{compile_stage, ProgramLinkError, ShaderError, ShaderStage, StageKind};

/// A linked vertex + fragment pair with a verified inter-stage interface.
///
/// GPU objects are created from a `Program` by
/// [`GpuProgram`](crate::render::GpuProgram); the `Program` itself is
/// backend-independent.
#[derive(Debug)]
pub struct Program {
    vertex: ShaderStage,
    fragment: ShaderStage,
}

impl Program {
    pub fn vertex(&self) -> &ShaderStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &ShaderStage {
        &self.fragment
    }
}

/// Links two compiled stages.
///
/// Every detected problem is reported, one per line of the error log.
pub fn link_program(
    vertex: ShaderStage,
    fragment: ShaderStage,
) -> Result<Program, ProgramLinkError> {
    let mut problems = Vec::new();

    if vertex.kind() != StageKind::Vertex {
        problems.push(format!("expected a vertex stage, got a {} stage", vertex.kind()));
    }
    if fragment.kind() != StageKind::Fragment {
        problems.push(format!(
            "expected a fragment stage, got a {} stage",
            fragment.kind()
        ));
    }
    if !problems.is_empty() {
        return Err(ProgramLinkError { log: problems.join("\n") });
    }

    let outputs = interface::outputs(&vertex);
    let inputs = interface::inputs(&fragment);
    check_varyings(&vertex, &outputs, &fragment, &inputs, &mut problems);
    check_shared_uniforms(&vertex, &fragment, &mut problems);

    if !problems.is_empty() {
        return Err(ProgramLinkError { log: problems.join("\n") });
    }

    log::debug!(
        "linked program `{}` + `{}`",
        vertex.entry_point(),
        fragment.entry_point()
    );

    Ok(Program { vertex, fragment })
}

/// Compiles both stages and links them.
///
/// This is the only entry point setup code needs.
pub fn compile_and_link(
    vertex_source: &str,
    fragment_source: &str,
) -> Result<Program, ShaderError> {
    let vertex = compile_stage(StageKind::Vertex, vertex_source)?;
    let fragment = compile_stage(StageKind::Fragment, fragment_source)?;
    Ok(link_program(vertex, fragment)?)
}

fn check_varyings(
    vertex: &ShaderStage,
    outputs: &StageInterface,
    fragment: &ShaderStage,
    inputs: &StageInterface,
    problems: &mut Vec<String>,
) {
    for input in &inputs.locations {
        match outputs.at_location(input.location) {
            None => problems.push(format!(
                "fragment input `{}` at location {} has no matching vertex output",
                input.name, input.location
            )),
            Some(output)
                if !interface::same_type(
                    vertex.module(),
                    output.ty,
                    fragment.module(),
                    input.ty,
                ) =>
            {
                problems.push(format!(
                    "fragment input `{}` at location {} does not match the type of vertex output `{}`",
                    input.name, input.location, output.name
                ))
            }
            Some(_) => {}
        }
    }
}

fn check_shared_uniforms(vertex: &ShaderStage, fragment: &ShaderStage, problems: &mut Vec<String>) {
    let vs_uniforms = interface::active_uniforms(vertex);
    let fs_uniforms = interface::active_uniforms(fragment);

    for fs in &fs_uniforms {
        for vs in &vs_uniforms {
            let same_slot = vs.group == fs.group && vs.binding == fs.binding;
            if same_slot && vs.name != fs.name {
                problems.push(format!(
                    "uniforms `{}` and `{}` both bind @group({}) @binding({})",
                    vs.name, fs.name, fs.group, fs.binding
                ));
            } else if same_slot
                && !interface::same_type(vertex.module(), vs.ty, fragment.module(), fs.ty)
            {
                problems.push(format!(
                    "uniform `{}` is declared with different types in the two stages",
                    fs.name
                ));
            } else if !same_slot && vs.name == fs.name {
                problems.push(format!(
                    "uniform `{}` is bound at @group({}) @binding({}) in the vertex stage but @group({}) @binding({}) in the fragment stage",
                    fs.name, vs.group, vs.binding, fs.group, fs.binding
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
@group(0) @binding(0) var<uniform> u_scale: f32;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) v_color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) a_position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(a_position * u_scale, 1.0);
    out.v_color = a_position;
    return out;
}
"#;

    const FRAGMENT: &str = r#"
@fragment
fn fs_main(@location(0) v_color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_color, 1.0);
}
"#;

    #[test]
    fn links_matching_stages() {
        let program = compile_and_link(VERTEX, FRAGMENT).expect("stages match");
        assert_eq!(program.vertex().entry_point(), "vs_main");
        assert_eq!(program.fragment().entry_point(), "fs_main");
    }

    #[test]
    fn compile_failure_surfaces_as_shader_error() {
        let err = compile_and_link("not wgsl at all", FRAGMENT).unwrap_err();
        match err {
            ShaderError::Compile(e) => {
                assert_eq!(e.stage, StageKind::Vertex);
                assert!(!e.log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn missing_varying_fails_link() {
        let fragment = r#"
@fragment
fn fs_main(@location(1) v_normal: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_normal, 1.0);
}
"#;
        let err = compile_and_link(VERTEX, fragment).unwrap_err();
        let ShaderError::Link(e) = err else { panic!("expected link error") };
        assert!(e.log.contains("`v_normal` at location 1"));
    }

    #[test]
    fn varying_type_mismatch_fails_link() {
        let fragment = r#"
@fragment
fn fs_main(@location(0) v_color: vec4<f32>) -> @location(0) vec4<f32> {
    return v_color;
}
"#;
        let err = compile_and_link(VERTEX, fragment).unwrap_err();
        let ShaderError::Link(e) = err else { panic!("expected link error") };
        assert!(e.log.contains("does not match the type"));
    }

    #[test]
    fn vertex_without_position_is_rejected_at_compile() {
        let vertex = r#"
@vertex
fn vs_main(@location(0) a_position: vec3<f32>) -> @location(0) vec3<f32> {
    return a_position;
}
"#;
        let err = compile_and_link(vertex, FRAGMENT).unwrap_err();
        let ShaderError::Compile(e) = err else { panic!("expected compile error") };
        assert_eq!(e.stage, StageKind::Vertex);
        assert!(e.log.contains("builtin(position)"));
    }

    #[test]
    fn link_reports_every_interface_problem() {
        let fragment = r#"
@group(0) @binding(0) var<uniform> u_tint: vec3<f32>;

@fragment
fn fs_main(@location(1) v_normal: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_normal * u_tint, 1.0);
}
"#;
        let err = compile_and_link(VERTEX, fragment).unwrap_err();
        let ShaderError::Link(e) = err else { panic!("expected link error") };
        assert_eq!(e.log.lines().count(), 2);
        assert!(e.log.contains("`v_normal` at location 1"));
        assert!(e.log.contains("`u_scale` and `u_tint`"));
    }

    #[test]
    fn conflicting_uniform_slot_fails_link() {
        let fragment = r#"
@group(0) @binding(0) var<uniform> u_tint: vec3<f32>;

@fragment
fn fs_main(@location(0) v_color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_color * u_tint, 1.0);
}
"#;
        let err = compile_and_link(VERTEX, fragment).unwrap_err();
        let ShaderError::Link(e) = err else { panic!("expected link error") };
        assert!(e.log.contains("`u_scale` and `u_tint`"));
    }

    #[test]
    fn swapped_stages_fail_link() {
        let vertex = compile_stage(StageKind::Vertex, VERTEX).unwrap();
        let fragment = compile_stage(StageKind::Fragment, FRAGMENT).unwrap();
        let err = link_program(fragment, vertex).unwrap_err();
        assert_eq!(err.log.lines().count(), 2);
    }
}
