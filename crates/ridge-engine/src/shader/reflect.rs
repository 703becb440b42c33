use std::collections::HashMap;

use naga::{ArraySize, Handle, Module, ScalarKind, Type, TypeInner, VectorSize};

use super::interface;
use super::{BindingKind, MissingBindingError, Program};

/// Vertex input slot (`@location(n)`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// Uniform slot (`@group(g) @binding(b)`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
}

/// Element type of a reflected binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Int,
    Uint,
    Bool,
    /// Structs and anything else without a direct attribute/uniform upload path.
    Other,
}

impl ElementType {
    /// Number of scalar components, when the type is a float scalar or vector.
    pub fn float_components(self) -> Option<u8> {
        match self {
            Self::Float => Some(1),
            Self::Vec2 => Some(2),
            Self::Vec3 => Some(3),
            Self::Vec4 => Some(4),
            _ => None,
        }
    }
}

/// One active attribute or uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingInfo<L> {
    /// Position in reflection order. Not stable across shader edits; look up by name.
    pub index: usize,
    pub name: String,
    /// Array length, 1 for non-arrays.
    pub size: u32,
    pub element_type: ElementType,
    /// Size of the whole binding in bytes under the shader's layout rules.
    pub byte_size: u32,
    pub location: L,
}

/// Name-keyed bindings in reflection order.
///
/// Iteration follows insertion order; lookups by name are O(1).
#[derive(Debug, Clone)]
pub struct BindingMap<L> {
    kind: BindingKind,
    entries: Vec<BindingInfo<L>>,
    by_name: HashMap<String, usize>,
}

impl<L> BindingMap<L> {
    fn new(kind: BindingKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Inserts `info` unless its name is already present.
    fn insert(&mut self, info: BindingInfo<L>) -> bool {
        if self.by_name.contains_key(&info.name) {
            return false;
        }
        self.by_name.insert(info.name.clone(), self.entries.len());
        self.entries.push(info);
        true
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&BindingInfo<L>> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Like [`get`](Self::get) but reports a missing name as a configuration error.
    pub fn require(&self, name: &str) -> Result<&BindingInfo<L>, MissingBindingError> {
        self.get(name).ok_or_else(|| MissingBindingError {
            kind: self.kind,
            name: name.to_owned(),
        })
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindingInfo<L>> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

/// The lookup surface the frame loop uses. Built once per program.
#[derive(Debug, Clone)]
pub struct ProgramLocations {
    pub attributes: BindingMap<AttributeLocation>,
    pub uniforms: BindingMap<UniformLocation>,
}

/// Reflects the active attributes and uniforms of a linked program.
///
/// Attributes are the vertex entry point's `@location` inputs. Uniforms are
/// `var<uniform>` globals read by either entry point, vertex stage first.
pub fn reflect(program: &Program) -> ProgramLocations {
    let vertex = program.vertex();

    let mut attributes = BindingMap::new(BindingKind::Attribute);
    for var in interface::inputs(vertex).locations {
        let (element_type, size, byte_size) = describe(vertex.module(), var.ty);
        let index = attributes.len();
        attributes.insert(BindingInfo {
            index,
            name: var.name,
            size,
            element_type,
            byte_size,
            location: AttributeLocation(var.location),
        });
    }

    let mut uniforms = BindingMap::new(BindingKind::Uniform);
    for stage in [program.vertex(), program.fragment()] {
        for var in interface::active_uniforms(stage) {
            let (element_type, size, byte_size) = describe(stage.module(), var.ty);
            let index = uniforms.len();
            // Shared uniforms were checked for agreement at link time.
            uniforms.insert(BindingInfo {
                index,
                name: var.name,
                size,
                element_type,
                byte_size,
                location: UniformLocation {
                    group: var.group,
                    binding: var.binding,
                },
            });
        }
    }

    log::debug!(
        "reflected attributes [{}], uniforms [{}]",
        attributes.names().collect::<Vec<_>>().join(", "),
        uniforms.names().collect::<Vec<_>>().join(", "),
    );

    ProgramLocations { attributes, uniforms }
}

fn describe(module: &Module, ty: Handle<Type>) -> (ElementType, u32, u32) {
    let inner = &module.types[ty].inner;
    let byte_size = inner.size(module.to_ctx());
    match *inner {
        TypeInner::Array { base, size, .. } => {
            let len = match size {
                ArraySize::Constant(n) => n.get(),
                _ => 1,
            };
            (element_type(&module.types[base].inner), len, byte_size)
        }
        _ => (element_type(inner), 1, byte_size),
    }
}

fn element_type(inner: &TypeInner) -> ElementType {
    match *inner {
        TypeInner::Scalar(scalar) => match scalar.kind {
            ScalarKind::Float => ElementType::Float,
            ScalarKind::Sint => ElementType::Int,
            ScalarKind::Uint => ElementType::Uint,
            ScalarKind::Bool => ElementType::Bool,
            _ => ElementType::Other,
        },
        TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float => match size {
            VectorSize::Bi => ElementType::Vec2,
            VectorSize::Tri => ElementType::Vec3,
            VectorSize::Quad => ElementType::Vec4,
        },
        TypeInner::Matrix {
            columns: VectorSize::Tri,
            rows: VectorSize::Tri,
            ..
        } => ElementType::Mat3,
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            ..
        } => ElementType::Mat4,
        _ => ElementType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::compile_and_link;

    const VERTEX: &str = r#"
@group(0) @binding(0) var<uniform> u_modelViewProjection: mat4x4<f32>;
@group(0) @binding(1) var<uniform> u_time: f32;
@group(0) @binding(2) var<uniform> u_stretch: f32;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) v_position: vec3<f32>,
};

@vertex
fn vs_main(@location(0) a_position: vec3<f32>) -> VertexOutput {
    let lifted = vec3<f32>(a_position.x, sin(u_time), a_position.z);
    var out: VertexOutput;
    out.clip_position = u_modelViewProjection * vec4<f32>(lifted, 1.0);
    out.v_position = lifted;
    return out;
}
"#;

    const FRAGMENT: &str = r#"
struct FragmentInput {
    @location(0) v_position: vec3<f32>,
};

@fragment
fn fs_main(in: FragmentInput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.v_position, 1.0);
}
"#;

    fn locations() -> ProgramLocations {
        reflect(&compile_and_link(VERTEX, FRAGMENT).expect("test program links"))
    }

    #[test]
    fn attributes_are_exactly_the_vertex_inputs() {
        let locs = locations();
        assert_eq!(locs.attributes.names().collect::<Vec<_>>(), ["a_position"]);

        let a = locs.attributes.get("a_position").unwrap();
        assert_eq!(a.location, AttributeLocation(0));
        assert_eq!(a.element_type, ElementType::Vec3);
        assert_eq!(a.size, 1);
        assert_eq!(a.byte_size, 12);
    }

    #[test]
    fn uniforms_are_exactly_the_active_ones() {
        let locs = locations();
        let mut names: Vec<_> = locs.uniforms.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["u_modelViewProjection", "u_time"]);
        assert!(!locs.uniforms.contains("u_stretch"));
    }

    #[test]
    fn uniform_details() {
        let locs = locations();

        let mvp = locs.uniforms.get("u_modelViewProjection").unwrap();
        assert_eq!(mvp.element_type, ElementType::Mat4);
        assert_eq!(mvp.byte_size, 64);
        assert_eq!(mvp.location, UniformLocation { group: 0, binding: 0 });

        let time = locs.uniforms.get("u_time").unwrap();
        assert_eq!(time.element_type, ElementType::Float);
        assert_eq!(time.location, UniformLocation { group: 0, binding: 1 });
    }

    #[test]
    fn indices_follow_insertion_order() {
        let locs = locations();
        for (i, info) in locs.uniforms.iter().enumerate() {
            assert_eq!(info.index, i);
        }
    }

    #[test]
    fn require_reports_missing_names() {
        let locs = locations();
        assert!(locs.attributes.require("a_position").is_ok());

        let err = locs.uniforms.require("u_stretch").unwrap_err();
        assert_eq!(err.kind, BindingKind::Uniform);
        assert_eq!(err.name, "u_stretch");

        let err = locs.attributes.require("a_normal").unwrap_err();
        assert_eq!(err.kind, BindingKind::Attribute);
    }

    #[test]
    fn uniforms_shared_between_stages_appear_once() {
        let fragment = r#"
@group(0) @binding(1) var<uniform> u_time: f32;

@fragment
fn fs_main(@location(0) v_position: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_position * u_time, 1.0);
}
"#;
        let locs = reflect(&compile_and_link(VERTEX, fragment).unwrap());
        assert_eq!(locs.uniforms.len(), 2);
    }
}
