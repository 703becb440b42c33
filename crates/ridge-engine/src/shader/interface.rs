//! Stage interface extraction from naga IR.
//!
//! Shared by the linker (inter-stage matching) and the reflector (name maps).

use naga::{AddressSpace, Binding, Handle, Module, Type, TypeInner};

use super::ShaderStage;

/// A user-defined `@location` input or output.
#[derive(Debug, Clone)]
pub(crate) struct LocationVar {
    pub name: String,
    pub location: u32,
    pub ty: Handle<Type>,
}

/// The user-defined values crossing one side of a stage boundary.
///
/// Builtins are skipped; naga validation already requires the vertex
/// stage to write `@builtin(position)`.
#[derive(Debug, Default)]
pub(crate) struct StageInterface {
    /// In declaration order; struct members are flattened.
    pub locations: Vec<LocationVar>,
}

impl StageInterface {
    pub fn at_location(&self, location: u32) -> Option<&LocationVar> {
        self.locations.iter().find(|v| v.location == location)
    }
}

/// A `var<uniform>` global statically used by the stage's entry point.
#[derive(Debug, Clone)]
pub(crate) struct UniformVar {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub ty: Handle<Type>,
}

/// Entry-point arguments of `stage`.
pub(crate) fn inputs(stage: &ShaderStage) -> StageInterface {
    let module = stage.module();
    let mut out = StageInterface::default();
    for arg in &stage.entry().function.arguments {
        collect(module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

/// Entry-point result of `stage`.
pub(crate) fn outputs(stage: &ShaderStage) -> StageInterface {
    let module = stage.module();
    let mut out = StageInterface::default();
    if let Some(result) = &stage.entry().function.result {
        collect(module, None, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn collect(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut StageInterface,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.locations.push(LocationVar {
            name: name.unwrap_or_default().to_owned(),
            location: *location,
            ty,
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect(
                        module,
                        member.name.as_deref(),
                        member.ty,
                        member.binding.as_ref(),
                        out,
                    );
                }
            }
        }
    }
}

/// Uniform globals the entry point of `stage` actually reads.
///
/// Declared-but-unused uniforms are not active and are skipped.
pub(crate) fn active_uniforms(stage: &ShaderStage) -> Vec<UniformVar> {
    let usage = stage.entry_info();
    stage
        .module()
        .global_variables
        .iter()
        .filter(|(handle, var)| var.space == AddressSpace::Uniform && !usage[*handle].is_empty())
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            Some(UniformVar {
                name: var.name.clone().unwrap_or_default(),
                group: binding.group,
                binding: binding.binding,
                ty: var.ty,
            })
        })
        .collect()
}

/// Structural type equality across two modules.
///
/// Only meaningful for handle-free types (scalars, vectors, matrices), which
/// is all that may cross a stage boundary or be compared between uniforms.
pub(crate) fn same_type(a: &Module, a_ty: Handle<Type>, b: &Module, b_ty: Handle<Type>) -> bool {
    a.types[a_ty].inner == b.types[b_ty].inner
}
