//! Shader programs: compile, link, reflect.
//!
//! Stages are WGSL, parsed and validated by naga. Everything here operates on
//! naga IR and needs no GPU; [`crate::render::GpuProgram`] turns a linked
//! [`Program`] into wgpu objects.
//!
//! Setup order:
//! - [`compile_and_link`] the vertex and fragment sources
//! - [`reflect`] the program once into [`ProgramLocations`]
//! - resolve the names the frame loop needs with [`BindingMap::require`]

mod error;
mod interface;
mod program;
mod reflect;
mod stage;

pub use error::{
    BindingKind, MissingBindingError, ProgramLinkError, ShaderCompileError, ShaderError,
};
pub use program::{compile_and_link, link_program, Program};
pub use reflect::{
    reflect, AttributeLocation, BindingInfo, BindingMap, ElementType, ProgramLocations,
    UniformLocation,
};
pub use stage::{compile_stage, ShaderStage, StageKind};
