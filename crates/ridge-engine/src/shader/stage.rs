use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::ShaderCompileError;

/// Pipeline phase a stage is compiled for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// One compiled shader stage.
///
/// Holds the source (wgpu recompiles from it when the pipeline is built) and
/// the validated naga IR the linker and reflector inspect. A `ShaderStage`
/// only exists for source that parsed, validated, and declared an entry point
/// of its kind.
pub struct ShaderStage {
    kind: StageKind,
    source: String,
    module: naga::Module,
    info: naga::valid::ModuleInfo,
    entry_index: usize,
}

impl ShaderStage {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the entry point used for this stage.
    pub fn entry_point(&self) -> &str {
        &self.entry().name
    }

    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    pub(crate) fn entry_info(&self) -> &naga::valid::FunctionInfo {
        self.info.get_entry_point(self.entry_index)
    }
}

impl fmt::Debug for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderStage")
            .field("kind", &self.kind)
            .field("entry_point", &self.entry_point())
            .finish_non_exhaustive()
    }
}

/// Compiles one WGSL stage.
///
/// The first entry point matching `kind` is selected.
pub fn compile_stage(kind: StageKind, source: &str) -> Result<ShaderStage, ShaderCompileError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderCompileError {
        stage: kind,
        log: e.emit_to_string(source),
    })?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| ShaderCompileError {
            stage: kind,
            log: e.emit_to_string(source),
        })?;

    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == kind.to_naga())
        .ok_or_else(|| ShaderCompileError {
            stage: kind,
            log: format!("no @{kind} entry point declared"),
        })?;

    log::debug!(
        "compiled {kind} stage `{}`",
        module.entry_points[entry_index].name
    );

    Ok(ShaderStage {
        kind,
        source: source.to_owned(),
        module,
        info,
        entry_index,
    })
}
