use std::fmt;

use super::StageKind;

/// A shader stage failed to parse, validate, or lacked an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCompileError {
    pub stage: StageKind,
    /// Human-readable diagnostic rendered against the stage source.
    pub log: String,
}

impl fmt::Display for ShaderCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader failed to compile:\n{}", self.stage, self.log)
    }
}

impl std::error::Error for ShaderCompileError {}

/// Two compiled stages could not be combined into a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLinkError {
    /// One problem per line.
    pub log: String,
}

impl fmt::Display for ProgramLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program failed to link:\n{}", self.log)
    }
}

impl std::error::Error for ProgramLinkError {}

/// Error returned by [`compile_and_link`](super::compile_and_link).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    Compile(ShaderCompileError),
    Link(ProgramLinkError),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile(e) => e.fmt(f),
            Self::Link(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile(e) => Some(e),
            Self::Link(e) => Some(e),
        }
    }
}

impl From<ShaderCompileError> for ShaderError {
    fn from(e: ShaderCompileError) -> Self {
        Self::Compile(e)
    }
}

impl From<ProgramLinkError> for ShaderError {
    fn from(e: ProgramLinkError) -> Self {
        Self::Link(e)
    }
}

/// Which reflection namespace a lookup was made in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindingKind {
    Attribute,
    Uniform,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => f.write_str("attribute"),
            Self::Uniform => f.write_str("uniform"),
        }
    }
}

/// A name the caller relies on is not an active binding of the program.
///
/// This is a mismatch between shader source and the code driving it, not a
/// reflection failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingBindingError {
    pub kind: BindingKind,
    pub name: String,
}

impl fmt::Display for MissingBindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} `{}` is not an active binding of the program",
            self.kind, self.name
        )
    }
}

impl std::error::Error for MissingBindingError {}
