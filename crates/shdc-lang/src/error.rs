//! Error types shared by every stage of the shader library compiler.

use alloc::string::String;
use core::fmt;

use crate::sourceloc::SourceLoc;

/// Result type for shader library operations.
pub type ShdcResult<T> = Result<T, ShdcError>;

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Directive grammar violation or illegal comment nesting
    Syntax,
    /// Duplicate or unknown names, illegal nesting, unterminated sections, unresolved includes
    Structural,
    /// Uniform or input type not legal in its context
    Type,
    /// Vertex outputs don't line up with fragment inputs
    InterfaceMismatch,
    /// No reflection record for a shader in a requested variant
    ReflectionMissing,
    /// Reflection record present but unusable
    Reflection,
    /// External shader compiler failed or is unavailable
    Compile,
    /// Reading sources or writing artifacts failed
    Io,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Structural => "structural",
            ErrorKind::Type => "type",
            ErrorKind::InterfaceMismatch => "interface mismatch",
            ErrorKind::ReflectionMissing => "missing reflection",
            ErrorKind::Reflection => "reflection",
            ErrorKind::Compile => "compile",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error raised anywhere between parsing and artifact output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShdcError {
    pub kind: ErrorKind,
    pub message: String,
    pub loc: Option<SourceLoc>,
}

impl ShdcError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ShdcError {
            kind,
            message: message.into(),
            loc: None,
        }
    }

    /// Create a new syntax error.
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, msg)
    }

    /// Create a new structural error.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural, msg)
    }

    /// Create a new type error.
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, msg)
    }

    /// Create a new interface mismatch error.
    pub fn interface_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InterfaceMismatch, msg)
    }

    /// Create a new missing-reflection error.
    pub fn reflection_missing(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReflectionMissing, msg)
    }

    /// Create a new malformed-reflection error.
    pub fn reflection(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reflection, msg)
    }

    /// Create a new compile error.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Compile, msg)
    }

    /// Create a new io error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg)
    }

    /// Attach a source location.
    pub fn at(mut self, loc: SourceLoc) -> Self {
        self.loc = Some(loc);
        self
    }
}

impl fmt::Display for ShdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loc {
            Some(loc) => write!(f, "{}: {} error: {}", loc, self.kind, self.message),
            None => write!(f, "{} error: {}", self.kind, self.message),
        }
    }
}

impl core::error::Error for ShdcError {}

impl From<fmt::Error> for ShdcError {
    fn from(_: fmt::Error) -> Self {
        ShdcError::io("formatting generated text failed")
    }
}
