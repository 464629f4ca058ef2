/// Error types for PLY loading, mesh drawing and transform algebra
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is fatal: a load either yields a complete mesh or one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// The first non-empty line is not the `ply` magic.
    #[error("line {line}: not a PLY file (expected `ply`, found `{found}`)")]
    NotAPlyFile { line: usize, found: String },

    /// The format line is anything other than `format ascii 1.0`.
    #[error("line {line}: unsupported PLY format `{found}` (only `format ascii 1.0` is supported)")]
    UnsupportedFormat { line: usize, found: String },

    #[error("line {line}: malformed header: {message}")]
    MalformedHeader { line: usize, message: String },

    #[error("line {line}: malformed record: {message}")]
    MalformedRecord { line: usize, message: String },

    /// An element type with no registered constructor.
    #[error("unrecognized element type `{name}`")]
    UnrecognizedElement { name: String },

    #[error("unrecognized property `{property}` on element `{element}`")]
    UnrecognizedProperty { element: String, property: String },

    #[error("line {line}: body has more records than the header declares")]
    TooManyBodyLines { line: usize },

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    #[error("face has {vertex_count} vertices, at least 3 are required")]
    DegenerateFace { vertex_count: usize },

    #[error("face references vertex {index} but the mesh has {vertex_count} vertices")]
    DanglingVertexIndex { index: usize, vertex_count: usize },

    #[error("dimension mismatch: {left} vs {right} components")]
    DimensionMismatch { left: usize, right: usize },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed_header(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn malformed_record(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}
