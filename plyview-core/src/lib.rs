//! PLYView Core Library - mesh loading and transform algebra
//!
//! This library provides the stateless core of the viewer: the ASCII PLY
//! loader, the indexed mesh model with its draw contract, 4-component
//! vector and 4x4 matrix algebra, and the camera context built on them.

pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod ply;
pub mod projection;
pub mod record;
pub mod schema;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use config::{CameraConfig, ParseOptions, UnknownPolicy, ViewerConfig};
pub use context::{CameraCommand, ViewerContext};
pub use error::{Error, Result};
pub use geometry::{DrawMode, DrawSink, Face, Mesh, Vertex};
pub use matrix::Matrix4x4;
pub use ply::{load_ply, parse_ply, parse_ply_with, read_ply, ParserState, PlyParser};
pub use projection::Camera;
pub use transform::Transform;
pub use vector::{approx_eq, dot, proj, Vector4d, EPSILON};
