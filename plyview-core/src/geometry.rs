/// Mesh data model: vertices, indexed faces and the draw contract
use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};

/// A mesh vertex. Each attribute group is present only once one of its
/// components has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: Option<Point3<f64>>,
    pub normal: Option<Vector3<f64>>,
    pub tex_coords: Option<Point2<f64>>,
}

impl Vertex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Some(Point3::new(x, y, z)),
            ..Self::default()
        }
    }

    pub fn with_normal(mut self, nx: f64, ny: f64, nz: f64) -> Self {
        self.normal = Some(Vector3::new(nx, ny, nz));
        self
    }

    pub fn with_tex_coords(mut self, s: f64, t: f64) -> Self {
        self.tex_coords = Some(Point2::new(s, t));
        self
    }

    pub fn set_x(&mut self, x: f64) {
        self.position.get_or_insert_with(Point3::origin).x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.position.get_or_insert_with(Point3::origin).y = y;
    }

    pub fn set_z(&mut self, z: f64) {
        self.position.get_or_insert_with(Point3::origin).z = z;
    }

    pub fn set_nx(&mut self, nx: f64) {
        self.normal.get_or_insert_with(Vector3::zeros).x = nx;
    }

    pub fn set_ny(&mut self, ny: f64) {
        self.normal.get_or_insert_with(Vector3::zeros).y = ny;
    }

    pub fn set_nz(&mut self, nz: f64) {
        self.normal.get_or_insert_with(Vector3::zeros).z = nz;
    }

    pub fn set_s(&mut self, s: f64) {
        self.tex_coords.get_or_insert_with(Point2::origin).x = s;
    }

    pub fn set_t(&mut self, t: f64) {
        self.tex_coords.get_or_insert_with(Point2::origin).y = t;
    }

    /// Position, or the origin when no coordinate was ever written.
    pub fn coords(&self) -> Point3<f64> {
        self.position.unwrap_or_else(Point3::origin)
    }

    pub fn has_coords(&self) -> bool {
        self.position.is_some()
    }

    pub fn has_normal(&self) -> bool {
        self.normal.is_some()
    }

    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }
}

/// A polygon given as indices into the owning mesh's vertex list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    vertex_indices: Vec<usize>,
}

impl Face {
    pub const MIN_VERTICES: usize = 3;

    /// Fails with [`Error::DegenerateFace`] for fewer than three indices.
    pub fn new(vertex_indices: Vec<usize>) -> Result<Self> {
        if vertex_indices.len() < Self::MIN_VERTICES {
            return Err(Error::DegenerateFace {
                vertex_count: vertex_indices.len(),
            });
        }
        Ok(Self { vertex_indices })
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_indices.len()
    }
}

/// Primitive batch kinds emitted by [`Mesh::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    Quads,
    /// A single polygon, always closed right after its face.
    Polygon,
}

impl DrawMode {
    pub fn for_vertex_count(count: usize) -> Result<Self> {
        match count {
            0..=2 => Err(Error::DegenerateFace {
                vertex_count: count,
            }),
            3 => Ok(Self::Triangles),
            4 => Ok(Self::Quads),
            _ => Ok(Self::Polygon),
        }
    }
}

/// Immediate-mode consumer of a mesh, in the shape of `glBegin`/`glEnd`.
pub trait DrawSink {
    fn begin(&mut self, mode: DrawMode);
    fn normal(&mut self, normal: Vector3<f64>);
    fn vertex(&mut self, position: Point3<f64>);
    fn end(&mut self);
}

/// An indexed polygon mesh. Vertex and face order is file order.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Check that every face index points into the vertex list.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for face in &self.faces {
            if let Some(&index) = face.vertex_indices().iter().find(|&&i| i >= vertex_count) {
                return Err(Error::DanglingVertexIndex {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Replay the faces into `sink` in stored order.
    ///
    /// Consecutive triangles share one batch, as do consecutive quads; every
    /// larger face gets its own polygon batch. A vertex's normal, when
    /// present, is emitted before its position. The mesh is validated first
    /// so the sink never sees a batch that is left open.
    pub fn draw<S: DrawSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.validate()?;

        let mut open: Option<DrawMode> = None;
        for face in &self.faces {
            let mode = DrawMode::for_vertex_count(face.vertex_count())?;
            if mode == DrawMode::Polygon || open != Some(mode) {
                if open.is_some() {
                    sink.end();
                }
                sink.begin(mode);
                open = Some(mode);
            }

            for &index in face.vertex_indices() {
                let vertex = &self.vertices[index];
                if let Some(normal) = vertex.normal {
                    sink.normal(normal);
                }
                sink.vertex(vertex.coords());
            }

            if mode == DrawMode::Polygon {
                sink.end();
                open = None;
            }
        }
        if open.is_some() {
            sink.end();
        }
        Ok(())
    }

    /// Create a simple indexed cube with per-vertex normals for demos.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::new();
        for &(x, y, z) in &[
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ] {
            let n = Vector3::new(x, y, z).normalize();
            mesh.add_vertex(Vertex::from_position(x, y, z).with_normal(n.x, n.y, n.z));
        }

        // Quads wound counter-clockwise seen from outside
        let quads: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // front
            [1, 0, 3, 2], // back
            [3, 7, 6, 2], // top
            [0, 1, 5, 4], // bottom
            [1, 2, 6, 5], // right
            [0, 4, 7, 3], // left
        ];
        for quad in quads {
            mesh.faces.push(Face {
                vertex_indices: quad.to_vec(),
            });
        }
        mesh
    }
}
