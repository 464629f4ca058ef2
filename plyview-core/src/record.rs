/// Decoding of body records against a compiled element layout
use std::str::SplitWhitespace;

use tracing::warn;

use crate::config::{ParseOptions, UnknownPolicy};
use crate::error::{Error, Result};
use crate::geometry::{Face, Mesh, Vertex};
use crate::schema::{ElementTypeDecl, PropertyDecl, ScalarType, Value};

/// Scalar setters a `vertex` record can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexField {
    X,
    Y,
    Z,
    Nx,
    Ny,
    Nz,
    S,
    T,
}

impl VertexField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            "nx" => Some(Self::Nx),
            "ny" => Some(Self::Ny),
            "nz" => Some(Self::Nz),
            "s" => Some(Self::S),
            "t" => Some(Self::T),
            _ => None,
        }
    }

    pub fn apply(self, vertex: &mut Vertex, value: f64) {
        match self {
            Self::X => vertex.set_x(value),
            Self::Y => vertex.set_y(value),
            Self::Z => vertex.set_z(value),
            Self::Nx => vertex.set_nx(value),
            Self::Ny => vertex.set_ny(value),
            Self::Nz => vertex.set_nz(value),
            Self::S => vertex.set_s(value),
            Self::T => vertex.set_t(value),
        }
    }
}

/// List setters a `face` record can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceField {
    VertexIndices,
}

impl FaceField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vertex_indices" => Some(Self::VertexIndices),
            _ => None,
        }
    }
}

/// A declared property paired with the setter it resolved to, if any.
#[derive(Debug, Clone)]
pub struct Binding<F> {
    pub property: PropertyDecl,
    pub field: Option<F>,
}

/// An element type with every property resolved to a setter, built once
/// when the header ends.
#[derive(Debug, Clone)]
pub enum ElementLayout {
    Vertex(Vec<Binding<VertexField>>),
    Face(Vec<Binding<FaceField>>),
    /// An unrecognized element whose records are decoded and dropped.
    Skipped(Vec<PropertyDecl>),
}

impl ElementLayout {
    pub fn compile(decl: &ElementTypeDecl, options: &ParseOptions, line: usize) -> Result<Self> {
        match decl.name.as_str() {
            "vertex" => {
                let bindings = bind(decl, options, line, VertexField::from_name, |p| {
                    matches!(p, PropertyDecl::Scalar { .. })
                })?;
                Ok(Self::Vertex(bindings))
            }
            "face" => {
                let bindings = bind(decl, options, line, FaceField::from_name, |p| {
                    matches!(p, PropertyDecl::List { .. })
                })?;
                Ok(Self::Face(bindings))
            }
            other => match options.unknown_elements {
                UnknownPolicy::Reject => Err(Error::UnrecognizedElement {
                    name: other.to_string(),
                }),
                UnknownPolicy::Skip => {
                    warn!(element = other, count = decl.count, "Skipping unrecognized element");
                    Ok(Self::Skipped(decl.properties.clone()))
                }
            },
        }
    }

    /// Decode one record and append the resulting object to `mesh`.
    ///
    /// Nothing is appended unless the whole record decodes.
    pub fn decode(&self, record: &str, line: usize, mesh: &mut Mesh) -> Result<()> {
        let mut tokens = Tokens::new(record, line);
        match self {
            Self::Vertex(bindings) => {
                let mut vertex = Vertex::new();
                for binding in bindings {
                    match (&binding.property, binding.field) {
                        (PropertyDecl::Scalar { ty, .. }, field) => {
                            let value = tokens.scalar(*ty)?;
                            if let Some(field) = field {
                                field.apply(&mut vertex, value.as_f64());
                            }
                        }
                        (list, _) => tokens.skip(list)?,
                    }
                }
                mesh.add_vertex(vertex);
            }
            Self::Face(bindings) => {
                let mut indices = Vec::new();
                for binding in bindings {
                    match (&binding.property, binding.field) {
                        (list @ PropertyDecl::List { .. }, Some(FaceField::VertexIndices)) => {
                            indices = tokens
                                .values(list)?
                                .into_iter()
                                .map(|v| {
                                    v.as_index().ok_or_else(|| {
                                        Error::malformed_record(
                                            line,
                                            format!("invalid vertex index {v:?}"),
                                        )
                                    })
                                })
                                .collect::<Result<Vec<_>>>()?;
                        }
                        (property, _) => tokens.skip(property)?,
                    }
                }
                mesh.add_face(Face::new(indices)?);
            }
            Self::Skipped(properties) => {
                for property in properties {
                    tokens.skip(property)?;
                }
            }
        }
        Ok(())
    }
}

fn bind<F>(
    decl: &ElementTypeDecl,
    options: &ParseOptions,
    line: usize,
    resolve: impl Fn(&str) -> Option<F>,
    fits: impl Fn(&PropertyDecl) -> bool,
) -> Result<Vec<Binding<F>>> {
    decl.properties
        .iter()
        .map(|property| {
            let field = match resolve(property.name()) {
                Some(field) if fits(property) => Some(field),
                Some(_) => {
                    return Err(Error::malformed_header(
                        line,
                        format!(
                            "property `{}` of `{}` has the wrong shape (scalar vs list)",
                            property.name(),
                            decl.name
                        ),
                    ))
                }
                None => match options.unknown_properties {
                    UnknownPolicy::Reject => {
                        return Err(Error::UnrecognizedProperty {
                            element: decl.name.clone(),
                            property: property.name().to_string(),
                        })
                    }
                    UnknownPolicy::Skip => {
                        warn!(
                            element = %decl.name,
                            property = property.name(),
                            "Skipping unrecognized property"
                        );
                        None
                    }
                },
            };
            Ok(Binding {
                property: property.clone(),
                field,
            })
        })
        .collect()
}

/// Whitespace token cursor over one record.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(record: &'a str, line: usize) -> Self {
        Self {
            inner: record.split_whitespace(),
            line,
        }
    }

    fn scalar(&mut self, ty: ScalarType) -> Result<Value> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| Error::malformed_record(self.line, "record has too few values"))?;
        ty.decode(token).ok_or_else(|| {
            Error::malformed_record(self.line, format!("`{token}` is not a valid {ty}"))
        })
    }

    /// Decode the tokens of one property: a single scalar, or a count
    /// followed by that many elements.
    fn values(&mut self, property: &PropertyDecl) -> Result<Vec<Value>> {
        match property {
            PropertyDecl::Scalar { ty, .. } => Ok(vec![self.scalar(*ty)?]),
            PropertyDecl::List {
                index_type,
                element_type,
                ..
            } => {
                let count = self.scalar(*index_type)?.as_index().ok_or_else(|| {
                    Error::malformed_record(self.line, "list length must be a non-negative integer")
                })?;
                (0..count).map(|_| self.scalar(*element_type)).collect()
            }
        }
    }

    fn skip(&mut self, property: &PropertyDecl) -> Result<()> {
        self.values(property).map(drop)
    }
}
