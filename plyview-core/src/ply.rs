//! ASCII PLY loader.
//!
//! The header is read into an ordered list of [`ElementTypeDecl`]s, each
//! resolved to an [`ElementLayout`] when `end_header` is reached; body
//! records are then decoded in file order against those layouts.
//!
//! ```
//! use plyview_core::ply::parse_ply;
//!
//! let mesh = parse_ply(
//!     "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\n\
//!      property float z\nelement face 1\nproperty list uchar int vertex_indices\n\
//!      end_header\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n",
//! )
//! .unwrap();
//! assert_eq!(mesh.vertices().len(), 3);
//! assert_eq!(mesh.faces()[0].vertex_indices(), &[0, 1, 2]);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, trace};

use crate::config::ParseOptions;
use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::record::ElementLayout;
use crate::schema::{is_ascii_format_line, ElementTypeDecl, HeaderLine, PropertyDecl, ScalarType};

/// Where the parser is in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for the `ply` magic.
    Init,
    Format,
    Header,
    Body,
    /// Every declared record has been read.
    Done,
}

/// Line-driven PLY parser.
///
/// Feed it lines in order with [`PlyParser::feed_line`] and collect the mesh
/// with [`PlyParser::finish`]. Any error is final; the parser should be
/// dropped afterwards.
#[derive(Debug)]
pub struct PlyParser {
    options: ParseOptions,
    state: ParserState,
    line: usize,
    elements: Vec<ElementTypeDecl>,
    layouts: Vec<ElementLayout>,
    /// Index of the element type whose records are being read.
    current: usize,
    /// Records consumed for the current element type.
    consumed: usize,
    mesh: Mesh,
}

impl PlyParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            state: ParserState::Init,
            line: 0,
            elements: Vec::new(),
            layouts: Vec::new(),
            current: 0,
            consumed: 0,
            mesh: Mesh::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Element declarations read so far, in header order.
    pub fn elements(&self) -> &[ElementTypeDecl] {
        &self.elements
    }

    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        self.line += 1;
        let line = raw.trim_end();

        match self.state {
            ParserState::Init => {
                if line.is_empty() {
                    return Ok(());
                }
                if line != "ply" {
                    return Err(Error::NotAPlyFile {
                        line: self.line,
                        found: line.to_string(),
                    });
                }
                self.state = ParserState::Format;
            }
            ParserState::Format => {
                if !is_ascii_format_line(line) {
                    return Err(Error::UnsupportedFormat {
                        line: self.line,
                        found: line.to_string(),
                    });
                }
                self.state = ParserState::Header;
            }
            ParserState::Header => self.header_line(line)?,
            ParserState::Body => {
                if line.trim_start().is_empty() {
                    return Ok(());
                }
                self.layouts[self.current].decode(line, self.line, &mut self.mesh)?;
                self.consumed += 1;
                self.advance();
            }
            ParserState::Done => {
                if !line.trim_start().is_empty() {
                    return Err(Error::TooManyBodyLines { line: self.line });
                }
            }
        }
        Ok(())
    }

    /// Finish the load. Fails if the input stopped before every declared
    /// record was read.
    pub fn finish(self) -> Result<Mesh> {
        let expected = match self.state {
            ParserState::Done => {
                info!(
                    vertices = self.mesh.vertices().len(),
                    faces = self.mesh.faces().len(),
                    "Loaded PLY mesh"
                );
                return Ok(self.mesh);
            }
            ParserState::Init => "the `ply` magic line".to_string(),
            ParserState::Format => "a `format` line".to_string(),
            ParserState::Header => "`end_header`".to_string(),
            ParserState::Body => {
                let element = &self.elements[self.current];
                let missing = element.count - self.consumed;
                format!("{missing} more `{}` record(s)", element.name)
            }
        };
        Err(Error::UnexpectedEndOfInput { expected })
    }

    fn header_line(&mut self, line: &str) -> Result<()> {
        let parsed = HeaderLine::parse(line.trim_start()).ok_or_else(|| {
            Error::malformed_header(self.line, format!("unrecognized header line `{line}`"))
        })?;

        match parsed {
            HeaderLine::Comment(text) => trace!(comment = text, "Discarding header comment"),
            HeaderLine::Element { name, count } => {
                debug!(element = name, count, "Declared element");
                self.elements.push(ElementTypeDecl::new(name, count));
            }
            HeaderLine::PropertyList {
                index_type,
                element_type,
                name,
            } => {
                let property = PropertyDecl::List {
                    name: name.to_string(),
                    index_type: self.scalar_type(index_type)?,
                    element_type: self.scalar_type(element_type)?,
                };
                self.push_property(property)?;
            }
            HeaderLine::Property { ty, name } => {
                let property = PropertyDecl::Scalar {
                    name: name.to_string(),
                    ty: self.scalar_type(ty)?,
                };
                self.push_property(property)?;
            }
            HeaderLine::EndHeader => self.end_header()?,
        }
        Ok(())
    }

    fn scalar_type(&self, name: &str) -> Result<ScalarType> {
        name.parse()
            .map_err(|message| Error::malformed_header(self.line, message))
    }

    fn push_property(&mut self, property: PropertyDecl) -> Result<()> {
        let line = self.line;
        let element = self.elements.last_mut().ok_or_else(|| {
            Error::malformed_header(
                line,
                format!("property `{}` declared before any element", property.name()),
            )
        })?;
        element.properties.push(property);
        Ok(())
    }

    fn end_header(&mut self) -> Result<()> {
        self.layouts = self
            .elements
            .iter()
            .map(|decl| ElementLayout::compile(decl, &self.options, self.line))
            .collect::<Result<_>>()?;
        debug!(
            elements = self.elements.len(),
            records = self.elements.iter().map(|e| e.count).sum::<usize>(),
            "Header complete"
        );
        self.state = ParserState::Body;
        self.advance();
        Ok(())
    }

    /// Move past every element type whose declared count is satisfied,
    /// including types declared with a count of zero.
    fn advance(&mut self) {
        while self.current < self.elements.len()
            && self.consumed >= self.elements[self.current].count
        {
            self.current += 1;
            self.consumed = 0;
        }
        if self.current == self.elements.len() {
            self.state = ParserState::Done;
        }
    }
}

impl Default for PlyParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Parse an ASCII PLY document with default options
pub fn parse_ply(input: &str) -> Result<Mesh> {
    parse_ply_with(input, &ParseOptions::default())
}

pub fn parse_ply_with(input: &str, options: &ParseOptions) -> Result<Mesh> {
    let mut parser = PlyParser::new(options.clone());
    for line in input.lines() {
        parser.feed_line(line)?;
    }
    parser.finish()
}

/// Parse from any buffered reader, one line at a time.
pub fn read_ply<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Mesh> {
    let mut parser = PlyParser::new(options.clone());
    for line in reader.lines() {
        parser.feed_line(&line?)?;
    }
    parser.finish()
}

/// Load a PLY file from disk.
///
/// # Errors
///
/// [`Error::FileNotFound`] when the path does not exist, otherwise any
/// header, record or I/O error encountered while reading.
pub fn load_ply<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    debug!(path = %path.display(), "Reading PLY file");
    read_ply(BufReader::new(file), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownPolicy;
    use nalgebra::Point3;

    const TRIANGLE: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
";

    #[test]
    fn test_parse_triangle() {
        let mesh = parse_ply(TRIANGLE).unwrap();
        let positions: Vec<_> = mesh.vertices().iter().map(|v| v.coords()).collect();
        assert_eq!(
            positions,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0)
            ]
        );
        assert!(mesh
            .vertices()
            .iter()
            .all(|v| v.has_coords() && !v.has_normal() && !v.has_tex_coords()));
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.faces()[0].vertex_indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_header_declarations_in_order() {
        let mut parser = PlyParser::default();
        for line in TRIANGLE.lines().take(9) {
            parser.feed_line(line).unwrap();
        }
        assert_eq!(parser.state(), ParserState::Body);

        let elements = parser.elements();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].name, "vertex");
        assert_eq!(elements[0].count, 3);
        let names: Vec<_> = elements[0].properties.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(
            elements[1].properties,
            vec![PropertyDecl::List {
                name: "vertex_indices".to_string(),
                index_type: ScalarType::UChar,
                element_type: ScalarType::Int,
            }]
        );
    }

    #[test]
    fn test_bad_magic() {
        let input = TRIANGLE.replacen("ply", "plyx", 1);
        assert!(matches!(
            parse_ply(&input),
            Err(Error::NotAPlyFile { line: 1, .. })
        ));
    }

    #[test]
    fn test_leading_blank_lines_before_magic() {
        let input = format!("\n\n{TRIANGLE}");
        assert_eq!(parse_ply(&input).unwrap().vertices().len(), 3);
    }

    #[test]
    fn test_binary_format_rejected() {
        let input = TRIANGLE.replace("format ascii 1.0", "format binary_little_endian 1.0");
        assert!(matches!(
            parse_ply(&input),
            Err(Error::UnsupportedFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_property_before_element() {
        let input = "ply\nformat ascii 1.0\nproperty float x\nelement vertex 0\nend_header\n";
        assert!(matches!(
            parse_ply(input),
            Err(Error::MalformedHeader { line: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_header_line() {
        let input = TRIANGLE.replace("element face 1", "element face 1\nobj_info scanner");
        assert!(matches!(
            parse_ply(&input),
            Err(Error::MalformedHeader { line: 8, .. })
        ));
    }

    #[test]
    fn test_unknown_scalar_type() {
        let input = TRIANGLE.replace("property float z", "property float128 z");
        assert!(matches!(
            parse_ply(&input),
            Err(Error::MalformedHeader { line: 6, .. })
        ));
    }

    #[test]
    fn test_comments_are_discarded() {
        let input = TRIANGLE.replace(
            "element vertex 3",
            "comment exported by hand\nelement vertex 3\ncomment\tsecond",
        );
        let mesh = parse_ply(&input).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
    }

    #[test]
    fn test_degenerate_face_rejected_at_parse_time() {
        let input = TRIANGLE.replace("3 0 1 2", "2 0 1");
        assert!(matches!(
            parse_ply(&input),
            Err(Error::DegenerateFace { vertex_count: 2 })
        ));
    }

    #[test]
    fn test_too_many_body_lines() {
        let input = format!("{TRIANGLE}3 2 1 0\n");
        assert!(matches!(
            parse_ply(&input),
            Err(Error::TooManyBodyLines { line: 14 })
        ));
    }

    #[test]
    fn test_trailing_blank_lines_are_ignored() {
        let input = format!("{TRIANGLE}\n   \n");
        assert_eq!(parse_ply(&input).unwrap().faces().len(), 1);
    }

    #[test]
    fn test_truncated_body() {
        let input: String = TRIANGLE.lines().take(11).map(|l| format!("{l}\n")).collect();
        let err = parse_ply(&input).unwrap_err();
        match err {
            Error::UnexpectedEndOfInput { expected } => {
                assert_eq!(expected, "1 more `vertex` record(s)")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_header() {
        let input: String = TRIANGLE.lines().take(5).map(|l| format!("{l}\n")).collect();
        assert!(matches!(
            parse_ply(&input),
            Err(Error::UnexpectedEndOfInput { .. })
        ));
        assert!(matches!(
            parse_ply(""),
            Err(Error::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn test_zero_count_elements_are_skipped() {
        let input = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element normals 0
property float q
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
";
        let options = ParseOptions::default().with_unknown_elements(UnknownPolicy::Skip);
        let mesh = parse_ply_with(input, &options).unwrap();
        assert_eq!(mesh.faces().len(), 1);

        let empty = "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nend_header\n";
        let mesh = parse_ply(empty).unwrap();
        assert!(mesh.vertices().is_empty());
    }

    #[test]
    fn test_skipped_element_records_are_consumed() {
        let input = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element edge 2
property int vertex1
property int vertex2
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
0 1
1 2
3 0 1 2
";
        let options = ParseOptions::default().with_unknown_elements(UnknownPolicy::Skip);
        let mesh = parse_ply_with(input, &options).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.faces()[0].vertex_indices(), &[0, 1, 2]);

        let truncated = input.replace("1 2\n3 0 1 2\n", "1 2\n");
        assert!(matches!(
            parse_ply_with(&truncated, &options),
            Err(Error::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn test_unrecognized_element_rejected_by_default() {
        let input = TRIANGLE.replace("element face 1", "element edge 1");
        assert!(matches!(
            parse_ply(&input),
            Err(Error::UnrecognizedElement { .. })
        ));
    }

    #[test]
    fn test_read_from_buffered_reader() {
        let mesh = read_ply(TRIANGLE.as_bytes(), &ParseOptions::default()).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = TRIANGLE.replace('\n', "\r\n");
        assert_eq!(parse_ply(&input).unwrap().faces().len(), 1);
    }
}
