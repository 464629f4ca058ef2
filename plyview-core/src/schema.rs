/// PLY header model and the grammar of individual header lines
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map, map_res, rest, verify},
    sequence::{preceded, terminated, tuple},
    IResult,
};

/// Scalar type names accepted in `property` lines.
///
/// Width and signedness are not distinguished when decoding: the integer
/// types share one decode path, as do the two floating point types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }

    /// Decode one token. `None` when the token is not a number of this kind.
    pub fn decode(self, token: &str) -> Option<Value> {
        if self.is_integer() {
            token.parse::<i64>().ok().map(Value::Int)
        } else {
            token.parse::<f64>().ok().map(Value::Float)
        }
    }
}

impl FromStr for ScalarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" | "int8" => Ok(Self::Char),
            "uchar" | "uint8" => Ok(Self::UChar),
            "short" | "int16" => Ok(Self::Short),
            "ushort" | "uint16" => Ok(Self::UShort),
            "int" | "int32" => Ok(Self::Int),
            "uint" | "uint32" => Ok(Self::UInt),
            "float" | "float32" => Ok(Self::Float),
            "double" | "float64" => Ok(Self::Double),
            other => Err(format!("unknown scalar type `{other}`")),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Char => "char",
            Self::UChar => "uchar",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Double => "double",
        };
        f.write_str(name)
    }
}

/// A decoded body token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Non-negative integers only; usable as counts and vertex indices.
    pub fn as_index(self) -> Option<usize> {
        match self {
            Self::Int(i) => usize::try_from(i).ok(),
            Self::Float(_) => None,
        }
    }
}

/// One `property` line of an element declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyDecl {
    Scalar {
        name: String,
        ty: ScalarType,
    },
    List {
        name: String,
        index_type: ScalarType,
        element_type: ScalarType,
    },
}

impl PropertyDecl {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::List { name, .. } => name,
        }
    }
}

/// One `element` line and the properties declared under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTypeDecl {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDecl>,
}

impl ElementTypeDecl {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            properties: Vec::new(),
        }
    }
}

/// A recognized header line, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderLine<'a> {
    Comment(&'a str),
    Element {
        name: &'a str,
        count: usize,
    },
    PropertyList {
        index_type: &'a str,
        element_type: &'a str,
        name: &'a str,
    },
    Property {
        ty: &'a str,
        name: &'a str,
    },
    EndHeader,
}

impl<'a> HeaderLine<'a> {
    /// Match the line against the header productions in priority order.
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        all_consuming(alt((
            comment_line,
            element_line,
            property_list_line,
            property_line,
            end_header_line,
        )))(line)
        .ok()
        .map(|(_, parsed)| parsed)
    }
}

/// `format ascii 1.0`, whitespace tolerant.
pub(crate) fn is_ascii_format_line(line: &str) -> bool {
    let result: IResult<&str, _> = all_consuming(tuple((
        space0,
        tag("format"),
        space1,
        tag("ascii"),
        space1,
        tag("1.0"),
        space0,
    )))(line);
    result.is_ok()
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn comment_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    map(
        preceded(
            tag("comment"),
            verify(rest, |r: &str| {
                r.is_empty() || r.starts_with(char::is_whitespace)
            }),
        ),
        |text: &str| HeaderLine::Comment(text.trim()),
    )(input)
}

fn element_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    map(
        tuple((
            tag("element"),
            space1,
            word,
            space1,
            map_res(digit1, str::parse::<usize>),
            space0,
        )),
        |(_, _, name, _, count, _)| HeaderLine::Element { name, count },
    )(input)
}

fn property_list_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    map(
        tuple((
            tag("property"),
            space1,
            tag("list"),
            space1,
            word,
            space1,
            word,
            space1,
            terminated(word, space0),
        )),
        |(_, _, _, _, index_type, _, element_type, _, name)| HeaderLine::PropertyList {
            index_type,
            element_type,
            name,
        },
    )(input)
}

fn property_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    map(
        tuple((tag("property"), space1, word, space1, terminated(word, space0))),
        |(_, _, ty, _, name)| HeaderLine::Property { ty, name },
    )(input)
}

fn end_header_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    map(terminated(tag("end_header"), space0), |_| HeaderLine::EndHeader)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_productions() {
        assert_eq!(
            HeaderLine::parse("comment made by hand"),
            Some(HeaderLine::Comment("made by hand"))
        );
        assert_eq!(HeaderLine::parse("comment"), Some(HeaderLine::Comment("")));
        assert_eq!(
            HeaderLine::parse("element vertex 8"),
            Some(HeaderLine::Element {
                name: "vertex",
                count: 8
            })
        );
        assert_eq!(
            HeaderLine::parse("property list uchar int vertex_indices"),
            Some(HeaderLine::PropertyList {
                index_type: "uchar",
                element_type: "int",
                name: "vertex_indices"
            })
        );
        assert_eq!(
            HeaderLine::parse("property   float\tx"),
            Some(HeaderLine::Property {
                ty: "float",
                name: "x"
            })
        );
        assert_eq!(HeaderLine::parse("end_header"), Some(HeaderLine::EndHeader));
    }

    #[test]
    fn test_rejected_header_lines() {
        assert_eq!(HeaderLine::parse("commentary"), None);
        assert_eq!(HeaderLine::parse("element vertex"), None);
        assert_eq!(HeaderLine::parse("element vertex -1"), None);
        assert_eq!(HeaderLine::parse("property list uchar int"), None);
        assert_eq!(HeaderLine::parse("property float x y"), None);
        assert_eq!(HeaderLine::parse("obj_info scanner"), None);
        assert_eq!(HeaderLine::parse(""), None);
    }

    #[test]
    fn test_format_line() {
        assert!(is_ascii_format_line("format ascii 1.0"));
        assert!(is_ascii_format_line("format   ascii\t1.0  "));
        assert!(!is_ascii_format_line("format binary_little_endian 1.0"));
        assert!(!is_ascii_format_line("format ascii 2.0"));
    }

    #[test]
    fn test_scalar_type_decoding() {
        assert_eq!("uint8".parse::<ScalarType>(), Ok(ScalarType::UChar));
        assert!("list".parse::<ScalarType>().is_err());

        assert_eq!(ScalarType::Float.decode("1.5"), Some(Value::Float(1.5)));
        assert_eq!(ScalarType::Double.decode("-2"), Some(Value::Float(-2.0)));
        assert_eq!(ScalarType::Int.decode("-7"), Some(Value::Int(-7)));
        assert_eq!(ScalarType::UChar.decode("1.0"), None);
        assert_eq!(ScalarType::Float.decode("abc"), None);
    }

    #[test]
    fn test_value_as_index() {
        assert_eq!(Value::Int(4).as_index(), Some(4));
        assert_eq!(Value::Int(-1).as_index(), None);
        assert_eq!(Value::Float(2.0).as_index(), None);
        assert_eq!(Value::Int(3).as_f64(), 3.0);
    }
}
