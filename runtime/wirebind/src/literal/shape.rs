use std::fmt;

/// The classification of a destination field, as seen by the [`LiteralStore`].
///
/// Every type that implements [`Field`] reports its shape via [`Field::shape`].
/// Shapes are collected into a record's [`Schema`] once per type.
///
/// [`LiteralStore`]: super::LiteralStore
/// [`Field`]: super::Field
/// [`Field::shape`]: super::Field::shape
/// [`Schema`]: crate::record::Schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Shape {
    /// A UTF-8 string, stored verbatim.
    String,
    /// `true` or `false`.
    Boolean,
    /// A signed integer with the given bit width.
    SignedInteger {
        /// Bit width of the destination.
        bits: u32,
    },
    /// An unsigned integer with the given bit width.
    UnsignedInteger {
        /// Bit width of the destination.
        bits: u32,
    },
    /// A floating point number with the given bit width.
    Float {
        /// Bit width of the destination.
        bits: u32,
    },
    /// A sequence of bytes, base64-encoded on the wire.
    ByteSequence,
    /// A number kept as its original (validated) text.
    Number,
    /// Any JSON value, with no further shape checks.
    Dynamic,
    /// A type that parses its own textual representation.
    Custom(&'static str),
    /// A type populated through a registered converter.
    Converted(&'static str),
    /// A nullable wrapper around another shape.
    Nullable(Box<Shape>),
    /// A sequence of values of another shape.
    Sequence(Box<Shape>),
    /// A type that can only be populated from the request body.
    Unsupported(&'static str),
}

impl Shape {
    /// Returns `true` if the shape can be populated from a single literal token.
    pub fn accepts_tokens(&self) -> bool {
        match self {
            Shape::Unsupported(_) => false,
            Shape::Nullable(inner) | Shape::Sequence(inner) => inner.accepts_tokens(),
            _ => true,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::String => write!(f, "string"),
            Shape::Boolean => write!(f, "boolean"),
            Shape::SignedInteger { bits } => write!(f, "i{bits}"),
            Shape::UnsignedInteger { bits } => write!(f, "u{bits}"),
            Shape::Float { bits } => write!(f, "f{bits}"),
            Shape::ByteSequence => write!(f, "bytes (base64)"),
            Shape::Number => write!(f, "number"),
            Shape::Dynamic => write!(f, "dynamic"),
            Shape::Custom(name) | Shape::Converted(name) | Shape::Unsupported(name) => {
                write!(f, "{name}")
            }
            Shape::Nullable(inner) => write!(f, "nullable {inner}"),
            Shape::Sequence(inner) => write!(f, "sequence of {inner}"),
        }
    }
}
