//! Object graph capability
//!
//! The engine never inspects caller types directly. Anything that can list its
//! readable fields through [`Walkable`] can be handed to a rule as a root, and
//! every structured field value it exposes is walked the same way.

mod json;

use std::borrow::Cow;
use std::fmt;

use itertools::Itertools;
use thiserror::Error;

/// Field enumeration capability injected into the path resolver.
///
/// # Examples
///
/// ```
/// use fieldrules::graph::{Field, FieldValue, Walkable};
///
/// struct Address {
///     street: String,
///     tags: Vec<String>,
/// }
///
/// impl Walkable for Address {
///     fn type_name(&self) -> &str {
///         "Address"
///     }
///
///     fn fields(&self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("street", FieldValue::text(&self.street)),
///             Field::new("tags", FieldValue::texts(&self.tags)),
///         ]
///     }
/// }
/// ```
pub trait Walkable {
    /// Label used for the owner of resolved fields and for objects reached as leaves.
    fn type_name(&self) -> &str;

    /// Publicly readable fields, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// A field could not be read. The resolver skips such fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' could not be read: {reason}")]
pub struct FieldAccessError {
    pub field: String,
    pub reason: String,
}

/// One named field of a walkable object.
#[derive(Debug)]
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    pub value: Result<FieldValue<'a>, FieldAccessError>,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: FieldValue<'a>) -> Self {
        Self {
            name: name.into(),
            value: Ok(value),
        }
    }

    /// A field that exists but whose value cannot be produced.
    pub fn failed(name: impl Into<Cow<'a, str>>, reason: &str) -> Self {
        let name = name.into();
        let error = FieldAccessError {
            field: name.to_string(),
            reason: reason.to_string(),
        };
        Self {
            name,
            value: Err(error),
        }
    }
}

/// Value of a field as seen by the resolver.
pub enum FieldValue<'a> {
    /// Primitive or text value, already rendered as a string.
    Scalar(Cow<'a, str>),
    /// Structured value the resolver can descend into.
    Object(&'a dyn Walkable),
    /// Sequence-valued field; elements keep their order.
    Sequence(Vec<FieldValue<'a>>),
    /// Absent value.
    Null,
}

impl<'a> FieldValue<'a> {
    pub fn text(value: &'a str) -> Self {
        FieldValue::Scalar(Cow::Borrowed(value))
    }

    /// Renders any displayable value (numbers, booleans, ...) into a scalar.
    pub fn scalar<T: fmt::Display + ?Sized>(value: &T) -> Self {
        FieldValue::Scalar(Cow::Owned(value.to_string()))
    }

    pub fn object<T: Walkable>(value: &'a T) -> Self {
        FieldValue::Object(value)
    }

    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + 'a,
    {
        FieldValue::Sequence(
            values
                .into_iter()
                .map(|value| FieldValue::text(value.as_ref()))
                .collect(),
        )
    }

    pub fn objects<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: Walkable + 'a,
    {
        FieldValue::Sequence(values.into_iter().map(FieldValue::object).collect())
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, FieldValue::Sequence(_))
    }

    /// String rendering used for every comparison and pattern match.
    ///
    /// `Null` renders as the empty string and an object as its type name.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Scalar(value) => value.to_string(),
            FieldValue::Object(object) => object.type_name().to_string(),
            FieldValue::Sequence(items) => items.iter().map(FieldValue::render).join(","),
            FieldValue::Null => String::new(),
        }
    }
}

impl<'a> From<Option<FieldValue<'a>>> for FieldValue<'a> {
    fn from(value: Option<FieldValue<'a>>) -> Self {
        value.unwrap_or(FieldValue::Null)
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            FieldValue::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
            FieldValue::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            FieldValue::Null => f.write_str("Null"),
        }
    }
}
