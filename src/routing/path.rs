//! Typed route values and canonical resource paths.

use serde::Serialize;
use std::fmt;

use crate::model::ScalarType;

/// A captured route value after literal conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int32(i32),
    String(String),
}

impl Value {
    /// Convert a raw captured literal.
    ///
    /// A literal that parses fully as an `i32` is an integer. Anything else is
    /// a string; a single-quoted literal loses its quotes and `''` becomes `'`.
    pub fn parse_literal(raw: &str) -> Value {
        if let Ok(number) = raw.parse::<i32>() {
            return Value::Int32(number);
        }
        match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            Some(inner) => Value::String(inner.replace("''", "'")),
            None => Value::String(raw.to_string()),
        }
    }

    pub fn ty(&self) -> ScalarType {
        match self {
            Value::Int32(_) => ScalarType::Int32,
            Value::String(_) => ScalarType::String,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            Value::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            Value::Int32(_) => None,
        }
    }
}

impl fmt::Display for Value {
    /// Literal form: integers bare, strings single-quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
        }
    }
}

/// A schema-named value inside a key predicate or operation invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: Value,
}

/// Canonical description of the resource a request addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourcePath {
    Collection {
        collection: String,
    },
    Entity {
        collection: String,
        key: Vec<NamedValue>,
    },
    Operation {
        collection: String,
        operation: String,
        arguments: Vec<NamedValue>,
    },
}

/// One segment of a `ResourcePath`, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Collection(&'a str),
    Key(&'a [NamedValue]),
    Operation {
        name: &'a str,
        arguments: &'a [NamedValue],
    },
}

impl ResourcePath {
    pub fn collection(&self) -> &str {
        match self {
            ResourcePath::Collection { collection }
            | ResourcePath::Entity { collection, .. }
            | ResourcePath::Operation { collection, .. } => collection,
        }
    }

    pub fn segments(&self) -> Vec<PathSegment<'_>> {
        match self {
            ResourcePath::Collection { collection } => vec![PathSegment::Collection(collection)],
            ResourcePath::Entity { collection, key } => {
                vec![PathSegment::Collection(collection), PathSegment::Key(key)]
            }
            ResourcePath::Operation {
                collection,
                operation,
                arguments,
            } => vec![
                PathSegment::Collection(collection),
                PathSegment::Operation {
                    name: operation,
                    arguments,
                },
            ],
        }
    }
}

fn write_named(f: &mut fmt::Formatter<'_>, values: &[NamedValue]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}={}", v.name, v.value)?;
    }
    Ok(())
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourcePath::Collection { collection } => f.write_str(collection),
            ResourcePath::Entity { collection, key } => {
                write!(f, "{collection}(")?;
                match key.as_slice() {
                    [single] => write!(f, "{}", single.value)?,
                    many => write_named(f, many)?,
                }
                f.write_str(")")
            }
            ResourcePath::Operation {
                collection,
                operation,
                arguments,
            } => {
                write!(f, "{collection}/{operation}(")?;
                write_named(f, arguments)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, value: Value) -> NamedValue {
        NamedValue {
            name: name.into(),
            value,
        }
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Value::parse_literal("5"), Value::Int32(5));
        assert_eq!(Value::parse_literal("-12"), Value::Int32(-12));
        assert_eq!(Value::parse_literal("'lots'"), Value::String("lots".into()));
        assert_eq!(Value::parse_literal("'it''s'"), Value::String("it's".into()));
        assert_eq!(Value::parse_literal("lots"), Value::String("lots".into()));
        assert_eq!(Value::parse_literal("5x"), Value::String("5x".into()));
        assert_eq!(Value::parse_literal("'"), Value::String("'".into()));
        // Beyond i32 range stays a string.
        assert_eq!(Value::parse_literal("99999999999"), Value::String("99999999999".into()));
    }

    #[test]
    fn test_display_canonical_forms() {
        let single = ResourcePath::Entity {
            collection: "Customers".into(),
            key: vec![named("Id", Value::Int32(5))],
        };
        assert_eq!(single.to_string(), "Customers(5)");

        let composite = ResourcePath::Entity {
            collection: "ComplexKeyTypes".into(),
            key: vec![
                named("SectionNumber", Value::Int32(4)),
                named("SectionSpot", Value::Int32(7)),
            ],
        };
        assert_eq!(composite.to_string(), "ComplexKeyTypes(SectionNumber=4,SectionSpot=7)");

        let call = ResourcePath::Operation {
            collection: "ComplexKeyTypes".into(),
            operation: "BestComplexKeyType".into(),
            arguments: vec![named("something", Value::String("lots".into()))],
        };
        assert_eq!(call.to_string(), "ComplexKeyTypes/BestComplexKeyType(something='lots')");
    }

    #[test]
    fn test_segments_order() {
        let path = ResourcePath::Collection {
            collection: "Customers".into(),
        };
        assert_eq!(path.segments(), vec![PathSegment::Collection("Customers")]);

        let key = vec![named("Id", Value::Int32(1))];
        let entity = ResourcePath::Entity {
            collection: "Customers".into(),
            key: key.clone(),
        };
        assert_eq!(
            entity.segments(),
            vec![PathSegment::Collection("Customers"), PathSegment::Key(&key)]
        );
        assert_eq!(entity.collection(), "Customers");
        assert_eq!(path.collection(), "Customers");
    }
}
