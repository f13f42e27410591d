//! Structural template matching.
//!
//! # Responsibilities
//! - Parse synthesized template strings into patterns
//! - Parse request paths into segments and argument lists
//! - Capture raw placeholder values when a path fits a pattern's shape
//!
//! # Design Decisions
//! - Segment and argument names compare case-insensitively
//! - Named arguments may appear in any order
//! - No regex: a hand-written splitter that respects quotes and parentheses
//! - Shape only; typing and overload choice belong to the resolver

use thiserror::Error;

use crate::routing::candidate::RouteValues;

/// Suffixes of a transport-style name/value capture pair.
pub const NAME_SUFFIX: &str = ".Name";
pub const VALUE_SUFFIX: &str = ".Value";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("template is empty")]
    Empty,
    #[error("malformed template segment '{0}'")]
    Segment(String),
    #[error("malformed template argument '{0}'")]
    Argument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternArg {
    Positional(String),
    Named { name: String, placeholder: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PatternSegment {
    name: String,
    args: Option<Vec<PatternArg>>,
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePattern {
    segments: Vec<PatternSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawArg {
    name: Option<String>,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawSegment {
    name: String,
    args: Option<Vec<RawArg>>,
}

/// A parsed request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<RawSegment>,
}

impl TemplatePattern {
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let trimmed = template.trim_matches('/');
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        let parts = split_top_level(trimmed, '/').ok_or_else(|| PatternError::Segment(trimmed.to_string()))?;
        let mut segments = Vec::with_capacity(parts.len());

        for part in parts {
            let (name, inner) = split_call(part).ok_or_else(|| PatternError::Segment(part.to_string()))?;
            let args = match inner {
                None => None,
                Some(inner) => Some(parse_pattern_args(inner)?),
            };
            segments.push(PatternSegment {
                name: name.to_string(),
                args,
            });
        }

        Ok(Self { segments })
    }

    /// Raw values keyed by placeholder, or `None` if the path has another shape.
    pub fn capture(&self, path: &RequestPath) -> Option<RouteValues> {
        if self.segments.len() != path.segments.len() {
            return None;
        }

        let mut values = RouteValues::new();
        for (pattern, segment) in self.segments.iter().zip(&path.segments) {
            if !pattern.name.eq_ignore_ascii_case(&segment.name) {
                return None;
            }
            match (&pattern.args, &segment.args) {
                (None, None) => {}
                (Some(expected), Some(actual)) => capture_args(expected, actual, &mut values)?,
                _ => return None,
            }
        }
        Some(values)
    }
}

impl RequestPath {
    /// Parse a request path; `None` when quotes or parentheses are unbalanced.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        let mut segments = Vec::new();
        for part in split_top_level(trimmed, '/')? {
            let (name, inner) = split_call(part)?;
            let args = match inner {
                None => None,
                Some(inner) => Some(parse_raw_args(inner)?),
            };
            segments.push(RawSegment {
                name: name.to_string(),
                args,
            });
        }
        Some(Self { segments })
    }
}

fn capture_args(expected: &[PatternArg], actual: &[RawArg], values: &mut RouteValues) -> Option<()> {
    if expected.len() != actual.len() {
        return None;
    }

    if let [PatternArg::Positional(placeholder)] = expected {
        let arg = &actual[0];
        match &arg.name {
            None => {
                values.insert(placeholder.clone(), arg.value.clone());
            }
            // `Customers(Id=5)` against `Customers({id})`: hand the name to the
            // resolver, which checks it against the template's mapping.
            Some(name) => {
                values.insert(format!("{placeholder}{NAME_SUFFIX}"), name.clone());
                values.insert(format!("{placeholder}{VALUE_SUFFIX}"), arg.value.clone());
            }
        }
        return Some(());
    }

    if actual.iter().any(|a| a.name.is_none()) {
        return None;
    }

    for pattern in expected {
        let PatternArg::Named { name, placeholder } = pattern else {
            return None;
        };
        let arg = actual
            .iter()
            .find(|a| a.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))?;
        values.insert(placeholder.clone(), arg.value.clone());
    }
    Some(())
}

fn parse_pattern_args(inner: &str) -> Result<Vec<PatternArg>, PatternError> {
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let parts = split_top_level(inner, ',').ok_or_else(|| PatternError::Argument(inner.to_string()))?;
    let mut args = Vec::with_capacity(parts.len());
    for part in parts {
        let arg = match part.split_once('=') {
            None => PatternArg::Positional(placeholder(part)?),
            Some((name, rest)) if !name.is_empty() => PatternArg::Named {
                name: name.to_string(),
                placeholder: placeholder(rest)?,
            },
            Some(_) => return Err(PatternError::Argument(part.to_string())),
        };
        args.push(arg);
    }

    if args.len() > 1 && args.iter().any(|a| matches!(a, PatternArg::Positional(_))) {
        return Err(PatternError::Argument(inner.to_string()));
    }
    Ok(args)
}

fn placeholder(part: &str) -> Result<String, PatternError> {
    part.strip_prefix('{')
        .and_then(|p| p.strip_suffix('}'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PatternError::Argument(part.to_string()))
}

fn parse_raw_args(inner: &str) -> Option<Vec<RawArg>> {
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let mut args = Vec::new();
    for part in split_top_level(inner, ',')? {
        let arg = match split_top_level(part, '=')?.as_slice() {
            [value] => RawArg {
                name: None,
                value: value.to_string(),
            },
            [name, value] if !name.is_empty() => RawArg {
                name: Some(name.to_string()),
                value: value.to_string(),
            },
            _ => return None,
        };
        if arg.value.is_empty() {
            return None;
        }
        args.push(arg);
    }
    Some(args)
}

/// `Name(inner)` → (`Name`, `Some(inner)`); `Name` → (`Name`, `None`).
fn split_call(segment: &str) -> Option<(&str, Option<&str>)> {
    match segment.find('(') {
        None if !segment.contains(')') && !segment.is_empty() => Some((segment, None)),
        None => None,
        Some(0) => None,
        Some(open) => {
            let inner = segment[open + 1..].strip_suffix(')')?;
            Some((&segment[..open], Some(inner)))
        }
    }
}

/// Split on `sep` outside single-quoted literals and parentheses.
fn split_top_level(input: &str, sep: char) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.checked_sub(1)?,
            c if c == sep && !quoted && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if quoted || depth != 0 {
        return None;
    }
    parts.push(&input[start..]);
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(template: &str, path: &str) -> Option<RouteValues> {
        let pattern = TemplatePattern::parse(template).unwrap();
        RequestPath::parse(path).and_then(|p| pattern.capture(&p))
    }

    #[test]
    fn test_collection_pattern() {
        assert_eq!(capture("Customers", "/Customers"), Some(RouteValues::new()));
        assert_eq!(capture("Customers", "customers/"), Some(RouteValues::new()));
        assert!(capture("Customers", "Customers(1)").is_none());
        assert!(capture("Customers", "Orders").is_none());
    }

    #[test]
    fn test_positional_key() {
        let values = capture("Customers({id})", "Customers(5)").unwrap();
        assert_eq!(values.get("id"), Some("5"));

        let values = capture("Customers({id})", "Customers('a,b')").unwrap();
        assert_eq!(values.get("id"), Some("'a,b'"));
    }

    #[test]
    fn test_named_single_key_becomes_pair() {
        let values = capture("Customers({id})", "Customers(Id=5)").unwrap();
        assert_eq!(values.get("id.Name"), Some("Id"));
        assert_eq!(values.get("id.Value"), Some("5"));
        assert!(!values.contains("id"));
    }

    #[test]
    fn test_named_arguments_any_order() {
        let template = "ComplexKeyTypes(SectionNumber={sectionNumber},SectionSpot={sectionSpot})";

        let values = capture(template, "ComplexKeyTypes(SectionNumber=4,SectionSpot=7)").unwrap();
        assert_eq!(values.get("sectionNumber"), Some("4"));
        assert_eq!(values.get("sectionSpot"), Some("7"));

        let values = capture(template, "ComplexKeyTypes(sectionspot=7,SectionNumber=4)").unwrap();
        assert_eq!(values.get("sectionNumber"), Some("4"));
        assert_eq!(values.get("sectionSpot"), Some("7"));

        assert!(capture(template, "ComplexKeyTypes(4,7)").is_none());
        assert!(capture(template, "ComplexKeyTypes(SectionNumber=4)").is_none());
        assert!(capture(template, "ComplexKeyTypes(SectionNumber=4,Other=7)").is_none());
    }

    #[test]
    fn test_operation_call() {
        let template = "ComplexKeyTypes/BestComplexKeyType(something={something})";
        let values = capture(template, "ComplexKeyTypes/BestComplexKeyType(something='lots')").unwrap();
        assert_eq!(values.get("something"), Some("'lots'"));

        let values = capture(template, "ComplexKeyTypes/BestComplexKeyType(something='a=b/c')").unwrap();
        assert_eq!(values.get("something"), Some("'a=b/c'"));

        assert!(capture(template, "ComplexKeyTypes/BestComplexKeyType(value=3,multiplier=4)").is_none());
        assert!(capture(template, "ComplexKeyTypes/BestComplexKeyType").is_none());

        let empty = "Customers/Count()";
        assert_eq!(capture(empty, "Customers/Count()"), Some(RouteValues::new()));
    }

    #[test]
    fn test_malformed_paths_never_match() {
        let template = "Customers({id})";
        assert!(capture(template, "Customers(5").is_none());
        assert!(capture(template, "Customers('5)").is_none());
        assert!(capture(template, "Customers()").is_none());
        assert!(capture(template, "Customers(Id=)").is_none());
        assert!(RequestPath::parse("").is_none());
    }

    #[test]
    fn test_malformed_templates() {
        assert_eq!(TemplatePattern::parse(""), Err(PatternError::Empty));
        assert!(TemplatePattern::parse("Customers(id)").is_err());
        assert!(TemplatePattern::parse("Customers({a},{b})").is_err());
        assert!(TemplatePattern::parse("Customers(={a})").is_err());
        assert!(TemplatePattern::parse("(x)").is_err());
    }
}
