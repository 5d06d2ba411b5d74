//! Per-item filters, written `[path op value]` or `[path]`
use std::cmp::Ordering;

use serde_json::Value;

/// A predicate applied to each item visited by a segment
#[derive(Debug, PartialEq, Clone)]
pub enum Filter {
    /// Compare the value found at a path against a literal
    Comparison(ComparisonFilter),
    /// Check that a path resolves to a value
    Existence(ExistenceFilter),
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Comparison(c) => write!(f, "{c}"),
            Filter::Existence(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ComparisonFilter {
    pub operator: ComparisonOperator,
    pub path: PropertyPath,
    pub value: Literal,
}

impl std::fmt::Display for ComparisonFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{path}{op}{value}",
            path = self.path,
            op = self.operator,
            value = self.value
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExistenceFilter {
    pub path: PropertyPath,
}

impl ExistenceFilter {
    pub fn test(&self, item: &Value) -> bool {
        self.path.resolve(item).is_some()
    }
}

impl std::fmt::Display for ExistenceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A dotted path, e.g. `address.city`, resolved relative to a filtered item
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PropertyPath(String);

impl PropertyPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Follow each key of the path in turn
    ///
    /// Objects are indexed by key and arrays by decimal index. Anything else, or a key that is
    /// not present, leaves the path unresolved.
    pub fn resolve<'b>(&self, item: &'b Value) -> Option<&'b Value> {
        self.0.split('.').try_fold(item, |current, key| match current {
            Value::Object(obj) => obj.get(key),
            Value::Array(list) => key.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => None,
        })
    }
}

impl From<&str> for PropertyPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ComparisonOperator {
    EqualTo,
    GreaterThan,
    LessThan,
    GreaterThanEqualTo,
    LessThanEqualTo,
    Matches,
}

impl ComparisonOperator {
    /// The operator's symbol in selector text
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::EqualTo => "=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanEqualTo => ">=",
            ComparisonOperator::LessThanEqualTo => "<=",
            ComparisonOperator::Matches => "~",
        }
    }

    /// Apply an ordering or equality operator
    ///
    /// Returns `None` for [`Matches`][ComparisonOperator::Matches], which needs a compiled
    /// pattern and is handled by the filter evaluator.
    pub fn compare(&self, left: Option<&Value>, right: &Literal) -> Option<bool> {
        use ComparisonOperator::*;
        let result = match self {
            EqualTo => strict_eq(left, right),
            GreaterThan => matches!(relate(left, right), Some(Ordering::Greater)),
            LessThan => matches!(relate(left, right), Some(Ordering::Less)),
            GreaterThanEqualTo => matches!(
                relate(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            LessThanEqualTo => {
                matches!(relate(left, right), Some(Ordering::Less | Ordering::Equal))
            }
            Matches => return None,
        };
        Some(result)
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The right hand side of a comparison filter
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    /// Matches a path that does not resolve
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// The text a `~` filter compiles as a pattern
    pub fn to_pattern(&self) -> String {
        match self {
            Literal::Undefined => String::from("undefined"),
            Literal::Null => String::from("null"),
            Literal::Bool(b) => b.to_string(),
            Literal::Number(n) => n.to_string(),
            Literal::String(s) => s.clone(),
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Literal::Undefined => f64::NAN,
            Literal::Null => 0.0,
            Literal::Bool(b) => bool_to_number(*b),
            Literal::Number(n) => *n,
            Literal::String(s) => str_to_number(s),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Undefined => write!(f, "undefined"),
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Render a resolved value as the text a `~` filter is tested against
pub(crate) fn stringify(value: Option<&Value>) -> String {
    match value {
        None => String::from("undefined"),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(|f| f.to_string()).unwrap_or_default()
            }
        }
        Some(v) => v.to_string(),
    }
}

fn strict_eq(left: Option<&Value>, right: &Literal) -> bool {
    match (left, right) {
        (None, Literal::Undefined) => true,
        (Some(Value::Null), Literal::Null) => true,
        (Some(Value::Bool(a)), Literal::Bool(b)) => a == b,
        (Some(Value::Number(a)), Literal::Number(b)) => a.as_f64() == Some(*b),
        (Some(Value::String(a)), Literal::String(b)) => a == b,
        _ => false,
    }
}

/// Order two strings by their text, anything else by numeric value
fn relate(left: Option<&Value>, right: &Literal) -> Option<Ordering> {
    if let (Some(Value::String(a)), Literal::String(b)) = (left, right) {
        return Some(a.as_str().cmp(b.as_str()));
    }
    value_to_number(left).partial_cmp(&right.to_number())
}

fn value_to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => bool_to_number(*b),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => str_to_number(s),
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn str_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        0.0
    } else {
        s.parse().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{stringify, ComparisonOperator, Literal, PropertyPath};

    #[test]
    fn resolve_nested() {
        let v = json!({"a": {"b": [{"c": 1}]}});
        assert_eq!(PropertyPath::from("a.b.0.c").resolve(&v), Some(&json!(1)));
        assert!(PropertyPath::from("a.x.c").resolve(&v).is_none());
        assert!(PropertyPath::from("a.b.c").resolve(&v).is_none());
        let n = json!({"a": null});
        assert_eq!(PropertyPath::from("a").resolve(&n), Some(&json!(null)));
        assert!(PropertyPath::from("a.b").resolve(&n).is_none());
    }

    #[test]
    fn equality_is_strict() {
        use ComparisonOperator::EqualTo;
        let one = json!(1);
        let text = json!("1");
        assert_eq!(EqualTo.compare(Some(&one), &Literal::Number(1.0)), Some(true));
        assert_eq!(EqualTo.compare(Some(&text), &Literal::Number(1.0)), Some(false));
        assert_eq!(EqualTo.compare(None, &Literal::Undefined), Some(true));
        assert_eq!(EqualTo.compare(None, &Literal::Null), Some(false));
        assert_eq!(EqualTo.compare(Some(&json!(null)), &Literal::Null), Some(true));
    }

    #[test]
    fn ordering() {
        use ComparisonOperator::*;
        let ten = json!(10);
        assert_eq!(GreaterThan.compare(Some(&ten), &Literal::Number(5.0)), Some(true));
        assert_eq!(LessThan.compare(Some(&ten), &Literal::Number(5.0)), Some(false));
        assert_eq!(
            GreaterThanEqualTo.compare(Some(&ten), &Literal::Number(10.0)),
            Some(true)
        );
        assert_eq!(
            LessThanEqualTo.compare(Some(&ten), &Literal::Number(10.0)),
            Some(true)
        );
        // numeric strings are coerced when the other side is not a string
        let text = json!("20");
        assert_eq!(GreaterThan.compare(Some(&text), &Literal::Number(5.0)), Some(true));
        // but two strings compare by their text
        assert_eq!(
            GreaterThan.compare(Some(&text), &Literal::String("5".into())),
            Some(false)
        );
        assert_eq!(GreaterThan.compare(None, &Literal::Number(-1.0)), Some(false));
        assert_eq!(Matches.compare(Some(&ten), &Literal::Number(1.0)), None);
    }

    #[test]
    fn stringify_values() {
        assert_eq!(stringify(None), "undefined");
        assert_eq!(stringify(Some(&json!("abc"))), "abc");
        assert_eq!(stringify(Some(&json!(42))), "42");
        assert_eq!(stringify(Some(&json!(1.5))), "1.5");
        assert_eq!(stringify(Some(&json!(true))), "true");
        assert_eq!(stringify(Some(&json!([1, 2]))), "[1,2]");
        assert_eq!(Literal::Number(42.0).to_pattern(), "42");
    }
}
