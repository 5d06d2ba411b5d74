use std::str::FromStr;

use serde::{de::Visitor, Deserialize};
use serde_json::Value;

use crate::{
    ast::Expr,
    error::ParseError,
    evaluator::{FilterEvaluator, Pass},
    node::{NodeList, Selection},
    parser::parse_selector,
};

/// A compiled selector
///
/// A `Selector` owns its syntax tree and can be evaluated against any number of values. It is
/// `Send` and `Sync`, so a single instance can be shared between threads.
///
/// # Usage
///
/// ```rust
/// # use serde_json::json;
/// # use json_selector::Selector;
/// # fn main() -> Result<(), json_selector::ParseError> {
/// let selector = Selector::parse("items[price>10].name")?;
/// let value = json!({"items": [
///     {"name": "pen", "price": 2},
///     {"name": "book", "price": 12}
/// ]});
/// let nodes = selector.query(&value);
/// assert_eq!(nodes.all(), vec!["book"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Selector {
    ast: Expr,
    filters: FilterEvaluator,
}

impl Selector {
    /// Create a [`Selector`] by parsing selector text
    ///
    /// # Example
    /// ```rust
    /// # use json_selector::Selector;
    /// # fn main() {
    /// let selector = Selector::parse("store.book[::-1] | store.magazine").expect("valid selector");
    /// assert!(Selector::parse("a.b(.c)").is_err());
    /// # }
    /// ```
    pub fn parse(selector: &str) -> Result<Self, ParseError> {
        parse_selector(selector).map(Self::from_ast)
    }

    /// Wrap an already parsed syntax tree
    pub fn from_ast(ast: Expr) -> Self {
        Self {
            ast,
            filters: FilterEvaluator::default(),
        }
    }

    /// The syntax tree of this selector
    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Evaluate this selector against a [`serde_json::Value`]
    ///
    /// # Example
    /// ```rust
    /// # use serde_json::json;
    /// # use json_selector::Selector;
    /// # fn main() -> Result<(), json_selector::ParseError> {
    /// let value = json!({"user": {"name": "John"}});
    /// assert!(Selector::parse("user.name")?.evaluate(&value).is_truthy());
    /// assert!(!Selector::parse("user.age")?.evaluate(&value).is_truthy());
    /// # Ok(())
    /// # }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Evaluate Selector", level = "trace", parent = None, skip(self), fields(selector = %self), ret))]
    pub fn evaluate<'b>(&self, data: &'b Value) -> Selection<'b> {
        Pass::new(&self.filters).evaluate(&self.ast, data)
    }

    /// Evaluate this selector and view the result as a [`NodeList`]
    pub fn query<'b>(&self, data: &'b Value) -> NodeList<'b> {
        self.evaluate(data).into_node_list()
    }

    /// The number of distinct `~` patterns this selector has compiled so far
    pub fn compiled_patterns(&self) -> usize {
        self.filters.compiled_patterns()
    }
}

impl Clone for Selector {
    fn clone(&self) -> Self {
        Self::from_ast(self.ast.clone())
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.ast == other.ast
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ast)
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SelectorVisitor;

        impl<'de> Visitor<'de> for SelectorVisitor {
            type Value = Selector;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a string representing a selector")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Selector::parse(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(SelectorVisitor)
    }
}
