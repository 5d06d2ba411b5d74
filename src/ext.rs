use serde_json::Value;

use crate::{Selection, Selector};

/// Extension trait that allows for selector queries directly on [`serde_json::Value`]
///
/// ## Usage
/// ```rust
/// use serde_json::json;
/// use json_selector::{Selector, SelectorExt};
///
/// # fn main() -> Result<(), json_selector::ParseError> {
/// let value = json!({"foo": ["bar", "baz"]});
/// let selector = Selector::parse("foo")?;
/// let nodes = value.select(&selector).into_node_list().all();
/// assert_eq!(nodes, vec!["bar", "baz"]);
/// # Ok(())
/// # }
/// ```
pub trait SelectorExt {
    /// Evaluate a compiled [`Selector`] against this value
    fn select(&self, selector: &Selector) -> Selection<'_>;
}

impl SelectorExt for Value {
    fn select(&self, selector: &Selector) -> Selection<'_> {
        selector.evaluate(self)
    }
}
