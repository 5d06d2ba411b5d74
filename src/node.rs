//! Types representing the values selected out of a [`serde_json::Value`]
use std::{collections::HashSet, slice::Iter};

use serde::Serialize;
use serde_json::Value;

/// A list of nodes resulting from a selector
///
/// Each node within the list is a borrowed reference to the node in the original
/// [`serde_json::Value`] that was queried.
#[derive(Debug, Default, Eq, PartialEq, Serialize, Clone)]
pub struct NodeList<'a>(pub(crate) Vec<&'a Value>);

impl<'a> NodeList<'a> {
    /// Extract _at most_ one node from a [`NodeList`]
    ///
    /// # Usage
    /// ```rust
    /// # use serde_json::json;
    /// # use json_selector::{AtMostOneError, Selector};
    /// # fn main() -> Result<(), json_selector::ParseError> {
    /// let value = json!({"foo": {"bar": 1, "baz": 2}});
    /// let selector = Selector::parse("foo.bar")?;
    /// let node = selector.evaluate(&value).into_node_list().at_most_one().unwrap();
    /// assert_eq!(node, Some(&json!(1)));
    ///
    /// let selector = Selector::parse("foo.*")?;
    /// let error = selector.evaluate(&value).into_node_list().at_most_one().unwrap_err();
    /// assert!(matches!(error, AtMostOneError(2)));
    /// # Ok(())
    /// # }
    /// ```
    pub fn at_most_one(&self) -> Result<Option<&'a Value>, AtMostOneError> {
        if self.0.len() > 1 {
            Err(AtMostOneError(self.0.len()))
        } else {
            Ok(self.0.first().copied())
        }
    }

    /// Extract _exactly_ one node from a [`NodeList`]
    ///
    /// # Usage
    /// ```rust
    /// # use serde_json::json;
    /// # use json_selector::{ExactlyOneError, Selector};
    /// # fn main() -> Result<(), json_selector::ParseError> {
    /// let value = json!({"user": {"name": "John"}});
    /// let selector = Selector::parse("user.name")?;
    /// let node = selector.evaluate(&value).into_node_list().exactly_one().unwrap();
    /// assert_eq!(node, "John");
    ///
    /// let selector = Selector::parse("user.age")?;
    /// let error = selector.evaluate(&value).into_node_list().exactly_one().unwrap_err();
    /// assert!(error.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn exactly_one(&self) -> Result<&'a Value, ExactlyOneError> {
        match self.0.as_slice() {
            [] => Err(ExactlyOneError::Empty),
            [node] => Ok(*node),
            nodes => Err(ExactlyOneError::MoreThanOne(nodes.len())),
        }
    }

    /// Extract all nodes
    pub fn all(self) -> Vec<&'a Value> {
        self.0
    }

    /// Get the length of a [`NodeList`]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a [`NodeList`] is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over a [`NodeList`]
    ///
    /// Note that [`NodeList`] also implements [`IntoIterator`].
    pub fn iter(&self) -> Iter<'_, &'a Value> {
        self.0.iter()
    }

    /// Returns the first node in the [`NodeList`], or `None` if it is empty
    pub fn first(&self) -> Option<&'a Value> {
        self.0.first().copied()
    }

    /// Returns the last node in the [`NodeList`], or `None` if it is empty
    pub fn last(&self) -> Option<&'a Value> {
        self.0.last().copied()
    }

    /// Returns the node at the given index in the [`NodeList`], or `None` if the given index is
    /// out of bounds.
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.0.get(index).copied()
    }
}

impl<'a> From<Vec<&'a Value>> for NodeList<'a> {
    fn from(nodes: Vec<&'a Value>) -> Self {
        Self(nodes)
    }
}

impl<'a> IntoIterator for NodeList<'a> {
    type Item = &'a Value;

    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The result of evaluating a selector, or any part of one
///
/// Property chains and boolean composition produce a set of [`Nodes`][Selection::Nodes]. A
/// negation produces a bare boolean [`Scalar`][Selection::Scalar], which takes part in set
/// operations as a one-element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    /// A set of nodes borrowed from the queried value
    Nodes(NodeList<'a>),
    /// A single bare value
    Scalar(&'a Value),
}

static TRUE: Value = Value::Bool(true);
static FALSE: Value = Value::Bool(false);

impl<'a> Selection<'a> {
    pub(crate) fn empty() -> Self {
        Self::Nodes(NodeList::default())
    }

    pub(crate) fn boolean(b: bool) -> Self {
        Self::Scalar(if b { &TRUE } else { &FALSE })
    }

    /// A set of nodes is truthy when it is not empty; a scalar is truthy unless it is `null`,
    /// `false`, `0`, or the empty string
    pub fn is_truthy(&self) -> bool {
        match self {
            Selection::Nodes(nodes) => !nodes.is_empty(),
            Selection::Scalar(value) => is_truthy(value),
        }
    }

    /// View this selection as a node list, a scalar becoming a list of one
    pub fn into_node_list(self) -> NodeList<'a> {
        match self {
            Selection::Nodes(nodes) => nodes,
            Selection::Scalar(value) => NodeList(vec![value]),
        }
    }

    /// Keep the nodes of `self` that are also members of `other`, in the order of `self`
    pub(crate) fn intersect(self, other: Self) -> Self {
        let other = other.into_node_list();
        let members: HashSet<NodeKey> = other.iter().map(|v| NodeKey::of(*v)).collect();
        let nodes = self
            .into_node_list()
            .into_iter()
            .filter(|v| members.contains(&NodeKey::of(*v)))
            .collect();
        Self::Nodes(NodeList(nodes))
    }

    /// Nodes of `self` followed by those of `other`, without duplicates
    pub(crate) fn union(self, other: Self) -> Self {
        let mut seen = HashSet::new();
        let nodes = self
            .into_node_list()
            .into_iter()
            .chain(other.into_node_list())
            .filter(|v| seen.insert(NodeKey::of(*v)))
            .collect();
        Self::Nodes(NodeList(nodes))
    }
}

impl<'a> From<NodeList<'a>> for Selection<'a> {
    fn from(nodes: NodeList<'a>) -> Self {
        Self::Nodes(nodes)
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The identity of a node when it is a member of a set
///
/// Arrays and objects are the same member only if they are the same node in memory. Scalars
/// are the same member if they are equal, with numbers compared as `f64`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub(crate) enum NodeKey<'a> {
    Container(*const Value),
    Null,
    Bool(bool),
    Number(u64),
    String(&'a str),
}

impl<'a> NodeKey<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                // fold -0.0 into 0.0
                let f = if f == 0.0 { 0.0 } else { f };
                Self::Number(f.to_bits())
            }
            Value::String(s) => Self::String(s.as_str()),
            Value::Array(_) | Value::Object(_) => Self::Container(value as *const Value),
        }
    }
}

/// Error produced when expecting no more than one node from a query
#[derive(Debug, thiserror::Error)]
#[error("nodelist expected to contain at most one entry, but instead contains {0} entries")]
pub struct AtMostOneError(pub usize);

/// Error produced when expecting exactly one node from a query
#[derive(Debug, thiserror::Error)]
pub enum ExactlyOneError {
    /// The query resulted in an empty [`NodeList`]
    #[error("nodelist expected to contain one entry, but is empty")]
    Empty,
    /// The query resulted in a [`NodeList`] containing more than one node
    #[error("nodelist expected to contain one entry, but instead contains {0} entries")]
    MoreThanOne(usize),
}

impl ExactlyOneError {
    /// Check that it is the `Empty` variant
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check that it is the `MoreThanOne` variant
    pub fn is_more_than_one(&self) -> bool {
        matches!(self, Self::MoreThanOne(_))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, to_value};

    use super::{NodeKey, NodeList, Selection};

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<NodeList>();
        assert_send::<Selection>();
    }

    #[test]
    fn test_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<NodeList>();
        assert_sync::<Selection>();
    }

    #[test]
    fn test_serialize() {
        let v = json!([1, 2, 3, 4]);
        let list = NodeList(v.as_array().unwrap().iter().collect());
        assert_eq!(to_value(list).expect("serialize"), v);
    }

    #[test]
    fn identity() {
        let v = json!([{"a": 1}, {"a": 1}, 1, 1.0, "x", "x"]);
        let list = v.as_array().unwrap();
        assert_ne!(NodeKey::of(&list[0]), NodeKey::of(&list[1]));
        assert_eq!(NodeKey::of(&list[0]), NodeKey::of(&list[0]));
        assert_eq!(NodeKey::of(&list[2]), NodeKey::of(&list[3]));
        assert_eq!(NodeKey::of(&list[4]), NodeKey::of(&list[5]));
    }

    #[test]
    fn union_and_intersection() {
        let v = json!([{"a": 1}, {"a": 1}, 2, 3]);
        let list = v.as_array().unwrap();
        let left = Selection::Nodes(NodeList(vec![&list[0], &list[2]]));
        let right = Selection::Nodes(NodeList(vec![&list[1], &list[2], &list[3]]));
        let union = left.clone().union(right.clone()).into_node_list();
        assert_eq!(union.len(), 4);
        let both = left.intersect(right).into_node_list().all();
        assert_eq!(both, vec![2]);
    }

    #[test]
    fn truthiness() {
        assert!(!Selection::empty().is_truthy());
        assert!(!Selection::boolean(false).is_truthy());
        assert!(Selection::boolean(true).is_truthy());
        let zero = json!(0);
        assert!(!Selection::Scalar(&zero).is_truthy());
        let s = json!("");
        assert!(!Selection::Scalar(&s).is_truthy());
        let nodes = Selection::Nodes(NodeList(vec![&zero]));
        assert!(nodes.is_truthy());
    }
}
