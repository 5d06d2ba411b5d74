//! Segments of a property chain
use super::{filter::Filter, slice::Slice};

/// One step of a [`PropertyChain`]
#[derive(Debug, PartialEq, Clone)]
pub enum Segment {
    /// A named member of an object, e.g. `.name`, optionally filtered and sliced
    Property {
        name: String,
        filter: Option<Filter>,
        slice: Option<Slice>,
    },
    /// Every array element or object member value, `*`
    Wildcard { filter: Option<Filter> },
    /// Every value reachable at any depth, `**`
    DeepWildcard { filter: Option<Filter> },
}

impl Segment {
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property {
            name: name.into(),
            filter: None,
            slice: None,
        }
    }

    pub fn as_property_name(&self) -> Option<&str> {
        match self {
            Segment::Property { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Segment::Property { filter, .. }
            | Segment::Wildcard { filter }
            | Segment::DeepWildcard { filter } => filter.as_ref(),
        }
    }

    pub(crate) fn filter_mut(&mut self) -> &mut Option<Filter> {
        match self {
            Segment::Property { filter, .. }
            | Segment::Wildcard { filter }
            | Segment::DeepWildcard { filter } => filter,
        }
    }

    pub fn slice(&self) -> Option<&Slice> {
        match self {
            Segment::Property { slice, .. } => slice.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Property { name, .. } => write!(f, "{name}")?,
            Segment::Wildcard { .. } => write!(f, "*")?,
            Segment::DeepWildcard { .. } => write!(f, "**")?,
        }
        if let Some(filter) = self.filter() {
            write!(f, "[{filter}]")?;
        }
        if let Some(slice) = self.slice() {
            write!(f, "[{slice}]")?;
        }
        Ok(())
    }
}

/// A sequence of segments walked from the queried value
///
/// An empty chain selects the queried value itself.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PropertyChain {
    pub segments: Vec<Segment>,
}

impl std::fmt::Display for PropertyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, s) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{s}")?;
        }
        Ok(())
    }
}
