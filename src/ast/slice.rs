//! Array slices, written `[start:end:step]` after a property
use serde_json::Value;

/// A slice of an array
///
/// Any part may be left unset: `start` then defaults to `0`, `end` to the length of the array,
/// and `step` to `1`.
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy)]
pub struct Slice {
    /// The first index of the slice
    ///
    /// Negative values count back from the end of the array.
    pub start: Option<i64>,
    /// The index one past the end of the slice
    ///
    /// Negative values count back from the end of the array.
    pub end: Option<i64>,
    /// The distance between selected indices
    ///
    /// Only its magnitude drives the iteration; a negative step reverses the selected elements.
    pub step: Option<i64>,
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        if let Some(step) = self.step {
            write!(f, ":{step}")?;
        }
        Ok(())
    }
}

#[doc(hidden)]
impl Slice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }
}

impl Slice {
    /// Select the elements of `list` addressed by this slice
    pub fn apply<'b>(&self, list: &'b [Value]) -> Vec<&'b Value> {
        self.indices(list.len())
            .into_iter()
            .filter_map(|i| list.get(i))
            .collect()
    }

    /// The indices of an array of length `len` addressed by this slice, in selection order
    ///
    /// Indices are walked from `start` up to `end` by the magnitude of `step`, and only those
    /// inside the array are kept. A step of zero selects nothing.
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Slice Indices", level = "trace", parent = None, ret))]
    pub fn indices(&self, len: usize) -> Vec<usize> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return vec![];
        }
        // i128 keeps the arithmetic below free of overflow for any i64 input
        let len = len as i128;
        let stride = i128::from(step).abs();
        let mut i = normalize_slice_index(self.start.map_or(0, i128::from), len);
        let end = normalize_slice_index(self.end.map_or(len, i128::from), len).min(len);
        if i < 0 {
            // jump to the first index of the progression that lands inside the array
            i += ((-i + stride - 1) / stride) * stride;
        }
        let mut indices = Vec::new();
        while i < end {
            if let Ok(index) = usize::try_from(i) {
                indices.push(index);
            }
            i += stride;
        }
        if step < 0 {
            indices.reverse();
        }
        indices
    }
}

fn normalize_slice_index(index: i128, len: i128) -> i128 {
    if index < 0 {
        index + len
    } else {
        index
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::Slice;

    fn list() -> Vec<Value> {
        (0..5).map(|i| json!(i)).collect()
    }

    #[test]
    fn forward() {
        let list = list();
        let s = Slice::new().with_start(1).with_end(3);
        assert_eq!(s.apply(&list), vec![1, 2]);
        let s = Slice::new().with_start(1).with_step(2);
        assert_eq!(s.apply(&list), vec![1, 3]);
        assert_eq!(Slice::new().apply(&list), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn negative_bounds() {
        let list = list();
        let s = Slice::new().with_start(-2);
        assert_eq!(s.apply(&list), vec![3, 4]);
        let s = Slice::new().with_end(-1);
        assert_eq!(s.apply(&list), vec![0, 1, 2, 3]);
    }

    #[test]
    fn negative_step_reverses() {
        let list = list();
        assert_eq!(
            Slice::new().with_step(-1).apply(&list),
            vec![4, 3, 2, 1, 0]
        );
        assert_eq!(
            Slice::new().with_start(1).with_end(4).with_step(-2).apply(&list),
            vec![3, 1]
        );
    }

    #[test]
    fn out_of_range() {
        let list = list();
        assert!(Slice::new().with_start(7).apply(&list).is_empty());
        assert_eq!(Slice::new().with_end(100).apply(&list).len(), 5);
        // -7 normalizes to -2, so the stride of 2 lands on 0, 2 and 4
        assert_eq!(
            Slice::new().with_start(-7).with_step(2).apply(&list),
            vec![0, 2, 4]
        );
        assert_eq!(
            Slice::new().with_start(-6).with_step(2).apply(&list),
            vec![1, 3]
        );
    }

    #[test]
    fn zero_step() {
        assert!(Slice::new().with_step(0).apply(&list()).is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(Slice::new().to_string(), ":");
        assert_eq!(
            Slice::new().with_start(1).with_end(-1).with_step(2).to_string(),
            "1:-1:2"
        );
    }
}
