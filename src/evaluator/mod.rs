//! Evaluation of a syntax tree against a [`serde_json::Value`]
use std::collections::HashMap;

use serde_json::Value;

use crate::ast::{Expr, LogicalOperator};
use crate::node::Selection;

use self::chain::select_chain;
pub(crate) use self::filter::FilterEvaluator;

mod chain;
mod filter;

/// A single evaluation pass
///
/// Results are memoized per syntax tree node and input value, by identity. A pass only ever
/// sees one input, so the memo is discarded with it.
pub(crate) struct Pass<'s, 'b> {
    filters: &'s FilterEvaluator,
    memo: HashMap<(*const Expr, *const Value), Selection<'b>>,
}

impl<'s, 'b> Pass<'s, 'b> {
    pub(crate) fn new(filters: &'s FilterEvaluator) -> Self {
        Self {
            filters,
            memo: HashMap::new(),
        }
    }

    pub(crate) fn evaluate(&mut self, node: &Expr, data: &'b Value) -> Selection<'b> {
        let key = (node as *const Expr, data as *const Value);
        if let Some(result) = self.memo.get(&key) {
            return result.clone();
        }
        let result = match node {
            Expr::Logical {
                operator,
                left,
                right,
            } => self.evaluate_logical(*operator, left, right, data),
            Expr::Not(expr) => Selection::boolean(!self.evaluate(expr, data).is_truthy()),
            Expr::Chain(chain) => Selection::Nodes(select_chain(chain, data, self.filters).into()),
        };
        self.memo.insert(key, result.clone());
        result
    }

    /// `&` yields the intersection and `|` the union of both sides
    ///
    /// The right side is only evaluated when the left does not already decide the result: a
    /// falsy left makes `&` empty, and a truthy left is returned as is by `|`.
    fn evaluate_logical(
        &mut self,
        operator: LogicalOperator,
        left: &Expr,
        right: &Expr,
        data: &'b Value,
    ) -> Selection<'b> {
        let left = self.evaluate(left, data);
        match operator {
            LogicalOperator::And if !left.is_truthy() => Selection::empty(),
            LogicalOperator::Or if left.is_truthy() => left,
            LogicalOperator::And => left.intersect(self.evaluate(right, data)),
            LogicalOperator::Or => left.union(self.evaluate(right, data)),
        }
    }
}
