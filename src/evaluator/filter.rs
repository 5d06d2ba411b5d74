use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use regex::Regex;
use serde_json::Value;

use crate::ast::filter::{stringify, Filter};

/// Tests filters against items, compiling `~` patterns on first use
///
/// Patterns are cached by their text. A pattern that fails to compile is cached as well, and
/// never matches.
#[derive(Debug, Default)]
pub(crate) struct FilterEvaluator {
    patterns: Mutex<HashMap<String, Option<Regex>>>,
}

impl FilterEvaluator {
    pub(crate) fn test(&self, filter: &Filter, item: &Value) -> bool {
        match filter {
            Filter::Existence(existence) => existence.test(item),
            Filter::Comparison(comparison) => {
                let resolved = comparison.path.resolve(item);
                match comparison.operator.compare(resolved, &comparison.value) {
                    Some(result) => result,
                    None => self
                        .regex(&comparison.value.to_pattern())
                        .map_or(false, |re| re.is_match(&stringify(resolved))),
                }
            }
        }
    }

    fn regex(&self, pattern: &str) -> Option<Regex> {
        let mut patterns = self
            .patterns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(re) = patterns.get(pattern) {
            return re.clone();
        }
        let re = match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(_error) => {
                #[cfg(feature = "trace")]
                tracing::warn!(pattern, error = %_error, "invalid filter pattern");
                None
            }
        };
        patterns.insert(pattern.to_owned(), re.clone());
        re
    }

    /// The number of distinct patterns compiled so far
    pub(crate) fn compiled_patterns(&self) -> usize {
        self.patterns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
