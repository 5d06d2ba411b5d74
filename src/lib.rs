//! This crate lets you extract values out of a [`serde_json::Value`] with a small selector
//! language.
//!
//! # Features
//!
//! This crate provides these key abstractions:
//!
//! * The [`Selector`] struct, which represents compiled selector text.
//! * The [`Selection`] and [`NodeList`] types, which represent the result of evaluating a
//!   selector against a [`serde_json::Value`].
//! * The [`SelectorCache`] struct, a bounded, thread-safe store of compiled selectors keyed by
//!   their text.
//!
//! In addition, the [`SelectorExt`] trait is provided, which extends the [`serde_json::Value`]
//! type with the [`select`][SelectorExt::select] method.
//!
//! # Usage
//!
//! ## Member access
//!
//! Property names are joined with `.`:
//!
//! ```rust
//! use serde_json::json;
//! use json_selector::Selector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!({ "user": { "name": "John" } });
//! let selector = Selector::parse("user.name")?;
//! let node = selector.query(&value).exactly_one()?;
//! assert_eq!(node, "John");
//! # Ok(())
//! # }
//! ```
//!
//! When a property holds an array, its elements are spliced into the result:
//!
//! ```rust
//! # use serde_json::json;
//! # use json_selector::Selector;
//! # fn main() -> Result<(), json_selector::ParseError> {
//! let value = json!({ "users": [{ "name": "Ann" }, { "name": "Bob" }] });
//! let nodes = Selector::parse("users.name")?.query(&value).all();
//! assert_eq!(nodes, vec!["Ann", "Bob"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Wildcards (`*` and `**`)
//!
//! `*` selects every element of an array, or every member value of an object. `**` visits
//! every value at any depth, and keeps those that satisfy its filter:
//!
//! ```rust
//! # use serde_json::json;
//! # use json_selector::Selector;
//! # fn main() -> Result<(), json_selector::ParseError> {
//! let value = json!({ "a": { "id": 1, "b": [{ "id": 1 }, { "id": 2 }] } });
//! let nodes = Selector::parse("**[id=1]")?.query(&value);
//! assert_eq!(nodes.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Slices (`[start:end:step]`)
//!
//! Any part of a slice may be omitted. Negative bounds count from the end of the array, and a
//! negative step reverses the selection:
//!
//! ```rust
//! # use serde_json::json;
//! # use json_selector::Selector;
//! # fn main() -> Result<(), json_selector::ParseError> {
//! let value = json!({ "arr": [0, 1, 2, 3, 4] });
//! assert_eq!(Selector::parse("arr[1:3]")?.query(&value).all(), vec![1, 2]);
//! assert_eq!(Selector::parse("arr[-2:]")?.query(&value).all(), vec![3, 4]);
//! assert_eq!(Selector::parse("arr[::-1]")?.query(&value).all(), vec![4, 3, 2, 1, 0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Filters (`[path op value]` and `[path]`)
//!
//! A filter keeps the items for which the value at a dotted path compares to a literal with
//! one of `=`, `>`, `<`, `>=`, `<=` or `~` (regular expression match), or, with no operator,
//! the items on which the path exists:
//!
//! ```rust
//! # use serde_json::json;
//! # use json_selector::Selector;
//! # fn main() -> Result<(), json_selector::ParseError> {
//! let value = json!({ "items": [
//!     { "price": 5, "tag": "sale" },
//!     { "price": 20 }
//! ]});
//! let nodes = Selector::parse("items[price>10]")?.query(&value).all();
//! assert_eq!(nodes, vec![&json!({ "price": 20 })]);
//! let nodes = Selector::parse("items[tag].price")?.query(&value).all();
//! assert_eq!(nodes, vec![5]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Boolean composition (`&`, `|`, `!`)
//!
//! `a & b` selects the values selected by both sides, and `a | b` those selected by either.
//! `&` binds tighter than `|`, and `( )` groups. `!a` is `true` when `a` selects nothing.
//!
//! ```rust
//! # use serde_json::json;
//! # use json_selector::Selector;
//! # fn main() -> Result<(), json_selector::ParseError> {
//! let value = json!({ "items": [{ "p": 5, "s": true }, { "p": 20, "s": true }, { "p": 30 }] });
//! let nodes = Selector::parse("items[p>10] & items[s]")?.query(&value).all();
//! assert_eq!(nodes, vec![&json!({ "p": 20, "s": true })]);
//! let nodes = Selector::parse("missing | items[p=30].p")?.query(&value).all();
//! assert_eq!(nodes, vec![30]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Caching compiled selectors
//!
//! Parsing can be skipped for selector text seen before by going through a [`SelectorCache`].
//! The [`select`] function does so, and reports any failure as `None`:
//!
//! ```rust
//! # use serde_json::json;
//! use json_selector::{select, SelectOptions, SelectorCache};
//!
//! let cache = SelectorCache::new(64);
//! let value = json!({ "user": { "name": "John" } });
//! let nodes = select(&cache, "user.name", &value, &SelectOptions::default()).unwrap();
//! assert_eq!(nodes.first().unwrap(), "John");
//! assert!(select(&cache, "user.(name", &value, &SelectOptions::default()).is_none());
//! ```
//!
//! # Feature Flags
//!
//! The following feature flags are supported:
//!
//! - `trace` - Enable internal tracing via [tracing](https://docs.rs/tracing/latest/tracing/)

#![warn(
    clippy::all,
    clippy::dbg_macro,
    clippy::todo,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::mem_forget,
    clippy::unused_self,
    clippy::filter_map_next,
    clippy::needless_continue,
    clippy::needless_borrow,
    clippy::match_wildcard_for_single_variants,
    clippy::if_let_mutex,
    clippy::mismatched_target_os,
    clippy::await_holding_lock,
    clippy::match_on_vec_items,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::lossy_float_literal,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::fn_params_excessive_bools,
    clippy::exit,
    clippy::inefficient_to_string,
    clippy::linkedlist,
    clippy::macro_use_imports,
    clippy::option_option,
    clippy::verbose_file_reads,
    clippy::unnested_or_patterns,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style
)]
#![forbid(unsafe_code)]

use serde::Deserialize;
use serde_json::Value;

pub mod ast;
mod cache;
mod error;
mod evaluator;
mod ext;
mod node;
mod parser;
mod selector;

#[doc(inline)]
pub use cache::{CacheConfig, SelectorCache, DEFAULT_CAPACITY};
#[doc(inline)]
pub use error::{ParseError, ParseErrorKind};
#[doc(inline)]
pub use ext::SelectorExt;
#[doc(inline)]
pub use node::{AtMostOneError, ExactlyOneError, NodeList, Selection};
#[doc(inline)]
pub use parser::MAX_NESTING_DEPTH;
#[doc(inline)]
pub use selector::Selector;

/// Options accepted by [`select`]
///
/// There are currently no options; an empty configuration is always valid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[non_exhaustive]
pub struct SelectOptions {}

/// Select values out of `data`, compiling `selector` through `cache`
///
/// Returns `None` when the selector fails to parse, or when it selects no nodes. A negation
/// always answers, so `!a` gives `[false]` when `a` exists. Use [`SelectorCache::select`] to
/// get at the parse error instead.
pub fn select<'b>(
    cache: &SelectorCache,
    selector: &str,
    data: &'b Value,
    _options: &SelectOptions,
) -> Option<NodeList<'b>> {
    match cache.select(selector, data) {
        Ok(Selection::Nodes(nodes)) if nodes.is_empty() => None,
        Ok(selection) => Some(selection.into_node_list()),
        Err(_error) => {
            #[cfg(feature = "trace")]
            tracing::debug!(selector, error = %_error, "selector failed to parse");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_value, json};
    #[cfg(feature = "trace")]
    use test_log::test;

    use crate::{select, SelectOptions, SelectorCache};

    #[test]
    fn select_swallows_errors() {
        let cache = SelectorCache::new(8);
        let value = json!({"a": {"b": {"c": 1}}});
        assert!(select(&cache, "a.b(.c)", &value, &SelectOptions::default()).is_none());
        assert!(select(&cache, "[x]", &value, &SelectOptions::default()).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn select_not_found() {
        let cache = SelectorCache::new(8);
        let value = json!({"a": 1});
        assert!(select(&cache, "b", &value, &SelectOptions::default()).is_none());
        assert!(select(&cache, "b & a", &value, &SelectOptions::default()).is_none());
        let nodes = select(&cache, "!b", &value, &SelectOptions::default()).unwrap();
        assert_eq!(nodes.all(), vec![true]);
    }

    #[test]
    fn select_answers_false() {
        let cache = SelectorCache::new(8);
        let value = json!({"a": 1, "z": 0});
        let nodes = select(&cache, "!a", &value, &SelectOptions::default()).unwrap();
        assert_eq!(nodes.all(), vec![false]);
        let nodes = select(&cache, "z", &value, &SelectOptions::default()).unwrap();
        assert_eq!(nodes.all(), vec![0]);
    }

    #[test]
    fn select_absorbs_deep_nesting() {
        let cache = SelectorCache::new(8);
        let value = json!({"a": 1});
        let options = SelectOptions::default();
        let deep = format!("{}a{}", "(".repeat(5000), ")".repeat(5000));
        assert!(select(&cache, &deep, &value, &options).is_none());
        let negations = format!("{}a", "!".repeat(200_000));
        assert!(select(&cache, &negations, &value, &options).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn empty_options_deserialize() {
        let options: SelectOptions = from_value(json!({})).unwrap();
        assert_eq!(options, SelectOptions::default());
    }
}
