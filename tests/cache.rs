use std::{sync::Arc, thread};

use json_selector::{select, SelectOptions, Selector, SelectorCache};
use serde_json::json;
use test_log::test;

#[test]
fn cached_and_fresh_selectors_agree() {
    let value = json!({
        "items": [
            {"name": "apple", "price": 3},
            {"name": "banana", "price": 12},
            {"name": "cherry", "price": 30}
        ]
    });
    let cache = SelectorCache::new(2);
    let selectors = [
        "items[price>10].name",
        "items[name~an]",
        "items[1:]",
        "**[price<5] | items",
        "items[price>10].name",
    ];
    for s in selectors {
        let fresh = Selector::parse(s).unwrap().evaluate(&value);
        assert_eq!(cache.select(s, &value).unwrap(), fresh, "{s}");
        // second lookup may be served from the cache
        assert_eq!(cache.select(s, &value).unwrap(), fresh, "{s}");
    }
    assert!(cache.len() <= 2);
}

#[test]
fn select_user_name() {
    let cache = SelectorCache::default();
    let value = json!({"user": {"name": "John"}});
    let nodes = select(&cache, "user.name", &value, &SelectOptions::default()).unwrap();
    assert_eq!(nodes.exactly_one().unwrap(), "John");
    assert!(cache.contains("user.name"));
}

#[test]
fn select_reports_failures_as_none() {
    let cache = SelectorCache::default();
    let value = json!({"a": {"b": {"c": 1}}});
    let options = SelectOptions::default();
    assert!(select(&cache, "a.b(.c)", &value, &options).is_none());
    assert!(select(&cache, "a.x", &value, &options).is_none());
    assert_eq!(
        select(&cache, "a.b.c", &value, &options).unwrap().all(),
        vec![1]
    );
}

#[test]
fn eviction_order() {
    let cache = SelectorCache::new(2);
    cache.compile("a").unwrap();
    cache.compile("b").unwrap();
    cache.get("a");
    cache.compile("c").unwrap();
    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    cache.compile("d").unwrap();
    assert!(!cache.contains("a"));
    assert!(cache.contains("c"));
    assert!(cache.contains("d"));
}

#[test]
fn short_circuit_skips_pattern_compilation() {
    let value = json!({"items": [{"name": "ab"}]});
    let selector = Selector::parse("missing & items[name~^a]").unwrap();
    assert!(!selector.evaluate(&value).is_truthy());
    assert_eq!(selector.compiled_patterns(), 0);
    let selector = Selector::parse("items & items[name~^a]").unwrap();
    assert!(selector.evaluate(&value).is_truthy());
    assert_eq!(selector.compiled_patterns(), 1);
}

#[test]
fn shared_between_threads() {
    let cache = Arc::new(SelectorCache::new(8));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let value = json!({"n": [0, 1, 2, 3], "k": i});
                for _ in 0..100 {
                    let nodes = cache.select("n[1:3] | k", &value).unwrap();
                    assert_eq!(nodes.into_node_list().all(), vec![1, 2]);
                    let nodes = cache.select("k", &value).unwrap();
                    assert_eq!(nodes.into_node_list().all(), vec![i]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread completes");
    }
    assert_eq!(cache.len(), 2);
}
