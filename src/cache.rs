//! A bounded cache of compiled selectors
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::Deserialize;
use serde_json::Value;

use crate::{error::ParseError, node::Selection, Selector};

/// The capacity of a [`SelectorCache`] created with [`Default`]
pub const DEFAULT_CAPACITY: usize = 1000;

/// Configuration for a [`SelectorCache`]
///
/// All fields are optional when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// The maximum number of compiled selectors held at once
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Compiled selectors keyed by their source text
///
/// The cache holds at most `capacity` selectors. Inserting a new selector into a full cache
/// first evicts the least recently used one, where using means [inserting][SelectorCache::insert]
/// or [getting][SelectorCache::get] it; [`contains`][SelectorCache::contains] does not count.
///
/// The cache is safe to share between threads, and compiled selectors are handed out behind an
/// [`Arc`].
///
/// # Usage
/// ```rust
/// # use serde_json::json;
/// # use json_selector::SelectorCache;
/// # fn main() -> Result<(), json_selector::ParseError> {
/// let cache = SelectorCache::new(100);
/// let value = json!({"user": {"name": "John"}});
/// let selection = cache.select("user.name", &value)?;
/// assert_eq!(selection.into_node_list().exactly_one().unwrap(), "John");
/// assert!(cache.contains("user.name"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SelectorCache {
    capacity: usize,
    inner: Mutex<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    /// Logical clock, advanced on every use
    clock: u64,
}

#[derive(Debug)]
struct Entry {
    selector: Arc<Selector>,
    last_used: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Store `compiled` under `key`, evicting first when a new key would exceed `capacity`
    fn insert(&mut self, key: String, compiled: Arc<Selector>, capacity: usize) {
        if !self.map.contains_key(&key) && self.map.len() >= capacity {
            self.evict_least_recent();
        }
        let last_used = self.tick();
        self.map.insert(
            key,
            Entry {
                selector: compiled,
                last_used,
            },
        );
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            #[cfg(feature = "trace")]
            tracing::debug!(selector = %key, "evicting least recently used selector");
            self.map.remove(&key);
        }
    }
}

impl SelectorCache {
    /// Create a cache holding at most `capacity` selectors
    ///
    /// A capacity of zero stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Entries::default()),
        }
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the compiled selector for `selector`, marking it as recently used
    pub fn get(&self, selector: &str) -> Option<Arc<Selector>> {
        let mut entries = self.entries();
        let now = entries.tick();
        entries.map.get_mut(selector).map(|entry| {
            entry.last_used = now;
            Arc::clone(&entry.selector)
        })
    }

    /// Check for `selector` without marking it as used
    pub fn contains(&self, selector: &str) -> bool {
        self.entries().map.contains_key(selector)
    }

    /// Store a compiled selector under its source text
    ///
    /// Replacing an existing entry never evicts another one.
    pub fn insert(&self, selector: impl Into<String>, compiled: Arc<Selector>) {
        if self.capacity == 0 {
            return;
        }
        self.entries().insert(selector.into(), compiled, self.capacity);
    }

    /// Get the compiled selector for `selector`, parsing and storing it on a miss
    ///
    /// Selector text that fails to parse is never stored. Parsing happens outside the lock; when
    /// another thread stores the same text in the meantime, its selector is returned instead, so
    /// every caller shares one compiled selector per entry.
    pub fn compile(&self, selector: &str) -> Result<Arc<Selector>, ParseError> {
        if let Some(compiled) = self.get(selector) {
            return Ok(compiled);
        }
        let compiled = Arc::new(Selector::parse(selector)?);
        if self.capacity == 0 {
            return Ok(compiled);
        }
        let mut entries = self.entries();
        let now = entries.tick();
        if let Some(entry) = entries.map.get_mut(selector) {
            entry.last_used = now;
            return Ok(Arc::clone(&entry.selector));
        }
        entries.insert(selector.to_owned(), Arc::clone(&compiled), self.capacity);
        Ok(compiled)
    }

    /// Compile `selector` through the cache and evaluate it against `data`
    pub fn select<'b>(&self, selector: &str, data: &'b Value) -> Result<Selection<'b>, ParseError> {
        Ok(self.compile(selector)?.evaluate(data))
    }

    /// The number of selectors currently held
    pub fn len(&self) -> usize {
        self.entries().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every stored selector
    pub fn clear(&self) {
        self.entries().map.clear();
    }
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
