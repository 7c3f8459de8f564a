//! Copy-on-write cache of cryptographic providers
//!
//! A [`CryptographicStore`] maps a small integer id (usually a composite of
//! algorithm ids) to a shared provider instance. Reads are a single atomic
//! load. Writers build a new node and install it with compare-and-swap, so
//! the first writer for an id wins and every loser's instance is dropped.
//!
//! The node shape grows with the number of entries: inline slots for up to
//! three, a short vector up to [`MULTI_CAPACITY`], then a hash map.

use arc_swap::{ArcSwap, Guard};
use std::collections::HashMap;
use std::sync::Arc;

/// Largest entry count held in the linear-scan node
pub const MULTI_CAPACITY: usize = 16;

type Entry<V> = (u32, Arc<V>);

enum Node<V: ?Sized> {
    Empty,
    One(Entry<V>),
    Two([Entry<V>; 2]),
    Three([Entry<V>; 3]),
    Multi(Vec<Entry<V>>),
    Many(HashMap<u32, Arc<V>>),
}

fn find<V: ?Sized>(entries: &[Entry<V>], key: u32) -> Option<&Arc<V>> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

fn entry<V: ?Sized>(e: &Entry<V>) -> Entry<V> {
    (e.0, Arc::clone(&e.1))
}

impl<V: ?Sized> Node<V> {
    fn get(&self, key: u32) -> Option<&Arc<V>> {
        match self {
            Self::Empty => None,
            Self::One(e) => find(std::slice::from_ref(e), key),
            Self::Two(entries) => find(entries, key),
            Self::Three(entries) => find(entries, key),
            Self::Multi(entries) => find(entries, key),
            Self::Many(map) => map.get(&key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Two(_) => 2,
            Self::Three(_) => 3,
            Self::Multi(entries) => entries.len(),
            Self::Many(map) => map.len(),
        }
    }

    /// A new node holding every entry of `self` plus `(key, value)`
    fn with(&self, key: u32, value: Arc<V>) -> Self {
        match self {
            Self::Empty => Self::One((key, value)),
            Self::One(a) => Self::Two([entry(a), (key, value)]),
            Self::Two([a, b]) => Self::Three([entry(a), entry(b), (key, value)]),
            Self::Three(entries) => {
                let mut next: Vec<_> = entries.iter().map(entry).collect();
                next.push((key, value));
                Self::Multi(next)
            }
            Self::Multi(entries) if entries.len() < MULTI_CAPACITY => {
                let mut next = Vec::with_capacity(entries.len() + 1);
                next.extend(entries.iter().map(entry));
                next.push((key, value));
                Self::Multi(next)
            }
            Self::Multi(entries) => {
                let mut map: HashMap<_, _> = entries.iter().map(entry).collect();
                map.insert(key, value);
                Self::Many(map)
            }
            Self::Many(map) => {
                let mut map = map.clone();
                map.insert(key, value);
                Self::Many(map)
            }
        }
    }
}

/// Lock-free map from composite algorithm id to a shared provider
pub struct CryptographicStore<V: ?Sized> {
    root: ArcSwap<Node<V>>,
}

impl<V: ?Sized> CryptographicStore<V> {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ArcSwap::from_pointee(Node::Empty),
        }
    }

    /// Look up the provider registered under `key`
    pub fn get(&self, key: u32) -> Option<Arc<V>> {
        self.root.load().get(key).cloned()
    }

    /// Register `value` under `key` unless an entry already exists
    ///
    /// Returns `false` when another writer got there first; the caller's
    /// `value` is then dropped and the existing entry is kept.
    pub fn try_add(&self, key: u32, value: Arc<V>) -> bool {
        let mut current = self.root.load_full();
        loop {
            if current.get(key).is_some() {
                return false;
            }

            let next = Arc::new(current.with(key, Arc::clone(&value)));
            let previous = self.root.compare_and_swap(&current, next);
            if Arc::ptr_eq(&previous, &current) {
                return true;
            }
            current = Guard::into_inner(previous);
        }
    }

    /// Return the provider for `key`, creating it on a miss
    ///
    /// When two callers race, both may run `create` but only one instance
    /// is kept and returned to both.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `create`.
    pub fn get_or_insert_with<E, F>(&self, key: u32, create: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<Arc<V>, E>,
    {
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }

        let created = create()?;
        if self.try_add(key, Arc::clone(&created)) {
            return Ok(created);
        }
        Ok(self.get(key).unwrap_or(created))
    }

    /// Number of registered providers
    pub fn count(&self) -> usize {
        self.root.load().len()
    }

    /// Drop every registered provider
    pub fn clear(&self) {
        self.root.store(Arc::new(Node::Empty));
    }
}

impl<V: ?Sized> Default for CryptographicStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> std::fmt::Debug for CryptographicStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptographicStore")
            .field("count", &self.count())
            .finish()
    }
}
