//! Per-resource strike maps.
//!
//! A map owns one strong handle to every strike it holds. A strike is
//! reachable while anybody else holds a handle too; `sweep` evicts the ones
//! that are not, re-checking each candidate under the write lock so that an
//! entry re-acquired or replaced in the meantime is left alone.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::FontStrikeDescriptor;

pub struct StrikeMap<S> {
    entries: RwLock<HashMap<FontStrikeDescriptor, Arc<S>>>,
}

impl<S> Default for StrikeMap<S> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<S> StrikeMap<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, desc: &FontStrikeDescriptor) -> Option<Arc<S>> {
        self.entries.read().get(desc).cloned()
    }

    /// Return the live strike for `desc`, creating it if absent.
    ///
    /// The boolean is true when this call created the strike.
    pub fn get_or_insert_with(
        &self,
        desc: FontStrikeDescriptor,
        create: impl FnOnce() -> S,
    ) -> (Arc<S>, bool) {
        if let Some(strike) = self.entries.read().get(&desc) {
            return (Arc::clone(strike), false);
        }
        let mut entries = self.entries.write();
        let mut created = false;
        let strike = entries.entry(desc).or_insert_with(|| {
            created = true;
            Arc::new(create())
        });
        (Arc::clone(strike), created)
    }

    /// Remove the entry for `desc` only if it is still `strike`.
    pub fn remove_if_current(&self, desc: &FontStrikeDescriptor, strike: &S) -> bool {
        let mut entries = self.entries.write();
        let current = entries
            .get(desc)
            .is_some_and(|cur| std::ptr::eq(Arc::as_ptr(cur), strike));
        if current {
            entries.remove(desc);
        }
        current
    }

    /// Evict strikes no handle outside this map refers to.
    pub fn sweep(&self) -> Vec<Arc<S>> {
        let candidates: Vec<(FontStrikeDescriptor, usize)> = self
            .entries
            .read()
            .iter()
            .filter(|(_, strike)| Arc::strong_count(strike) == 1)
            .map(|(desc, strike)| (*desc, Arc::as_ptr(strike) as usize))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        // Handles are only cloned out of the map under the read lock, so a
        // count of 1 observed here cannot grow before the entry is removed.
        let mut entries = self.entries.write();
        let mut evicted = Vec::new();
        for (desc, addr) in candidates {
            let unreachable = entries.get(&desc).is_some_and(|cur| {
                Arc::as_ptr(cur) as usize == addr && Arc::strong_count(cur) == 1
            });
            if unreachable && let Some(strike) = entries.remove(&desc) {
                evicted.push(strike);
            }
        }
        evicted
    }

    /// Remove every entry regardless of reachability.
    pub fn drain(&self) -> Vec<Arc<S>> {
        self.entries.write().drain().map(|(_, strike)| strike).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
