//! Strike acquisition, retention and scheduled sweeps.
//!
//! Strikes live in the strike map of the resource they belong to. This type
//! adds the policy around those maps: a small LRU of recently acquired
//! strikes that survive sweeps, and a counter that sweeps a resource's map
//! every `sweep_interval` acquisitions.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fontweft_config::{AntiAliasMode, FontConfig};
use lru::LruCache;
use parking_lot::Mutex;

use super::{CompositeStrike, FontStrike, FontStrikeDescriptor, Strike};
use crate::composite::CompositeFontResource;
use crate::resource::{FontResource, PhysicalFontResource};

type RetainKey = (usize, FontStrikeDescriptor);

struct StrikeCacheInner {
    retained: Option<Mutex<LruCache<RetainKey, FontStrike>>>,
    sweep_interval: u64,
    acquisitions: AtomicU64,
}

/// Shared strike cache policy. Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct StrikeCache {
    inner: Arc<StrikeCacheInner>,
}

impl std::fmt::Debug for StrikeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrikeCache")
            .field("retained", &self.retained_len())
            .field("sweep_interval", &self.inner.sweep_interval)
            .finish()
    }
}

impl StrikeCache {
    /// `retained` is the LRU capacity (0 disables retention); `sweep_interval`
    /// is the number of acquisitions between automatic sweeps (0 disables them).
    pub fn new(retained: usize, sweep_interval: u32) -> Self {
        Self {
            inner: Arc::new(StrikeCacheInner {
                retained: NonZeroUsize::new(retained).map(|cap| Mutex::new(LruCache::new(cap))),
                sweep_interval: sweep_interval as u64,
                acquisitions: AtomicU64::new(0),
            }),
        }
    }

    pub fn from_config(config: &FontConfig) -> Self {
        Self::new(config.retained_strikes, config.sweep_interval)
    }

    /// Strike for `resource` at `size`, `transform` and `antialias`.
    pub fn get_strike(
        &self,
        resource: &FontResource,
        size: f32,
        transform: [f32; 4],
        antialias: AntiAliasMode,
    ) -> FontStrike {
        self.strike(resource, FontStrikeDescriptor::new(size, transform, antialias))
    }

    /// Strike for `resource` at `desc`.
    ///
    /// Returns the cached strike while any handle to it is alive; once every
    /// handle is gone and a sweep has run, a new strike is built.
    pub fn strike(&self, resource: &FontResource, desc: FontStrikeDescriptor) -> FontStrike {
        let strike = match resource {
            FontResource::Physical(physical) => {
                FontStrike::Physical(self.physical_strike(physical, desc))
            }
            FontResource::Composite(composite) => {
                FontStrike::Composite(self.composite_strike(composite, desc))
            }
        };

        if let Some(retained) = &self.inner.retained {
            let evicted = retained
                .lock()
                .push((resource.identity(), desc), strike.clone());
            drop(evicted);
        }

        let count = self.inner.acquisitions.fetch_add(1, Ordering::Relaxed) + 1;
        if self.inner.sweep_interval > 0 && count % self.inner.sweep_interval == 0 {
            let evicted = sweep_resource(resource);
            if evicted > 0 {
                log::debug!(
                    "Scheduled sweep evicted {} strikes from '{}'",
                    evicted,
                    resource.full_name()
                );
            }
        }
        strike
    }

    /// Underlying strike for a physical resource. Not retained; composites use
    /// this for their per-slot strikes and hold the handles themselves.
    pub fn physical_strike(
        &self,
        resource: &Arc<PhysicalFontResource>,
        desc: FontStrikeDescriptor,
    ) -> Arc<Strike> {
        let (strike, created) = resource
            .strikes()
            .get_or_insert_with(desc, || Strike::new(Arc::clone(resource), desc));
        if created {
            log::debug!(
                "New strike for '{}' at {}px ({:?})",
                resource.full_name(),
                desc.size(),
                desc.antialias()
            );
        }
        strike
    }

    pub fn composite_strike(
        &self,
        resource: &Arc<CompositeFontResource>,
        desc: FontStrikeDescriptor,
    ) -> Arc<CompositeStrike> {
        let (strike, created) = resource.strikes().get_or_insert_with(desc, || {
            CompositeStrike::new(Arc::clone(resource), desc, self.clone())
        });
        if created {
            log::debug!(
                "New composite strike for '{}' at {}px ({:?})",
                resource.full_name(),
                desc.size(),
                desc.antialias()
            );
        }
        strike
    }

    /// Drop every retained handle. Returns how many were released.
    pub fn release_retained(&self) -> usize {
        match &self.inner.retained {
            Some(retained) => {
                let mut retained = retained.lock();
                let n = retained.len();
                retained.clear();
                n
            }
            None => 0,
        }
    }

    /// Drop retained handles that belong to `resource`.
    pub fn release_retained_for(&self, resource: &FontResource) {
        if let Some(retained) = &self.inner.retained {
            let identity = resource.identity();
            let mut retained = retained.lock();
            let keys: Vec<RetainKey> = retained
                .iter()
                .filter(|((id, _), _)| *id == identity)
                .map(|(key, _)| *key)
                .collect();
            for key in keys {
                retained.pop(&key);
            }
        }
    }

    pub fn retained_len(&self) -> usize {
        self.inner
            .retained
            .as_ref()
            .map(|retained| retained.lock().len())
            .unwrap_or(0)
    }
}

/// Sweep the strike map of `resource`, disposing evicted strikes.
///
/// For a composite, its own strikes go first so the slot strikes they
/// released can be reclaimed in the same pass.
pub fn sweep_resource(resource: &FontResource) -> usize {
    match resource {
        FontResource::Physical(physical) => sweep_physical(physical),
        FontResource::Composite(composite) => {
            let evicted = composite.strikes().sweep();
            for strike in &evicted {
                strike.dispose();
            }
            let mut total = evicted.len();
            drop(evicted);
            for physical in composite.materialized_slot_resources() {
                total += sweep_physical(&physical);
            }
            total
        }
    }
}

pub(crate) fn sweep_physical(resource: &PhysicalFontResource) -> usize {
    let evicted = resource.strikes().sweep();
    for strike in &evicted {
        strike.dispose();
    }
    evicted.len()
}
