//! Fallback chains: the ordered slot list behind a composite resource.
//!
//! Slot 0 is the primary resource. Slots 1.. are the linked fallbacks the
//! platform directory offers for the primary, followed by "native" fallbacks
//! appended on demand through [`FallbackChain::slot_for_font`]. Linked
//! fallbacks are discovered once and materialized one at a time, the first
//! time their slot is addressed.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::face::FontFile;
use crate::factory::FontFactory;
use crate::glyph_code::MAX_SLOTS;
use crate::resource::PhysicalFontResource;

#[derive(Debug)]
struct FallbackSlot {
    name: String,
    /// Unmaterialized linked fallback.
    file: Option<FontFile>,
    resource: Option<Arc<PhysicalFontResource>>,
}

#[derive(Debug, Default)]
struct ChainState {
    discovered: bool,
    /// Slots 1.., index `i` holds slot `i + 1`.
    slots: Vec<FallbackSlot>,
}

pub struct FallbackChain {
    primary: Arc<PhysicalFontResource>,
    factory: Arc<FontFactory>,
    state: RwLock<ChainState>,
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("FallbackChain")
            .field("primary", &self.primary.full_name())
            .field("discovered", &state.discovered)
            .field(
                "slots",
                &state.slots.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FallbackChain {
    pub fn new(primary: Arc<PhysicalFontResource>, factory: Arc<FontFactory>) -> Self {
        Self {
            primary,
            factory,
            state: RwLock::new(ChainState::default()),
        }
    }

    pub fn primary(&self) -> &Arc<PhysicalFontResource> {
        &self.primary
    }

    fn discover(&self, state: &mut ChainState) {
        if state.discovered {
            return;
        }
        state.discovered = true;

        let mut candidates = self.factory.directory().linked_fallbacks(&self.primary);
        if candidates.len() > MAX_SLOTS - 1 {
            log::warn!(
                "'{}' has {} linked fallbacks, keeping the first {}",
                self.primary.full_name(),
                candidates.len(),
                MAX_SLOTS - 1
            );
            candidates.truncate(MAX_SLOTS - 1);
        }

        let existing = std::mem::take(&mut state.slots);
        for candidate in candidates {
            log::debug!(
                "Fallback slot {} for '{}': {} ({})",
                state.slots.len() + 1,
                self.primary.full_name(),
                candidate.name,
                candidate.file.describe()
            );
            state.slots.push(FallbackSlot {
                name: candidate.name,
                file: Some(candidate.file),
                resource: None,
            });
        }
        state.slots.extend(existing);
    }

    fn ensure_discovered(&self) {
        if !self.state.read().discovered {
            let mut state = self.state.write();
            self.discover(&mut state);
        }
    }

    /// Number of slots, including the primary.
    pub fn num_slots(&self) -> usize {
        self.ensure_discovered();
        self.state.read().slots.len() + 1
    }

    /// Resource in `slot`, loading a linked fallback on first use.
    ///
    /// A linked fallback that fails to load is logged and served by the
    /// primary, so the slot stays valid.
    ///
    /// # Panics
    /// If `slot` is not below [`num_slots`](Self::num_slots).
    pub fn slot_resource(&self, slot: u8) -> Arc<PhysicalFontResource> {
        if slot == 0 {
            return Arc::clone(&self.primary);
        }
        self.ensure_discovered();

        let index = slot as usize - 1;
        let file = {
            let state = self.state.read();
            let num_slots = state.slots.len() + 1;
            let Some(entry) = state.slots.get(index) else {
                panic!(
                    "slot {slot} out of range for '{}' ({num_slots} slots)",
                    self.primary.full_name()
                );
            };
            if let Some(resource) = &entry.resource {
                return Arc::clone(resource);
            }
            entry.file.clone()
        };

        let loaded = match &file {
            Some(file) => self.factory.resource_for_file(file),
            None => None,
        };
        let resource = loaded.unwrap_or_else(|| {
            log::warn!(
                "Fallback slot {} of '{}' could not be loaded, using the primary",
                slot,
                self.primary.full_name()
            );
            Arc::clone(&self.primary)
        });

        let mut state = self.state.write();
        let entry = &mut state.slots[index];
        entry.file = None;
        Arc::clone(entry.resource.get_or_insert(resource))
    }

    /// Slot for the font called `name`, appending it as a native fallback
    /// when the chain does not have it yet.
    ///
    /// Returns `None` when the font cannot be resolved or the chain already
    /// has [`MAX_SLOTS`] slots. Lookup and append happen under one lock, so
    /// concurrent callers never add the same name twice.
    pub fn slot_for_font(&self, name: &str) -> Option<u8> {
        if self.primary.full_name().eq_ignore_ascii_case(name) {
            return Some(0);
        }

        let mut state = self.state.write();
        self.discover(&mut state);

        let found = state.slots.iter().position(|slot| {
            slot.name.eq_ignore_ascii_case(name)
                || slot
                    .resource
                    .as_ref()
                    .is_some_and(|r| r.full_name().eq_ignore_ascii_case(name))
        });
        if let Some(index) = found {
            return Some((index + 1) as u8);
        }

        let num_slots = state.slots.len() + 1;
        if num_slots >= MAX_SLOTS {
            log::warn!(
                "No fallback slot left for '{}' in '{}' ({} slots in use)",
                name,
                self.primary.full_name(),
                num_slots
            );
            return None;
        }

        let resource = self.factory.resource_for_name(name)?;
        if *resource == *self.primary {
            return Some(0);
        }
        let key = resource.file().key();
        if let Some(index) = state.slots.iter().position(|slot| match &slot.resource {
            Some(existing) => existing.file().key() == key,
            None => slot.file.as_ref().is_some_and(|file| file.key() == key),
        }) {
            let entry = &mut state.slots[index];
            if entry.resource.is_none() {
                entry.file = None;
                entry.resource = Some(resource);
            }
            return Some((index + 1) as u8);
        }

        log::debug!(
            "Appended native fallback '{}' to '{}' at slot {}",
            name,
            self.primary.full_name(),
            num_slots
        );
        state.slots.push(FallbackSlot {
            name: name.to_string(),
            file: None,
            resource: Some(resource),
        });
        Some(num_slots as u8)
    }

    /// Resources whose slots have been materialized, primary first.
    pub fn materialized_resources(&self) -> Vec<Arc<PhysicalFontResource>> {
        let state = self.state.read();
        let mut resources = vec![Arc::clone(&self.primary)];
        for resource in state.slots.iter().filter_map(|slot| slot.resource.as_ref()) {
            if !resources.iter().any(|r| Arc::ptr_eq(r, resource)) {
                resources.push(Arc::clone(resource));
            }
        }
        resources
    }
}
