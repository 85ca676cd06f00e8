//! Strikes of composite resources, routing each glyph code to its slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::{FontStrikeDescriptor, Glyph, Strike, StrikeCache};
use crate::composite::CompositeFontResource;
use crate::face::{FontMetrics, GlyphImage};
use crate::glyph_code::GlyphCode;

/// Rendering state for a composite font at one descriptor.
///
/// Holds one underlying [`Strike`] per slot, created the first time a glyph
/// from that slot is requested.
pub struct CompositeStrike {
    resource: Arc<CompositeFontResource>,
    desc: FontStrikeDescriptor,
    cache: StrikeCache,
    slots: RwLock<Vec<Option<Arc<Strike>>>>,
    disposed: AtomicBool,
}

impl std::fmt::Debug for CompositeStrike {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeStrike")
            .field("font", &self.resource.full_name())
            .field("desc", &self.desc)
            .field("materialized_slots", &self.materialized_slots())
            .finish()
    }
}

impl CompositeStrike {
    pub(crate) fn new(
        resource: Arc<CompositeFontResource>,
        desc: FontStrikeDescriptor,
        cache: StrikeCache,
    ) -> Self {
        Self {
            resource,
            desc,
            cache,
            slots: RwLock::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn descriptor(&self) -> &FontStrikeDescriptor {
        &self.desc
    }

    pub fn resource(&self) -> &Arc<CompositeFontResource> {
        &self.resource
    }

    /// Underlying strike for `slot`, created through the strike cache on
    /// first use.
    ///
    /// # Panics
    /// If `slot` is not below the composite's slot count.
    pub fn strike_for_slot(&self, slot: u8) -> Arc<Strike> {
        let index = slot as usize;
        let num_slots = self.resource.num_slots();
        assert!(
            index < num_slots,
            "glyph slot {slot} out of range for '{}' ({num_slots} slots)",
            self.resource.full_name()
        );

        if let Some(Some(strike)) = self.slots.read().get(index) {
            return Arc::clone(strike);
        }

        let physical = self.resource.slot_resource(slot);
        let strike = self.cache.physical_strike(&physical, self.desc);

        let mut slots = self.slots.write();
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        Arc::clone(slots[index].get_or_insert(strike))
    }

    pub fn glyph(&self, code: GlyphCode) -> Arc<Glyph> {
        self.strike_for_slot(code.slot()).glyph(code.local())
    }

    pub fn glyph_image(&self, code: GlyphCode) -> Option<Arc<GlyphImage>> {
        self.strike_for_slot(code.slot()).glyph_image(code.local())
    }

    /// Metrics of the primary resource; fallbacks never affect line metrics.
    pub fn metrics(&self) -> FontMetrics {
        self.strike_for_slot(0).metrics()
    }

    /// Number of slots whose underlying strike has been created.
    pub fn materialized_slots(&self) -> usize {
        self.slots.read().iter().filter(|s| s.is_some()).count()
    }

    /// Detach this strike and its slot-0 strike from their cache entries.
    ///
    /// Fallback strikes are shared with every other composite that uses the
    /// same fallback resource, so their cache entries stay. This strike only
    /// drops its own handles to them, which lets the next sweep reclaim any
    /// that nobody else holds.
    pub fn clear_desc(&self) {
        self.resource.strikes().remove_if_current(&self.desc, self);
        let primary = self.slots.read().first().cloned().flatten();
        if let Some(primary) = primary {
            primary.clear_desc();
        }
        let mut slots = self.slots.write();
        slots.truncate(1);
    }

    pub(crate) fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            self.slots.write().clear();
            log::trace!(
                "Disposed composite strike for '{}' at {}px",
                self.resource.full_name(),
                self.desc.size()
            );
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
