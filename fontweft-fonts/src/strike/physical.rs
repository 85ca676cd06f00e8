//! Strikes of a single physical resource and the glyphs they cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::FontStrikeDescriptor;
use crate::face::{FontMetrics, GlyphBounds, GlyphImage, GlyphMetrics};
use crate::resource::PhysicalFontResource;

/// A glyph at one strike: metrics up front, pixels on first request.
#[derive(Debug)]
pub struct Glyph {
    id: u32,
    metrics: GlyphMetrics,
    image: OnceLock<Option<Arc<GlyphImage>>>,
}

impl Glyph {
    /// Local glyph id within the owning resource.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn advance(&self) -> f32 {
        self.metrics.advance
    }

    pub fn bounds(&self) -> GlyphBounds {
        self.metrics.bounds
    }

    pub fn metrics(&self) -> GlyphMetrics {
        self.metrics
    }

    /// Whether the bitmap has been rendered yet.
    pub fn is_rendered(&self) -> bool {
        self.image.get().is_some()
    }
}

/// Rendering state for one (physical resource, descriptor) pair.
///
/// The glyph map grows without bound for the strike's lifetime; the strike
/// itself is what the cache evicts.
pub struct Strike {
    resource: Arc<PhysicalFontResource>,
    desc: FontStrikeDescriptor,
    glyphs: RwLock<HashMap<u32, Arc<Glyph>>>,
    metrics: OnceLock<FontMetrics>,
    disposed: AtomicBool,
}

impl std::fmt::Debug for Strike {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strike")
            .field("font", &self.resource.full_name())
            .field("desc", &self.desc)
            .field("glyphs", &self.glyphs.read().len())
            .finish()
    }
}

impl Strike {
    pub(crate) fn new(resource: Arc<PhysicalFontResource>, desc: FontStrikeDescriptor) -> Self {
        log::trace!(
            "Creating strike for '{}' at {}px",
            resource.full_name(),
            desc.size()
        );
        Self {
            resource,
            desc,
            glyphs: RwLock::new(HashMap::new()),
            metrics: OnceLock::new(),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn descriptor(&self) -> &FontStrikeDescriptor {
        &self.desc
    }

    pub fn resource(&self) -> &Arc<PhysicalFontResource> {
        &self.resource
    }

    pub fn size(&self) -> f32 {
        self.desc.size()
    }

    pub fn metrics(&self) -> FontMetrics {
        *self
            .metrics
            .get_or_init(|| self.resource.font_metrics(self.desc.size()))
    }

    pub fn glyph(&self, local_id: u32) -> Arc<Glyph> {
        if let Some(glyph) = self.glyphs.read().get(&local_id) {
            return Arc::clone(glyph);
        }
        // Face access happens outside the map lock; a racing thread computing
        // the same glyph simply loses the insert.
        let metrics = self.resource.glyph_metrics(local_id, self.desc.size());
        let mut glyphs = self.glyphs.write();
        let glyph = glyphs.entry(local_id).or_insert_with(|| {
            Arc::new(Glyph {
                id: local_id,
                metrics,
                image: OnceLock::new(),
            })
        });
        Arc::clone(glyph)
    }

    /// Rendered bitmap for `local_id`, rasterized once and memoized.
    pub fn glyph_image(&self, local_id: u32) -> Option<Arc<GlyphImage>> {
        let glyph = self.glyph(local_id);
        glyph
            .image
            .get_or_init(|| {
                self.resource
                    .render_glyph(local_id, &self.desc)
                    .map(Arc::new)
            })
            .clone()
    }

    /// Detach this strike from its cache entry.
    ///
    /// Existing handles keep working; the next request for the same
    /// descriptor builds a fresh strike.
    pub fn clear_desc(&self) {
        if self.resource.strikes().remove_if_current(&self.desc, self) {
            log::debug!(
                "Cleared strike for '{}' at {}px",
                self.resource.full_name(),
                self.desc.size()
            );
        }
    }

    /// Release cached glyph state. Called once the cache has evicted the strike.
    pub(crate) fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            let released = {
                let mut glyphs = self.glyphs.write();
                let n = glyphs.len();
                glyphs.clear();
                n
            };
            log::trace!(
                "Disposed strike for '{}' at {}px ({} glyphs)",
                self.resource.full_name(),
                self.desc.size(),
                released
            );
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
