//! Composite font resources: a primary face plus its fallback chain,
//! addressed through glyph codes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use unicode_segmentation::UnicodeSegmentation;

use crate::factory::FontFactory;
use crate::fallback::FallbackChain;
use crate::glyph_code::GlyphCode;
use crate::logical::LogicalFamily;
use crate::resource::PhysicalFontResource;
use crate::strike::{CompositeStrike, StrikeMap};

/// How a composite's primary resource was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    /// Wraps a concrete platform font.
    Platform,
    /// Wraps the face backing one of the four logical families.
    Logical {
        family: LogicalFamily,
        bold: bool,
        italic: bool,
    },
}

pub struct CompositeFontResource {
    kind: CompositeKind,
    chain: FallbackChain,
    glyph_cache: RwLock<HashMap<u32, GlyphCode>>,
    strikes: StrikeMap<CompositeStrike>,
}

impl std::fmt::Debug for CompositeFontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFontResource")
            .field("kind", &self.kind)
            .field("chain", &self.chain)
            .field("strikes", &self.strikes.len())
            .finish()
    }
}

impl CompositeFontResource {
    pub fn new(
        kind: CompositeKind,
        primary: Arc<PhysicalFontResource>,
        factory: Arc<FontFactory>,
    ) -> Self {
        Self {
            kind,
            chain: FallbackChain::new(primary, factory),
            glyph_cache: RwLock::new(HashMap::new()),
            strikes: StrikeMap::new(),
        }
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    /// Logical fonts are named "<Family> <Style>", platform composites by
    /// their primary's full name.
    pub fn full_name(&self) -> String {
        match self.kind {
            CompositeKind::Platform => self.primary().full_name().to_string(),
            CompositeKind::Logical {
                family,
                bold,
                italic,
            } => format!("{} {}", family.name(), style_name(bold, italic)),
        }
    }

    pub fn primary(&self) -> &Arc<PhysicalFontResource> {
        self.chain.primary()
    }

    pub fn num_slots(&self) -> usize {
        self.chain.num_slots()
    }

    /// # Panics
    /// If `slot` is not below [`num_slots`](Self::num_slots).
    pub fn slot_resource(&self, slot: u8) -> Arc<PhysicalFontResource> {
        self.chain.slot_resource(slot)
    }

    /// See [`FallbackChain::slot_for_font`].
    pub fn slot_for_font(&self, name: &str) -> Option<u8> {
        self.chain.slot_for_font(name)
    }

    /// Glyph code for `codepoint`: the first slot whose face maps it, or
    /// [`GlyphCode::MISSING`] when no slot does.
    pub fn char_to_glyph(&self, codepoint: u32) -> GlyphCode {
        if let Some(&code) = self.glyph_cache.read().get(&codepoint) {
            return code;
        }

        let mut code = GlyphCode::MISSING;
        for slot in 0..self.num_slots() {
            let slot = slot as u8;
            let local = self.slot_resource(slot).glyph_for_char(codepoint);
            if local != 0 {
                code = GlyphCode::encode(slot, local);
                break;
            }
        }
        if code.is_missing() {
            log::debug!(
                "U+{:04X} not found in '{}' ({} slots)",
                codepoint,
                self.full_name(),
                self.num_slots()
            );
        }

        self.glyph_cache.write().insert(codepoint, code);
        code
    }

    /// Glyph for a whole grapheme cluster, e.g. a ZWJ emoji sequence.
    ///
    /// Single codepoints go through [`char_to_glyph`](Self::char_to_glyph).
    /// Longer clusters are shaped with each slot in order; the first slot
    /// that composes the cluster into one glyph wins. Otherwise the glyph of
    /// the first codepoint is used.
    pub fn cluster_to_glyph(&self, cluster: &str) -> GlyphCode {
        let mut chars = cluster.chars();
        let Some(first) = chars.next() else {
            return GlyphCode::MISSING;
        };
        if chars.next().is_none() {
            return self.char_to_glyph(first as u32);
        }

        for slot in 0..self.num_slots() {
            let slot = slot as u8;
            if let Some(local) = self.slot_resource(slot).shape_cluster(cluster) {
                log::debug!(
                    "Cluster '{}' shaped to glyph {} in slot {} of '{}'",
                    cluster,
                    local,
                    slot,
                    self.full_name()
                );
                return GlyphCode::encode(slot, local);
            }
        }
        self.char_to_glyph(first as u32)
    }

    /// Glyph codes for each extended grapheme cluster of `text`, paired with
    /// the cluster's byte offset.
    pub fn glyphs_for_text(&self, text: &str) -> Vec<(usize, GlyphCode)> {
        text.grapheme_indices(true)
            .map(|(offset, cluster)| (offset, self.cluster_to_glyph(cluster)))
            .collect()
    }

    /// Whether `codepoint` resolves to a color glyph in some slot.
    pub fn is_emoji_glyph(&self, codepoint: u32) -> bool {
        let code = self.char_to_glyph(codepoint);
        !code.is_missing() && self.slot_resource(code.slot()).is_color_glyph(code.local())
    }

    pub fn strikes(&self) -> &StrikeMap<CompositeStrike> {
        &self.strikes
    }

    /// Resources of all materialized slots, primary first, without duplicates.
    pub fn materialized_slot_resources(&self) -> Vec<Arc<PhysicalFontResource>> {
        self.chain.materialized_resources()
    }

    pub(crate) fn clear_glyph_cache(&self) {
        self.glyph_cache.write().clear();
    }
}

/// Composites are equal when their primaries are.
impl PartialEq for CompositeFontResource {
    fn eq(&self, other: &Self) -> bool {
        **self.primary() == **other.primary()
    }
}

impl Eq for CompositeFontResource {}

pub(crate) fn style_name(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (false, false) => "Regular",
        (true, false) => "Bold",
        (false, true) => "Italic",
        (true, true) => "Bold Italic",
    }
}
