//! Strikes: rendering state for a font resource at one size, transform and
//! antialiasing mode.
//!
//! - [`FontStrikeDescriptor`] keys strikes
//! - [`StrikeMap`] stores them per resource and evicts unreachable ones
//! - [`StrikeCache`] hands them out, retains recent ones and schedules sweeps
//! - [`CompositeStrike`] routes glyph codes to per-slot [`Strike`]s

mod cache;
mod composite;
mod descriptor;
mod map;
mod physical;

use std::sync::Arc;

pub use cache::{StrikeCache, sweep_resource};
pub(crate) use cache::sweep_physical;
pub use composite::CompositeStrike;
pub use descriptor::{FontStrikeDescriptor, IDENTITY_TRANSFORM};
pub use map::StrikeMap;
pub use physical::{Glyph, Strike};

use crate::face::{FontMetrics, GlyphImage};
use crate::glyph_code::GlyphCode;

/// A strike handle. Holding one keeps the strike out of sweeps.
#[derive(Debug, Clone)]
pub enum FontStrike {
    Physical(Arc<Strike>),
    Composite(Arc<CompositeStrike>),
}

impl FontStrike {
    pub fn descriptor(&self) -> &FontStrikeDescriptor {
        match self {
            FontStrike::Physical(strike) => strike.descriptor(),
            FontStrike::Composite(strike) => strike.descriptor(),
        }
    }

    /// # Panics
    /// If the code's slot is out of range for the strike's resource. A
    /// physical strike only has slot 0.
    pub fn glyph(&self, code: GlyphCode) -> Arc<Glyph> {
        match self {
            FontStrike::Physical(strike) => {
                assert_eq!(code.slot(), 0, "physical strikes only hold slot 0 ({code:?})");
                strike.glyph(code.local())
            }
            FontStrike::Composite(strike) => strike.glyph(code),
        }
    }

    pub fn glyph_image(&self, code: GlyphCode) -> Option<Arc<GlyphImage>> {
        match self {
            FontStrike::Physical(strike) => {
                assert_eq!(code.slot(), 0, "physical strikes only hold slot 0 ({code:?})");
                strike.glyph_image(code.local())
            }
            FontStrike::Composite(strike) => strike.glyph_image(code),
        }
    }

    pub fn metrics(&self) -> FontMetrics {
        match self {
            FontStrike::Physical(strike) => strike.metrics(),
            FontStrike::Composite(strike) => strike.metrics(),
        }
    }

    pub fn clear_desc(&self) {
        match self {
            FontStrike::Physical(strike) => strike.clear_desc(),
            FontStrike::Composite(strike) => strike.clear_desc(),
        }
    }

    /// Whether both handles refer to the same strike instance.
    pub fn ptr_eq(&self, other: &FontStrike) -> bool {
        match (self, other) {
            (FontStrike::Physical(a), FontStrike::Physical(b)) => Arc::ptr_eq(a, b),
            (FontStrike::Composite(a), FontStrike::Composite(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
