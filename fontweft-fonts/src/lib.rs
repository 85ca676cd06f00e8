//! Font resolution and strike caching for fontweft.
//!
//! This crate provides:
//! - Physical font resources loaded through a pluggable rasterizer (swash by default)
//! - Platform font discovery through fontdb
//! - Composite resources: a primary face plus a lazily loaded fallback chain,
//!   addressed with 32-bit glyph codes (slot + local glyph id)
//! - The four logical families (System, Serif, SansSerif, Monospaced)
//! - Strikes per (resource, size, transform, antialiasing), shared while held
//!   and reclaimed by sweeps once nothing holds them
//!
//! # Architecture
//!
//! [`FontRegistry`] owns everything. Font requests resolve in this order:
//! 1. Logical family names
//! 2. Platform family names and full font names
//! 3. The default logical font
//!
//! Every resolved [`Font`] wraps a [`CompositeFontResource`], so glyphs the
//! primary face lacks are served by fallback slots under the same font.

pub mod composite;
mod error;
pub mod face;
pub mod factory;
pub mod fallback;
mod font;
pub mod glyph_code;
pub mod logical;
pub mod platform;
mod registry;
pub mod resource;
pub mod strike;
pub mod swash_face;

// Re-export main types for convenience
pub use composite::{CompositeFontResource, CompositeKind};
pub use error::FontError;
pub use face::{
    FaceInfo, FaceLoader, FontFace, FontFeatures, FontFile, FontMetrics, FontSource, GlyphBounds,
    GlyphImage, GlyphMetrics,
};
pub use factory::FontFactory;
pub use fallback::FallbackChain;
pub use font::Font;
pub use glyph_code::{GlyphCode, MAX_SLOTS};
pub use logical::{LogicalFamily, parse_logical_name};
pub use platform::{FallbackCandidate, FontDbDirectory, PlatformFontDirectory};
pub use registry::FontRegistry;
pub use resource::{FontResource, PhysicalFontResource};
pub use strike::{
    CompositeStrike, FontStrike, FontStrikeDescriptor, Glyph, IDENTITY_TRANSFORM, Strike,
    StrikeCache,
};
pub use swash_face::{SwashFace, SwashLoader};
