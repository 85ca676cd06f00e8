//! Packing of (slot, local glyph id) pairs into portable 32-bit glyph codes.
//!
//! The high byte carries the slot of the composite font the glyph came from,
//! the low 24 bits carry the glyph id inside that slot's physical resource.
//! Slot 127 and the sign bit stay unused so every code is non-negative when
//! read as an `i32`.

use std::fmt;

/// Highest slot number that may be encoded.
pub const MAX_SLOT: u8 = 0x7E;

/// Maximum number of slots a composite font may hold (slot 0 included).
pub const MAX_SLOTS: usize = 0x7E;

/// Largest local glyph id that fits in a glyph code.
pub const MAX_LOCAL_GLYPH: u32 = 0x00FF_FFFF;

const SLOT_SHIFT: u32 = 24;

/// A glyph identifier that stays unique across a composite's fallback chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GlyphCode(u32);

impl GlyphCode {
    /// The missing glyph of the primary resource.
    pub const MISSING: GlyphCode = GlyphCode(0);

    /// Encode `local_id` from `slot`.
    ///
    /// # Panics
    /// If `slot > MAX_SLOT` or `local_id > MAX_LOCAL_GLYPH`. Callers check the
    /// composite's slot count before encoding.
    #[inline]
    pub fn encode(slot: u8, local_id: u32) -> Self {
        assert!(slot <= MAX_SLOT, "glyph slot {slot} exceeds {MAX_SLOT}");
        assert!(
            local_id <= MAX_LOCAL_GLYPH,
            "local glyph id {local_id:#x} does not fit in 24 bits"
        );
        GlyphCode(((slot as u32) << SLOT_SHIFT) | local_id)
    }

    /// Reinterpret a raw code, e.g. one handed back by a shaper.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        GlyphCode(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn slot(self) -> u8 {
        (self.0 >> SLOT_SHIFT) as u8
    }

    #[inline]
    pub const fn local(self) -> u32 {
        self.0 & MAX_LOCAL_GLYPH
    }

    /// True for the `.notdef` glyph of any slot.
    #[inline]
    pub const fn is_missing(self) -> bool {
        self.local() == 0
    }
}

impl fmt::Debug for GlyphCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlyphCode({}:{})", self.slot(), self.local())
    }
}

impl From<GlyphCode> for u32 {
    fn from(code: GlyphCode) -> u32 {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_extremes() {
        for slot in [0u8, 1, 63, MAX_SLOT] {
            for local in [0u32, 1, 0x1234, 0xFFFF, MAX_LOCAL_GLYPH] {
                let code = GlyphCode::encode(slot, local);
                assert_eq!(code.slot(), slot);
                assert_eq!(code.local(), local);
            }
        }
    }

    #[test]
    fn test_codes_stay_non_negative() {
        let code = GlyphCode::encode(MAX_SLOT, MAX_LOCAL_GLYPH);
        assert!((code.raw() as i32) >= 0);
    }

    #[test]
    fn test_missing() {
        assert!(GlyphCode::MISSING.is_missing());
        assert!(GlyphCode::encode(5, 0).is_missing());
        assert!(!GlyphCode::encode(0, 7).is_missing());
        assert_eq!(GlyphCode::MISSING.slot(), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_reserved_slot_panics() {
        GlyphCode::encode(0x7F, 1);
    }

    #[test]
    #[should_panic(expected = "24 bits")]
    fn test_oversized_local_panics() {
        GlyphCode::encode(0, 0x0100_0000);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", GlyphCode::encode(3, 42)), "GlyphCode(3:42)");
    }
}
