//! Strike cache keys.

use std::hash::{Hash, Hasher};

use fontweft_config::AntiAliasMode;

/// Identity 2x2 transform, `[xx, xy, yx, yy]`.
pub const IDENTITY_TRANSFORM: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// (size, 2x2 transform, antialias mode) used to key strikes.
///
/// Equality and hashing compare the exact bit patterns of the floats. Two
/// transforms that differ in the last ulp are different strikes, and so are
/// `0.0` and `-0.0`. Moving to a tolerance would change which requests share
/// a strike.
#[derive(Debug, Clone, Copy)]
pub struct FontStrikeDescriptor {
    size: f32,
    transform: [f32; 4],
    antialias: AntiAliasMode,
}

impl FontStrikeDescriptor {
    /// # Panics
    /// If `size` is negative or not finite, or any transform component is not
    /// finite.
    pub fn new(size: f32, transform: [f32; 4], antialias: AntiAliasMode) -> Self {
        assert!(
            size.is_finite() && size >= 0.0,
            "strike size must be finite and non-negative (got {size})"
        );
        assert!(
            transform.iter().all(|c| c.is_finite()),
            "strike transform must be finite (got {transform:?})"
        );
        Self {
            size,
            transform,
            antialias,
        }
    }

    pub fn untransformed(size: f32, antialias: AntiAliasMode) -> Self {
        Self::new(size, IDENTITY_TRANSFORM, antialias)
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn transform(&self) -> [f32; 4] {
        self.transform
    }

    #[inline]
    pub fn antialias(&self) -> AntiAliasMode {
        self.antialias
    }

    pub fn is_identity_transform(&self) -> bool {
        self.transform == IDENTITY_TRANSFORM
    }

    fn bits(&self) -> (u32, [u32; 4]) {
        (
            self.size.to_bits(),
            [
                self.transform[0].to_bits(),
                self.transform[1].to_bits(),
                self.transform[2].to_bits(),
                self.transform[3].to_bits(),
            ],
        )
    }
}

impl PartialEq for FontStrikeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.antialias == other.antialias && self.bits() == other.bits()
    }
}

impl Eq for FontStrikeDescriptor {}

impl Hash for FontStrikeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
        self.antialias.hash(state);
    }
}
