use std::sync::Arc;

use crate::glyph_code::GlyphCode;
use crate::resource::{FontResource, PhysicalFontResource};

/// A resolved font: a resource at a point size.
#[derive(Debug, Clone)]
pub struct Font {
    resource: FontResource,
    size: f32,
}

impl Font {
    /// # Panics
    /// If `size` is negative or not finite.
    pub fn new(resource: FontResource, size: f32) -> Self {
        assert!(
            size.is_finite() && size >= 0.0,
            "font size must be finite and non-negative (got {size})"
        );
        Self { resource, size }
    }

    pub fn resource(&self) -> &FontResource {
        &self.resource
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Same resource at another size.
    pub fn with_size(&self, size: f32) -> Font {
        Font::new(self.resource.clone(), size)
    }

    pub fn full_name(&self) -> String {
        self.resource.full_name()
    }

    /// The slot-0 resource.
    pub fn primary(&self) -> &Arc<PhysicalFontResource> {
        self.resource.primary()
    }

    pub fn is_bold(&self) -> bool {
        self.primary().is_bold()
    }

    pub fn is_italic(&self) -> bool {
        self.primary().is_italic()
    }

    pub fn char_to_glyph(&self, codepoint: u32) -> GlyphCode {
        self.resource.char_to_glyph(codepoint)
    }

    pub fn cluster_to_glyph(&self, cluster: &str) -> GlyphCode {
        match &self.resource {
            FontResource::Composite(composite) => composite.cluster_to_glyph(cluster),
            FontResource::Physical(physical) => {
                let local = physical.shape_cluster(cluster).unwrap_or_else(|| {
                    cluster
                        .chars()
                        .next()
                        .map(|c| physical.glyph_for_char(c as u32))
                        .unwrap_or(0)
                });
                GlyphCode::encode(0, local)
            }
        }
    }

    pub fn is_emoji_glyph(&self, codepoint: u32) -> bool {
        self.resource.is_emoji_glyph(codepoint)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource && self.size.to_bits() == other.size.to_bits()
    }
}
