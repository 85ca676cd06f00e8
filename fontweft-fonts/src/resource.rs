//! Physical font resources and the closed `FontResource` variant.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use fontweft_config::AntiAliasMode;
use parking_lot::{Mutex, RwLock};

use crate::composite::CompositeFontResource;
use crate::face::{
    FaceInfo, FontFace, FontFeatures, FontFile, FontMetrics, GlyphImage, GlyphMetrics,
};
use crate::glyph_code::GlyphCode;
use crate::strike::{FontStrikeDescriptor, Strike, StrikeMap};

/// One face of one font file.
///
/// Metadata is captured at construction and never changes. Every call that
/// reaches the native face goes through `face`, so a resource is used by one
/// thread at a time while different resources proceed in parallel.
pub struct PhysicalFontResource {
    file: FontFile,
    info: FaceInfo,
    default_antialias: AntiAliasMode,
    face: Mutex<Box<dyn FontFace>>,
    char_map: RwLock<HashMap<u32, u32>>,
    strikes: StrikeMap<Strike>,
}

impl fmt::Debug for PhysicalFontResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalFontResource")
            .field("full_name", &self.info.full_name)
            .field("file", &self.file)
            .field("bold", &self.info.bold)
            .field("italic", &self.info.italic)
            .finish()
    }
}

impl PhysicalFontResource {
    pub fn new(file: FontFile, face: Box<dyn FontFace>, default_antialias: AntiAliasMode) -> Self {
        let info = face.info();
        log::info!(
            "Created font resource '{}' ({}) from {}",
            info.full_name,
            info.style,
            file.describe()
        );
        Self {
            file,
            info,
            default_antialias,
            face: Mutex::new(face),
            char_map: RwLock::new(HashMap::new()),
            strikes: StrikeMap::new(),
        }
    }

    pub fn file(&self) -> &FontFile {
        &self.file
    }

    pub fn full_name(&self) -> &str {
        &self.info.full_name
    }

    pub fn family(&self) -> &str {
        &self.info.family
    }

    pub fn style(&self) -> &str {
        &self.info.style
    }

    pub fn is_bold(&self) -> bool {
        self.info.bold
    }

    pub fn is_italic(&self) -> bool {
        self.info.italic
    }

    pub fn features(&self) -> FontFeatures {
        self.info.features
    }

    pub fn num_glyphs(&self) -> u32 {
        self.info.num_glyphs
    }

    pub fn default_antialias(&self) -> AntiAliasMode {
        self.default_antialias
    }

    /// Local glyph id for `codepoint`, 0 when the face has none.
    pub fn glyph_for_char(&self, codepoint: u32) -> u32 {
        if let Some(&glyph) = self.char_map.read().get(&codepoint) {
            return glyph;
        }
        let glyph = self.face.lock().glyph_for_char(codepoint);
        self.char_map.write().insert(codepoint, glyph);
        glyph
    }

    pub fn is_color_glyph(&self, glyph: u32) -> bool {
        glyph != 0 && self.face.lock().is_color_glyph(glyph)
    }

    pub fn font_metrics(&self, size: f32) -> FontMetrics {
        self.face.lock().font_metrics(size)
    }

    pub fn glyph_metrics(&self, glyph: u32, size: f32) -> GlyphMetrics {
        self.face.lock().glyph_metrics(glyph, size)
    }

    pub fn render_glyph(&self, glyph: u32, desc: &FontStrikeDescriptor) -> Option<GlyphImage> {
        self.face.lock().render_glyph(glyph, desc)
    }

    /// Glyph a multi-codepoint cluster shapes to, if the face composes it.
    pub fn shape_cluster(&self, cluster: &str) -> Option<u32> {
        self.face.lock().shape_cluster(cluster)
    }

    pub fn strikes(&self) -> &StrikeMap<Strike> {
        &self.strikes
    }
}

impl PartialEq for PhysicalFontResource {
    fn eq(&self, other: &Self) -> bool {
        self.file.key() == other.file.key()
    }
}

impl Eq for PhysicalFontResource {}

/// A font resource: either one physical face or a primary face with its
/// fallback chain. Only the composite variant has slots.
#[derive(Debug, Clone)]
pub enum FontResource {
    Physical(Arc<PhysicalFontResource>),
    Composite(Arc<CompositeFontResource>),
}

impl FontResource {
    pub fn full_name(&self) -> String {
        match self {
            FontResource::Physical(physical) => physical.full_name().to_string(),
            FontResource::Composite(composite) => composite.full_name(),
        }
    }

    /// The resource in slot 0 (the resource itself when physical).
    pub fn primary(&self) -> &Arc<PhysicalFontResource> {
        match self {
            FontResource::Physical(physical) => physical,
            FontResource::Composite(composite) => composite.primary(),
        }
    }

    pub fn as_composite(&self) -> Option<&Arc<CompositeFontResource>> {
        match self {
            FontResource::Composite(composite) => Some(composite),
            FontResource::Physical(_) => None,
        }
    }

    pub fn char_to_glyph(&self, codepoint: u32) -> GlyphCode {
        match self {
            FontResource::Physical(physical) => {
                GlyphCode::encode(0, physical.glyph_for_char(codepoint))
            }
            FontResource::Composite(composite) => composite.char_to_glyph(codepoint),
        }
    }

    /// Whether `codepoint` resolves to a color glyph in this resource.
    pub fn is_emoji_glyph(&self, codepoint: u32) -> bool {
        match self {
            FontResource::Physical(physical) => {
                let glyph = physical.glyph_for_char(codepoint);
                glyph != 0 && physical.is_color_glyph(glyph)
            }
            FontResource::Composite(composite) => composite.is_emoji_glyph(codepoint),
        }
    }

    /// Address-based identity, stable for the resource's lifetime.
    pub(crate) fn identity(&self) -> usize {
        match self {
            FontResource::Physical(physical) => Arc::as_ptr(physical) as usize,
            FontResource::Composite(composite) => Arc::as_ptr(composite) as usize,
        }
    }
}

impl PartialEq for FontResource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FontResource::Physical(a), FontResource::Physical(b)) => a == b,
            (FontResource::Composite(a), FontResource::Composite(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }
}
