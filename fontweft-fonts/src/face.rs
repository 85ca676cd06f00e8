//! The rasterizer seam: font files, per-face native handles and their loader.
//!
//! A [`FontFace`] wraps one parsed face and whatever native scaler state the
//! rasterizer needs. Its methods take `&mut self` because that state is not
//! shareable; [`PhysicalFontResource`] serializes all calls through a
//! per-resource lock.
//!
//! [`PhysicalFontResource`]: crate::PhysicalFontResource

use std::fmt;
use std::ops::BitOr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::FontError;
use crate::strike::FontStrikeDescriptor;

/// Where the bytes of a font live.
#[derive(Clone)]
pub enum FontSource {
    /// A file on disk, read when the face is loaded.
    File(PathBuf),
    /// Font data already in memory (embedded fonts).
    Memory(Arc<Vec<u8>>),
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => f.debug_tuple("File").field(path).finish(),
            FontSource::Memory(data) => f
                .debug_struct("Memory")
                .field("data_len", &data.len())
                .finish(),
        }
    }
}

/// One face inside a font file. Identity is `(source, index)`.
#[derive(Debug, Clone)]
pub struct FontFile {
    pub source: FontSource,
    /// Face index within the file (non-zero only for collections).
    pub index: u32,
}

/// Hashable identity of a [`FontFile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileKey {
    Path(PathBuf, u32),
    Memory(usize, u32),
}

impl FontFile {
    pub fn from_path(path: impl Into<PathBuf>, index: u32) -> Self {
        Self {
            source: FontSource::File(path.into()),
            index,
        }
    }

    pub fn from_memory(data: Arc<Vec<u8>>, index: u32) -> Self {
        Self {
            source: FontSource::Memory(data),
            index,
        }
    }

    pub fn key(&self) -> FileKey {
        match &self.source {
            FontSource::File(path) => FileKey::Path(path.clone(), self.index),
            FontSource::Memory(data) => FileKey::Memory(Arc::as_ptr(data) as usize, self.index),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FontSource::File(path) => Some(path),
            FontSource::Memory(_) => None,
        }
    }

    /// Human-readable description for log messages.
    pub fn describe(&self) -> String {
        match &self.source {
            FontSource::File(path) => format!("{}#{}", path.display(), self.index),
            FontSource::Memory(data) => format!("<memory {} bytes>#{}", data.len(), self.index),
        }
    }
}

/// OpenType layout capabilities of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontFeatures(u32);

impl FontFeatures {
    pub const NONE: FontFeatures = FontFeatures(0);
    pub const KERNING: FontFeatures = FontFeatures(1 << 0);
    pub const LIGATURES: FontFeatures = FontFeatures(1 << 1);
    pub const COLOR: FontFeatures = FontFeatures(1 << 2);
    pub const VARIATIONS: FontFeatures = FontFeatures(1 << 3);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: FontFeatures) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for FontFeatures {
    type Output = FontFeatures;

    fn bitor(self, rhs: FontFeatures) -> FontFeatures {
        FontFeatures(self.0 | rhs.0)
    }
}

/// Name and style metadata read once when a face is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceInfo {
    /// Full name, e.g. "DejaVu Sans Bold".
    pub full_name: String,
    pub family: String,
    /// Subfamily, e.g. "Bold Oblique".
    pub style: String,
    pub bold: bool,
    pub italic: bool,
    pub features: FontFeatures,
    pub num_glyphs: u32,
}

/// Vertical metrics scaled to a pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    pub ascent: f32,
    /// Positive distance below the baseline.
    pub descent: f32,
    pub line_gap: f32,
    pub units_per_em: u16,
}

impl FontMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

/// Glyph bounding box in pixels, y up from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl GlyphBounds {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    pub advance: f32,
    pub bounds: GlyphBounds,
}

/// A rendered glyph bitmap (RGBA, 4 bytes per pixel).
#[derive(Clone, PartialEq)]
pub struct GlyphImage {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub pixels: Vec<u8>,
    pub is_colored: bool,
}

impl fmt::Debug for GlyphImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("top", &self.top)
            .field("is_colored", &self.is_colored)
            .finish()
    }
}

/// Native handle for one parsed face.
///
/// Implementations are not expected to be usable from two threads at once;
/// the owning resource holds them behind a mutex.
pub trait FontFace: Send {
    /// Metadata captured at resource construction.
    fn info(&self) -> FaceInfo;

    /// Map a Unicode scalar value to a local glyph id, 0 when unmapped.
    fn glyph_for_char(&mut self, codepoint: u32) -> u32;

    /// Whether `glyph` is drawn from color data (COLR, CBDT, sbix).
    fn is_color_glyph(&mut self, glyph: u32) -> bool;

    fn font_metrics(&mut self, size: f32) -> FontMetrics;

    fn glyph_metrics(&mut self, glyph: u32, size: f32) -> GlyphMetrics;

    /// Rasterize `glyph` at the strike's size, transform and antialiasing.
    fn render_glyph(&mut self, glyph: u32, desc: &FontStrikeDescriptor) -> Option<GlyphImage>;

    /// Shape a multi-codepoint cluster and return the glyph it composes to.
    ///
    /// Faces without a shaper keep the default, which declines.
    fn shape_cluster(&mut self, _cluster: &str) -> Option<u32> {
        None
    }
}

/// Creates native faces from font files.
pub trait FaceLoader: Send + Sync {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontFace>, FontError>;
}
