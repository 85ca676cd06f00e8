//! Default rasterizer backed by swash, with rustybuzz for cluster shaping.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use fontweft_config::AntiAliasMode;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Format, Transform};
use swash::{CacheKey, FontRef, StringId, tag_from_bytes};

use crate::error::FontError;
use crate::face::{
    FaceInfo, FaceLoader, FontFace, FontFeatures, FontFile, FontMetrics, FontSource, GlyphBounds,
    GlyphImage, GlyphMetrics,
};
use crate::strike::FontStrikeDescriptor;

/// Loads faces with swash, reading files from disk on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwashLoader;

impl FaceLoader for SwashLoader {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontFace>, FontError> {
        let data = match &file.source {
            FontSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| FontError::Io {
                    path: path.clone(),
                    source,
                })?;
                Arc::new(bytes)
            }
            FontSource::Memory(data) => Arc::clone(data),
        };
        let face = SwashFace::from_data(data, file.index, &file.describe())?;
        Ok(Box::new(face))
    }
}

/// Size used to check whether a glyph has color data.
const COLOR_CHECK_SIZE: f32 = 16.0;

/// A swash face plus the scaler context used to rasterize it.
///
/// Stores the `FontRef` parts instead of the reference itself so the face owns
/// its bytes without any lifetime tricks.
pub struct SwashFace {
    data: Arc<Vec<u8>>,
    index: u32,
    offset: u32,
    key: CacheKey,
    context: ScaleContext,
    info: FaceInfo,
    has_color: bool,
    /// Per-glyph answers of `is_color_glyph`.
    color_glyphs: HashMap<u32, bool>,
}

impl fmt::Debug for SwashFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwashFace")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .field("full_name", &self.info.full_name)
            .finish()
    }
}

impl SwashFace {
    /// Parse face `index` of `data`. `name` is only used in error messages.
    pub fn from_data(data: Arc<Vec<u8>>, index: u32, name: &str) -> Result<Self, FontError> {
        let font = FontRef::from_index(data.as_slice(), index as usize).ok_or_else(|| {
            FontError::MalformedFont {
                name: name.to_string(),
                reason: format!("no parsable face at index {index}"),
            }
        })?;

        let has_color = [b"COLR", b"CBDT", b"sbix", b"SVG "]
            .iter()
            .any(|tag| font.table(tag_from_bytes(tag)).is_some());
        let info = read_face_info(&font, has_color);
        let (offset, key) = (font.offset, font.key);

        Ok(Self {
            data,
            index,
            offset,
            key,
            context: ScaleContext::new(),
            info,
            has_color,
            color_glyphs: HashMap::new(),
        })
    }
}

fn localized(font: &FontRef<'_>, id: StringId) -> Option<String> {
    font.localized_strings()
        .find(|s| s.id() == id)
        .map(|s| s.chars().collect::<String>())
        .filter(|s| !s.is_empty())
}

fn read_num_glyphs(font: &FontRef<'_>) -> u32 {
    font.table(tag_from_bytes(b"maxp"))
        .filter(|maxp| maxp.len() >= 6)
        .map(|maxp| u16::from_be_bytes([maxp[4], maxp[5]]) as u32)
        .unwrap_or(0)
}

fn read_face_info(font: &FontRef<'_>, has_color: bool) -> FaceInfo {
    let family = localized(font, StringId::Family).unwrap_or_default();
    let style = localized(font, StringId::SubFamily).unwrap_or_else(|| "Regular".to_string());
    let full_name = localized(font, StringId::Full)
        .unwrap_or_else(|| format!("{} {}", family, style).trim().to_string());

    let attributes = font.attributes();
    let bold = attributes.weight().0 >= 600;
    let italic = !matches!(attributes.style(), swash::Style::Normal);

    let mut features = FontFeatures::NONE;
    if font.table(tag_from_bytes(b"GSUB")).is_some() {
        features = features | FontFeatures::LIGATURES;
    }
    let has_table = |tag: &[u8; 4]| font.table(tag_from_bytes(tag)).is_some();
    if has_table(b"GPOS") || has_table(b"kern") {
        features = features | FontFeatures::KERNING;
    }
    if has_color {
        features = features | FontFeatures::COLOR;
    }
    if font.table(tag_from_bytes(b"fvar")).is_some() {
        features = features | FontFeatures::VARIATIONS;
    }

    FaceInfo {
        full_name,
        family,
        style,
        bold,
        italic,
        features,
        num_glyphs: read_num_glyphs(font),
    }
}

impl FontFace for SwashFace {
    fn info(&self) -> FaceInfo {
        self.info.clone()
    }

    fn glyph_for_char(&mut self, codepoint: u32) -> u32 {
        let font = FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        };
        font.charmap().map(codepoint) as u32
    }

    /// Whether `glyph` itself renders from color data. Glyphs of a color
    /// font that only have outlines answer `false`. SVG glyphs are not
    /// rendered by swash and also answer `false`.
    fn is_color_glyph(&mut self, glyph: u32) -> bool {
        if !self.has_color || glyph == 0 {
            return false;
        }
        if let Some(&color) = self.color_glyphs.get(&glyph) {
            return color;
        }
        let font = FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        };
        let mut scaler = self.context.builder(font).size(COLOR_CHECK_SIZE).build();
        let color = Render::new(&[
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
        ])
        .render(&mut scaler, glyph as u16)
        .is_some_and(|image| matches!(image.content, Content::Color));
        self.color_glyphs.insert(glyph, color);
        color
    }

    fn font_metrics(&mut self, size: f32) -> FontMetrics {
        let font = FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        };
        let metrics = font.metrics(&[]);
        let units_per_em = metrics.units_per_em;
        let scaled = metrics.scale(size);
        FontMetrics {
            ascent: scaled.ascent,
            descent: scaled.descent.abs(),
            line_gap: scaled.leading,
            units_per_em,
        }
    }

    fn glyph_metrics(&mut self, glyph: u32, size: f32) -> GlyphMetrics {
        let font = FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        };
        let glyph_id = glyph as u16;
        let advance = font.glyph_metrics(&[]).scale(size).advance_width(glyph_id);

        let mut scaler = self.context.builder(font).size(size).build();
        let bounds = scaler
            .scale_outline(glyph_id)
            .map(|outline| {
                let b = outline.bounds();
                GlyphBounds {
                    x: b.min.x,
                    y: b.min.y,
                    width: b.max.x - b.min.x,
                    height: b.max.y - b.min.y,
                }
            })
            .unwrap_or_default();

        GlyphMetrics { advance, bounds }
    }

    fn render_glyph(&mut self, glyph: u32, desc: &FontStrikeDescriptor) -> Option<GlyphImage> {
        let font = FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        };
        let mut scaler = self.context.builder(font).size(desc.size()).hint(false).build();

        let format = match desc.antialias() {
            AntiAliasMode::Lcd => Format::Subpixel,
            AntiAliasMode::Grayscale | AntiAliasMode::None => Format::Alpha,
        };
        let transform = if desc.is_identity_transform() {
            None
        } else {
            let [xx, xy, yx, yy] = desc.transform();
            Some(Transform {
                xx,
                xy,
                yx,
                yy,
                x: 0.0,
                y: 0.0,
            })
        };

        // Color sources first so emoji fonts render as colored bitmaps; plain
        // text fonts have no color data and fall through to Outline.
        let image = Render::new(&[
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
            Source::Outline,
        ])
        .format(format)
        .transform(transform)
        .render(&mut scaler, glyph as u16)?;

        let threshold = desc.antialias() == AntiAliasMode::None;
        let (pixels, is_colored) = match image.content {
            Content::Color => (image.data.clone(), true),
            Content::Mask => {
                let mut pixels = Vec::with_capacity(image.data.len() * 4);
                for &mask in &image.data {
                    let alpha = if threshold {
                        if mask > 127 { 255 } else { 0 }
                    } else {
                        mask
                    };
                    pixels.extend_from_slice(&[255, 255, 255, alpha]);
                }
                (pixels, false)
            }
            Content::SubpixelMask => (subpixel_to_rgba(&image), false),
        };

        Some(GlyphImage {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            pixels,
            is_colored,
        })
    }

    fn shape_cluster(&mut self, cluster: &str) -> Option<u32> {
        let face = rustybuzz::Face::from_slice(self.data.as_slice(), self.index)?;
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(cluster);
        let shaped = rustybuzz::shape(&face, &[], buffer);
        match shaped.glyph_infos() {
            [only] if only.glyph_id != 0 => Some(only.glyph_id),
            _ => None,
        }
    }
}

/// Convert a swash subpixel mask into an RGBA alpha mask.
///
/// Some swash builds emit 3 bytes/pixel, others 4; alpha is derived from the
/// RGB coverage either way.
fn subpixel_to_rgba(image: &swash::scale::image::Image) -> Vec<u8> {
    let width = image.placement.width as usize;
    let height = image.placement.height as usize;
    let mut pixels = Vec::with_capacity(width * height * 4);

    let stride = if width > 0 && height > 0 {
        image.data.len() / (width * height)
    } else {
        0
    };
    if stride < 3 {
        return pixels;
    }

    for chunk in image.data.chunks_exact(stride).take(width * height) {
        let (r, g, b) = (chunk[0] as u32, chunk[1] as u32, chunk[2] as u32);
        let alpha = ((r + g + b) / 3) as u8;
        pixels.extend_from_slice(&[255, 255, 255, alpha]);
    }
    pixels
}
