#![allow(dead_code)]

use std::ops::RangeInclusive;
use std::sync::Arc;

use fontweft_config::AntiAliasMode;
use fontweft_fonts::{
    FaceInfo, Font, FontFace, FontFeatures, FontFile, FontMetrics, FontResource,
    FontStrikeDescriptor, GlyphImage, GlyphMetrics, PhysicalFontResource,
};

/// Face mapping each covered codepoint to a glyph with the same id.
struct CoverageFace {
    name: &'static str,
    coverage: Vec<RangeInclusive<u32>>,
    color: bool,
}

impl FontFace for CoverageFace {
    fn info(&self) -> FaceInfo {
        FaceInfo {
            full_name: format!("{} Regular", self.name),
            family: self.name.to_string(),
            style: "Regular".to_string(),
            bold: false,
            italic: false,
            features: if self.color {
                FontFeatures::COLOR
            } else {
                FontFeatures::NONE
            },
            num_glyphs: 0x2_0000,
        }
    }

    fn glyph_for_char(&mut self, codepoint: u32) -> u32 {
        if self.coverage.iter().any(|r| r.contains(&codepoint)) {
            codepoint
        } else {
            0
        }
    }

    fn is_color_glyph(&mut self, _glyph: u32) -> bool {
        self.color
    }

    fn font_metrics(&mut self, size: f32) -> FontMetrics {
        FontMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            line_gap: 0.0,
            units_per_em: 1000,
        }
    }

    fn glyph_metrics(&mut self, _glyph: u32, size: f32) -> GlyphMetrics {
        GlyphMetrics {
            advance: size * 0.5,
            ..Default::default()
        }
    }

    fn render_glyph(&mut self, _glyph: u32, _desc: &FontStrikeDescriptor) -> Option<GlyphImage> {
        None
    }
}

fn font(name: &'static str, coverage: Vec<RangeInclusive<u32>>, color: bool) -> Font {
    let file = FontFile::from_path(format!("/mock/{}.ttf", name.to_lowercase()), 0);
    let face = CoverageFace {
        name,
        coverage,
        color,
    };
    let resource = PhysicalFontResource::new(file, Box::new(face), AntiAliasMode::Grayscale);
    Font::new(FontResource::Physical(Arc::new(resource)), 12.0)
}

/// A color font covering the emoji blocks, joiners and selectors.
pub fn color_emoji_font() -> Font {
    font(
        "Color Emoji",
        vec![
            0x00A9..=0x00A9,
            0x200D..=0x200D,
            0x2600..=0x27BF,
            0xFE0F..=0xFE0F,
            0x1F000..=0x1FAFF,
        ],
        true,
    )
}

/// A monochrome font covering the same emoji as [`color_emoji_font`].
pub fn outline_symbol_font() -> Font {
    font(
        "Outline Symbols",
        vec![
            0x0020..=0x007E,
            0x00A9..=0x00A9,
            0x2600..=0x27BF,
            0x1F000..=0x1FAFF,
        ],
        false,
    )
}

pub fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}
