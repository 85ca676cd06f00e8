//! Shared helpers for the fontweft end-to-end tests.
//!
//! [`TestFonts`] is a tiny in-memory font world: a platform directory and a
//! face loader that agree on a handful of fake font files.
//!
//! ```ignore
//! mod common;
//! use common::test_registry;
//! ```

#![allow(dead_code)]

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use fontweft::fonts::{
    FaceInfo, FallbackCandidate, FontError, FontFace, FontFeatures, FontFile, FontMetrics,
    FontSource, FontStrikeDescriptor, GlyphImage, GlyphMetrics, PhysicalFontResource,
};
use fontweft::config::LogicalFamilies;
use fontweft::{FaceLoader, FontConfig, FontRegistry, PlatformFontDirectory};

#[derive(Clone)]
struct Face {
    family: &'static str,
    bold: bool,
    coverage: Vec<RangeInclusive<u32>>,
    color: bool,
}

impl FontFace for Face {
    fn info(&self) -> FaceInfo {
        let style = if self.bold { "Bold" } else { "Regular" };
        FaceInfo {
            full_name: format!("{} {}", self.family, style),
            family: self.family.to_string(),
            style: style.to_string(),
            bold: self.bold,
            italic: false,
            features: if self.color {
                FontFeatures::COLOR
            } else {
                FontFeatures::KERNING
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
            ascent: size * 0.75,
            descent: size * 0.25,
            line_gap: size * 0.1,
            units_per_em: 2048,
        }
    }

    fn glyph_metrics(&mut self, _glyph: u32, size: f32) -> GlyphMetrics {
        GlyphMetrics {
            advance: size * 0.6,
            ..Default::default()
        }
    }

    fn render_glyph(&mut self, glyph: u32, desc: &FontStrikeDescriptor) -> Option<GlyphImage> {
        let side = desc.size().ceil() as u32;
        (glyph != 0).then(|| GlyphImage {
            width: side,
            height: side,
            left: 0,
            top: side as i32,
            pixels: vec![0; (side * side * 4) as usize],
            is_colored: self.color,
        })
    }
}

/// Directory and loader over the same fake files.
pub struct TestFonts {
    faces: HashMap<PathBuf, Face>,
    fallbacks: Vec<FallbackCandidate>,
}

impl TestFonts {
    fn path(family: &str, bold: bool) -> PathBuf {
        PathBuf::from(format!(
            "/test-fonts/{}-{}.ttf",
            family.to_lowercase().replace(' ', "-"),
            if bold { "bold" } else { "regular" }
        ))
    }

    pub fn new() -> Self {
        let latin = vec![0x20..=0x7E, 0xA0..=0x24F];
        let mut faces = HashMap::new();
        for (family, bold) in [("Test Sans", false), ("Test Sans", true), ("Test Mono", false)] {
            faces.insert(
                Self::path(family, bold),
                Face {
                    family,
                    bold,
                    coverage: latin.clone(),
                    color: false,
                },
            );
        }
        let emoji = Face {
            family: "Test Emoji",
            bold: false,
            coverage: vec![0x200D..=0x200D, 0x2600..=0x27BF, 0xFE0F..=0xFE0F, 0x1F000..=0x1FAFF],
            color: true,
        };
        let hebrew = Face {
            family: "Test Hebrew",
            bold: false,
            coverage: vec![0x0590..=0x05FF],
            color: false,
        };
        let mut fallbacks = Vec::new();
        for face in [hebrew, emoji] {
            let path = Self::path(face.family, false);
            fallbacks.push(FallbackCandidate {
                name: face.family.to_string(),
                file: FontFile::from_path(path.clone(), 0),
            });
            faces.insert(path, face);
        }
        Self { faces, fallbacks }
    }

    pub fn config() -> FontConfig {
        FontConfig {
            logical_families: LogicalFamilies {
                system: vec!["Test Sans".to_string()],
                serif: vec!["Test Sans".to_string()],
                sans_serif: vec!["Test Sans".to_string()],
                monospaced: vec!["Test Mono".to_string()],
            },
            load_system_fonts: false,
            ..FontConfig::default()
        }
    }
}

impl PlatformFontDirectory for TestFonts {
    fn lookup(&self, family: &str, bold: bool, _italic: bool) -> Option<FontFile> {
        [Self::path(family, bold), Self::path(family, false)]
            .into_iter()
            .find(|path| self.faces.contains_key(path))
            .map(|path| FontFile::from_path(path, 0))
    }

    fn lookup_full_name(&self, name: &str) -> Option<FontFile> {
        self.faces.iter().find_map(|(path, face)| {
            face.info()
                .full_name
                .eq_ignore_ascii_case(name)
                .then(|| FontFile::from_path(path.clone(), 0))
        })
    }

    fn linked_fallbacks(&self, primary: &PhysicalFontResource) -> Vec<FallbackCandidate> {
        let primary = primary.file().key();
        self.fallbacks
            .iter()
            .filter(|candidate| candidate.file.key() != primary)
            .cloned()
            .collect()
    }
}

impl FaceLoader for TestFonts {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontFace>, FontError> {
        let FontSource::File(path) = &file.source else {
            return Err(FontError::MalformedFont {
                name: file.describe(),
                reason: "test fonts are file-backed".to_string(),
            });
        };
        self.faces
            .get(path)
            .map(|face| Box::new(face.clone()) as Box<dyn FontFace>)
            .ok_or_else(|| FontError::Io {
                path: path.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

pub fn test_registry() -> FontRegistry {
    let fonts = Arc::new(TestFonts::new());
    fontweft::init_with(TestFonts::config(), fonts.clone(), fonts)
        .expect("test fonts should provide a default font")
}
