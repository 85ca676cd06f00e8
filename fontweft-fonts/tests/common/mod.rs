//! Shared integration test helpers for fontweft-fonts.
//!
//! Tests never touch system fonts. Faces come from [`MockLoader`], which
//! builds them from [`MockFaceDef`]s keyed by fake file paths, and
//! [`MockDirectory`] plays the platform font directory.
//!
//! ```ignore
//! mod common;
//! use common::{standard_registry, MockFaceDef};
//! ```

#![allow(dead_code)]

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fontweft_config::{FontConfig, LogicalFamilies};
use fontweft_fonts::{
    FaceInfo, FaceLoader, FallbackCandidate, FontError, FontFace, FontFeatures, FontFile,
    FontMetrics, FontRegistry, FontSource, FontStrikeDescriptor, GlyphBounds, GlyphImage,
    GlyphMetrics, PhysicalFontResource, PlatformFontDirectory,
};
use parking_lot::Mutex;

/// Prefix that marks in-memory font data as a mock face named by the rest.
pub const MEMORY_PREFIX: &[u8] = b"mock-font:";

/// What a mock face covers and how it behaves.
#[derive(Debug, Clone)]
pub struct MockFaceDef {
    pub full_name: String,
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    pub coverage: Vec<RangeInclusive<u32>>,
    pub color: bool,
    /// Clusters the face composes into one glyph.
    pub clusters: Vec<(String, u32)>,
    pub malformed: bool,
}

impl MockFaceDef {
    pub fn new(family: &str, bold: bool, italic: bool) -> Self {
        let style = match (bold, italic) {
            (false, false) => "Regular",
            (true, false) => "Bold",
            (false, true) => "Italic",
            (true, true) => "Bold Italic",
        };
        Self {
            full_name: format!("{} {}", family, style),
            family: family.to_string(),
            bold,
            italic,
            coverage: vec![0x20..=0x7E],
            color: false,
            clusters: Vec::new(),
            malformed: false,
        }
    }

    pub fn covering(mut self, ranges: &[RangeInclusive<u32>]) -> Self {
        self.coverage = ranges.to_vec();
        self
    }

    pub fn color(mut self) -> Self {
        self.color = true;
        self
    }

    pub fn with_cluster(mut self, cluster: &str, glyph: u32) -> Self {
        self.clusters.push((cluster.to_string(), glyph));
        self
    }

    pub fn malformed(mut self) -> Self {
        self.malformed = true;
        self
    }

    pub fn covers(&self, codepoint: u32) -> bool {
        self.coverage.iter().any(|range| range.contains(&codepoint))
    }
}

/// A face that maps every covered codepoint to the glyph id equal to it.
pub struct MockFace {
    def: MockFaceDef,
    renders: Arc<AtomicUsize>,
}

impl FontFace for MockFace {
    fn info(&self) -> FaceInfo {
        FaceInfo {
            full_name: self.def.full_name.clone(),
            family: self.def.family.clone(),
            style: if self.def.bold { "Bold" } else { "Regular" }.to_string(),
            bold: self.def.bold,
            italic: self.def.italic,
            features: if self.def.color {
                FontFeatures::COLOR
            } else {
                FontFeatures::KERNING
            },
            num_glyphs: 0x1_0000,
        }
    }

    fn glyph_for_char(&mut self, codepoint: u32) -> u32 {
        if self.def.covers(codepoint) { codepoint } else { 0 }
    }

    fn is_color_glyph(&mut self, _glyph: u32) -> bool {
        self.def.color
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
            bounds: GlyphBounds {
                x: 0.0,
                y: 0.0,
                width: size * 0.5,
                height: size,
            },
        }
    }

    fn render_glyph(&mut self, glyph: u32, desc: &FontStrikeDescriptor) -> Option<GlyphImage> {
        if glyph == 0 {
            return None;
        }
        self.renders.fetch_add(1, Ordering::SeqCst);
        let side = desc.size().ceil() as u32;
        Some(GlyphImage {
            width: side,
            height: side,
            left: 0,
            top: side as i32,
            pixels: vec![255; (side * side * 4) as usize],
            is_colored: self.def.color,
        })
    }

    fn shape_cluster(&mut self, cluster: &str) -> Option<u32> {
        self.def
            .clusters
            .iter()
            .find(|(known, _)| known == cluster)
            .map(|&(_, glyph)| glyph)
    }
}

/// Builds [`MockFace`]s from registered defs and counts loads per file.
#[derive(Default)]
pub struct MockLoader {
    defs: Mutex<HashMap<PathBuf, MockFaceDef>>,
    loads: Mutex<HashMap<PathBuf, usize>>,
    pub renders: Arc<AtomicUsize>,
}

impl MockLoader {
    pub fn add(&self, path: &Path, def: MockFaceDef) {
        self.defs.lock().insert(path.to_path_buf(), def);
    }

    pub fn loads_of(&self, path: &Path) -> usize {
        self.loads.lock().get(path).copied().unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.lock().values().sum()
    }

    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl FaceLoader for MockLoader {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontFace>, FontError> {
        let def = match &file.source {
            FontSource::File(path) => {
                *self.loads.lock().entry(path.clone()).or_default() += 1;
                match self.defs.lock().get(path) {
                    Some(def) => def.clone(),
                    None if path.exists() => {
                        // Real files written by tests hold "mock-font:<family>".
                        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
                            path: path.clone(),
                            source,
                        })?;
                        def_from_bytes(&bytes, &file.describe())?
                    }
                    None => {
                        return Err(FontError::Io {
                            path: path.clone(),
                            source: std::io::Error::from(std::io::ErrorKind::NotFound),
                        });
                    }
                }
            }
            FontSource::Memory(data) => def_from_bytes(data, &file.describe())?,
        };
        if def.malformed {
            return Err(FontError::MalformedFont {
                name: file.describe(),
                reason: "mock face marked malformed".to_string(),
            });
        }
        Ok(Box::new(MockFace {
            def,
            renders: Arc::clone(&self.renders),
        }))
    }
}

fn def_from_bytes(bytes: &[u8], name: &str) -> Result<MockFaceDef, FontError> {
    let family = bytes
        .strip_prefix(MEMORY_PREFIX)
        .and_then(|rest| std::str::from_utf8(rest).ok())
        .ok_or_else(|| FontError::MalformedFont {
            name: name.to_string(),
            reason: "not a mock font".to_string(),
        })?;
    Ok(MockFaceDef::new(family, false, false))
}

/// Bytes `MockLoader` accepts as an embedded font of `family`.
pub fn mock_font_bytes(family: &str) -> Vec<u8> {
    let mut bytes = MEMORY_PREFIX.to_vec();
    bytes.extend_from_slice(family.as_bytes());
    bytes
}

/// A platform directory over registered families and full names.
#[derive(Default)]
pub struct MockDirectory {
    families: Mutex<HashMap<(String, bool, bool), FontFile>>,
    full_names: Mutex<HashMap<String, FontFile>>,
    fallbacks: Mutex<Vec<FallbackCandidate>>,
    linked_calls: AtomicUsize,
    /// Resolve any full name to a fresh fake file (for slot ceiling tests).
    pub accept_any_full_name: Mutex<Option<Arc<MockLoader>>>,
}

impl MockDirectory {
    pub fn add(&self, file: FontFile, def: &MockFaceDef) {
        self.families.lock().insert(
            (def.family.to_lowercase(), def.bold, def.italic),
            file.clone(),
        );
        self.full_names
            .lock()
            .insert(def.full_name.to_lowercase(), file);
    }

    pub fn add_fallback(&self, name: &str, file: FontFile) {
        self.fallbacks.lock().push(FallbackCandidate {
            name: name.to_string(),
            file,
        });
    }

    pub fn linked_calls(&self) -> usize {
        self.linked_calls.load(Ordering::SeqCst)
    }
}

impl PlatformFontDirectory for MockDirectory {
    fn lookup(&self, family: &str, bold: bool, italic: bool) -> Option<FontFile> {
        let families = self.families.lock();
        let family = family.to_lowercase();
        families
            .get(&(family.clone(), bold, italic))
            .or_else(|| families.get(&(family, false, false)))
            .cloned()
    }

    fn lookup_full_name(&self, name: &str) -> Option<FontFile> {
        if let Some(file) = self.full_names.lock().get(&name.to_lowercase()) {
            return Some(file.clone());
        }
        let loader = self.accept_any_full_name.lock().clone()?;
        let path = PathBuf::from(format!("/mock/any/{}.ttf", name));
        let mut def = MockFaceDef::new(name, false, false).covering(&[]);
        def.full_name = name.to_string();
        loader.add(&path, def);
        Some(FontFile::from_path(path, 0))
    }

    fn linked_fallbacks(&self, primary: &PhysicalFontResource) -> Vec<FallbackCandidate> {
        self.linked_calls.fetch_add(1, Ordering::SeqCst);
        let primary_key = primary.file().key();
        self.fallbacks
            .lock()
            .iter()
            .filter(|candidate| candidate.file.key() != primary_key)
            .cloned()
            .collect()
    }
}

/// Loader and directory with the same faces registered in both.
pub struct MockFonts {
    pub loader: Arc<MockLoader>,
    pub directory: Arc<MockDirectory>,
}

impl MockFonts {
    pub fn new() -> Self {
        Self {
            loader: Arc::new(MockLoader::default()),
            directory: Arc::new(MockDirectory::default()),
        }
    }

    /// Register `def` under a fake path and return its file.
    pub fn add(&self, def: MockFaceDef) -> FontFile {
        let path = PathBuf::from(format!(
            "/mock/{}.ttf",
            def.full_name.to_lowercase().replace(' ', "-")
        ));
        self.loader.add(&path, def.clone());
        let file = FontFile::from_path(path, 0);
        self.directory.add(file.clone(), &def);
        file
    }

    /// Register `def` as a linked fallback offered to every primary.
    pub fn add_fallback(&self, def: MockFaceDef) -> FontFile {
        let name = def.family.clone();
        let file = self.add(def);
        self.directory.add_fallback(&name, file.clone());
        file
    }
}

pub const CJK: RangeInclusive<u32> = 0x4E00..=0x9FFF;
pub const EMOJI: RangeInclusive<u32> = 0x1F000..=0x1FAFF;
pub const SYMBOLS: RangeInclusive<u32> = 0x2600..=0x27BF;

/// The standard set: four styles of "Mock Sans", "Mock Serif", "Mock Mono",
/// plus "Mock CJK" and "Mock Emoji" as linked fallbacks.
pub fn standard_fonts() -> MockFonts {
    let fonts = MockFonts::new();
    for (bold, italic) in [(false, false), (true, false), (false, true), (true, true)] {
        fonts.add(MockFaceDef::new("Mock Sans", bold, italic));
    }
    fonts.add(MockFaceDef::new("Mock Serif", false, false));
    fonts.add(MockFaceDef::new("Mock Serif", true, false));
    fonts.add(MockFaceDef::new("Mock Mono", false, false));
    fonts.add_fallback(MockFaceDef::new("Mock CJK", false, false).covering(&[CJK]));
    fonts.add_fallback(
        MockFaceDef::new("Mock Emoji", false, false)
            .covering(&[EMOJI, SYMBOLS, 0x200D..=0x200D, 0xFE0F..=0xFE0F])
            .color()
            .with_cluster("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}", 0x1_2345),
    );
    fonts
}

/// Config pointing the logical families at the standard mock fonts.
pub fn standard_config() -> FontConfig {
    FontConfig {
        logical_families: LogicalFamilies {
            system: vec!["Mock Sans".to_string()],
            serif: vec!["Missing Serif".to_string(), "Mock Serif".to_string()],
            sans_serif: vec!["Mock Sans".to_string()],
            monospaced: vec!["Mock Mono".to_string()],
        },
        load_system_fonts: false,
        ..FontConfig::default()
    }
}

pub fn standard_registry() -> (FontRegistry, MockFonts) {
    let fonts = standard_fonts();
    let registry = FontRegistry::new(
        standard_config(),
        fonts.directory.clone(),
        fonts.loader.clone(),
    )
    .expect("standard registry should resolve its default font");
    (registry, fonts)
}

/// Registry with a given config over the standard fonts.
pub fn registry_with(config: FontConfig) -> (FontRegistry, MockFonts) {
    let fonts = standard_fonts();
    let registry = FontRegistry::new(config, fonts.directory.clone(), fonts.loader.clone())
        .expect("registry should resolve its default font");
    (registry, fonts)
}
