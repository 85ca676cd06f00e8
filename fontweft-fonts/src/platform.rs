//! Platform font directory: family lookup and linked fallback lists.
//!
//! The default implementation queries a `fontdb` database filled from the
//! system font directories plus any configured extra directories.

use std::collections::HashMap;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Style, Weight};
use fontweft_config::FontConfig;
use parking_lot::Mutex;

use crate::face::FontFile;
use crate::resource::PhysicalFontResource;

/// One linked fallback offered for a primary resource.
#[derive(Debug, Clone)]
pub struct FallbackCandidate {
    /// Name the fallback is known by in its slot (a family or full name).
    pub name: String,
    pub file: FontFile,
}

/// Per-platform font discovery.
///
/// Calls may be slow (directory scans, file reads); callers memoize results.
pub trait PlatformFontDirectory: Send + Sync {
    /// Face of `family` closest to the requested style.
    fn lookup(&self, family: &str, bold: bool, italic: bool) -> Option<FontFile>;

    /// Face whose full or PostScript name is `name` (case-insensitive).
    fn lookup_full_name(&self, name: &str) -> Option<FontFile>;

    /// Ordered fallbacks linked to `primary`.
    fn linked_fallbacks(&self, primary: &PhysicalFontResource) -> Vec<FallbackCandidate>;
}

/// [`PlatformFontDirectory`] over a `fontdb` database.
pub struct FontDbDirectory {
    db: Database,
    fallback_families: Vec<String>,
    /// Bytes of faces that were registered from memory, shared per face id.
    binary_cache: Mutex<HashMap<fontdb::ID, Arc<Vec<u8>>>>,
}

impl std::fmt::Debug for FontDbDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontDbDirectory")
            .field("faces", &self.db.len())
            .field("fallback_families", &self.fallback_families)
            .finish()
    }
}

impl FontDbDirectory {
    pub fn new(db: Database, fallback_families: Vec<String>) -> Self {
        Self {
            db,
            fallback_families,
            binary_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Build the database the way the config asks for.
    pub fn from_config(config: &FontConfig) -> Self {
        let mut db = Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
            log::info!("Loaded {} system fonts", db.len());
        }
        for dir in &config.font_dirs {
            let before = db.len();
            db.load_fonts_dir(dir);
            log::info!("Loaded {} fonts from {:?}", db.len() - before, dir);
        }
        Self::new(db, config.fallback_families.clone())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn file_for(&self, id: fontdb::ID) -> Option<FontFile> {
        let face = self.db.face(id)?;
        match &face.source {
            Source::File(path) => Some(FontFile::from_path(path.clone(), face.index)),
            _ => {
                let mut cache = self.binary_cache.lock();
                if let Some(data) = cache.get(&id) {
                    return Some(FontFile::from_memory(Arc::clone(data), face.index));
                }
                let (data, index) = self
                    .db
                    .with_face_data(id, |data, index| (Arc::new(data.to_vec()), index))?;
                cache.insert(id, Arc::clone(&data));
                Some(FontFile::from_memory(data, index))
            }
        }
    }
}

/// Generic CSS-style names map onto fontdb's generic families.
fn family_for(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" | "system-ui" => Family::SansSerif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

fn style_label(face: &fontdb::FaceInfo) -> &'static str {
    let bold = face.weight.0 >= Weight::SEMIBOLD.0;
    let italic = face.style != Style::Normal;
    match (bold, italic) {
        (true, true) => "Bold Italic",
        (true, false) => "Bold",
        (false, true) => "Italic",
        (false, false) => "Regular",
    }
}

impl PlatformFontDirectory for FontDbDirectory {
    fn lookup(&self, family: &str, bold: bool, italic: bool) -> Option<FontFile> {
        let families = [family_for(family)];
        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            style: if italic { Style::Italic } else { Style::Normal },
            ..Query::default()
        };
        let id = self.db.query(&query)?;
        self.file_for(id)
    }

    fn lookup_full_name(&self, name: &str) -> Option<FontFile> {
        let face = self.db.faces().find(|face| {
            if face.post_script_name.eq_ignore_ascii_case(name) {
                return true;
            }
            let label = style_label(face);
            face.families.iter().any(|(family, _)| {
                let full = format!("{} {}", family, label);
                full.eq_ignore_ascii_case(name)
                    || (label == "Regular" && family.eq_ignore_ascii_case(name))
            })
        })?;
        self.file_for(face.id)
    }

    fn linked_fallbacks(&self, primary: &PhysicalFontResource) -> Vec<FallbackCandidate> {
        let primary_key = primary.file().key();
        let mut seen = vec![primary_key];
        let mut candidates = Vec::new();

        for family in &self.fallback_families {
            let Some(file) = self.lookup(family, primary.is_bold(), primary.is_italic()) else {
                continue;
            };
            let key = file.key();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            candidates.push(FallbackCandidate {
                name: family.clone(),
                file,
            });
        }
        log::debug!(
            "Linked {} fallbacks for '{}'",
            candidates.len(),
            primary.full_name()
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_family_names() {
        assert_eq!(family_for("serif"), Family::Serif);
        assert_eq!(family_for("Sans-Serif"), Family::SansSerif);
        assert_eq!(family_for("system-ui"), Family::SansSerif);
        assert_eq!(family_for("MONOSPACE"), Family::Monospace);
        assert_eq!(family_for("DejaVu Sans"), Family::Name("DejaVu Sans"));
    }

    #[test]
    fn test_empty_database_resolves_nothing() {
        let directory = FontDbDirectory::new(Database::new(), vec!["Noto Sans".to_string()]);
        assert!(directory.lookup("Noto Sans", false, false).is_none());
        assert!(directory.lookup("monospace", true, false).is_none());
        assert!(directory.lookup_full_name("Noto Sans Bold").is_none());
    }

    #[test]
    fn test_from_config_without_system_fonts() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        let directory = FontDbDirectory::from_config(&config);
        assert!(directory.database().is_empty());
    }
}
