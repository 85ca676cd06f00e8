//! Value types shared between the config file and the font crates.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Antialiasing mode a strike is rendered with.
///
/// Part of every strike cache key, so two strikes that differ only in
/// antialiasing never share rendered glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AntiAliasMode {
    /// Coverage is thresholded to fully on/off pixels
    None,
    /// Standard 8-bit coverage (default)
    #[default]
    Grayscale,
    /// Subpixel (LCD) coverage
    Lcd,
}

/// Accepted spellings of the logical family names, compared
/// case-insensitively, with the canonical name each resolves to.
const LOGICAL_FAMILY_ALIASES: &[(&str, &str)] = &[
    ("system", "System"),
    ("serif", "Serif"),
    ("sansserif", "SansSerif"),
    ("sans-serif", "SansSerif"),
    ("dialog", "SansSerif"),
    ("monospaced", "Monospaced"),
    ("monospace", "Monospaced"),
    ("dialoginput", "Monospaced"),
];

/// Canonical logical family name for `name`, if it spells one.
pub fn canonical_family_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    LOGICAL_FAMILY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|&(_, canonical)| canonical)
}

/// Platform family names tried, in order, for each logical family.
///
/// Generic names (`serif`, `sans-serif`, `monospace`, `system-ui`) are
/// understood by the fontdb-backed directory and make good last entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicalFamilies {
    pub system: Vec<String>,
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospaced: Vec<String>,
}

impl Default for LogicalFamilies {
    fn default() -> Self {
        Self {
            system: defaults::system_families(),
            serif: defaults::serif_families(),
            sans_serif: defaults::sans_serif_families(),
            monospaced: defaults::monospaced_families(),
        }
    }
}
