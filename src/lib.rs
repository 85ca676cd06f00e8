//! fontweft: font resolution with fallback slots, strike caching and text
//! run segmentation.
//!
//! The workspace is split the same way the work is:
//!
//! - [`config`]: YAML configuration ([`FontConfig`])
//! - [`fonts`]: physical and composite font resources, logical fonts,
//!   glyph codes and strikes, all owned by a [`FontRegistry`]
//! - [`text`]: run segmentation and emoji sequence scanning
//!
//! A typical caller builds one registry at startup, resolves fonts through
//! it, segments text into runs, and acquires strikes for rendering:
//!
//! ```no_run
//! use fontweft::{Direction, IDENTITY_TRANSFORM};
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = fontweft::init()?;
//! let font = registry.font("SansSerif", true, false, 14.0);
//! for run in fontweft::runs_for(&font, "Hello 👋", Direction::Auto) {
//!     let strike = registry.strike(&font, IDENTITY_TRANSFORM, None);
//!     let _ = (run, strike);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

pub use fontweft_config as config;
pub use fontweft_fonts as fonts;
pub use fontweft_text as text;

pub use fontweft_config::{AntiAliasMode, FontConfig};
pub use fontweft_fonts::{
    FaceLoader, Font, FontRegistry, FontResource, FontStrike, GlyphCode, IDENTITY_TRANSFORM,
    PlatformFontDirectory,
};
pub use fontweft_text::{Direction, RunKind, RunSegmenter, TextRun, TextSpan};

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registry over the system fonts, configured from the default config path.
pub fn init() -> anyhow::Result<FontRegistry> {
    init_from_config_file(&FontConfig::config_path())
}

/// Registry over the system fonts, configured from `path`.
///
/// A missing file means default settings.
pub fn init_from_config_file(path: &Path) -> anyhow::Result<FontRegistry> {
    let config = FontConfig::load_from(path)
        .with_context(|| format!("Failed to load font config from {}", path.display()))?;
    let registry = FontRegistry::with_system_fonts(config)
        .context("Failed to initialize the font registry from system fonts")?;
    log::info!(
        "fontweft {} ready (default family '{}')",
        VERSION,
        registry.config().default_family
    );
    Ok(registry)
}

/// Registry over caller-supplied font sources.
pub fn init_with(
    config: FontConfig,
    directory: Arc<dyn PlatformFontDirectory>,
    loader: Arc<dyn FaceLoader>,
) -> anyhow::Result<FontRegistry> {
    FontRegistry::new(config, directory, loader).context("Failed to initialize the font registry")
}

/// Runs for `text` drawn entirely in `font`.
pub fn runs_for(font: &Font, text: &str, direction: Direction) -> Vec<TextRun> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let span = TextSpan::new(units.len()).with_font(font.clone());
    RunSegmenter::new(direction).segment(&units, &[span])
}
