//! Integration tests for font resolution through `FontRegistry`.

mod common;

use std::sync::Arc;

use common::{
    MockFonts, mock_font_bytes, registry_with, standard_config, standard_fonts,
    standard_registry,
};
use fontweft_config::{FontConfig, LogicalFamilies};
use fontweft_fonts::{FontError, FontRegistry, FontResource, GlyphCode, IDENTITY_TRANSFORM};
use tempfile::TempDir;

#[test]
fn test_logical_font_sans_serif_bold() {
    let (registry, _fonts) = standard_registry();

    let font = registry.logical_font("SansSerif Bold", 24.0).unwrap();
    assert!(font.is_bold());
    assert!(!font.is_italic());
    assert_eq!(font.size(), 24.0);
    assert_eq!(font.full_name(), "SansSerif Bold");
    assert_eq!(font.primary().full_name(), "Mock Sans Bold");

    let lower = registry.logical_font("sansserif bold", 24.0).unwrap();
    assert_eq!(font, lower);
}

#[test]
fn test_logical_font_is_memoized() {
    let (registry, _fonts) = standard_registry();
    let a = registry.logical_font("Serif Bold", 12.0).unwrap();
    let b = registry.logical_font("serif BOLD", 18.0).unwrap();
    match (a.resource(), b.resource()) {
        (FontResource::Composite(a), FontResource::Composite(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => panic!("logical fonts are composites"),
    }
}

#[test]
fn test_logical_font_rejects_loose_styles() {
    let (registry, _fonts) = standard_registry();
    assert!(registry.logical_font("SansSerif Oblique", 12.0).is_none());
    assert!(registry.logical_font("SansSerif", 12.0).is_none());
    assert!(registry.logical_font("Helvetica Bold", 12.0).is_none());
}

#[test]
fn test_loose_family_spellings() {
    let (registry, _fonts) = standard_registry();
    let dialog = registry.font("dialog", false, false, 12.0);
    let sans = registry.font("SansSerif", false, false, 12.0);
    assert_eq!(dialog, sans);

    let mono = registry.font("DialogInput", false, false, 12.0);
    assert_eq!(mono.primary().full_name(), "Mock Mono Regular");
}

#[test]
fn test_logical_family_skips_missing_platform_family() {
    let (registry, _fonts) = standard_registry();
    let serif = registry.logical_font("Serif Regular", 12.0).unwrap();
    assert_eq!(serif.primary().full_name(), "Mock Serif Regular");
}

#[test]
fn test_platform_family_and_full_name() {
    let (registry, _fonts) = standard_registry();

    let by_family = registry.font("Mock Serif", true, false, 10.0);
    assert_eq!(by_family.primary().full_name(), "Mock Serif Bold");

    let by_name = registry.find_font("mock serif bold", 10.0).unwrap();
    assert_eq!(by_name, by_family);
}

#[test]
fn test_require_font_reports_not_found() {
    let (registry, _fonts) = standard_registry();
    assert!(registry.require_font("Mock Mono Regular", 11.0).is_ok());
    match registry.require_font("Papyrus", 11.0) {
        Err(FontError::NotFound(name)) => assert_eq!(name, "Papyrus"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_unresolved_font_degrades_to_default() {
    let (registry, _fonts) = standard_registry();

    let font = registry.font("Papyrus", false, false, 14.0);
    assert_eq!(font, registry.default_font(14.0));
    assert_eq!(font.full_name(), "System Regular");

    // The requested style survives the degradation
    let bold = registry.font("Papyrus", true, false, 14.0);
    assert!(bold.is_bold());

    assert!(registry.find_font("Papyrus", 14.0).is_none());
    assert_eq!(
        registry.font_by_full_name("Papyrus Bold", 14.0),
        registry.default_font(14.0)
    );
}

#[test]
fn test_no_default_font_is_an_error() {
    let fonts = MockFonts::new();
    let config = FontConfig {
        logical_families: LogicalFamilies {
            system: vec!["Absent".to_string()],
            ..LogicalFamilies::default()
        },
        load_system_fonts: false,
        ..FontConfig::default()
    };
    match FontRegistry::new(config, fonts.directory.clone(), fonts.loader.clone()) {
        Err(FontError::NoDefaultFont(family)) => assert_eq!(family, "System"),
        Err(other) => panic!("expected NoDefaultFont, got {other}"),
        Ok(_) => panic!("expected NoDefaultFont, got a registry"),
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let fonts = standard_fonts();
    let config = FontConfig {
        retained_strikes: 1_000_000,
        ..standard_config()
    };
    let result = FontRegistry::new(config, fonts.directory.clone(), fonts.loader.clone());
    assert!(matches!(result, Err(FontError::Config(_))));
}

#[test]
fn test_configured_default_family() {
    let config = FontConfig {
        default_family: "monospaced".to_string(),
        ..standard_config()
    };
    let (registry, _fonts) = registry_with(config);
    assert_eq!(
        registry.default_font(12.0).primary().full_name(),
        "Mock Mono Regular"
    );
}

#[test]
fn test_default_family_loose_spelling() {
    let config = FontConfig {
        default_family: "monospace".to_string(),
        ..standard_config()
    };
    let (registry, _fonts) = registry_with(config);
    assert_eq!(
        registry.default_font(12.0).primary().full_name(),
        "Mock Mono Regular"
    );
}

#[test]
fn test_char_to_glyph_through_font() {
    let (registry, _fonts) = standard_registry();
    let font = registry.default_font(12.0);
    assert_eq!(font.char_to_glyph('Q' as u32), GlyphCode::encode(0, 'Q' as u32));
    assert_eq!(font.char_to_glyph(0x4E00).slot(), 1);
    assert!(font.is_emoji_glyph(0x1F600));
    assert!(!font.is_emoji_glyph('Q' as u32));
}

#[test]
fn test_register_embedded_font() {
    let (registry, _fonts) = standard_registry();

    let resource = registry
        .register_embedded("Brand Face", mock_font_bytes("Brand"))
        .unwrap();
    assert_eq!(resource.full_name(), "Brand Regular");

    let font = registry.find_font("brand face", 16.0).unwrap();
    assert!(Arc::ptr_eq(font.primary(), &resource));

    assert!(registry.unregister("Brand Face"));
    assert!(!registry.unregister("Brand Face"));
    assert!(registry.find_font("brand face", 16.0).is_none());
}

#[test]
fn test_register_embedded_rejects_garbage() {
    let (registry, _fonts) = standard_registry();
    let err = registry
        .register_embedded("Junk", vec![0u8; 32])
        .unwrap_err();
    assert!(matches!(err, FontError::MalformedFont { .. }));
}

#[test]
fn test_temporary_font_removed_on_unregister() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("downloaded.ttf");
    std::fs::write(&path, mock_font_bytes("Downloaded")).unwrap();

    let (registry, _fonts) = standard_registry();
    let resource = registry.register_file(&path, true).unwrap();
    assert_eq!(resource.full_name(), "Downloaded Regular");
    assert!(registry.find_font("Downloaded Regular", 12.0).is_some());

    assert!(registry.unregister("downloaded regular"));
    assert!(!path.exists());
}

#[test]
fn test_shutdown_removes_temporary_fonts_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temporary = temp_dir.path().join("temp.ttf");
    let kept = temp_dir.path().join("kept.ttf");
    std::fs::write(&temporary, mock_font_bytes("Temp")).unwrap();
    std::fs::write(&kept, mock_font_bytes("Kept")).unwrap();

    let (registry, _fonts) = standard_registry();
    registry.register_file(&temporary, true).unwrap();
    registry.register_file(&kept, false).unwrap();

    let font = registry.default_font(12.0);
    let strike = registry.strike(&font, IDENTITY_TRANSFORM, None);

    registry.shutdown();
    assert!(registry.is_shut_down());
    assert!(!temporary.exists());
    assert!(kept.exists());

    // Handles taken before shutdown stay usable
    assert_eq!(strike.glyph(font.char_to_glyph('a' as u32)).id(), 'a' as u32);

    // Idempotent, and drop after shutdown is harmless
    registry.shutdown();
    drop(registry);
    assert!(kept.exists());
}

#[test]
fn test_drop_runs_shutdown() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("scratch.ttf");
    std::fs::write(&path, mock_font_bytes("Scratch")).unwrap();

    {
        let (registry, _fonts) = standard_registry();
        registry.register_file(&path, true).unwrap();
    }
    assert!(!path.exists());
}

#[test]
fn test_register_missing_file_reports_io_error() {
    let (registry, _fonts) = standard_registry();
    let err = registry
        .register_file(std::path::Path::new("/no/such/font.ttf"), false)
        .unwrap_err();
    assert!(matches!(err, FontError::Io { .. }));
}
