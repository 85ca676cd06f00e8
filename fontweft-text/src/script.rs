//! Script classification for run breaking.

pub use unicode_script::Script;
use unicode_script::UnicodeScript;

pub fn script_of(c: char) -> Script {
    c.script()
}

/// Common, Inherited and Unknown characters take the script of the run they
/// sit in instead of starting a new one.
pub fn is_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

/// Scripts whose glyph selection or placement depends on context, so runs in
/// them always go through the shaper.
pub fn is_complex(script: Script) -> bool {
    matches!(
        script,
        Script::Arabic
            | Script::Hebrew
            | Script::Syriac
            | Script::Thaana
            | Script::Nko
            | Script::Devanagari
            | Script::Bengali
            | Script::Gurmukhi
            | Script::Gujarati
            | Script::Oriya
            | Script::Tamil
            | Script::Telugu
            | Script::Kannada
            | Script::Malayalam
            | Script::Sinhala
            | Script::Thai
            | Script::Lao
            | Script::Tibetan
            | Script::Myanmar
            | Script::Khmer
            | Script::Mongolian
            | Script::Hangul
    )
}
