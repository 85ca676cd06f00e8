//! Bidi embedding levels for segmentation.

use unicode_bidi::{BidiClass, BidiInfo, Level, bidi_class};

/// Paragraph base direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
    /// Taken from the first strong character of each paragraph.
    Auto,
}

impl Direction {
    /// Level of an empty paragraph in this direction.
    pub fn paragraph_level(self) -> u8 {
        match self {
            Direction::Rtl => 1,
            Direction::Ltr | Direction::Auto => 0,
        }
    }

    fn base_level(self) -> Option<Level> {
        match self {
            Direction::Ltr => Some(Level::ltr()),
            Direction::Rtl => Some(Level::rtl()),
            Direction::Auto => None,
        }
    }
}

/// Whether `text` can resolve to anything other than level 0.
pub fn needs_bidi(text: &str, direction: Direction) -> bool {
    direction == Direction::Rtl
        || text.chars().any(|c| {
            matches!(
                bidi_class(c),
                BidiClass::R
                    | BidiClass::AL
                    | BidiClass::AN
                    | BidiClass::RLE
                    | BidiClass::LRE
                    | BidiClass::RLO
                    | BidiClass::LRO
                    | BidiClass::RLI
                    | BidiClass::LRI
                    | BidiClass::FSI
            )
        })
}

/// Embedding level of every char of `text`, in char order.
///
/// The full bidi algorithm only runs when [`needs_bidi`] says so; plain LTR
/// text gets all zeros.
pub fn char_levels(text: &str, direction: Direction) -> Vec<u8> {
    if !needs_bidi(text, direction) {
        return vec![0; text.chars().count()];
    }

    let info = BidiInfo::new(text, direction.base_level());
    log::trace!(
        "Bidi analysis over {} bytes in {} paragraph(s)",
        text.len(),
        info.paragraphs.len()
    );
    text.char_indices()
        .map(|(offset, _)| info.levels[offset].number())
        .collect()
}
