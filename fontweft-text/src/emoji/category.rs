//! Per-codepoint emoji segmentation categories.

use super::tables::{EMOJI, EMOJI_MODIFIER_BASE, EMOJI_PRESENTATION, contains};

/// Role a codepoint plays in forming emoji sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EmojiCategory {
    /// Not emoji related.
    Text,
    /// Emoji that defaults to text presentation (e.g. U+2764).
    Emoji,
    /// Emoji that defaults to emoji presentation.
    EmojiPresentation,
    ModifierBase,
    /// Skin tone modifier.
    Modifier,
    RegionalIndicator,
    /// `0`-`9`, `#` and `*`.
    KeycapBase,
    CombiningEnclosingKeycap,
    CombiningEnclosingCircleBackslash,
    Zwj,
    /// Text presentation selector (U+FE0E).
    Vs15,
    /// Emoji presentation selector (U+FE0F).
    Vs16,
    /// U+1F3F4, the base of subdivision flags.
    TagBase,
    TagSequence,
    /// Cancel tag (U+E007F).
    TagTerm,
}

impl EmojiCategory {
    pub const COUNT: usize = 15;

    pub fn of_char(c: char) -> EmojiCategory {
        Self::of(c as u32)
    }

    pub fn of(cp: u32) -> EmojiCategory {
        match cp {
            0x30..=0x39 | 0x23 | 0x2A => EmojiCategory::KeycapBase,
            0x200D => EmojiCategory::Zwj,
            0xFE0E => EmojiCategory::Vs15,
            0xFE0F => EmojiCategory::Vs16,
            0x20E3 => EmojiCategory::CombiningEnclosingKeycap,
            0x20E0 => EmojiCategory::CombiningEnclosingCircleBackslash,
            0xE0020..=0xE007E => EmojiCategory::TagSequence,
            0xE007F => EmojiCategory::TagTerm,
            0x1F3F4 => EmojiCategory::TagBase,
            0x1F1E6..=0x1F1FF => EmojiCategory::RegionalIndicator,
            0x1F3FB..=0x1F3FF => EmojiCategory::Modifier,
            _ if cp < 0xA9 => EmojiCategory::Text,
            _ if contains(EMOJI_MODIFIER_BASE, cp) => EmojiCategory::ModifierBase,
            _ if contains(EMOJI_PRESENTATION, cp) => EmojiCategory::EmojiPresentation,
            _ if contains(EMOJI, cp) => EmojiCategory::Emoji,
            _ => EmojiCategory::Text,
        }
    }
}
