use super::category::EmojiCategory;
use super::scanner::scan;

/// A maximal range of categories that is either all emoji or all text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiRun {
    pub start: usize,
    pub end: usize,
    pub is_emoji: bool,
}

/// Drives [`scan`] across a category buffer, merging consecutive sequences
/// with the same classification.
pub struct EmojiIterator<'a> {
    categories: &'a [EmojiCategory],
    pos: usize,
}

impl<'a> EmojiIterator<'a> {
    pub fn new(categories: &'a [EmojiCategory]) -> Self {
        Self { categories, pos: 0 }
    }
}

impl Iterator for EmojiIterator<'_> {
    type Item = EmojiRun;

    fn next(&mut self) -> Option<EmojiRun> {
        let len = self.categories.len();
        if self.pos >= len {
            return None;
        }

        let start = self.pos;
        let (mut end, is_emoji) = scan(self.categories, start, len);
        while end < len {
            let (next_end, next_emoji) = scan(self.categories, end, len);
            if next_emoji != is_emoji {
                break;
            }
            end = next_end;
        }
        self.pos = end;
        Some(EmojiRun {
            start,
            end,
            is_emoji,
        })
    }
}
