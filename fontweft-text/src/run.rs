use std::ops::Range;

use crate::script::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Text,
    /// A single U+0009.
    Tab,
    /// CR, LF, or CR+LF within one span.
    LineBreak,
    /// One emoji sequence, drawn as a single glyph.
    Emoji,
}

/// A contiguous range of UTF-16 code units that shares span, bidi level,
/// script and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Offset in UTF-16 code units.
    pub start: usize,
    pub length: usize,
    pub level: u8,
    pub script: Script,
    /// Needs full shaping rather than per-glyph advances.
    pub complex: bool,
    pub kind: RunKind,
    /// Index of the span this run belongs to, `None` past the last span.
    pub span: Option<usize>,
}

impl TextRun {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }
}
