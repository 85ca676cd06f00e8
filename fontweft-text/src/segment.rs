//! Splits a UTF-16 buffer into runs for shaping.
//!
//! One pass over the buffer in codepoint order. Surrogate pairs are merged
//! before any classification. A run ends when the span, the bidi level or
//! the strong script changes; tabs, line breaks and emoji sequences always
//! get runs of their own.

use fontweft_fonts::Font;

use crate::bidi::{self, Direction};
use crate::emoji::{self, EmojiCategory};
use crate::run::{RunKind, TextRun};
use crate::script::{self, Script};

/// A stretch of rich text sharing one font.
#[derive(Debug, Clone, Default)]
pub struct TextSpan {
    /// Length in UTF-16 code units.
    pub length: usize,
    /// Font used to decide which codepoints render as color emoji. Without
    /// one every scanned emoji sequence is treated as emoji.
    pub font: Option<Font>,
    /// Explicit OpenType features were requested, so shaping is required.
    pub features: bool,
}

impl TextSpan {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Default::default()
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_features(mut self) -> Self {
        self.features = true;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Unichar {
    ch: char,
    /// UTF-16 offset.
    start: usize,
    /// 2 for a surrogate pair, otherwise 1.
    units: usize,
    span: Option<usize>,
}

fn decode(text: &[u16], spans: &[TextSpan]) -> Vec<Unichar> {
    let mut chars = Vec::with_capacity(text.len());
    let mut offset = 0;
    let mut span = 0;
    let mut span_end = spans.first().map_or(0, |s| s.length);

    for decoded in char::decode_utf16(text.iter().copied()) {
        let (ch, units) = match decoded {
            Ok(ch) => (ch, ch.len_utf16()),
            Err(_) => (char::REPLACEMENT_CHARACTER, 1),
        };
        while span < spans.len() && offset >= span_end {
            span += 1;
            span_end += spans.get(span).map_or(0, |s| s.length);
        }
        chars.push(Unichar {
            ch,
            start: offset,
            units,
            span: (span < spans.len()).then_some(span),
        });
        offset += units;
    }
    chars
}

/// Text run being accumulated, in unichar indices.
struct Pending {
    start: usize,
    end: usize,
    span: Option<usize>,
    level: u8,
    script: Script,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSegmenter {
    direction: Direction,
}

impl RunSegmenter {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn segment_str(&self, text: &str, spans: &[TextSpan]) -> Vec<TextRun> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.segment(&units, spans)
    }

    /// Runs over `text` in logical order.
    ///
    /// `spans` cover the buffer front to back; code units past their total
    /// length belong to no span. The result is never empty: an empty buffer,
    /// or one ending in a line break, gets a trailing zero-length run.
    pub fn segment(&self, text: &[u16], spans: &[TextSpan]) -> Vec<TextRun> {
        let chars = decode(text, spans);
        let decoded: String = chars.iter().map(|u| u.ch).collect();
        let levels = bidi::char_levels(&decoded, self.direction);
        let categories: Vec<EmojiCategory> =
            chars.iter().map(|u| EmojiCategory::of_char(u.ch)).collect();
        let span_ends = span_segment_ends(&chars);

        let mut out = Segments {
            chars: &chars,
            spans,
            runs: Vec::new(),
        };
        let mut pending: Option<Pending> = None;
        // End of the last scanned sequence that did not qualify as emoji.
        // Nothing inside it can qualify either, so it is not rescanned.
        let mut plain_until = 0;
        let mut i = 0;

        while i < chars.len() {
            let u = chars[i];
            let level = levels[i];

            let delimiter = match u.ch {
                '\t' => Some((RunKind::Tab, 1)),
                '\r' if chars.get(i + 1).is_some_and(|n| n.ch == '\n' && n.span == u.span) => {
                    Some((RunKind::LineBreak, 2))
                }
                '\r' | '\n' => Some((RunKind::LineBreak, 1)),
                _ => None,
            };
            if let Some((kind, len)) = delimiter {
                out.flush(pending.take());
                out.push(i, i + len, level, Script::Common, false, kind);
                i += len;
                continue;
            }

            if i >= plain_until {
                let (end, scanned_emoji) = emoji::scan(&categories, i, span_ends[i]);
                let font = out.font(u.span);
                if qualifies_as_emoji(&chars[i..end], &categories[i..end], scanned_emoji, font) {
                    out.flush(pending.take());
                    let complex = end - i > 1 || level % 2 == 1 || out.features(u.span);
                    out.push(i, end, level, Script::Common, complex, RunKind::Emoji);
                    i = end;
                    continue;
                }
                plain_until = end;
            }

            let script = script::script_of(u.ch);
            if let Some(run) = pending.as_mut() {
                let same_script = script::is_neutral(script)
                    || script::is_neutral(run.script)
                    || run.script == script;
                if run.span == u.span && run.level == level && same_script {
                    if script::is_neutral(run.script) && !script::is_neutral(script) {
                        run.script = script;
                    }
                    run.end = i + 1;
                    i += 1;
                    continue;
                }
            }
            out.flush(pending.take());
            pending = Some(Pending {
                start: i,
                end: i + 1,
                span: u.span,
                level,
                script,
            });
            i += 1;
        }
        out.flush(pending);

        let mut runs = out.runs;
        if runs.last().is_none_or(|run| run.kind == RunKind::LineBreak) {
            let (level, span) = runs
                .last()
                .map_or((self.direction.paragraph_level(), None), |run| {
                    (run.level, run.span)
                });
            runs.push(TextRun {
                start: text.len(),
                length: 0,
                level,
                script: Script::Common,
                complex: false,
                kind: RunKind::Text,
                span,
            });
        }
        log::trace!("Segmented {} code units into {} runs", text.len(), runs.len());
        runs
    }
}

/// Emoji sequences found by the scanner qualify when the span's font
/// draws any of their codepoints in color, or when there is no font. A
/// lone codepoint that can stand as an emoji by itself also qualifies if
/// the font draws it in color. Joiners, selectors, tags and enclosing marks
/// never do.
fn qualifies_as_emoji(
    chars: &[Unichar],
    categories: &[EmojiCategory],
    scanned_emoji: bool,
    font: Option<&Font>,
) -> bool {
    match font {
        None => scanned_emoji,
        Some(font) if scanned_emoji => chars.iter().any(|u| font.is_emoji_glyph(u.ch as u32)),
        Some(font) => {
            chars.len() == 1
                && stands_alone(categories[0])
                && font.is_emoji_glyph(chars[0].ch as u32)
        }
    }
}

fn stands_alone(category: EmojiCategory) -> bool {
    matches!(
        category,
        EmojiCategory::Emoji
            | EmojiCategory::EmojiPresentation
            | EmojiCategory::ModifierBase
            | EmojiCategory::Modifier
            | EmojiCategory::RegionalIndicator
            | EmojiCategory::TagBase
    )
}

/// For each unichar, the index one past the last unichar in the same span.
fn span_segment_ends(chars: &[Unichar]) -> Vec<usize> {
    let mut ends = vec![chars.len(); chars.len()];
    for i in (0..chars.len().saturating_sub(1)).rev() {
        if chars[i].span == chars[i + 1].span {
            ends[i] = ends[i + 1];
        } else {
            ends[i] = i + 1;
        }
    }
    ends
}

struct Segments<'a> {
    chars: &'a [Unichar],
    spans: &'a [TextSpan],
    runs: Vec<TextRun>,
}

impl Segments<'_> {
    fn font(&self, span: Option<usize>) -> Option<&Font> {
        span.and_then(|s| self.spans[s].font.as_ref())
    }

    fn features(&self, span: Option<usize>) -> bool {
        span.is_some_and(|s| self.spans[s].features)
    }

    /// Appends a run covering unichars `from..to`.
    fn push(
        &mut self,
        from: usize,
        to: usize,
        level: u8,
        script: Script,
        complex: bool,
        kind: RunKind,
    ) {
        let first = self.chars[from];
        let last = self.chars[to - 1];
        self.runs.push(TextRun {
            start: first.start,
            length: last.start + last.units - first.start,
            level,
            script,
            complex,
            kind,
            span: first.span,
        });
    }

    fn flush(&mut self, pending: Option<Pending>) {
        if let Some(run) = pending {
            let complex =
                script::is_complex(run.script) || run.level % 2 == 1 || self.features(run.span);
            self.push(run.start, run.end, run.level, run.script, complex, RunKind::Text);
        }
    }
}
