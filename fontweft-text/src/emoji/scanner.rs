//! Finite-state scanner that finds the extent of emoji sequences.
//!
//! The automaton is an explicit transition table built at compile time from
//! [`RULES`]. Any (state, category) pair without a rule rejects, except in
//! [`State::Start`], where every category not listed starts plain text.

use super::category::EmojiCategory;

use EmojiCategory as C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum State {
    Start,
    /// A single codepoint with no emoji role.
    PlainText,
    /// Emoji with default text presentation, no selector yet.
    TextDefault,
    Presentation,
    /// Anything followed by U+FE0F.
    EmojiVs,
    /// Anything followed by U+FE0E.
    TextVs,
    ModBase,
    Modified,
    RiOne,
    Flag,
    Keycap0,
    KeycapVs,
    Keycap,
    TagBase,
    TagSeq,
    TagDone,
    Joiner,
    /// Text-default emoji reached through a ZWJ.
    JoinedText,
    Enclosed,
    Reject,
}

impl State {
    const COUNT: usize = State::Reject as usize + 1;

    /// `Some(is_emoji)` when a match may end in this state.
    fn accepts(self) -> Option<bool> {
        match self {
            State::Presentation
            | State::EmojiVs
            | State::ModBase
            | State::Modified
            | State::Flag
            | State::KeycapVs
            | State::Keycap
            | State::TagBase
            | State::TagDone
            | State::JoinedText
            | State::Enclosed => Some(true),
            State::PlainText
            | State::TextDefault
            | State::TextVs
            | State::Keycap0
            | State::RiOne => Some(false),
            State::Start | State::TagSeq | State::Joiner | State::Reject => None,
        }
    }
}

struct Transition {
    from: State,
    on: EmojiCategory,
    to: State,
}

const fn rule(from: State, on: EmojiCategory, to: State) -> Transition {
    Transition { from, on, to }
}

const RULES: &[Transition] = &[
    // Sequence starts
    rule(State::Start, C::Emoji, State::TextDefault),
    rule(State::Start, C::EmojiPresentation, State::Presentation),
    rule(State::Start, C::Modifier, State::Presentation),
    rule(State::Start, C::ModifierBase, State::ModBase),
    rule(State::Start, C::RegionalIndicator, State::RiOne),
    rule(State::Start, C::KeycapBase, State::Keycap0),
    rule(State::Start, C::TagBase, State::TagBase),
    // Presentation selectors, joiners and enclosing marks after a base
    rule(State::TextDefault, C::Vs16, State::EmojiVs),
    rule(State::TextDefault, C::Vs15, State::TextVs),
    rule(State::TextDefault, C::Zwj, State::Joiner),
    rule(State::TextDefault, C::CombiningEnclosingCircleBackslash, State::Enclosed),
    rule(State::Presentation, C::Vs16, State::EmojiVs),
    rule(State::Presentation, C::Vs15, State::TextVs),
    rule(State::Presentation, C::Zwj, State::Joiner),
    rule(State::Presentation, C::CombiningEnclosingCircleBackslash, State::Enclosed),
    rule(State::EmojiVs, C::Zwj, State::Joiner),
    rule(State::JoinedText, C::Vs16, State::EmojiVs),
    rule(State::JoinedText, C::Zwj, State::Joiner),
    // Modifier sequences
    rule(State::ModBase, C::Modifier, State::Modified),
    rule(State::ModBase, C::Vs16, State::EmojiVs),
    rule(State::ModBase, C::Vs15, State::TextVs),
    rule(State::ModBase, C::Zwj, State::Joiner),
    rule(State::ModBase, C::CombiningEnclosingCircleBackslash, State::Enclosed),
    rule(State::Modified, C::Zwj, State::Joiner),
    // Flags
    rule(State::RiOne, C::RegionalIndicator, State::Flag),
    // Keycaps
    rule(State::Keycap0, C::Vs16, State::KeycapVs),
    rule(State::Keycap0, C::Vs15, State::TextVs),
    rule(State::Keycap0, C::CombiningEnclosingKeycap, State::Keycap),
    rule(State::KeycapVs, C::CombiningEnclosingKeycap, State::Keycap),
    // Tag sequences
    rule(State::TagBase, C::TagSequence, State::TagSeq),
    rule(State::TagBase, C::TagTerm, State::TagDone),
    rule(State::TagBase, C::Vs16, State::EmojiVs),
    rule(State::TagBase, C::Zwj, State::Joiner),
    rule(State::TagSeq, C::TagSequence, State::TagSeq),
    rule(State::TagSeq, C::TagTerm, State::TagDone),
    // After a ZWJ
    rule(State::Joiner, C::EmojiPresentation, State::Presentation),
    rule(State::Joiner, C::Modifier, State::Presentation),
    rule(State::Joiner, C::Emoji, State::JoinedText),
    rule(State::Joiner, C::ModifierBase, State::ModBase),
    rule(State::Joiner, C::TagBase, State::TagBase),
];

type Table = [[State; EmojiCategory::COUNT]; State::COUNT];

const TABLE: Table = build_table();

const fn build_table() -> Table {
    let mut table = [[State::Reject; EmojiCategory::COUNT]; State::COUNT];

    let mut category = 0;
    while category < EmojiCategory::COUNT {
        table[State::Start as usize][category] = State::PlainText;
        category += 1;
    }

    let mut i = 0;
    while i < RULES.len() {
        let rule = &RULES[i];
        table[rule.from as usize][rule.on as usize] = rule.to;
        i += 1;
    }
    table
}

/// Scans the longest sequence starting at `pos` and ending at or before
/// `end`.
///
/// Returns the end of the sequence and whether it renders as a single emoji
/// glyph. At least one category is always consumed.
///
/// # Panics
/// If `pos >= end` or `end > categories.len()`.
pub fn scan(categories: &[EmojiCategory], pos: usize, end: usize) -> (usize, bool) {
    assert!(
        pos < end && end <= categories.len(),
        "scan range {pos}..{end} invalid for {} categories",
        categories.len()
    );

    let mut best = (pos + 1, false);
    let mut state = State::Start;
    for (i, &category) in categories[pos..end].iter().enumerate() {
        state = TABLE[state as usize][category as usize];
        if state == State::Reject {
            break;
        }
        if let Some(is_emoji) = state.accepts() {
            best = (pos + i + 1, is_emoji);
        }
    }
    best
}
