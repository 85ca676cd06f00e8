//! Text run segmentation for fontweft.
//!
//! [`RunSegmenter`] splits a UTF-16 buffer into [`TextRun`]s that each share
//! one rich-text span, bidi level and script. Tabs, line breaks and emoji
//! sequences are emitted as runs of their own so layout can treat them
//! specially. Emoji sequence boundaries come from the scanner in [`emoji`].

pub mod bidi;
pub mod emoji;
pub mod script;

mod run;
mod segment;

pub use bidi::Direction;
pub use emoji::{EmojiCategory, EmojiIterator, EmojiRun};
pub use run::{RunKind, TextRun};
pub use segment::{RunSegmenter, TextSpan};
