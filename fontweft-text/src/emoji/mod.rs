//! Emoji sequence detection.
//!
//! Codepoints are first classified into [`EmojiCategory`] values, then a
//! table-driven scanner finds where each emoji sequence (flags, keycaps, ZWJ
//! sequences, modifier pairs, tag flags) begins and ends.

mod category;
mod iterator;
mod scanner;
mod tables;

pub use category::EmojiCategory;
pub use iterator::{EmojiIterator, EmojiRun};
pub use scanner::scan;
