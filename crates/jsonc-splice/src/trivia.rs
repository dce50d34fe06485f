//! Comma placement over trivia.
//!
//! Decides whether an insertion or removal point needs a separator by
//! looking past whitespace and comments — including a trailing `//`
//! comment on the same line as real content — to the nearest
//! syntactically significant byte.

use crate::scan::{Lexeme, Scanner};

/// The nearest significant byte at or after `from`, skipping whitespace
/// and whole comment spans. `from` must be a code-position anchor.
pub fn next_significant(text: &str, from: usize) -> Option<(usize, u8)> {
    let mut scanner = Scanner::new(text, from);
    loop {
        let at = scanner.pos();
        match scanner.step()? {
            Lexeme::Significant(b) => return Some((at, b)),
            Lexeme::Trivia => {}
        }
    }
}

/// The nearest significant byte strictly before `before`.
///
/// Scans forward from the start of the text and keeps the last hit rather
/// than walking bytes in reverse: a `//` comment is only recognizable from
/// the front, so a backward walk cannot be made string/comment-exact.
pub fn prev_significant(text: &str, before: usize) -> Option<(usize, u8)> {
    let mut scanner = Scanner::new(text, 0);
    let mut last = None;
    while scanner.pos() < before {
        let at = scanner.pos();
        match scanner.step() {
            Some(Lexeme::Significant(b)) => last = Some((at, b)),
            Some(Lexeme::Trivia) => {}
            None => break,
        }
    }
    last
}

/// Whether a fragment inserted at `insertion_index` must be preceded by a
/// comma: true after `}`, `]`, a closing quote, or an identifier/number;
/// false right after `{`, `[`, an existing `,`, or a `:`.
pub fn needs_leading_comma(text: &str, insertion_index: usize) -> bool {
    match prev_significant(text, insertion_index) {
        Some((_, b'{')) | Some((_, b'[')) | Some((_, b',')) | Some((_, b':')) | None => false,
        Some(_) => true,
    }
}

/// Whether a fragment inserted at `insertion_index` must be followed by a
/// comma: false right before `]`, `}`, or end of text; true when more
/// content follows.
pub fn needs_trailing_comma(text: &str, insertion_index: usize) -> bool {
    match next_significant(text, insertion_index) {
        Some((_, b']')) | Some((_, b'}')) | None => false,
        Some(_) => true,
    }
}
