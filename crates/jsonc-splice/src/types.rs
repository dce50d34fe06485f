//! Core types for structural JSONC edits.

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

/// Errors surfaced by the structural editors.
///
/// All three kinds are fatal for the file being patched: the caller should
/// abort with a clear message or fall back to manual editing, never guess.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpliceError {
    /// A key, array, or value the parsed snapshot expects could not be
    /// located in the raw text. Indicates divergence between the snapshot
    /// and the text, or manual corruption.
    #[error("TARGET_NOT_FOUND: {op} \"{key}\"")]
    TargetNotFound { op: &'static str, key: String },
    /// A scan reached end-of-text inside a string or comment.
    #[error("UNTERMINATED_LITERAL")]
    UnterminatedLiteral,
    /// The text has no top-level `{` ... `}` object.
    #[error("INVALID_ROOT_STRUCTURE")]
    InvalidRootStructure,
}

// ── Spans ─────────────────────────────────────────────────────────────────

/// A half-open byte range into a source text.
///
/// Spans are always freshly derived by a scan; they are never stored across
/// edits, since any prior edit invalidates offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text covered by this span.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// A located top-level property: the opening quote of its key and the first
/// significant byte of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySite {
    pub key_index: usize,
    pub value_index: usize,
}
