//! String- and comment-aware scanning primitives.
//!
//! Every function here rebuilds its lexical state from a known-good anchor
//! (the start of the text, or a byte known to sit in code position), so a
//! scan can never be poisoned by offsets left over from a previous edit.
//! Nothing is cached between calls.

use crate::types::{KeySite, Span, SpliceError};

// ── Lexical state ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    /// Inside a string literal opened by the given quote byte.
    Str(u8),
    LineComment,
    BlockComment,
}

/// Why a scan ran off the end of the buffer.
///
/// This is the scan-layer sentinel; the editor layer converts it into a
/// [`SpliceError`] carrying the attempted operation and key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    UnterminatedString,
    UnterminatedComment,
    Unbalanced,
}

/// One consumed byte, classified against the mode in effect when the cursor
/// reached it. Comment bytes (openers and terminators included) and
/// whitespace are trivia; everything else, string bytes included, is
/// significant content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    Significant(u8),
    Trivia,
}

pub(crate) struct Scanner<'a> {
    data: &'a [u8],
    x: usize,
    mode: Mode,
    escape_next: bool,
}

impl<'a> Scanner<'a> {
    /// A fresh scanner positioned at `anchor`, which must be a code-mode
    /// byte boundary of `text`.
    pub(crate) fn new(text: &'a str, anchor: usize) -> Self {
        Scanner {
            data: text.as_bytes(),
            x: anchor,
            mode: Mode::Code,
            escape_next: false,
        }
    }

    /// Index of the next byte to be consumed.
    pub(crate) fn pos(&self) -> usize {
        self.x
    }

    /// True when the next byte will be consumed in code position (outside
    /// strings and comments). Structural bytes only count where this holds.
    pub(crate) fn in_code(&self) -> bool {
        self.mode == Mode::Code
    }

    /// Consume one byte, updating the lexical mode. Comment openers and the
    /// `*/` terminator consume two bytes at once.
    pub(crate) fn step(&mut self) -> Option<Lexeme> {
        let b = *self.data.get(self.x)?;
        self.x += 1;
        let lexeme = match self.mode {
            Mode::Str(quote) => {
                if self.escape_next {
                    self.escape_next = false;
                } else if b == b'\\' {
                    self.escape_next = true;
                } else if b == quote {
                    self.mode = Mode::Code;
                }
                Lexeme::Significant(b)
            }
            Mode::LineComment => {
                if b == b'\n' {
                    self.mode = Mode::Code;
                }
                Lexeme::Trivia
            }
            Mode::BlockComment => {
                if b == b'*' && self.data.get(self.x) == Some(&b'/') {
                    self.x += 1;
                    self.mode = Mode::Code;
                }
                Lexeme::Trivia
            }
            Mode::Code => match b {
                b'"' | b'\'' => {
                    self.mode = Mode::Str(b);
                    Lexeme::Significant(b)
                }
                b'/' if self.data.get(self.x) == Some(&b'/') => {
                    self.x += 1;
                    self.mode = Mode::LineComment;
                    Lexeme::Trivia
                }
                b'/' if self.data.get(self.x) == Some(&b'*') => {
                    self.x += 1;
                    self.mode = Mode::BlockComment;
                    Lexeme::Trivia
                }
                b' ' | b'\t' | b'\n' | b'\r' => Lexeme::Trivia,
                _ => Lexeme::Significant(b),
            },
        };
        Some(lexeme)
    }

    /// The sentinel describing the mode the scanner ran out of input in.
    fn end(&self) -> ScanEnd {
        match self.mode {
            Mode::Str(_) => ScanEnd::UnterminatedString,
            Mode::BlockComment => ScanEnd::UnterminatedComment,
            _ => ScanEnd::Unbalanced,
        }
    }

    /// Consume the remainder of a string whose opening quote was just
    /// consumed. Returns the index of the closing quote.
    fn finish_string(&mut self) -> Result<usize, ScanEnd> {
        loop {
            let at = self.x;
            match self.step() {
                Some(_) => {
                    if self.mode == Mode::Code {
                        return Ok(at);
                    }
                }
                None => return Err(ScanEnd::UnterminatedString),
            }
        }
    }

    /// Advance to the next significant byte; returns its index and value.
    fn next_significant_at(&mut self) -> Option<(usize, u8)> {
        loop {
            let at = self.x;
            match self.step()? {
                Lexeme::Significant(b) => return Some((at, b)),
                Lexeme::Trivia => {}
            }
        }
    }
}

// ── Bracket matching ──────────────────────────────────────────────────────

/// Find the `close` bracket matching the `open` bracket at `open_index`.
///
/// Maintains a depth counter over code-position bytes only: brackets inside
/// double- or single-quoted strings (escapes respected), `//` comments, and
/// `/* */` comments never count. Returns the index of the matching close
/// bracket, or the [`ScanEnd`] sentinel when the scan runs off the end of
/// the text first.
pub fn find_matching_bracket(
    text: &str,
    open_index: usize,
    open: u8,
    close: u8,
) -> Result<usize, ScanEnd> {
    if text.as_bytes().get(open_index) != Some(&open) {
        return Err(ScanEnd::Unbalanced);
    }
    let mut scanner = Scanner::new(text, open_index);
    let mut depth = 0usize;
    loop {
        let at = scanner.pos();
        let in_code = scanner.in_code();
        match scanner.step() {
            Some(Lexeme::Significant(b)) if in_code && b == open => depth += 1,
            Some(Lexeme::Significant(b)) if in_code && b == close => {
                depth -= 1;
                if depth == 0 {
                    return Ok(at);
                }
            }
            Some(_) => {}
            None => return Err(scanner.end()),
        }
    }
}

/// Bounds of the `{ ... }` object enclosing `inner_index`, which must lie
/// inside some object (typically a key or value of an array element).
///
/// Scans forward from the start of the text keeping a stack of open-brace
/// positions, so string and comment content can never be mistaken for
/// structure; the innermost unclosed brace when the cursor passes
/// `inner_index` is the enclosing object. `None` when no such object exists
/// or the text is malformed.
pub fn find_object_bounds_around(text: &str, inner_index: usize) -> Option<Span> {
    let mut scanner = Scanner::new(text, 0);
    let mut stack: Vec<usize> = Vec::new();
    while scanner.pos() <= inner_index {
        let at = scanner.pos();
        let in_code = scanner.in_code();
        match scanner.step() {
            Some(Lexeme::Significant(b'{')) if in_code => stack.push(at),
            Some(Lexeme::Significant(b'}')) if in_code => {
                stack.pop();
            }
            Some(_) => {}
            None => return None,
        }
    }
    let start = *stack.last()?;
    let end = find_matching_bracket(text, start, b'{', b'}').ok()?;
    Some(Span::new(start, end + 1))
}

/// True when `[start, end)` holds nothing but whitespace and comments.
///
/// This is the "empty" that matters for insertion formatting: an array
/// holding only comments formats a first insertion the same way a
/// zero-byte body does.
pub fn is_region_empty(text: &str, start: usize, end: usize) -> bool {
    let mut scanner = Scanner::new(text, start);
    while scanner.pos() < end {
        match scanner.step() {
            Some(Lexeme::Significant(_)) => return false,
            Some(Lexeme::Trivia) => {}
            None => break,
        }
    }
    true
}

// ── Root object and key location ──────────────────────────────────────────

/// Span of the top-level `{ ... }` object, opening brace through the byte
/// after its matching close.
///
/// The first significant byte of the text must be `{`; the match is found
/// with the bracket scanner, never a bare reverse search, since `}` may
/// occur inside strings or comments.
pub fn find_root_span(text: &str) -> Result<Span, SpliceError> {
    let mut scanner = Scanner::new(text, 0);
    loop {
        let at = scanner.pos();
        match scanner.step() {
            Some(Lexeme::Significant(b'{')) => {
                let close = find_matching_bracket(text, at, b'{', b'}').map_err(|end| match end {
                    ScanEnd::Unbalanced => SpliceError::InvalidRootStructure,
                    _ => SpliceError::UnterminatedLiteral,
                })?;
                return Ok(Span::new(at, close + 1));
            }
            Some(Lexeme::Significant(_)) => return Err(SpliceError::InvalidRootStructure),
            Some(Lexeme::Trivia) => {}
            None => return Err(SpliceError::InvalidRootStructure),
        }
    }
}

/// Locate the property named `key` directly inside the root object.
///
/// A match requires all of: the scanner is in code position at the opening
/// quote, the token sits at depth 1 (immediately inside the root object,
/// not in any nested object or array), and the token is followed by `:`.
/// Key text occurring inside string literals, comments, or deeper structure
/// can therefore never match.
pub fn find_top_level_key(text: &str, key: &str) -> Result<Option<KeySite>, SpliceError> {
    let root = find_root_span(text)?;
    let mut scanner = Scanner::new(text, root.start);
    let mut depth = 0usize;
    while scanner.pos() < root.end {
        let at = scanner.pos();
        let in_code = scanner.in_code();
        match scanner.step() {
            Some(Lexeme::Significant(b'{')) | Some(Lexeme::Significant(b'[')) if in_code => {
                depth += 1;
            }
            Some(Lexeme::Significant(b'}')) | Some(Lexeme::Significant(b']')) if in_code => {
                depth = depth.saturating_sub(1);
            }
            Some(Lexeme::Significant(b'"')) | Some(Lexeme::Significant(b'\'')) if in_code => {
                let close = scanner
                    .finish_string()
                    .map_err(|_| SpliceError::UnterminatedLiteral)?;
                if depth != 1 || &text[at + 1..close] != key {
                    continue;
                }
                match scanner.next_significant_at() {
                    Some((_, b':')) => {}
                    Some((_, b'}')) | Some((_, b']')) => {
                        // A value string that happens to equal the key,
                        // closing its container.
                        depth = depth.saturating_sub(1);
                        continue;
                    }
                    _ => continue,
                }
                match scanner.next_significant_at() {
                    Some((value_index, _)) => {
                        return Ok(Some(KeySite {
                            key_index: at,
                            value_index,
                        }));
                    }
                    None => return Ok(None),
                }
            }
            Some(_) => {}
            None => break,
        }
    }
    Ok(None)
}

/// Find a `"field_name": field_value` pair anywhere inside `within`,
/// returning the index of the field name's opening quote.
///
/// Only string tokens in code position are considered as field names, and
/// the token must be followed by `:`. Values are compared byte-for-byte as
/// written in the text (string values against their raw, still-escaped
/// content; bare literals against their spelling), so an escaped spelling
/// of the same value does not match rather than being guessed at.
pub fn find_field_value(
    text: &str,
    within: Span,
    field_name: &str,
    field_value: &str,
) -> Result<Option<usize>, ScanEnd> {
    let mut scanner = Scanner::new(text, within.start);
    while scanner.pos() < within.end {
        let at = scanner.pos();
        let in_code = scanner.in_code();
        match scanner.step() {
            Some(Lexeme::Significant(b'"')) | Some(Lexeme::Significant(b'\'')) if in_code => {
                let close = scanner.finish_string()?;
                if &text[at + 1..close] != field_name {
                    continue;
                }
                match scanner.next_significant_at() {
                    Some((_, b':')) => {}
                    _ => continue,
                }
                match scanner.next_significant_at() {
                    Some((vi, b'"')) | Some((vi, b'\'')) => {
                        let vclose = scanner.finish_string()?;
                        if &text[vi + 1..vclose] == field_value {
                            return Ok(Some(at));
                        }
                    }
                    Some((vi, _)) => {
                        let vend = bare_end(text.as_bytes(), vi);
                        if &text[vi..vend] == field_value {
                            return Ok(Some(at));
                        }
                    }
                    None => return Ok(None),
                }
            }
            Some(_) => {}
            None => return Err(scanner.end()),
        }
    }
    Ok(None)
}

/// Index just past the value token starting at `start`: a bracketed
/// structure, a string, or a bare literal (number, `true`, `false`,
/// `null`).
pub fn value_end(text: &str, start: usize) -> Result<usize, ScanEnd> {
    let data = text.as_bytes();
    match data.get(start).copied() {
        Some(b'[') => Ok(find_matching_bracket(text, start, b'[', b']')? + 1),
        Some(b'{') => Ok(find_matching_bracket(text, start, b'{', b'}')? + 1),
        Some(b'"') | Some(b'\'') => {
            let mut scanner = Scanner::new(text, start);
            let _ = scanner.step();
            Ok(scanner.finish_string()? + 1)
        }
        Some(_) => Ok(bare_end(data, start)),
        None => Err(ScanEnd::Unbalanced),
    }
}

/// End of a bare literal token (number, boolean, null) starting at `start`.
fn bare_end(data: &[u8], start: usize) -> usize {
    let mut x = start;
    while x < data.len() {
        match data[x] {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'+' | b'-' | b'_' => x += 1,
            _ => break,
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_match_flat() {
        let text = r#"{"a": 1}"#;
        assert_eq!(find_matching_bracket(text, 0, b'{', b'}'), Ok(7));
    }

    #[test]
    fn test_bracket_match_nested() {
        let text = r#"{"a": {"b": {}}, "c": []}"#;
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Ok(text.len() - 1)
        );
        let inner = text.find("{\"b\"").unwrap();
        assert_eq!(find_matching_bracket(text, inner, b'{', b'}'), Ok(14));
    }

    #[test]
    fn test_bracket_ignores_strings() {
        // Braces inside string values never perturb the depth counter.
        let text = r#"{"database_name": "a{b}c"}"#;
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Ok(text.len() - 1)
        );
    }

    #[test]
    fn test_bracket_ignores_escaped_quotes() {
        let text = r#"{"a": "she said \"}\" loudly"}"#;
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Ok(text.len() - 1)
        );
    }

    #[test]
    fn test_bracket_ignores_single_quoted() {
        let text = "{'a': 'x}y'}";
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Ok(text.len() - 1)
        );
    }

    #[test]
    fn test_bracket_ignores_comments() {
        let text = "{ // not the end: }\n  /* nor } this */ \"a\": 1}";
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Ok(text.len() - 1)
        );
    }

    #[test]
    fn test_bracket_unterminated_string() {
        let text = r#"{"a": "never closed}"#;
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Err(ScanEnd::UnterminatedString)
        );
    }

    #[test]
    fn test_bracket_unterminated_comment() {
        let text = "{ /* runs off the end }";
        assert_eq!(
            find_matching_bracket(text, 0, b'{', b'}'),
            Err(ScanEnd::UnterminatedComment)
        );
    }

    #[test]
    fn test_bracket_unbalanced() {
        assert_eq!(
            find_matching_bracket("{\"a\": 1", 0, b'{', b'}'),
            Err(ScanEnd::Unbalanced)
        );
        // Wrong byte at the open index.
        assert_eq!(
            find_matching_bracket("{}", 1, b'{', b'}'),
            Err(ScanEnd::Unbalanced)
        );
    }

    #[test]
    fn test_object_bounds_around() {
        let text = r#"{"list": [{"name": "a"}, {"name": "b"}]}"#;
        let inner = text.find("\"name\": \"b\"").unwrap();
        let bounds = find_object_bounds_around(text, inner).unwrap();
        assert_eq!(bounds.slice(text), r#"{"name": "b"}"#);
    }

    #[test]
    fn test_object_bounds_braces_in_strings() {
        let text = r#"{"list": [{"name": "a}b"}, {"name": "b"}]}"#;
        let inner = text.find("\"name\": \"b\"").unwrap();
        let bounds = find_object_bounds_around(text, inner).unwrap();
        assert_eq!(bounds.slice(text), r#"{"name": "b"}"#);
    }

    #[test]
    fn test_object_bounds_none_outside() {
        // An index before any object.
        assert_eq!(find_object_bounds_around("  {}", 0), None);
    }

    #[test]
    fn test_region_empty() {
        let text = "[   \n\t ]";
        assert!(is_region_empty(text, 1, text.len() - 1));
    }

    #[test]
    fn test_region_empty_comments_only() {
        let text = "[ // nothing yet\n  /* still nothing */ ]";
        assert!(is_region_empty(text, 1, text.len() - 1));
    }

    #[test]
    fn test_region_not_empty() {
        let text = "[ /* c */ \"x\" ]";
        assert!(!is_region_empty(text, 1, text.len() - 1));
    }

    #[test]
    fn test_root_span() {
        let text = "// header\n{\"a\": 1}\n";
        let root = find_root_span(text).unwrap();
        assert_eq!(root.slice(text), "{\"a\": 1}");
    }

    #[test]
    fn test_root_span_missing() {
        assert_eq!(
            find_root_span("[1, 2]"),
            Err(SpliceError::InvalidRootStructure)
        );
        assert_eq!(
            find_root_span("// only a comment\n"),
            Err(SpliceError::InvalidRootStructure)
        );
    }

    #[test]
    fn test_root_span_unterminated() {
        assert_eq!(
            find_root_span("{\"a\": \"oops"),
            Err(SpliceError::UnterminatedLiteral)
        );
    }

    #[test]
    fn test_top_level_key_basic() {
        let text = r#"{"name": "app", "flags": ["a"]}"#;
        let site = find_top_level_key(text, "flags").unwrap().unwrap();
        assert_eq!(&text[site.key_index..site.key_index + 7], "\"flags\"");
        assert_eq!(text.as_bytes()[site.value_index], b'[');
    }

    #[test]
    fn test_top_level_key_not_in_nested_object() {
        let text = r#"{"outer": {"flags": [1]}, "flags": [2]}"#;
        let site = find_top_level_key(text, "flags").unwrap().unwrap();
        // The depth-1 occurrence, not the nested one.
        assert_eq!(site.key_index, text.rfind("\"flags\"").unwrap());
    }

    #[test]
    fn test_top_level_key_not_in_string_value() {
        // The literal text of a note value must never match.
        let text = r#"{"note": "set \"flags\": [] by hand", "flags": []}"#;
        let site = find_top_level_key(text, "flags").unwrap().unwrap();
        assert_eq!(text.as_bytes()[site.value_index], b'[');
        assert!(site.key_index > text.find("note").unwrap());

        let only_note = r#"{"note": "set \"flags\": [] by hand"}"#;
        assert_eq!(find_top_level_key(only_note, "flags").unwrap(), None);
    }

    #[test]
    fn test_top_level_key_not_in_comment() {
        let text = "{\n  // \"flags\": [\"old\"]\n  \"name\": \"app\"\n}";
        assert_eq!(find_top_level_key(text, "flags").unwrap(), None);
    }

    #[test]
    fn test_top_level_key_value_equal_to_key() {
        // A value string equal to the key name is not a key.
        let text = r#"{"alias": "flags", "flags": []}"#;
        let site = find_top_level_key(text, "flags").unwrap().unwrap();
        assert_eq!(text.as_bytes()[site.value_index], b'[');
    }

    #[test]
    fn test_top_level_key_absent() {
        let text = r#"{"name": "app"}"#;
        assert_eq!(find_top_level_key(text, "flags").unwrap(), None);
    }

    #[test]
    fn test_find_field_value() {
        let text = r#"{"dbs": [{"database_name": "first"}, {"database_name": "second"}]}"#;
        let open = text.find('[').unwrap();
        let close = find_matching_bracket(text, open, b'[', b']').unwrap();
        let span = Span::new(open, close + 1);
        let hit = find_field_value(text, span, "database_name", "second")
            .unwrap()
            .unwrap();
        assert_eq!(hit, text.rfind("\"database_name\"").unwrap());
        assert_eq!(
            find_field_value(text, span, "database_name", "third").unwrap(),
            None
        );
    }

    #[test]
    fn test_find_field_value_bare_literal() {
        let text = r#"{"dbs": [{"id": 42, "database_name": "x"}]}"#;
        let open = text.find('[').unwrap();
        let close = find_matching_bracket(text, open, b'[', b']').unwrap();
        let span = Span::new(open, close + 1);
        let hit = find_field_value(text, span, "id", "42").unwrap().unwrap();
        assert_eq!(hit, text.find("\"id\"").unwrap());
    }

    #[test]
    fn test_find_field_value_skips_string_content() {
        // "database_name" spelled out inside another value's text.
        let text = r#"{"dbs": [{"note": "\"database_name\": \"x\"", "database_name": "y"}]}"#;
        let open = text.find('[').unwrap();
        let close = find_matching_bracket(text, open, b'[', b']').unwrap();
        let span = Span::new(open, close + 1);
        assert_eq!(
            find_field_value(text, span, "database_name", "x").unwrap(),
            None
        );
        assert!(find_field_value(text, span, "database_name", "y")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_value_end() {
        let text = r#"{"a": [1, 2], "b": "s]", "c": true}"#;
        let a = text.find('[').unwrap();
        assert_eq!(value_end(text, a).unwrap(), text.find(']').unwrap() + 1);
        let b = text.find("\"s]\"").unwrap();
        assert_eq!(value_end(text, b).unwrap(), b + 4);
        let c = text.find("true").unwrap();
        assert_eq!(value_end(text, c).unwrap(), c + 4);
    }
}
