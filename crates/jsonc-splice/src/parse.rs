//! Permissive JSONC parse for decision snapshots.
//!
//! The editors never re-serialize a snapshot — that would discard comments.
//! The snapshot exists only so callers and the ensure-style editors can
//! decide whether an edit is needed at all.

use serde_json::Value;

/// Strip `//` and `/* */` comments and trailing commas, leaving plain JSON.
///
/// String literals are kept byte-for-byte; comment markers inside them are
/// content, not comments.
pub fn strip_jsonc(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }
        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            result.push(c);
            continue;
        }
        if !in_string && c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    for ch in chars.by_ref() {
                        if ch == '\n' {
                            result.push('\n');
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    while let Some(ch) = chars.next() {
                        if ch == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }
    strip_trailing_commas(&result)
}

/// Drop commas whose next significant character closes a container.
fn strip_trailing_commas(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }
        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            result.push(c);
            continue;
        }
        if !in_string && c == ',' {
            let mut lookahead = chars.clone();
            let trailing = loop {
                match lookahead.next() {
                    Some(ch) if ch.is_whitespace() => continue,
                    Some(']') | Some('}') => break true,
                    _ => break false,
                }
            };
            if !trailing {
                result.push(c);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Parse JSONC text into the decision snapshot.
pub fn parse_snapshot(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&strip_jsonc(text))
}
