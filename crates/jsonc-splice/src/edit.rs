//! Structural editors: locate a target with the scanner, decide separator
//! placement with the resolver, splice the raw text.
//!
//! Every editor is a pure `&str -> String` transform. The parsed snapshot,
//! where one is taken, is consulted for decisions only — output text is
//! always produced by splicing the input, never by re-serializing, so
//! comments and whitespace outside the edited region survive byte-for-byte.

use serde_json::Value;

use crate::scan::{self, ScanEnd};
use crate::trivia;
use crate::types::{Span, SpliceError};

// ── Operations ────────────────────────────────────────────────────────────

/// A structural edit against one configuration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Append `element_text` to the array under a top-level `array_key`.
    InsertArrayElement {
        array_key: String,
        element_text: String,
    },
    /// Remove the array element (an object) whose `field_name` equals
    /// `field_value`. Collapses the whole property when the array empties.
    RemoveArrayElementByField {
        array_key: String,
        field_name: String,
        field_value: String,
    },
    /// Insert a `"key": value` fragment before the root object's closing
    /// brace.
    InsertTopLevelSection { section_text: String },
    /// Make sure the array under `array_key` contains the string `value`,
    /// creating the array if needed. Idempotent.
    EnsureArrayContainsValue { array_key: String, value: String },
}

/// Apply one [`EditOp`] to `text`. The `snapshot` must be the parsed form
/// of the same text; it is used only to decide no-ops.
pub fn apply(text: &str, snapshot: &Value, op: &EditOp) -> Result<String, SpliceError> {
    match op {
        EditOp::InsertArrayElement {
            array_key,
            element_text,
        } => insert_array_element(text, array_key, element_text),
        EditOp::RemoveArrayElementByField {
            array_key,
            field_name,
            field_value,
        } => remove_array_element_by_field(text, array_key, field_name, field_value),
        EditOp::InsertTopLevelSection { section_text } => {
            insert_top_level_section(text, section_text)
        }
        EditOp::EnsureArrayContainsValue { array_key, value } => {
            ensure_array_contains_value(text, snapshot, array_key, value)
        }
    }
}

// ── Editors ───────────────────────────────────────────────────────────────

/// Append `element_text` to the array under the top-level `array_key`.
///
/// A blank array collapses to `[element]` on one line; an array holding
/// only comments keeps them and appends before the close bracket; a
/// populated array gets the element after its last sibling, reusing the
/// sibling's line indentation when the array spans lines.
pub fn insert_array_element(
    text: &str,
    array_key: &str,
    element_text: &str,
) -> Result<String, SpliceError> {
    const OP: &str = "insert-array-element";
    let arr = locate_array(text, OP, array_key)?;
    let open = arr.start;
    let close = arr.end - 1;
    let body = &text[open + 1..close];

    let mut out = String::with_capacity(text.len() + element_text.len() + 8);
    if scan::is_region_empty(text, open + 1, close) {
        if body.trim().is_empty() {
            out.push_str(&text[..open + 1]);
            out.push_str(element_text);
            out.push_str(&text[close..]);
        } else if body.contains('\n') {
            // Comments only, across lines: the element takes its own line
            // above the close bracket.
            let ls = line_start(text, close);
            out.push_str(&text[..ls]);
            out.push_str(&body_content_indent(text, open, close));
            out.push_str(element_text);
            out.push('\n');
            out.push_str(&text[ls..]);
        } else {
            // Comments only, one line.
            out.push_str(&text[..close]);
            if !text[..close].ends_with(' ') {
                out.push(' ');
            }
            out.push_str(element_text);
            out.push_str(&text[close..]);
        }
        return Ok(out);
    }

    let last = match trivia::prev_significant(text, close) {
        Some((at, _)) if at > open => at,
        _ => {
            return Err(SpliceError::TargetNotFound {
                op: OP,
                key: array_key.to_string(),
            })
        }
    };
    let insert_at = last + 1;
    let lead = if trivia::needs_leading_comma(text, insert_at) {
        ","
    } else {
        ""
    };
    out.push_str(&text[..insert_at]);
    out.push_str(lead);
    if body.contains('\n') {
        out.push('\n');
        out.push_str(line_indent(text, last));
        out.push_str(element_text);
    } else {
        out.push(' ');
        out.push_str(element_text);
    }
    out.push_str(&text[insert_at..]);
    Ok(out)
}

/// Insert a `"key": value` fragment as a new member of the root object,
/// before its closing brace.
///
/// The brace is located by the scanner, never by a bare reverse search —
/// `}` may occur inside strings or comments. The new member reuses the
/// line indentation of the last existing member.
pub fn insert_top_level_section(text: &str, section_text: &str) -> Result<String, SpliceError> {
    let root = scan::find_root_span(text)?;
    let brace = root.end - 1;
    let mut out = String::with_capacity(text.len() + section_text.len() + 8);
    match trivia::prev_significant(text, brace) {
        Some((at, b)) if b != b'{' => {
            let gap = &text[at + 1..brace];
            let lead = if trivia::needs_leading_comma(text, brace) {
                ","
            } else {
                ""
            };
            if gap.chars().all(char::is_whitespace) {
                // Attach the comma to the last member and keep the gap
                // bytes as written.
                out.push_str(&text[..at + 1]);
                out.push_str(lead);
                out.push_str(gap);
                if gap.ends_with('\n') {
                    out.push_str(line_indent(text, at));
                    out.push_str(section_text);
                    out.push('\n');
                } else {
                    out.push_str(section_text);
                    if !gap.is_empty() {
                        out.push(' ');
                    }
                }
                out.push_str(&text[brace..]);
            } else {
                // A comment sits between the last member and the brace;
                // leave it in place and splice at the brace itself.
                out.push_str(&text[..brace]);
                out.push_str(lead);
                out.push('\n');
                out.push_str(line_indent(text, at));
                out.push_str(section_text);
                out.push('\n');
                out.push_str(&text[brace..]);
            }
        }
        _ => {
            // Empty root object (possibly holding comments).
            let body = &text[root.start + 1..brace];
            if body.contains('\n') {
                let ls = line_start(text, brace);
                out.push_str(&text[..ls]);
                out.push_str(&body_content_indent(text, root.start, brace));
                out.push_str(section_text);
                out.push('\n');
                out.push_str(&text[ls..]);
            } else {
                out.push_str(&text[..brace]);
                if !body.is_empty() && !body.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(section_text);
                out.push_str(&text[brace..]);
            }
        }
    }
    Ok(out)
}

/// Remove the element of the array under `array_key` whose `field_name`
/// equals `field_value`.
///
/// Deletes the element object together with its separating comma (the
/// following one when present, else the preceding one) and any blank line
/// the deletion leaves. An array emptied by the removal is escalated: the
/// whole top-level property goes, not just the element.
pub fn remove_array_element_by_field(
    text: &str,
    array_key: &str,
    field_name: &str,
    field_value: &str,
) -> Result<String, SpliceError> {
    const OP: &str = "remove-array-element";
    let arr = locate_array(text, OP, array_key)?;
    let hit = scan::find_field_value(text, arr, field_name, field_value)
        .map_err(|end| scan_err(end, OP, array_key))?
        .ok_or_else(|| SpliceError::TargetNotFound {
            op: OP,
            key: field_name.to_string(),
        })?;
    let obj = scan::find_object_bounds_around(text, hit).ok_or_else(|| {
        SpliceError::TargetNotFound {
            op: OP,
            key: field_name.to_string(),
        }
    })?;

    let (del_start, del_end) = widen_removal(text, obj.start, obj.end);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..del_start]);
    out.push_str(&text[del_end..]);

    let arr_after = locate_array(&out, OP, array_key)?;
    if scan::is_region_empty(&out, arr_after.start + 1, arr_after.end - 1) {
        return remove_top_level_property(&out, array_key);
    }
    Ok(out)
}

/// Remove a whole top-level property: key, colon, value, and the
/// separating comma.
pub fn remove_top_level_property(text: &str, key: &str) -> Result<String, SpliceError> {
    const OP: &str = "remove-top-level-property";
    let site = scan::find_top_level_key(text, key)?.ok_or_else(|| SpliceError::TargetNotFound {
        op: OP,
        key: key.to_string(),
    })?;
    let vend = scan::value_end(text, site.value_index).map_err(|end| scan_err(end, OP, key))?;
    let (del_start, del_end) = widen_removal(text, site.key_index, vend);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..del_start]);
    out.push_str(&text[del_end..]);
    Ok(out)
}

/// Make sure the array under `array_key` contains the string `value`.
///
/// The decision comes from the parsed snapshot: when the value is already
/// present this is a no-op returning the text unchanged (idempotence);
/// when the key is absent the whole section is created. A key that exists
/// with a non-array value means the snapshot and text disagree with what
/// the operation expects, which is fatal.
pub fn ensure_array_contains_value(
    text: &str,
    snapshot: &Value,
    array_key: &str,
    value: &str,
) -> Result<String, SpliceError> {
    const OP: &str = "ensure-array-value";
    match snapshot.get(array_key) {
        Some(Value::Array(items)) => {
            if items.iter().any(|v| v.as_str() == Some(value)) {
                return Ok(text.to_string());
            }
            insert_array_element(text, array_key, &json_string(value))
        }
        Some(_) => Err(SpliceError::TargetNotFound {
            op: OP,
            key: array_key.to_string(),
        }),
        None => {
            let section = format!("{}: [{}]", json_string(array_key), json_string(value));
            insert_top_level_section(text, &section)
        }
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────

/// Span of the `[ ... ]` value under a top-level `key`, brackets included.
fn locate_array(text: &str, op: &'static str, key: &str) -> Result<Span, SpliceError> {
    let site = scan::find_top_level_key(text, key)?.ok_or_else(|| SpliceError::TargetNotFound {
        op,
        key: key.to_string(),
    })?;
    if text.as_bytes().get(site.value_index) != Some(&b'[') {
        return Err(SpliceError::TargetNotFound {
            op,
            key: key.to_string(),
        });
    }
    let close = scan::find_matching_bracket(text, site.value_index, b'[', b']')
        .map_err(|end| scan_err(end, op, key))?;
    Ok(Span::new(site.value_index, close + 1))
}

/// Convert the scan-layer sentinel into a typed error carrying the
/// attempted operation and key.
fn scan_err(end: ScanEnd, op: &'static str, key: &str) -> SpliceError {
    match end {
        ScanEnd::UnterminatedString | ScanEnd::UnterminatedComment => {
            SpliceError::UnterminatedLiteral
        }
        ScanEnd::Unbalanced => SpliceError::TargetNotFound {
            op,
            key: key.to_string(),
        },
    }
}

/// Extend a deletion over the separating comma — the following one when
/// present, else the preceding one — and over the blank line the deletion
/// would otherwise leave behind.
fn widen_removal(text: &str, start: usize, end: usize) -> (usize, usize) {
    let mut del_start = start;
    let mut del_end = end;
    match trivia::next_significant(text, end) {
        Some((i, b',')) => del_end = i + 1,
        _ => {
            if let Some((i, b',')) = trivia::prev_significant(text, start) {
                del_start = i;
            }
        }
    }
    widen_blank_line(text, del_start, del_end)
}

/// When the deletion range starts at its line's indentation and runs to the
/// line's end, widen it to swallow the whole line, newline included.
fn widen_blank_line(text: &str, start: usize, end: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let ls = line_start(text, start);
    if !text[ls..start].bytes().all(|b| b == b' ' || b == b'\t') {
        return (start, end);
    }
    let mut le = end;
    while le < bytes.len() && (bytes[le] == b' ' || bytes[le] == b'\t') {
        le += 1;
    }
    if le < bytes.len() && bytes[le] == b'\r' && bytes.get(le + 1) == Some(&b'\n') {
        return (ls, le + 2);
    }
    if le < bytes.len() && bytes[le] == b'\n' {
        return (ls, le + 1);
    }
    if le == bytes.len() {
        return (ls, le);
    }
    (start, end)
}

/// Index of the first byte of the line containing `index`.
fn line_start(text: &str, index: usize) -> usize {
    match text[..index].rfind('\n') {
        Some(nl) => nl + 1,
        None => 0,
    }
}

/// Leading whitespace of the line containing `index`.
fn line_indent(text: &str, index: usize) -> &str {
    let ls = line_start(text, index);
    let rest = &text[ls..];
    let end = rest
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &rest[..end]
}

/// Indentation for new content inside `open..close`: the indent of the last
/// non-blank body line, else one level deeper than the open bracket's line.
fn body_content_indent(text: &str, open: usize, close: usize) -> String {
    let body = &text[open + 1..close];
    for line in body.lines().rev() {
        if !line.trim().is_empty() {
            let end = line
                .bytes()
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            return line[..end].to_string();
        }
    }
    format!("{}  ", line_indent(text, open))
}

/// JSON-encode a string, quotes and escapes included.
fn json_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
