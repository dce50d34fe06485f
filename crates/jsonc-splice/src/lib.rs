//! jsonc-splice — comment-preserving structural edits for JSONC text.
//!
//! Standard JSON parsers discard comments, so "parse, mutate, print"
//! cannot round-trip a hand-maintained configuration file. This crate
//! edits the raw text instead: a string/comment-aware scanner locates
//! structure, a comma resolver decides separator placement, and the
//! editors splice well-formed fragments in or out, leaving every byte
//! outside the edited region untouched.
//!
//! All operations are pure `&str -> String` transforms; lexical state is
//! rebuilt from scratch for every scan, so no offsets survive an edit.
//!
//! # Example
//!
//! ```
//! use jsonc_splice::{ensure_array_contains_value, parse_snapshot};
//!
//! let text = "{\n  \"name\": \"app\", // keep me\n  \"compatibility_flags\": [\"old\"]\n}";
//! let snapshot = parse_snapshot(text).unwrap();
//! let out = ensure_array_contains_value(text, &snapshot, "compatibility_flags", "nodejs_compat")
//!     .unwrap();
//! assert_eq!(
//!     out,
//!     "{\n  \"name\": \"app\", // keep me\n  \"compatibility_flags\": [\"old\", \"nodejs_compat\"]\n}"
//! );
//! ```

pub mod edit;
pub mod parse;
pub mod scan;
pub mod trivia;
pub mod types;

pub use edit::{
    apply, ensure_array_contains_value, insert_array_element, insert_top_level_section,
    remove_array_element_by_field, remove_top_level_property, EditOp,
};
pub use parse::{parse_snapshot, strip_jsonc};
pub use scan::{
    find_matching_bracket, find_object_bounds_around, find_root_span, find_top_level_key,
    is_region_empty, ScanEnd,
};
pub use trivia::{needs_leading_comma, needs_trailing_comma};
pub use types::{KeySite, Span, SpliceError};
