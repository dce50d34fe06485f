//! Append-only Durable Object migration planning.
//!
//! A deployed migration history replays on every host, so existing steps
//! are never edited: covering a newly declared class always means
//! appending a new step.

use std::collections::HashSet;

use jsonc_splice::{insert_array_element, insert_top_level_section};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// One migration step as written in the config.
///
/// Only the class-introduction lists matter for coverage; any other step
/// fields (renames, deletions) are left to the text and never touched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MigrationStep {
    pub tag: String,
    #[serde(default)]
    pub new_classes: Vec<String>,
    #[serde(default)]
    pub new_sqlite_classes: Vec<String>,
}

/// Make sure every class in `declared` is introduced by some migration
/// step.
///
/// A class listed under either `new_classes` or `new_sqlite_classes` of any
/// existing step is covered and never re-migrates. Uncovered classes land
/// in one new step tagged `v{n+1}` under `new_sqlite_classes`; with no
/// `migrations` section at all, the section is created with a first step
/// tagged `v1`. Returns the text unchanged when nothing is uncovered.
pub fn ensure_migration_step(
    text: &str,
    snapshot: &Value,
    declared: &[String],
) -> Result<String, ConfigError> {
    let section = snapshot.get("migrations");
    let steps: Vec<MigrationStep> = match section {
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|source| ConfigError::InvalidSection {
                key: "migrations",
                source,
            })?
        }
        None => Vec::new(),
    };

    let mut covered: HashSet<&str> = HashSet::new();
    for step in &steps {
        covered.extend(step.new_classes.iter().map(String::as_str));
        covered.extend(step.new_sqlite_classes.iter().map(String::as_str));
    }
    let mut uncovered: Vec<&str> = Vec::new();
    for class in declared {
        if !covered.contains(class.as_str()) && !uncovered.contains(&class.as_str()) {
            uncovered.push(class);
        }
    }
    if uncovered.is_empty() {
        return Ok(text.to_string());
    }

    let tag = Value::String(format!("v{}", steps.len() + 1)).to_string();
    let classes = Value::Array(
        uncovered
            .iter()
            .map(|class| Value::String((*class).to_string()))
            .collect(),
    )
    .to_string();
    let step = format!("{{\"tag\": {tag}, \"new_sqlite_classes\": {classes}}}");

    if section.is_none() {
        Ok(insert_top_level_section(
            text,
            &format!("\"migrations\": [{step}]"),
        )?)
    } else {
        Ok(insert_array_element(text, "migrations", &step)?)
    }
}
