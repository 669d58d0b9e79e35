//! Normalisation of activation requirements reported by the payment provider.
//!
//! The provider reports outstanding requirements either as plain strings or as objects
//! carrying a `description` and/or a `field_reference`. They are flattened into the
//! ordered, de-duplicated list of human-readable strings that is stored on the account.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single requirement as returned by the provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Requirement {
    Text(String),
    Detail {
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        field_reference: Option<String>,
    },
}

impl Requirement {
    /// Human-readable text for the requirement.
    ///
    /// Objects prefer `description`, falling back to `field_reference`. Whitespace is
    /// trimmed and blank values yield `None`.
    pub fn text(&self) -> Option<&str> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        match self {
            Self::Text(text) => Some(text.trim()).filter(|text| !text.is_empty()),
            Self::Detail {
                description,
                field_reference,
            } => non_blank(description).or_else(|| non_blank(field_reference)),
        }
    }
}

/// Flattens provider requirements into stored activation requirements.
///
/// Order of first occurrence is preserved and duplicates are dropped, so two objects
/// describing "PAN verification" produce a single entry.
///
/// # Returns
/// - `Some(list)` - At least one non-empty requirement remains
/// - `None` - Nothing outstanding
pub fn flatten_requirements(requirements: &[Requirement]) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let flattened: Vec<String> = requirements
        .iter()
        .filter_map(Requirement::text)
        .filter(|text| seen.insert(*text))
        .map(str::to_string)
        .collect();

    if flattened.is_empty() {
        None
    } else {
        Some(flattened)
    }
}
