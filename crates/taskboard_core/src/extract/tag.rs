//! Tag normalization.
//!
//! # Invariants
//! - Stored tags are trimmed, lowercase, unique, and keep insertion order.
//! - `normalize_tags` is idempotent.

use serde::{Deserialize, Serialize};

/// Normalizes one tag value; blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and de-duplicates tag values, keeping first-occurrence order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut set = TagSet::default();
    for tag in tags {
        set.add(tag.as_ref());
    }
    set.into_vec()
}

/// Result of adding one raw value to a `TagSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAddOutcome {
    Added(String),
    Empty,
    Duplicate(String),
}

/// Ordered, de-duplicated tag collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Builds a set from already-stored tags, normalizing them on the way in.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        Self {
            tags: normalize_tags(tags),
        }
    }

    pub fn add(&mut self, raw: &str) -> TagAddOutcome {
        let Some(tag) = normalize_tag(raw) else {
            return TagAddOutcome::Empty;
        };
        if self.tags.contains(&tag) {
            return TagAddOutcome::Duplicate(tag);
        }
        self.tags.push(tag.clone());
        TagAddOutcome::Added(tag)
    }

    /// Removes an exact (already-normalized) tag; returns whether it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|current| current != tag);
        self.tags.len() != before
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tags
    }
}
