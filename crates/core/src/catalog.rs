//! Catalog and session-state types.
//!
//! A catalog is supplied fresh on every call and never persisted here.
//! Docs are keyed by `path`, skills by `name`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::serde_helpers::{null_to_default, string_or_seq};

/// An injectable reference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocItem {
    /// Unique key
    pub path: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub summary: String,

    /// Keywords or situations that make this doc worth reading.
    ///
    /// Accepts a single string or a list, as `read_when` or `triggers`.
    #[serde(
        default,
        rename = "read_when",
        alias = "triggers",
        deserialize_with = "string_or_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub triggers: Vec<String>,
}

impl DocItem {
    pub fn new(path: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            summary: summary.into(),
            triggers: Vec::new(),
        }
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = triggers.into_iter().map(Into::into).collect();
        self
    }
}

/// An injectable reusable skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillItem {
    /// Unique key
    pub name: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
}

impl SkillItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The candidate docs and skills offered for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_to_default")]
    pub docs: Vec<DocItem>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub skills: Vec<SkillItem>,
}

impl Catalog {
    pub fn new(docs: Vec<DocItem>, skills: Vec<SkillItem>) -> Self {
        Self { docs, skills }
    }

    /// Total number of items (docs + skills).
    pub fn len(&self) -> usize {
        self.docs.len() + self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty() && self.skills.is_empty()
    }
}

/// What the caller has already injected in this session.
///
/// Read-only input: the router never mutates or stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, deserialize_with = "null_to_default")]
    pub docs_read: BTreeSet<String>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub skills_used: BTreeSet<String>,
}

impl SessionState {
    pub fn new<D, S>(docs_read: D, skills_used: S) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            docs_read: docs_read.into_iter().map(Into::into).collect(),
            skills_used: skills_used.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_read(&self, path: &str) -> bool {
        self.docs_read.contains(path)
    }

    pub fn has_used(&self, name: &str) -> bool {
        self.skills_used.contains(name)
    }
}
