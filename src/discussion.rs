//! Discussion records and the sections they are grouped into.
//!
//! The viewer never fetches discussions itself. The binary reads them from a
//! JSON file with [`load_discussions`] and hands the list to the model.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A named grouping of discussions, identified by its category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub category_id: String,
}

impl Section {
    pub fn new(name: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id: category_id.into(),
        }
    }
}

/// A single discussion as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub title: String,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<Section>,
}

impl Discussion {
    /// Create a discussion with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            number: None,
            author: None,
            category: None,
        }
    }

    /// Attach a category to this discussion.
    #[must_use]
    pub fn with_category(mut self, section: Section) -> Self {
        self.category = Some(section);
        self
    }
}

/// Collect the distinct categories of `discussions` in first-seen order.
pub fn sections_of(discussions: &[Discussion]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for section in discussions.iter().filter_map(|d| d.category.as_ref()) {
        if !sections
            .iter()
            .any(|s| s.category_id == section.category_id)
        {
            sections.push(section.clone());
        }
    }
    sections
}

/// Read a JSON array of discussions from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// discussion objects.
pub fn load_discussions(path: &Path) -> Result<Vec<Discussion>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read discussions {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse discussions {}", path.display()))
}
