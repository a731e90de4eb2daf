//! Core domain types: the page mapping table.

use std::collections::HashSet;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

// ---------------------------------------------------------------------------
// MappingEntry
// ---------------------------------------------------------------------------

/// Where one exported source page goes and how it is labelled on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Exact file name inside the source directory (e.g., `variables.html`).
    pub source: String,
    /// Output path relative to the output root.
    pub output: String,
    /// Grouping label shown in the breadcrumb trail (e.g., `Week 1`).
    pub group: String,
    /// Display title used for `<title>` and the page heading.
    pub title: String,
}

impl MappingEntry {
    pub fn new(
        source: impl Into<String>,
        output: impl Into<String>,
        group: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            group: group.into(),
            title: title.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// MappingTable
// ---------------------------------------------------------------------------

/// Immutable, ordered set of [`MappingEntry`] values keyed by source file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    /// Build a table, rejecting duplicate sources, empty titles and output
    /// paths that would escape the output root.
    pub fn new(entries: Vec<MappingEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in &entries {
            if entry.source.trim().is_empty() {
                return Err(MigrateError::validation("mapping entry with empty source"));
            }
            if !seen.insert(entry.source.as_str()) {
                return Err(MigrateError::validation(format!(
                    "duplicate mapping source '{}'",
                    entry.source
                )));
            }
            if entry.title.trim().is_empty() {
                return Err(MigrateError::validation(format!(
                    "mapping for '{}' has an empty title",
                    entry.source
                )));
            }
            validate_output_path(entry)?;
        }

        Ok(Self { entries })
    }

    /// The hand-maintained table for the remote sensing course export.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    /// Look up the entry for a source file name.
    pub fn get(&self, source: &str) -> Option<&MappingEntry> {
        self.entries.iter().find(|e| e.source == source)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappingEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a MappingEntry;
    type IntoIter = std::slice::Iter<'a, MappingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn validate_output_path(entry: &MappingEntry) -> Result<()> {
    let path = Path::new(&entry.output);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });

    if entry.output.trim().is_empty() || escapes {
        return Err(MigrateError::validation(format!(
            "mapping for '{}' has invalid output path '{}' (must be relative, without '..')",
            entry.source, entry.output
        )));
    }
    Ok(())
}

/// Default page list. Week 0 is the course welcome, Week 1 the JavaScript primer.
pub(crate) fn builtin_entries() -> Vec<MappingEntry> {
    vec![
        // Week 0
        MappingEntry::new(
            "welcome-to-remote-sensing.html",
            "week-00-welcome/welcome-to-remote-sensing.html",
            "Week 0",
            "Welcome to Remote Sensing",
        ),
        MappingEntry::new(
            "the-earth-engine-api.html",
            "week-00-welcome/earth-engine-api.html",
            "Week 0",
            "The Earth Engine API",
        ),
        MappingEntry::new(
            "why-javascript.html",
            "week-00-welcome/why-javascript.html",
            "Week 0",
            "Why JavaScript",
        ),
        // Week 1
        MappingEntry::new(
            "introduction-to-javascript.html",
            "week-01-javascript/introduction-to-javascript.html",
            "Week 1",
            "Introduction to JavaScript",
        ),
        MappingEntry::new(
            "variables.html",
            "week-01-javascript/variables.html",
            "Week 1",
            "Variables",
        ),
        MappingEntry::new(
            "lists.html",
            "week-01-javascript/lists.html",
            "Week 1",
            "Lists",
        ),
        MappingEntry::new(
            "objects.html",
            "week-01-javascript/objects.html",
            "Week 1",
            "Objects",
        ),
        MappingEntry::new(
            "functions.html",
            "week-01-javascript/functions.html",
            "Week 1",
            "Functions",
        ),
        MappingEntry::new(
            "comments.html",
            "week-01-javascript/comments.html",
            "Week 1",
            "Comments",
        ),
    ]
}
