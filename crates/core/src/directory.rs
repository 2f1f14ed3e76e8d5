//! Display-name directory.
//!
//! The codec deals only in identifiers. Turning a patient, practitioner or case id into a name
//! is done here, by the caller, through the [`DisplayNameResolver`] capability.
//!
//! [`Directory`] is the bundled implementation: an immutable lookup table loaded from YAML.
//!
//! ```yaml
//! patients:
//!   - id: p1
//!     display: John Doe
//! practitioners:
//!   - id: u1
//!     display: Dr Jane Smith
//! cases:
//!   - id: c1
//!     display: Post-discharge follow-up
//! ```

use crate::{CoreError, CoreResult};
use crm_types::{NonEmptyText, ResourceKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Resolves a resource id to a human-readable display name.
///
/// Implementations must be cheap to call and safe to share between threads.
pub trait DisplayNameResolver: Send + Sync {
    /// Returns the display name for `resource_type`/`id`, or `None` when unknown.
    fn resolve_display_name(&self, resource_type: &str, id: &str) -> Option<NonEmptyText>;
}

/// In-memory display-name directory keyed by resource kind and id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    entries: HashMap<(ResourceKind, String), NonEmptyText>,
}

impl Directory {
    /// Creates an empty directory. Every lookup returns `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this directory with one more entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateEntry`] if `kind`/`id` is already present.
    pub fn with_entry(
        mut self,
        kind: ResourceKind,
        id: NonEmptyText,
        display: NonEmptyText,
    ) -> CoreResult<Self> {
        let key = (kind, id.into_inner());
        if self.entries.contains_key(&key) {
            return Err(CoreError::DuplicateEntry { kind, id: key.1 });
        }
        self.entries.insert(key, display);
        Ok(self)
    }

    /// Parse a directory from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DirectoryYaml`] if the YAML does not match the directory schema
    /// (including unknown keys and blank ids or names), or [`CoreError::DuplicateEntry`] if an
    /// id appears twice within one list.
    pub fn from_yaml(yaml_text: &str) -> CoreResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, DirectoryWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(CoreError::DirectoryYaml(format!(
                    "directory schema mismatch at {path}: {source}"
                )));
            }
        };

        let lists = [
            (ResourceKind::Patient, wire.patients),
            (ResourceKind::Practitioner, wire.practitioners),
            (ResourceKind::Case, wire.cases),
        ];

        let mut directory = Self::new();
        for (kind, entries) in lists {
            for entry in entries {
                directory = directory.with_entry(kind, entry.id, entry.display)?;
            }
        }

        tracing::debug!(entries = directory.len(), "loaded display-name directory");
        Ok(directory)
    }

    /// Read and parse a directory file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileRead`] if the file cannot be read, or any error from
    /// [`Directory::from_yaml`].
    pub fn load(path: &Path) -> CoreResult<Self> {
        let yaml_text = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        let directory = Self::from_yaml(&yaml_text)?;
        tracing::info!(
            path = %path.display(),
            entries = directory.len(),
            "display-name directory loaded"
        );
        Ok(directory)
    }

    pub fn lookup(&self, kind: ResourceKind, id: &str) -> Option<&NonEmptyText> {
        self.entries.get(&(kind, id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DisplayNameResolver for Directory {
    fn resolve_display_name(&self, resource_type: &str, id: &str) -> Option<NonEmptyText> {
        let kind = resource_type.parse::<ResourceKind>().ok()?;
        self.lookup(kind, id).cloned()
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectoryWire {
    #[serde(default)]
    patients: Vec<EntryWire>,
    #[serde(default)]
    practitioners: Vec<EntryWire>,
    #[serde(default)]
    cases: Vec<EntryWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryWire {
    id: NonEmptyText,
    display: NonEmptyText,
}
