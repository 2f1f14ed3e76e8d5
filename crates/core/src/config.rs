//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Binaries read the environment once and hand the raw values to
//! [`CoreConfig::from_env_values`]; nothing here reads process-wide state during request
//! handling.

use crate::constants::DEFAULT_REST_ADDR;
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    directory_path: Option<PathBuf>,
    rest_addr: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `rest_addr` is blank.
    pub fn new(directory_path: Option<PathBuf>, rest_addr: String) -> CoreResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(CoreError::InvalidInput("rest_addr cannot be empty".into()));
        }

        Ok(Self {
            directory_path,
            rest_addr,
        })
    }

    /// Build configuration from raw environment values.
    ///
    /// Missing or blank values fall back to defaults: no directory, and
    /// [`DEFAULT_REST_ADDR`](crate::constants::DEFAULT_REST_ADDR).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if a directory path is given but is not a file.
    pub fn from_env_values(
        directory_file: Option<String>,
        rest_addr: Option<String>,
    ) -> CoreResult<Self> {
        let directory_path = resolve_directory_path(directory_file)?;
        let rest_addr = non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
        Self::new(directory_path, rest_addr)
    }

    pub fn directory_path(&self) -> Option<&Path> {
        self.directory_path.as_deref()
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }
}

/// Resolve the display-name directory file from an optional raw value.
///
/// A missing or blank value means no directory is configured.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] if the value names something that is not a file.
pub fn resolve_directory_path(value: Option<String>) -> CoreResult<Option<PathBuf>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(CoreError::InvalidInput(format!(
            "directory file does not exist: {}",
            path.display()
        )));
    }

    Ok(Some(path))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_values_missing() {
        let cfg = CoreConfig::from_env_values(None, None).expect("default config");
        assert!(cfg.directory_path().is_none());
        assert_eq!(cfg.rest_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let cfg = CoreConfig::from_env_values(Some("  ".into()), Some(String::new()))
            .expect("blank config");
        assert!(cfg.directory_path().is_none());
        assert_eq!(cfg.rest_addr(), DEFAULT_REST_ADDR);
    }

    #[test]
    fn accepts_existing_directory_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "patients: []").expect("write temp file");
        let path = file.path().to_string_lossy().to_string();

        let cfg = CoreConfig::from_env_values(Some(path), Some("127.0.0.1:8080".into()))
            .expect("config with directory");
        assert_eq!(cfg.directory_path(), Some(file.path()));
        assert_eq!(cfg.rest_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_missing_directory_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("directory.yaml");

        let err = resolve_directory_path(Some(missing.to_string_lossy().to_string()))
            .expect_err("should reject missing file");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("does not exist")));
    }

    #[test]
    fn rejects_directory_path_that_is_a_folder() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = resolve_directory_path(Some(dir.path().to_string_lossy().to_string()))
            .expect_err("should reject folder");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn new_rejects_blank_rest_addr() {
        let err = CoreConfig::new(None, " ".into()).expect_err("should reject blank addr");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("rest_addr")));
    }
}
