//! # CRM Core
//!
//! Collaborator-side services for the care task CRM.
//!
//! This crate wraps the pure `fhir` codec with the pieces it deliberately does not own:
//! - runtime configuration resolved once at startup
//! - the display-name directory (id to human-readable name)
//! - task import/export that resolves names around the codec
//!
//! **No API concerns**: HTTP servers and CLI parsing belong in `api-rest` and `cli`.

pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod tasks;

pub use config::CoreConfig;
pub use constants::DEFAULT_REST_ADDR;
pub use directory::{Directory, DisplayNameResolver};
pub use error::{CoreError, CoreResult};
pub use tasks::{ExportOptions, ExportedTask, ImportedTask, TaskService};

use std::sync::Arc;

/// Build the name resolver for a configuration: the configured directory file, or an empty
/// directory when none is configured.
///
/// # Errors
///
/// Returns any error from [`Directory::load`].
pub fn resolver_from_config(cfg: &CoreConfig) -> CoreResult<Arc<dyn DisplayNameResolver>> {
    let directory = match cfg.directory_path() {
        Some(path) => Directory::load(path)?,
        None => {
            tracing::warn!("no display-name directory configured; names will be left unset");
            Directory::new()
        }
    };
    Ok(Arc::new(directory))
}
