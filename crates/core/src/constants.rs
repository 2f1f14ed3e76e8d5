//! Constants used throughout the CRM core crate.
//!
//! Environment variable names and defaults live here so that the binaries and the config
//! resolution agree on them.

/// Environment variable naming the YAML display-name directory.
pub const DIRECTORY_FILE_ENV: &str = "CRM_DIRECTORY_FILE";

/// Environment variable holding the REST listen address.
pub const REST_ADDR_ENV: &str = "CRM_REST_ADDR";

/// REST listen address used when none is configured.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
