//! FHIR wire/boundary support for the care task CRM.
//!
//! This crate provides the **wire model** for the FHIR Task resource and the **translation**
//! between it and the CRM's internal task entity:
//! - reference strings (`"Patient/p1"`) are parsed and built by [`ReferenceResolver`]
//! - status and priority vocabularies are mapped by [`Vocabulary`]
//! - inbound resources are checked for structural well-formedness by [`ValidationGate`]
//! - [`TaskCodec`] orchestrates the above in both directions
//!
//! This crate focuses on:
//! - FHIR semantic alignment (JSON shape, without any REST transport)
//! - serialisation/deserialisation
//! - translation between domain primitives and wire structs
//!
//! Everything here is pure and synchronous. Display names are never looked up by this crate;
//! callers resolve them before or after translation.

pub mod reference;
pub mod task;
pub mod validation;
pub mod vocabulary;

// Re-export facades
pub use reference::ReferenceResolver;
pub use task::TaskCodec;
pub use validation::ValidationGate;
pub use vocabulary::Vocabulary;

// Re-export public domain-level types
pub use reference::{ParsedReference, Reference};
pub use task::{ExternalContext, Period, TaskData, TaskPriority, TaskResource, TaskStatus, Translated};
pub use vocabulary::{Direction, EnumField, Mapped, UnmappableEnumWarning};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("malformed reference: '{0}' (expected Type/identifier)")]
    MalformedReference(String),

    #[error("invalid Task resource: {}", .violations.join(", "))]
    InvalidResource { violations: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
