//! FHIR literal references (`"ResourceType/identifier"`).
//!
//! Task resources point at their case, patient and owner through references embedded as
//! strings. This module parses those strings into their typed parts and builds them back.
//!
//! Notes:
//! - Only the *first* `/` separates the type from the identifier; any further `/` characters
//!   belong to the identifier.
//! - Neither side may be empty, so a parsed reference never loses its identifier.

use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};

/// Resource type used for the case a task belongs to (`Task.focus`).
pub const CASE_RESOURCE: &str = "Case";

/// Resource type used for the task subject (`Task.for`).
pub const PATIENT_RESOURCE: &str = "Patient";

/// Resource type used for the task assignee (`Task.owner`).
pub const PRACTITIONER_RESOURCE: &str = "Practitioner";

/// Wire representation of a FHIR reference element.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Reference {
    /// Literal reference, `"<resourceType>/<id>"`.
    pub reference: String,

    /// Optional human-readable label for the referenced resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// The typed parts of a literal reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedReference {
    pub resource_type: String,
    pub id: String,
}

/// Reference parsing and construction.
///
/// This is a zero-sized type used for namespacing reference operations.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Split a literal reference into resource type and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::MalformedReference`] if `reference` is empty, contains no `/`, or
    /// has nothing before or after the first `/`.
    pub fn parse(reference: &str) -> FhirResult<ParsedReference> {
        let Some((resource_type, id)) = reference.split_once('/') else {
            return Err(FhirError::MalformedReference(reference.to_string()));
        };

        if resource_type.is_empty() || id.is_empty() {
            return Err(FhirError::MalformedReference(reference.to_string()));
        }

        Ok(ParsedReference {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Build a reference element from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if `resource_type` or `id` is empty. The same rule
    /// as [`ReferenceResolver::parse`], so any identifier that parses can be built again.
    pub fn build(resource_type: &str, id: &str, display: Option<&str>) -> FhirResult<Reference> {
        if resource_type.is_empty() {
            return Err(FhirError::InvalidInput(
                "reference resource type cannot be empty".into(),
            ));
        }
        if id.is_empty() {
            return Err(FhirError::InvalidInput(format!(
                "{resource_type} reference id cannot be empty"
            )));
        }

        Ok(Reference {
            reference: format!("{resource_type}/{id}"),
            display: display.map(str::to_string),
        })
    }

    /// Parse a reference and return its identifier, logging when the type is unexpected.
    ///
    /// A type mismatch (for example `focus` pointing at `Encounter/e1`) is structurally valid,
    /// so the identifier is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::MalformedReference`] if the reference cannot be parsed.
    pub fn expect_type(reference: &Reference, expected_type: &str) -> FhirResult<String> {
        let parsed = Self::parse(&reference.reference)?;
        if parsed.resource_type != expected_type {
            tracing::warn!(
                reference = %reference.reference,
                expected = expected_type,
                "reference points at an unexpected resource type"
            );
        }
        Ok(parsed.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_patient_reference() {
        let parsed = ReferenceResolver::parse("Patient/p1").expect("parse reference");
        assert_eq!(
            parsed,
            ParsedReference {
                resource_type: "Patient".into(),
                id: "p1".into(),
            }
        );
    }

    #[test]
    fn keeps_further_slashes_in_identifier() {
        let parsed = ReferenceResolver::parse("Case/2025/04/c1").expect("parse reference");
        assert_eq!(parsed.resource_type, "Case");
        assert_eq!(parsed.id, "2025/04/c1");
    }

    #[test]
    fn rejects_reference_without_separator() {
        let err = ReferenceResolver::parse("garbage").expect_err("should reject garbage");
        match err {
            FhirError::MalformedReference(value) => assert_eq!(value, "garbage"),
            other => panic!("expected MalformedReference error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_reference() {
        let err = ReferenceResolver::parse("").expect_err("should reject empty");
        assert!(matches!(err, FhirError::MalformedReference(_)));
    }

    #[test]
    fn rejects_missing_type_or_identifier() {
        for input in ["/p1", "Patient/", "/"] {
            let err = ReferenceResolver::parse(input).expect_err("should reject half reference");
            assert!(
                matches!(err, FhirError::MalformedReference(ref value) if value == input),
                "unexpected error for {input}: {err:?}"
            );
        }
    }

    #[test]
    fn builds_reference_with_display() {
        let reference = ReferenceResolver::build("Practitioner", "u1", Some("Dr Jane Smith"))
            .expect("build reference");
        assert_eq!(reference.reference, "Practitioner/u1");
        assert_eq!(reference.display.as_deref(), Some("Dr Jane Smith"));
    }

    #[test]
    fn builds_reference_without_display() {
        let reference = ReferenceResolver::build("Case", "c1", None).expect("build reference");
        assert_eq!(reference.reference, "Case/c1");
        assert!(reference.display.is_none());
    }

    #[test]
    fn build_rejects_blank_parts() {
        let err = ReferenceResolver::build("", "c1", None).expect_err("should reject blank type");
        assert!(matches!(err, FhirError::InvalidInput(msg) if msg.contains("resource type")));

        let err = ReferenceResolver::build("Case", "", None).expect_err("should reject blank id");
        assert!(matches!(err, FhirError::InvalidInput(msg) if msg.contains("Case")));
    }

    #[test]
    fn parse_and_build_accept_the_same_identifiers() {
        let parsed = ReferenceResolver::parse("Patient/ ").expect("parse whitespace id");
        assert_eq!(parsed.id, " ");

        let reference =
            ReferenceResolver::build(&parsed.resource_type, &parsed.id, None).expect("build back");
        assert_eq!(reference.reference, "Patient/ ");
    }

    #[test]
    fn built_reference_parses_back() {
        let reference = ReferenceResolver::build("Patient", "p1", None).expect("build reference");
        let parsed = ReferenceResolver::parse(&reference.reference).expect("parse reference");
        assert_eq!(parsed.resource_type, "Patient");
        assert_eq!(parsed.id, "p1");
    }

    #[test]
    fn expect_type_returns_identifier_on_mismatch() {
        let reference = Reference {
            reference: "Encounter/e1".into(),
            display: None,
        };
        let id = ReferenceResolver::expect_type(&reference, CASE_RESOURCE).expect("parse");
        assert_eq!(id, "e1");
    }
}
