//! Structural validation of inbound Task resources.
//!
//! This runs before any translation. It only checks that a resource is well-formed enough to
//! convert; vocabulary problems are handled later by fallback substitution, never here.

use crate::reference::{Reference, ReferenceResolver};
use crate::task::{TaskResource, TASK_RESOURCE};
use crate::{FhirError, FhirResult};

/// Inbound structural checks.
///
/// This is a zero-sized type used for namespacing validation operations.
pub struct ValidationGate;

impl ValidationGate {
    /// Check that `resource` is a structurally valid Task.
    ///
    /// Checks run in this order and every failure is collected:
    /// - `resourceType` is `"Task"`
    /// - `id` is a non-empty string
    /// - `for` is present and parseable
    /// - `focus`, if present, is parseable
    /// - `owner`, if present, is parseable
    /// - a due date can be derived (`executionPeriod.end`, `executionPeriod.start` or
    ///   `authoredOn`); reported as `authoredOn`
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidResource`] listing the violated element names.
    pub fn check(resource: &TaskResource) -> FhirResult<()> {
        let mut violations = Vec::new();

        if resource.resource_type != TASK_RESOURCE {
            violations.push("resourceType");
        }

        if resource.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            violations.push("id");
        }

        if !resource.for_.as_ref().is_some_and(is_parseable) {
            violations.push("for");
        }

        if resource.focus.as_ref().is_some_and(|r| !is_parseable(r)) {
            violations.push("focus");
        }

        if resource.owner.as_ref().is_some_and(|r| !is_parseable(r)) {
            violations.push("owner");
        }

        if resource.due_date().is_none() {
            violations.push("authoredOn");
        }

        if violations.is_empty() {
            return Ok(());
        }

        tracing::warn!(
            id = resource.id.as_deref().unwrap_or("<none>"),
            violations = ?violations,
            "rejected structurally invalid Task resource"
        );

        Err(FhirError::InvalidResource {
            violations: violations.into_iter().map(str::to_string).collect(),
        })
    }
}

fn is_parseable(reference: &Reference) -> bool {
    ReferenceResolver::parse(&reference.reference).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Period;

    fn reference(value: &str) -> Reference {
        Reference {
            reference: value.into(),
            display: None,
        }
    }

    fn valid_resource() -> TaskResource {
        TaskResource {
            resource_type: "Task".into(),
            id: Some("t1".into()),
            status: Some("requested".into()),
            focus: Some(reference("Case/c1")),
            for_: Some(reference("Patient/p1")),
            authored_on: Some(
                "2025-04-01T14:00:00Z"
                    .parse()
                    .expect("valid datetime"),
            ),
            ..TaskResource::default()
        }
    }

    fn violations(resource: &TaskResource) -> Vec<String> {
        match ValidationGate::check(resource) {
            Err(FhirError::InvalidResource { violations }) => violations,
            Ok(()) => panic!("expected InvalidResource error, resource passed"),
            Err(other) => panic!("expected InvalidResource error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_resource() {
        assert!(ValidationGate::check(&valid_resource()).is_ok());
    }

    #[test]
    fn accepts_resource_without_optional_references() {
        let resource = TaskResource {
            focus: None,
            owner: None,
            ..valid_resource()
        };
        assert!(ValidationGate::check(&resource).is_ok());
    }

    #[test]
    fn rejects_wrong_resource_type() {
        let resource = TaskResource {
            resource_type: "Patient".into(),
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["resourceType"]);
    }

    #[test]
    fn rejects_missing_or_blank_id() {
        let resource = TaskResource {
            id: None,
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["id"]);

        let resource = TaskResource {
            id: Some("   ".into()),
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["id"]);
    }

    #[test]
    fn rejects_missing_or_malformed_subject() {
        let resource = TaskResource {
            for_: None,
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["for"]);

        let resource = TaskResource {
            for_: Some(reference("p1")),
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["for"]);
    }

    #[test]
    fn rejects_malformed_focus_and_owner() {
        let resource = TaskResource {
            focus: Some(reference("")),
            owner: Some(reference("Practitioner/")),
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["focus", "owner"]);
    }

    #[test]
    fn rejects_resource_without_any_date() {
        let resource = TaskResource {
            authored_on: None,
            execution_period: Some(Period::default()),
            ..valid_resource()
        };
        assert_eq!(violations(&resource), vec!["authoredOn"]);
    }

    #[test]
    fn period_alone_satisfies_date_check() {
        let resource = TaskResource {
            authored_on: None,
            execution_period: Some(Period {
                start: None,
                end: Some("2025-04-02T14:00:00Z".parse().expect("valid datetime")),
            }),
            ..valid_resource()
        };
        assert!(ValidationGate::check(&resource).is_ok());
    }

    #[test]
    fn collects_every_violation_in_order() {
        let resource = TaskResource {
            resource_type: "Patient".into(),
            id: None,
            for_: None,
            focus: Some(reference("garbage")),
            ..valid_resource()
        };
        assert_eq!(
            violations(&resource),
            vec!["resourceType", "id", "for", "focus"]
        );
    }

    #[test]
    fn ignores_vocabulary_problems() {
        let resource = TaskResource {
            status: Some("not-a-status".into()),
            priority: Some("whenever".into()),
            intent: None,
            ..valid_resource()
        };
        assert!(ValidationGate::check(&resource).is_ok());
    }
}
