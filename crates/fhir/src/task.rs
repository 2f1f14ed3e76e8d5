//! FHIR Task wire model and translation to the internal task entity.
//!
//! This module provides both the domain-level task type used by the CRM and the wire model
//! for the FHIR Task resource exchanged with clinical systems.
//!
//! Responsibilities:
//! - Define the internal task entity ([`TaskData`]) and its closed vocabularies
//! - Define a lenient wire model ([`TaskResource`]) so the validation gate can report every
//!   structural problem at once
//! - Translate in both directions, owning the due-date and optional-field policy
//!
//! Notes:
//! - Display names are never produced here. `from_external` returns identifiers only and
//!   `to_external` embeds display strings the caller has already resolved.
//! - Priority is a lossy mapping (`asap` and `stat` both become `high`), so only `low` and
//!   `medium` are guaranteed to round trip exactly.
//! - The external schema has no title; `title` is derived from the description inbound and is
//!   not carried outbound.

use crate::reference::{
    Reference, ReferenceResolver, CASE_RESOURCE, PATIENT_RESOURCE, PRACTITIONER_RESOURCE,
};
use crate::validation::ValidationGate;
use crate::vocabulary::{
    UnmappableEnumWarning, Vocabulary, DEFAULT_EXTERNAL_PRIORITY, TASK_INTENT,
};
use crate::{FhirError, FhirResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The only `resourceType` accepted inbound and emitted outbound.
pub const TASK_RESOURCE: &str = "Task";

// ============================================================================
// Public domain-level types
// ============================================================================

/// Internal task status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Closed,
    OnHold,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
            Self::OnHold => "on-hold",
        }
    }
}

/// Internal task priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Domain-level carrier for a task as the CRM sees it.
///
/// Values are produced by [`TaskCodec::from_external`] and are not edited in place; the
/// `with_*` helpers consume the value and return an enriched copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    /// Task identifier, carried unchanged in both directions.
    pub id: String,

    pub title: String,

    pub description: String,

    pub priority: TaskPriority,

    pub status: TaskStatus,

    pub due_date: DateTime<Utc>,

    pub patient_id: String,

    pub case_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    /// Patient display name, filled in by a collaborator after conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    /// Assignee display name, filled in by a collaborator after conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
}

impl TaskData {
    /// Returns a copy of this task with the patient display name set.
    pub fn with_patient_name(self, name: impl Into<String>) -> Self {
        Self {
            patient_name: Some(name.into()),
            ..self
        }
    }

    /// Returns a copy of this task with the assignee display name set.
    pub fn with_assignee_name(self, name: impl Into<String>) -> Self {
        Self {
            assignee_name: Some(name.into()),
            ..self
        }
    }
}

/// Caller-supplied values embedded into an outbound resource.
///
/// Every field is optional: references are valid without a display, and the internal model has
/// no creation time or period start of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalContext {
    pub case_display: Option<String>,
    pub patient_display: Option<String>,
    pub assignee_display: Option<String>,
    /// Emitted as `executionPeriod.start` when present.
    pub period_start: Option<DateTime<Utc>>,
    /// Emitted as `authoredOn`; the current instant is used when absent.
    pub authored_on: Option<DateTime<Utc>>,
}

/// A translated value plus every vocabulary fallback raised while producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translated<T> {
    pub value: T,
    pub warnings: Vec<UnmappableEnumWarning>,
}

// ============================================================================
// Wire types
// ============================================================================

/// Wire representation of a FHIR Task resource.
///
/// Every element is optional on the way in so that [`ValidationGate`] can report all missing
/// required elements together. Elements this workspace does not use (for example `meta`) are
/// ignored rather than rejected.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResource {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<Reference>,

    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_period: Option<Period>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Reference>,
}

/// Wire representation of a FHIR Period (the task's due-date window).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl TaskResource {
    /// The date-time used as the internal due date: `executionPeriod.end`, then
    /// `executionPeriod.start`, then `authoredOn`.
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        let period = self.execution_period.as_ref();
        period
            .and_then(|p| p.end)
            .or_else(|| period.and_then(|p| p.start))
            .or(self.authored_on)
    }
}

// ============================================================================
// Public TaskCodec operations
// ============================================================================

/// Task translation operations.
///
/// This is a zero-sized type used for namespacing task-related operations.
/// All methods are associated functions.
pub struct TaskCodec;

impl TaskCodec {
    /// Parse a FHIR Task resource from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
    /// `executionPeriod.end`) to the failing field when the JSON does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] if the JSON is malformed or any element has an
    /// unexpected type (including date-times that are not RFC 3339).
    pub fn parse_json(json_text: &str) -> FhirResult<TaskResource> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        match serde_path_to_error::deserialize::<_, TaskResource>(&mut deserializer) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                Err(FhirError::Translation(format!(
                    "Task schema mismatch at {path}: {source}"
                )))
            }
        }
    }

    /// Render a FHIR Task resource as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidJson`] if serialisation fails.
    pub fn render_json(resource: &TaskResource) -> FhirResult<String> {
        Ok(serde_json::to_string_pretty(resource)?)
    }

    /// Parse JSON text and convert it into the internal task entity.
    ///
    /// # Errors
    ///
    /// Returns any error from [`TaskCodec::parse_json`] or [`TaskCodec::from_external`].
    pub fn import_json(json_text: &str) -> FhirResult<Translated<TaskData>> {
        let resource = Self::parse_json(json_text)?;
        Self::from_external(&resource)
    }

    /// Convert an external Task resource into the internal task entity.
    ///
    /// The resource is run through [`ValidationGate::check`] first. Display names are left
    /// unset. Status and priority codes without a table entry fall back to documented values
    /// and are reported in [`Translated::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidResource`] if the resource is structurally invalid or has no
    /// `focus` (the internal case id is required).
    pub fn from_external(resource: &TaskResource) -> FhirResult<Translated<TaskData>> {
        ValidationGate::check(resource)?;

        let id = required(resource.id.as_ref(), "id")?;
        let subject = required(resource.for_.as_ref(), "for")?;
        let focus = required(resource.focus.as_ref(), "focus")?;
        let due_date = *required(resource.due_date().as_ref(), "authoredOn")?;

        let patient_id = ReferenceResolver::expect_type(subject, PATIENT_RESOURCE)?;
        let case_id = ReferenceResolver::expect_type(focus, CASE_RESOURCE)?;
        let assignee_id = resource
            .owner
            .as_ref()
            .map(|owner| ReferenceResolver::expect_type(owner, PRACTITIONER_RESOURCE))
            .transpose()?;

        let status = Vocabulary::to_internal_status(resource.status.as_deref().unwrap_or_default());
        let priority = Vocabulary::to_internal_priority(
            resource
                .priority
                .as_deref()
                .unwrap_or(DEFAULT_EXTERNAL_PRIORITY),
        );

        let description = resource.description.clone().unwrap_or_default();
        let warnings: Vec<_> = [status.warning, priority.warning]
            .into_iter()
            .flatten()
            .collect();

        tracing::debug!(task_id = %id, warnings = warnings.len(), "translated inbound task");

        Ok(Translated {
            value: TaskData {
                id: id.clone(),
                title: description.clone(),
                description,
                priority: priority.value,
                status: status.value,
                due_date,
                patient_id,
                case_id,
                assignee_id,
                patient_name: None,
                assignee_name: None,
            },
            warnings,
        })
    }

    /// Convert an internal task into an external Task resource.
    ///
    /// `executionPeriod.end` carries the due date; `executionPeriod.start` and `authoredOn` come
    /// from `context` (with `authoredOn` defaulting to now). `owner` is omitted when the task
    /// has no assignee. `intent` is always `order`.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if the task id, case id, patient id or assignee id is
    /// empty.
    pub fn to_external(
        task: &TaskData,
        context: &ExternalContext,
    ) -> FhirResult<Translated<TaskResource>> {
        if task.id.trim().is_empty() {
            return Err(FhirError::InvalidInput("task id cannot be empty".into()));
        }

        let focus =
            ReferenceResolver::build(CASE_RESOURCE, &task.case_id, context.case_display.as_deref())?;
        let subject = ReferenceResolver::build(
            PATIENT_RESOURCE,
            &task.patient_id,
            context.patient_display.as_deref(),
        )?;
        let owner = task
            .assignee_id
            .as_deref()
            .map(|assignee_id| {
                ReferenceResolver::build(
                    PRACTITIONER_RESOURCE,
                    assignee_id,
                    context.assignee_display.as_deref(),
                )
            })
            .transpose()?;

        let status = Vocabulary::to_external_status(task.status);
        let priority = Vocabulary::to_external_priority(task.priority);
        let warnings: Vec<_> = [status.warning, priority.warning]
            .into_iter()
            .flatten()
            .collect();

        tracing::debug!(task_id = %task.id, warnings = warnings.len(), "translated outbound task");

        Ok(Translated {
            value: TaskResource {
                resource_type: TASK_RESOURCE.to_string(),
                id: Some(task.id.clone()),
                status: Some(status.value.to_string()),
                intent: Some(TASK_INTENT.to_string()),
                priority: Some(priority.value.to_string()),
                description: (!task.description.is_empty()).then(|| task.description.clone()),
                focus: Some(focus),
                for_: Some(subject),
                authored_on: Some(context.authored_on.unwrap_or_else(Utc::now)),
                execution_period: Some(Period {
                    start: context.period_start,
                    end: Some(task.due_date),
                }),
                owner,
            },
            warnings,
        })
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Unwrap an element the gate has already checked, reporting it as a violation otherwise.
fn required<'a, T: ?Sized>(value: Option<&'a T>, field: &str) -> FhirResult<&'a T> {
    value.ok_or_else(|| FhirError::InvalidResource {
        violations: vec![field.to_string()],
    })
}
