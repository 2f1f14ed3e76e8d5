//! Task import/export orchestration.
//!
//! [`TaskService`] sits between callers (REST handlers, the CLI) and the `fhir` codec. It owns
//! the one decision the codec deliberately leaves out: display names. Inbound, names are looked
//! up by id after conversion; outbound, they are looked up before conversion and handed to the
//! codec as context.

use crate::directory::DisplayNameResolver;
use crate::CoreResult;
use chrono::{DateTime, Utc};
use crm_types::ResourceKind;
use fhir::{
    ExternalContext, Reference, ReferenceResolver, TaskCodec, TaskData, TaskResource,
    UnmappableEnumWarning,
};
use std::sync::Arc;

/// Result of importing a FHIR Task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedTask {
    /// Internal task with display names filled in where the resolver knew them.
    pub task: TaskData,
    pub warnings: Vec<UnmappableEnumWarning>,
}

/// Result of exporting an internal task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedTask {
    pub resource: TaskResource,
    pub warnings: Vec<UnmappableEnumWarning>,
}

/// Values the internal model does not hold but an export may carry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Original creation time; defaults to now when absent.
    pub authored_on: Option<DateTime<Utc>>,
    pub period_start: Option<DateTime<Utc>>,
}

/// Converts tasks in both directions and resolves display names around the codec.
#[derive(Clone)]
pub struct TaskService {
    resolver: Arc<dyn DisplayNameResolver>,
}

impl TaskService {
    pub fn new(resolver: Arc<dyn DisplayNameResolver>) -> Self {
        Self { resolver }
    }

    /// Convert a FHIR Task into an internal task and enrich it with display names.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fhir`](crate::CoreError::Fhir) if the resource fails validation or
    /// conversion. The underlying [`fhir::FhirError`] is passed through unchanged.
    pub fn import(&self, resource: &TaskResource) -> CoreResult<ImportedTask> {
        let translated = TaskCodec::from_external(resource)?;
        let mut task = translated.value;

        // Only references of the expected type are enriched.
        if points_at(resource.for_.as_ref(), ResourceKind::Patient) {
            let patient_name =
                self.display_name(ResourceKind::Patient, Some(task.patient_id.as_str()));
            if let Some(name) = patient_name {
                task = task.with_patient_name(name);
            }
        }

        if points_at(resource.owner.as_ref(), ResourceKind::Practitioner) {
            let assignee_name =
                self.display_name(ResourceKind::Practitioner, task.assignee_id.as_deref());
            if let Some(name) = assignee_name {
                task = task.with_assignee_name(name);
            }
        }

        tracing::info!(
            task_id = %task.id,
            warnings = translated.warnings.len(),
            "imported FHIR Task"
        );

        Ok(ImportedTask {
            task,
            warnings: translated.warnings,
        })
    }

    /// Parse FHIR Task JSON and import it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fhir`](crate::CoreError::Fhir) for schema mismatches as well as
    /// validation and conversion failures.
    pub fn import_json(&self, json_text: &str) -> CoreResult<ImportedTask> {
        let resource = TaskCodec::parse_json(json_text)?;
        self.import(&resource)
    }

    /// Convert an internal task into a FHIR Task, embedding resolved display names.
    ///
    /// Names already carried on the task are not trusted; references get whatever the resolver
    /// returns for their ids.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fhir`](crate::CoreError::Fhir) if an identifier needed for a
    /// reference is empty.
    pub fn export(&self, task: &TaskData, options: ExportOptions) -> CoreResult<ExportedTask> {
        let context = ExternalContext {
            case_display: self.display_name(ResourceKind::Case, Some(task.case_id.as_str())),
            patient_display: self
                .display_name(ResourceKind::Patient, Some(task.patient_id.as_str())),
            assignee_display: self
                .display_name(ResourceKind::Practitioner, task.assignee_id.as_deref()),
            period_start: options.period_start,
            authored_on: options.authored_on,
        };

        let translated = TaskCodec::to_external(task, &context)?;

        tracing::info!(
            task_id = %task.id,
            warnings = translated.warnings.len(),
            "exported FHIR Task"
        );

        Ok(ExportedTask {
            resource: translated.value,
            warnings: translated.warnings,
        })
    }

    fn display_name(&self, kind: ResourceKind, id: Option<&str>) -> Option<String> {
        let id = id?;
        let name = self.resolver.resolve_display_name(kind.as_str(), id);
        if name.is_none() {
            tracing::debug!(resource_type = %kind, id, "no display name found");
        }
        name.map(|n| n.into_inner())
    }
}

fn points_at(reference: Option<&Reference>, kind: ResourceKind) -> bool {
    reference
        .and_then(|r| ReferenceResolver::parse(&r.reference).ok())
        .is_some_and(|parsed| parsed.resource_type == kind.as_str())
}
