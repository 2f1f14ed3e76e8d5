//! Request and response bodies for the task APIs.
//!
//! The FHIR and internal task shapes are defined by the `fhir` crate; they are embedded here as
//! opaque JSON objects in the OpenAPI schema.

use chrono::{DateTime, Utc};
use fhir::{Direction, TaskData, TaskResource, UnmappableEnumWarning};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A vocabulary fallback applied during conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WarningRes {
    /// `status` or `priority`.
    pub field: String,
    pub value: String,
    pub fallback: String,
    /// `inbound` or `outbound`.
    pub direction: String,
    pub message: String,
}

impl From<&UnmappableEnumWarning> for WarningRes {
    fn from(warning: &UnmappableEnumWarning) -> Self {
        let direction = match warning.direction {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        };
        Self {
            field: warning.field.as_str().to_string(),
            value: warning.value.clone(),
            fallback: warning.fallback.clone(),
            direction: direction.to_string(),
            message: warning.to_string(),
        }
    }
}

/// Converts a slice of warnings for a response body.
pub fn warnings_res(warnings: &[UnmappableEnumWarning]) -> Vec<WarningRes> {
    warnings.iter().map(WarningRes::from).collect()
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportTaskRes {
    /// Internal task entity.
    #[schema(value_type = Object)]
    pub task: TaskData,
    pub warnings: Vec<WarningRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportTaskReq {
    /// Internal task entity.
    #[schema(value_type = Object)]
    pub task: TaskData,

    /// Original creation time, emitted as `authoredOn`. Defaults to the time of the request.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub authored_on: Option<DateTime<Utc>>,

    /// Emitted as `executionPeriod.start` when present.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub period_start: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExportTaskRes {
    /// FHIR Task resource.
    #[schema(value_type = Object)]
    pub resource: TaskResource,
    pub warnings: Vec<WarningRes>,
}

/// Error body returned when a task cannot be loaded or saved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,

    /// Names of the violated Task elements, for structural validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}
