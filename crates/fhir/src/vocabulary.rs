//! Status and priority vocabulary translation.
//!
//! FHIR Task codes and the internal task vocabulary do not line up one-to-one. The mapping is
//! held in fixed tables below; nothing is inferred from code spellings.
//!
//! Notes:
//! - Several external codes can collapse onto one internal value (`accepted` and `requested`
//!   both become `open`, `asap` and `stat` both become `high`). The reverse direction always
//!   emits one canonical code per internal value, so those collapses do not round trip.
//! - A code with no table entry never fails a conversion. The documented fallback is used and
//!   an [`UnmappableEnumWarning`] is returned alongside the value and logged.

use crate::task::{TaskPriority, TaskStatus};
use serde::Serialize;
use std::fmt;

/// External status code to internal status.
const STATUS_TO_INTERNAL: &[(&str, TaskStatus)] = &[
    ("requested", TaskStatus::Open),
    ("accepted", TaskStatus::Open),
    ("in-progress", TaskStatus::InProgress),
    ("on-hold", TaskStatus::OnHold),
    ("completed", TaskStatus::Closed),
    ("cancelled", TaskStatus::Closed),
];

/// Canonical external code for each internal status.
const STATUS_TO_EXTERNAL: &[(TaskStatus, &str)] = &[
    (TaskStatus::Open, "requested"),
    (TaskStatus::InProgress, "in-progress"),
    (TaskStatus::Closed, "completed"),
    (TaskStatus::OnHold, "on-hold"),
];

/// External priority code to internal priority.
const PRIORITY_TO_INTERNAL: &[(&str, TaskPriority)] = &[
    ("routine", TaskPriority::Low),
    ("urgent", TaskPriority::Medium),
    ("asap", TaskPriority::High),
    ("stat", TaskPriority::High),
];

/// Canonical external code for each internal priority.
const PRIORITY_TO_EXTERNAL: &[(TaskPriority, &str)] = &[
    (TaskPriority::Low, "routine"),
    (TaskPriority::Medium, "urgent"),
    (TaskPriority::High, "asap"),
];

/// Internal status used when an external status code has no table entry.
pub const INTERNAL_STATUS_FALLBACK: TaskStatus = TaskStatus::Open;

/// External status code used when an internal status has no table entry.
pub const EXTERNAL_STATUS_FALLBACK: &str = "in-progress";

/// Internal priority used when an external priority code has no table entry.
pub const INTERNAL_PRIORITY_FALLBACK: TaskPriority = TaskPriority::Low;

/// External priority code used when an internal priority has no table entry.
pub const EXTERNAL_PRIORITY_FALLBACK: &str = "routine";

/// Priority assumed when a resource carries no priority at all (the FHIR default).
pub const DEFAULT_EXTERNAL_PRIORITY: &str = "routine";

/// Intent emitted on every outbound Task. Inbound intent is discarded.
pub const TASK_INTENT: &str = "order";

/// Which coded field could not be mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumField {
    Status,
    Priority,
}

impl EnumField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
        }
    }
}

/// Direction of the lookup that fell back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// External code to internal value.
    Inbound,
    /// Internal value to external code.
    Outbound,
}

/// A non-fatal record that a coded value had no table entry and a fallback was used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmappableEnumWarning {
    pub field: EnumField,
    /// The value that could not be mapped, as received.
    pub value: String,
    /// The value substituted for it.
    pub fallback: String,
    pub direction: Direction,
}

impl fmt::Display for UnmappableEnumWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        };
        write!(
            f,
            "unmappable {direction} {} '{}', using '{}'",
            self.field.as_str(),
            self.value,
            self.fallback
        )
    }
}

/// A mapped value plus the warning raised while mapping it, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapped<T> {
    pub value: T,
    pub warning: Option<UnmappableEnumWarning>,
}

impl<T> Mapped<T> {
    fn exact(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    fn fallback(value: T, warning: UnmappableEnumWarning) -> Self {
        tracing::warn!(
            field = warning.field.as_str(),
            value = %warning.value,
            fallback = %warning.fallback,
            direction = ?warning.direction,
            "unmappable enum value"
        );
        Self {
            value,
            warning: Some(warning),
        }
    }
}

/// Vocabulary translation operations.
///
/// This is a zero-sized type used for namespacing the table lookups.
pub struct Vocabulary;

impl Vocabulary {
    /// Map an external Task status code to the internal status.
    ///
    /// Unknown codes (including FHIR codes such as `draft` that have no internal counterpart)
    /// map to [`INTERNAL_STATUS_FALLBACK`] with a warning.
    pub fn to_internal_status(code: &str) -> Mapped<TaskStatus> {
        match lookup(STATUS_TO_INTERNAL, &code) {
            Some(status) => Mapped::exact(status),
            None => Mapped::fallback(
                INTERNAL_STATUS_FALLBACK,
                UnmappableEnumWarning {
                    field: EnumField::Status,
                    value: code.to_string(),
                    fallback: INTERNAL_STATUS_FALLBACK.as_str().to_string(),
                    direction: Direction::Inbound,
                },
            ),
        }
    }

    /// Map an internal status to its canonical external code.
    pub fn to_external_status(status: TaskStatus) -> Mapped<&'static str> {
        match lookup(STATUS_TO_EXTERNAL, &status) {
            Some(code) => Mapped::exact(code),
            None => Mapped::fallback(
                EXTERNAL_STATUS_FALLBACK,
                UnmappableEnumWarning {
                    field: EnumField::Status,
                    value: status.as_str().to_string(),
                    fallback: EXTERNAL_STATUS_FALLBACK.to_string(),
                    direction: Direction::Outbound,
                },
            ),
        }
    }

    /// Map an external Task priority code to the internal priority.
    ///
    /// This is many-to-one: `asap` and `stat` both give [`TaskPriority::High`].
    pub fn to_internal_priority(code: &str) -> Mapped<TaskPriority> {
        match lookup(PRIORITY_TO_INTERNAL, &code) {
            Some(priority) => Mapped::exact(priority),
            None => Mapped::fallback(
                INTERNAL_PRIORITY_FALLBACK,
                UnmappableEnumWarning {
                    field: EnumField::Priority,
                    value: code.to_string(),
                    fallback: INTERNAL_PRIORITY_FALLBACK.as_str().to_string(),
                    direction: Direction::Inbound,
                },
            ),
        }
    }

    /// Map an internal priority to its canonical external code (`high` gives `asap`).
    pub fn to_external_priority(priority: TaskPriority) -> Mapped<&'static str> {
        match lookup(PRIORITY_TO_EXTERNAL, &priority) {
            Some(code) => Mapped::exact(code),
            None => Mapped::fallback(
                EXTERNAL_PRIORITY_FALLBACK,
                UnmappableEnumWarning {
                    field: EnumField::Priority,
                    value: priority.as_str().to_string(),
                    fallback: EXTERNAL_PRIORITY_FALLBACK.to_string(),
                    direction: Direction::Outbound,
                },
            ),
        }
    }
}

fn lookup<K, V>(table: &[(K, V)], key: &K) -> Option<V>
where
    K: PartialEq,
    V: Copy,
{
    table
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [TaskStatus; 4] = [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Closed,
        TaskStatus::OnHold,
    ];

    const ALL_PRIORITIES: [TaskPriority; 3] =
        [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    #[test]
    fn maps_known_external_statuses() {
        let cases = [
            ("requested", TaskStatus::Open),
            ("accepted", TaskStatus::Open),
            ("in-progress", TaskStatus::InProgress),
            ("on-hold", TaskStatus::OnHold),
            ("completed", TaskStatus::Closed),
            ("cancelled", TaskStatus::Closed),
        ];
        for (code, expected) in cases {
            let mapped = Vocabulary::to_internal_status(code);
            assert_eq!(mapped.value, expected, "status {code}");
            assert!(mapped.warning.is_none(), "status {code} should map exactly");
        }
    }

    #[test]
    fn unmapped_external_status_falls_back_to_open_with_warning() {
        let mapped = Vocabulary::to_internal_status("draft");
        assert_eq!(mapped.value, TaskStatus::Open);

        let warning = mapped.warning.expect("draft should raise a warning");
        assert_eq!(warning.field, EnumField::Status);
        assert_eq!(warning.value, "draft");
        assert_eq!(warning.fallback, "open");
        assert_eq!(warning.direction, Direction::Inbound);
    }

    #[test]
    fn status_codes_are_case_sensitive() {
        let mapped = Vocabulary::to_internal_status("Completed");
        assert_eq!(mapped.value, TaskStatus::Open);
        assert!(mapped.warning.is_some());
    }

    #[test]
    fn every_internal_status_has_a_canonical_preimage() {
        for status in ALL_STATUSES {
            let external = Vocabulary::to_external_status(status);
            assert!(external.warning.is_none(), "{status:?} has no table entry");

            let back = Vocabulary::to_internal_status(external.value);
            assert_eq!(back.value, status, "{status:?} does not round trip");
            assert!(back.warning.is_none());
        }
    }

    #[test]
    fn canonical_status_codes() {
        assert_eq!(Vocabulary::to_external_status(TaskStatus::Open).value, "requested");
        assert_eq!(
            Vocabulary::to_external_status(TaskStatus::InProgress).value,
            "in-progress"
        );
        assert_eq!(Vocabulary::to_external_status(TaskStatus::Closed).value, "completed");
        assert_eq!(Vocabulary::to_external_status(TaskStatus::OnHold).value, "on-hold");
    }

    #[test]
    fn cancelled_collapses_to_closed_and_comes_back_as_completed() {
        let internal = Vocabulary::to_internal_status("cancelled").value;
        assert_eq!(internal, TaskStatus::Closed);
        assert_eq!(Vocabulary::to_external_status(internal).value, "completed");
    }

    #[test]
    fn maps_known_external_priorities() {
        assert_eq!(Vocabulary::to_internal_priority("routine").value, TaskPriority::Low);
        assert_eq!(Vocabulary::to_internal_priority("urgent").value, TaskPriority::Medium);
        assert_eq!(Vocabulary::to_internal_priority("asap").value, TaskPriority::High);
        assert_eq!(Vocabulary::to_internal_priority("stat").value, TaskPriority::High);
    }

    #[test]
    fn priority_mapping_is_many_to_one() {
        let asap = Vocabulary::to_internal_priority("asap");
        let stat = Vocabulary::to_internal_priority("stat");
        assert_eq!(asap.value, stat.value);
        assert!(asap.warning.is_none());
        assert!(stat.warning.is_none());

        // `high` has one canonical preimage, so `stat` does not survive a round trip.
        let canonical = Vocabulary::to_external_priority(TaskPriority::High);
        assert_eq!(canonical.value, "asap");
        assert_ne!(canonical.value, "stat");
    }

    #[test]
    fn low_and_medium_priorities_round_trip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium] {
            let external = Vocabulary::to_external_priority(priority).value;
            assert_eq!(Vocabulary::to_internal_priority(external).value, priority);
        }
    }

    #[test]
    fn every_internal_priority_has_a_canonical_preimage() {
        for priority in ALL_PRIORITIES {
            assert!(
                Vocabulary::to_external_priority(priority).warning.is_none(),
                "{priority:?} has no table entry"
            );
        }
    }

    #[test]
    fn unmapped_external_priority_falls_back_to_low_with_warning() {
        let mapped = Vocabulary::to_internal_priority("whenever");
        assert_eq!(mapped.value, TaskPriority::Low);

        let warning = mapped.warning.expect("should raise a warning");
        assert_eq!(warning.field, EnumField::Priority);
        assert_eq!(warning.value, "whenever");
        assert_eq!(warning.fallback, "low");
    }

    #[test]
    fn warning_display_names_value_and_fallback() {
        let warning = Vocabulary::to_internal_status("rejected")
            .warning
            .expect("rejected is unmapped");
        assert_eq!(
            warning.to_string(),
            "unmappable inbound status 'rejected', using 'open'"
        );
    }
}
