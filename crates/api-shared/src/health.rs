use crate::dto::HealthRes;

/// Simple health service shared by the API surfaces.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// The conversion core holds no state and performs no I/O, so there is nothing to probe;
    /// a running process is a healthy one.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "CRM task service is alive".into(),
        }
    }
}
