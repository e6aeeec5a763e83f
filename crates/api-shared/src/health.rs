use crate::schema::HealthRes;

/// Health check used by the HTTP API.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as healthy.
    ///
    /// The engine holds no resources that can degrade, so liveness is the only signal.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "ok".into(),
        }
    }
}
