use trajectory_types::PatientId;

#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("patient not found: {0}")]
    PatientNotFound(PatientId),
    #[error("visit store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("visit import failed at {path}: {source}")]
    Import {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type TrajectoryResult<T> = std::result::Result<T, TrajectoryError>;
