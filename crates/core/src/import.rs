//! Loading visit lists from JSON documents.

use crate::error::{TrajectoryError, TrajectoryResult};
use crate::visit::Visit;

/// Parses a JSON array of visits.
///
/// Uses `serde_path_to_error` so a schema mismatch names the failing element and field
/// (e.g. `[2].date`).
///
/// # Errors
///
/// Returns [`TrajectoryError::Import`] if the text is not valid JSON or does not match the visit
/// schema.
pub fn parse_visits_json(text: &str) -> TrajectoryResult<Vec<Visit>> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let visits: Vec<Visit> = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        TrajectoryError::Import {
            path,
            source: err.into_inner(),
        }
    })?;
    deserializer.end().map_err(|source| TrajectoryError::Import {
        path: "<root>".into(),
        source,
    })?;
    Ok(visits)
}
