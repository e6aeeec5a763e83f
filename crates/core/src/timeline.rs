//! Timeline service: the facade the API layer talks to.
//!
//! Combines a [`VisitStore`] with [`analyze`]. Every read recomputes issues from the stored
//! visits; nothing derived is persisted.

use std::sync::Arc;

use trajectory_types::PatientId;

use crate::analysis::analyze;
use crate::error::{TrajectoryError, TrajectoryResult};
use crate::store::{InMemoryVisitStore, VisitStore};
use crate::visit::{sorted_by_date, PatientTimeline, Visit};

/// Patient timeline operations over an injected store.
#[derive(Clone)]
pub struct TimelineService {
    store: Arc<dyn VisitStore>,
}

impl TimelineService {
    /// Creates a service backed by `store`.
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    /// Creates a service backed by a fresh [`InMemoryVisitStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryVisitStore::new()))
    }

    /// Lists the identifiers of every patient with recorded visits.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::StoreUnavailable`] if the store cannot be read.
    pub fn list_patients(&self) -> TrajectoryResult<Vec<PatientId>> {
        self.store.patient_ids()
    }

    /// Builds the timeline for a patient.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::PatientNotFound`] if the patient has no entry, or
    /// [`TrajectoryError::StoreUnavailable`] if the store cannot be read.
    pub fn timeline(&self, id: &PatientId) -> TrajectoryResult<PatientTimeline> {
        let visits = self
            .store
            .visits(id)?
            .ok_or_else(|| TrajectoryError::PatientNotFound(id.clone()))?;
        Ok(build_timeline(id, &visits))
    }

    /// Records a visit, creating the patient if needed, and returns the updated timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::StoreUnavailable`] if the store cannot be written.
    pub fn record_visit(&self, id: &PatientId, visit: Visit) -> TrajectoryResult<PatientTimeline> {
        let visits = self.store.append(id, visit)?;
        tracing::info!(patient_id = %id, visits = visits.len(), "visit recorded");
        Ok(build_timeline(id, &visits))
    }

    /// Deletes every visit for a patient.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::PatientNotFound`] if the patient has no entry.
    pub fn delete_patient(&self, id: &PatientId) -> TrajectoryResult<()> {
        if !self.store.remove(id)? {
            return Err(TrajectoryError::PatientNotFound(id.clone()));
        }
        tracing::info!(patient_id = %id, "patient deleted");
        Ok(())
    }

    /// Clears the whole store and returns how many patients were removed.
    pub fn reset(&self) -> TrajectoryResult<usize> {
        let dropped = self.store.clear()?;
        tracing::info!(dropped, "visit store reset");
        Ok(dropped)
    }
}

fn build_timeline(id: &PatientId, visits: &[Visit]) -> PatientTimeline {
    PatientTimeline {
        patient_id: id.clone(),
        visits: sorted_by_date(visits),
        issues: analyze(visits),
    }
}
