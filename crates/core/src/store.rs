//! Visit storage.
//!
//! The analyzer never touches storage; callers read a snapshot from a [`VisitStore`] and hand it
//! over. Each patient's history is append-only.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use trajectory_types::PatientId;

use crate::error::{TrajectoryError, TrajectoryResult};
use crate::visit::Visit;

/// Keyed, append-only collection of visits per patient.
///
/// Implementations must serialise concurrent writers for the same patient.
pub trait VisitStore: Send + Sync {
    /// Identifiers of every stored patient, in ascending order.
    fn patient_ids(&self) -> TrajectoryResult<Vec<PatientId>>;

    /// Snapshot of a patient's visits in insertion order, or `None` if unknown.
    fn visits(&self, id: &PatientId) -> TrajectoryResult<Option<Vec<Visit>>>;

    /// Appends a visit, creating the patient if absent, and returns the updated snapshot.
    fn append(&self, id: &PatientId, visit: Visit) -> TrajectoryResult<Vec<Visit>>;

    /// Removes every visit for a patient. Returns `false` if the patient was unknown.
    fn remove(&self, id: &PatientId) -> TrajectoryResult<bool>;

    /// Removes everything and returns how many patients were dropped.
    fn clear(&self) -> TrajectoryResult<usize>;
}

/// Process-local store guarded by a single lock.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryVisitStore {
    patients: RwLock<BTreeMap<PatientId, Vec<Visit>>>,
}

impl InMemoryVisitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrajectoryResult<RwLockReadGuard<'_, BTreeMap<PatientId, Vec<Visit>>>> {
        self.patients
            .read()
            .map_err(|e| TrajectoryError::StoreUnavailable(e.to_string()))
    }

    fn write(&self) -> TrajectoryResult<RwLockWriteGuard<'_, BTreeMap<PatientId, Vec<Visit>>>> {
        self.patients
            .write()
            .map_err(|e| TrajectoryError::StoreUnavailable(e.to_string()))
    }
}

impl VisitStore for InMemoryVisitStore {
    fn patient_ids(&self) -> TrajectoryResult<Vec<PatientId>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn visits(&self, id: &PatientId) -> TrajectoryResult<Option<Vec<Visit>>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn append(&self, id: &PatientId, visit: Visit) -> TrajectoryResult<Vec<Visit>> {
        let mut patients = self.write()?;
        let visits = patients.entry(id.clone()).or_default();
        visits.push(visit);
        Ok(visits.clone())
    }

    fn remove(&self, id: &PatientId) -> TrajectoryResult<bool> {
        Ok(self.write()?.remove(id).is_some())
    }

    fn clear(&self) -> TrajectoryResult<usize> {
        let mut patients = self.write()?;
        let dropped = patients.len();
        patients.clear();
        Ok(dropped)
    }
}
