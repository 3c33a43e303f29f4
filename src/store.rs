//! Magasin transactionnel : verrou + copie de travail + sauvegarde atomique.
//!
//! Chaque écriture s'exécute sous le verrou sur une copie du planning ; la copie
//! ne devient courante qu'après une sauvegarde réussie. Le planning est relu
//! depuis le stockage sous le verrou du stockage ([`Storage::acquire`]) : deux
//! handles, ou deux processus, sur le même fichier ne peuvent pas entrelacer
//! contrôle de chevauchement et insertion.

use crate::model::{
    AssignmentChanges, AssignmentId, Driver, DriverId, NewAssignment, StatusAssignment,
    StatusKind,
};
use crate::scheduler::{
    ConflictingAssignment, DisplayedStatus, SchedError, ScheduledAssignment, Scheduler,
    SchedulerOptions,
};
use crate::storage::Storage;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Point d'entrée des écritures et lectures d'affectations sur un [`Storage`].
pub struct AssignmentStore<S: Storage> {
    storage: S,
    state: Mutex<Scheduler>,
}

impl<S: Storage> AssignmentStore<S> {
    /// Charge le planning depuis `storage`.
    pub fn open(storage: S, options: SchedulerOptions) -> Result<Self, SchedError> {
        let planning = storage.load().map_err(SchedError::Storage)?;
        Ok(Self {
            storage,
            state: Mutex::new(Scheduler::with_planning(planning, options)),
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Verrouille et recharge depuis le stockage : un autre processus a pu écrire.
    fn lock(&self) -> Result<MutexGuard<'_, Scheduler>, SchedError> {
        let mut current = self
            .state
            .lock()
            .map_err(|_| SchedError::Storage(anyhow!("planning lock poisoned")))?;
        let options = current.options();
        let planning = self.storage.load().map_err(SchedError::Storage)?;
        *current = Scheduler::with_planning(planning, options);
        Ok(current)
    }

    /// Applique `op` sur une copie fraîche, persiste, puis publie la copie.
    /// Le verrou du stockage couvre tout le cycle lecture, contrôle, écriture.
    fn write<T>(
        &self,
        op: impl FnOnce(&mut Scheduler) -> Result<T, SchedError>,
    ) -> Result<T, SchedError> {
        let mut current = self
            .state
            .lock()
            .map_err(|_| SchedError::Storage(anyhow!("planning lock poisoned")))?;
        let _guard = self.storage.acquire().map_err(SchedError::Storage)?;
        let planning = self.storage.load().map_err(SchedError::Storage)?;
        let mut staged = Scheduler::with_planning(planning, current.options());
        let out = op(&mut staged)?;
        if let Err(err) = self.storage.save(staged.planning()) {
            tracing::warn!(error = %err, "planning save failed, change discarded");
            return Err(SchedError::Storage(err));
        }
        *current = staged;
        Ok(out)
    }

    pub fn register_drivers(&self, drivers: Vec<Driver>) -> Result<(), SchedError> {
        self.write(|s| {
            s.register_drivers(drivers);
            Ok(())
        })
    }

    pub fn create(
        &self,
        candidate: NewAssignment,
        now: DateTime<Utc>,
    ) -> Result<StatusAssignment, SchedError> {
        self.write(|s| s.create(candidate, now))
    }

    pub fn update(
        &self,
        id: &AssignmentId,
        changes: AssignmentChanges,
    ) -> Result<StatusAssignment, SchedError> {
        self.write(|s| s.update(id, changes))
    }

    pub fn delete(&self, id: &AssignmentId) -> Result<StatusAssignment, SchedError> {
        self.write(|s| s.delete(id))
    }

    pub fn check_conflict(
        &self,
        driver: &DriverId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: StatusKind,
        exclude: Option<&AssignmentId>,
    ) -> Result<Vec<ConflictingAssignment>, SchedError> {
        self.lock()?.check_conflict(driver, start, end, status, exclude)
    }

    pub fn drivers(&self) -> Result<Vec<Driver>, SchedError> {
        Ok(self.lock()?.planning().drivers.clone())
    }

    pub fn assignment(&self, id: &AssignmentId) -> Result<StatusAssignment, SchedError> {
        self.lock()?
            .assignment(id)
            .cloned()
            .ok_or_else(|| SchedError::UnknownAssignment(id.as_str().to_string()))
    }

    pub fn assignments_by_driver(
        &self,
        driver: &DriverId,
    ) -> Result<Vec<StatusAssignment>, SchedError> {
        Ok(self.lock()?.assignments_by_driver(driver))
    }

    pub fn active_or_future(
        &self,
        driver: &DriverId,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<StatusAssignment>, SchedError> {
        Ok(self.lock()?.active_or_future(driver, as_of))
    }

    pub fn current_statuses(
        &self,
        driver: &DriverId,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<StatusAssignment>, SchedError> {
        Ok(self.lock()?.current_statuses(driver, as_of))
    }

    pub fn displayed_status(
        &self,
        driver: &DriverId,
        as_of: DateTime<Utc>,
    ) -> Result<DisplayedStatus, SchedError> {
        Ok(self.lock()?.displayed_status(driver, as_of))
    }

    pub fn planning_for_all_drivers(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<BTreeMap<DriverId, Vec<ScheduledAssignment>>, SchedError> {
        Ok(self.lock()?.planning_for_all_drivers(as_of))
    }

    /// Copie du planning courant (export, impression).
    pub fn snapshot(&self) -> Result<Scheduler, SchedError> {
        Ok(self.lock()?.clone())
    }
}
