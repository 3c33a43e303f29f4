mod conflicts;
mod mutate;
mod report;
mod status;
mod types;
mod util;

pub use types::{
    ConflictingAssignment, DisplayedStatus, SchedError, ScheduledAssignment, SchedulerOptions,
};

use crate::model::{
    AssignmentChanges, AssignmentId, Driver, DriverId, NewAssignment, Planning,
    StatusAssignment, StatusKind,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Scheduler : encapsule un Planning et applique les règles de chevauchement.
///
/// Aucune lecture d'horloge : `now` et `as_of` sont toujours fournis par l'appelant.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    planning: Planning,
    options: SchedulerOptions,
}

impl Scheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self {
            planning: Planning::default(),
            options,
        }
    }

    pub fn with_planning(planning: Planning, options: SchedulerOptions) -> Self {
        Self { planning, options }
    }

    pub fn planning(&self) -> &Planning {
        &self.planning
    }
    pub fn into_planning(self) -> Planning {
        self.planning
    }
    pub fn options(&self) -> SchedulerOptions {
        self.options
    }

    pub fn register_drivers(&mut self, drivers: Vec<Driver>) {
        mutate::register_drivers(self, drivers)
    }

    /// Vérifie une affectation candidate sans rien modifier.
    /// Une liste vide signifie que la candidate est admissible.
    pub fn check_conflict(
        &self,
        driver: &DriverId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: StatusKind,
        exclude: Option<&AssignmentId>,
    ) -> Result<Vec<ConflictingAssignment>, SchedError> {
        conflicts::check_conflict(self, driver, start, end, status, exclude)
    }

    pub fn create(
        &mut self,
        candidate: NewAssignment,
        now: DateTime<Utc>,
    ) -> Result<StatusAssignment, SchedError> {
        mutate::create(self, candidate, now)
    }

    pub fn update(
        &mut self,
        id: &AssignmentId,
        changes: AssignmentChanges,
    ) -> Result<StatusAssignment, SchedError> {
        mutate::update(self, id, changes)
    }

    pub fn delete(&mut self, id: &AssignmentId) -> Result<StatusAssignment, SchedError> {
        mutate::delete(self, id)
    }

    pub fn assignment(&self, id: &AssignmentId) -> Option<&StatusAssignment> {
        self.planning.find_assignment(id)
    }

    pub fn assignments_by_driver(&self, driver: &DriverId) -> Vec<StatusAssignment> {
        self.planning.assignments_of(driver).cloned().collect()
    }

    pub fn active_or_future(
        &self,
        driver: &DriverId,
        as_of: DateTime<Utc>,
    ) -> Vec<StatusAssignment> {
        report::active_or_future(self, driver, as_of)
    }

    pub fn current_statuses(
        &self,
        driver: &DriverId,
        as_of: DateTime<Utc>,
    ) -> Vec<StatusAssignment> {
        status::current_statuses(self, driver, as_of)
    }

    pub fn displayed_status(&self, driver: &DriverId, as_of: DateTime<Utc>) -> DisplayedStatus {
        status::displayed_status(self, driver, as_of)
    }

    pub fn planning_for_all_drivers(
        &self,
        as_of: DateTime<Utc>,
    ) -> BTreeMap<DriverId, Vec<ScheduledAssignment>> {
        report::planning_for_all_drivers(self, as_of)
    }
}
