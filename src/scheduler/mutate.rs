use super::{conflicts, util, SchedError, Scheduler};
use crate::model::{
    AssignmentChanges, AssignmentId, Driver, NewAssignment, StatusAssignment,
};
use chrono::{DateTime, Utc};

pub(super) fn create(
    scheduler: &mut Scheduler,
    candidate: NewAssignment,
    now: DateTime<Utc>,
) -> Result<StatusAssignment, SchedError> {
    if candidate.end <= candidate.start {
        return Err(SchedError::InvalidRange {
            start: candidate.start,
            end: candidate.end,
        });
    }
    if scheduler.planning.find_driver(&candidate.driver_id).is_none() {
        return Err(SchedError::UnknownDriver(
            candidate.driver_id.as_str().to_string(),
        ));
    }

    let conflicts = conflicts::check_conflict(
        scheduler,
        &candidate.driver_id,
        candidate.start,
        candidate.end,
        candidate.status,
        None,
    )?;
    if !conflicts.is_empty() {
        tracing::info!(
            driver = %candidate.driver_id,
            status = %candidate.status,
            conflicts = conflicts.len(),
            "assignment rejected"
        );
        return Err(SchedError::Conflict(conflicts));
    }

    let assignment = StatusAssignment {
        id: AssignmentId::random(),
        driver_id: candidate.driver_id,
        status: candidate.status,
        location: candidate.location,
        start: candidate.start,
        end: candidate.end,
        created_at: now,
    };
    tracing::debug!(id = %assignment.id, driver = %assignment.driver_id, "assignment created");
    scheduler.planning.assignments.push(assignment.clone());
    Ok(assignment)
}

pub(super) fn update(
    scheduler: &mut Scheduler,
    id: &AssignmentId,
    changes: AssignmentChanges,
) -> Result<StatusAssignment, SchedError> {
    let Some(pos) = util::find_assignment_index(&scheduler.planning.assignments, id) else {
        return Err(SchedError::UnknownAssignment(id.as_str().to_string()));
    };
    if changes.end <= changes.start {
        return Err(SchedError::InvalidRange {
            start: changes.start,
            end: changes.end,
        });
    }

    if scheduler.options.revalidate_on_update {
        let driver = scheduler.planning.assignments[pos].driver_id.clone();
        let conflicts = conflicts::check_conflict(
            scheduler,
            &driver,
            changes.start,
            changes.end,
            changes.status,
            Some(id),
        )?;
        if !conflicts.is_empty() {
            tracing::info!(%id, conflicts = conflicts.len(), "update rejected");
            return Err(SchedError::Conflict(conflicts));
        }
    }

    let target = &mut scheduler.planning.assignments[pos];
    target.status = changes.status;
    target.location = changes.location;
    target.start = changes.start;
    target.end = changes.end;
    tracing::debug!(%id, "assignment updated");
    Ok(target.clone())
}

pub(super) fn delete(
    scheduler: &mut Scheduler,
    id: &AssignmentId,
) -> Result<StatusAssignment, SchedError> {
    let Some(pos) = util::find_assignment_index(&scheduler.planning.assignments, id) else {
        return Err(SchedError::UnknownAssignment(id.as_str().to_string()));
    };
    let removed = scheduler.planning.assignments.remove(pos);
    tracing::debug!(%id, "assignment deleted");
    Ok(removed)
}

/// Ajoute les chauffeurs inconnus et renomme ceux déjà enregistrés.
pub(super) fn register_drivers(scheduler: &mut Scheduler, drivers: Vec<Driver>) {
    for driver in drivers {
        match scheduler
            .planning
            .drivers
            .iter_mut()
            .find(|d| d.id == driver.id)
        {
            Some(existing) => existing.name = driver.name,
            None => scheduler.planning.drivers.push(driver),
        }
    }
}
