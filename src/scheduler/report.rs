use super::{ScheduledAssignment, Scheduler};
use crate::model::{DriverId, StatusAssignment};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Affectations terminées à `as_of` ou plus tard, triées par début.
pub(super) fn active_or_future(
    scheduler: &Scheduler,
    driver: &DriverId,
    as_of: DateTime<Utc>,
) -> Vec<StatusAssignment> {
    let mut out: Vec<StatusAssignment> = scheduler
        .planning
        .assignments_of(driver)
        .filter(|a| a.end >= as_of)
        .cloned()
        .collect();
    out.sort_by_key(|a| a.start);
    out
}

pub(super) fn planning_for_all_drivers(
    scheduler: &Scheduler,
    as_of: DateTime<Utc>,
) -> BTreeMap<DriverId, Vec<ScheduledAssignment>> {
    scheduler
        .planning
        .drivers
        .iter()
        .map(|driver| {
            let rows = active_or_future(scheduler, &driver.id, as_of)
                .into_iter()
                .map(|assignment| ScheduledAssignment {
                    duration_days: assignment.duration_days(),
                    assignment,
                })
                .collect();
            (driver.id.clone(), rows)
        })
        .collect()
}
