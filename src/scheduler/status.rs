use super::{util, DisplayedStatus, Scheduler};
use crate::model::{DriverId, StatusAssignment};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

/// Statuts dont l'intervalle fermé contient `as_of`, le statut affiché en tête.
///
/// Ordre : priorité du statut, puis création la plus récente, puis début, puis id.
pub(super) fn current_statuses(
    scheduler: &Scheduler,
    driver: &DriverId,
    as_of: DateTime<Utc>,
) -> Vec<StatusAssignment> {
    let mut current: Vec<StatusAssignment> = scheduler
        .planning
        .assignments_of(driver)
        .filter(|a| util::contains_instant(a, as_of))
        .cloned()
        .collect();
    current.sort_by(|a, b| {
        (a.status.display_rank(), Reverse(a.created_at), a.start, a.id.as_str()).cmp(&(
            b.status.display_rank(),
            Reverse(b.created_at),
            b.start,
            b.id.as_str(),
        ))
    });
    current
}

pub(super) fn displayed_status(
    scheduler: &Scheduler,
    driver: &DriverId,
    as_of: DateTime<Utc>,
) -> DisplayedStatus {
    current_statuses(scheduler, driver, as_of)
        .first()
        .map_or(DisplayedStatus::Unspecified, |a| DisplayedStatus::Active {
            status: a.status,
            location: a.location,
        })
}
