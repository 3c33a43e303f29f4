use super::{util, ConflictingAssignment, SchedError, Scheduler};
use crate::model::{AssignmentId, DriverId, StatusAssignment, StatusKind};
use chrono::{DateTime, Utc};

/// Règle asymétrique : un congé ne chevauche rien, les autres statuts ne
/// chevauchent qu'un congé.
pub(super) fn check_conflict(
    scheduler: &Scheduler,
    driver: &DriverId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: StatusKind,
    exclude: Option<&AssignmentId>,
) -> Result<Vec<ConflictingAssignment>, SchedError> {
    if end <= start {
        return Err(SchedError::InvalidRange { start, end });
    }

    let mut hits: Vec<&StatusAssignment> = scheduler
        .planning
        .assignments_of(driver)
        .filter(|a| exclude != Some(&a.id))
        .filter(|a| util::intersects(a.start, a.end, start, end))
        .filter(|a| status.is_leave() || a.status.is_leave())
        .collect();
    hits.sort_by_key(|a| a.start);

    Ok(hits.into_iter().map(ConflictingAssignment::from).collect())
}
