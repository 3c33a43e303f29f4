use crate::model::{AssignmentId, StatusAssignment};
use chrono::{DateTime, Utc};

/// Intersection d'intervalles semi-ouverts `[s, e)` : des bornes qui se
/// touchent ne se chevauchent pas.
pub(super) fn intersects(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

/// Appartenance à l'intervalle fermé `[start, end]`.
pub(super) fn contains_instant(a: &StatusAssignment, at: DateTime<Utc>) -> bool {
    a.start <= at && at <= a.end
}

pub(super) fn find_assignment_index(
    assignments: &[StatusAssignment],
    id: &AssignmentId,
) -> Option<usize> {
    assignments.iter().position(|a| &a.id == id)
}
