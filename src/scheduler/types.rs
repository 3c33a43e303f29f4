use crate::model::{AssignmentId, Location, StatusAssignment, StatusKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Options du planificateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Relance la détection de chevauchement lors d'une modification.
    /// `false` reproduit l'ancien comportement (modification sans contrôle).
    pub revalidate_on_update: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            revalidate_on_update: true,
        }
    }
}

/// Affectation existante qui bloque une création ou une modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingAssignment {
    pub id: AssignmentId,
    pub status: StatusKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&StatusAssignment> for ConflictingAssignment {
    fn from(a: &StatusAssignment) -> Self {
        Self {
            id: a.id.clone(),
            status: a.status,
            start: a.start,
            end: a.end,
        }
    }
}

impl fmt::Display for ConflictingAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{} → {}]",
            self.id,
            self.status,
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}

/// Affectation enrichie pour l'impression du planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAssignment {
    #[serde(flatten)]
    pub assignment: StatusAssignment,
    pub duration_days: i64,
}

/// Statut affiché dans l'en-tête ; `Unspecified` quand rien n'est en cours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayedStatus {
    Unspecified,
    Active {
        status: StatusKind,
        location: Location,
    },
}

impl fmt::Display for DisplayedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayedStatus::Unspecified => f.write_str("UNSPECIFIED"),
            DisplayedStatus::Active { status, location } => write!(f, "{status} @ {location}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid time range: end ({end}) must be after start ({start})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("conflicts with {} existing assignment(s)", .0.len())]
    Conflict(Vec<ConflictingAssignment>),
    #[error("unknown driver: {0}")]
    UnknownDriver(String),
    #[error("unknown assignment: {0}")]
    UnknownAssignment(String),
    #[error("storage error: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl SchedError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchedError::UnknownDriver(_) | SchedError::UnknownAssignment(_)
        )
    }

    pub fn conflicts(&self) -> Option<&[ConflictingAssignment]> {
        match self {
            SchedError::Conflict(list) => Some(list),
            _ => None,
        }
    }
}
