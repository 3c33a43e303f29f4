use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour Driver (attribué par la gestion des utilisateurs)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverId(String);

impl DriverId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chauffeur, référencé uniquement par identifiant ; jamais modifié ici.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
}

impl Driver {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: DriverId::new(id),
            name: name.into(),
        }
    }
}

/// Identifiant fort pour StatusAssignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Valeur hors de l'énumération fermée (statut ou lieu).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Nature d'un statut. `Leave` est le seul statut exclusif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    Leave,
    OnCall,
    WeekendService,
    WeekdayService,
}

impl StatusKind {
    pub const ALL: [StatusKind; 4] = [
        StatusKind::Leave,
        StatusKind::OnCall,
        StatusKind::WeekendService,
        StatusKind::WeekdayService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Leave => "LEAVE",
            StatusKind::OnCall => "ON_CALL",
            StatusKind::WeekendService => "WEEKEND_SERVICE",
            StatusKind::WeekdayService => "WEEKDAY_SERVICE",
        }
    }

    pub fn is_leave(self) -> bool {
        self == StatusKind::Leave
    }

    /// Rang d'affichage quand plusieurs statuts sont actifs au même instant
    /// (0 = prioritaire).
    pub fn display_rank(self) -> u8 {
        match self {
            StatusKind::Leave => 0,
            StatusKind::OnCall => 1,
            StatusKind::WeekendService => 2,
            StatusKind::WeekdayService => 3,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Lieu d'affectation ; `SiteA` par défaut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    #[default]
    SiteA,
    SiteB,
    Both,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::SiteA, Location::SiteB, Location::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::SiteA => "SITE_A",
            Location::SiteB => "SITE_B",
            Location::Both => "BOTH",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "location",
                value: s.to_string(),
            })
    }
}

/// Affectation d'un statut à un chauffeur sur `[start, end]` (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAssignment {
    pub id: AssignmentId,
    pub driver_id: DriverId,
    pub status: StatusKind,
    #[serde(default)]
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StatusAssignment {
    /// Durée affichée en jours, bornes incluses (un créneau dans la journée vaut 1).
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Demande de création d'une affectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub driver_id: DriverId,
    pub status: StatusKind,
    #[serde(default)]
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Nouvelles valeurs d'une affectation existante (remplacement complet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentChanges {
    pub status: StatusKind,
    #[serde(default)]
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Document persisté : registre des chauffeurs + affectations.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Planning {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub assignments: Vec<StatusAssignment>,
}

impl Planning {
    pub fn find_driver(&self, id: &DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|d| &d.id == id)
    }
    pub fn find_assignment(&self, id: &AssignmentId) -> Option<&StatusAssignment> {
        self.assignments.iter().find(|a| &a.id == id)
    }
    pub fn assignments_of<'a>(
        &'a self,
        driver: &'a DriverId,
    ) -> impl Iterator<Item = &'a StatusAssignment> + 'a {
        self.assignments.iter().filter(move |a| &a.driver_id == driver)
    }
}
