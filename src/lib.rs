#![forbid(unsafe_code)]
//! Planning chauffeurs — affectation de statuts datés (congé, permanence,
//! service week-end, service semaine) avec règles de chevauchement asymétriques.
//!
//! - Un congé ne chevauche aucune autre affectation du même chauffeur.
//! - Les autres statuts peuvent se chevaucher entre eux.
//! - Tout en UTC ; l'instant de référence est toujours fourni par l'appelant.
//! - Stockage fichier JSON, écritures atomiques.

pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod store;

pub use model::{
    AssignmentChanges, AssignmentId, Driver, DriverId, Location, NewAssignment, Planning,
    StatusAssignment, StatusKind, UnknownVariant,
};
pub use scheduler::{
    ConflictingAssignment, DisplayedStatus, SchedError, ScheduledAssignment, Scheduler,
    SchedulerOptions,
};
pub use storage::{JsonStorage, MemoryStorage, Storage, StorageLock};
pub use store::AssignmentStore;
