// Núcleo del motor: validadores de prerequisitos, choques de horario y
// el planificador.
pub mod prerequisites;
pub mod conflict;
pub mod planner;

pub use prerequisites::{PrerequisiteValidator, PASSING_GRADE};
pub use conflict::{find_schedule_conflicts, partition_by_precedence, resolve_by_precedence, ConflictPair, PrecedenceResolution};
pub use planner::{EnrollmentPlanner, FinalizeSummary, PlanningPolicy, DEFAULT_FINAL_GRADE};
