// Tipos de error del planificador.
//
// Dos niveles: `EnrollmentError` se acumula dentro de un `Report` y nunca se
// propaga al llamador; `InvalidArgument` indica datos de catálogo mal
// construidos y se devuelve como `Err` desde los constructores.
use serde::Serialize;
use std::fmt::{self, Display};

/// Fallos esperables de una llamada de planificación (nivel reporte).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnrollmentError {
    MissingStudent,
    NoSectionsRequested,
    UnknownStudent { registration_id: String, suggestion: Option<String> },
    UnknownSubject { code: String, suggestion: Option<String> },
    UnknownSection { id: String, suggestion: Option<String> },
    /// Secciones que chocan en horario. En `plan` se emite una por sección
    /// rechazada; en `resolve_by_precedence` nombra todas las empatadas.
    ScheduleConflict { sections: Vec<String>, detail: String },
    PrerequisitesNotMet { section: Option<String>, subject: String, subject_name: String },
    CoRequisiteNotMet { section: String, subject: String, co_requisite: String },
    SectionFull { section: String, capacity: u32 },
    /// Otra sección de la misma asignatura ya fue aceptada en esta llamada.
    DuplicateSubject { section: String, subject: String, accepted_section: String },
    WeeklyHoursExceeded { section: Option<String>, requested: u32, limit: u32 },
    InvalidGrade { grade: f64 },
    MissingReport,
    ReportStudentMismatch { report_student: String, student: String },
}

impl EnrollmentError {
    /// Etiqueta corta del motivo, usada en los logs.
    pub fn reason(&self) -> &'static str {
        match self {
            EnrollmentError::MissingStudent => "missing student",
            EnrollmentError::NoSectionsRequested => "no sections requested",
            EnrollmentError::UnknownStudent { .. } => "unknown student",
            EnrollmentError::UnknownSubject { .. } => "unknown subject",
            EnrollmentError::UnknownSection { .. } => "unknown section",
            EnrollmentError::ScheduleConflict { .. } => "schedule conflict",
            EnrollmentError::PrerequisitesNotMet { .. } => "prerequisites not met",
            EnrollmentError::CoRequisiteNotMet { .. } => "co-requisite not met",
            EnrollmentError::SectionFull { .. } => "section full",
            EnrollmentError::DuplicateSubject { .. } => "subject already accepted in this request",
            EnrollmentError::WeeklyHoursExceeded { .. } => "weekly hour limit exceeded",
            EnrollmentError::InvalidGrade { .. } => "invalid grade",
            EnrollmentError::MissingReport => "missing report",
            EnrollmentError::ReportStudentMismatch { .. } => "report student mismatch",
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {}?)", s),
        None => String::new(),
    }
}

impl Display for EnrollmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentError::MissingStudent => write!(f, "student must be provided"),
            EnrollmentError::NoSectionsRequested => {
                write!(f, "at least one section must be requested for planning")
            }
            EnrollmentError::UnknownStudent { registration_id, suggestion } => write!(
                f,
                "student not found: {}{}",
                registration_id,
                suggestion_suffix(suggestion)
            ),
            EnrollmentError::UnknownSubject { code, suggestion } => {
                write!(f, "subject not found: {}{}", code, suggestion_suffix(suggestion))
            }
            EnrollmentError::UnknownSection { id, suggestion } => {
                write!(f, "section not found: {}{}", id, suggestion_suffix(suggestion))
            }
            EnrollmentError::ScheduleConflict { sections, detail } => {
                if sections.len() == 1 {
                    write!(f, "section {} rejected: schedule conflict ({})", sections[0], detail)
                } else {
                    write!(f, "schedule conflict between {}: {}", sections.join(", "), detail)
                }
            }
            EnrollmentError::PrerequisitesNotMet { section, subject, subject_name } => match section {
                Some(id) => write!(
                    f,
                    "section {} rejected: prerequisites not met for {} - {}",
                    id, subject, subject_name
                ),
                None => write!(f, "prerequisites not met for {} - {}", subject, subject_name),
            },
            EnrollmentError::CoRequisiteNotMet { section, subject, co_requisite } => write!(
                f,
                "section {} rejected: co-requisite not met, {} requires {} in the same term",
                section, subject, co_requisite
            ),
            EnrollmentError::SectionFull { section, capacity } => {
                write!(f, "section {} rejected: section full (capacity {})", section, capacity)
            }
            EnrollmentError::DuplicateSubject { section, subject, accepted_section } => write!(
                f,
                "section {} rejected: {} already accepted through section {}",
                section, subject, accepted_section
            ),
            EnrollmentError::WeeklyHoursExceeded { section, requested, limit } => match section {
                Some(id) => write!(
                    f,
                    "section {} rejected: weekly hour limit exceeded ({}h > {}h)",
                    id, requested, limit
                ),
                None => write!(f, "weekly hour limit exceeded ({}h > {}h)", requested, limit),
            },
            EnrollmentError::InvalidGrade { grade } => {
                write!(f, "grade must be between 0.0 and 10.0, got {}", grade)
            }
            EnrollmentError::MissingReport => write!(f, "report must be provided"),
            EnrollmentError::ReportStudentMismatch { report_student, student } => write!(
                f,
                "report belongs to student {} but finalization was requested for {}",
                report_student, student
            ),
        }
    }
}

impl std::error::Error for EnrollmentError {}

/// Argumentos inválidos al construir entidades del catálogo.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidArgument {
    DayOutOfRange(u8),
    /// start >= end o fuera de 0..=1440 minutos.
    InvalidInterval { start: u32, end: u32 },
    UnparseableSchedule(String),
    NonPositiveCapacity { section: String },
    NoSchedules { section: String },
    NonPositiveWeeklyHours { subject: String },
}

impl Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::DayOutOfRange(d) => {
                write!(f, "day of week must be 1-7 (1 = monday, 7 = sunday), got {}", d)
            }
            InvalidArgument::InvalidInterval { start, end } => write!(
                f,
                "invalid start/end minutes: {}-{} (need 0 <= start < end <= 1440)",
                start, end
            ),
            InvalidArgument::UnparseableSchedule(s) => write!(f, "cannot parse schedule '{}'", s),
            InvalidArgument::NonPositiveCapacity { section } => {
                write!(f, "section {}: capacity must be positive", section)
            }
            InvalidArgument::NoSchedules { section } => {
                write!(f, "section {}: at least one schedule is required", section)
            }
            InvalidArgument::NonPositiveWeeklyHours { subject } => {
                write!(f, "subject {}: weekly hours must be positive", subject)
            }
        }
    }
}

impl std::error::Error for InvalidArgument {}

/// Fallos al registrar o cargar el catálogo.
#[derive(Debug)]
pub enum CatalogError {
    DuplicateSubject(String),
    DuplicateSection(String),
    DuplicateStudent(String),
    /// Referencia a una asignatura que no está registrada (`owner` indica quién la cita).
    DanglingSubject { owner: String, code: String },
    InvalidEntity(InvalidArgument),
    InvalidGrade { student: String, subject: String, grade: f64 },
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateSubject(c) => write!(f, "subject {} registered twice", c),
            CatalogError::DuplicateSection(id) => write!(f, "section {} registered twice", id),
            CatalogError::DuplicateStudent(id) => write!(f, "student {} registered twice", id),
            CatalogError::DanglingSubject { owner, code } => {
                write!(f, "{} references unknown subject {}", owner, code)
            }
            CatalogError::InvalidEntity(e) => write!(f, "invalid catalog entity: {}", e),
            CatalogError::InvalidGrade { student, subject, grade } => write!(
                f,
                "student {}: grade {} for {} is outside 0.0-10.0",
                student, grade, subject
            ),
            CatalogError::Json(e) => write!(f, "invalid catalog JSON: {}", e),
            CatalogError::Io(e) => write!(f, "cannot read catalog: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::InvalidEntity(e) => Some(e),
            CatalogError::Json(e) => Some(e),
            CatalogError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidArgument> for CatalogError {
    fn from(e: InvalidArgument) -> Self {
        CatalogError::InvalidEntity(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Json(e)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_menciona_seccion_y_motivo() {
        let e = EnrollmentError::SectionFull { section: "MAT154-01".to_string(), capacity: 1 };
        let msg = e.to_string();
        assert!(msg.contains("MAT154-01"));
        assert!(msg.contains("full"));
        assert_eq!(e.reason(), "section full");

        let e = EnrollmentError::DuplicateSubject {
            section: "MAT154-02".to_string(),
            subject: "MAT154".to_string(),
            accepted_section: "MAT154-01".to_string(),
        };
        assert_eq!(e.to_string(), "section MAT154-02 rejected: MAT154 already accepted through section MAT154-01");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "duplicate_subject");
    }

    #[test]
    fn test_sugerencia_en_mensaje() {
        let e = EnrollmentError::UnknownSection {
            id: "MAT15-01".to_string(),
            suggestion: Some("MAT154-01".to_string()),
        };
        assert_eq!(e.to_string(), "section not found: MAT15-01 (did you mean MAT154-01?)");
    }
}
