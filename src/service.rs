// Fachada sobre catálogo + planificador.
//
// Traduce ids (matrícula, código, sección) a entidades del catálogo y
// convierte cada id desconocido en un error dentro del reporte. Guarda el
// último reporte de planificación por estudiante para poder finalizarlo.
use crate::algorithm::conflict::resolve_by_precedence;
use crate::algorithm::planner::{EnrollmentPlanner, FinalizeSummary, PlanningPolicy, DEFAULT_FINAL_GRADE};
use crate::catalog::Catalog;
use crate::errors::EnrollmentError;
use crate::models::{ClassGroup, Report};
use log::{info, warn};
use std::collections::HashMap;

#[derive(Debug)]
pub struct EnrollmentService {
    catalog: Catalog,
    planner: EnrollmentPlanner,
    default_grade: f64,
    last_reports: HashMap<String, Report>,
}

impl EnrollmentService {
    pub fn new(catalog: Catalog, planner: EnrollmentPlanner) -> Self {
        EnrollmentService { catalog, planner, default_grade: DEFAULT_FINAL_GRADE, last_reports: HashMap::new() }
    }

    /// Nota usada por `finalize_last_plan` cuando no se indica ninguna.
    pub fn with_default_grade(mut self, grade: f64) -> Self {
        self.default_grade = grade;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> PlanningPolicy {
        self.planner.policy()
    }

    pub fn last_report(&self, registration_id: &str) -> Option<&Report> {
        self.last_reports.get(registration_id)
    }

    fn unknown_student(&self, registration_id: &str) -> EnrollmentError {
        EnrollmentError::UnknownStudent {
            registration_id: registration_id.to_string(),
            suggestion: self.catalog.suggest_student(registration_id),
        }
    }

    /// Planifica con la política configurada.
    pub fn process_enrollment(&mut self, registration_id: &str, section_ids: &[String]) -> Report {
        self.process_enrollment_with(registration_id, section_ids, None)
    }

    /// Planifica `section_ids` para el estudiante; `policy` sustituye la
    /// política del servicio sólo para esta llamada.
    pub fn process_enrollment_with(
        &mut self,
        registration_id: &str,
        section_ids: &[String],
        policy: Option<PlanningPolicy>,
    ) -> Report {
        if self.catalog.student(registration_id).is_none() {
            warn!("planificación para estudiante desconocido {}", registration_id);
            return Report::failed(None, self.unknown_student(registration_id));
        }
        let planner = match policy {
            Some(p) => EnrollmentPlanner::new(p),
            None => self.planner.clone(),
        };

        let (mut report, missing) = {
            let (student, sections, missing) = self.catalog.student_and_sections_mut(registration_id, section_ids);
            let report = if sections.is_empty() && !missing.is_empty() {
                // todas las secciones pedidas son desconocidas
                Report::new(student.as_deref())
            } else {
                planner.plan(student, sections)
            };
            (report, missing)
        };
        for id in missing {
            let suggestion = self.catalog.suggest_section(&id);
            report.add_error(EnrollmentError::UnknownSection { id, suggestion });
        }

        self.last_reports.insert(registration_id.to_string(), report.clone());
        report
    }

    pub fn check_eligibility(&self, registration_id: &str, subject_code: &str) -> Report {
        let student = match self.catalog.student(registration_id) {
            Some(s) => s,
            None => return Report::failed(None, self.unknown_student(registration_id)),
        };
        match self.catalog.subject(subject_code) {
            Some(subject) => self.planner.check_eligibility(Some(student), Some(subject)),
            None => Report::failed(
                Some(student),
                EnrollmentError::UnknownSubject {
                    code: subject_code.to_string(),
                    suggestion: self.catalog.suggest_subject(subject_code),
                },
            ),
        }
    }

    pub fn student_report(&self, registration_id: &str) -> Report {
        match self.catalog.student(registration_id) {
            Some(s) => self.planner.summarize(s),
            None => Report::failed(None, self.unknown_student(registration_id)),
        }
    }

    /// Finaliza el último reporte de planificación del estudiante.
    pub fn finalize_last_plan(
        &mut self,
        registration_id: &str,
        grade: Option<f64>,
    ) -> Result<FinalizeSummary, EnrollmentError> {
        if self.catalog.student(registration_id).is_none() {
            return Err(self.unknown_student(registration_id));
        }
        let grade = grade.unwrap_or(self.default_grade);
        let report = self.last_reports.get(registration_id);
        let student = self
            .catalog
            .student_mut(registration_id)
            .ok_or(EnrollmentError::MissingStudent)?;
        let summary = self.planner.finalize_planning(report, student, grade)?;
        info!("finalizado el último plan de {}", registration_id);
        Ok(summary)
    }

    pub fn sections_for_subject(&self, subject_code: &str) -> Result<Vec<&ClassGroup>, EnrollmentError> {
        if self.catalog.subject(subject_code).is_none() {
            return Err(EnrollmentError::UnknownSubject {
                code: subject_code.to_string(),
                suggestion: self.catalog.suggest_subject(subject_code),
            });
        }
        Ok(self.catalog.sections_for_subject(subject_code))
    }

    /// Resolución por precedencia sobre ids del catálogo; devuelve los ids
    /// que sobreviven en el orden de entrada.
    pub fn resolve(&self, section_ids: &[String]) -> Result<Vec<String>, EnrollmentError> {
        let mut sections: Vec<&ClassGroup> = Vec::new();
        for id in section_ids {
            match self.catalog.section(id) {
                Some(s) => sections.push(s),
                None => {
                    return Err(EnrollmentError::UnknownSection {
                        id: id.clone(),
                        suggestion: self.catalog.suggest_section(id),
                    });
                }
            }
        }
        let kept = resolve_by_precedence(&sections)?;
        Ok(kept.iter().map(|s| s.id().to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Schedule, Student, Subject, SubjectKind};

    fn service() -> EnrollmentService {
        let mut c = Catalog::new();
        let calc = c
            .register_subject(Subject::new("MAT154", "Cálculo I", 4, SubjectKind::Required).unwrap())
            .unwrap();
        c.register_section(
            ClassGroup::new("MAT154-01", calc, 30, vec![Schedule::parse("MO 08:00-10:00").unwrap()]).unwrap(),
        )
        .unwrap();
        c.register_student(Student::new("Ana", "2024A", 20)).unwrap();
        EnrollmentService::new(c, EnrollmentPlanner::default())
    }

    #[test]
    fn test_ids_desconocidos_en_reporte() {
        let mut svc = service();
        let r = svc.process_enrollment("2024B", &["MAT154-01".to_string()]);
        assert!(!r.is_success());
        assert!(matches!(
            &r.errors()[0],
            EnrollmentError::UnknownStudent { suggestion: Some(s), .. } if s == "2024A"
        ));

        let r = svc.process_enrollment("2024A", &["MAT154-1".to_string()]);
        assert!(!r.is_success());
        assert_eq!(r.error_messages(), vec!["section not found: MAT154-1 (did you mean MAT154-01?)".to_string()]);
    }

    #[test]
    fn test_finalizar_sin_plan_previo() {
        let mut svc = service();
        assert_eq!(svc.finalize_last_plan("2024A", None), Err(EnrollmentError::MissingReport));
        let r = svc.process_enrollment("2024A", &["MAT154-01".to_string()]);
        assert!(r.is_success());
        let summary = svc.finalize_last_plan("2024A", None).unwrap();
        assert_eq!(summary.recorded, vec!["MAT154".to_string()]);
        assert_eq!(svc.catalog().student("2024A").unwrap().grade("MAT154"), Some(DEFAULT_FINAL_GRADE));
    }
}
