// Orquestador de la planificación de matrícula.
//
// Por cada sección candidata se evalúa, en este orden fijo:
//   cupo -> conflicto de horario -> prerequisitos -> co-requisitos
//   -> asignatura repetida en la llamada -> tope semanal
// y se registra sólo el primer motivo de rechazo. Cada sección suma las horas
// de su asignatura aunque ésta ya esté en la planificación futura.
use crate::algorithm::conflict::{find_schedule_conflicts, partition_by_precedence};
use crate::errors::EnrollmentError;
use crate::models::{ClassGroup, Report, SectionOutcome, Student, Subject};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Nota con la que `finalize_planning` registra las secciones si no se indica otra.
pub const DEFAULT_FINAL_GRADE: f64 = 7.0;

/// Cómo trata `plan` las secciones que chocan entre sí.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanningPolicy {
    /// Ambas secciones de cada par en conflicto se rechazan.
    #[default]
    RejectBoth,
    /// Secciones con la misma franja exacta se resuelven por precedencia de
    /// tipo; el resto de solapamientos rechaza ambos lados.
    #[serde(alias = "precedence")]
    ResolveByPrecedence,
}

impl FromStr for PlanningPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject-both" | "reject_both" => Ok(PlanningPolicy::RejectBoth),
            "precedence" | "resolve-by-precedence" | "resolve_by_precedence" => {
                Ok(PlanningPolicy::ResolveByPrecedence)
            }
            other => Err(format!("unknown planning policy '{}'", other)),
        }
    }
}

/// Resultado de `finalize_planning`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalizeSummary {
    /// Códigos incorporados al historial con la nota indicada.
    pub recorded: Vec<String>,
    /// (código, nota existente) de las que ya estaban en el historial.
    pub already_completed: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentPlanner {
    policy: PlanningPolicy,
}

impl EnrollmentPlanner {
    pub fn new(policy: PlanningPolicy) -> Self {
        EnrollmentPlanner { policy }
    }

    pub fn policy(&self) -> PlanningPolicy {
        self.policy
    }

    /// Planifica las secciones deseadas para el estudiante. Las secciones
    /// aceptadas se añaden a la planificación futura del estudiante y a la
    /// lista de inscritos de la sección.
    pub fn plan(&self, student: Option<&mut Student>, desired: Vec<&mut ClassGroup>) -> Report {
        let student = match student {
            Some(s) => s,
            None => return Report::failed(None, EnrollmentError::MissingStudent),
        };
        if desired.is_empty() {
            return Report::failed(Some(&*student), EnrollmentError::NoSectionsRequested);
        }

        let mut report = Report::new(Some(&*student));
        info!(
            "planificando {} secciones para {} (política {:?})",
            desired.len(),
            student.registration_id(),
            self.policy
        );

        let (conflicts, desired_codes) = {
            let views: Vec<&ClassGroup> = desired.iter().map(|s| &**s).collect();
            let codes: HashSet<String> = views.iter().map(|s| s.subject().code().to_string()).collect();
            (self.conflict_rejections(&views, &mut report), codes)
        };

        let mut running_hours = student.future_planning_weekly_hours();
        // asignatura -> sección aceptada en esta llamada
        let mut accepted_subjects: HashMap<String, String> = HashMap::new();
        for section in desired.into_iter() {
            let subject = section.subject().clone();
            let id = section.id().to_string();

            if let Some(grade) = student.grade(subject.code()) {
                report.add_warning(format!(
                    "student already completed {} - {} (grade: {})",
                    subject.code(),
                    subject.name(),
                    grade
                ));
            }
            if student.is_planned(subject.code()) {
                report.add_warning(format!("{} is already in the future planning", subject.code()));
            }

            let requested = running_hours + subject.weekly_hours();
            let rejection = if !section.has_available_slots() && !section.is_student_enrolled(student.registration_id()) {
                Some((
                    SectionOutcome::RejectedFull,
                    EnrollmentError::SectionFull { section: id.clone(), capacity: section.capacity() },
                ))
            } else if let Some(detail) = conflicts.get(&id) {
                Some((
                    SectionOutcome::RejectedConflict,
                    EnrollmentError::ScheduleConflict { sections: vec![id.clone()], detail: detail.clone() },
                ))
            } else if !subject.requisites_met(student) {
                Some((
                    SectionOutcome::RejectedPrereq,
                    EnrollmentError::PrerequisitesNotMet {
                        section: Some(id.clone()),
                        subject: subject.code().to_string(),
                        subject_name: subject.name().to_string(),
                    },
                ))
            } else if let Some(co) = unmet_co_requisite(student, &subject, &desired_codes) {
                Some((
                    SectionOutcome::RejectedCoRequisite,
                    EnrollmentError::CoRequisiteNotMet {
                        section: id.clone(),
                        subject: subject.code().to_string(),
                        co_requisite: co,
                    },
                ))
            } else if let Some(first) = accepted_subjects.get(subject.code()) {
                Some((
                    SectionOutcome::RejectedDuplicate,
                    EnrollmentError::DuplicateSubject {
                        section: id.clone(),
                        subject: subject.code().to_string(),
                        accepted_section: first.clone(),
                    },
                ))
            } else if requested > student.max_weekly_hours() {
                Some((
                    SectionOutcome::RejectedHours,
                    EnrollmentError::WeeklyHoursExceeded {
                        section: Some(id.clone()),
                        requested,
                        limit: student.max_weekly_hours(),
                    },
                ))
            } else {
                None
            };

            let rejection = rejection.or_else(|| accept(student, section, &mut report).err());
            match rejection {
                None => {
                    running_hours = requested;
                    accepted_subjects.insert(subject.code().to_string(), id.clone());
                    report.record_outcome(&id, SectionOutcome::Accepted);
                    debug!("sección {} aceptada ({}h acumuladas)", id, running_hours);
                }
                Some((outcome, err)) => {
                    debug!("sección {} rechazada: {}", id, err.reason());
                    report.record_outcome(&id, outcome);
                    report.add_error(err);
                }
            }
        }

        let success = !report.planned_sections().is_empty();
        report.set_success(success);
        info!(
            "planificación de {}: {} aceptadas, {} errores",
            student.registration_id(),
            report.planned_sections().len(),
            report.errors().len()
        );
        report
    }

    /// Devuelve sección -> detalle del conflicto para las secciones que
    /// deben rechazarse en el paso 1, según la política.
    fn conflict_rejections(&self, sections: &[&ClassGroup], report: &mut Report) -> HashMap<String, String> {
        let mut out: HashMap<String, String> = HashMap::new();
        let remaining: Vec<&ClassGroup> = match self.policy {
            PlanningPolicy::RejectBoth => sections.to_vec(),
            PlanningPolicy::ResolveByPrecedence => {
                let res = partition_by_precedence(sections);
                for (loser, winner) in res.displaced.iter() {
                    report.add_info(format!(
                        "{} ({}) displaced by {} ({}) on precedence",
                        loser.id(),
                        loser.subject().kind().label(),
                        winner.id(),
                        winner.subject().kind().label()
                    ));
                    out.entry(loser.id().to_string()).or_insert_with(|| {
                        format!("same slot as higher-precedence section {}", winner.id())
                    });
                }
                for tie in res.ties.iter() {
                    for s in tie.iter() {
                        let others: Vec<&str> = tie.iter().map(|t| t.id()).filter(|t| *t != s.id()).collect();
                        out.entry(s.id().to_string()).or_insert_with(|| {
                            format!("same slot and same precedence as {}", others.join(", "))
                        });
                    }
                }
                res.kept
            }
        };

        for pair in find_schedule_conflicts(&remaining) {
            report.add_info(format!("schedule conflict: {}", pair.describe()));
            for id in [&pair.first, &pair.second] {
                let other = pair.other(id).unwrap_or_default();
                out.entry(id.clone()).or_insert_with(|| format!("conflicts with {}", other));
            }
        }
        out
    }

    /// Consulta de sólo lectura: prerequisitos y viabilidad horaria de una
    /// asignatura, sin elegir sección (no revisa choques ni cupo).
    pub fn check_eligibility(&self, student: Option<&Student>, subject: Option<&Subject>) -> Report {
        let student = match student {
            Some(s) => s,
            None => return Report::failed(None, EnrollmentError::MissingStudent),
        };
        let subject = match subject {
            Some(s) => s,
            None => {
                return Report::failed(
                    Some(student),
                    EnrollmentError::UnknownSubject { code: String::new(), suggestion: None },
                );
            }
        };

        let mut report = Report::new(Some(student));
        report.add_info(format!("checking eligibility for {} - {}", subject.code(), subject.name()));

        if let Some(grade) = student.grade(subject.code()) {
            report.add_warning(format!("student already completed this subject with grade {}", grade));
        }
        if student.is_planned(subject.code()) {
            report.add_warning("subject is already in the future planning");
        }
        if !subject.requisites_met(student) {
            report.add_error(EnrollmentError::PrerequisitesNotMet {
                section: None,
                subject: subject.code().to_string(),
                subject_name: subject.name().to_string(),
            });
        }
        for co in subject.co_requisites() {
            if !student.has_completed(co) && !student.is_planned(co) {
                report.add_warning(format!("{} must be taken in the same term as {}", co, subject.code()));
            }
        }

        // misma regla que `plan`: las horas de la asignatura se suman siempre
        let planned = student.future_planning_weekly_hours();
        let requested = planned + subject.weekly_hours();
        report.add_info(format!("planned weekly hours: {}h", planned));
        report.add_info(format!("subject weekly hours: {}h", subject.weekly_hours()));
        report.add_info(format!("remaining weekly hours: {}h", student.remaining_weekly_hours()));
        if requested > student.max_weekly_hours() {
            report.add_error(EnrollmentError::WeeklyHoursExceeded {
                section: None,
                requested,
                limit: student.max_weekly_hours(),
            });
        }

        let success = !report.has_errors();
        report.set_success(success);
        report
    }

    /// Convierte las secciones planificadas del reporte en historial con
    /// `grade` y las quita de la planificación futura. Las ya cursadas no
    /// cambian de nota.
    pub fn finalize_planning(
        &self,
        report: Option<&Report>,
        student: &mut Student,
        grade: f64,
    ) -> Result<FinalizeSummary, EnrollmentError> {
        let report = report.ok_or(EnrollmentError::MissingReport)?;
        if !(0.0..=10.0).contains(&grade) {
            return Err(EnrollmentError::InvalidGrade { grade });
        }
        if let Some(owner) = report.student() {
            if owner.registration_id != student.registration_id() {
                return Err(EnrollmentError::ReportStudentMismatch {
                    report_student: owner.registration_id.clone(),
                    student: student.registration_id().to_string(),
                });
            }
        }

        let mut summary = FinalizeSummary::default();
        for section in report.planned_sections() {
            let subject = section.subject();
            match student.grade(subject.code()) {
                Some(existing) => {
                    info!("{} ya estaba en el historial (nota {})", subject.code(), existing);
                    summary.already_completed.push((subject.code().to_string(), existing));
                }
                None => {
                    student.add_completed_subject(subject.clone(), grade);
                    info!("{} añadida al historial con nota {}", subject.code(), grade);
                    summary.recorded.push(subject.code().to_string());
                }
            }
            student.remove_from_future_planning(subject.code());
        }
        info!(
            "simulación finalizada para {}: {} nuevas, {} ya cursadas",
            student.registration_id(),
            summary.recorded.len(),
            summary.already_completed.len()
        );
        Ok(summary)
    }

    /// Resumen del estado académico del estudiante.
    pub fn summarize(&self, student: &Student) -> Report {
        let mut report = Report::new(Some(student));
        report.add_info(format!("student: {}", student.name()));
        report.add_info(format!("registration: {}", student.registration_id()));
        report.add_info(format!("weekly hour limit: {}h", student.max_weekly_hours()));
        report.add_info(format!("completed subjects: {}", student.completed_subjects().len()));
        for (code, c) in student.completed_subjects() {
            report.add_info(format!("  {} - grade: {}", code, c.grade));
        }
        let planned: Vec<_> = student.future_planning().collect();
        report.add_info(format!("planned subjects: {}", planned.len()));
        for s in planned {
            report.add_info(format!("  {}", s));
        }
        report.add_info(format!("accumulated credits: {}", student.credits_from_history()));
        report.add_info(format!("planned weekly hours: {}h", student.future_planning_weekly_hours()));
        report.add_info(format!("remaining weekly hours: {}h", student.remaining_weekly_hours()));
        report.set_success(true);
        report
    }
}

fn unmet_co_requisite(student: &Student, subject: &Subject, desired_codes: &HashSet<String>) -> Option<String> {
    subject
        .co_requisites()
        .iter()
        .find(|co| !student.has_completed(co) && !student.is_planned(co) && !desired_codes.contains(*co))
        .cloned()
}

/// Camino de aceptación: planificación futura + inscripción en la sección.
fn accept(
    student: &mut Student,
    section: &mut ClassGroup,
    report: &mut Report,
) -> Result<(), (SectionOutcome, EnrollmentError)> {
    let subject = section.subject().clone();
    student.add_to_future_planning(subject).map_err(|e| match e {
        EnrollmentError::WeeklyHoursExceeded { requested, limit, .. } => (
            SectionOutcome::RejectedHours,
            EnrollmentError::WeeklyHoursExceeded { section: Some(section.id().to_string()), requested, limit },
        ),
        other => (SectionOutcome::RejectedHours, other),
    })?;
    if let Err(e) = section.enroll_student(student.registration_id()) {
        student.remove_from_future_planning(section.subject().code());
        return Err((SectionOutcome::RejectedFull, e));
    }
    report.add_planned_section(section.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_politica_desde_texto() {
        assert_eq!("reject-both".parse::<PlanningPolicy>(), Ok(PlanningPolicy::RejectBoth));
        assert_eq!("Precedence".parse::<PlanningPolicy>(), Ok(PlanningPolicy::ResolveByPrecedence));
        assert!("random".parse::<PlanningPolicy>().is_err());
        let p: PlanningPolicy = serde_json::from_str("\"resolve-by-precedence\"").unwrap();
        assert_eq!(p, PlanningPolicy::ResolveByPrecedence);
    }

    #[test]
    fn test_sin_estudiante_o_sin_secciones() {
        let planner = EnrollmentPlanner::default();
        let r = planner.plan(None, vec![]);
        assert!(!r.is_success());
        assert_eq!(r.errors(), &[EnrollmentError::MissingStudent]);

        let mut st = Student::new("Ana", "1", 20);
        let r = planner.plan(Some(&mut st), vec![]);
        assert!(!r.is_success());
        assert_eq!(r.errors(), &[EnrollmentError::NoSectionsRequested]);
    }
}
