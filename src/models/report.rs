// Reporte de una llamada de planificación o consulta.
use crate::errors::EnrollmentError;
use crate::models::{ClassGroup, Student};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Estado final de una sección candidata dentro de una llamada a `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOutcome {
    Accepted,
    RejectedConflict,
    RejectedPrereq,
    RejectedCoRequisite,
    RejectedFull,
    RejectedDuplicate,
    RejectedHours,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRef {
    pub registration_id: String,
    pub name: String,
}

impl From<&Student> for StudentRef {
    fn from(s: &Student) -> Self {
        StudentRef { registration_id: s.registration_id().to_string(), name: s.name().to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    student: Option<StudentRef>,
    success: bool,
    errors: Vec<EnrollmentError>,
    warnings: Vec<String>,
    infos: Vec<String>,
    planned_sections: Vec<ClassGroup>,
    outcomes: Vec<(String, SectionOutcome)>,
    generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(student: Option<&Student>) -> Report {
        Report {
            student: student.map(StudentRef::from),
            success: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            infos: Vec::new(),
            planned_sections: Vec::new(),
            outcomes: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Reporte fallido con un único error.
    pub fn failed(student: Option<&Student>, error: EnrollmentError) -> Report {
        let mut r = Report::new(student);
        r.add_error(error);
        r
    }

    pub fn add_error(&mut self, error: EnrollmentError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn add_info(&mut self, info: impl Into<String>) {
        self.infos.push(info.into());
    }

    pub fn add_planned_section(&mut self, section: ClassGroup) {
        self.planned_sections.push(section);
    }

    pub fn record_outcome(&mut self, section_id: &str, outcome: SectionOutcome) {
        self.outcomes.push((section_id.to_string(), outcome));
    }

    pub fn set_success(&mut self, success: bool) {
        self.success = success;
    }

    pub fn student(&self) -> Option<&StudentRef> {
        self.student.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[EnrollmentError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    pub fn planned_sections(&self) -> &[ClassGroup] {
        &self.planned_sections
    }

    pub fn outcomes(&self) -> &[(String, SectionOutcome)] {
        &self.outcomes
    }

    pub fn outcome_of(&self, section_id: &str) -> Option<SectionOutcome> {
        self.outcomes.iter().find(|(id, _)| id == section_id).map(|(_, o)| *o)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== PLANNING REPORT ===")?;
        match &self.student {
            Some(s) => writeln!(f, "Student: {} ({})", s.name, s.registration_id)?,
            None => writeln!(f, "Student: -")?,
        }
        writeln!(f, "Status: {}", if self.success { "SUCCESS" } else { "FAILURE" })?;

        let sections: [(&str, Vec<String>); 3] = [
            ("INFO", self.infos.clone()),
            ("WARNINGS", self.warnings.clone()),
            ("ERRORS", self.error_messages()),
        ];
        for (title, lines) in sections.iter() {
            if lines.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{}:", title)?;
            for l in lines {
                writeln!(f, "  - {}", l)?;
            }
        }
        if !self.planned_sections.is_empty() {
            writeln!(f)?;
            writeln!(f, "PLANNED SECTIONS:")?;
            for s in &self.planned_sections {
                writeln!(f, "  - {} ({})", s.subject().code(), s.id())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_texto() {
        let st = Student::new("João Silva", "202365082A", 20);
        let mut r = Report::new(Some(&st));
        r.add_info("Checking eligibility");
        r.add_error(EnrollmentError::MissingReport);
        let text = r.to_string();
        assert!(text.contains("Student: João Silva (202365082A)"));
        assert!(text.contains("Status: FAILURE"));
        assert!(text.contains("INFO:\n  - Checking eligibility"));
        assert!(text.contains("ERRORS:"));
        assert!(!text.contains("WARNINGS:"));
    }

    #[test]
    fn test_serializa_errores_etiquetados() {
        let r = Report::failed(None, EnrollmentError::NoSectionsRequested);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["errors"][0]["kind"], "no_sections_requested");
        assert!(v["student"].is_null());
    }
}
