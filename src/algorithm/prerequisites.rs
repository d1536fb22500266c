// Reglas de prerequisitos componibles.
//
// El árbol se escribe igual en Rust y en el JSON del catálogo:
//   {"and": [{"simple": {"subject": "MAT154"}}, {"minimum_credits": 30}]}
use crate::models::{Student, Subject};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nota mínima para considerar aprobada una asignatura.
pub const PASSING_GRADE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteValidator {
    /// Aprobó `subject` con nota >= 6.0.
    Simple { subject: String },
    /// Todas las reglas hijas se cumplen. Vacío => verdadero.
    And(Vec<PrerequisiteValidator>),
    /// Al menos una regla hija se cumple. Vacío => falso.
    Or(Vec<PrerequisiteValidator>),
    /// Créditos aprobados (recalculados desde el historial) >= umbral.
    MinimumCredits(u32),
}

impl PrerequisiteValidator {
    pub fn simple(code: impl Into<String>) -> Self {
        PrerequisiteValidator::Simple { subject: code.into() }
    }

    /// AND de validadores simples, la forma más común en la malla.
    pub fn all_of<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrerequisiteValidator::And(codes.into_iter().map(Self::simple).collect())
    }

    pub fn any_of<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrerequisiteValidator::Or(codes.into_iter().map(Self::simple).collect())
    }

    pub fn is_satisfied(&self, student: &Student, subject: &Subject) -> bool {
        match self {
            PrerequisiteValidator::Simple { subject: required } => student
                .grade(required)
                .map(|g| g >= PASSING_GRADE)
                .unwrap_or(false),
            PrerequisiteValidator::And(children) => {
                children.iter().all(|c| c.is_satisfied(student, subject))
            }
            PrerequisiteValidator::Or(children) => {
                children.iter().any(|c| c.is_satisfied(student, subject))
            }
            PrerequisiteValidator::MinimumCredits(threshold) => {
                student.credits_from_history() >= *threshold
            }
        }
    }

    /// Códigos de asignatura citados en el árbol (para validar el catálogo).
    pub fn referenced_subjects(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            PrerequisiteValidator::Simple { subject } => out.push(subject.as_str()),
            PrerequisiteValidator::And(children) | PrerequisiteValidator::Or(children) => {
                for c in children {
                    c.collect_refs(out);
                }
            }
            PrerequisiteValidator::MinimumCredits(_) => {}
        }
    }
}

impl fmt::Display for PrerequisiteValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, children: &[PrerequisiteValidator], op: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, c) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", c)?;
            }
            write!(f, ")")
        }
        match self {
            PrerequisiteValidator::Simple { subject } => write!(f, "{}", subject),
            PrerequisiteValidator::And(children) => join(f, children, "AND"),
            PrerequisiteValidator::Or(children) => join(f, children, "OR"),
            PrerequisiteValidator::MinimumCredits(n) => write!(f, "credits >= {}", n),
        }
    }
}
