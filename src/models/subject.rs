use crate::algorithm::prerequisites::PrerequisiteValidator;
use crate::errors::InvalidArgument;
use crate::models::Student;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Tipo de asignatura. El orden de declaración es el de precedencia:
/// Required gana a Elective, Elective gana a Optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Required,
    Elective,
    Optional,
}

impl SubjectKind {
    /// Valor numérico de precedencia: menor número = mayor prioridad.
    pub fn precedence(self) -> u8 {
        match self {
            SubjectKind::Required => 1,
            SubjectKind::Elective => 2,
            SubjectKind::Optional => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubjectKind::Required => "Required",
            SubjectKind::Elective => "Elective",
            SubjectKind::Optional => "Optional",
        }
    }
}

/// Asignatura del catálogo. La identidad es el código.
#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    code: String,
    name: String,
    weekly_hours: u32,
    kind: SubjectKind,
    validators: Vec<PrerequisiteValidator>,
    co_requisites: Vec<String>,
}

impl Subject {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        weekly_hours: u32,
        kind: SubjectKind,
    ) -> Result<Subject, InvalidArgument> {
        let code = code.into();
        if weekly_hours == 0 {
            return Err(InvalidArgument::NonPositiveWeeklyHours { subject: code });
        }
        Ok(Subject {
            code,
            name: name.into(),
            weekly_hours,
            kind,
            validators: Vec::new(),
            co_requisites: Vec::new(),
        })
    }

    /// Reemplaza las reglas por un único validador raíz.
    pub fn with_validator(mut self, validator: PrerequisiteValidator) -> Self {
        self.validators = vec![validator];
        self
    }

    pub fn with_validators(mut self, validators: Vec<PrerequisiteValidator>) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_co_requisite(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if !self.co_requisites.contains(&code) {
            self.co_requisites.push(code);
        }
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weekly_hours(&self) -> u32 {
        self.weekly_hours
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn precedence(&self) -> u8 {
        self.kind.precedence()
    }

    pub fn validators(&self) -> &[PrerequisiteValidator] {
        &self.validators
    }

    pub fn co_requisites(&self) -> &[String] {
        &self.co_requisites
    }

    /// Sin validadores siempre se cumple; con varios, deben cumplirse todos.
    pub fn requisites_met(&self, student: &Student) -> bool {
        self.validators.iter().all(|v| v.is_satisfied(student, self))
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}
