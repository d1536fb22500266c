// Repositorio en memoria de asignaturas, secciones y estudiantes.
//
// Se construye una vez al arrancar (desde JSON o a mano en los tests) y
// luego sólo mutan la planificación de los estudiantes y los inscritos de
// las secciones, siempre a través del planificador.
pub mod seed;

use crate::errors::CatalogError;
use crate::models::{ClassGroup, Student, Subject};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use strsim::jaro_winkler;

pub use seed::{load_catalog_file, parse_catalog_json, CatalogSeed};

/// Similitud mínima para sugerir una clave parecida en un "no encontrado".
const SUGGESTION_THRESHOLD: f64 = 0.85;

#[derive(Debug, Default, Clone)]
pub struct Catalog {
    subjects: BTreeMap<String, Arc<Subject>>,
    sections: BTreeMap<String, ClassGroup>,
    students: BTreeMap<String, Student>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Registra una asignatura. Sus referencias a otras asignaturas
    /// (prerequisitos, co-requisitos) se comprueban en `validate_references`,
    /// así el orden de registro no importa.
    pub fn register_subject(&mut self, subject: Subject) -> Result<Arc<Subject>, CatalogError> {
        if self.subjects.contains_key(subject.code()) {
            return Err(CatalogError::DuplicateSubject(subject.code().to_string()));
        }
        let subject = Arc::new(subject);
        self.subjects.insert(subject.code().to_string(), subject.clone());
        Ok(subject)
    }

    pub fn register_section(&mut self, section: ClassGroup) -> Result<(), CatalogError> {
        if self.sections.contains_key(section.id()) {
            return Err(CatalogError::DuplicateSection(section.id().to_string()));
        }
        if !self.subjects.contains_key(section.subject().code()) {
            return Err(CatalogError::DanglingSubject {
                owner: format!("section {}", section.id()),
                code: section.subject().code().to_string(),
            });
        }
        self.sections.insert(section.id().to_string(), section);
        Ok(())
    }

    pub fn register_student(&mut self, student: Student) -> Result<(), CatalogError> {
        if self.students.contains_key(student.registration_id()) {
            return Err(CatalogError::DuplicateStudent(student.registration_id().to_string()));
        }
        self.students.insert(student.registration_id().to_string(), student);
        Ok(())
    }

    /// Comprueba que todo código citado por prerequisitos y co-requisitos exista.
    pub fn validate_references(&self) -> Result<(), CatalogError> {
        for subject in self.subjects.values() {
            let owner = format!("subject {}", subject.code());
            for v in subject.validators() {
                for code in v.referenced_subjects() {
                    if !self.subjects.contains_key(code) {
                        return Err(CatalogError::DanglingSubject { owner, code: code.to_string() });
                    }
                }
            }
            for code in subject.co_requisites() {
                if !self.subjects.contains_key(code) {
                    return Err(CatalogError::DanglingSubject { owner, code: code.clone() });
                }
            }
        }
        Ok(())
    }

    pub fn subject(&self, code: &str) -> Option<&Arc<Subject>> {
        self.subjects.get(code)
    }

    pub fn section(&self, id: &str) -> Option<&ClassGroup> {
        self.sections.get(id)
    }

    pub fn student(&self, registration_id: &str) -> Option<&Student> {
        self.students.get(registration_id)
    }

    pub fn student_mut(&mut self, registration_id: &str) -> Option<&mut Student> {
        self.students.get_mut(registration_id)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Arc<Subject>> {
        self.subjects.values()
    }

    pub fn sections(&self) -> impl Iterator<Item = &ClassGroup> {
        self.sections.values()
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn sections_for_subject(&self, code: &str) -> Vec<&ClassGroup> {
        self.sections.values().filter(|s| s.subject().code() == code).collect()
    }

    /// Préstamo simultáneo del estudiante (mutable) y de las secciones
    /// pedidas (mutables), en el orden de `ids`. Los ids repetidos se
    /// ignoran; los desconocidos se devuelven aparte.
    pub fn student_and_sections_mut<'a>(
        &'a mut self,
        registration_id: &str,
        ids: &[String],
    ) -> (Option<&'a mut Student>, Vec<&'a mut ClassGroup>, Vec<String>) {
        let student = self.students.get_mut(registration_id);
        let mut seen: HashSet<&str> = HashSet::new();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !self.sections.contains_key(id.as_str()))
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let mut by_id: BTreeMap<&str, &'a mut ClassGroup> =
            self.sections.iter_mut().map(|(k, v)| (k.as_str(), v)).collect();
        let mut picked = Vec::new();
        for id in ids {
            if let Some(s) = by_id.remove(id.as_str()) {
                picked.push(s);
            }
        }
        (student, picked, missing)
    }

    pub fn suggest_subject(&self, code: &str) -> Option<String> {
        closest_key(self.subjects.keys(), code)
    }

    pub fn suggest_section(&self, id: &str) -> Option<String> {
        closest_key(self.sections.keys(), id)
    }

    pub fn suggest_student(&self, registration_id: &str) -> Option<String> {
        closest_key(self.students.keys(), registration_id)
    }

    /// Busca una asignatura por nombre (sin distinguir mayúsculas); si no
    /// hay coincidencia exacta usa la más parecida por Jaro-Winkler.
    pub fn subject_by_name(&self, name: &str) -> Option<&Arc<Subject>> {
        let wanted = name.trim().to_lowercase();
        if let Some(s) = self.subjects.values().find(|s| s.name().to_lowercase() == wanted) {
            return Some(s);
        }
        self.subjects
            .values()
            .map(|s| (jaro_winkler(&s.name().to_lowercase(), &wanted), s))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, s)| s)
    }
}

fn closest_key<'a, I>(keys: I, wanted: &str) -> Option<String>
where
    I: Iterator<Item = &'a String>,
{
    let wanted = wanted.to_uppercase();
    keys.map(|k| (jaro_winkler(&k.to_uppercase(), &wanted), k))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, k)| k.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::prerequisites::PrerequisiteValidator;
    use crate::models::{Schedule, SubjectKind};

    fn small_catalog() -> Catalog {
        let mut c = Catalog::new();
        let calc = c
            .register_subject(Subject::new("MAT154", "Cálculo I", 4, SubjectKind::Required).unwrap())
            .unwrap();
        c.register_subject(
            Subject::new("MAT156", "Cálculo II", 4, SubjectKind::Required)
                .unwrap()
                .with_validator(PrerequisiteValidator::simple("MAT154")),
        )
        .unwrap();
        c.register_section(
            ClassGroup::new("MAT154-01", calc.clone(), 30, vec![Schedule::parse("MO 08:00-10:00").unwrap()]).unwrap(),
        )
        .unwrap();
        c.register_section(
            ClassGroup::new("MAT154-02", calc, 30, vec![Schedule::parse("MO 10:00-12:00").unwrap()]).unwrap(),
        )
        .unwrap();
        c.register_student(Student::new("João Silva", "202365082A", 20)).unwrap();
        c
    }

    #[test]
    fn test_duplicados_rechazados() {
        let mut c = small_catalog();
        let dup = Subject::new("MAT154", "otra", 2, SubjectKind::Optional).unwrap();
        assert!(matches!(c.register_subject(dup), Err(CatalogError::DuplicateSubject(_))));
        assert!(matches!(
            c.register_student(Student::new("X", "202365082A", 10)),
            Err(CatalogError::DuplicateStudent(_))
        ));
        assert!(c.validate_references().is_ok());
    }

    #[test]
    fn test_referencia_colgante() {
        let mut c = small_catalog();
        c.register_subject(
            Subject::new("FIS074", "Física II", 4, SubjectKind::Required)
                .unwrap()
                .with_validator(PrerequisiteValidator::all_of(["FIS073", "MAT156"])),
        )
        .unwrap();
        match c.validate_references() {
            Err(CatalogError::DanglingSubject { code, .. }) => assert_eq!(code, "FIS073"),
            other => panic!("se esperaba DanglingSubject, llegó {:?}", other),
        }
    }

    #[test]
    fn test_sugerencias_y_busqueda() {
        let c = small_catalog();
        assert_eq!(c.suggest_section("MAT154-1"), Some("MAT154-01".to_string()));
        assert_eq!(c.suggest_subject("ZZZ999"), None);
        assert_eq!(c.subject_by_name("cálculo ii").map(|s| s.code()), Some("MAT156"));
        assert_eq!(c.sections_for_subject("MAT154").len(), 2);
    }

    #[test]
    fn test_prestamo_de_estudiante_y_secciones() {
        let mut c = small_catalog();
        let ids = vec!["MAT154-02".to_string(), "NOPE".to_string(), "MAT154-01".to_string()];
        let (student, sections, missing) = c.student_and_sections_mut("202365082A", &ids);
        assert!(student.is_some());
        assert_eq!(sections.iter().map(|s| s.id()).collect::<Vec<_>>(), vec!["MAT154-02", "MAT154-01"]);
        assert_eq!(missing, vec!["NOPE".to_string()]);
    }

    #[test]
    fn test_ids_desconocidos_repetidos_no_consecutivos() {
        let mut c = small_catalog();
        let ids = vec!["X".to_string(), "MAT154-01".to_string(), "X".to_string(), "Y".to_string(), "X".to_string()];
        let (_, sections, missing) = c.student_and_sections_mut("202365082A", &ids);
        assert_eq!(sections.len(), 1);
        assert_eq!(missing, vec!["X".to_string(), "Y".to_string()]);
    }
}
