use crate::algorithm::prerequisites::PASSING_GRADE;
use crate::errors::EnrollmentError;
use crate::models::Subject;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct CompletedSubject {
    pub subject: Arc<Subject>,
    pub grade: f64,
}

impl CompletedSubject {
    pub fn passed(&self) -> bool {
        self.grade >= PASSING_GRADE
    }
}

/// Estudiante: historial con notas, planificación futura y tope semanal.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    name: String,
    registration_id: String,
    max_weekly_hours: u32,
    completed_subjects: BTreeMap<String, CompletedSubject>,
    future_planning: BTreeMap<String, Arc<Subject>>,
    accumulated_credits: u32,
}

impl Student {
    pub fn new(name: impl Into<String>, registration_id: impl Into<String>, max_weekly_hours: u32) -> Student {
        Student {
            name: name.into(),
            registration_id: registration_id.into(),
            max_weekly_hours,
            completed_subjects: BTreeMap::new(),
            future_planning: BTreeMap::new(),
            accumulated_credits: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    pub fn max_weekly_hours(&self) -> u32 {
        self.max_weekly_hours
    }

    pub fn completed_subjects(&self) -> &BTreeMap<String, CompletedSubject> {
        &self.completed_subjects
    }

    pub fn future_planning(&self) -> impl Iterator<Item = &Arc<Subject>> {
        self.future_planning.values()
    }

    pub fn is_planned(&self, code: &str) -> bool {
        self.future_planning.contains_key(code)
    }

    /// Registra (o corrige) la nota de una asignatura. El contador de
    /// créditos se mantiene en línea con el historial: una corrección
    /// descuenta los créditos de la nota anterior antes de sumar la nueva.
    pub fn add_completed_subject(&mut self, subject: Arc<Subject>, grade: f64) {
        let hours = subject.weekly_hours();
        let entry = CompletedSubject { subject, grade };
        let new_passed = entry.passed();
        if let Some(old) = self.completed_subjects.insert(entry.subject.code().to_string(), entry) {
            if old.passed() {
                self.accumulated_credits -= old.subject.weekly_hours();
            }
        }
        if new_passed {
            self.accumulated_credits += hours;
        }
    }

    pub fn has_completed(&self, code: &str) -> bool {
        self.completed_subjects.contains_key(code)
    }

    pub fn grade(&self, code: &str) -> Option<f64> {
        self.completed_subjects.get(code).map(|c| c.grade)
    }

    pub fn has_passed(&self, code: &str) -> bool {
        self.completed_subjects.get(code).map(|c| c.passed()).unwrap_or(false)
    }

    /// Contador incremental (1 hora semanal aprobada = 1 crédito).
    pub fn accumulated_credits(&self) -> u32 {
        self.accumulated_credits
    }

    /// Créditos recalculados desde el historial completo. Es la fuente que
    /// usa `PrerequisiteValidator::MinimumCredits`.
    pub fn credits_from_history(&self) -> u32 {
        self.completed_subjects
            .values()
            .filter(|c| c.passed())
            .map(|c| c.subject.weekly_hours())
            .sum()
    }

    /// Añade a la planificación respetando el tope semanal. Una asignatura
    /// ya planificada no vuelve a sumar horas.
    pub fn add_to_future_planning(&mut self, subject: Arc<Subject>) -> Result<(), EnrollmentError> {
        if self.is_planned(subject.code()) {
            return Ok(());
        }
        let requested = self.future_planning_weekly_hours() + subject.weekly_hours();
        if requested > self.max_weekly_hours {
            return Err(EnrollmentError::WeeklyHoursExceeded {
                section: None,
                requested,
                limit: self.max_weekly_hours,
            });
        }
        self.future_planning.insert(subject.code().to_string(), subject);
        Ok(())
    }

    pub fn remove_from_future_planning(&mut self, code: &str) -> Option<Arc<Subject>> {
        self.future_planning.remove(code)
    }

    pub fn future_planning_weekly_hours(&self) -> u32 {
        self.future_planning.values().map(|s| s.weekly_hours()).sum()
    }

    pub fn is_future_planning_within_limit(&self) -> bool {
        self.future_planning_weekly_hours() <= self.max_weekly_hours
    }

    /// Puede ser negativo si el tope se redujo después de planificar.
    pub fn remaining_weekly_hours(&self) -> i64 {
        i64::from(self.max_weekly_hours) - i64::from(self.future_planning_weekly_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectKind;

    fn subj(code: &str, hours: u32) -> Arc<Subject> {
        Arc::new(Subject::new(code, code, hours, SubjectKind::Required).unwrap())
    }

    #[test]
    fn test_creditos_incrementales() {
        let mut st = Student::new("João Silva", "202365082A", 20);
        st.add_completed_subject(subj("MAT154", 4), 8.5);
        st.add_completed_subject(subj("ICE001", 2), 5.0);
        assert_eq!(st.accumulated_credits(), 4);
        assert_eq!(st.credits_from_history(), 4);
        assert!(st.has_completed("ICE001"));
        assert!(!st.has_passed("ICE001"));
    }

    #[test]
    fn test_correccion_de_nota_no_duplica() {
        let mut st = Student::new("João Silva", "202365082A", 20);
        let calc = subj("MAT154", 4);
        st.add_completed_subject(calc.clone(), 8.5);
        st.add_completed_subject(calc.clone(), 9.0);
        assert_eq!(st.accumulated_credits(), 4);
        st.add_completed_subject(calc, 4.0);
        assert_eq!(st.accumulated_credits(), 0);
        assert_eq!(st.credits_from_history(), 0);
    }

    #[test]
    fn test_tope_de_horas() {
        let mut st = Student::new("Ana", "1", 6);
        st.add_to_future_planning(subj("A", 4)).unwrap();
        let err = st.add_to_future_planning(subj("B", 4)).unwrap_err();
        assert!(matches!(err, EnrollmentError::WeeklyHoursExceeded { requested: 8, limit: 6, .. }));
        st.add_to_future_planning(subj("C", 2)).unwrap();
        assert_eq!(st.remaining_weekly_hours(), 0);
        assert!(st.is_future_planning_within_limit());
        // repetir una ya planificada no suma
        st.add_to_future_planning(subj("A", 4)).unwrap();
        assert_eq!(st.future_planning_weekly_hours(), 6);
        assert!(st.remove_from_future_planning("A").is_some());
        assert_eq!(st.remaining_weekly_hours(), 4);
    }
}
