use crate::errors::{EnrollmentError, InvalidArgument};
use crate::models::{Schedule, Subject};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Sección (turma): oferta con horario y cupo de una asignatura.
#[derive(Debug, Clone, Serialize)]
pub struct ClassGroup {
    id: String,
    subject: Arc<Subject>,
    capacity: u32,
    schedules: Vec<Schedule>,
    /// Matrículas (registration ids) de los estudiantes inscritos.
    enrolled_students: BTreeSet<String>,
}

impl ClassGroup {
    pub fn new(
        id: impl Into<String>,
        subject: Arc<Subject>,
        capacity: u32,
        schedules: Vec<Schedule>,
    ) -> Result<ClassGroup, InvalidArgument> {
        let id = id.into();
        if capacity == 0 {
            return Err(InvalidArgument::NonPositiveCapacity { section: id });
        }
        if schedules.is_empty() {
            return Err(InvalidArgument::NoSchedules { section: id });
        }
        Ok(ClassGroup { id, subject, capacity, schedules, enrolled_students: BTreeSet::new() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject(&self) -> &Arc<Subject> {
        &self.subject
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Dos secciones chocan si algún par de franjas choca.
    pub fn conflicts_with(&self, other: &ClassGroup) -> bool {
        self.schedules
            .iter()
            .any(|s1| other.schedules.iter().any(|s2| s1.conflicts(s2)))
    }

    /// Franjas ordenadas, usadas como clave de "mismo horario exacto".
    pub fn slot_key(&self) -> Vec<Schedule> {
        let mut key = self.schedules.clone();
        key.sort();
        key.dedup();
        key
    }

    pub fn enrolled_count(&self) -> u32 {
        self.enrolled_students.len() as u32
    }

    pub fn has_available_slots(&self) -> bool {
        self.enrolled_count() < self.capacity
    }

    pub fn available_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled_count())
    }

    pub fn is_student_enrolled(&self, registration_id: &str) -> bool {
        self.enrolled_students.contains(registration_id)
    }

    pub fn enrolled_students(&self) -> impl Iterator<Item = &str> {
        self.enrolled_students.iter().map(|s| s.as_str())
    }

    pub fn enroll_student(&mut self, registration_id: &str) -> Result<(), EnrollmentError> {
        if self.is_student_enrolled(registration_id) {
            return Ok(());
        }
        if !self.has_available_slots() {
            return Err(EnrollmentError::SectionFull { section: self.id.clone(), capacity: self.capacity });
        }
        self.enrolled_students.insert(registration_id.to_string());
        Ok(())
    }

    pub fn remove_student(&mut self, registration_id: &str) -> bool {
        self.enrolled_students.remove(registration_id)
    }
}

impl PartialEq for ClassGroup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassGroup {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectKind;

    fn calc() -> Arc<Subject> {
        Arc::new(Subject::new("MAT154", "Cálculo I", 4, SubjectKind::Required).unwrap())
    }

    #[test]
    fn test_construccion_invalida() {
        let mo = Schedule::parse("MO 08:00-10:00").unwrap();
        assert_eq!(
            ClassGroup::new("MAT154-01", calc(), 0, vec![mo]),
            Err(InvalidArgument::NonPositiveCapacity { section: "MAT154-01".to_string() })
        );
        assert!(matches!(
            ClassGroup::new("MAT154-01", calc(), 30, vec![]),
            Err(InvalidArgument::NoSchedules { .. })
        ));
    }

    #[test]
    fn test_cupo() {
        let mo = Schedule::parse("MO 08:00-10:00").unwrap();
        let mut g = ClassGroup::new("MAT154-01", calc(), 1, vec![mo]).unwrap();
        assert_eq!(g.available_slots(), 1);
        g.enroll_student("A").unwrap();
        // reinscribir al mismo no consume cupo
        g.enroll_student("A").unwrap();
        assert_eq!(g.enrolled_count(), 1);
        let err = g.enroll_student("B").unwrap_err();
        assert_eq!(err, EnrollmentError::SectionFull { section: "MAT154-01".to_string(), capacity: 1 });
        assert!(g.remove_student("A"));
        assert!(g.has_available_slots());
    }

    #[test]
    fn test_conflicto_entre_secciones() {
        let a = ClassGroup::new(
            "A",
            calc(),
            10,
            vec![Schedule::parse("MO 08:00-10:00").unwrap(), Schedule::parse("WE 08:00-10:00").unwrap()],
        )
        .unwrap();
        let b = ClassGroup::new("B", calc(), 10, vec![Schedule::parse("WE 09:00-11:00").unwrap()]).unwrap();
        let c = ClassGroup::new("C", calc(), 10, vec![Schedule::parse("MO 10:00-12:00").unwrap()]).unwrap();
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
    }
}
