// Formato JSON de carga del catálogo.
//
// {
//   "subjects": [
//     {"code": "MAT156", "name": "Cálculo II", "weekly_hours": 4, "kind": "required",
//      "prerequisites": {"and": [{"simple": {"subject": "MAT154"}}, {"simple": {"subject": "MAT155"}}]},
//      "co_requisites": []}
//   ],
//   "sections": [
//     {"id": "MAT156-01", "subject": "MAT156", "capacity": 25, "schedules": ["TU 14:00-16:00"]}
//   ],
//   "students": [
//     {"name": "João Silva", "registration_id": "202365082A", "max_weekly_hours": 20,
//      "completed": [{"subject": "MAT154", "grade": 8.5}]}
//   ]
// }
use crate::algorithm::prerequisites::PrerequisiteValidator;
use crate::catalog::Catalog;
use crate::errors::CatalogError;
use crate::models::{ClassGroup, Schedule, Student, Subject, SubjectKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub subjects: Vec<SubjectSeed>,
    #[serde(default)]
    pub sections: Vec<SectionSeed>,
    #[serde(default)]
    pub students: Vec<StudentSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSeed {
    pub code: String,
    pub name: String,
    pub weekly_hours: u32,
    pub kind: SubjectKind,
    #[serde(default)]
    pub prerequisites: Option<PrerequisiteValidator>,
    #[serde(default)]
    pub co_requisites: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSeed {
    pub id: String,
    pub subject: String,
    pub capacity: u32,
    /// Franjas en texto; cada entrada puede listar varios días ("MO WE 08:00-10:00").
    pub schedules: Vec<String>,
    /// Matrículas ya inscritas al cargar.
    #[serde(default)]
    pub enrolled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSeed {
    pub name: String,
    pub registration_id: String,
    pub max_weekly_hours: u32,
    #[serde(default)]
    pub completed: Vec<GradeSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeSeed {
    pub subject: String,
    pub grade: f64,
}

impl CatalogSeed {
    /// Construye y valida el catálogo completo.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();

        for s in self.subjects {
            let mut subject = Subject::new(s.code, s.name, s.weekly_hours, s.kind)?;
            if let Some(v) = s.prerequisites {
                subject = subject.with_validator(v);
            }
            for co in s.co_requisites {
                subject = subject.with_co_requisite(co);
            }
            catalog.register_subject(subject)?;
        }
        catalog.validate_references()?;

        for sec in self.sections {
            let subject = catalog
                .subject(&sec.subject)
                .cloned()
                .ok_or_else(|| CatalogError::DanglingSubject {
                    owner: format!("section {}", sec.id),
                    code: sec.subject.clone(),
                })?;
            let mut schedules: Vec<Schedule> = Vec::new();
            for text in sec.schedules.iter() {
                schedules.extend(Schedule::parse_many(text)?);
            }
            let mut group = ClassGroup::new(sec.id, subject, sec.capacity, schedules)?;
            for reg in sec.enrolled.iter() {
                if let Err(e) = group.enroll_student(reg) {
                    warn!("inscrito ignorado al cargar {}: {}", group.id(), e);
                }
            }
            catalog.register_section(group)?;
        }

        for st in self.students {
            let mut student = Student::new(st.name, st.registration_id, st.max_weekly_hours);
            for g in st.completed {
                let subject = catalog.subject(&g.subject).cloned().ok_or_else(|| CatalogError::DanglingSubject {
                    owner: format!("student {}", student.registration_id()),
                    code: g.subject.clone(),
                })?;
                if !(0.0..=10.0).contains(&g.grade) {
                    return Err(CatalogError::InvalidGrade {
                        student: student.registration_id().to_string(),
                        subject: g.subject,
                        grade: g.grade,
                    });
                }
                student.add_completed_subject(subject, g.grade);
            }
            catalog.register_student(student)?;
        }

        info!(
            "catálogo cargado: {} asignaturas, {} secciones, {} estudiantes",
            catalog.subjects().count(),
            catalog.sections().count(),
            catalog.students().count()
        );
        Ok(catalog)
    }
}

pub fn parse_catalog_json(json_str: &str) -> Result<Catalog, CatalogError> {
    let seed: CatalogSeed = serde_json::from_str(json_str)?;
    seed.build()
}

pub fn load_catalog_file<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_catalog_json(&contents)
}
