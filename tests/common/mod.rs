#![allow(dead_code)]

use enrollment_planner::algorithm::PrerequisiteValidator;
use enrollment_planner::catalog::{load_catalog_file, Catalog};
use enrollment_planner::models::{ClassGroup, Schedule, Subject, SubjectKind};
use std::sync::Arc;

pub fn sample_catalog() -> Catalog {
    enrollment_planner::logging::init_test_logger();
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json");
    match load_catalog_file(path) {
        Ok(c) => c,
        Err(e) => panic!("no se pudo cargar {}: {}", path, e),
    }
}

pub fn subject(code: &str, hours: u32, kind: SubjectKind) -> Arc<Subject> {
    Arc::new(Subject::new(code, code, hours, kind).unwrap())
}

pub fn subject_with(code: &str, hours: u32, validator: PrerequisiteValidator) -> Arc<Subject> {
    Arc::new(Subject::new(code, code, hours, SubjectKind::Required).unwrap().with_validator(validator))
}

pub fn section(id: &str, subject: &Arc<Subject>, capacity: u32, slot: &str) -> ClassGroup {
    ClassGroup::new(id, subject.clone(), capacity, Schedule::parse_many(slot).unwrap()).unwrap()
}
