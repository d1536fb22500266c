mod common;

use common::sample_catalog;
use enrollment_planner::catalog::parse_catalog_json;
use enrollment_planner::errors::CatalogError;
use enrollment_planner::models::SubjectKind;

#[test]
fn test_catalogo_de_ejemplo() {
    let catalog = sample_catalog();
    assert_eq!(catalog.subjects().count(), 21);
    assert_eq!(catalog.sections().count(), 24);

    let joao = catalog.student("202365082A").expect("João debe existir");
    assert_eq!(joao.name(), "João Silva");
    assert_eq!(joao.max_weekly_hours(), 20);
    assert_eq!(joao.completed_subjects().len(), 5);
    // MAT154 4h + MAT155 4h + DCC119 4h + ICE001 2h + FIS122 2h
    assert_eq!(joao.credits_from_history(), 16);
    assert_eq!(joao.accumulated_credits(), 16);

    let metodologia = catalog.subject("DCC123").unwrap();
    assert_eq!(metodologia.kind(), SubjectKind::Required);
    assert_eq!(metodologia.validators()[0].referenced_subjects().len(), 8);
    assert!(!metodologia.requisites_met(joao));
    assert_eq!(catalog.sections_for_subject("MAT154").len(), 3);
}

#[test]
fn test_estudiante_con_nota_fuera_de_rango() {
    let json = r#"{
        "subjects": [{"code": "A", "name": "A", "weekly_hours": 2, "kind": "required"}],
        "students": [{"name": "X", "registration_id": "1", "max_weekly_hours": 10,
                      "completed": [{"subject": "A", "grade": 12.0}]}]
    }"#;
    assert!(matches!(parse_catalog_json(json), Err(CatalogError::InvalidGrade { .. })));
}

#[test]
fn test_seccion_de_asignatura_desconocida() {
    let json = r#"{
        "sections": [{"id": "Z-01", "subject": "Z", "capacity": 5, "schedules": ["MO 08:00-10:00"]}]
    }"#;
    match parse_catalog_json(json) {
        Err(CatalogError::DanglingSubject { owner, code }) => {
            assert_eq!(owner, "section Z-01");
            assert_eq!(code, "Z");
        }
        other => panic!("se esperaba DanglingSubject, llegó {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_seccion_duplicada() {
    let json = r#"{
        "subjects": [{"code": "A", "name": "A", "weekly_hours": 2, "kind": "required"}],
        "sections": [
            {"id": "A-01", "subject": "A", "capacity": 5, "schedules": ["MO 08:00-10:00"]},
            {"id": "A-01", "subject": "A", "capacity": 5, "schedules": ["TU 08:00-10:00"]}
        ]
    }"#;
    assert!(matches!(parse_catalog_json(json), Err(CatalogError::DuplicateSection(id)) if id == "A-01"));
}
