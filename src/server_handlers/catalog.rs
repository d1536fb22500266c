use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use crate::models::ClassGroup;
use super::{lock_service, SharedService};

#[derive(Debug, Deserialize)]
pub struct SectionsQuery {
    pub subject: Option<String>,
}

fn section_json(s: &ClassGroup) -> serde_json::Value {
    json!({
        "id": s.id(),
        "subject": s.subject().code(),
        "subject_name": s.subject().name(),
        "kind": s.subject().kind(),
        "capacity": s.capacity(),
        "enrolled": s.enrolled_count(),
        "available": s.available_slots(),
        "schedules": s.schedules().iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    })
}

/// GET /subjects
pub async fn subjects_handler(data: SharedService) -> impl Responder {
    let svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let subjects: Vec<serde_json::Value> = svc
        .catalog()
        .subjects()
        .map(|s| {
            json!({
                "code": s.code(),
                "name": s.name(),
                "weekly_hours": s.weekly_hours(),
                "kind": s.kind(),
                "prerequisites": s.validators().iter().map(|v| v.to_string()).collect::<Vec<_>>(),
                "co_requisites": s.co_requisites(),
            })
        })
        .collect();
    HttpResponse::Ok().json(json!({"subjects": subjects}))
}

/// GET /sections?subject=MAT156
pub async fn sections_handler(data: SharedService, query: web::Query<SectionsQuery>) -> impl Responder {
    let svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let subject = query.into_inner().subject.filter(|s| !s.trim().is_empty());
    let sections: Vec<serde_json::Value> = match subject {
        Some(code) => match svc.sections_for_subject(code.trim()) {
            Ok(list) => list.into_iter().map(section_json).collect(),
            Err(e) => return HttpResponse::NotFound().json(json!({"error": e.to_string(), "detail": e})),
        },
        None => svc.catalog().sections().map(section_json).collect(),
    };
    HttpResponse::Ok().json(json!({"sections": sections}))
}

/// GET /students/{id}
pub async fn student_handler(data: SharedService, path: web::Path<String>) -> impl Responder {
    let svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let report = svc.student_report(&path.into_inner());
    HttpResponse::Ok().json(report)
}
