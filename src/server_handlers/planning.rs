use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use crate::api_json::{parse_and_resolve_sections, EligibilityQuery, FinalizeRequest, ResolveRequest};
use crate::errors::EnrollmentError;
use super::{lock_service, SharedService};

/// POST /plan
/// Acepta ids de sección o nombres de asignatura. El reporte se responde
/// siempre con 200, también cuando la planificación falla.
pub async fn plan_handler(data: SharedService, body: web::Json<serde_json::Value>) -> impl Responder {
    let body_value = body.into_inner();
    let json_str = match serde_json::to_string(&body_value) {
        Ok(s) => s,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };

    let mut svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let req = match parse_and_resolve_sections(&json_str, svc.catalog()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)})),
    };

    let report = svc.process_enrollment_with(&req.registration_id, &req.sections, req.policy);
    HttpResponse::Ok().json(report)
}

/// GET /eligibility?student=202365082A&subject=MAT156
pub async fn eligibility_handler(data: SharedService, query: web::Query<EligibilityQuery>) -> impl Responder {
    let svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let q = query.into_inner();
    HttpResponse::Ok().json(svc.check_eligibility(q.student.trim(), q.subject.trim()))
}

/// POST /finalize
pub async fn finalize_handler(data: SharedService, body: web::Json<FinalizeRequest>) -> impl Responder {
    let req = body.into_inner();
    let mut svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match svc.finalize_last_plan(&req.registration_id, req.grade) {
        Ok(summary) => HttpResponse::Ok().json(json!({"status": "ok", "summary": summary})),
        Err(e) => {
            let body = json!({"status": "error", "error": e.to_string(), "detail": e});
            match e {
                EnrollmentError::UnknownStudent { .. } => HttpResponse::NotFound().json(body),
                EnrollmentError::MissingReport => HttpResponse::Conflict().json(body),
                _ => HttpResponse::BadRequest().json(body),
            }
        }
    }
}

/// POST /resolve
/// 409 si dos secciones comparten franja y precedencia.
pub async fn resolve_handler(data: SharedService, body: web::Json<ResolveRequest>) -> impl Responder {
    let req = body.into_inner();
    let svc = match lock_service(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match svc.resolve(&req.sections) {
        Ok(kept) => HttpResponse::Ok().json(json!({"kept": kept})),
        Err(e) => {
            let body = json!({"error": e.to_string(), "detail": e});
            match e {
                EnrollmentError::ScheduleConflict { .. } => HttpResponse::Conflict().json(body),
                _ => HttpResponse::NotFound().json(body),
            }
        }
    }
}
