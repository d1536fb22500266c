use actix_web::{HttpResponse, Responder};
use serde_json::json;
use crate::api_json::{FinalizeRequest, PlanRequest, ResolveRequest};

pub async fn help_handler() -> impl Responder {
    let plan_example = PlanRequest {
        registration_id: "202365082A".to_string(),
        sections: vec!["MAT156-01".to_string(), "Física I".to_string()],
        policy: None,
    };
    let finalize_example = FinalizeRequest { registration_id: "202365082A".to_string(), grade: Some(8.0) };
    let resolve_example = ResolveRequest { sections: vec!["DCC025-01".to_string(), "ART001-01".to_string()] };

    let help = json!({
        "description": "API de planificación de matrícula. POST /plan simula la inscripción de secciones para un estudiante y devuelve un reporte; POST /finalize convierte el último plan en historial.",
        "endpoints": {
            "GET /help": "esta ayuda",
            "GET /subjects": "asignaturas del catálogo",
            "GET /sections?subject=CODE": "secciones (opcionalmente filtradas por asignatura)",
            "GET /students/{id}": "reporte resumen del estudiante",
            "GET /eligibility?student=ID&subject=CODE": "prerequisitos y horas disponibles para una asignatura",
            "POST /plan": "planificación (reporte)",
            "POST /finalize": "finaliza el último plan del estudiante",
            "POST /resolve": "resolución por precedencia de secciones con la misma franja"
        },
        "plan_example": plan_example,
        "finalize_example": finalize_example,
        "resolve_example": resolve_example,
        "policies": ["reject-both", "precedence"],
        "note": "Las entradas de 'sections' sin dígitos se tratan como nombres de asignatura y se resuelven a una sección con cupo."
    });

    HttpResponse::Ok().json(help)
}
