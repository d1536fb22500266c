pub mod planning;
pub mod catalog;
pub mod docs;

pub use planning::*;
pub use catalog::*;
pub use docs::*;

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::{Mutex, MutexGuard};
use crate::service::EnrollmentService;

/// Estado compartido de la aplicación: un único escritor a la vez.
pub type SharedService = web::Data<Mutex<EnrollmentService>>;

/// Bloquea el servicio; si el mutex quedó envenenado por un panic se
/// responde 500 en vez de seguir con datos a medio escribir.
pub(crate) fn lock_service(data: &SharedService) -> Result<MutexGuard<'_, EnrollmentService>, HttpResponse> {
    data.lock().map_err(|e| {
        log::error!("estado del servicio envenenado: {}", e);
        HttpResponse::InternalServerError().json(json!({"error": "service state unavailable"}))
    })
}
