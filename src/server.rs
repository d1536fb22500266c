use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Mutex;
use crate::server_handlers::{
    eligibility_handler, finalize_handler, help_handler, plan_handler, resolve_handler, sections_handler,
    student_handler, subjects_handler,
};
use crate::service::EnrollmentService;

/// Rutas de la API; se reutiliza en los tests con `App::new().configure(...)`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/help", web::get().to(help_handler))
        .route("/subjects", web::get().to(subjects_handler))
        .route("/sections", web::get().to(sections_handler))
        .route("/students/{id}", web::get().to(student_handler))
        .route("/plan", web::post().to(plan_handler))
        .route("/eligibility", web::get().to(eligibility_handler))
        .route("/finalize", web::post().to(finalize_handler))
        .route("/resolve", web::post().to(resolve_handler));
}

pub async fn run_server(bind_addr: &str, service: EnrollmentService) -> std::io::Result<()> {
    let data = web::Data::new(Mutex::new(service));
    log::info!("servidor escuchando en http://{}", bind_addr);
    HttpServer::new(move || {
        // el frontend se sirve desde otro origen
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(data.clone())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
