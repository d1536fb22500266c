// Biblioteca raíz del crate `enrollment_planner`.
// Motor de planificación de matrícula: modelos, validadores, planificador,
// catálogo en memoria y la API HTTP que los expone.
pub mod models;
pub mod algorithm;
pub mod catalog;
pub mod errors;
pub mod service;
pub mod api_json;
pub mod config;
pub mod logging;
pub mod server;
pub mod server_handlers;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
pub use service::EnrollmentService;
