// --- Planificador de matrícula - Archivo principal ---
//
// Uso:
//   enrollment-planner [serve]
//   enrollment-planner plan <matrícula> <sección>...
//   enrollment-planner check <matrícula> <asignatura>
//   enrollment-planner student <matrícula>

use anyhow::{bail, Context};
use enrollment_planner::algorithm::EnrollmentPlanner;
use enrollment_planner::catalog::load_catalog_file;
use enrollment_planner::config::PlannerConfig;
use enrollment_planner::{logging, run_server, EnrollmentService};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();
    let cfg = PlannerConfig::from_env().context("invalid configuration")?;
    let catalog = load_catalog_file(&cfg.catalog_path)
        .with_context(|| format!("failed to load catalog from {}", cfg.catalog_path.display()))?;
    let mut service = EnrollmentService::new(catalog, EnrollmentPlanner::new(cfg.policy))
        .with_default_grade(cfg.default_grade);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("serve") => {
            info!("=== Planificador de matrícula (API) ===");
            run_server(&cfg.bind, service).await?;
        }
        Some("plan") => {
            if args.len() < 3 {
                bail!("usage: enrollment-planner plan <registration_id> <section_id>...");
            }
            let report = service.process_enrollment(&args[1], &args[2..]);
            print!("{}", report);
        }
        Some("check") => {
            if args.len() != 3 {
                bail!("usage: enrollment-planner check <registration_id> <subject_code>");
            }
            print!("{}", service.check_eligibility(&args[1], &args[2]));
        }
        Some("student") => {
            if args.len() != 2 {
                bail!("usage: enrollment-planner student <registration_id>");
            }
            print!("{}", service.student_report(&args[1]));
        }
        Some(other) => bail!("unknown command '{}' (expected serve, plan, check or student)", other),
    }
    Ok(())
}
