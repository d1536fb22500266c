use serde::{Deserialize, Serialize};
use crate::algorithm::planner::PlanningPolicy;
use crate::catalog::Catalog;

/// Petición de planificación.
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "registration_id": "202365082A",
///   "sections": ["MAT156-01", "Física I"],
///   "policy": "reject-both"
/// }
/// ```
///
/// # Campos:
/// - `registration_id`: Matrícula del estudiante (requerido)
/// - `sections`: Ids de sección o nombres de asignatura; los nombres se
///   resuelven contra el catálogo a una sección con cupo
/// - `policy`: `reject-both` o `precedence` (opcional, por defecto la del servidor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
	pub registration_id: String,
	pub sections: Vec<String>,
	#[serde(default)]
	pub policy: Option<PlanningPolicy>,
}

/// `{"registration_id": "202365082A", "grade": 8.0}`; sin `grade` se usa la
/// nota por defecto del servidor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeRequest {
	pub registration_id: String,
	#[serde(default)]
	pub grade: Option<f64>,
}

/// `{"sections": ["DCC025-01", "ART001-01"]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
	pub sections: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityQuery {
	pub student: String,
	pub subject: String,
}

pub fn parse_plan_request(json_str: &str) -> Result<PlanRequest, Box<dyn std::error::Error>> {
	let req = serde_json::from_str::<PlanRequest>(json_str)?;
	if req.registration_id.trim().is_empty() {
		return Err("registration_id is required".into());
	}
	Ok(req)
}

/// Parsea la petición y resuelve los nombres de asignatura usando el catálogo.
pub fn parse_and_resolve_sections(json_str: &str, catalog: &Catalog) -> Result<PlanRequest, Box<dyn std::error::Error>> {
	parse_and_resolve_sections_with_resolver(json_str, |name| section_for_subject_name(catalog, name))
}

/// Versión parametrizable para pruebas: `resolver` intenta mapear un nombre
/// de asignatura a un id de sección.
pub fn parse_and_resolve_sections_with_resolver<F>(json_str: &str, resolver: F) -> Result<PlanRequest, Box<dyn std::error::Error>>
where
	F: Fn(&str) -> Option<String>,
{
	let req = parse_plan_request(json_str)?;
	Ok(resolve_sections_with_resolver(req, resolver))
}

/// Resuelve las entradas de una `PlanRequest` ya parseada. Las entradas que
/// no se resuelven se dejan tal cual (el servicio las reportará como
/// sección desconocida, con sugerencia).
pub fn resolve_sections_with_resolver<F>(mut req: PlanRequest, resolver: F) -> PlanRequest
where
	F: Fn(&str) -> Option<String>,
{
	// heurística: si la cadena contiene un dígito la consideramos id
	fn looks_like_id(s: &str) -> bool {
		s.chars().any(|c| c.is_ascii_digit())
	}

	req.sections = req
		.sections
		.into_iter()
		.map(|entry| {
			let entry = entry.trim().to_string();
			if looks_like_id(&entry) {
				return entry;
			}
			resolver(&entry).unwrap_or(entry)
		})
		.collect();
	req
}

/// Primera sección con cupo de la asignatura cuyo nombre coincide (o la
/// primera sección, si todas están llenas).
pub fn section_for_subject_name(catalog: &Catalog, name: &str) -> Option<String> {
	let subject = catalog.subject_by_name(name)?;
	let sections = catalog.sections_for_subject(subject.code());
	sections
		.iter()
		.find(|s| s.has_available_slots())
		.or_else(|| sections.first())
		.map(|s| s.id().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_plan_request_con_politica() {
		let json_data = r#"
		{
			"registration_id": "202365082A",
			"sections": ["MAT156-01", "FIS073-01"],
			"policy": "precedence"
		}
		"#;
		let req = parse_plan_request(json_data).expect("Debe parsear la petición");
		assert_eq!(req.registration_id, "202365082A");
		assert_eq!(req.sections, vec!["MAT156-01", "FIS073-01"]);
		assert_eq!(req.policy, Some(PlanningPolicy::ResolveByPrecedence));
	}

	#[test]
	fn test_parse_plan_request_sin_matricula() {
		assert!(parse_plan_request(r#"{"registration_id": "  ", "sections": []}"#).is_err());
		assert!(parse_plan_request(r#"{"sections": ["A-01"]}"#).is_err());
	}

	#[test]
	fn test_resolver_nombres_con_mock() {
		let json_data = r#"
		{
			"registration_id": "202365082A",
			"sections": ["Cálculo II", "DCC025-01", "Asignatura Fantasma"]
		}
		"#;
		let req = parse_and_resolve_sections_with_resolver(json_data, |name| {
			if name == "Cálculo II" { Some("MAT156-01".to_string()) } else { None }
		})
		.expect("Debe resolver");
		assert_eq!(req.sections, vec!["MAT156-01", "DCC025-01", "Asignatura Fantasma"]);
		assert!(req.policy.is_none());
	}

	#[test]
	fn test_finalize_request_grade_opcional() {
		let req: FinalizeRequest = serde_json::from_str(r#"{"registration_id": "X"}"#).unwrap();
		assert_eq!(req.grade, None);
	}
}
