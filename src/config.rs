// Configuración del servidor y del binario, leída del entorno (y de `.env`
// si existe).
use crate::algorithm::planner::{PlanningPolicy, DEFAULT_FINAL_GRADE};
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_CATALOG: &str = "data/catalog.json";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// PLANNER_BIND
    pub bind: String,
    /// PLANNER_CATALOG
    pub catalog_path: PathBuf,
    /// PLANNER_DEFAULT_GRADE
    pub default_grade: f64,
    /// PLANNER_POLICY
    pub policy: PlanningPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidGrade(String),
    InvalidPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGrade(v) => {
                write!(f, "PLANNER_DEFAULT_GRADE must be a number between 0.0 and 10.0, got '{}'", v)
            }
            ConfigError::InvalidPolicy(v) => {
                write!(f, "PLANNER_POLICY must be 'reject-both' or 'precedence', got '{}'", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            bind: DEFAULT_BIND.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG),
            default_grade: DEFAULT_FINAL_GRADE,
            policy: PlanningPolicy::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda inyectada.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = PlannerConfig::default();

        if let Some(bind) = non_empty("PLANNER_BIND") {
            cfg.bind = bind;
        }
        if let Some(path) = non_empty("PLANNER_CATALOG") {
            cfg.catalog_path = PathBuf::from(path);
        }
        if let Some(raw) = non_empty("PLANNER_DEFAULT_GRADE") {
            cfg.default_grade = match raw.parse::<f64>() {
                Ok(g) if (0.0..=10.0).contains(&g) => g,
                _ => return Err(ConfigError::InvalidGrade(raw)),
            };
        }
        if let Some(raw) = non_empty("PLANNER_POLICY") {
            cfg.policy = raw.parse().map_err(|_| ConfigError::InvalidPolicy(raw.clone()))?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_valores_por_defecto() {
        let cfg = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_valores_del_entorno() {
        let cfg = PlannerConfig::from_lookup(lookup(&[
            ("PLANNER_BIND", "0.0.0.0:9000"),
            ("PLANNER_DEFAULT_GRADE", "8.5"),
            ("PLANNER_POLICY", "precedence"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:9000");
        assert_eq!(cfg.default_grade, 8.5);
        assert_eq!(cfg.policy, PlanningPolicy::ResolveByPrecedence);
    }

    #[test]
    fn test_valores_invalidos() {
        assert_eq!(
            PlannerConfig::from_lookup(lookup(&[("PLANNER_DEFAULT_GRADE", "11")])),
            Err(ConfigError::InvalidGrade("11".to_string()))
        );
        assert!(matches!(
            PlannerConfig::from_lookup(lookup(&[("PLANNER_POLICY", "random")])),
            Err(ConfigError::InvalidPolicy(_))
        ));
    }
}
