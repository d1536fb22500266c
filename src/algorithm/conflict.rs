// Detección de choques de horario y resolución por precedencia de tipo.
use crate::errors::EnrollmentError;
use crate::models::{ClassGroup, Schedule};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Par de secciones que chocan (cada par no ordenado aparece una vez).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictPair {
    pub first: String,
    pub first_subject: String,
    pub second: String,
    pub second_subject: String,
}

impl ConflictPair {
    pub fn involves(&self, section_id: &str) -> bool {
        self.first == section_id || self.second == section_id
    }

    /// El otro extremo del par, si `section_id` participa.
    pub fn other(&self, section_id: &str) -> Option<&str> {
        if self.first == section_id {
            Some(&self.second)
        } else if self.second == section_id {
            Some(&self.first)
        } else {
            None
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} ({}) conflicts with {} ({})",
            self.first_subject, self.first, self.second_subject, self.second
        )
    }
}

/// Comparación O(n²) de todas las secciones entre sí.
pub fn find_schedule_conflicts(sections: &[&ClassGroup]) -> Vec<ConflictPair> {
    let mut out = Vec::new();
    for i in 0..sections.len() {
        for j in (i + 1)..sections.len() {
            let (a, b) = (sections[i], sections[j]);
            if a.conflicts_with(b) {
                out.push(ConflictPair {
                    first: a.id().to_string(),
                    first_subject: a.subject().code().to_string(),
                    second: b.id().to_string(),
                    second_subject: b.subject().code().to_string(),
                });
            }
        }
    }
    out
}

/// Resultado de agrupar por franja exacta sin abortar en empates.
#[derive(Debug, Default)]
pub struct PrecedenceResolution<'a> {
    /// Secciones que sobreviven, en el orden de entrada.
    pub kept: Vec<&'a ClassGroup>,
    /// (perdedora, ganadora)
    pub displaced: Vec<(&'a ClassGroup, &'a ClassGroup)>,
    /// Grupos empatados en la precedencia mínima.
    pub ties: Vec<Vec<&'a ClassGroup>>,
}

/// Agrupa las secciones con exactamente las mismas franjas; en cada grupo
/// gana la de menor valor de precedencia. Los grupos empatados no aportan
/// ninguna sección a `kept`.
pub fn partition_by_precedence<'a>(sections: &[&'a ClassGroup]) -> PrecedenceResolution<'a> {
    let mut order: Vec<Vec<Schedule>> = Vec::new();
    let mut groups: HashMap<Vec<Schedule>, Vec<&'a ClassGroup>> = HashMap::new();
    for &s in sections {
        let key = s.slot_key();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(s);
    }

    let mut res = PrecedenceResolution::default();
    let mut survivors: Vec<&'a ClassGroup> = Vec::new();
    for key in order.iter() {
        let group = &groups[key];
        if group.len() == 1 {
            survivors.push(group[0]);
            continue;
        }
        let best = group.iter().map(|s| s.subject().precedence()).min().unwrap_or(u8::MAX);
        let winners: Vec<&'a ClassGroup> =
            group.iter().copied().filter(|s| s.subject().precedence() == best).collect();
        if winners.len() > 1 {
            debug!(
                "empate de precedencia {} entre {:?}",
                best,
                winners.iter().map(|s| s.id()).collect::<Vec<_>>()
            );
            res.ties.push(winners);
            continue;
        }
        let winner = winners[0];
        survivors.push(winner);
        for s in group.iter().copied().filter(|s| s.id() != winner.id()) {
            res.displaced.push((s, winner));
        }
    }

    // respetar el orden original de entrada
    res.kept = sections
        .iter()
        .copied()
        .filter(|s| survivors.iter().any(|k| k.id() == s.id()))
        .collect();
    res
}

/// Versión estricta: un empate en la precedencia mínima es un conflicto
/// irresoluble y devuelve `ScheduleConflict` con todas las secciones empatadas.
pub fn resolve_by_precedence<'a>(sections: &[&'a ClassGroup]) -> Result<Vec<&'a ClassGroup>, EnrollmentError> {
    let res = partition_by_precedence(sections);
    if let Some(tie) = res.ties.first() {
        let ids: Vec<String> = tie.iter().map(|s| s.id().to_string()).collect();
        let kind = tie[0].subject().kind().label();
        return Err(EnrollmentError::ScheduleConflict {
            detail: format!("same slot and same precedence ({})", kind),
            sections: ids,
        });
    }
    Ok(res.kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Subject, SubjectKind};
    use std::sync::Arc;

    fn group(id: &str, kind: SubjectKind, slot: &str) -> ClassGroup {
        let subject = Arc::new(Subject::new(id, id, 4, kind).unwrap());
        ClassGroup::new(format!("{}-01", id), subject, 30, vec![Schedule::parse(slot).unwrap()]).unwrap()
    }

    #[test]
    fn test_pares_reportados_una_vez() {
        let a = group("A", SubjectKind::Required, "MO 08:00-10:00");
        let b = group("B", SubjectKind::Required, "MO 09:00-11:00");
        let c = group("C", SubjectKind::Required, "MO 08:00-10:00");
        let d = group("D", SubjectKind::Required, "TU 08:00-10:00");
        let pairs = find_schedule_conflicts(&[&a, &b, &c, &d]);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| !p.involves("D-01")));
        assert_eq!(pairs[0].other("A-01"), Some("B-01"));
        assert_eq!(pairs[0].describe(), "A (A-01) conflicts with B (B-01)");
    }

    #[test]
    fn test_particion_registra_ganadora() {
        let req = group("REQ", SubjectKind::Required, "MO 08:00-10:00");
        let opt = group("OPT", SubjectKind::Optional, "MO 08:00-10:00");
        let res = partition_by_precedence(&[&opt, &req]);
        assert_eq!(res.kept.len(), 1);
        assert_eq!(res.kept[0].id(), "REQ-01");
        assert_eq!(res.displaced.len(), 1);
        assert_eq!(res.displaced[0].0.id(), "OPT-01");
        assert_eq!(res.displaced[0].1.id(), "REQ-01");
        assert!(res.ties.is_empty());
    }
}
