// Franja horaria semanal: día + intervalo en minutos desde medianoche.
use crate::errors::InvalidArgument;
use serde::Serialize;
use std::fmt;

/// Minutos de un día; `end` puede valer exactamente este valor.
pub const DAY_MINUTES: u32 = 1440;

const DAY_NAMES: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Schedule {
    day_of_week: u8,
    start: u32,
    end: u32,
}

impl Schedule {
    /// `day_of_week`: 1 = lunes ... 7 = domingo. `start`/`end` en minutos.
    pub fn new(day_of_week: u8, start: u32, end: u32) -> Result<Schedule, InvalidArgument> {
        if !(1..=7).contains(&day_of_week) {
            return Err(InvalidArgument::DayOutOfRange(day_of_week));
        }
        if start >= end || end > DAY_MINUTES {
            return Err(InvalidArgument::InvalidInterval { start, end });
        }
        Ok(Schedule { day_of_week, start, end })
    }

    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    /// Mismo día e intervalos abiertos que se solapan. Bloques contiguos
    /// (end == start del otro) no chocan.
    pub fn conflicts(&self, other: &Schedule) -> bool {
        if self.day_of_week != other.day_of_week {
            return false;
        }
        self.start < other.end && other.start < self.end
    }

    /// Parsea una franja con un único día, p.ej. "TU 14:00-16:00".
    pub fn parse(text: &str) -> Result<Schedule, InvalidArgument> {
        let mut all = Schedule::parse_many(text)?;
        if all.len() != 1 {
            return Err(InvalidArgument::UnparseableSchedule(text.to_string()));
        }
        Ok(all.remove(0))
    }

    /// Parsea una franja con uno o más días que comparten horario:
    /// "MO WE 08:30-10:00" -> [(1, 510, 600), (3, 510, 600)]
    pub fn parse_many(text: &str) -> Result<Vec<Schedule>, InvalidArgument> {
        let unparseable = || InvalidArgument::UnparseableSchedule(text.to_string());
        let norm = text.trim().replace('.', ":").to_uppercase();
        let parts: Vec<&str> = norm.split_whitespace().collect();
        let (time_tok, day_toks) = match parts.split_last() {
            Some((t, d)) if !d.is_empty() => (*t, d),
            _ => return Err(unparseable()),
        };
        let (a, b) = time_tok.split_once('-').ok_or_else(unparseable)?;
        let start = to_minutes(a).ok_or_else(unparseable)?;
        let end = to_minutes(b).ok_or_else(unparseable)?;

        let mut out = Vec::with_capacity(day_toks.len());
        for tok in day_toks {
            let day = parse_day(tok).ok_or_else(unparseable)?;
            out.push(Schedule::new(day, start, end)?);
        }
        Ok(out)
    }
}

fn to_minutes(t: &str) -> Option<u32> {
    let (hh, mm) = t.trim().split_once(':')?;
    let hh = hh.parse::<u32>().ok()?;
    let mm = mm.parse::<u32>().ok()?;
    if mm >= 60 {
        return None;
    }
    hh.checked_mul(60)?.checked_add(mm)
}

fn parse_day(tok: &str) -> Option<u8> {
    if let Ok(n) = tok.parse::<u8>() {
        return Some(n);
    }
    let prefix: String = tok.chars().take(2).collect();
    DAY_NAMES
        .iter()
        .position(|d| *d == prefix)
        .map(|i| (i + 1) as u8)
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = DAY_NAMES
            .get(usize::from(self.day_of_week.saturating_sub(1)))
            .copied()
            .unwrap_or("??");
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            day,
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basico() {
        let s = Schedule::parse("TU 14:00-16:00").unwrap();
        assert_eq!(s.day_of_week(), 2);
        assert_eq!(s.start(), 840);
        assert_eq!(s.end(), 960);
        assert_eq!(s.to_string(), "TU 14:00-16:00");
    }

    #[test]
    fn test_parse_varios_dias() {
        let v = Schedule::parse_many("mon wed 08:30-10:00").unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].day_of_week(), 1);
        assert_eq!(v[1].day_of_week(), 3);
        assert_eq!(v[1].start(), 510);
        assert!(Schedule::parse("MO WE 08:30-10:00").is_err());
    }

    #[test]
    fn test_parse_invalidos() {
        assert!(Schedule::parse("08:00-10:00").is_err());
        assert!(Schedule::parse("XX 08:00-10:00").is_err());
        assert!(Schedule::parse("MO 10:00-08:00").is_err());
        assert!(Schedule::parse("MO 08:75-10:00").is_err());
        // horas enormes no deben desbordar el cálculo de minutos
        assert!(Schedule::parse("MO 99999999:00-10:00").is_err());
        assert!(Schedule::parse("MO 08:00-4294967295:00").is_err());
    }

    #[test]
    fn test_limites_de_construccion() {
        assert_eq!(Schedule::new(0, 0, 10), Err(InvalidArgument::DayOutOfRange(0)));
        assert_eq!(Schedule::new(8, 0, 10), Err(InvalidArgument::DayOutOfRange(8)));
        assert!(Schedule::new(1, 10, 10).is_err());
        assert!(Schedule::new(1, 0, DAY_MINUTES + 1).is_err());
        assert!(Schedule::new(7, 0, DAY_MINUTES).is_ok());
    }

    #[test]
    fn test_conflicto_y_adyacencia() {
        let a = Schedule::new(1, 480, 600).unwrap();
        let b = Schedule::new(1, 540, 660).unwrap();
        let c = Schedule::new(1, 600, 720).unwrap();
        let d = Schedule::new(2, 480, 600).unwrap();
        assert!(a.conflicts(&b) && b.conflicts(&a));
        // 08:00-10:00 y 10:00-12:00 no chocan (límite)
        assert!(!a.conflicts(&c));
        assert!(!a.conflicts(&d));
    }
}
