//! Compiler configuration: caller-supplied fallbacks, optionally loaded from
//! ~/.ras2cal/config.yaml, merged with what a schedule declares about itself.
//!
//! Precedence, strongest first:
//! - semester start and end, title: caller settings, then the DSL, then a
//!   computed default;
//! - semester duration and lecture types: the DSL, then caller settings.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dsl::ast::Schedule;
use crate::dsl::error::CompileError;
use crate::dsl::names::split_camel_case;
use crate::model::LectureType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Fallback values supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub semester_start: Option<NaiveDate>,
    #[serde(default)]
    pub semester_end: Option<NaiveDate>,
    #[serde(default = "Settings::default_duration_weeks")]
    pub semester_duration_weeks: u32,
    #[serde(default)]
    pub semester_title: Option<String>,
    /// Start of the first slot, `HH:MM`.
    #[serde(default = "Settings::default_base_time")]
    pub base_time: String,
    /// Minutes per slot.
    #[serde(default = "Settings::default_slot_duration")]
    pub slot_duration: u32,
    #[serde(default = "Settings::default_slots_per_index")]
    pub slots_per_index: u32,
    /// Lecture types used when the source declares none of its own.
    #[serde(default = "Settings::default_lecture_types")]
    pub lecture_types: Vec<LectureType>,
}

impl Settings {
    /// Load settings from the standard path (~/.ras2cal/config.yaml).
    /// Returns None if the file doesn't exist or doesn't parse.
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        let content = std::fs::read_to_string(path).ok()?;
        Self::from_yaml_str(&content).ok()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn default_duration_weeks() -> u32 {
        15
    }

    fn default_base_time() -> String {
        "08:00".to_string()
    }

    fn default_slot_duration() -> u32 {
        30
    }

    fn default_slots_per_index() -> u32 {
        2
    }

    fn default_lecture_types() -> Vec<LectureType> {
        vec![
            LectureType::new("P", "Predavanje", 0),
            LectureType::new("V", "Vježbe", 1),
            LectureType::new("L", "Laboratorijske vježbe", 2),
            LectureType::new("T", "Tutorijal", 3),
            LectureType::new("N", "Nepoznato", 9),
        ]
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            semester_start: None,
            semester_end: None,
            semester_duration_weeks: Self::default_duration_weeks(),
            semester_title: None,
            base_time: Self::default_base_time(),
            slot_duration: Self::default_slot_duration(),
            slots_per_index: Self::default_slots_per_index(),
            lecture_types: Self::default_lecture_types(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ras2cal").join("config.yaml"))
}

/// Everything the compiler needs besides the schedule itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub semester_name: String,
    pub base_time: NaiveTime,
    pub slot_duration: u32,
    pub slots_per_index: u32,
    pub semester_start: NaiveDate,
    pub semester_end: NaiveDate,
    pub holidays: Vec<NaiveDate>,
    /// Merged lecture-type table keyed by code.
    pub lecture_types: IndexMap<String, LectureType>,
}

impl CompilerConfig {
    /// Merge caller settings with the schedule's own declarations.
    ///
    /// `today` supplies the year for the defaults used when neither side
    /// names a semester start or title.
    pub fn resolve(
        settings: &Settings,
        schedule: &Schedule,
        today: NaiveDate,
    ) -> Result<Self, CompileError> {
        let semester = &schedule.semester;

        let semester_start = match settings.semester_start.or(semester.start_date) {
            Some(date) => date,
            None => NaiveDate::from_ymd_opt(today.year(), 10, 1)
                .ok_or_else(|| CompileError::InvalidDate(today.to_string()))?,
        };

        let duration_weeks = semester
            .duration_weeks
            .unwrap_or(settings.semester_duration_weeks);

        let semester_end = match settings.semester_end.or(semester.end_date) {
            Some(date) => date,
            None => semester_start
                .checked_add_days(Days::new(u64::from(duration_weeks) * 7))
                .ok_or_else(|| {
                    CompileError::InvalidDate(format!("{semester_start} + {duration_weeks} weeks"))
                })?,
        };

        let semester_name = settings
            .semester_title
            .clone()
            .or_else(|| semester.name.as_deref().map(split_camel_case))
            .unwrap_or_else(|| format!("Semestar {}", today.year()));

        Ok(Self {
            semester_name,
            base_time: parse_clock(&settings.base_time)?,
            slot_duration: settings.slot_duration,
            slots_per_index: settings.slots_per_index,
            semester_start,
            semester_end,
            holidays: semester.holidays.clone(),
            lecture_types: merge_lecture_types(&settings.lecture_types, schedule),
        })
    }

    /// The lecture type for `code`, or a low-priority stand-in if unknown.
    pub fn lecture_type(&self, code: &str) -> LectureType {
        self.lecture_types
            .get(code)
            .cloned()
            .unwrap_or_else(|| LectureType::placeholder(code))
    }
}

/// Caller defaults, overridden by `je tip nastave` declarations, plus a
/// placeholder for every code a subject or assignment uses but nobody declares.
fn merge_lecture_types(
    defaults: &[LectureType],
    schedule: &Schedule,
) -> IndexMap<String, LectureType> {
    let mut merged: IndexMap<String, LectureType> = defaults
        .iter()
        .map(|lt| (lt.code.clone(), lt.clone()))
        .collect();

    for def in schedule.lecture_types.values() {
        merged.insert(
            def.code.clone(),
            LectureType::new(&def.code, &def.name, def.priority),
        );
    }

    let used_codes = schedule
        .subjects
        .values()
        .flat_map(|s| s.type_codes.iter())
        .chain(schedule.assignments.iter().map(|a| &a.type_code));
    for code in used_codes {
        if !code.is_empty() && !merged.contains_key(code) {
            merged.insert(code.clone(), LectureType::placeholder(code));
        }
    }

    merged
}

/// Parse a date given as `YYYY-MM-DD` or `DD.MM.YYYY`.
pub fn parse_date(text: &str) -> Result<NaiveDate, CompileError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d.%m.%Y"))
        .map_err(|_| CompileError::InvalidDate(text.to_string()))
}

/// Parse an `HH:MM` clock time.
pub fn parse_clock(text: &str) -> Result<NaiveTime, CompileError> {
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| CompileError::InvalidTime(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::Compiler;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 3, 15)
    }

    fn schedule(src: &str) -> Schedule {
        Compiler::parse(src).unwrap()
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.base_time, "08:00");
        assert_eq!(settings.slot_duration, 30);
        assert_eq!(settings.semester_duration_weeks, 15);
        assert_eq!(settings.lecture_types.len(), 5);
    }

    #[test]
    fn partial_yaml_settings() {
        let settings = Settings::from_yaml_str("slot_duration: 45\nsemester_start: 2025-09-29\n").unwrap();
        assert_eq!(settings.slot_duration, 45);
        assert_eq!(settings.semester_start, Some(date(2025, 9, 29)));
        assert_eq!(settings.base_time, "08:00");
        assert_eq!(settings.lecture_types.len(), 5);
    }

    #[test]
    fn yaml_lecture_types_replace_defaults() {
        let yaml = r#"
lecture_types:
  - code: P
    name: Lecture
    priority: 0
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.lecture_types, vec![LectureType::new("P", "Lecture", 0)]);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(Settings::from_yaml_str("slot_duration: [1, 2]").is_err());
    }

    #[test]
    fn load_missing_file_does_not_panic() {
        let _ = Settings::load();
    }

    #[test]
    fn settings_start_beats_dsl_start() {
        let s = schedule("Semestar pocinje 01.10.2026.");
        let settings = Settings {
            semester_start: Some(date(2026, 10, 5)),
            ..Settings::default()
        };
        let config = CompilerConfig::resolve(&settings, &s, today()).unwrap();
        assert_eq!(config.semester_start, date(2026, 10, 5));
    }

    #[test]
    fn dsl_start_used_when_settings_silent() {
        let s = schedule("Semestar pocinje 01.10.2026.");
        let config = CompilerConfig::resolve(&Settings::default(), &s, today()).unwrap();
        assert_eq!(config.semester_start, date(2026, 10, 1));
    }

    #[test]
    fn start_defaults_to_first_of_october() {
        let config = CompilerConfig::resolve(&Settings::default(), &Schedule::new(), today()).unwrap();
        assert_eq!(config.semester_start, date(2026, 10, 1));
        assert_eq!(config.semester_name, "Semestar 2026");
    }

    #[test]
    fn end_computed_from_dsl_duration() {
        let s = schedule("Semestar pocinje 29.09.2025.\nSemestar traje 2 sedmice.");
        let settings = Settings {
            semester_duration_weeks: 10,
            ..Settings::default()
        };
        let config = CompilerConfig::resolve(&settings, &s, today()).unwrap();
        assert_eq!(config.semester_end, date(2025, 10, 13));
    }

    #[test]
    fn end_computed_from_settings_duration() {
        let s = schedule("Semestar pocinje 29.09.2025.");
        let config = CompilerConfig::resolve(&Settings::default(), &s, today()).unwrap();
        assert_eq!(config.semester_end, date(2026, 1, 12));
    }

    #[test]
    fn explicit_end_wins_over_duration() {
        let s = schedule("Semestar pocinje 29.09.2025.\nSemestar zavrsava 23.01.2026.\nSemestar traje 2.");
        let config = CompilerConfig::resolve(&Settings::default(), &s, today()).unwrap();
        assert_eq!(config.semester_end, date(2026, 1, 23));
    }

    #[test]
    fn title_from_dsl_name_is_split() {
        let s = schedule("ZimskiSemestar2026 je semestar.");
        let config = CompilerConfig::resolve(&Settings::default(), &s, today()).unwrap();
        assert_eq!(config.semester_name, "Zimski Semestar 2026");
    }

    #[test]
    fn holidays_come_from_dsl() {
        let s = schedule("Semestar ima nenastavne dane 01.01.2026 07.01.2026.");
        let config = CompilerConfig::resolve(&Settings::default(), &s, today()).unwrap();
        assert_eq!(config.holidays, vec![date(2026, 1, 1), date(2026, 1, 7)]);
    }

    #[test]
    fn lecture_type_precedence() {
        let s = schedule(
            "P je tip nastave Lecture prioriteta 5.\n\
             xFizika je predmet.\n\
             Ana predaje qFizika tacno u terminu S1.",
        );
        let config = CompilerConfig::resolve(&Settings::default(), &s, today()).unwrap();
        let p = &config.lecture_types["P"];
        assert_eq!(p.name, "Lecture");
        assert_eq!(p.priority, 5);
        assert_eq!(config.lecture_types["V"].name, "Vježbe");
        assert_eq!(config.lecture_types["X"], LectureType::placeholder("X"));
        assert_eq!(config.lecture_types["Q"].priority, crate::model::UNKNOWN_TYPE_PRIORITY);
        assert_eq!(config.lecture_type("Z").name, "Z");
    }

    #[test]
    fn invalid_base_time_is_an_error() {
        let settings = Settings {
            base_time: "8h".to_string(),
            ..Settings::default()
        };
        let err = CompilerConfig::resolve(&settings, &Schedule::new(), today()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidTime(t) if t == "8h"));
    }

    #[test]
    fn parse_date_accepts_both_formats() {
        assert_eq!(parse_date("2025-09-29").unwrap(), date(2025, 9, 29));
        assert_eq!(parse_date("29.09.2025").unwrap(), date(2025, 9, 29));
        assert!(parse_date("29/09/2025").is_err());
    }
}
