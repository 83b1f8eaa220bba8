//! Abstract Syntax Tree for the timetable DSL.
//!
//! Every recognised sentence becomes one [`Statement`]; the parser folds them
//! into a [`Schedule`], the root aggregate that the compiler, exporters and
//! validators read.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;

/// Group name used when an assignment names no group: the block is for everyone.
pub const ALL_GROUPS: &str = "Svi";

/// Semester name used when an attribute sentence starts with the bare
/// `semestar` keyword instead of a declared name.
pub const DEFAULT_SEMESTER_NAME: &str = "Semestar";

/// `Ponedjeljak je dan broj 1.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDefinition {
    pub name: String,
    pub ordinal: u32,
}

/// `PO1 je termin broj 1 dana Ponedjeljak.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDefinition {
    pub id: String,
    pub day_name: String,
    pub ordinal: u32,
}

/// `ImePrezime je nastavnik.` The name is stored already split (`Ime Prezime`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherDefinition {
    pub name: String,
}

/// `pUvodUProgramiranje je predmet.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDefinition {
    pub name: String,
    pub type_codes: BTreeSet<String>,
}

/// `RI1 je odjeljenje.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyGroupDefinition {
    pub name: String,
}

/// `RI1oop-1 je grupa odjeljenja RI1.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGroupDefinition {
    pub name: String,
    pub parent_name: String,
}

/// `R0-01 je prostorija.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDefinition {
    pub name: String,
}

/// `Zimski2026 je semestar.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterDeclaration {
    pub name: String,
}

/// One semester attribute sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterAttribute {
    pub semester_name: String,
    pub value: SemesterValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemesterValue {
    /// `... pocinje 01.10.2026.`
    Start(NaiveDate),
    /// `... zavrsava 31.01.2027.`
    End(NaiveDate),
    /// `... traje 15 sedmica.`
    Duration(u32),
    /// `... ima nenastavne dane 01.01.2027 07.01.2027.`
    Holidays(Vec<NaiveDate>),
}

/// `P je tip nastave Predavanje prioriteta 0.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureTypeDefinition {
    pub code: String,
    pub name: String,
    pub priority: i32,
}

/// A teaching statement:
/// `Ana i Edin predaje pMatematika odjeljenju RI1 u prostoriji A1 tacno u terminu PO1 PO2.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Teacher names in source order, camel-split.
    pub teacher_names: Vec<String>,
    /// Subject identifier as written, including its type prefix.
    pub subject_raw: String,
    /// Subject display name derived from `subject_raw`.
    pub subject: String,
    pub type_code: String,
    /// Each inner list is one OR-group of groups taught together.
    pub group_name_groups: Vec<Vec<String>>,
    pub room_names: Vec<String>,
    pub slot_ids: Vec<String>,
    pub frequency_hint: Option<u32>,
    /// Weeks between occurrences; at least 1.
    pub recurrence_interval: u32,
    /// Trailing tokens the parser could not place, kept verbatim.
    pub unrecognized_tokens: Vec<String>,
}

/// One parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Day(DayDefinition),
    Slot(SlotDefinition),
    Teacher(TeacherDefinition),
    Subject(SubjectDefinition),
    StudyGroup(StudyGroupDefinition),
    SubGroup(SubGroupDefinition),
    Room(RoomDefinition),
    Semester(SemesterDeclaration),
    SemesterAttribute(SemesterAttribute),
    LectureType(LectureTypeDefinition),
    Assignment(Assignment),
}

/// Semester metadata consolidated from declaration and attribute sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterInfo {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub duration_weeks: Option<u32>,
    pub holidays: Vec<NaiveDate>,
}

impl SemesterInfo {
    /// Holidays as 8-digit `YYYYMMDD` keys.
    pub fn holiday_keys(&self) -> Vec<String> {
        self.holidays.iter().map(|d| date_key(*d)).collect()
    }
}

/// Canonical 8-digit key of a date, `YYYYMMDD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The root of the raw tree.
///
/// Definition maps keep insertion order so a later re-emission can reproduce
/// the source ordering; assignment order determines event identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub days: IndexMap<String, DayDefinition>,
    pub slots: IndexMap<String, SlotDefinition>,
    pub teachers: IndexMap<String, TeacherDefinition>,
    pub subjects: IndexMap<String, SubjectDefinition>,
    pub study_groups: IndexMap<String, StudyGroupDefinition>,
    pub subgroups: IndexMap<String, SubGroupDefinition>,
    pub rooms: IndexMap<String, RoomDefinition>,
    pub lecture_types: IndexMap<String, LectureTypeDefinition>,
    pub assignments: Vec<Assignment>,
    pub semester: SemesterInfo,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one statement into the aggregate.
    pub fn add(&mut self, statement: Statement) {
        match statement {
            Statement::Day(node) => {
                self.days.insert(node.name.clone(), node);
            }
            Statement::Slot(node) => {
                self.slots.insert(node.id.clone(), node);
            }
            Statement::Teacher(node) => {
                self.teachers.insert(node.name.clone(), node);
            }
            Statement::Subject(node) => match self.subjects.get_mut(&node.name) {
                // A subject is declared once per lecture type it supports.
                Some(existing) => existing.type_codes.extend(node.type_codes),
                None => {
                    self.subjects.insert(node.name.clone(), node);
                }
            },
            Statement::StudyGroup(node) => {
                self.study_groups.insert(node.name.clone(), node);
            }
            Statement::SubGroup(node) => {
                self.subgroups.insert(node.name.clone(), node);
            }
            Statement::Room(node) => {
                self.rooms.insert(node.name.clone(), node);
            }
            Statement::Semester(node) => self.semester.name = Some(node.name),
            Statement::SemesterAttribute(node) => match node.value {
                SemesterValue::Start(date) => self.semester.start_date = Some(date),
                SemesterValue::End(date) => self.semester.end_date = Some(date),
                SemesterValue::Duration(weeks) => self.semester.duration_weeks = Some(weeks),
                SemesterValue::Holidays(dates) => self.semester.holidays.extend(dates),
            },
            Statement::LectureType(node) => {
                self.lecture_types.insert(node.code.clone(), node);
            }
            Statement::Assignment(node) => self.assignments.push(node),
        }
    }

    /// A schedule with the same definitions and semester info but a
    /// different assignment list.
    pub fn with_assignments(&self, assignments: Vec<Assignment>) -> Self {
        Self {
            days: self.days.clone(),
            slots: self.slots.clone(),
            teachers: self.teachers.clone(),
            subjects: self.subjects.clone(),
            study_groups: self.study_groups.clone(),
            subgroups: self.subgroups.clone(),
            rooms: self.rooms.clone(),
            lecture_types: self.lecture_types.clone(),
            assignments,
            semester: self.semester.clone(),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Schedule(days={}, slots={}, teachers={}, subjects={}, study_groups={}, \
             subgroups={}, rooms={}, lecture_types={}, assignments={})",
            self.days.len(),
            self.slots.len(),
            self.teachers.len(),
            self.subjects.len(),
            self.study_groups.len(),
            self.subgroups.len(),
            self.rooms.len(),
            self.lecture_types.len(),
            self.assignments.len()
        )
    }
}
