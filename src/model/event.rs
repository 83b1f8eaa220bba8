//! Event data model: one recurring block of teaching with every reference
//! resolved.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

use crate::dsl::ast::date_key;

use super::entity::{LectureType, Person, Room, Subject};
use super::group::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    /// Weeks between occurrences, at least 1.
    pub interval: u32,
    /// Last day an occurrence may fall on.
    pub until: NaiveDate,
    /// Dates on which the event does not take place.
    pub exceptions: Vec<NaiveDate>,
}

impl Recurrence {
    pub fn weekly(interval: u32, until: NaiveDate, exceptions: Vec<NaiveDate>) -> Self {
        Self {
            frequency: Frequency::Weekly,
            interval: interval.max(1),
            until,
            exceptions,
        }
    }

    /// Exception dates as `YYYYMMDD` keys.
    pub fn exception_keys(&self) -> Vec<String> {
        self.exceptions.iter().map(|d| date_key(*d)).collect()
    }
}

/// A single compiled teaching block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// `EV-1`, `EV-2`, ... in assignment order.
    pub id: String,
    pub subject: Subject,
    pub lecture_type: LectureType,
    pub teachers: Vec<Person>,
    pub groups: Vec<Group>,
    pub rooms: Vec<Room>,
    pub day_name: String,
    #[serde(serialize_with = "serialize_clock")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_clock")]
    pub end_time: NaiveTime,
    /// First date on or after the semester start that falls on `day_name`.
    pub first_date: NaiveDate,
    pub recurrence: Recurrence,
}

impl Event {
    /// `HH:MM`
    pub fn start_time_str(&self) -> String {
        clock(self.start_time)
    }

    /// `HH:MM`
    pub fn end_time_str(&self) -> String {
        clock(self.end_time)
    }

    /// `HH:MM - HH:MM`
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start_time_str(), self.end_time_str())
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.first_date.and_time(self.start_time)
    }

    pub fn end_datetime(&self) -> NaiveDateTime {
        self.first_date.and_time(self.end_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn has_teacher(&self, id: &str) -> bool {
        self.teachers.iter().any(|p| p.id == id)
    }

    pub fn has_room(&self, id: &str) -> bool {
        self.rooms.iter().any(|r| r.id == id)
    }
}

pub(crate) fn clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub(crate) fn serialize_clock<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&clock(*time))
}
