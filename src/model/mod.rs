//! The compiled schedule model that renderers read.
//!
//! The compiler builds a [`ScheduleModel`] once; everything downstream treats
//! it as read-only.

pub mod entity;
pub mod event;
pub mod group;

pub use entity::{LectureType, Person, Room, Subject, UNKNOWN_TYPE_PRIORITY};
pub use event::{Event, Frequency, Recurrence};
pub use group::{Group, GroupTree};

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::Serialize;

use event::serialize_clock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleModel {
    pub semester_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holidays: Vec<NaiveDate>,

    #[serde(serialize_with = "serialize_clock")]
    pub base_time: NaiveTime,
    /// Minutes per slot.
    pub slot_duration: u32,
    pub slots_per_index: u32,

    pub people: IndexMap<String, Person>,
    pub rooms: IndexMap<String, Room>,
    pub groups: GroupTree,
    pub subjects: IndexMap<String, Subject>,
    /// Day name → day ordinal (Monday = 1).
    pub days: IndexMap<String, u32>,
    pub lecture_types: IndexMap<String, LectureType>,

    pub events: Vec<Event>,
}

impl ScheduleModel {
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn events_for_teacher<'a>(&'a self, person_id: &'a str) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |e| e.has_teacher(person_id))
    }

    pub fn events_for_room<'a>(&'a self, room_id: &'a str) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |e| e.has_room(room_id))
    }

    /// Events a group attends: its own, those of any ancestor group, and
    /// those addressed to everyone (no explicit group).
    pub fn events_for_group(&self, group_id: &str) -> Vec<&Event> {
        let mut relevant: HashSet<&str> = self
            .groups
            .ancestors(group_id)
            .into_iter()
            .map(|g| g.id.as_str())
            .collect();
        relevant.insert(group_id);

        self.events
            .iter()
            .filter(|e| e.groups.is_empty() || e.groups.iter().any(|g| relevant.contains(g.id.as_str())))
            .collect()
    }

    /// Lecture types ordered for display (priority, then code).
    pub fn lecture_types_by_priority(&self) -> Vec<&LectureType> {
        let mut types: Vec<_> = self.lecture_types.values().collect();
        types.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.code.cmp(&b.code)));
        types
    }
}
