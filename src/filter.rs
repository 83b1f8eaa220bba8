//! Assignment filtering by teacher, room, group or subject.
//!
//! Filtering happens on the parsed tree, before compilation, so event ids of
//! the filtered model count only the assignments that survive.

use regex::{Regex, RegexBuilder};

use crate::dsl::ast::{Assignment, Schedule};
use crate::dsl::error::CompileError;

/// Case-insensitive patterns; `None` means "don't filter on this".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleFilter {
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub group: Option<String>,
    pub subject: Option<String>,
}

impl ScheduleFilter {
    pub fn is_empty(&self) -> bool {
        self.teacher.is_none() && self.room.is_none() && self.group.is_none() && self.subject.is_none()
    }
}

struct Compiled {
    teacher: Option<Regex>,
    room: Option<Regex>,
    group: Option<Regex>,
    subject: Option<Regex>,
}

impl Compiled {
    fn new(filter: &ScheduleFilter) -> Result<Self, CompileError> {
        let build = |pattern: &Option<String>| -> Result<Option<Regex>, CompileError> {
            pattern
                .as_deref()
                .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
                .transpose()
                .map_err(CompileError::from)
        };
        Ok(Self {
            teacher: build(&filter.teacher)?,
            room: build(&filter.room)?,
            group: build(&filter.group)?,
            subject: build(&filter.subject)?,
        })
    }

    fn matches(&self, assignment: &Assignment) -> bool {
        if let Some(re) = &self.teacher {
            if !assignment.teacher_names.iter().any(|t| re.is_match(t)) {
                return false;
            }
        }
        if let Some(re) = &self.room {
            if !assignment.room_names.iter().any(|r| re.is_match(r)) {
                return false;
            }
        }
        if let Some(re) = &self.group {
            let flat = assignment
                .group_name_groups
                .iter()
                .map(|or_group| or_group.join(", "))
                .collect::<Vec<_>>()
                .join(", ");
            if !re.is_match(&flat) {
                return false;
            }
        }
        if let Some(re) = &self.subject {
            if !re.is_match(&assignment.subject) {
                return false;
            }
        }
        true
    }
}

/// A copy of `schedule` keeping only the assignments that match every active
/// pattern. Definitions and semester info are kept whole.
pub fn filter_schedule(schedule: &Schedule, filter: &ScheduleFilter) -> Result<Schedule, CompileError> {
    let compiled = Compiled::new(filter)?;
    let kept = schedule
        .assignments
        .iter()
        .filter(|a| compiled.matches(a))
        .cloned()
        .collect();
    Ok(schedule.with_assignments(kept))
}
