//! Semantic compiler — resolves a parsed [`Schedule`] into a [`ScheduleModel`].
//!
//! Builds entity lookups from the definitions, then turns every assignment
//! that names at least one slot into an [`Event`] with concrete clock times,
//! a first occurrence date and a weekly recurrence.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime};
use indexmap::IndexMap;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::model::{Event, Group, GroupTree, Person, Recurrence, Room, ScheduleModel, Subject};

use super::ast::*;
use super::error::CompileError;
use super::names::split_camel_case;

/// Maps slot ids to clock times.
pub struct SlotResolver<'a> {
    slots: &'a IndexMap<String, SlotDefinition>,
    base_time: NaiveTime,
    slot_duration: u32,
}

impl<'a> SlotResolver<'a> {
    pub fn new(schedule: &'a Schedule, config: &CompilerConfig) -> Self {
        Self {
            slots: &schedule.slots,
            base_time: config.base_time,
            slot_duration: config.slot_duration,
        }
    }

    /// Start time and length in minutes of one slot.
    ///
    /// Slot `n` starts `(n - 1) × slot_duration` minutes after the base time.
    /// A start outside the base day is an [`CompileError::InvalidTime`].
    pub fn resolve_time(&self, slot_id: &str) -> Result<(NaiveTime, u32), CompileError> {
        let slot = self
            .slots
            .get(slot_id)
            .ok_or_else(|| CompileError::UndefinedSlot(slot_id.to_string()))?;

        // Ordinal 0 lands one slot before the base time.
        let offset = (i64::from(slot.ordinal) - 1)
            .checked_mul(i64::from(self.slot_duration))
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                CompileError::InvalidTime(format!("slot '{slot_id}' offset is out of range"))
            })?;
        let (start, wrapped) = self.base_time.overflowing_add_signed(offset);
        if wrapped != 0 {
            let side = if wrapped < 0 { "before" } else { "past" };
            return Err(CompileError::InvalidTime(format!(
                "slot '{slot_id}' starts {side} midnight"
            )));
        }

        Ok((start, self.slot_duration))
    }

    /// Earliest start and latest end across `slot_ids`. None for an empty list.
    pub fn span(&self, slot_ids: &[String]) -> Result<Option<(NaiveTime, NaiveTime)>, CompileError> {
        let mut span: Option<(NaiveTime, NaiveTime)> = None;

        for id in slot_ids {
            let (start, minutes) = self.resolve_time(id)?;
            let length = Duration::try_minutes(i64::from(minutes)).ok_or_else(|| {
                CompileError::InvalidTime(format!("slot '{id}' length is out of range"))
            })?;
            let (end, wrapped) = start.overflowing_add_signed(length);
            if wrapped != 0 {
                return Err(CompileError::InvalidTime(format!(
                    "slot '{id}' ends past midnight"
                )));
            }
            span = Some(match span {
                Some((lo, hi)) => (lo.min(start), hi.max(end)),
                None => (start, end),
            });
        }

        Ok(span)
    }
}

/// Compile a parsed schedule into the enriched model.
pub fn compile_schedule(
    schedule: &Schedule,
    config: &CompilerConfig,
) -> Result<ScheduleModel, CompileError> {
    let mut model = ScheduleModel {
        semester_name: config.semester_name.clone(),
        start_date: config.semester_start,
        end_date: config.semester_end,
        holidays: config.holidays.clone(),
        base_time: config.base_time,
        slot_duration: config.slot_duration,
        slots_per_index: config.slots_per_index,
        people: IndexMap::new(),
        rooms: IndexMap::new(),
        groups: GroupTree::new(),
        subjects: IndexMap::new(),
        days: schedule
            .days
            .values()
            .map(|d| (d.name.clone(), d.ordinal))
            .collect(),
        lecture_types: config.lecture_types.clone(),
        events: Vec::new(),
    };

    build_lookups(schedule, config, &mut model);

    let resolver = SlotResolver::new(schedule, config);
    for assignment in &schedule.assignments {
        let id = format!("EV-{}", model.events.len() + 1);
        if let Some(event) = compile_assignment(id, assignment, schedule, config, &model, &resolver)? {
            model.events.push(event);
        }
    }

    debug!(
        events = model.events.len(),
        people = model.people.len(),
        rooms = model.rooms.len(),
        groups = model.groups.len(),
        "compiled schedule"
    );

    Ok(model)
}

fn build_lookups(schedule: &Schedule, config: &CompilerConfig, model: &mut ScheduleModel) {
    for teacher in schedule.teachers.values() {
        model.people.insert(
            teacher.name.clone(),
            Person::new(&teacher.name, split_camel_case(&teacher.name)),
        );
    }

    for room in schedule.rooms.values() {
        model.rooms.insert(room.name.clone(), Room::new(&room.name));
    }

    for subject in schedule.subjects.values() {
        let types = subject.type_codes.iter().map(|code| config.lecture_type(code));
        model.subjects.insert(
            subject.name.clone(),
            Subject::new(&subject.name, split_camel_case(&subject.name), types),
        );
    }

    // Create every group first so a sub-group may precede its parent in the source.
    for name in schedule.study_groups.keys().chain(schedule.subgroups.keys()) {
        model.groups.insert(Group::new(name));
    }
    for sub in schedule.subgroups.values() {
        if !model.groups.link(&sub.name, &sub.parent_name) {
            debug!(group = %sub.name, parent = %sub.parent_name, "parent group not defined");
        }
    }
}

fn compile_assignment(
    id: String,
    assignment: &Assignment,
    schedule: &Schedule,
    config: &CompilerConfig,
    model: &ScheduleModel,
    resolver: &SlotResolver<'_>,
) -> Result<Option<Event>, CompileError> {
    let Some((start_time, end_time)) = resolver.span(&assignment.slot_ids)? else {
        return Ok(None);
    };

    // `span` returned Some, so there is a first slot and it is defined.
    let first_slot = assignment
        .slot_ids
        .first()
        .and_then(|id| schedule.slots.get(id))
        .ok_or_else(|| CompileError::UndefinedSlot(assignment.slot_ids.join(" ")))?;
    let day = schedule
        .days
        .get(&first_slot.day_name)
        .ok_or_else(|| CompileError::UndefinedDay {
            day: first_slot.day_name.clone(),
            slot: first_slot.id.clone(),
        })?;

    let teachers = assignment
        .teacher_names
        .iter()
        .map(|name| match model.people.get(name) {
            Some(person) => person.clone(),
            None => {
                debug!(teacher = %name, "undeclared teacher");
                Person::new(name, split_camel_case(name))
            }
        })
        .collect();

    let rooms = assignment
        .room_names
        .iter()
        .map(|name| match model.rooms.get(name) {
            Some(room) => room.clone(),
            None => {
                debug!(room = %name, "undeclared room");
                Room::new(name)
            }
        })
        .collect();

    let groups = assignment
        .group_name_groups
        .iter()
        .flatten()
        .filter(|name| name.as_str() != ALL_GROUPS)
        .map(|name| match model.groups.get(name) {
            Some(group) => group.clone(),
            None => {
                debug!(group = %name, "undeclared group");
                Group::new(name)
            }
        })
        .collect();

    let lecture_type = config.lecture_type(&assignment.type_code);
    let subject = match model.subjects.get(&assignment.subject) {
        Some(subject) => subject.clone(),
        None => {
            debug!(subject = %assignment.subject, "undeclared subject");
            Subject::new(
                &assignment.subject,
                split_camel_case(&assignment.subject),
                [lecture_type.clone()],
            )
        }
    };

    Ok(Some(Event {
        id,
        subject,
        lecture_type,
        teachers,
        groups,
        rooms,
        day_name: day.name.clone(),
        start_time,
        end_time,
        first_date: first_occurrence(config.semester_start, day.ordinal)?,
        recurrence: Recurrence::weekly(
            assignment.recurrence_interval,
            config.semester_end,
            config.holidays.clone(),
        ),
    }))
}

/// The first date on or after `semester_start` falling on day `ordinal`
/// (Monday = 1).
fn first_occurrence(semester_start: NaiveDate, ordinal: u32) -> Result<NaiveDate, CompileError> {
    let day_index = i64::from(ordinal) - 1;
    let start_weekday = i64::from(semester_start.weekday().num_days_from_monday());
    let diff = (day_index - start_weekday).rem_euclid(7) as u64;
    semester_start
        .checked_add_days(Days::new(diff))
        .ok_or_else(|| CompileError::InvalidDate(semester_start.to_string()))
}
