//! Resolved entities referenced by events.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Priority given to lecture types that are used but never declared, so they
/// sort after every declared type.
pub const UNKNOWN_TYPE_PRIORITY: i32 = 99;

/// A teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    /// Key used by assignments.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: String,
    pub name: String,
}

impl Room {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// A category of teaching activity (lecture, exercise, lab, ...).
///
/// Two lecture types are equal when their codes are equal; name and priority
/// are presentation details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureType {
    pub code: String,
    pub name: String,
    /// Display order, lower first.
    pub priority: i32,
}

impl LectureType {
    pub fn new(code: impl Into<String>, name: impl Into<String>, priority: i32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            priority,
        }
    }

    /// Stand-in for a code that is referenced but declared nowhere.
    pub fn placeholder(code: &str) -> Self {
        Self::new(code, code, UNKNOWN_TYPE_PRIORITY)
    }
}

impl PartialEq for LectureType {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for LectureType {}

impl Hash for LectureType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Supported lecture types, ordered by priority then code, no duplicates.
    pub types: Vec<LectureType>,
}

impl Subject {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        types: impl IntoIterator<Item = LectureType>,
    ) -> Self {
        let mut subject = Self {
            id: id.into(),
            name: name.into(),
            types: Vec::new(),
        };
        for lecture_type in types {
            subject.add_type(lecture_type);
        }
        subject
    }

    pub fn add_type(&mut self, lecture_type: LectureType) {
        if self.types.contains(&lecture_type) {
            return;
        }
        self.types.push(lecture_type);
        self.types
            .sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.code.cmp(&b.code)));
    }

    pub fn has_type(&self, code: &str) -> bool {
        self.types.iter().any(|t| t.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lecture_type_equality_is_by_code() {
        let a = LectureType::new("P", "Predavanje", 0);
        let b = LectureType::new("P", "Lecture", 5);
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn placeholder_sorts_last() {
        let lt = LectureType::placeholder("X");
        assert_eq!(lt.name, "X");
        assert_eq!(lt.priority, UNKNOWN_TYPE_PRIORITY);
        assert_eq!(lt.code, "X");
    }

    #[test]
    fn subject_types_are_ordered_and_unique() {
        let subject = Subject::new(
            "Matematika",
            "Matematika",
            [
                LectureType::new("L", "Lab", 2),
                LectureType::new("P", "Predavanje", 0),
                LectureType::new("L", "Lab", 2),
            ],
        );
        let codes: Vec<_> = subject.types.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["P", "L"]);
        assert!(subject.has_type("L"));
        assert!(!subject.has_type("V"));
    }

    #[test]
    fn room_name_defaults_to_id() {
        let room = Room::new("A1");
        assert_eq!(room.name, "A1");
    }
}
