//! Token types for the timetable DSL lexer.

use std::fmt;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched lexeme, exactly as written in the source.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// The kind of token.
///
/// Multi-word keyword phrases are single tokens; comments, separators and
/// newlines are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Assignment markers
    Teaches,
    AtSlots,
    ToGroups,
    InRoom,

    // Definition phrases ("X je ...")
    IsDay,
    IsSlot,
    IsTeacher,
    IsSubject,
    IsSubGroup,
    IsStudyGroup,
    IsRoom,
    IsLectureType,
    Is,

    // Semester
    Lasts,
    Has,
    NonTeaching,
    Semester,
    Starts,
    Ends,

    // Recurrence
    Every,
    WeeksPlural,
    Weeks,

    // Day words
    OfDay,
    Days,

    Priority,
    And,

    // Literals
    Date,
    Number,
    Ident,

    Dot,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
