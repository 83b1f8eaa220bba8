//! Parser for the timetable DSL.
//!
//! Each sentence is matched by one of a fixed list of statement recognizers,
//! tried in order at the current position. A recognizer is ordinary
//! `Option`-returning code: it bails out with `?` as soon as the tokens stop
//! fitting its shape, and [`Parser::attempt`] rewinds the cursor so the next
//! recognizer sees the same tokens. When no recognizer matches, the parser
//! records a [`Diagnostic`], skips one token and carries on; a malformed
//! sentence never aborts the whole source.

use chrono::NaiveDate;
use tracing::warn;

use super::ast::*;
use super::error::Diagnostic;
use super::names::{normalize_room, split_camel_case, split_subject};
use super::token::{Token, TokenKind};

type Recognizer = fn(&mut Parser) -> Option<Statement>;

/// Statement recognizers in matching order. Shapes that share a prefix with a
/// shorter shape come first.
const RECOGNIZERS: &[Recognizer] = &[
    Parser::semester_declaration,
    Parser::semester_attribute,
    Parser::day_definition,
    Parser::slot_definition,
    Parser::teacher_definition,
    Parser::subject_definition,
    Parser::sub_group_definition,
    Parser::study_group_definition,
    Parser::room_definition,
    Parser::lecture_type_definition,
    Parser::assignment,
];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Schedule {
        let mut schedule = Schedule::new();

        while let Some(token) = self.peek(0).cloned() {
            match self.parse_statement() {
                Some(statement) => schedule.add(statement),
                None => {
                    let diagnostic = Diagnostic {
                        line: token.line,
                        text: token.text,
                        kind: token.kind,
                    };
                    warn!("{diagnostic}");
                    self.diagnostics.push(diagnostic);
                    self.pos += 1;
                }
            }
        }

        schedule
    }

    /// Tokens skipped during [`Parser::parse`], in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        RECOGNIZERS
            .iter()
            .find_map(|recognize| self.attempt(*recognize))
    }

    /// Run `recognize`; if it does not match, put the cursor back where it was.
    fn attempt<T>(&mut self, recognize: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let result = recognize(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    // ------------------------------------------------------------------
    // Semester
    // ------------------------------------------------------------------

    /// `Name je semestar.`
    fn semester_declaration(&mut self) -> Option<Statement> {
        let name = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::Is)?;
        self.eat(TokenKind::Semester)?;
        self.terminator()?;
        Some(Statement::Semester(SemesterDeclaration { name }))
    }

    /// `Name|semestar pocinje DATE.` / `zavrsava DATE.` / `traje N [sedmica].` /
    /// `ima nenastavne [dane] DATE DATE ...`
    fn semester_attribute(&mut self) -> Option<Statement> {
        let subject = self.eat_any(&[TokenKind::Ident, TokenKind::Semester])?;
        let semester_name = if subject.is(TokenKind::Ident) {
            subject.text
        } else {
            DEFAULT_SEMESTER_NAME.to_string()
        };

        let value = match self.advance()?.kind {
            TokenKind::Starts => SemesterValue::Start(self.date()?),
            TokenKind::Ends => SemesterValue::End(self.date()?),
            TokenKind::Lasts => {
                let weeks = self.number()?;
                self.eat_any(&[TokenKind::Weeks, TokenKind::WeeksPlural]);
                SemesterValue::Duration(weeks)
            }
            TokenKind::Has => {
                self.eat(TokenKind::NonTeaching)?;
                self.eat_any(&[TokenKind::OfDay, TokenKind::Days]);
                let mut holidays = Vec::new();
                while !self.at_terminator() {
                    holidays.push(self.date()?);
                }
                SemesterValue::Holidays(holidays)
            }
            _ => return None,
        };

        self.terminator()?;
        Some(Statement::SemesterAttribute(SemesterAttribute {
            semester_name,
            value,
        }))
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    /// `Ponedjeljak je dan broj 1.`
    fn day_definition(&mut self) -> Option<Statement> {
        let name = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsDay)?;
        let ordinal = self.number()?;
        self.terminator()?;
        Some(Statement::Day(DayDefinition { name, ordinal }))
    }

    /// `PO1 je termin broj 1 dana Ponedjeljak.`
    fn slot_definition(&mut self) -> Option<Statement> {
        let id = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsSlot)?;
        let ordinal = self.number()?;
        self.eat(TokenKind::OfDay)?;
        let day_name = self.eat(TokenKind::Ident)?.text;
        self.terminator()?;
        Some(Statement::Slot(SlotDefinition {
            id,
            day_name,
            ordinal,
        }))
    }

    /// `ImePrezime je nastavnik.`
    fn teacher_definition(&mut self) -> Option<Statement> {
        let raw = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsTeacher)?;
        self.terminator()?;
        Some(Statement::Teacher(TeacherDefinition {
            name: split_camel_case(&raw),
        }))
    }

    /// `pUvodUProgramiranje je predmet.`
    fn subject_definition(&mut self) -> Option<Statement> {
        let raw = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsSubject)?;
        self.terminator()?;
        let (name, code) = split_subject(&raw);
        Some(Statement::Subject(SubjectDefinition {
            name,
            type_codes: [code].into(),
        }))
    }

    /// `RI1oop-1 je grupa odjeljenja RI1.`
    fn sub_group_definition(&mut self) -> Option<Statement> {
        let name = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsSubGroup)?;
        let parent_name = self.eat(TokenKind::Ident)?.text;
        self.terminator()?;
        Some(Statement::SubGroup(SubGroupDefinition { name, parent_name }))
    }

    /// `RI1 je odjeljenje.`
    fn study_group_definition(&mut self) -> Option<Statement> {
        let name = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsStudyGroup)?;
        self.terminator()?;
        Some(Statement::StudyGroup(StudyGroupDefinition { name }))
    }

    /// `R0-01 je prostorija.`
    fn room_definition(&mut self) -> Option<Statement> {
        let raw = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsRoom)?;
        self.terminator()?;
        Some(Statement::Room(RoomDefinition {
            name: normalize_room(&raw),
        }))
    }

    /// `P je tip nastave Predavanje prioriteta 0.`
    fn lecture_type_definition(&mut self) -> Option<Statement> {
        let code = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::IsLectureType)?;
        let raw_name = self.eat(TokenKind::Ident)?.text;
        self.eat(TokenKind::Priority)?;
        let priority = self.eat(TokenKind::Number)?.text.parse().ok()?;
        self.terminator()?;
        Some(Statement::LectureType(LectureTypeDefinition {
            code,
            name: split_camel_case(&raw_name),
            priority,
        }))
    }

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    /// `Ana i Edin predaje pMatematika odjeljenju RI1 RI2 u prostoriji A1
    ///  2 puta sedmicno svake 2 sedmice tacno u terminu PO1 PO2.`
    fn assignment(&mut self) -> Option<Statement> {
        if !self.check_at(0, TokenKind::Ident) || !self.teaches_ahead() {
            return None;
        }

        let mut teacher_names = Vec::new();
        while !self.check_at(0, TokenKind::Teaches) {
            let token = self.advance()?;
            if !token.is(TokenKind::And) {
                teacher_names.push(split_camel_case(&token.text));
            }
        }
        self.eat(TokenKind::Teaches)?;

        let subject_raw = self.eat(TokenKind::Ident)?.text;
        let (subject, type_code) = split_subject(&subject_raw);

        let mut group_name_groups = Vec::new();
        let mut room_names = Vec::new();
        let mut slot_ids = Vec::new();
        let mut frequency_hint = None;
        let mut recurrence_interval = 1;
        let mut unrecognized_tokens = Vec::new();

        while !self.at_terminator() {
            let Some(token) = self.advance() else { break };
            match token.kind {
                TokenKind::ToGroups => {
                    let names = self.ident_run();
                    if names.is_empty() {
                        unrecognized_tokens.push(token.text);
                    } else {
                        group_name_groups.push(names);
                    }
                }
                TokenKind::InRoom => match self.eat(TokenKind::Ident) {
                    Some(room) => room_names.push(normalize_room(&room.text)),
                    None => unrecognized_tokens.push(token.text),
                },
                TokenKind::AtSlots => {
                    let ids = self.ident_run();
                    if ids.is_empty() {
                        unrecognized_tokens.push(token.text);
                    } else {
                        slot_ids.extend(ids);
                    }
                }
                TokenKind::Number => match self.frequency_phrase(&token) {
                    Some(times) => frequency_hint = Some(times),
                    None => unrecognized_tokens.push(token.text),
                },
                TokenKind::Every => match self.interval_phrase() {
                    Some(weeks) => recurrence_interval = weeks,
                    None => unrecognized_tokens.push(token.text),
                },
                _ => unrecognized_tokens.push(token.text),
            }
        }
        self.terminator()?;

        if group_name_groups.is_empty() {
            group_name_groups.push(vec![ALL_GROUPS.to_string()]);
        }

        Some(Statement::Assignment(Assignment {
            teacher_names,
            subject_raw,
            subject,
            type_code,
            group_name_groups,
            room_names,
            slot_ids,
            frequency_hint,
            recurrence_interval,
            unrecognized_tokens,
        }))
    }

    /// Is there a `predaje` before the end of the current sentence?
    fn teaches_ahead(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .skip(1)
            .take_while(|t| !t.is(TokenKind::Dot))
            .any(|t| t.is(TokenKind::Teaches))
    }

    /// `N puta sedmicno`, with `number` already consumed.
    fn frequency_phrase(&mut self, number: &Token) -> Option<u32> {
        let times = self.word_at(0, &["puta"]) && self.word_at(1, &["sedmicno", "sedmično"]);
        if !times {
            return None;
        }
        let value = number.text.parse().ok()?;
        self.pos += 2;
        Some(value)
    }

    /// `svake N sedmice`, with `svake` already consumed.
    fn interval_phrase(&mut self) -> Option<u32> {
        if !self.check_at(1, TokenKind::WeeksPlural) {
            return None;
        }
        let weeks: u32 = self.peek(0).filter(|t| t.is(TokenKind::Number))?.text.parse().ok()?;
        if weeks == 0 {
            return None;
        }
        self.pos += 2;
        Some(weeks)
    }

    /// Consume consecutive identifiers.
    fn ident_run(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(token) = self.eat(TokenKind::Ident) {
            names.push(token.text);
        }
        names
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek(offset).is_some_and(|t| t.is(kind))
    }

    fn word_at(&self, offset: usize, words: &[&str]) -> bool {
        self.peek(offset).is_some_and(|t| {
            t.is(TokenKind::Ident) && words.iter().any(|w| t.text.to_lowercase() == *w)
        })
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek(0).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the next token if it has the given kind; otherwise leave the
    /// cursor alone.
    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check_at(0, kind) {
            self.advance()
        } else {
            None
        }
    }

    fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        kinds.iter().find_map(|kind| self.eat(*kind))
    }

    fn number(&mut self) -> Option<u32> {
        self.eat(TokenKind::Number)?.text.parse().ok()
    }

    fn date(&mut self) -> Option<NaiveDate> {
        parse_dsl_date(&self.eat(TokenKind::Date)?.text)
    }

    fn at_terminator(&self) -> bool {
        self.peek(0).map_or(true, |t| t.is(TokenKind::Dot))
    }

    /// The sentence-ending `.`; a final sentence may omit it at end of input.
    fn terminator(&mut self) -> Option<()> {
        if self.eat(TokenKind::Dot).is_some() || self.peek(0).is_none() {
            Some(())
        } else {
            None
        }
    }
}

/// Parse a `DD.MM.YYYY` date literal.
pub fn parse_dsl_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%d.%m.%Y").ok()
}
