//! Lexer for the timetable DSL.
//!
//! Converts source text into a stream of [`Token`]s using an ordered table of
//! regex rules. The table is compiled into one case-insensitive alternation;
//! at each position the earliest listed rule that matches wins, even when a
//! later rule would match a longer span. Multi-word phrases therefore have to
//! be listed before any shorter keyword they start with (`je tip nastave`
//! before `je`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::error::CompileError;
use super::token::{Token, TokenKind};

/// What to do with the text matched by a rule.
#[derive(Debug, Clone, Copy)]
enum Action {
    Emit(TokenKind),
    Comment,
    Newline,
    Skip,
}

/// Rule table. Order matters.
const RULES: &[(&str, Action, &str)] = &[
    ("comment", Action::Comment, r"//[^\n]*|/\*[\s\S]*?\*/"),
    // Assignment markers
    ("teaches", Action::Emit(TokenKind::Teaches), r"\bpredaje\b"),
    (
        "at_slots",
        Action::Emit(TokenKind::AtSlots),
        r"\btacno[ \t]+u[ \t]+termin(?:u|ima)\b",
    ),
    (
        "to_groups",
        Action::Emit(TokenKind::ToGroups),
        r"\bodjeljenj(?:u|ima)\b",
    ),
    (
        "in_room",
        Action::Emit(TokenKind::InRoom),
        r"\bu[ \t]+prostoriji\b|\bprostoriji\b",
    ),
    // Definition phrases, longest first
    (
        "is_day",
        Action::Emit(TokenKind::IsDay),
        r"\bje[ \t]+dan[ \t]+broj\b",
    ),
    (
        "is_slot",
        Action::Emit(TokenKind::IsSlot),
        r"\bje[ \t]+termin[ \t]+broj\b",
    ),
    (
        "is_teacher",
        Action::Emit(TokenKind::IsTeacher),
        r"\bje[ \t]+nastavnik\b",
    ),
    (
        "is_subject",
        Action::Emit(TokenKind::IsSubject),
        r"\bje[ \t]+predmet\b",
    ),
    (
        "is_sub_group",
        Action::Emit(TokenKind::IsSubGroup),
        r"\bje[ \t]+grupa[ \t]+odjeljenja\b",
    ),
    (
        "is_study_group",
        Action::Emit(TokenKind::IsStudyGroup),
        r"\bje[ \t]+odjeljenje\b",
    ),
    (
        "is_room",
        Action::Emit(TokenKind::IsRoom),
        r"\bje[ \t]+prostorija\b",
    ),
    (
        "is_lecture_type",
        Action::Emit(TokenKind::IsLectureType),
        r"\bje[ \t]+tip[ \t]+nastave\b",
    ),
    ("is", Action::Emit(TokenKind::Is), r"\bje\b"),
    // Semester
    ("lasts", Action::Emit(TokenKind::Lasts), r"\btraje\b"),
    ("has", Action::Emit(TokenKind::Has), r"\bima\b"),
    (
        "non_teaching",
        Action::Emit(TokenKind::NonTeaching),
        r"\bnenastavne\b",
    ),
    ("semester", Action::Emit(TokenKind::Semester), r"\bsemestar\b"),
    ("starts", Action::Emit(TokenKind::Starts), r"\bpocinje\b"),
    ("ends", Action::Emit(TokenKind::Ends), r"\bzavrsava\b"),
    // Recurrence
    ("every", Action::Emit(TokenKind::Every), r"\bsvake\b"),
    (
        "weeks_plural",
        Action::Emit(TokenKind::WeeksPlural),
        r"\bsedmice\b",
    ),
    ("weeks", Action::Emit(TokenKind::Weeks), r"\bsedmica\b"),
    // Day words
    ("of_day", Action::Emit(TokenKind::OfDay), r"\bdana\b"),
    ("days", Action::Emit(TokenKind::Days), r"\bdane\b"),
    ("priority", Action::Emit(TokenKind::Priority), r"\bprioriteta\b"),
    ("and", Action::Emit(TokenKind::And), r"\bi\b"),
    // Literals
    (
        "date",
        Action::Emit(TokenKind::Date),
        r"[0-9]{2}\.[0-9]{2}\.[0-9]{4}",
    ),
    ("number", Action::Emit(TokenKind::Number), r"[0-9]+"),
    ("ident", Action::Emit(TokenKind::Ident), r"[\w\-/]+"),
    // Punctuation and whitespace
    ("dot", Action::Emit(TokenKind::Dot), r"\."),
    ("newline", Action::Newline, r"\n"),
    ("skip", Action::Skip, r"[ \t\r,]+"),
];

static RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternation = RULES
        .iter()
        .map(|(name, _, pattern)| format!("(?P<{name}>{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){alternation}")).expect("lexer rule table must compile")
});

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// A leading byte-order mark is dropped.
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.strip_prefix('\u{FEFF}').unwrap_or(source),
            pos: 0,
            line: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        while self.pos < self.source.len() {
            // `captures_at` keeps the preceding text visible, so `\b` sees the
            // real neighbour of the current position.
            let caps = RULE_REGEX
                .captures_at(self.source, self.pos)
                .filter(|caps| caps.get(0).is_some_and(|m| m.start() == self.pos));
            let Some(caps) = caps else {
                return Err(CompileError::lex(self.unmatched_span(), self.line));
            };
            let Some(whole) = caps.get(0) else {
                return Err(CompileError::lex(self.unmatched_span(), self.line));
            };
            let text = whole.as_str();

            match matched_action(&caps) {
                Some(Action::Emit(kind)) => tokens.push(Token::new(kind, text, self.line)),
                Some(Action::Comment) => self.line += text.matches('\n').count(),
                Some(Action::Newline) => self.line += 1,
                Some(Action::Skip) => {}
                None => return Err(CompileError::lex(self.unmatched_span(), self.line)),
            }

            self.pos = whole.end();
        }

        Ok(tokens)
    }

    /// The offending character at the cursor and the run of non-whitespace
    /// after it. The first character is kept even when it is whitespace the
    /// skip rule does not cover.
    fn unmatched_span(&self) -> String {
        let rest = &self.source[self.pos..];
        let first = rest.chars().next().map_or(0, char::len_utf8);
        let end = rest[first..]
            .find(char::is_whitespace)
            .map_or(rest.len(), |i| first + i);
        rest[..end].to_string()
    }
}

fn matched_action(caps: &Captures<'_>) -> Option<Action> {
    RULES
        .iter()
        .find(|(name, _, _)| caps.name(name).is_some())
        .map(|(_, action, _)| *action)
}

/// Tokenize `text` in one call.
pub fn tokenize(text: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[rstest]
    #[case("je dan broj", TokenKind::IsDay)]
    #[case("je termin broj", TokenKind::IsSlot)]
    #[case("je nastavnik", TokenKind::IsTeacher)]
    #[case("je predmet", TokenKind::IsSubject)]
    #[case("je grupa odjeljenja", TokenKind::IsSubGroup)]
    #[case("je odjeljenje", TokenKind::IsStudyGroup)]
    #[case("je prostorija", TokenKind::IsRoom)]
    #[case("je tip nastave", TokenKind::IsLectureType)]
    #[case("je", TokenKind::Is)]
    #[case("tacno u terminu", TokenKind::AtSlots)]
    #[case("tacno u terminima", TokenKind::AtSlots)]
    #[case("u prostoriji", TokenKind::InRoom)]
    #[case("prostoriji", TokenKind::InRoom)]
    #[case("odjeljenju", TokenKind::ToGroups)]
    #[case("odjeljenjima", TokenKind::ToGroups)]
    fn lex_keyword_phrase(#[case] src: &str, #[case] expected: TokenKind) {
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens.len(), 1, "{src:?} should be a single token");
        assert_eq!(tokens[0].kind, expected);
        assert_eq!(tokens[0].text, src);
    }

    #[test]
    fn lex_longer_phrase_wins_over_copula() {
        assert_eq!(
            kinds("P je tip nastave Predavanje prioriteta 0."),
            vec![
                TokenKind::Ident,
                TokenKind::IsLectureType,
                TokenKind::Ident,
                TokenKind::Priority,
                TokenKind::Number,
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn lex_is_case_insensitive() {
        let tokens = tokenize("Ponedjeljak JE DAN BROJ 1.").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::IsDay);
        assert_eq!(tokens[1].text, "JE DAN BROJ");
    }

    #[test]
    fn lex_phrase_tolerates_extra_spacing() {
        assert_eq!(kinds("je  dan \t broj"), vec![TokenKind::IsDay]);
    }

    #[test]
    fn lex_keyword_inside_word_is_ident() {
        let tokens = tokenize("Predajem jesen ima1").unwrap();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Ident));
        assert_eq!(tokens[0].text, "Predajem");
    }

    #[test]
    fn lex_date_before_number() {
        let tokens = tokenize("01.10.2026 15").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Date);
        assert_eq!(tokens[0].text, "01.10.2026");
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn lex_identifiers_keep_dashes_and_slashes() {
        let tokens = tokenize("R0-01 RI1oop-1 A/B").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["R0-01", "RI1oop-1", "A/B"]);
    }

    #[test]
    fn lex_commas_are_separators() {
        assert_eq!(
            kinds("01.01.2027, 07.01.2027."),
            vec![TokenKind::Date, TokenKind::Date, TokenKind::Dot]
        );
    }

    #[test]
    fn lex_comments_are_dropped() {
        let src = "A je odjeljenje. // trailing\n/* block\n comment */ B je odjeljenje.";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Ident,
                TokenKind::IsStudyGroup,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::IsStudyGroup,
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn lex_line_tracking() {
        let src = "A je odjeljenje.\n\nB je odjeljenje.\n/* one\ntwo */ C je odjeljenje.";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].line, 3);
        assert_eq!(tokens[6].line, 5);
    }

    #[test]
    fn lex_conjunction() {
        assert_eq!(
            kinds("Ana i Edin predaje"),
            vec![
                TokenKind::Ident,
                TokenKind::And,
                TokenKind::Ident,
                TokenKind::Teaches
            ]
        );
    }

    #[test]
    fn lex_error_on_unmatched_input() {
        let err = tokenize("A je odjeljenje.\nB @ C").unwrap_err();
        match err {
            CompileError::Lex { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "@");
            }
            other => panic!("expected Lex error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("Ana\u{00A0}predaje pX.", "\u{00A0}predaje")]
    #[case("Ana\u{000B}je", "\u{000B}je")]
    #[case("Ana\u{2003} x", "\u{2003}")]
    fn lex_error_names_unhandled_whitespace(#[case] src: &str, #[case] expected: &str) {
        match tokenize(src).unwrap_err() {
            CompileError::Lex { line, text } => {
                assert_eq!(line, 1);
                assert_eq!(text, expected);
            }
            other => panic!("expected Lex error, got {other:?}"),
        }
    }

    #[test]
    fn lex_leading_byte_order_mark_is_ignored() {
        let tokens = tokenize("\u{FEFF}Ponedjeljak je dan broj 1.\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "Ponedjeljak");
        assert_eq!(tokens[1].kind, TokenKind::IsDay);
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn lex_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \n// only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn lex_accented_identifiers() {
        let tokens = tokenize("ĆamilČolić je nastavnik.").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "ĆamilČolić");
    }
}
