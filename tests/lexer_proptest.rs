//! Property-based tests for the tokenizer.

use proptest::prelude::*;
use ras2cal::dsl::lexer::tokenize;
use ras2cal::dsl::token::{Token, TokenKind};

/// Helper: drop line numbers and collapse the whitespace inside keyword phrases
fn kinds_and_text(tokens: Vec<Token>) -> Vec<(TokenKind, String)> {
    tokens
        .into_iter()
        .map(|t| (t.kind, t.text.split_whitespace().collect::<Vec<_>>().join(" ")))
        .collect()
}

fn word_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "AnaAnic", "i", "predaje", "pUvodUProgramiranje", "odjeljenju", "odjeljenjima", "RI1",
        "RI1-a", "u", "prostoriji", "R0_01", "tacno", "terminu", "terminima", "PO1", "je", "dan",
        "broj", "termin", "dana", "nastavnik", "predmet", "grupa", "odjeljenja", "odjeljenje",
        "prostorija", "tip", "nastave", "prioriteta", "semestar", "pocinje", "zavrsava", "traje",
        "ima", "nenastavne", "dane", "svake", "sedmice", "sedmica", "3", "15", "01.10.2025", ".",
        "Ponedjeljak", "Čamil", "a/b",
    ])
}

fn separator_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![' ', '\t']), 1..4)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn tokenize_never_panics(input in "\\PC{0,200}") {
        let _ = tokenize(&input);
    }

    #[test]
    fn tokenize_is_deterministic(words in prop::collection::vec(word_strategy(), 0..40)) {
        let input = words.join(" ");
        let first = tokenize(&input).unwrap();
        let second = tokenize(&input).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn whitespace_runs_do_not_change_tokens(
        words in prop::collection::vec(word_strategy(), 1..40),
        seps in prop::collection::vec(separator_strategy(), 40),
    ) {
        let single = words.join(" ");
        let mut varied = String::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                varied.push_str(&seps[i]);
            }
            varied.push_str(word);
        }

        let a = kinds_and_text(tokenize(&single).unwrap());
        let b = kinds_and_text(tokenize(&varied).unwrap());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn line_numbers_never_decrease(words in prop::collection::vec(word_strategy(), 0..40)) {
        let input = words.join("\n");
        let tokens = tokenize(&input).unwrap();
        prop_assert!(tokens.windows(2).all(|w| w[0].line <= w[1].line));
        if let Some(last) = tokens.last() {
            prop_assert!(last.line <= words.len());
        }
    }
}
