//! Name formatting shared by the parser and the compiler.
//!
//! Identifiers in the DSL are written without spaces (`ImePrezime`,
//! `pUvodUProgramiranje`); display names insert a word break at camel-case
//! boundaries.

/// Split a camel-case identifier into space-separated words.
///
/// A break is inserted at a lower-case (or digit) to upper-case transition,
/// before the last capital of a run that is followed by a lower-case letter,
/// and at a letter to digit transition. Underscores are dropped.
///
/// `ImePrezime` → `Ime Prezime`, `OOPJava` → `OOP Java`,
/// `Matematika1` → `Matematika 1`.
pub fn split_camel_case(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().filter(|c| *c != '_').collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let lower_to_upper =
                (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let end_of_capitals = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            let letter_to_digit = prev.is_alphabetic() && c.is_ascii_digit();

            if (lower_to_upper || end_of_capitals || letter_to_digit) && !out.ends_with(' ') {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Split a type-prefixed subject identifier into `(display name, type code)`.
///
/// The first character is the lecture-type code (upper-cased), the rest is
/// the camel-case subject name: `pUvodUProgramiranje` →
/// `("Uvod U Programiranje", "P")`. An empty identifier maps to the
/// unknown type `N`.
pub fn split_subject(raw: &str) -> (String, String) {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => {
            let code: String = first.to_uppercase().collect();
            (split_camel_case(chars.as_str()), code)
        }
        None => (String::new(), "N".to_string()),
    }
}

/// Room identifiers may use `_` as a visual separator; it is not part of the name.
pub fn normalize_room(raw: &str) -> String {
    raw.replace('_', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ImePrezime", "Ime Prezime")]
    #[case("LaboratorijskeVjezbe", "Laboratorijske Vjezbe")]
    #[case("UvodUProgramiranje", "Uvod U Programiranje")]
    #[case("OOPJava", "OOP Java")]
    #[case("Matematika1", "Matematika 1")]
    #[case("Ime_Prezime", "Ime Prezime")]
    #[case("ĆamilČolić", "Ćamil Čolić")]
    #[case("Ime Prezime", "Ime Prezime")]
    #[case("", "")]
    fn split_camel_case_cases(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(split_camel_case(raw), expected);
    }

    #[test]
    fn split_camel_case_is_idempotent() {
        let once = split_camel_case("DigitalnaObradaSignala2");
        assert_eq!(split_camel_case(&once), once);
    }

    #[rstest]
    #[case("pUvodUProgramiranje", "Uvod U Programiranje", "P")]
    #[case("vLinearnaAlgebra", "Linearna Algebra", "V")]
    #[case("lMreze2", "Mreze 2", "L")]
    #[case("", "", "N")]
    fn split_subject_cases(#[case] raw: &str, #[case] name: &str, #[case] code: &str) {
        assert_eq!(split_subject(raw), (name.to_string(), code.to_string()));
    }

    #[test]
    fn normalize_room_drops_underscores() {
        assert_eq!(normalize_room("R_0-01"), "R0-01");
        assert_eq!(normalize_room("A1"), "A1");
    }
}
