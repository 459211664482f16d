//! Input masks for tax documents and coordinates.
//!
//! # Invariants
//! - Masks are pure and idempotent: formatting a formatted value is a no-op.
//! - Only ASCII digits survive document masking; CPF caps at 11 digits and
//!   CNPJ at 14.

use once_cell::sync::Lazy;
use regex::Regex;

const CPF_DIGITS: usize = 11;
const CNPJ_DIGITS: usize = 14;

static NON_COORDINATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^0-9.\-,°' "NSEW]"#).expect("valid coordinate filter regex")
});
static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Progressive CPF mask `000.000.000-00` over the first 11 digits.
pub fn format_cpf(value: &str) -> String {
    let digits = take_digits(value, CPF_DIGITS);
    let len = digits.len();
    match len {
        0..=3 => digits,
        4..=6 => format!("{}.{}", &digits[..3], &digits[3..]),
        7..=9 => format!("{}.{}.{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
    }
}

/// Progressive CNPJ mask `00.000.000/0000-00` over the first 14 digits.
pub fn format_cnpj(value: &str) -> String {
    let digits = take_digits(value, CNPJ_DIGITS);
    match digits.len() {
        0..=2 => digits,
        3..=5 => format!("{}.{}", &digits[..2], &digits[2..]),
        6..=8 => format!("{}.{}.{}", &digits[..2], &digits[2..5], &digits[5..]),
        9..=12 => format!(
            "{}.{}.{}/{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..]
        ),
        _ => format!(
            "{}.{}.{}/{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..]
        ),
    }
}

/// Masks a CPF (up to 11 digits) or a CNPJ (more than 11 digits).
pub fn format_document(value: &str) -> String {
    let digits = take_digits(value, usize::MAX);
    if digits.len() <= CPF_DIGITS {
        format_cpf(&digits)
    } else {
        format_cnpj(&digits)
    }
}

/// True when the value holds exactly a CPF or CNPJ digit count.
///
/// Check digits are not verified.
pub fn is_valid_document(value: &str) -> bool {
    matches!(
        value.chars().filter(char::is_ascii_digit).count(),
        CPF_DIGITS | CNPJ_DIGITS
    )
}

/// Drops every character that cannot appear in a DMS or decimal coordinate.
pub fn format_coordinates(value: &str) -> String {
    NON_COORDINATE_RE.replace_all(value, "").into_owned()
}

/// Replaces each whitespace run with `replacement`.
pub fn collapse_whitespace(value: &str, replacement: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(value, replacement).into_owned()
}

fn take_digits(value: &str, limit: usize) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        collapse_whitespace, format_cnpj, format_coordinates, format_cpf, format_document,
        is_valid_document,
    };

    #[test]
    fn eleven_digits_format_as_cpf() {
        assert_eq!(format_document("12345678901"), "123.456.789-01");
    }

    #[test]
    fn fourteen_digits_format_as_cnpj() {
        assert_eq!(format_document("12345678000195"), "12.345.678/0001-95");
    }

    #[test]
    fn partial_input_is_masked_progressively() {
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf("1234"), "123.4");
        assert_eq!(format_cpf("1234567"), "123.456.7");
        assert_eq!(format_cnpj("123456789"), "12.345.678/9");
        assert_eq!(format_document(""), "");
    }

    #[test]
    fn masking_is_idempotent_and_caps_digits() {
        let once = format_document("123.456.789-01");
        assert_eq!(format_document(&once), once);
        assert_eq!(format_cpf("123456789012345"), "123.456.789-01");
        assert_eq!(format_document("123456780001951234"), "12.345.678/0001-95");
    }

    #[test]
    fn document_validity_counts_digits_only() {
        assert!(is_valid_document("123.456.789-01"));
        assert!(is_valid_document("12.345.678/0001-95"));
        assert!(!is_valid_document("1234"));
    }

    #[test]
    fn coordinate_filter_keeps_dms_symbols() {
        assert_eq!(
            format_coordinates("  48°12'33.1\"W abc"),
            "  48°12'33.1\"W "
        );
        assert_eq!(format_coordinates("-23,5505xyz"), "-23,5505");
        assert_eq!(format_coordinates("lat"), "");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_replacement() {
        assert_eq!(
            collapse_whitespace("Sitio  Boa\tVista", "_"),
            "Sitio_Boa_Vista"
        );
    }
}
