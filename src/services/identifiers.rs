//! Spanish identifier formats: employee national ID (DNI/NIF) and company
//! tax ID (CIF).

use regex::Regex;
use std::sync::LazyLock;

/// Check-letter alphabet indexed by `number mod 23`.
pub const CHECK_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

static NATIONAL_ID_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}[A-Z]$").expect("static regex"));

static TAX_ID_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]{7}[0-9A-Z]$").expect("static regex"));

/// Result of checking an employee national ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalIdCheck {
    Valid,
    /// Format is correct but the letter does not match the number.
    WrongCheckLetter { expected: char, found: char },
    /// Not 8 digits followed by an uppercase letter.
    InvalidFormat,
}

/// Expected check letter for an 8-digit national ID number.
pub fn national_id_letter(number: u32) -> char {
    CHECK_LETTERS[(number % 23) as usize] as char
}

pub fn check_national_id(id: &str) -> NationalIdCheck {
    if !NATIONAL_ID_FORMAT.is_match(id) {
        return NationalIdCheck::InvalidFormat;
    }

    let (digits, letter) = id.split_at(8);
    let Ok(number) = digits.parse::<u32>() else {
        return NationalIdCheck::InvalidFormat;
    };
    let found = letter.chars().next().unwrap_or_default();
    let expected = national_id_letter(number);

    if found == expected {
        NationalIdCheck::Valid
    } else {
        NationalIdCheck::WrongCheckLetter { expected, found }
    }
}

/// Company tax IDs are validated on format only; the trailing control
/// character is not recomputed.
pub fn is_valid_tax_id_format(id: &str) -> bool {
    TAX_ID_FORMAT.is_match(id)
}
