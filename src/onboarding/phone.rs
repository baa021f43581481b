//! Brazilian mobile number validation and formatting

use std::sync::LazyLock;

use regex::Regex;

/// `(DD) NNNNN-NNNN`
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{2}\) [0-9]{5}-[0-9]{4}$").expect("valid regex"));

/// Digits in a complete mobile number (area code + subscriber)
const MAX_DIGITS: usize = 11;

/// Why a phone number was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    /// Empty input
    Missing,
    /// Not in `(DD) NNNNN-NNNN` form
    InvalidFormat,
}

impl PhoneError {
    /// User-facing message
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Missing => "O número de telefone é obrigatório",
            Self::InvalidFormat => "Formato inválido. Use (99) 99999-9999",
        }
    }
}

impl std::fmt::Display for PhoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PhoneError {}

/// Check a number against `(DD) NNNNN-NNNN`
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Validate a number, distinguishing empty input from a malformed one
///
/// # Errors
///
/// Returns [`PhoneError`] describing the problem
pub fn validate_phone(phone: &str) -> Result<(), PhoneError> {
    if phone.is_empty() {
        return Err(PhoneError::Missing);
    }
    if !is_valid_phone(phone) {
        return Err(PhoneError::InvalidFormat);
    }
    Ok(())
}

/// Format raw keypad input progressively as `(DD) NNNNN-NNNN`
///
/// Non-digits are dropped. Input with more than 11 digits is returned as is.
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() > MAX_DIGITS {
        return raw.to_string();
    }

    let mut formatted = digits.clone();
    if digits.len() > 2 {
        formatted = format!("({}) {}", &digits[..2], &digits[2..]);
    }
    if digits.len() > 7 {
        formatted = format!("{}-{}", &formatted[..10], &formatted[10..]);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_formatted_mobile() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert_eq!(validate_phone("(21) 91234-5678"), Ok(()));
    }

    #[test]
    fn rejects_unformatted_and_missing_space() {
        assert!(!is_valid_phone("11987654321"));
        assert!(!is_valid_phone("(11)98765-4321"));
        assert!(!is_valid_phone("(11) 9876-54321"));
        assert!(!is_valid_phone(" (11) 98765-4321"));
        assert_eq!(validate_phone("11987654321"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn rejects_non_ascii_digits() {
        assert!(!is_valid_phone("(١١) ٩٨٧٦٥-٤٣٢١"));
        assert!(!is_valid_phone("(１１) ９８７６５-４３２１"));
        assert_eq!(validate_phone("(١١) ٩٨٧٦٥-٤٣٢١"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn empty_is_missing() {
        assert_eq!(validate_phone(""), Err(PhoneError::Missing));
    }

    #[test]
    fn formats_progressively() {
        assert_eq!(format_phone("1"), "1");
        assert_eq!(format_phone("11"), "11");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("1198765"), "(11) 98765");
        assert_eq!(format_phone("11987654"), "(11) 98765-4");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn reformats_pasted_input() {
        assert_eq!(format_phone("(11) 98765-4321"), "(11) 98765-4321");
        assert_eq!(format_phone("+11 98765 4321"), "(11) 98765-4321");
    }

    #[test]
    fn too_many_digits_untouched() {
        assert_eq!(format_phone("5511987654321"), "5511987654321");
    }

    #[test]
    fn formatted_full_number_validates() {
        assert!(is_valid_phone(&format_phone("11987654321")));
    }
}
