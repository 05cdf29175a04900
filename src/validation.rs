//! Field validation.
//!
//! Validation is pure: it turns a raw field value into a
//! [`ValidationResult`] and never touches form state.  Marking input
//! groups as erroneous is the job of [`crate::form::FormState`].

use crate::locale::{message, Locale, MessageKind};
use serde::Serialize;

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid { value: f64 },
    Invalid { kind: MessageKind, message: String },
}

impl ValidationResult {
    fn invalid(locale: Locale, kind: MessageKind) -> Self {
        ValidationResult::Invalid {
            kind,
            message: message(locale, kind).to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ValidationResult::Valid { value } => Some(*value),
            ValidationResult::Invalid { .. } => None,
        }
    }
}

/// Validate one raw field value.
///
/// Checks run in a fixed order: presence, numeric well-formedness,
/// positivity, finiteness.  `is_select` only changes the wording of the
/// missing-value message.
pub fn validate(raw: &str, is_select: bool, locale: Locale) -> ValidationResult {
    if raw.is_empty() {
        let kind = if is_select {
            MessageKind::SelectDuration
        } else {
            MessageKind::EnterValue
        };
        return ValidationResult::invalid(locale, kind);
    }

    let cleaned = strip_non_numeric(raw);
    let Some(value) = parse_leading_float(&cleaned) else {
        return ValidationResult::invalid(locale, MessageKind::InvalidNumber);
    };
    if value <= 0.0 {
        return ValidationResult::invalid(locale, MessageKind::PositiveValue);
    }
    if !value.is_finite() {
        return ValidationResult::invalid(locale, MessageKind::InvalidValue);
    }
    ValidationResult::Valid { value }
}

/// Keep ASCII digits and `.`, drop everything else.
pub fn strip_non_numeric(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Filter applied while the user types into a numeric field.
///
/// Besides stripping foreign characters, only the first decimal point
/// survives: `"1.2.3"` becomes `"1.23"`.
pub fn sanitize_live(raw: &str) -> String {
    let stripped = strip_non_numeric(raw);
    match stripped.split_once('.') {
        Some((int_part, rest)) if rest.contains('.') => {
            format!("{int_part}.{}", rest.replace('.', ""))
        }
        _ => stripped,
    }
}

/// Parse the longest numeric prefix of `input`, the way browsers'
/// `parseFloat` does.
///
/// Leading whitespace is skipped; a sign, a decimal fraction, an
/// exponent and the literal `Infinity` are recognised.  Trailing
/// garbage is ignored.  Returns `None` when no digits lead the input.
/// Digit strings too large for `f64` yield infinity.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind_of(result: &ValidationResult) -> Option<MessageKind> {
        match result {
            ValidationResult::Invalid { kind, .. } => Some(*kind),
            ValidationResult::Valid { .. } => None,
        }
    }

    #[test]
    fn empty_input_asks_for_a_value() {
        let result = validate("", false, Locale::En);
        assert_eq!(
            result,
            ValidationResult::Invalid {
                kind: MessageKind::EnterValue,
                message: "Please enter a value".into()
            }
        );
    }

    #[test]
    fn empty_select_asks_for_a_duration_in_active_locale() {
        let result = validate("", true, Locale::Ar);
        assert_eq!(
            result,
            ValidationResult::Invalid {
                kind: MessageKind::SelectDuration,
                message: "الرجاء اختيار المدة".into()
            }
        );
    }

    #[test]
    fn foreign_characters_are_stripped_before_parsing() {
        assert_eq!(validate("1,000.50 EGP", false, Locale::En).value(), Some(1000.5));
        assert_eq!(validate("-25", false, Locale::En).value(), Some(25.0));
        assert!(validate("90", true, Locale::Ar).is_valid());
    }

    #[test]
    fn nothing_numeric_is_not_a_number() {
        assert_eq!(kind_of(&validate("abc", false, Locale::En)), Some(MessageKind::InvalidNumber));
        assert_eq!(kind_of(&validate("...", false, Locale::En)), Some(MessageKind::InvalidNumber));
        assert_eq!(kind_of(&validate(" ", false, Locale::En)), Some(MessageKind::InvalidNumber));
    }

    #[test]
    fn zero_is_not_positive() {
        assert_eq!(kind_of(&validate("0", false, Locale::En)), Some(MessageKind::PositiveValue));
        assert_eq!(kind_of(&validate("0.000", false, Locale::En)), Some(MessageKind::PositiveValue));
    }

    #[test]
    fn overflow_is_an_invalid_value() {
        let huge = "9".repeat(400);
        let result = validate(&huge, false, Locale::En);
        assert_eq!(
            result,
            ValidationResult::Invalid {
                kind: MessageKind::InvalidValue,
                message: "Invalid value".into()
            }
        );
    }

    #[test]
    fn extra_decimal_points_end_the_number() {
        assert_eq!(validate("1.2.3", false, Locale::En).value(), Some(1.2));
    }

    #[test]
    fn live_filter_keeps_first_decimal_point() {
        assert_eq!(sanitize_live("1.2.3"), "1.23");
        assert_eq!(sanitize_live("12a3"), "123");
        assert_eq!(sanitize_live("4.5"), "4.5");
        assert_eq!(sanitize_live("..5"), ".5");
    }

    #[test]
    fn leading_float_follows_browser_rules() {
        assert_eq!(parse_leading_float("  12abc"), Some(12.0));
        assert_eq!(parse_leading_float("-3.5"), Some(-3.5));
        assert_eq!(parse_leading_float("1e2x"), Some(100.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }
}
