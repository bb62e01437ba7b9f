//! Compiled name and value patterns used by the classifier.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static classifier pattern must compile")
}

// =============================================================================
// COLUMN NAME PATTERNS
// =============================================================================

pub(crate) static IDENTIFIER_NAME: Lazy<Regex> = Lazy::new(|| compile(r"(?i)id$"));

pub(crate) static DATE_NAME: Lazy<Regex> = Lazy::new(|| compile(r"(?i)date|day|year"));

pub(crate) static BUSINESS_KEY_NAMES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)code$",
        r"(?i)type$",
        r"(?i)status$",
        r"(?i)category$",
        r"(?i)class$",
        r"(?i)group$",
        r"(?i)dept",
        r"(?i)region$",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// Substrings of a lower-cased column name that hint at personal data.
pub(crate) const LOW_PII_NAME_HINTS: &[&str] = &["name", "first", "last", "address", "city", "zip"];

// =============================================================================
// VALUE PATTERNS
// =============================================================================

pub(crate) static NUMERIC_VALUE: Lazy<Regex> = Lazy::new(|| compile(r"^-?\d+(\.\d+)?$"));

/// Values accepted (case-insensitively) for a boolean column.
pub(crate) const BOOLEAN_VALUES: &[&str] = &["true", "false", "0", "1"];

/// Short uppercase codes (`NY`, `USD`) or a letter followed by digits (`A12`).
pub(crate) static SHORT_CODE: Lazy<Regex> =
    Lazy::new(|| compile(r"^[A-Z]{2,4}$|^[A-Z][0-9]{1,3}$"));

pub(crate) static HIGH_PII_VALUES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (compile(r"^[\w.+-]+@[\w-]+\.[\w.-]+$"), "email"),
        (compile(r"^\d{3}-\d{2}-\d{4}$"), "ssn"),
        // 13 to 16 digits in groups of four
        (compile(r"^\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{1,4}$"), "credit_card"),
        (compile(r"^\+?1?\d{9,15}$"), "phone"),
        (compile(r"^\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$"), "phone_formatted"),
    ]
});

pub(crate) static MEDIUM_PII_VALUES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (compile(r"^[A-Z][a-z]+ [A-Z][a-z]+$"), "full_name"),
        (compile(r"^\d{1,5} .+ (St|Ave|Rd|Dr|Blvd)"), "street_address"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code() {
        assert!(SHORT_CODE.is_match("USD"));
        assert!(SHORT_CODE.is_match("A12"));
        assert!(!SHORT_CODE.is_match("usd"));
        assert!(!SHORT_CODE.is_match("ABCDE"));
        assert!(!SHORT_CODE.is_match("A1234"));
    }

    #[test]
    fn test_numeric_value() {
        assert!(NUMERIC_VALUE.is_match("42"));
        assert!(NUMERIC_VALUE.is_match("-3.25"));
        assert!(!NUMERIC_VALUE.is_match("1e5"));
        assert!(!NUMERIC_VALUE.is_match("3."));
    }

    #[test]
    fn test_card_number_lengths() {
        let card = &HIGH_PII_VALUES[2].0;
        assert!(card.is_match("4111 1111 1111 1111"));
        assert!(card.is_match("4111-1111-1111-1"));
        assert!(!card.is_match("4111-1111-1111"));
    }

    #[test]
    fn test_formatted_phone() {
        let phone = &HIGH_PII_VALUES[4].0;
        assert!(phone.is_match("+1-555-123-4567"));
        assert!(phone.is_match("(555) 123-4567"));
        assert!(!phone.is_match("2024-01-15"));
    }
}
