//! PII sensitivity classification.

use super::patterns::{HIGH_PII_VALUES, LOW_PII_NAME_HINTS, MEDIUM_PII_VALUES};
use crate::profile::PiiLevel;

/// Classify a column, most severe level first.
///
/// Any single sampled value matching a HIGH pattern makes the whole
/// column HIGH, regardless of what the name suggests.
pub fn classify_pii(column_name: &str, values: &[&str]) -> PiiLevel {
    detect_pii(column_name, values).0
}

/// Classify a column and report which rule fired.
pub fn detect_pii(column_name: &str, values: &[&str]) -> (PiiLevel, Option<&'static str>) {
    for (pattern, kind) in HIGH_PII_VALUES.iter() {
        if values.iter().any(|v| pattern.is_match(v)) {
            return (PiiLevel::High, Some(*kind));
        }
    }

    for (pattern, kind) in MEDIUM_PII_VALUES.iter() {
        if values.iter().any(|v| pattern.is_match(v)) {
            return (PiiLevel::Medium, Some(*kind));
        }
    }

    let lower = column_name.to_lowercase();
    if let Some(hint) = LOW_PII_NAME_HINTS.iter().find(|h| lower.contains(**h)) {
        return (PiiLevel::Low, Some(*hint));
    }

    (PiiLevel::None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_high_even_with_low_name() {
        let values = ["not an email", "jane.doe@example.com"];
        assert_eq!(classify_pii("last_name", &values), PiiLevel::High);
    }

    #[test]
    fn test_ssn_and_phone() {
        assert_eq!(classify_pii("x", &["123-45-6789"]), PiiLevel::High);
        assert_eq!(classify_pii("x", &["+1-555-123-4567"]), PiiLevel::High);
        assert_eq!(classify_pii("x", &["5551234567"]), PiiLevel::High);
    }

    #[test]
    fn test_full_name_and_address_are_medium() {
        assert_eq!(classify_pii("x", &["Jane Doe"]), PiiLevel::Medium);
        assert_eq!(classify_pii("x", &["742 Evergreen St"]), PiiLevel::Medium);
    }

    #[test]
    fn test_name_hint_is_low() {
        let (level, hint) = detect_pii("City", &["Springfield", "Shelbyville"]);
        assert_eq!(level, PiiLevel::Low);
        assert_eq!(hint, Some("city"));
    }

    #[test]
    fn test_plain_column_is_none() {
        assert_eq!(classify_pii("quantity", &["3", "4", "10"]), PiiLevel::None);
        assert_eq!(classify_pii("notes", &[]), PiiLevel::None);
    }
}
