//! Input validation for registration and booking forms.
//!
//! Every check is a pure predicate: invalid input comes back as `false`,
//! never as an error. Callers re-collect the input and try again.

use chrono::{NaiveDate, Utc};
use regex::Regex;

/// Letters and spaces only, at least one character.
pub fn is_valid_name(name: &str) -> bool {
    let name_regex = Regex::new(r"^[a-zA-Z ]+$").unwrap();
    name_regex.is_match(name)
}

pub fn is_valid_age(age: i32) -> bool {
    age > 0 && age <= 120
}

/// Exactly 10 decimal digits.
pub fn is_valid_contact(contact: &str) -> bool {
    let contact_regex = Regex::new(r"^[0-9]{10}$").unwrap();
    contact_regex.is_match(contact)
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_appointment_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Date rule against an explicit "today": parseable and not in the past.
pub fn is_valid_date_on(text: &str, today: NaiveDate) -> bool {
    match parse_appointment_date(text) {
        Some(date) => date >= today,
        None => false,
    }
}

/// Appointment eligibility: a well-formed date that is today or later.
pub fn is_valid_date(text: &str) -> bool {
    is_valid_date_on(text, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn name_accepts_letters_and_spaces() {
        assert!(is_valid_name("Alice Murphy"));
        assert!(is_valid_name("Bob"));
        assert!(is_valid_name("a"));
    }

    #[test]
    fn name_rejects_digits_symbols_and_empty() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Alice2"));
        assert!(!is_valid_name("O'Brien"));
        assert!(!is_valid_name("Dr. Murphy"));
    }

    #[test]
    fn age_bounds_are_exclusive_zero_inclusive_120() {
        assert!(!is_valid_age(0));
        assert!(is_valid_age(1));
        assert!(is_valid_age(120));
        assert!(!is_valid_age(121));
        assert!(!is_valid_age(-5));
    }

    #[test]
    fn contact_must_be_exactly_ten_digits() {
        assert!(is_valid_contact("1234567890"));
        assert!(!is_valid_contact("12345"));
        assert!(!is_valid_contact("12345678901"));
        assert!(!is_valid_contact("12345abcde"));
        assert!(!is_valid_contact(""));
    }

    #[test]
    fn date_on_fixed_today() {
        let today = fixed_today();
        assert!(is_valid_date_on("2024-06-15", today));
        assert!(!is_valid_date_on("2024-06-14", today));
        assert!(is_valid_date_on("2024-07-01", today));
        assert!(!is_valid_date_on("not-a-date", today));
        assert!(!is_valid_date_on("2024-13-40", today));
    }

    #[test]
    fn current_date_is_always_eligible() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(is_valid_date(&today));
    }

    #[test]
    fn parse_matches_the_date_rule() {
        assert_eq!(
            parse_appointment_date("2024-07-01"),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        assert_eq!(parse_appointment_date("2024-13-40"), None);
    }

    #[test]
    fn validators_are_idempotent() {
        for _ in 0..2 {
            assert!(is_valid_name("Alice"));
            assert!(is_valid_age(30));
            assert!(is_valid_contact("0871234567"));
            assert!(is_valid_date_on("2024-06-20", fixed_today()));
        }
    }
}
