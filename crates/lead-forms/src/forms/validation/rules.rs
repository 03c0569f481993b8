use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PHONE_DIGITS: usize = 10;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9]\d{0,14}$").expect("phone pattern compiles"))
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

/// Drop the formatting characters people type into phone numbers.
pub fn clean_phone(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '\t' | '-' | '(' | ')' | '.'))
        .collect()
}

pub fn is_valid_phone(value: &str) -> bool {
    let cleaned = clean_phone(value.trim());
    let digits = cleaned.chars().filter(char::is_ascii_digit).count();
    phone_pattern().is_match(&cleaned) && digits >= MIN_PHONE_DIGITS
}

pub fn meets_min_length(value: &str, chars: usize) -> bool {
    value.trim().chars().count() >= chars
}
