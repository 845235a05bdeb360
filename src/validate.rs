//! Field shape checks
//!
//! Both validators are pure and total: any string in, a bool out.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// ASCII digits only; `\d` would also accept other scripts' digits
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+91[-\s]?)?[6-9][0-9]{9}$").expect("phone pattern compiles"));

/// Loose `local@domain.tld` shape check. Does not check deliverability.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_REGEX.is_match(s)
}

/// Remove whitespace, hyphens and parentheses
pub fn strip_phone_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Indian mobile number: optional `+91`, then 10 digits starting with 6-9.
///
/// Separators are stripped before matching, so `98765 43210`,
/// `+91 98765-43210` and `(987) 654-3210` all count.
pub fn is_valid_indian_phone(s: &str) -> bool {
    PHONE_REGEX.is_match(&strip_phone_separators(s))
}
