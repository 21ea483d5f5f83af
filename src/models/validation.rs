use regex::Regex;
use std::sync::OnceLock;

/// Loose structural check: one `@`, non-empty local part, dotted domain.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("Invalid regex")
    });

    re.is_match(email)
}

/// Letters, digits and `@.+-_`, as accepted by common account systems.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Invalid regex"));

    re.is_match(username)
}
