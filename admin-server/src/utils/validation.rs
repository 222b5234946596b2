//! Input validation helpers
//!
//! Length limits and the format checks shared by user, sales channel and
//! password reset payloads. Checks return plain `bool` / message values so
//! callers can collect them into a [`FieldErrors`].

use shared::FieldErrors;
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: profile names, sales channel names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone, postal code, country
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / pictures
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Domain names (RFC 1035)
pub const MAX_DOMAIN_LEN: usize = 253;

// ── Format checks ───────────────────────────────────────────────────

/// Trim and lower-case an email address
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `local@host.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((_, host)) = email.rsplit_once('@') else {
        return false;
    };
    // require a dot in the host part, with something on both sides
    let dotted = host
        .split_once('.')
        .is_some_and(|(left, right)| !left.is_empty() && !right.is_empty());
    dotted && email.validate_email()
}

/// Fully-qualified domain name: at least two labels, letters/digits/hyphens,
/// no label starting or ending with a hyphen, alphabetic TLD
pub fn is_fqdn(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels.last().is_some_and(|tld| {
        tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
    });
    labels_ok && tld_ok
}

/// Absolute `http`/`https` URL with a host
pub fn is_http_url(raw: &str) -> bool {
    if raw.len() > MAX_URL_LEN {
        return false;
    }
    reqwest::Url::parse(raw.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// Record a message when `password` is outside the accepted length
pub fn check_password(errors: &mut FieldErrors, field: &str, password: &str) {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        errors.add(
            field,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    } else if len > MAX_PASSWORD_LEN {
        errors.add(
            field,
            format!("password is too long ({len} chars, max {MAX_PASSWORD_LEN})"),
        );
    }
}

/// Record a message when a required text is blank or too long
pub fn check_required_text(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} is required"));
    } else if value.len() > max_len {
        errors.add(
            field,
            format!("{field} is too long ({} chars, max {max_len})", value.len()),
        );
    }
}

/// Record a message when an optional text is too long
pub fn check_optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
    max_len: usize,
) {
    if let Some(v) = value
        && v.len() > max_len
    {
        errors.add(
            field,
            format!("{field} is too long ({} chars, max {max_len})", v.len()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("someone@example.com"));
        assert!(is_valid_email("a.b+c@shop.example.co"));
        assert!(!is_valid_email("someone@localhost"));
        assert!(!is_valid_email("someone example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("someone@"));
        assert_eq!(normalize_email("  Some@Example.COM "), "some@example.com");
    }

    #[test]
    fn test_fqdn() {
        assert!(is_fqdn("storeadmin1.example.com"));
        assert!(is_fqdn("my-shop.io"));
        assert!(is_fqdn("shop.example.com."));
        assert!(!is_fqdn("localhost"));
        assert!(!is_fqdn("-bad.example.com"));
        assert!(!is_fqdn("bad_label.example.com"));
        assert!(!is_fqdn("example.123"));
        assert!(!is_fqdn("shop..example.com"));
    }

    #[test]
    fn test_http_url() {
        assert!(is_http_url("https://shop.example.com/reset"));
        assert!(is_http_url("http://localhost:3000/reset/"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn test_check_password() {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "password", "12345");
        assert!(errors.contains("password"));

        let mut errors = FieldErrors::new();
        check_password(&mut errors, "password", "123456");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_required_text() {
        let mut errors = FieldErrors::new();
        check_required_text(&mut errors, "name", "   ", MAX_NAME_LEN);
        check_required_text(&mut errors, "domain", "shop.example.com", MAX_DOMAIN_LEN);
        assert!(errors.contains("name"));
        assert!(!errors.contains("domain"));
    }
}
