//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_LOCAL_RE: Regex = Regex::new(r"^[\w.+-]+$").expect("valid regex");
}

/// Validates that an email belongs to the given institutional domain.
///
/// The portal only admits accounts from the configured domain
/// (e.g. `@kletech.ac.in`); everything else is rejected at registration.
/// The part after `@` must match the configured domain exactly, so
/// look-alike domains sharing a suffix do not pass.
pub fn validate_email_domain(email: &str, allowed_domain: &str) -> Result<(), ValidationError> {
    let email = email.trim().to_ascii_lowercase();
    let allowed = allowed_domain
        .trim()
        .trim_start_matches('@')
        .to_ascii_lowercase();

    let domain_matches = email
        .split_once('@')
        .map(|(local, domain)| EMAIL_LOCAL_RE.is_match(local) && domain == allowed)
        .unwrap_or(false);

    if domain_matches {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_domain");
        err.message = Some(format!("Only @{} email addresses are allowed", allowed).into());
        Err(err)
    }
}

/// Validates that a requested quantity is at least 1.
pub fn validate_qty(qty: i32) -> Result<(), ValidationError> {
    if qty >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("qty_range");
        err.message = Some("Quantity must be at least 1".into());
        Err(err)
    }
}

/// Validates that a physical dimension (length, width, weight) is non-negative.
pub fn validate_dimension(value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("dimension_range");
        err.message = Some("Dimension must be non-negative".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain_accepted() {
        assert!(validate_email_domain("student01@kletech.ac.in", "@kletech.ac.in").is_ok());
    }

    #[test]
    fn test_email_domain_case_insensitive() {
        assert!(validate_email_domain("Student01@KLETECH.AC.IN", "@kletech.ac.in").is_ok());
    }

    #[test]
    fn test_email_domain_rejected() {
        assert!(validate_email_domain("someone@gmail.com", "@kletech.ac.in").is_err());
    }

    #[test]
    fn test_email_missing_local_part() {
        assert!(validate_email_domain("@kletech.ac.in", "@kletech.ac.in").is_err());
    }

    #[test]
    fn test_email_domain_suffix_lookalike_rejected() {
        assert!(validate_email_domain("attacker@evilkletech.ac.in", "kletech.ac.in").is_err());
        assert!(validate_email_domain("attacker@evilkletech.ac.in", "@kletech.ac.in").is_err());
    }

    #[test]
    fn test_email_subdomain_rejected() {
        assert!(validate_email_domain("student01@mail.kletech.ac.in", "@kletech.ac.in").is_err());
    }

    #[test]
    fn test_email_domain_config_without_at_accepted() {
        assert!(validate_email_domain("student01@kletech.ac.in", "kletech.ac.in").is_ok());
    }

    #[test]
    fn test_qty_valid() {
        assert!(validate_qty(1).is_ok());
        assert!(validate_qty(500).is_ok());
    }

    #[test]
    fn test_qty_invalid() {
        assert!(validate_qty(0).is_err());
        assert!(validate_qty(-3).is_err());
    }

    #[test]
    fn test_dimension_valid() {
        assert!(validate_dimension(0.0).is_ok());
        assert!(validate_dimension(2.5).is_ok());
    }

    #[test]
    fn test_dimension_negative() {
        assert!(validate_dimension(-0.1).is_err());
    }
}
