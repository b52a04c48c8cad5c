use anyhow::{bail, Result};

// Guard a lookup key before it reaches the store.
// Any non-blank string is accepted; a mismatch surfaces as "not found".
pub fn lookup_email(email: &str) -> Result<&str> {
    if email.trim().is_empty() {
        bail!("Email must not be empty.");
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_non_blank_key() {
        assert_eq!(lookup_email("someone@example.com").unwrap(), "someone@example.com");
        assert_eq!(lookup_email("admin@localhost").unwrap(), "admin@localhost");
        assert_eq!(lookup_email("legacy-user").unwrap(), "legacy-user");
    }

    #[test]
    fn rejects_blank_keys() {
        assert!(lookup_email("").is_err());
        assert!(lookup_email("   \t").is_err());
    }
}
