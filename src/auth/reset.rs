use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::auth::password::generate_reset_token;
use crate::auth::AuthError;

#[derive(Debug, Clone)]
struct ResetEntry {
    email: String,
    expires_at: DateTime<Utc>,
}

/// In-process store for single-use password reset tokens. Entries are not
/// durable across restarts. The map is mutex-guarded so a concurrent request
/// and redeem for the same token cannot race; expired entries are swept on
/// every issue.
#[derive(Debug, Clone)]
pub struct ResetTokenStore {
    entries: Arc<Mutex<HashMap<String, ResetEntry>>>,
    ttl: Duration,
}

impl Default for ResetTokenStore {
    fn default() -> Self {
        Self::new(Duration::hours(1))
    }
}

impl ResetTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Create and store a fresh token for the given email
    pub fn issue(&self, email: &str) -> String {
        let token = generate_reset_token();
        let entry = ResetEntry {
            email: email.to_string(),
            expires_at: Utc::now() + self.ttl,
        };

        let mut entries = self.entries.lock().unwrap();
        let now = Utc::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(token.clone(), entry);

        token
    }

    /// Redeem a token, consuming it. An unknown token fails with
    /// `InvalidResetToken`, a stale one with `ResetTokenExpired`; either way
    /// the same token can never succeed twice.
    pub fn redeem(&self, token: &str) -> Result<String, AuthError> {
        let mut entries = self.entries.lock().unwrap();

        let entry = entries.remove(token).ok_or(AuthError::InvalidResetToken)?;
        if entry.expires_at <= Utc::now() {
            return Err(AuthError::ResetTokenExpired);
        }

        Ok(entry.email)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_is_single_use() {
        let store = ResetTokenStore::default();
        let token = store.issue("user@example.com");

        assert_eq!(store.redeem(&token).unwrap(), "user@example.com");
        assert!(matches!(
            store.redeem(&token),
            Err(AuthError::InvalidResetToken)
        ));
    }

    #[test]
    fn test_unknown_token_is_invalid() {
        let store = ResetTokenStore::default();

        assert!(matches!(
            store.redeem("nope"),
            Err(AuthError::InvalidResetToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let store = ResetTokenStore::new(Duration::seconds(-1));
        let token = store.issue("user@example.com");

        assert!(matches!(
            store.redeem(&token),
            Err(AuthError::ResetTokenExpired)
        ));
    }

    #[test]
    fn test_issue_sweeps_expired_entries() {
        let store = ResetTokenStore::new(Duration::seconds(-1));
        store.issue("a@example.com");
        store.issue("b@example.com");

        // Each issue drops entries that are already past their expiry.
        assert_eq!(store.len(), 1);
    }
}
