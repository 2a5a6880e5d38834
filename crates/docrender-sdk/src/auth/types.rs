//! Authentication-related types
//!
//! Credentials supplied by the operator and the token pair returned by the
//! `/authenticate` endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default renewal margin: tokens expiring within 5 minutes are renewed
pub const DEFAULT_RENEWAL_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Login credentials for one session
#[derive(Clone)]
pub struct Credentials {
    /// Base URI of the document API (e.g. `https://api.woodston.ee/v1/`)
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account record embedded in the authenticate response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub realname: String,
    pub role: String,
    pub active: bool,
    pub scopes: Vec<String>,
}

/// Token pair issued by `POST /authenticate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    /// Bearer token for protected requests
    #[serde(default)]
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

impl AuthToken {
    /// True once `now` is within `margin` of the access token expiry
    pub fn needs_renewal(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        let Ok(margin) = chrono::Duration::from_std(margin) else {
            return true;
        };
        match self.access_token_expires_at.checked_sub_signed(margin) {
            Some(renew_at) => now >= renew_at,
            None => true,
        }
    }

    /// Check if the access token is already expired
    pub fn is_access_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_expiring_in(secs: i64) -> AuthToken {
        AuthToken {
            access_token: "access".into(),
            access_token_expires_at: Utc::now() + chrono::Duration::seconds(secs),
            refresh_token: "refresh".into(),
            refresh_token_expires_at: None,
            user: None,
            id: None,
        }
    }

    #[test]
    fn test_needs_renewal_inside_margin() {
        let token = token_expiring_in(4 * 60);
        assert!(token.needs_renewal(DEFAULT_RENEWAL_MARGIN, Utc::now()));
    }

    #[test]
    fn test_no_renewal_outside_margin() {
        let token = token_expiring_in(60 * 60);
        assert!(!token.needs_renewal(DEFAULT_RENEWAL_MARGIN, Utc::now()));
    }

    #[test]
    fn test_renewal_boundary_is_inclusive() {
        let token = token_expiring_in(0);
        let now = token.access_token_expires_at - chrono::Duration::minutes(5);
        assert!(token.needs_renewal(DEFAULT_RENEWAL_MARGIN, now));
        assert!(!token.needs_renewal(
            DEFAULT_RENEWAL_MARGIN,
            now - chrono::Duration::seconds(1)
        ));
    }

    #[test]
    fn test_access_expiry() {
        assert!(token_expiring_in(-1).is_access_expired(Utc::now()));
        assert!(!token_expiring_in(60).is_access_expired(Utc::now()));
    }

    #[test]
    fn test_deserialize_authenticate_response() {
        let token: AuthToken = serde_json::from_value(json!({
            "user": {
                "name": "operator",
                "active": true,
                "role": "user",
                "scopes": ["services", "jobs"],
                "id": "u-1"
            },
            "access_token": "abc",
            "access_token_expires_at": "2030-01-01T00:00:00Z",
            "refresh_token": "def",
            "refresh_token_expires_at": "2030-01-02T00:00:00Z",
            "_id": "t-1"
        }))
        .unwrap();

        assert_eq!(token.access_token, "abc");
        assert_eq!(token.id.as_deref(), Some("t-1"));
        assert_eq!(token.user.unwrap().scopes.len(), 2);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("http://localhost", "operator", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("operator"));
    }
}
