use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// OAuth access token with its absolute expiry
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds as reported by the token endpoint
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    /// Set locally from `expires_in` when the token is received
    #[serde(default = "Utc::now")]
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    /// Token expiring `expires_in` seconds after `issued_at`
    pub fn issued_at(
        access_token: impl Into<String>,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_in,
            scope: String::new(),
            expires_at: expiry(issued_at, expires_in),
        }
    }

    /// Recompute `expires_at` relative to `received_at`
    pub(crate) fn stamp(mut self, received_at: DateTime<Utc>) -> Self {
        self.expires_at = expiry(received_at, self.expires_in);
        self
    }

    /// Whether the token expires within `buffer` of `now`
    pub fn expires_within(&self, buffer: Duration, now: DateTime<Utc>) -> bool {
        now + buffer >= self.expires_at
    }

    /// Whether the token expires within `buffer` of the current time
    pub fn is_expired(&self, buffer: Duration) -> bool {
        self.expires_within(buffer, Utc::now())
    }
}

fn expiry(from: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| from.checked_add_signed(lifetime))
        .unwrap_or(from)
}
