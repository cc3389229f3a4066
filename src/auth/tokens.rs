//! In-memory access token bookkeeping

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Tokens are considered expired this long before their actual expiry.
const EXPIRY_GRACE: Duration = Duration::from_secs(300);

/// Access token together with its absolute expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub token: String,
    pub expires_at: Option<u64>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl StoredToken {
    pub fn new(token: String, expires_in: Option<Duration>) -> Self {
        let expires_at = expires_in.map(|d| now_secs() + d.as_secs());
        Self { token, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            // Consider expired if less than 5 minutes remaining
            Some(exp) => now_secs() + EXPIRY_GRACE.as_secs() >= exp,
            None => false,
        }
    }
}
