//! Session Revocation Registry
//!
//! Process-wide set of logged-out tokens backed by a `DashMap` keyed by the
//! SHA-256 of the token. Each entry remembers the token's own expiry; once
//! that passes the token is rejected by signature validation anyway, so the
//! entry can be evicted. The registry is empty after a restart.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;

/// Hex-encoded SHA-256 of a token. Raw tokens are never kept in memory.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Thread-safe registry of revoked session tokens.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    /// Token hash to expiry (Unix timestamp).
    entries: DashMap<String, i64>,
}

impl RevocationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke a token until `expires_at`.
    ///
    /// Idempotent. Returns `true` if the token was not already revoked.
    pub fn revoke(&self, token: &str, expires_at: i64) -> bool {
        self.entries.insert(hash_token(token), expires_at).is_none()
    }

    /// Whether a token has been revoked and has not yet expired.
    pub fn is_revoked(&self, token: &str) -> bool {
        self.is_revoked_at(token, Utc::now().timestamp())
    }

    fn is_revoked_at(&self, token: &str, now: i64) -> bool {
        self.entries
            .get(&hash_token(token))
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Evict entries whose token has expired. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now().timestamp())
    }

    fn purge_expired_at(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Number of tracked tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Periodically evict expired entries from the registry.
pub fn spawn_purge_task(registry: Arc<RevocationRegistry>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = registry.purge_expired();
            if removed > 0 {
                tracing::debug!(removed, remaining = registry.len(), "Purged expired revocations");
            }
        }
    })
}
