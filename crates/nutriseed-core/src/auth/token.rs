use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::error;

/// Safety margin subtracted from the issued lifetime.
/// A token is dropped this long before the server would reject it.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Build a credential issued at `issued_at` with a lifetime of `ttl_secs`.
    /// The margin is already folded into `expires_at`.
    ///
    /// Returns `None` when the lifetime does not fit in a timestamp.
    pub fn issued(token: String, ttl_secs: i64, issued_at: DateTime<Utc>) -> Option<Self> {
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .and_then(|at| at.checked_sub_signed(Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)))?;
        Some(Self { token, expires_at })
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }
}

/// Single-slot cache owned by a client.
///
/// The lock is only taken to read or swap the slot, never across a request,
/// so two callers racing on a stale slot each fetch their own token.
#[derive(Debug, Default)]
pub struct CredentialCache {
    slot: Mutex<Option<Credential>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Credential>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Credential cache mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Return the cached token if it is still fresh at `now`.
    /// A stale credential is discarded.
    pub fn fresh_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let mut slot = self.lock();
        match slot.as_ref() {
            Some(cred) if cred.is_fresh_at(now) => Some(cred.token.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    pub fn store(&self, credential: Credential) {
        *self.lock() = Some(credential);
    }

    pub fn snapshot(&self) -> Option<Credential> {
        self.lock().clone()
    }
}
