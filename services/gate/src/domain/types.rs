use chrono::{DateTime, Duration, Utc};

/// Single-use, time-bounded access grant.
///
/// `id`, `created_at` and the issuer fields never change after creation.
/// `used` is a latch flipped only by redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCode {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub created_by_email: String,
    pub created_by_admin: bool,
    pub used: bool,
}

impl AccessCode {
    /// A code is expired from `created_at + ttl` onwards, whatever its `used`
    /// flag says.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now >= self.created_at + ttl
    }

    /// True while the code can still be exchanged for a session.
    pub fn is_redeemable(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        !self.used && !self.is_expired(now, ttl)
    }
}

/// Outcome of one cleanup job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The code was never redeemed and has been deleted.
    Deleted,
    /// The code was redeemed; it stays as proof of the session.
    Kept,
    /// Nothing to do: never committed or already deleted by an earlier run.
    Missing,
}

/// Access code time-to-live in seconds (24 hours).
pub const ACCESS_CODE_TTL_SECS: i64 = 24 * 60 * 60;

/// Maximum accepted `/find` request body (8 MiB).
pub const MAX_UPLOAD_BYTES: usize = 8 << 20;
