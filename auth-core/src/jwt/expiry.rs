use chrono::Duration;
use chrono::Utc;

fn system_now() -> i64 {
    Utc::now().timestamp()
}

/// Decides when newly issued tokens expire and what "now" is when checking them.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryPolicy {
    ttl: Duration,
    clock: fn() -> i64,
}

impl ExpiryPolicy {
    /// Tokens live for `ttl` after issuance, measured against the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            clock: system_now,
        }
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self::new(Duration::seconds(seconds))
    }

    /// Replace the clock (Unix seconds).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Expiration timestamp for a token issued now.
    pub fn expires_at(&self) -> i64 {
        self.now() + self.ttl.num_seconds()
    }
}
