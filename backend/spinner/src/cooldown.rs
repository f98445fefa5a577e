use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use crate::store::CooldownStore;

pub const COOLDOWN: Duration = Duration::from_secs(15);

pub trait Clock {
    /// Wall-clock time in epoch milliseconds.
    fn now_ms(&self) -> i64;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Minimum interval between the starts of two spins.
///
/// The stored timestamp is the authority. `unsaved` only holds a spin the store refused.
pub struct Cooldown<S> {
    store: S,
    duration: Duration,
    unsaved: Option<i64>,
}

impl<S: CooldownStore> Cooldown<S> {
    pub fn new(store: S, duration: Duration) -> Self {
        Self {
            store,
            duration,
            unsaved: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn last_spin(&self) -> Option<i64> {
        self.store.load().max(self.unsaved)
    }

    /// `None` once the cooldown has elapsed or when no spin was ever recorded.
    ///
    /// Never more than one full cooldown, even when the stored instant lies in the future.
    pub fn remaining(&self, now_ms: i64) -> Option<Duration> {
        let last_spin = self.last_spin()?;

        if last_spin > now_ms {
            warn!("Stored spin time {last_spin} is ahead of the clock ({now_ms})");
        }

        let duration_ms = i64::try_from(self.duration.as_millis()).unwrap_or(i64::MAX);
        let left = last_spin
            .saturating_add(duration_ms)
            .saturating_sub(now_ms)
            .min(duration_ms);

        (left > 0).then(|| Duration::from_millis(left as u64))
    }

    pub fn can_spin(&self, now_ms: i64) -> bool {
        self.remaining(now_ms).is_none()
    }

    pub fn record(&mut self, now_ms: i64) {
        if let Err(e) = self.store.save(now_ms) {
            warn!("Cooldown not persisted, it only holds for this session: {e}");
            self.unsaved = Some(now_ms);
        }
    }
}

/// Whole seconds, rounded up: 4.2s left reads `5s`.
pub fn format_remaining(remaining: Duration) -> String {
    format!("{}s", remaining.as_millis().div_ceil(1000))
}
