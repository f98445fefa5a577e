//! # Spin Controller
//!
//! One session, one controller. It owns the retry counter, the current profile and the
//! cooldown; the presentation layer only receives events.
//!
//! ```text
//! Idle / Revealed / Failed --spin, cooldown elapsed--> Spinning
//! Idle / Revealed / Failed --spin, cooldown running--> CooldownActive
//! CooldownActive --tick, elapsed--> Revealed(last) or Idle
//! Spinning --record--> Revealed
//! Spinning --failure, attempts < max--> Spinning (fresh fid, no delay)
//! Spinning --failure, attempts == max--> Failed
//! ```
//!
//! `Revealed` and `Failed` persist while the cooldown runs. Only a rejected spin switches
//! the display to `CooldownActive`.
//!
//! `spin` takes `&mut self`, so a second spin cannot start while one is in flight.
use std::time::Duration;

use profiles::ProfileRecord;
use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cooldown::{COOLDOWN, Clock, Cooldown},
    gateway::Gateway,
    sink::{PresentationSink, SoundCue},
    store::CooldownStore,
    utils::{UPPER_BOUND, random_fid},
};

pub const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub cooldown: Duration,
    pub max_retries: u32,
    pub upper_bound: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cooldown: COOLDOWN,
            max_retries: MAX_RETRIES,
            upper_bound: UPPER_BOUND,
        }
    }
}

impl Settings {
    fn normalized(self) -> Self {
        Self {
            max_retries: self.max_retries.max(1),
            upper_bound: self.upper_bound.max(1),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    CooldownActive(Duration),
    Spinning,
    Revealed(ProfileRecord),
    Failed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    #[error("Cooldown active, {remaining:?} left")]
    CooldownActive { remaining: Duration },

    #[error("No profile found after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

pub struct SpinController<G, S, C, P> {
    gateway: G,
    cooldown: Cooldown<S>,
    clock: C,
    sink: P,
    rng: StdRng,
    settings: Settings,
    state: SpinState,
    current: Option<ProfileRecord>,
    attempts: u32,
}

impl<G, S, C, P> SpinController<G, S, C, P>
where
    G: Gateway,
    S: CooldownStore,
    C: Clock,
    P: PresentationSink,
{
    pub fn new(gateway: G, store: S, clock: C, sink: P, settings: Settings) -> Self {
        let settings = settings.normalized();

        let mut controller = Self {
            gateway,
            cooldown: Cooldown::new(store, settings.cooldown),
            clock,
            sink,
            rng: StdRng::from_entropy(),
            settings,
            state: SpinState::Idle,
            current: None,
            attempts: 0,
        };

        if let Some(remaining) = controller.remaining() {
            debug!("Resuming with {remaining:?} of cooldown left");
            controller.state = SpinState::CooldownActive(remaining);
        }
        controller.sink.render(&controller.state);

        controller
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn current(&self) -> Option<&ProfileRecord> {
        self.current.as_ref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn last_spin(&self) -> Option<i64> {
        self.cooldown.last_spin()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.cooldown.remaining(self.clock.now_ms())
    }

    pub fn can_spin(&self) -> bool {
        self.state != SpinState::Spinning && self.remaining().is_none()
    }

    /// Periodic refresh. Only flips availability and leaves `CooldownActive` once it elapsed.
    pub fn tick(&mut self) -> Option<Duration> {
        let remaining = self.remaining();
        self.sink.availability(remaining);

        if let SpinState::CooldownActive(_) = self.state {
            let next = match remaining {
                Some(remaining) => SpinState::CooldownActive(remaining),
                None => self.settled(),
            };
            self.transition(next);
        }

        remaining
    }

    /// Runs one logical spin to completion: a record, or `max_retries` failed lookups.
    pub async fn spin(&mut self) -> Result<ProfileRecord, SpinError> {
        let now = self.clock.now_ms();

        if let Some(remaining) = self.cooldown.remaining(now) {
            debug!("Spin ignored, {remaining:?} of cooldown left");
            self.transition(SpinState::CooldownActive(remaining));
            return Err(SpinError::CooldownActive { remaining });
        }

        self.cooldown.record(now);
        self.attempts = 0;
        self.current = None;
        self.transition(SpinState::Spinning);
        self.sink.cue(SoundCue::Spin);

        loop {
            let fid = random_fid(&mut self.rng, self.settings.upper_bound);

            match self.gateway.fetch(fid).await {
                Ok(record) => {
                    info!("Revealed fid {} after {} failed attempts", record.fid, self.attempts);

                    self.attempts = 0;
                    self.current = Some(record.clone());
                    self.transition(SpinState::Revealed(record.clone()));
                    self.sink.cue(SoundCue::Reveal);

                    return Ok(record);
                }
                Err(e) => {
                    self.attempts += 1;
                    warn!(
                        "Attempt {}/{} for fid {fid} failed: {e}",
                        self.attempts, self.settings.max_retries
                    );

                    if self.attempts >= self.settings.max_retries {
                        let attempts = self.attempts;
                        self.attempts = 0;
                        self.transition(SpinState::Failed);

                        return Err(SpinError::RetriesExhausted { attempts });
                    }
                }
            }
        }
    }

    fn settled(&self) -> SpinState {
        match &self.current {
            Some(record) => SpinState::Revealed(record.clone()),
            None => SpinState::Idle,
        }
    }

    fn transition(&mut self, state: SpinState) {
        if self.state != state {
            self.state = state;
            self.sink.render(&self.state);
        }
    }
}
