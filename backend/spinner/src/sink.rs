use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use profiles::ProfileRecord;
use tracing::debug;

use crate::{controller::SpinState, cooldown::format_remaining};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Spin,
    Reveal,
}

/// Receives everything the controller wants shown or heard.
pub trait PresentationSink {
    fn render(&mut self, state: &SpinState);

    fn cue(&mut self, cue: SoundCue);

    /// Called on every tick. `None` means a spin is allowed.
    fn availability(&mut self, _remaining: Option<Duration>) {}
}

pub struct TerminalSink {
    muted: bool,
    spinner: Option<ProgressBar>,
    countdown: Option<ProgressBar>,
}

impl TerminalSink {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            spinner: None,
            countdown: None,
        }
    }

    fn clear_bars(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }

        if let Some(countdown) = self.countdown.take() {
            countdown.finish_and_clear();
        }
    }
}

impl PresentationSink for TerminalSink {
    fn render(&mut self, state: &SpinState) {
        if let SpinState::CooldownActive(remaining) = state {
            if let Some(spinner) = self.spinner.take() {
                spinner.finish_and_clear();
            }

            let countdown = self.countdown.get_or_insert_with(ProgressBar::new_spinner);
            countdown.set_message(format!("Next spin in {}", format_remaining(*remaining)));
            countdown.tick();
            return;
        }

        self.clear_bars();

        match state {
            SpinState::Idle => println!("Ready to spin."),
            SpinState::Spinning => {
                let spinner = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                {
                    spinner.set_style(style);
                }
                spinner.set_message("Spinning the wheel...");
                spinner.enable_steady_tick(Duration::from_millis(100));

                self.spinner = Some(spinner);
            }
            SpinState::Revealed(record) => println!("{}", profile_card(record)),
            SpinState::Failed => {
                println!("The wheel came up empty. Spin again once the cooldown allows.")
            }
            SpinState::CooldownActive(_) => {}
        }
    }

    fn cue(&mut self, cue: SoundCue) {
        debug!("Sound cue: {cue:?}");

        if !self.muted {
            eprint!("\x07");
        }
    }
}

pub fn profile_card(record: &ProfileRecord) -> String {
    let mut card = format!(
        "{} (@{})\nfid {} | {} followers | {} following",
        record.display_name,
        record.username,
        record.fid,
        record.follower_count,
        record.following_count
    );

    if !record.bio.is_empty() {
        card.push('\n');
        card.push_str(&record.bio);
    }

    card.push('\n');
    card.push_str(&record.profile_url());

    card
}
