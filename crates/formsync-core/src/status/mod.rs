//! The transient status message line (`#message` on the page).
//!
//! A message is shown at full opacity, starts fading out after
//! [`StatusTimings::display`], and has its text cleared
//! [`StatusTimings::clear_after_fade`] later.  How long the opacity
//! transition takes is up to the renderer; the line only reports the
//! target opacity.
//!
//! ```text
//! show("Saved")        +5000 ms              +1000 ms
//!   Visible ──────────▶ FadingOut ──────────▶ Hidden, text = ""
//! ```
//!
//! Every [`StatusLine::show`] bumps a generation counter.  Timer steps carry
//! the generation they were scheduled for and become no-ops once a newer
//! message has been shown, so an old message's timers can never clear a
//! newer message.

use std::time::Duration;

/// Visual phase of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPhase {
    /// Nothing shown (opacity 0, empty text).
    #[default]
    Hidden,
    /// Message shown at full opacity.
    Visible,
    /// Opacity transitioning to 0; text still present.
    FadingOut,
}

/// Timing of the status fade sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTimings {
    /// How long a transient message stays fully visible.
    pub display: Duration,
    /// Delay between the start of the fade and clearing the text.
    pub clear_after_fade: Duration,
}

impl Default for StatusTimings {
    /// | Field              | Default  |
    /// |--------------------|----------|
    /// | display            | 5000 ms  |
    /// | clear_after_fade   | 1000 ms  |
    fn default() -> Self {
        Self {
            display: Duration::from_millis(5000),
            clear_after_fade: Duration::from_millis(1000),
        }
    }
}

/// State of the status message line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    phase: StatusPhase,
    generation: u64,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `text` at full opacity and returns the new generation.
    pub fn show(&mut self, text: impl Into<String>) -> u64 {
        self.generation += 1;
        self.text = text.into();
        self.phase = StatusPhase::Visible;
        self.generation
    }

    /// Starts the fade-out if `generation` is still current.
    pub fn begin_fade(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != StatusPhase::Visible {
            return false;
        }
        self.phase = StatusPhase::FadingOut;
        true
    }

    /// Clears the text if `generation` is still current.
    pub fn clear(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.text.clear();
        self.phase = StatusPhase::Hidden;
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> StatusPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Target CSS opacity for the current phase.
    pub fn opacity(&self) -> f32 {
        match self.phase {
            StatusPhase::Visible => 1.0,
            StatusPhase::Hidden | StatusPhase::FadingOut => 0.0,
        }
    }
}
