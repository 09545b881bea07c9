//! Pure countdown state machine.
//!
//! The countdown never schedules anything itself: an external driver delivers
//! one-second ticks and reacts to the outcome. Keeping the clock arithmetic
//! here and the scheduling elsewhere lets a session cancel deterministically
//! once a manual submission happens.

/// Outcome of delivering one one-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting down; carries the seconds left after this tick.
    Running(u32),
    /// This tick reached zero. Reported exactly once per countdown.
    Expired,
    /// The countdown was cancelled or has already expired.
    Dormant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Armed,
    Expired,
    Cancelled,
}

/// Second-granular countdown with one-shot expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    state: State,
}

impl Countdown {
    /// Arms a countdown at `initial_seconds`.
    ///
    /// A countdown armed at zero expires on its first tick.
    #[must_use]
    pub fn new(initial_seconds: u32) -> Self {
        Self {
            remaining: initial_seconds,
            state: State::Armed,
        }
    }

    /// Delivers one tick.
    ///
    /// Decrements the remaining seconds with a floor of zero. The transition
    /// to zero yields `Tick::Expired` exactly once; every tick after expiry
    /// or cancellation yields `Tick::Dormant`.
    pub fn tick(&mut self) -> Tick {
        if self.state != State::Armed {
            return Tick::Dormant;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = State::Expired;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    /// Stops the countdown without reporting expiry.
    ///
    /// Idempotent; safe to call after expiry or repeatedly.
    pub fn cancel(&mut self) {
        if self.state == State::Armed {
            self.state = State::Cancelled;
        }
    }

    /// Seconds left. Never negative.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True while ticks still advance the countdown.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state == State::Armed
    }
}
