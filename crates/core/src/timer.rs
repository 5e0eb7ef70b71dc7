//! Scroll timer - single-shot traversal countdown with generation tokens
//!
//! The host loop drives the timer with [`ScrollTimer::tick`]. Every
//! [`ScrollTimer::arm`] bumps a generation counter and hands out a
//! [`TimerToken`]; expiry is only honored for the token of the current
//! generation, so a late callback from a finished round is dropped.

use std::time::Duration;

/// Identifies one arming of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running {
        token: TimerToken,
        elapsed: Duration,
        limit: Duration,
    },
    /// Countdown reached zero; waiting for the owner to claim the expiry.
    Fired { token: TimerToken, limit: Duration },
}

/// Cancelable traversal countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTimer {
    generation: u64,
    state: TimerState,
}

impl ScrollTimer {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: TimerState::Idle,
        }
    }

    /// Start a new countdown, replacing any running one.
    pub fn arm(&mut self, limit: Duration) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);
        self.state = TimerState::Running {
            token,
            elapsed: Duration::ZERO,
            limit,
        };
        token
    }

    /// Stop the countdown. Outstanding tokens become stale.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Advance the countdown. Returns the token exactly once, on the tick
    /// that reaches the limit.
    pub fn tick(&mut self, dt: Duration) -> Option<TimerToken> {
        let TimerState::Running {
            token,
            elapsed,
            limit,
        } = self.state
        else {
            return None;
        };

        let elapsed = elapsed.saturating_add(dt);
        if elapsed >= limit {
            self.state = TimerState::Fired { token, limit };
            Some(token)
        } else {
            self.state = TimerState::Running {
                token,
                elapsed,
                limit,
            };
            None
        }
    }

    /// Accept an expiry for `token`. Succeeds at most once per arming, and
    /// only for the current generation.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        match self.state {
            TimerState::Running { token: current, .. } | TimerState::Fired { token: current, .. }
                if current == token =>
            {
                self.state = TimerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Whether `token` belongs to the live countdown.
    pub fn is_current(&self, token: TimerToken) -> bool {
        match self.state {
            TimerState::Running { token: current, .. } | TimerState::Fired { token: current, .. } => {
                current == token
            }
            TimerState::Idle => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Traversal fraction in [0, 1]. Zero when idle.
    pub fn progress(&self) -> f32 {
        match self.state {
            TimerState::Idle => 0.0,
            TimerState::Fired { .. } => 1.0,
            TimerState::Running { elapsed, limit, .. } => {
                if limit.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / limit.as_secs_f32()).clamp(0.0, 1.0)
                }
            }
        }
    }

    pub fn remaining(&self) -> Duration {
        match self.state {
            TimerState::Running { elapsed, limit, .. } => limit.saturating_sub(elapsed),
            _ => Duration::ZERO,
        }
    }

    pub fn limit(&self) -> Option<Duration> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running { limit, .. } | TimerState::Fired { limit, .. } => Some(limit),
        }
    }
}

impl Default for ScrollTimer {
    fn default() -> Self {
        Self::new()
    }
}
