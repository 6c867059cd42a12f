use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Round timer parameters. Defaults match the game: a 10 second countdown,
/// 50 ms tick granularity, and a 1 second grace interval before the countdown
/// starts so an instant correct answer can still earn full points.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub duration: Duration,
    pub tick: Duration,
    pub grace: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(10_000),
            tick: Duration::from_millis(50),
            grace: Duration::from_millis(1_000),
        }
    }
}

/// Per-instance cancellation token. Once tripped, the expiry callback for
/// this instance must never run; the expiry task checks the token before
/// delivering.
#[derive(Debug, Clone)]
pub struct TimerToken(Arc<AtomicBool>);

impl TimerToken {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A single armed countdown. The remaining time is derived from the arm
/// instant, so readers see a consistent value without any shared tick state.
#[derive(Debug)]
pub struct RoundTimer {
    config: TimerConfig,
    armed_at: Instant,
    token: TimerToken,
}

impl RoundTimer {
    pub fn arm(config: TimerConfig) -> Self {
        Self {
            config,
            armed_at: Instant::now(),
            token: TimerToken::new(),
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn token(&self) -> TimerToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Synchronously trips the token. No expiry fires for this instance
    /// afterwards, even if its task is already sleeping.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// How long the expiry task should sleep before firing: the countdown
    /// only starts once the grace interval has elapsed.
    pub fn expiry_delay(&self) -> Duration {
        self.config.grace + self.config.duration
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    /// Remaining time as observed at `now`. Reports the full duration while
    /// still inside the grace interval, then decreases in whole ticks.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.armed_at);
        if elapsed <= self.config.grace {
            return self.config.duration;
        }
        let tick_ms = self.config.tick.as_millis().max(1) as u64;
        let past_grace = (elapsed - self.config.grace).as_millis() as u64;
        let counted_down = Duration::from_millis((past_grace / tick_ms) * tick_ms);
        self.config.duration.saturating_sub(counted_down)
    }
}
