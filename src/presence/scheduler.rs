//! Single-slot auto-collapse timer.
//!
//! The timer is a deadline that the control loop polls, so firing always
//! happens on the control thread. Each arm mints a new token; a deadline
//! whose token is no longer current can never fire.

use std::time::{Duration, Instant};

/// Identifies one arming of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    deadline: Instant,
    delay: Duration,
}

#[derive(Debug, Default)]
pub struct AutoCollapseScheduler {
    pending: Option<Pending>,
    next_token: u64,
}

impl AutoCollapseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates any pending timer, then schedules a new one `delay` from
    /// `now` when a delay is given. `None` means auto-collapse is off or the
    /// bar is not expanded.
    pub fn arm_at(&mut self, delay: Option<Duration>, now: Instant) -> Option<TimerToken> {
        self.disarm();
        let delay = delay?;

        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending = Some(Pending {
            token,
            deadline: now + delay,
            delay,
        });
        log::debug!("Auto-collapse armed for {:?}", delay);
        Some(token)
    }

    pub fn arm(&mut self, delay: Option<Duration>) -> Option<TimerToken> {
        self.arm_at(delay, Instant::now())
    }

    pub fn disarm(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::trace!("Auto-collapse timer {:?} invalidated", pending.token);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.map(|p| p.delay)
    }

    pub fn current_token(&self) -> Option<TimerToken> {
        self.pending.map(|p| p.token)
    }

    /// Returns true exactly once when the pending deadline has passed,
    /// clearing the slot.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
