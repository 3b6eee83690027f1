//! Deadline-based timers polled from the frame loop.
//!
//! Each delayed action owns exactly one slot. Scheduling overwrites whatever
//! was pending, so an old timer can never fire against newer state.

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Deadline(pub f64);

impl Deadline {
    pub fn after(now_ms: f64, delay_ms: f64) -> Self {
        Deadline(now_ms + delay_ms)
    }

    pub fn is_due(self, now_ms: f64) -> bool {
        now_ms >= self.0
    }
}

#[derive(Clone, Debug)]
pub struct TimerSlot<T> {
    pending: Option<(Deadline, T)>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> TimerSlot<T> {
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) {
        self.pending = Some((Deadline::after(now_ms, delay_ms), payload));
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remove and return the payload once its deadline has passed.
    pub fn take_due(&mut self, now_ms: f64) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if deadline.is_due(now_ms) => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }
}
