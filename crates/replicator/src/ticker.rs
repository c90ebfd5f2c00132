/// Fixed-rate step scheduler fed with host frame time.
///
/// Fires at most once per `advance` call and restarts its interval when it
/// does, so a long stall yields one step instead of a burst.
#[derive(Debug, Clone)]
pub struct FixedTicker {
    interval: f32,
    accumulator: f32,
    enabled: bool,
}

impl FixedTicker {
    pub fn new(interval: f32) -> Self {
        assert!(interval >= 0.0, "tick interval must not be negative");
        Self {
            interval,
            accumulator: 0.0,
            enabled: false,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Subscribe to or unsubscribe from the host clock. Pending time is kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Add frame time. Returns true when a step is due.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.enabled {
            return false;
        }
        self.accumulator += dt;
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_fires() {
        let mut ticker = FixedTicker::new(0.1);
        assert!(!ticker.advance(1.0));
        assert!(!ticker.is_enabled());
    }

    #[test]
    fn fires_once_interval_elapses() {
        let mut ticker = FixedTicker::new(0.1);
        ticker.set_enabled(true);
        assert!(!ticker.advance(0.06));
        assert!(ticker.advance(0.06));
        assert!(!ticker.advance(0.06));
    }

    #[test]
    fn stall_fires_once() {
        let mut ticker = FixedTicker::new(0.1);
        ticker.set_enabled(true);
        assert!(ticker.advance(5.0));
        assert!(!ticker.advance(0.01));
    }

    #[test]
    fn pause_keeps_pending_time() {
        let mut ticker = FixedTicker::new(0.1);
        ticker.set_enabled(true);
        ticker.advance(0.07);
        ticker.set_enabled(false);
        assert!(!ticker.advance(1.0));
        ticker.set_enabled(true);
        assert!(ticker.advance(0.05));
    }

    #[test]
    fn zero_interval_fires_every_frame() {
        let mut ticker = FixedTicker::new(0.0);
        ticker.set_enabled(true);
        assert!(ticker.advance(0.0));
        assert!(ticker.advance(0.001));
        assert_eq!(ticker.interval(), 0.0);
    }
}
