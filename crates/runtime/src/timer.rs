use foundation::time::Time;

/// Restartable single-shot deadline.
///
/// Arming an already-armed timer replaces the pending deadline, so there is
/// never more than one firing in flight. The timer does nothing on its own;
/// the owner calls [`DeadlineTimer::poll`] with the current host time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeadlineTimer {
    deadline: Option<Time>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Time, delay_s: f64) {
        self.deadline = Some(now.after(delay_s));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    /// Armed and the deadline has not yet passed.
    pub fn is_pending(&self, now: Time) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    /// Returns `true` exactly once when `now` reaches the deadline, disarming the timer.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeadlineTimer;
    use foundation::time::Time;

    #[test]
    fn fires_once_at_deadline() {
        let mut t = DeadlineTimer::new();
        t.arm(Time(1.0), 0.5);
        assert!(!t.poll(Time(1.4)));
        assert!(t.poll(Time(1.5)));
        assert!(!t.poll(Time(2.0)));
        assert_eq!(t.deadline(), None);
    }

    #[test]
    fn rearming_replaces_pending_deadline() {
        let mut t = DeadlineTimer::new();
        t.arm(Time(0.0), 1.0);
        t.arm(Time(0.8), 1.0);
        assert_eq!(t.deadline(), Some(Time(1.8)));
        assert!(!t.poll(Time(1.0)));
        assert!(t.poll(Time(1.8)));
        assert!(!t.poll(Time(10.0)));
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut t = DeadlineTimer::new();
        t.arm(Time(0.0), 1.0);
        assert!(t.is_pending(Time(0.5)));
        t.cancel();
        assert!(!t.is_pending(Time(0.5)));
        assert!(!t.poll(Time(5.0)));
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let mut t = DeadlineTimer::new();
        t.arm(Time(3.0), 0.0);
        assert!(t.poll(Time(3.0)));
    }
}
