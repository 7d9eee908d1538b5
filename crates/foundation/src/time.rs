/// Host clock reading in seconds.
///
/// The core never reads a wall clock itself; every event carries the time the
/// host observed it, which keeps timers replayable in tests.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1_000.0)
    }

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, secs: f64) -> Self {
        Time(self.0 + secs.max(0.0))
    }

    /// Seconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}
