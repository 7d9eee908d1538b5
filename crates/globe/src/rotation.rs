use foundation::math::{LatLng, is_significant_rotation, normalize_lng};
use foundation::time::Time;
use runtime::DeadlineTimer;
use tracing::trace;

use crate::config::RotationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Dropped: invalid orientation or a camera fly-to is still running.
    Ignored,
    /// First city-mode sample; nothing to compare against yet.
    Baseline,
    /// Below the significance threshold.
    Settled,
    /// The collapse timer was (re)started.
    CollapseScheduled,
    /// Outside city mode the orientation is only tracked.
    Tracked,
}

/// Watches camera orientation and schedules the automatic city → country collapse.
///
/// Only significant rotations in city mode count. Each one restarts the
/// collapse deadline, so the collapse fires once the globe has stopped
/// moving for the full delay.
#[derive(Debug, Clone, Default)]
pub struct RotationWatcher {
    config: RotationConfig,
    last: Option<LatLng>,
    collapse: DeadlineTimer,
    animation: DeadlineTimer,
}

impl RotationWatcher {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Last recorded orientation (smoothed outside city mode).
    pub fn last(&self) -> Option<LatLng> {
        self.last
    }

    pub fn collapse_deadline(&self) -> Option<Time> {
        self.collapse.deadline()
    }

    pub fn is_animating(&self, now: Time) -> bool {
        self.animation.is_pending(now)
    }

    /// Ignore rotation for `duration_s` while the camera flies somewhere.
    ///
    /// The baseline is dropped so the post-flight orientation becomes the new reference.
    pub fn lock_for_animation(&mut self, now: Time, duration_s: f64) {
        self.animation.arm(now, duration_s);
        self.collapse.cancel();
        self.last = None;
    }

    pub fn on_rotate(&mut self, now: Time, at: LatLng, in_city: bool) -> RotationOutcome {
        if !at.is_valid() || self.is_animating(now) {
            return RotationOutcome::Ignored;
        }

        if !in_city {
            self.collapse.cancel();
            self.last = Some(match self.last {
                Some(prev) => blend(prev, at, self.config.smoothing),
                None => at,
            });
            return RotationOutcome::Tracked;
        }

        let Some(prev) = self.last else {
            self.last = Some(at);
            return RotationOutcome::Baseline;
        };
        if !is_significant_rotation(at, prev, self.config.threshold_deg) {
            return RotationOutcome::Settled;
        }
        self.collapse.arm(now, self.config.collapse_delay_s);
        self.last = Some(at);
        trace!(
            lat = at.lat,
            lng = at.lng,
            deadline = ?self.collapse.deadline(),
            "rotation collapse scheduled"
        );
        RotationOutcome::CollapseScheduled
    }

    /// `true` once when the pending collapse is due.
    pub fn poll(&mut self, now: Time) -> bool {
        self.collapse.poll(now)
    }

    /// Drop every pending deadline and the baseline.
    pub fn cancel(&mut self) {
        self.collapse.cancel();
        self.animation.cancel();
        self.last = None;
    }
}

fn blend(prev: LatLng, next: LatLng, t: f64) -> LatLng {
    let lat = prev.lat + (next.lat - prev.lat) * t;
    let lng = prev.lng + normalize_lng(next.lng - prev.lng) * t;
    LatLng::new(lat, normalize_lng(lng))
}
