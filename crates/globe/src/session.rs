//! One interactive globe view.
//!
//! [`GlobeSession`] ties the navigator, the rotation watcher and the
//! zoom-snap timer to a place list. Hosts feed it input events with their
//! own clock, call [`GlobeSession::tick`] once per frame and apply whatever
//! [`GlobeEvent`]s come out of [`GlobeSession::drain_events`].

use catalog::{Place, PlaceCatalog};
use foundation::math::LatLng;
use foundation::time::Time;
use layers::{BuildReport, Cluster, ClusterBuilder, ScreenProjector};
use runtime::{DeadlineTimer, EventBus, Stamped};
use serde::Serialize;
use tracing::{debug, info};

use crate::camera::{CameraMove, fit_camera};
use crate::config::GlobeConfig;
use crate::mode::Mode;
use crate::navigation::{ClickOutcome, Navigator, ZoomOutcome};
use crate::rotation::{RotationOutcome, RotationWatcher};

/// Instructions for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GlobeEvent {
    ModeChanged { mode: Mode },
    CameraMove(CameraMove),
    /// Lock the camera to exactly this altitude (one-shot, after a zoom undo).
    SnapZoom { altitude: f64 },
    /// A city view was closed automatically after the globe was rotated away.
    Collapsed,
}

pub struct GlobeSession {
    config: GlobeConfig,
    places: Vec<Place>,
    builder: ClusterBuilder,
    navigator: Navigator,
    rotation: RotationWatcher,
    snap: DeadlineTimer,
    /// Armed while a camera fly-to is running; zoom reports are only recorded.
    flight: DeadlineTimer,
    pending_snap: Option<f64>,
    events: EventBus<GlobeEvent>,
    mounted: bool,
}

impl GlobeSession {
    pub fn new(places: Vec<Place>, config: GlobeConfig) -> Self {
        info!(places = places.len(), "globe session mounted");
        Self {
            builder: ClusterBuilder::new(config.clusters.clone()),
            navigator: Navigator::new(config.navigation.clone()),
            rotation: RotationWatcher::new(config.rotation.clone()),
            config,
            places,
            snap: DeadlineTimer::new(),
            flight: DeadlineTimer::new(),
            pending_snap: None,
            events: EventBus::new(),
            mounted: true,
        }
    }

    pub fn from_catalog(catalog: PlaceCatalog, config: GlobeConfig) -> Self {
        Self::new(catalog.into_places(), config)
    }

    /// Swap in a freshly fetched place list. Drill history refers to the old
    /// list, so navigation starts over at the root.
    pub fn set_places(&mut self, places: Vec<Place>) {
        self.places = places;
        self.navigator.reset();
        self.cancel_timers();
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn mode(&self) -> &Mode {
        self.navigator.mode()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn rotation(&self) -> &RotationWatcher {
        &self.rotation
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// A fly-to issued by the session is still running.
    pub fn is_flying(&self, now: Time) -> bool {
        self.flight.is_pending(now)
    }

    /// Snap altitude waiting for the next [`tick`](Self::tick).
    pub fn pending_snap(&self) -> Option<f64> {
        self.pending_snap
    }

    pub fn visible_places(&self) -> &[Place] {
        self.navigator.visible(&self.places)
    }

    pub fn clusters(&self, projector: Option<&dyn ScreenProjector>) -> Vec<Cluster> {
        self.clusters_with_report(projector).0
    }

    pub fn clusters_with_report(
        &self,
        projector: Option<&dyn ScreenProjector>,
    ) -> (Vec<Cluster>, BuildReport) {
        self.builder.build_with_report(
            self.visible_places(),
            self.navigator.zoom(),
            self.navigator.mode().cluster_mode(),
            projector,
        )
    }

    pub fn handle_click(&mut self, now: Time, cluster: &Cluster) -> ClickOutcome {
        if !self.mounted {
            return ClickOutcome::Ignored;
        }
        let before = self.navigator.mode().clone();
        let outcome = self.navigator.handle_click(cluster);
        match &outcome {
            ClickOutcome::Ignored => {}
            ClickOutcome::ContinentOpened => {
                self.emit_mode_change(now, &before);
                self.fly_to_visible(now);
            }
            ClickOutcome::CountryOpened { .. } => {
                self.rotation
                    .lock_for_animation(now, self.config.navigation.zoom_animation_s);
                self.emit_mode_change(now, &before);
                self.fly_to_visible(now);
            }
            ClickOutcome::CityFocused => {
                let at = cluster.position();
                if at.is_valid() {
                    let camera = &self.config.camera;
                    self.events.emit(
                        now,
                        GlobeEvent::CameraMove(CameraMove {
                            lat: at.lat,
                            lng: at.lng,
                            altitude: camera.min_altitude,
                            duration_ms: camera.fly_duration_ms,
                        }),
                    );
                }
            }
        }
        outcome
    }

    pub fn handle_zoom(&mut self, now: Time, level: f64) -> ZoomOutcome {
        if !self.mounted {
            return ZoomOutcome::Ignored;
        }
        if self.is_flying(now) {
            self.navigator.settle_zoom(level);
            return ZoomOutcome::Ignored;
        }
        let before = self.navigator.mode().clone();
        let outcome = self.navigator.handle_zoom(level);
        match outcome {
            ZoomOutcome::Popped {
                snap_zoom_to: Some(altitude),
            } => {
                self.pending_snap = Some(altitude);
                self.snap.arm(now, 0.0);
            }
            ZoomOutcome::ContinentReset => {
                self.cancel_timers();
            }
            _ => {}
        }
        self.emit_mode_change(now, &before);
        outcome
    }

    pub fn handle_rotate(&mut self, now: Time, lat: f64, lng: f64) -> RotationOutcome {
        if !self.mounted {
            return RotationOutcome::Ignored;
        }
        let in_city = self.navigator.mode().is_city();
        self.rotation.on_rotate(now, LatLng::new(lat, lng), in_city)
    }

    /// Fire due timers. Call once per frame.
    pub fn tick(&mut self, now: Time) {
        if !self.mounted {
            return;
        }
        if self.snap.poll(now)
            && let Some(altitude) = self.pending_snap.take()
        {
            self.events.emit(now, GlobeEvent::SnapZoom { altitude });
        }
        if self.rotation.poll(now) && self.navigator.mode().is_city() {
            let before = self.navigator.mode().clone();
            if self.navigator.collapse_to_country() {
                debug!(depth = self.navigator.depth(), "rotation collapsed city view");
                self.events.emit(now, GlobeEvent::Collapsed);
                self.emit_mode_change(now, &before);
                self.fly_to_visible(now);
            }
        }
    }

    /// Back to the root view ("recenter").
    pub fn reset(&mut self, now: Time) {
        let before = self.navigator.mode().clone();
        self.navigator.reset();
        self.cancel_timers();
        if !self.mounted {
            return;
        }
        self.emit_mode_change(now, &before);
        if let Some(fit) = fit_camera(&self.places, &self.config.camera) {
            self.fly(
                now,
                CameraMove {
                    altitude: self.config.navigation.default_zoom,
                    ..fit
                },
            );
        }
    }

    /// The host view is going away: nothing may fire after this.
    pub fn unmount(&mut self) {
        self.cancel_timers();
        self.mounted = false;
        info!("globe session unmounted");
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<GlobeEvent>> {
        self.events.drain()
    }

    fn cancel_timers(&mut self) {
        self.snap.cancel();
        self.flight.cancel();
        self.pending_snap = None;
        self.rotation.cancel();
    }

    fn emit_mode_change(&mut self, now: Time, before: &Mode) {
        let mode = self.navigator.mode();
        if mode != before {
            debug!(?before, ?mode, "mode changed");
            self.events.emit(now, GlobeEvent::ModeChanged { mode: mode.clone() });
        }
    }

    fn fly_to_visible(&mut self, now: Time) {
        if let Some(mv) = fit_camera(self.visible_places(), &self.config.camera) {
            self.fly(now, mv);
        }
    }

    /// Emit a fly-to and treat its altitude as the current zoom from here on.
    fn fly(&mut self, now: Time, mv: CameraMove) {
        self.navigator.settle_zoom(mv.altitude);
        self.flight.arm(now, self.config.navigation.zoom_animation_s);
        self.events.emit(now, GlobeEvent::CameraMove(mv));
    }
}
