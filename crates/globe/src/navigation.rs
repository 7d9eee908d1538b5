//! Drill-in / drill-out state machine for the globe.
//!
//! Clicking a continent or country label pushes the current zoom level and
//! selection; zooming out (or a rotation collapse) pops exactly one level and
//! hands back the saved zoom so the camera can snap to it. Zooming far out
//! clears the history and switches to continent mode.

use catalog::Place;
use layers::{Cluster, ClusterKind};
use tracing::{debug, trace};

use crate::config::NavigationConfig;
use crate::mode::Mode;

/// Everything needed to undo one drill-in.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillFrame {
    pub zoom: f64,
    /// `None` means "everything was visible".
    pub selection: Option<Vec<Place>>,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The click does not apply in the current mode.
    Ignored,
    /// A continent was opened; its countries are now the selection.
    ContinentOpened,
    /// A country was opened in city mode. The camera is about to fly there.
    CountryOpened { country_id: String },
    /// A city label was clicked; no state change.
    CityFocused,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ZoomOutcome {
    /// Jitter, or city mode.
    Ignored,
    /// New zoom magnitude recorded; no transition.
    Tracked,
    /// Zoomed all the way out: continent mode, empty history.
    ContinentReset,
    /// One drill level undone. `snap_zoom_to` is the altitude the camera should lock to.
    Popped { snap_zoom_to: Option<f64> },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    config: NavigationConfig,
    mode: Mode,
    zoom: f64,
    selection: Option<Vec<Place>>,
    // Zoom and selection history are kept in one stack so they can never drift apart.
    stack: Vec<DrillFrame>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl Navigator {
    pub fn new(config: NavigationConfig) -> Self {
        let zoom = config.default_zoom;
        Self {
            config,
            mode: Mode::Country,
            zoom,
            selection: None,
            stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The active place subset, `None` when unfiltered.
    pub fn selection(&self) -> Option<&[Place]> {
        self.selection.as_deref()
    }

    /// Places to cluster: the active selection, or everything.
    pub fn visible<'a>(&'a self, all: &'a [Place]) -> &'a [Place] {
        self.selection.as_deref().unwrap_or(all)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn frames(&self) -> &[DrillFrame] {
        &self.stack
    }

    pub fn zoom_stack(&self) -> impl Iterator<Item = f64> + '_ {
        self.stack.iter().map(|f| f.zoom)
    }

    pub fn selection_stack(&self) -> impl Iterator<Item = Option<&[Place]>> + '_ {
        self.stack.iter().map(|f| f.selection.as_deref())
    }

    pub fn handle_click(&mut self, cluster: &Cluster) -> ClickOutcome {
        match cluster.kind {
            ClusterKind::City => ClickOutcome::CityFocused,
            _ if self.mode.is_city() => {
                trace!(cluster = %cluster.id, "ignoring group click in city mode");
                ClickOutcome::Ignored
            }
            ClusterKind::Continent => {
                self.push(cluster.items.clone(), Mode::Country);
                debug!(cluster = %cluster.id, depth = self.depth(), "opened continent");
                ClickOutcome::ContinentOpened
            }
            ClusterKind::Country => {
                let Some(country_id) = cluster
                    .country_id
                    .clone()
                    .or_else(|| cluster.items.first().map(|p| p.country_id.clone()))
                else {
                    return ClickOutcome::Ignored;
                };
                self.push(
                    cluster.items.clone(),
                    Mode::City {
                        expanded_country: country_id.clone(),
                    },
                );
                debug!(%country_id, depth = self.depth(), "opened country");
                ClickOutcome::CountryOpened { country_id }
            }
        }
    }

    pub fn handle_zoom(&mut self, level: f64) -> ZoomOutcome {
        if !level.is_finite() {
            return ZoomOutcome::Ignored;
        }

        if round2(level) >= self.config.continent_threshold() {
            let changed = self.mode != Mode::Continent || !self.stack.is_empty();
            self.mode = Mode::Continent;
            self.stack.clear();
            self.selection = None;
            self.zoom = level;
            if changed {
                debug!(level, "zoomed out to continents");
                return ZoomOutcome::ContinentReset;
            }
            return ZoomOutcome::Tracked;
        }

        if self.mode.is_city() {
            return ZoomOutcome::Ignored;
        }

        let delta = level - self.zoom;
        if delta > self.config.zoom_epsilon && !self.stack.is_empty() {
            let snap = self.pop();
            if let Some(zoom) = snap {
                self.zoom = zoom;
            }
            debug!(level, snap = ?snap, depth = self.depth(), "zoom out undid one level");
            return ZoomOutcome::Popped { snap_zoom_to: snap };
        }

        let boundary = self.config.city_country_boundary;
        if self.zoom < boundary && level >= boundary && !self.stack.is_empty() {
            self.pop();
            self.zoom = level;
            debug!(level, depth = self.depth(), "crossed city/country boundary");
            return ZoomOutcome::Popped { snap_zoom_to: None };
        }

        if delta.abs() > self.config.smooth_zoom_threshold {
            self.zoom = level;
            return ZoomOutcome::Tracked;
        }

        trace!(level, "zoom jitter ignored");
        ZoomOutcome::Ignored
    }

    /// Record where the camera is headed without treating it as user zoom.
    ///
    /// Used for programmatic fly-tos, whose altitude change must not read as
    /// a zoom-out that undoes the drill-in that caused it.
    pub fn settle_zoom(&mut self, level: f64) {
        if level.is_finite() {
            trace!(level, "zoom settled");
            self.zoom = level;
        }
    }

    /// Undo one level and land in country mode, whatever mode the frame recorded.
    ///
    /// Returns `false` when there was nothing to collapse.
    pub fn collapse_to_country(&mut self) -> bool {
        if !self.mode.is_city() && self.stack.is_empty() {
            return false;
        }
        self.pop();
        self.mode = Mode::Country;
        debug!(depth = self.depth(), "collapsed to country view");
        true
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.selection = None;
        self.mode = Mode::Country;
        self.zoom = self.config.default_zoom;
        debug!("navigation reset");
    }

    fn push(&mut self, selection: Vec<Place>, next: Mode) {
        let frame = DrillFrame {
            zoom: self.zoom,
            selection: self.selection.take(),
            mode: std::mem::replace(&mut self.mode, next),
        };
        self.stack.push(frame);
        self.selection = Some(selection);
    }

    /// Restores the popped frame and returns its zoom.
    fn pop(&mut self) -> Option<f64> {
        let frame = self.stack.pop()?;
        self.selection = frame.selection;
        self.mode = frame.mode;
        Some(frame.zoom)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
