//! Scripted input replay.
//!
//! A script is a JSON array of timestamped steps:
//!
//! ```json
//! [
//!   { "at": 0.0, "op": "click", "id": "country-JP" },
//!   { "at": 2.0, "op": "rotate", "lat": 35.0, "lng": 120.0 },
//!   { "at": 3.5, "op": "tick" }
//! ]
//! ```
//!
//! Each step is fed to a [`GlobeSession`] and the resulting events are applied
//! to a [`StandInRenderer`], so clicks resolve against the clusters that
//! would be on screen at that moment.

use foundation::time::Time;
use globe::{GlobeEvent, GlobeSession, Mode};
use layers::ScreenProjector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::view::StandInRenderer;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Action {
    Click { id: String },
    Zoom { level: f64 },
    Rotate { lat: f64, lng: f64 },
    Tick,
    Reset,
    Unmount,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Click { .. } => "click",
            Action::Zoom { .. } => "zoom",
            Action::Rotate { .. } => "rotate",
            Action::Tick => "tick",
            Action::Reset => "reset",
            Action::Unmount => "unmount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Host clock, seconds. Must not go backwards.
    pub at: f64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplayError {
    Parse(String),
    OutOfOrder { index: usize, at: f64 },
    UnknownCluster { index: usize, id: String },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Parse(msg) => write!(f, "script is not valid JSON: {msg}"),
            ReplayError::OutOfOrder { index, at } => {
                write!(f, "step #{index} at {at}s goes back in time")
            }
            ReplayError::UnknownCluster { index, id } => {
                write!(f, "step #{index} clicks {id:?}, which is not on screen")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

pub fn parse_script(raw: &str) -> Result<Vec<Step>, ReplayError> {
    serde_json::from_str(raw).map_err(|e| ReplayError::Parse(e.to_string()))
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub at: f64,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub mode: Mode,
    pub depth: usize,
    pub events: Vec<GlobeEvent>,
    /// Labels on screen after the step.
    pub clusters: Vec<String>,
}

pub fn replay(
    session: &mut GlobeSession,
    renderer: &mut StandInRenderer,
    steps: &[Step],
) -> Result<Vec<StepRecord>, ReplayError> {
    let mut records = Vec::with_capacity(steps.len());
    let mut last = f64::NEG_INFINITY;

    for (index, step) in steps.iter().enumerate() {
        if step.at.is_nan() || step.at < last {
            return Err(ReplayError::OutOfOrder { index, at: step.at });
        }
        last = step.at;
        let now = Time(step.at);

        let outcome = match &step.action {
            Action::Click { id } => {
                let on_screen = session.clusters(Some(&renderer.camera as &dyn ScreenProjector));
                let cluster = on_screen
                    .iter()
                    .find(|c| &c.id == id)
                    .ok_or_else(|| ReplayError::UnknownCluster {
                        index,
                        id: id.clone(),
                    })?;
                Some(format!("{:?}", session.handle_click(now, cluster)))
            }
            Action::Zoom { level } => {
                renderer.zoom_to(*level);
                Some(format!("{:?}", session.handle_zoom(now, *level)))
            }
            Action::Rotate { lat, lng } => {
                renderer.rotate_to(*lat, *lng);
                Some(format!("{:?}", session.handle_rotate(now, *lat, *lng)))
            }
            Action::Tick => {
                session.tick(now);
                None
            }
            Action::Reset => {
                session.reset(now);
                None
            }
            Action::Unmount => {
                session.unmount();
                None
            }
        };

        let events: Vec<GlobeEvent> = session
            .drain_events()
            .into_iter()
            .map(|stamped| stamped.event)
            .collect();
        for event in &events {
            renderer.apply(event);
        }

        let clusters = session
            .clusters(Some(&renderer.camera as &dyn ScreenProjector))
            .into_iter()
            .map(|c| c.id)
            .collect();
        debug!(index, op = step.action.name(), events = events.len(), "replayed step");
        records.push(StepRecord {
            at: step.at,
            op: step.action.name(),
            outcome,
            mode: session.mode().clone(),
            depth: session.navigator().depth(),
            events,
            clusters,
        });
    }
    Ok(records)
}
