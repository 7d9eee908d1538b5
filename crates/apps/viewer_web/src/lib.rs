use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use catalog::PlaceCatalog;
use foundation::math::LatLng;
use foundation::time::Time;
use globe::{GlobeConfig, GlobeEvent, GlobeSession};
use layers::{Cluster, ProjectionError, ScreenProjector};

/// Projection callback supplied by the page's globe renderer:
/// `(lat, lng) => ({ x, y }) | null`.
struct JsProjector<'a> {
    func: &'a js_sys::Function,
}

impl ScreenProjector for JsProjector<'_> {
    fn project(&self, at: LatLng) -> Result<Option<[f64; 2]>, ProjectionError> {
        let value = self
            .func
            .call2(&JsValue::NULL, &JsValue::from_f64(at.lat), &JsValue::from_f64(at.lng))
            .map_err(|err| {
                web_sys::console::warn_2(&JsValue::from_str("projection failed"), &err);
                ProjectionError(format!("{err:?}"))
            })?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        let coord = |key: &str| {
            js_sys::Reflect::get(&value, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_f64())
        };
        screen_point(coord("x"), coord("y")).map(Some)
    }
}

/// Both coordinates must be present; the builder rejects non-finite ones.
fn screen_point(x: Option<f64>, y: Option<f64>) -> Result<[f64; 2], ProjectionError> {
    match (x, y) {
        (Some(x), Some(y)) => Ok([x, y]),
        _ => Err(ProjectionError("projection result has no numeric x/y".into())),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventOut<'a> {
    at_ms: f64,
    #[serde(flatten)]
    event: &'a GlobeEvent,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One globe view on the page. Create one per mounted globe and call
/// `unmount` when the view goes away.
#[wasm_bindgen]
pub struct GlobeView {
    session: GlobeSession,
    projector: Option<js_sys::Function>,
    /// Labels from the last `clusters()` call; clicks are resolved against these.
    on_screen: Vec<Cluster>,
}

#[wasm_bindgen]
impl GlobeView {
    #[wasm_bindgen(constructor)]
    pub fn new(places_json: &str, config_json: Option<String>) -> Result<GlobeView, JsValue> {
        let config = match config_json {
            Some(raw) => GlobeConfig::from_json_str(&raw).map_err(js_err)?,
            None => GlobeConfig::default(),
        };
        let catalog = PlaceCatalog::from_json_str(places_json).map_err(js_err)?;
        Ok(GlobeView {
            session: GlobeSession::from_catalog(catalog, config),
            projector: None,
            on_screen: Vec::new(),
        })
    }

    /// Install (or clear, with `null`) the renderer's projection callback.
    pub fn set_projector(&mut self, projector: Option<js_sys::Function>) {
        self.projector = projector;
    }

    pub fn set_places(&mut self, places_json: &str) -> Result<(), JsValue> {
        let catalog = PlaceCatalog::from_json_str(places_json).map_err(js_err)?;
        self.session.set_places(catalog.into_places());
        self.on_screen.clear();
        Ok(())
    }

    /// Current labels as a JSON array.
    pub fn clusters(&mut self) -> Result<String, JsValue> {
        let projector = self.projector.as_ref().map(|func| JsProjector { func });
        self.on_screen = self
            .session
            .clusters(projector.as_ref().map(|p| p as &dyn ScreenProjector));
        serde_json::to_string(&self.on_screen).map_err(js_err)
    }

    /// Returns `false` when `cluster_id` is not among the last built labels.
    pub fn handle_click(&mut self, now_ms: f64, cluster_id: &str) -> bool {
        let Some(cluster) = self.on_screen.iter().find(|c| c.id == cluster_id) else {
            return false;
        };
        self.session.handle_click(Time::from_millis(now_ms), cluster);
        true
    }

    pub fn handle_zoom(&mut self, now_ms: f64, level: f64) {
        self.session.handle_zoom(Time::from_millis(now_ms), level);
    }

    pub fn handle_rotate(&mut self, now_ms: f64, lat: f64, lng: f64) {
        self.session.handle_rotate(Time::from_millis(now_ms), lat, lng);
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.session.tick(Time::from_millis(now_ms));
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.session.reset(Time::from_millis(now_ms));
    }

    pub fn unmount(&mut self) {
        self.session.unmount();
        self.projector = None;
        self.on_screen.clear();
    }

    /// Pending renderer instructions as a JSON array, oldest first.
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let drained = self.session.drain_events();
        let out: Vec<EventOut<'_>> = drained
            .iter()
            .map(|stamped| EventOut {
                at_ms: stamped.at.seconds() * 1_000.0,
                event: &stamped.event,
            })
            .collect();
        serde_json::to_string(&out).map_err(js_err)
    }

    /// Current mode as JSON, e.g. `{"kind":"city","expandedCountry":"JP"}`.
    pub fn mode(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.mode()).map_err(js_err)
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Fetch a place list and return its JSON text for [`GlobeView::new`] / `set_places`.
#[wasm_bindgen]
pub async fn fetch_places(url: String) -> Result<String, JsValue> {
    let resp = Request::get(&url).send().await.map_err(js_err)?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "GET {url} failed with status {}",
            resp.status()
        )));
    }
    resp.text().await.map_err(js_err)
}
