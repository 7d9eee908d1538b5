//! Place clustering for globe labels.
//!
//! Places are grouped per country; country labels that collide on screen and
//! sit close together on the ground are folded into continent labels. In city
//! mode every place of the expanded country gets its own label.

use std::collections::{BTreeMap, VecDeque};

use catalog::{Continent, Place, continent_of, country_name, flag_emoji};
use foundation::math::{LatLng, OrthographicCamera, haversine_km, mean_centroid, weighted_centroid};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::labels::LabelMetrics;

/// Fraction of the estimated label width that has to overlap before labels count as colliding.
pub const EFFECTIVE_WIDTH_RATIO: f64 = 0.6;
/// Two labels collide when their centers are closer than this share of their summed widths.
pub const OVERLAP_RATIO: f64 = 0.5;
/// Countries further apart than this never merge, however close their labels are on screen.
pub const GEO_MERGE_KM: f64 = 3_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterKind {
    #[serde(rename = "individualCity")]
    City,
    #[serde(rename = "countryCluster")]
    Country,
    #[serde(rename = "continentCluster")]
    Continent,
}

/// A label descriptor handed to the renderer.
///
/// Clusters are rebuilt from scratch on every input change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub flag: String,
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub items: Vec<Place>,
    pub count: usize,
    pub kind: ClusterKind,
    pub has_records: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Set for city and country clusters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<Continent>,
}

impl Cluster {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// The renderer could not project at all (no camera yet, or its callback threw).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionError(pub String);

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "projection failed: {}", self.0)
    }
}

impl std::error::Error for ProjectionError {}

/// Maps a geographic position to viewport pixels.
///
/// `Ok(None)` means this one point is not visible (far side of the globe).
/// An error, or non-finite pixels, means the projection as a whole is broken
/// and the builder falls back to unmerged country clusters.
pub trait ScreenProjector {
    fn project(&self, at: LatLng) -> Result<Option<[f64; 2]>, ProjectionError>;
}

impl ScreenProjector for OrthographicCamera {
    fn project(&self, at: LatLng) -> Result<Option<[f64; 2]>, ProjectionError> {
        Ok(OrthographicCamera::project(self, at))
    }
}

/// Adapts a closure into a [`ScreenProjector`] that never fails.
pub struct ProjectorFn<F>(pub F);

impl<F> ScreenProjector for ProjectorFn<F>
where
    F: Fn(LatLng) -> Option<[f64; 2]>,
{
    fn project(&self, at: LatLng) -> Result<Option<[f64; 2]>, ProjectionError> {
        Ok((self.0)(at))
    }
}

/// Which granularity the builder should produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClusterMode<'a> {
    Continent,
    Country,
    City { country_id: &'a str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterConfig {
    pub effective_width_ratio: f64,
    pub overlap_ratio: f64,
    pub geo_merge_km: f64,
    pub label: LabelMetrics,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            effective_width_ratio: EFFECTIVE_WIDTH_RATIO,
            overlap_ratio: OVERLAP_RATIO,
            geo_merge_km: GEO_MERGE_KM,
            label: LabelMetrics::default(),
        }
    }
}

/// What happened during one build, for logs and debug overlays.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Projection was unavailable, so country clusters were returned unmerged.
    pub projection_fallback: bool,
    /// Country clusters that could not be placed on screen (e.g. far side of the globe).
    pub unprojected: usize,
    /// Connected groups of at least two colliding labels.
    pub overlapping_components: usize,
    pub continent_clusters: usize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClusterBuilder {
    pub config: ClusterConfig,
}

impl ClusterBuilder {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        places: &[Place],
        zoom_level: f64,
        mode: ClusterMode<'_>,
        projector: Option<&dyn ScreenProjector>,
    ) -> Vec<Cluster> {
        self.build_with_report(places, zoom_level, mode, projector).0
    }

    pub fn build_with_report(
        &self,
        places: &[Place],
        zoom_level: f64,
        mode: ClusterMode<'_>,
        projector: Option<&dyn ScreenProjector>,
    ) -> (Vec<Cluster>, BuildReport) {
        let mut report = BuildReport::default();
        let clusters = match mode {
            ClusterMode::City { country_id } => self.city_clusters(places, country_id),
            ClusterMode::Country | ClusterMode::Continent => {
                let countries = self.country_clusters(places);
                self.merge_overlapping(countries, projector, &mut report)
            }
        };
        debug!(
            zoom_level,
            ?mode,
            places = places.len(),
            clusters = clusters.len(),
            fallback = report.projection_fallback,
            continents = report.continent_clusters,
            "built globe clusters"
        );
        (clusters, report)
    }

    /// One label per place of `country_id`.
    ///
    /// Places without coordinates sit at the country centroid, so the city
    /// view lists exactly what the country label counted. A country with no
    /// locatable place yields nothing, matching [`country_clusters`](Self::country_clusters).
    pub fn city_clusters(&self, places: &[Place], country_id: &str) -> Vec<Cluster> {
        let members = move || {
            places
                .iter()
                .enumerate()
                .filter(move |(_, p)| p.country_id == country_id)
        };
        let Some(center) = mean_centroid(members().filter_map(|(_, p)| p.position())) else {
            return Vec::new();
        };
        members()
            .map(|(idx, p)| {
                let at = p.position().unwrap_or(center);
                let id = match &p.city_id {
                    Some(city_id) => format!("city-{city_id}"),
                    None => format!("city-{}-{idx}", p.country_id),
                };
                Cluster {
                    id,
                    name: p.name.clone(),
                    flag: flag_emoji(&p.country_id),
                    lat: at.lat,
                    lng: at.lng,
                    color: p.color.clone(),
                    items: vec![p.clone()],
                    count: 1,
                    kind: ClusterKind::City,
                    has_records: p.has_records,
                    thumbnail_url: p.thumbnail_url.clone(),
                    country_id: Some(p.country_id.clone()),
                    continent: continent_of(&p.country_id),
                }
            })
            .collect()
    }

    /// One label per country, positioned at the mean of its locatable places.
    ///
    /// Countries with no locatable place are omitted. Output is ordered by country code.
    pub fn country_clusters(&self, places: &[Place]) -> Vec<Cluster> {
        let mut groups: BTreeMap<&str, Vec<&Place>> = BTreeMap::new();
        for place in places {
            groups.entry(place.country_id.as_str()).or_default().push(place);
        }

        let mut out = Vec::with_capacity(groups.len());
        for (country_id, members) in groups {
            let Some(center) = mean_centroid(members.iter().filter_map(|p| p.position())) else {
                debug!(country_id, "skipping country without locatable places");
                continue;
            };
            let items: Vec<Place> = members.into_iter().cloned().collect();
            out.push(Cluster {
                id: format!("country-{country_id}"),
                name: country_name(country_id),
                flag: flag_emoji(country_id),
                lat: center.lat,
                lng: center.lng,
                color: items[0].color.clone(),
                count: items.len(),
                kind: ClusterKind::Country,
                has_records: items.iter().any(|p| p.has_records),
                thumbnail_url: latest_thumbnail(&items),
                country_id: Some(country_id.to_string()),
                continent: continent_of(country_id),
                items,
            });
        }
        out
    }

    pub fn effective_width(&self, cluster: &Cluster) -> f64 {
        self.config.label.label_width(cluster) * self.config.effective_width_ratio
    }

    /// Screen distance (pixels) below which two labels are considered overlapping.
    pub fn overlap_threshold(&self, a: &Cluster, b: &Cluster) -> f64 {
        (self.effective_width(a) + self.effective_width(b)) * self.config.overlap_ratio
    }

    fn merge_overlapping(
        &self,
        countries: Vec<Cluster>,
        projector: Option<&dyn ScreenProjector>,
        report: &mut BuildReport,
    ) -> Vec<Cluster> {
        if countries.len() < 2 {
            return countries;
        }
        let Some(projector) = projector else {
            report.projection_fallback = true;
            return countries;
        };

        let screen = match project_all(projector, &countries) {
            Ok(screen) if screen.iter().any(Option::is_some) => screen,
            Ok(_) => {
                debug!("no cluster projects, keeping country clusters");
                report.projection_fallback = true;
                return countries;
            }
            Err(err) => {
                debug!(%err, "projection unavailable, keeping country clusters");
                report.projection_fallback = true;
                return countries;
            }
        };
        report.unprojected = screen.iter().filter(|s| s.is_none()).count();

        let widths: Vec<f64> = countries.iter().map(|c| self.effective_width(c)).collect();
        let placed: Vec<usize> = (0..countries.len()).filter(|&i| screen[i].is_some()).collect();
        let overlaps = |i: usize, j: usize| match (screen[i], screen[j]) {
            (Some(a), Some(b)) => {
                screen_distance(a, b) < (widths[i] + widths[j]) * self.config.overlap_ratio
            }
            _ => false,
        };

        let mut consumed = vec![false; countries.len()];
        let mut merged: Vec<(usize, Cluster)> = Vec::new();

        for component in connected_components(&placed, overlaps) {
            if component.len() < 2 {
                continue;
            }
            report.overlapping_components += 1;

            let near = |i: usize, j: usize| {
                haversine_km(countries[i].position(), countries[j].position())
                    < self.config.geo_merge_km
            };
            for geo_group in connected_components(&component, near) {
                for (continent, members) in group_by_continent(&countries, &geo_group) {
                    if members.len() < 2 {
                        continue;
                    }
                    let Some(continent) = continent else {
                        continue;
                    };
                    let refs: Vec<&Cluster> = members.iter().map(|&i| &countries[i]).collect();
                    if let Some(cluster) = continent_cluster(continent, &refs) {
                        for &i in &members {
                            consumed[i] = true;
                        }
                        merged.push((members[0], cluster));
                    }
                }
            }
        }
        report.continent_clusters = merged.len();
        merged.sort_by_key(|(first, _)| *first);

        // Merged continents take the slot of their first member; everything else passes through.
        let mut out = Vec::with_capacity(countries.len());
        let mut merged = merged.into_iter().peekable();
        for (idx, country) in countries.into_iter().enumerate() {
            while let Some((_, cluster)) = merged.next_if(|(first, _)| *first == idx) {
                out.push(cluster);
            }
            if !consumed[idx] {
                out.push(country);
            }
        }
        out
    }
}

fn continent_cluster(continent: Continent, members: &[&Cluster]) -> Option<Cluster> {
    let center = weighted_centroid(members.iter().map(|c| (c.position(), c.count as f64)))?;

    // Largest member provides flag and color; ties keep the first one.
    let mut lead = members[0];
    for &m in &members[1..] {
        if m.count > lead.count {
            lead = m;
        }
    }

    let items: Vec<Place> = members.iter().flat_map(|c| c.items.iter().cloned()).collect();
    let first_country = members[0].country_id.as_deref().unwrap_or("unknown");
    Some(Cluster {
        id: format!("continent-{}-{first_country}", continent.key()),
        name: continent.name().to_string(),
        flag: lead.flag.clone(),
        lat: center.lat,
        lng: center.lng,
        color: lead.color.clone(),
        count: items.len(),
        kind: ClusterKind::Continent,
        has_records: members.iter().any(|c| c.has_records),
        thumbnail_url: latest_thumbnail(&items),
        country_id: None,
        continent: Some(continent),
        items,
    })
}

/// Splits `indices` by continent, keeping first-seen order.
fn group_by_continent(
    countries: &[Cluster],
    indices: &[usize],
) -> Vec<(Option<Continent>, Vec<usize>)> {
    let mut groups: Vec<(Option<Continent>, Vec<usize>)> = Vec::new();
    for &i in indices {
        let continent = countries[i].continent;
        match groups.iter_mut().find(|(c, _)| *c == continent && c.is_some()) {
            Some((_, members)) => members.push(i),
            None => groups.push((continent, vec![i])),
        }
    }
    groups
}

/// Breadth-first connected components over `nodes`.
///
/// Components come out ordered by their smallest node, members ascending.
fn connected_components<F>(nodes: &[usize], edge: F) -> Vec<Vec<usize>>
where
    F: Fn(usize, usize) -> bool,
{
    let mut visited = vec![false; nodes.len()];
    let mut out = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..nodes.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        let mut component = Vec::new();
        while let Some(at) = queue.pop_front() {
            component.push(nodes[at]);
            for next in 0..nodes.len() {
                if !visited[next] && edge(nodes[at], nodes[next]) {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        component.sort_unstable();
        out.push(component);
    }
    out
}

/// Projects every cluster center. Any failure or non-finite pixel poisons the whole pass.
fn project_all(
    projector: &dyn ScreenProjector,
    clusters: &[Cluster],
) -> Result<Vec<Option<[f64; 2]>>, ProjectionError> {
    clusters
        .iter()
        .map(|c| match projector.project(c.position())? {
            Some(p) if !(p[0].is_finite() && p[1].is_finite()) => Err(ProjectionError(format!(
                "non-finite screen point for {}",
                c.id
            ))),
            point => Ok(point),
        })
        .collect()
}

fn screen_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Thumbnail of the most recently updated place that has one; ties keep the earlier place.
fn latest_thumbnail(places: &[Place]) -> Option<String> {
    let mut best: Option<&Place> = None;
    for p in places.iter().filter(|p| p.thumbnail_url.is_some()) {
        match best {
            Some(b) if p.updated_at_ms <= b.updated_at_ms => {}
            _ => best = Some(p),
        }
    }
    best.and_then(|p| p.thumbnail_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn japan_korea() -> Vec<Place> {
        vec![
            Place::new("JP", "Tokyo", 35.6, 139.7),
            Place::new("JP", "Osaka", 34.7, 135.5),
            Place::new("KR", "Seoul", 37.5, 127.0),
        ]
    }

    /// Every label lands on the same pixel, so everything overlaps.
    fn stacked() -> ProjectorFn<impl Fn(LatLng) -> Option<[f64; 2]>> {
        ProjectorFn(|_: LatLng| Some([100.0, 100.0]))
    }

    fn item_keys(clusters: &[Cluster]) -> Vec<(String, String)> {
        let mut keys: Vec<_> = clusters
            .iter()
            .flat_map(|c| c.items.iter())
            .map(|p| (p.country_id.clone(), p.name.clone()))
            .collect();
        keys.sort();
        keys
    }

    fn place_keys(places: &[Place]) -> Vec<(String, String)> {
        let mut keys: Vec<_> = places
            .iter()
            .map(|p| (p.country_id.clone(), p.name.clone()))
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn country_clusters_without_projection() {
        let builder = ClusterBuilder::default();
        let (clusters, report) =
            builder.build_with_report(&japan_korea(), 2.5, ClusterMode::Country, None);

        assert!(report.projection_fallback);
        assert_eq!(clusters.len(), 2);

        let jp = &clusters[0];
        assert_eq!(jp.id, "country-JP");
        assert_eq!(jp.kind, ClusterKind::Country);
        assert_eq!(jp.count, 2);
        assert_eq!(jp.name, "Japan");
        assert_close(jp.lat, 35.15, 1e-9);
        assert_close(jp.lng, 137.6, 1e-9);

        let kr = &clusters[1];
        assert_eq!(kr.country_id.as_deref(), Some("KR"));
        assert_eq!(kr.count, 1);
        assert_eq!((kr.lat, kr.lng), (37.5, 127.0));
    }

    #[test]
    fn unavailable_projection_keeps_country_clusters() {
        let builder = ClusterBuilder::default();
        let dead = ProjectorFn(|_: LatLng| None);
        let nan = ProjectorFn(|_: LatLng| Some([f64::NAN, 0.0]));

        for projector in [&dead as &dyn ScreenProjector, &nan] {
            let (clusters, report) = builder.build_with_report(
                &japan_korea(),
                2.5,
                ClusterMode::Continent,
                Some(projector),
            );
            assert!(report.projection_fallback);
            assert!(clusters.iter().all(|c| c.kind == ClusterKind::Country));
            assert_eq!(clusters.len(), 2);
        }
    }

    struct Broken;

    impl ScreenProjector for Broken {
        fn project(&self, _: LatLng) -> Result<Option<[f64; 2]>, ProjectionError> {
            Err(ProjectionError("renderer threw".into()))
        }
    }

    /// Stacks everything on one pixel except Germany, which fails.
    struct FailsOnGermany<P>(P);

    impl<P: ScreenProjector> ScreenProjector for FailsOnGermany<P> {
        fn project(&self, at: LatLng) -> Result<Option<[f64; 2]>, ProjectionError> {
            if (at.lat - 52.5).abs() < 1e-9 {
                return Err(ProjectionError("renderer threw".into()));
            }
            self.0.project(at)
        }
    }

    #[test]
    fn one_failing_point_disables_merging() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("DE", "Berlin", 52.5, 13.4),
            Place::new("FR", "Paris", 48.9, 2.3),
            Place::new("NL", "Amsterdam", 52.4, 4.9),
        ];
        let nan_on_germany = ProjectorFn(|at: LatLng| {
            if (at.lat - 52.5).abs() < 1e-9 {
                Some([f64::NAN, 100.0])
            } else {
                Some([100.0, 100.0])
            }
        });
        let throws_on_germany = FailsOnGermany(stacked());

        for projector in [
            &nan_on_germany as &dyn ScreenProjector,
            &throws_on_germany,
            &Broken,
        ] {
            let (clusters, report) = builder.build_with_report(
                &places,
                2.5,
                ClusterMode::Continent,
                Some(projector),
            );
            assert!(report.projection_fallback);
            assert_eq!(report.continent_clusters, 0);
            let ids: Vec<_> = clusters.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["country-DE", "country-FR", "country-NL"]);
        }

        // The same layout with a working renderer merges all three.
        let merged = builder.build(&places, 2.5, ClusterMode::Continent, Some(&stacked()));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].kind, ClusterKind::Continent);
    }

    #[test]
    fn overlapping_neighbours_merge_into_continent() {
        let builder = ClusterBuilder::default();
        let places = japan_korea();
        let (clusters, report) = builder.build_with_report(
            &places,
            2.5,
            ClusterMode::Continent,
            Some(&stacked()),
        );

        assert_eq!(report.continent_clusters, 1);
        assert_eq!(clusters.len(), 1);
        let asia = &clusters[0];
        assert_eq!(asia.kind, ClusterKind::Continent);
        assert_eq!(asia.name, "Asia");
        assert_eq!(asia.count, 3);
        // Japan has more places, so its flag represents the group.
        assert_eq!(asia.flag, flag_emoji("JP"));
        assert_eq!(item_keys(&clusters), place_keys(&places));
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        let builder = ClusterBuilder::default();
        assert!(builder.build(&[], 2.5, ClusterMode::Country, Some(&stacked())).is_empty());
        assert!(builder.build(&[], 2.5, ClusterMode::City { country_id: "JP" }, None).is_empty());
    }

    #[test]
    fn merge_threshold_is_strict() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("FR", "Paris-ish", 0.0, 0.0),
            Place::new("BE", "Brussels-ish", 0.0, 1.0),
        ];
        let countries = builder.country_clusters(&places);
        let threshold = builder.overlap_threshold(&countries[0], &countries[1]);

        // One degree of longitude maps to `scale` pixels, so the screen
        // distance is exactly `scale`.
        let run = |scale: f64| {
            let projector = ProjectorFn(move |at: LatLng| Some([at.lng * scale, at.lat * scale]));
            builder.build(&places, 2.5, ClusterMode::Continent, Some(&projector))
        };

        let at_threshold = run(threshold);
        assert_eq!(at_threshold.len(), 2);
        assert!(at_threshold.iter().all(|c| c.kind == ClusterKind::Country));

        let just_inside = run(threshold * (1.0 - 1e-9));
        assert_eq!(just_inside.len(), 1);
        assert_eq!(just_inside[0].kind, ClusterKind::Continent);
        assert_eq!(just_inside[0].name, "Europe");
    }

    #[test]
    fn distant_countries_do_not_merge_even_when_labels_overlap() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("PT", "Lisbon", 38.7, -9.1),
            Place::new("ES", "Madrid", 40.4, -3.7),
            Place::new("RU", "Moscow", 55.7, 37.6),
        ];
        let clusters = builder.build(&places, 2.5, ClusterMode::Continent, Some(&stacked()));

        let summary: Vec<_> = clusters.iter().map(|c| (c.kind, c.count)).collect();
        assert_eq!(
            summary,
            vec![(ClusterKind::Continent, 2), (ClusterKind::Country, 1)]
        );
        assert_eq!(clusters[1].country_id.as_deref(), Some("RU"));
        assert_eq!(item_keys(&clusters), place_keys(&places));
    }

    #[test]
    fn neighbours_on_different_continents_stay_countries() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("TR", "Ankara", 39.9, 32.8),
            Place::new("GE", "Tbilisi", 41.7, 44.8),
            Place::new("ZZ", "Atlantis", 40.0, 40.0),
        ];
        let (clusters, report) =
            builder.build_with_report(&places, 2.5, ClusterMode::Continent, Some(&stacked()));
        assert_eq!(report.overlapping_components, 1);
        assert_eq!(report.continent_clusters, 0);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.kind == ClusterKind::Country));
    }

    #[test]
    fn continent_centroid_is_weighted_by_place_count() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("DE", "Berlin", 50.0, 10.0).with_color("#111"),
            Place::new("DE", "Munich", 50.0, 10.0).with_color("#111"),
            Place::new("DE", "Hamburg", 50.0, 10.0).with_color("#111"),
            Place::new("FR", "Paris", 46.0, 2.0).with_color("#222"),
        ];
        let clusters = builder.build(&places, 2.5, ClusterMode::Continent, Some(&stacked()));
        assert_eq!(clusters.len(), 1);
        let europe = &clusters[0];
        assert_close(europe.lat, 49.0, 1e-9);
        assert_close(europe.lng, 8.0, 1e-9);
        assert_eq!(europe.color, "#111");
        assert_eq!(europe.flag, flag_emoji("DE"));
        assert_eq!(europe.id, "continent-europe-DE");
    }

    #[test]
    fn continent_flag_tie_goes_to_first_country() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("CH", "Zurich", 47.4, 8.5),
            Place::new("AT", "Vienna", 48.2, 16.4),
        ];
        let clusters = builder.build(&places, 2.5, ClusterMode::Continent, Some(&stacked()));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].flag, flag_emoji("AT"));
    }

    #[test]
    fn unprojectable_clusters_pass_through() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("FR", "Paris", 48.9, 2.3),
            Place::new("DE", "Berlin", 52.5, 13.4),
            Place::new("JP", "Tokyo", 35.6, 139.7),
        ];
        // Japan sits on the far side of the globe.
        let projector = ProjectorFn(|at: LatLng| (at.lng < 100.0).then_some([10.0, 10.0]));
        let (clusters, report) =
            builder.build_with_report(&places, 2.5, ClusterMode::Country, Some(&projector));

        assert!(!report.projection_fallback);
        assert_eq!(report.unprojected, 1);
        let kinds: Vec<_> = clusters.iter().map(|c| (c.kind, c.count)).collect();
        assert_eq!(
            kinds,
            vec![(ClusterKind::Continent, 2), (ClusterKind::Country, 1)]
        );
        assert_eq!(item_keys(&clusters), place_keys(&places));
    }

    #[test]
    fn far_apart_labels_stay_separate() {
        let builder = ClusterBuilder::default();
        let camera = OrthographicCamera::new(LatLng::new(36.0, 132.0), 0.3, [1280.0, 720.0]);
        let clusters = builder.build(&japan_korea(), 0.3, ClusterMode::Country, Some(&camera));
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn city_mode_lists_places_of_expanded_country() {
        let builder = ClusterBuilder::default();
        let mut places = japan_korea();
        places[0].city_id = Some("jp-tokyo".into());
        places.push(Place {
            lat: None,
            ..Place::new("JP", "Lost", 0.0, 0.0)
        });

        let clusters = builder.build(
            &places,
            0.4,
            ClusterMode::City { country_id: "JP" },
            Some(&stacked()),
        );
        let ids: Vec<_> = clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["city-jp-tokyo", "city-JP-1", "city-JP-3"]);
        assert!(clusters.iter().all(|c| c.kind == ClusterKind::City && c.count == 1));
        assert_eq!(clusters[1].name, "Osaka");

        // The place without coordinates sits on the Japan label position.
        let country = &builder.country_clusters(&places)[0];
        assert_eq!(country.count, clusters.len());
        assert_eq!((clusters[2].lat, clusters[2].lng), (country.lat, country.lng));
    }

    #[test]
    fn city_mode_skips_country_without_any_coordinates() {
        let builder = ClusterBuilder::default();
        let places = vec![Place {
            lat: None,
            ..Place::new("JP", "Lost", 0.0, 0.0)
        }];
        assert!(builder.city_clusters(&places, "JP").is_empty());
        assert!(builder.country_clusters(&places).is_empty());
    }

    #[test]
    fn unlocatable_places_stay_in_their_country_but_not_in_centroid() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("JP", "Tokyo", 35.6, 139.7),
            Place {
                lng: None,
                ..Place::new("JP", "Nowhere", 0.0, 0.0)
            },
            Place {
                lat: Some(f64::INFINITY),
                ..Place::new("KR", "Broken", 0.0, 0.0)
            },
        ];
        let clusters = builder.country_clusters(&places);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 2);
        assert_eq!((clusters[0].lat, clusters[0].lng), (35.6, 139.7));
    }

    #[test]
    fn country_thumbnail_comes_from_latest_update() {
        let builder = ClusterBuilder::default();
        let places = vec![
            Place::new("JP", "Tokyo", 35.6, 139.7).with_records(Some("old.jpg"), Some(10)),
            Place::new("JP", "Kyoto", 35.0, 135.8).with_records(None, Some(99)),
            Place::new("JP", "Osaka", 34.7, 135.5).with_records(Some("new.jpg"), Some(20)),
            Place::new("JP", "Nara", 34.7, 135.8).with_records(Some("same.jpg"), Some(20)),
        ];
        let clusters = builder.country_clusters(&places);
        assert!(clusters[0].has_records);
        assert_eq!(clusters[0].thumbnail_url.as_deref(), Some("new.jpg"));
    }

    #[test]
    fn serializes_for_the_renderer() {
        let builder = ClusterBuilder::default();
        let clusters = builder.country_clusters(&japan_korea());
        let json = serde_json::to_value(&clusters[1]).unwrap();
        assert_eq!(json["kind"], "countryCluster");
        assert_eq!(json["countryId"], "KR");
        assert_eq!(json["hasRecords"], false);
        assert_eq!(json["continent"], "asia");
        assert!(json.get("thumbnailUrl").is_none());
    }
}
