use crate::math::LatLng;

/// Latitude/longitude bounding box in degrees.
///
/// Boxes do not wrap across the antimeridian; a set of points spanning it
/// yields a wide box, which is good enough for camera fitting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min: LatLng,
    pub max: LatLng,
}

impl GeoBounds {
    pub fn from_point(p: LatLng) -> Self {
        GeoBounds { min: p, max: p }
    }

    /// Bounds of all valid points, `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut out: Option<Self> = None;
        for p in points.into_iter().filter(|p| p.is_valid()) {
            match out.as_mut() {
                Some(b) => b.extend(p),
                None => out = Some(Self::from_point(p)),
            }
        }
        out
    }

    pub fn extend(&mut self, p: LatLng) {
        self.min.lat = self.min.lat.min(p.lat);
        self.min.lng = self.min.lng.min(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min.lat + self.max.lat) * 0.5,
            (self.min.lng + self.max.lng) * 0.5,
        )
    }

    /// Larger of the latitude and longitude extents (degrees).
    pub fn span_deg(&self) -> f64 {
        (self.max.lat - self.min.lat).max(self.max.lng - self.min.lng)
    }
}
