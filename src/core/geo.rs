use serde::{Deserialize, Serialize};

/// Latitude limit of the Web Mercator projection
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether the position lies within ±90° latitude and ±180° longitude
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// A position or size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned geographic region; never crosses the antimeridian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Zero-area region at a single position
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// The whole coordinate domain, fitted when there is nothing else to show
    pub fn world() -> Self {
        Self::from_coords(-90.0, -180.0, 90.0, 180.0)
    }

    /// Borders count as inside
    pub fn contains(&self, point: &LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// Grows the region to include `point`
    pub fn extend(&mut self, point: &LatLng) {
        let (sw, ne) = (&mut self.south_west, &mut self.north_east);
        sw.lat = sw.lat.min(point.lat);
        sw.lng = sw.lng.min(point.lng);
        ne.lat = ne.lat.max(point.lat);
        ne.lng = ne.lng.max(point.lng);
    }

    /// Midpoint of the corners
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(LatLng::new(40.7128, -74.0060).is_valid());
        assert!(LatLng::new(-90.0, 180.0).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert_eq!(LatLng::clamp_lat(90.0), MAX_LATITUDE);
    }

    #[test]
    fn test_contains_includes_borders() {
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);

        assert!(bounds.contains(&LatLng::new(40.5, -74.0)));
        assert!(bounds.contains(&LatLng::new(41.0, -75.0)));
        assert!(!bounds.contains(&LatLng::new(42.0, -74.0)));
    }

    #[test]
    fn test_extend_never_shrinks() {
        let mut bounds = LatLngBounds::from_point(LatLng::new(10.0, 10.0));
        bounds.extend(&LatLng::new(30.0, 30.0));
        let before = bounds.clone();

        bounds.extend(&LatLng::new(20.0, 20.0));
        assert_eq!(bounds, before);

        bounds.extend(&LatLng::new(-5.0, 40.0));
        assert_eq!(bounds, LatLngBounds::from_coords(-5.0, 10.0, 30.0, 40.0));
    }

    #[test]
    fn test_world() {
        let world = LatLngBounds::world();
        assert_eq!(world.center(), LatLng::default());
        assert_eq!(world.south_west, LatLng::new(-90.0, -180.0));
        assert!(world.contains(&LatLng::new(-90.0, 180.0)));
    }
}
