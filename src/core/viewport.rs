//! Center, zoom and size of a map surface, with the Web Mercator math to go
//! between geographic positions and world pixels.

use crate::core::{
    constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, TILE_SIZE},
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Side length in pixels of the whole world at `zoom`
fn world_size(zoom: f64) -> f64 {
    f64::from(TILE_SIZE) * zoom.exp2()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Size of the surface in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center,
            zoom: DEFAULT_MIN_ZOOM,
            size,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        };
        viewport.set_zoom(zoom);
        viewport
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng.clamp(-180.0, 180.0));
    }

    /// Sets the zoom, clamped to the zoom limits. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        } else {
            log::warn!("ignoring non-finite zoom {zoom}");
        }
    }

    /// Sets the zoom limits; a maximum below the minimum is raised to it.
    /// A non-finite limit keeps its current value.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if min_zoom.is_finite() {
            self.min_zoom = min_zoom;
        }
        if max_zoom.is_finite() {
            self.max_zoom = max_zoom;
        }
        self.max_zoom = self.max_zoom.max(self.min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// World pixel position of `lat_lng` at `zoom` (the current zoom if `None`)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let size = world_size(zoom.unwrap_or(self.zoom));
        let sin = LatLng::clamp_lat(lat_lng.lat).to_radians().sin();

        Point::new(
            (lat_lng.lng + 180.0) / 360.0 * size,
            (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size,
        )
    }

    /// Inverse of [`Viewport::project`]
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let size = world_size(zoom.unwrap_or(self.zoom));
        let n = PI * (1.0 - 2.0 * pixel.y / size);

        LatLng::new(n.sinh().atan().to_degrees(), pixel.x / size * 360.0 - 180.0)
    }

    /// Geographic region currently on screen
    pub fn bounds(&self) -> LatLngBounds {
        let center = self.project(&self.center, None);
        let (half_w, half_h) = (self.size.x / 2.0, self.size.y / 2.0);

        let north_west = self.unproject(&Point::new(center.x - half_w, center.y - half_h), None);
        let south_east = self.unproject(&Point::new(center.x + half_w, center.y + half_h), None);

        LatLngBounds::from_coords(south_east.lat, north_west.lng, north_west.lat, south_east.lng)
    }

    /// Centers on `bounds` at the largest whole zoom (within the limits) at
    /// which the region fits inside the surface less `padding` on each side.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) {
        let padding = padding.unwrap_or(0.0);
        self.set_center(bounds.center());

        let north_west = self.project(
            &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
            Some(0.0),
        );
        let south_east = self.project(
            &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
            Some(0.0),
        );

        let available_x = (self.size.x - 2.0 * padding).max(1.0);
        let available_y = (self.size.y - 2.0 * padding).max(1.0);

        // Pixel extents double with every zoom level
        let ratio = (available_x / (south_east.x - north_west.x).abs())
            .min(available_y / (south_east.y - north_west.y).abs());
        let zoom = if ratio.is_finite() {
            ratio.log2().floor()
        } else {
            self.max_zoom
        };

        self.set_zoom(zoom);
        log::debug!("fit_bounds: center {:?}, zoom {}", self.center, self.zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::default(), 0.0, Point::new(800.0, 600.0))
    }
}
