use crate::{
    core::{
        config::MapOptions,
        constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, FIT_BOUNDS_PADDING},
        geo::{LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{base::LayerTrait, manager::LayerManager},
    Result,
};

/// The map surface: a viewport bound to a host element plus the layers drawn on it
pub struct Map {
    container_id: String,
    options: MapOptions,
    viewport: Viewport,
    layers: LayerManager,
}

impl Map {
    /// Creates the surface for a host of the given size.
    ///
    /// Without an explicit zoom the surface starts at the minimum zoom and is
    /// expected to be fitted to some bounds by the caller.
    pub fn new(container_id: impl Into<String>, size: Point, options: MapOptions) -> Self {
        let min_zoom = options.min_zoom.unwrap_or(DEFAULT_MIN_ZOOM);
        let max_zoom = options.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);

        let mut viewport = Viewport::new(options.center, 0.0, size);
        viewport.set_zoom_limits(min_zoom, max_zoom);
        viewport.set_zoom(options.zoom.unwrap_or(min_zoom));

        Self {
            container_id: container_id.into(),
            options,
            viewport,
            layers: LayerManager::new(),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    /// Adds a layer and lets it react to the current view
    pub fn add_layer(&mut self, mut layer: Box<dyn LayerTrait>) -> Result<()> {
        layer.on_add(&self.viewport)?;
        log::debug!("map {}: added {} layer {}", self.container_id, layer.layer_type(), layer.id());
        self.layers.add_layer(layer)
    }

    /// Removes a layer, returning it if it was present
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Option<Box<dyn LayerTrait>>> {
        let mut removed = self.layers.remove_layer(layer_id)?;
        if let Some(layer) = removed.as_mut() {
            layer.on_remove()?;
        }
        Ok(removed)
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.get_layer(layer_id).is_some()
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    /// Typed access to a layer
    pub fn layer<T: LayerTrait + 'static>(&self, layer_id: &str) -> Option<&T> {
        self.layers
            .get_layer(layer_id)
            .and_then(|layer| layer.as_any().downcast_ref::<T>())
    }

    /// Typed mutable access to a layer
    pub fn layer_mut<T: LayerTrait + 'static>(&mut self, layer_id: &str) -> Option<&mut T> {
        self.layers
            .get_layer_mut(layer_id)
            .and_then(|layer| layer.as_any_mut().downcast_mut::<T>())
    }

    /// Centers and zooms the map so the whole region is visible
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()> {
        self.viewport.fit_bounds(bounds, Some(FIT_BOUNDS_PADDING));
        self.notify_view_changed()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        self.viewport.set_zoom(zoom);
        self.notify_view_changed()
    }

    fn notify_view_changed(&mut self) -> Result<()> {
        for layer in self.layers.iter_mut() {
            layer.on_view_changed(&self.viewport)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("container_id", &self.container_id)
            .field("viewport", &self.viewport)
            .field("layers", &self.layers.list_layers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn options(zoom: Option<f64>) -> MapOptions {
        MapOptions {
            center: LatLng::new(20.0, 20.0),
            zoom,
            min_zoom: Some(3.0),
            max_zoom: Some(10.0),
        }
    }

    #[test]
    fn test_map_applies_zoom_limits() {
        let map = Map::new("panel", Point::new(800.0, 600.0), options(Some(12.0)));

        assert_eq!(map.viewport().min_zoom, 3.0);
        assert_eq!(map.viewport().max_zoom, 10.0);
        assert_eq!(map.zoom(), 10.0);
        assert_eq!(map.viewport().center, LatLng::new(20.0, 20.0));
    }

    #[test]
    fn test_map_without_zoom_starts_at_min() {
        let map = Map::new("panel", Point::new(800.0, 600.0), options(None));
        assert_eq!(map.zoom(), 3.0);
    }

    #[test]
    fn test_fit_bounds_respects_limits() {
        let mut map = Map::new("panel", Point::new(800.0, 600.0), options(None));
        map.fit_bounds(&LatLngBounds::from_coords(20.0, 20.0, 20.001, 20.001))
            .unwrap();

        assert_eq!(map.zoom(), 10.0);
    }
}
