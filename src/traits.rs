//! Shared trait abstractions for common patterns

use crate::{
    core::{geo::LatLngBounds, viewport::Viewport},
    layers::base::{LayerProperties, LayerType},
    Result,
};
use std::any::Any;

/// Operations every layer placed on a [`Map`](crate::core::map::Map) supports.
///
/// Implementors provide their [`LayerProperties`] and `Any` access (see
/// [`impl_layer_trait!`](crate::impl_layer_trait)) plus their options; the
/// lifecycle hooks default to doing nothing.
pub trait LayerOperations: Any {
    fn properties(&self) -> &LayerProperties;

    fn properties_mut(&mut self) -> &mut LayerProperties;

    fn id(&self) -> &str {
        &self.properties().id
    }

    fn layer_type(&self) -> LayerType {
        self.properties().layer_type
    }

    /// Layers are drawn in ascending z-index order
    fn z_index(&self) -> i32 {
        self.properties().z_index
    }

    fn is_visible(&self) -> bool {
        self.properties().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.properties_mut().visible = visible;
    }

    /// Called once the layer has been added to a map
    fn on_add(&mut self, _viewport: &Viewport) -> Result<()> {
        Ok(())
    }

    /// Called once the layer has been removed from a map
    fn on_remove(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after the map's center or zoom changed
    fn on_view_changed(&mut self, _viewport: &Viewport) -> Result<()> {
        Ok(())
    }

    /// Region covered by the layer's content; `None` for unbounded layers
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Engine-facing options of the layer
    fn options(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
