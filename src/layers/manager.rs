use crate::{layers::base::LayerTrait, Result};

/// Layers of a map, kept in drawing order: ascending z-index, and insertion
/// order among equal z-indices.
#[derive(Default)]
pub struct LayerManager {
    layers: Vec<Box<dyn LayerTrait>>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, layer_id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id() == layer_id)
    }

    /// Adds a layer; a layer with the same id is replaced
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        if let Some(existing) = self.position(layer.id()) {
            log::debug!("replacing layer {}", layer.id());
            self.layers.remove(existing);
        }

        let at = self
            .layers
            .partition_point(|other| other.z_index() <= layer.z_index());
        self.layers.insert(at, layer);
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Option<Box<dyn LayerTrait>>> {
        Ok(self.position(layer_id).map(|at| self.layers.remove(at)))
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers
            .iter()
            .find(|layer| layer.id() == layer_id)
            .map(|layer| layer.as_ref())
    }

    pub fn get_layer_mut(&mut self, layer_id: &str) -> Option<&mut (dyn LayerTrait + 'static)> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id() == layer_id)
            .map(|layer| layer.as_mut())
    }

    /// Layer ids in drawing order
    pub fn list_layers(&self) -> Vec<String> {
        self.layers.iter().map(|layer| layer.id().to_string()).collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn LayerTrait>> {
        self.layers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
