//! Marker cluster layer
//!
//! Holds the markers currently shown. Grouping them into clusters is left to
//! the map engine; this layer only tracks membership and its options.
//! Batched adds and removes are idempotent: adding a marker that is already
//! present, or removing one that is not, changes nothing.

use crate::{
    core::{config::ClusterOptions, geo::LatLngBounds, viewport::Viewport},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        marker::{Marker, MarkerId},
    },
    prelude::HashMap,
    MapError, Result,
};

pub struct MarkerClusterGroup {
    properties: LayerProperties,
    options: ClusterOptions,
    members: HashMap<MarkerId, Marker>,
    /// Viewport of the map the layer is on, if any
    viewport: Option<Viewport>,
}

impl MarkerClusterGroup {
    pub fn new(id: impl Into<String>, options: ClusterOptions) -> Self {
        let properties = LayerProperties::new(id, LayerType::Cluster)
            .with_z_index(600);
        Self {
            properties,
            options,
            members: HashMap::default(),
            viewport: None,
        }
    }

    /// Adds one marker; returns false if it was already present
    pub fn add_layer(&mut self, marker: Marker) -> Result<bool> {
        if self.members.contains_key(&marker.marker_id()) {
            return Ok(false);
        }
        let position = marker.position();
        if !(position.lat.is_finite() && position.lng.is_finite()) {
            return Err(MapError::InvalidCoordinates(format!(
                "marker {}: {:?}",
                marker.marker_id(),
                position
            ))
            .into());
        }
        self.members.insert(marker.marker_id(), marker);
        Ok(true)
    }

    /// Adds a batch of markers, returning how many were new
    pub fn add_layers<I>(&mut self, markers: I) -> Result<usize>
    where
        I: IntoIterator<Item = Marker>,
    {
        let mut added = 0;
        for marker in markers {
            if self.add_layer(marker)? {
                added += 1;
            }
        }

        if added > 0 && self.animates_additions() {
            log::debug!("{}: animating {} added markers", self.properties.id, added);
        }
        Ok(added)
    }

    /// Removes a batch of markers, returning how many were present
    pub fn remove_layers<I>(&mut self, marker_ids: I) -> usize
    where
        I: IntoIterator<Item = MarkerId>,
    {
        let mut removed = 0;
        for marker_id in marker_ids {
            if self.members.remove(&marker_id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub fn has_layer(&self, marker_id: MarkerId) -> bool {
        self.members.contains_key(&marker_id)
    }

    pub fn marker(&self, marker_id: MarkerId) -> Option<&Marker> {
        self.members.get(&marker_id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn cluster_options(&self) -> &ClusterOptions {
        &self.options
    }

    pub fn is_on_map(&self) -> bool {
        self.viewport.is_some()
    }

    /// Additions are only animated once the layer is shown on a map
    pub fn animates_additions(&self) -> bool {
        self.options.animate_adding_markers && self.is_on_map()
    }

    /// Markers inside the region currently on screen; empty when not on a map
    pub fn markers_in_view(&self) -> Vec<MarkerId> {
        let Some(visible) = self.viewport.as_ref().map(Viewport::bounds) else {
            return Vec::new();
        };
        let mut ids: Vec<MarkerId> = self
            .members
            .values()
            .filter(|marker| visible.contains(&marker.position()))
            .map(Marker::marker_id)
            .collect();
        ids.sort();
        ids
    }
}

impl LayerTrait for MarkerClusterGroup {
    crate::impl_layer_trait!(properties);

    fn on_add(&mut self, viewport: &Viewport) -> Result<()> {
        self.viewport = Some(viewport.clone());
        Ok(())
    }

    fn on_remove(&mut self) -> Result<()> {
        self.viewport = None;
        Ok(())
    }

    fn on_view_changed(&mut self, viewport: &Viewport) -> Result<()> {
        self.viewport = Some(viewport.clone());
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        let mut positions = self.members.values().map(Marker::position);
        let mut bounds = LatLngBounds::from_point(positions.next()?);
        for position in positions {
            bounds.extend(&position);
        }
        Some(bounds)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "animateAddingMarkers": self.options.animate_adding_markers,
            "maxClusterRadius": self.options.max_cluster_radius,
            "disableClusteringAtZoom": self.options.disable_clustering_at_zoom,
            "markers": self.members.len(),
        })
    }
}
