//! # mapview
//!
//! Clustered marker map view for geotagged result rows.
//!
//! The crate turns a dataset of rows (each with zero or more positions and a
//! set of printouts) into markers grouped by row, places them on a marker
//! cluster layer, fits a map surface to the data, and lets the surrounding
//! result display show and hide rows without rebuilding anything.
//!
//! All work that touches the map engine is chained behind a single
//! engine-ready signal, so the view can be created, filtered and shown before
//! the engine has finished loading.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod traits;
pub mod view;
#[cfg(feature = "wasm")]
pub mod web;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{ClusterOptions, Height, MapOptions, ViewOptions},
    geo::{LatLng, LatLngBounds, Point},
    map::Map,
    viewport::Viewport,
};

pub use data::rows::{Dataset, Printout, Row};

pub use layers::{
    base::LayerTrait,
    cluster::MarkerClusterGroup,
    icon::Icon,
    marker::{Marker, MarkerId},
    popup::Popup,
    tile::{TileLayer, TileProvider},
};

pub use runtime::{AssetLoader, GatedLoader, LocalSpawner, ReadyLoader};

pub use view::{
    host::{DataController, HostElement, Panel, StaticController},
    index::{IndexBuilder, MarkerIndex},
    map_view::{LifecycleState, MapView},
    ready::ReadySignal,
    View,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Unknown map provider: {0}")]
    UnknownProvider(String),

    #[error("Asset load error: {0}")]
    AssetLoad(String),

    #[error("Spawn error: {0}")]
    Spawn(String),
}

/// Error type alias for convenience
pub type Error = MapError;
