//! Prelude module for common mapview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapview::prelude::*;`

pub use crate::core::{
    config::{ClusterOptions, Height, MapOptions, ViewOptions},
    geo::{LatLng, LatLngBounds, Point},
    map::Map,
    viewport::Viewport,
};

pub use crate::data::rows::{Dataset, Printout, Row, ViewData};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    cluster::MarkerClusterGroup,
    icon::Icon,
    manager::LayerManager,
    marker::{Marker, MarkerId},
    popup::Popup,
    tile::{TileLayer, TileLayerOptions, TileProvider, TileSource},
};

pub use crate::runtime::{AssetLoader, GatedLoader, LoadGate, LocalSpawner, ReadyLoader};

pub use crate::view::{
    host::{DataController, HostElement, Panel, StaticController},
    index::{BuiltIndex, IndexBuilder, MarkerFactory, MarkerIndex},
    map_view::{LifecycleState, MapView},
    ready::ReadySignal,
    View,
};

pub use crate::{Error as MapError, Result};

pub use std::{cell::RefCell, pin::Pin, rc::Rc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::future::LocalBoxFuture;
pub use futures::Future;
