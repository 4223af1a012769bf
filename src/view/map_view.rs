//! Map view: clustered markers for the rows of a result
//!
//! Initialisation happens in two phases. `init()` loads the engine and builds
//! the marker index without needing the panel to be on screen; the first
//! `show()` then creates the map surface, attaches the cluster layer and
//! fits the view to the data. Both phases, and every row filter, are chained
//! on the engine-ready signal and run in the order they were requested.

use crate::{
    core::{
        config::{ClusterOptions, MapOptions, ViewOptions},
        constants::{ENGINE_MODULE, FALLBACK_HOST_SIZE},
        geo::{LatLngBounds, Point},
        map::Map,
    },
    layers::{
        cluster::MarkerClusterGroup,
        icon::Icon,
        marker::{Marker, MarkerId},
        tile::TileLayer,
    },
    runtime::{spawn_local, AssetLoader, LocalSpawner, ReadyLoader},
    view::{
        host::{DataController, HostElement},
        index::{BuiltIndex, IndexBuilder, MarkerFactory, MarkerIndex, CLUSTER_LAYER_ID},
        ready::ReadySignal,
        View,
    },
    MapError, Result,
};
use std::{cell::RefCell, rc::Rc};

/// Where a view is in its two-phase initialisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created; the engine has not finished loading
    Constructed,
    /// Engine loaded and marker index built
    DataReady,
    /// Map surface created on the host element
    Attached,
}

#[derive(Debug, Clone, Copy)]
enum Visibility {
    Show,
    Hide,
}

/// State touched by continuations of the engine-ready signal
struct ViewState {
    lifecycle: LifecycleState,
    index: Option<MarkerIndex>,
    /// The cluster layer until it is moved onto the map surface
    cluster: Option<MarkerClusterGroup>,
    map: Option<Map>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            lifecycle: LifecycleState::Constructed,
            index: None,
            cluster: None,
            map: None,
        }
    }

    fn data_ready(&mut self, built: BuiltIndex) {
        self.index = Some(built.index);
        self.cluster = Some(built.cluster);
        self.lifecycle = LifecycleState::DataReady;
    }

    fn cluster(&self) -> Option<&MarkerClusterGroup> {
        match self.map.as_ref() {
            Some(map) => map.layer::<MarkerClusterGroup>(CLUSTER_LAYER_ID),
            None => self.cluster.as_ref(),
        }
    }

    /// Creates the map surface on the host and puts the layers on it
    fn attach(&mut self, view_id: &str, host: &mut dyn HostElement, options: &ViewOptions) -> Result<()> {
        let bounds = self
            .index
            .as_ref()
            .map(MarkerIndex::bounds)
            .ok_or_else(|| MapError::Layer(format!("view {view_id}: marker index missing")))?;
        let map_options = MapOptions::derive(options, Some(&bounds));

        let mut size = host.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            size = Point::new(FALLBACK_HOST_SIZE.0, FALLBACK_HOST_SIZE.1);
        }

        let map_id = format!("{view_id}-map");
        host.bind(&map_id);
        let mut map = Map::new(map_id, size, map_options.clone());

        if let Some(provider) = options.map_provider.as_deref() {
            match TileLayer::provider(provider) {
                Ok(layer) => map.add_layer(Box::new(layer))?,
                Err(e) => log::warn!("view {view_id}: no tile layer: {e}"),
            }
        }

        if map_options.should_fit_bounds() {
            map.fit_bounds(&bounds)?;
        }

        // The cluster layer only leaves the view state once nothing else can fail
        if let Some(cluster) = self.cluster.take() {
            map.add_layer(Box::new(cluster))?;
        }

        log::info!(
            "view {view_id}: map attached at zoom {} centered on {:?}",
            map.zoom(),
            map.viewport().center
        );
        self.map = Some(map);
        self.lifecycle = LifecycleState::Attached;
        Ok(())
    }

    /// Adds or removes the markers of the given rows as one batch
    fn apply(&mut self, visibility: Visibility, row_ids: &[String]) -> Result<()> {
        let Some(index) = self.index.as_ref() else {
            return Ok(());
        };
        let markers = index.markers_for(row_ids);

        let cluster = match self.map.as_mut() {
            Some(map) => map.layer_mut::<MarkerClusterGroup>(CLUSTER_LAYER_ID),
            None => self.cluster.as_mut(),
        };
        let Some(cluster) = cluster else {
            return Ok(());
        };

        match visibility {
            Visibility::Show => {
                let added = cluster.add_layers(markers)?;
                log::debug!("show {} rows: {} markers added", row_ids.len(), added);
            }
            Visibility::Hide => {
                let removed = cluster.remove_layers(markers.iter().map(Marker::marker_id));
                log::debug!("hide {} rows: {} markers removed", row_ids.len(), removed);
            }
        }
        Ok(())
    }
}

/// Map view over the rows supplied by a [`DataController`]
pub struct MapView {
    id: String,
    options: ViewOptions,
    cluster_options: ClusterOptions,
    controller: Rc<dyn DataController>,
    host: Rc<RefCell<dyn HostElement>>,
    loader: Rc<dyn AssetLoader>,
    spawner: Rc<dyn LocalSpawner>,
    factory: Rc<MarkerFactory>,
    ready: ReadySignal,
    state: Rc<RefCell<ViewState>>,
    visible: bool,
    init_started: bool,
    late_init_requested: bool,
}

impl MapView {
    /// Creates a view reading the positions stored under `id` in each row.
    ///
    /// The engine is treated as built in; use [`MapView::with_loader`] when it
    /// has to be loaded first.
    pub fn new(
        id: impl Into<String>,
        controller: Rc<dyn DataController>,
        host: Rc<RefCell<dyn HostElement>>,
        options: ViewOptions,
        spawner: Rc<dyn LocalSpawner>,
    ) -> Self {
        let factory = Rc::new(MarkerFactory::new(controller.path()));
        Self {
            id: id.into(),
            options,
            cluster_options: ClusterOptions::default(),
            controller,
            host,
            loader: Rc::new(ReadyLoader),
            spawner,
            factory,
            ready: ReadySignal::new(),
            state: Rc::new(RefCell::new(ViewState::new())),
            visible: false,
            init_started: false,
            late_init_requested: false,
        }
    }

    pub fn with_loader(mut self, loader: Rc<dyn AssetLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_cluster_options(mut self, options: ClusterOptions) -> Self {
        self.cluster_options = options;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.state.borrow().lifecycle
    }

    /// Whether the engine has loaded and the index is built
    pub fn is_ready(&self) -> bool {
        self.ready.is_resolved()
    }

    /// Region the view fits to; `None` until the index is built
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.state.borrow().index.as_ref().map(MarkerIndex::bounds)
    }

    /// Viewport configuration the map surface is (or will be) created with
    pub fn map_options(&self) -> Option<MapOptions> {
        let bounds = self.bounds()?;
        Some(MapOptions::derive(&self.options, Some(&bounds)))
    }

    pub fn marker_count(&self) -> usize {
        self.state
            .borrow()
            .index
            .as_ref()
            .map_or(0, MarkerIndex::marker_count)
    }

    /// Number of markers owned by a row
    pub fn group_len(&self, row_id: &str) -> usize {
        self.state
            .borrow()
            .index
            .as_ref()
            .and_then(|index| index.group(row_id))
            .map_or(0, <[Marker]>::len)
    }

    /// Number of markers currently on the cluster layer
    pub fn visible_marker_count(&self) -> usize {
        self.state.borrow().cluster().map_or(0, MarkerClusterGroup::len)
    }

    /// Ids of the markers currently on the cluster layer, sorted
    pub fn visible_marker_ids(&self) -> Vec<MarkerId> {
        let state = self.state.borrow();
        let mut ids: Vec<MarkerId> = state
            .cluster()
            .map(|cluster| cluster.markers().map(Marker::marker_id).collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Marker ids of a row, in position order
    pub fn row_marker_ids(&self, row_id: &str) -> Vec<MarkerId> {
        self.state
            .borrow()
            .index
            .as_ref()
            .and_then(|index| index.group(row_id))
            .map(|group| group.iter().map(Marker::marker_id).collect())
            .unwrap_or_default()
    }

    /// The shared marker icon, once the first marker has been built
    pub fn icon(&self) -> Option<Rc<Icon>> {
        self.factory.built_icon()
    }

    /// Runs `f` on the map surface, if it exists
    pub fn with_map<R>(&self, f: impl FnOnce(&Map) -> R) -> Option<R> {
        self.state.borrow().map.as_ref().map(f)
    }

    /// Runs `f` on the cluster layer, wherever it currently lives
    pub fn with_cluster<R>(&self, f: impl FnOnce(&MarkerClusterGroup) -> R) -> Option<R> {
        self.state.borrow().cluster().map(f)
    }

    fn late_init(&mut self) {
        if self.late_init_requested {
            return;
        }
        self.late_init_requested = true;

        let view_id = self.id.clone();
        let options = self.options.clone();
        let state = self.state.clone();
        let host = self.host.clone();

        self.ready.then(move || {
            let mut host = host.borrow_mut();
            if let Err(e) = state.borrow_mut().attach(&view_id, &mut *host, &options) {
                log::error!("view {view_id}: attaching the map failed: {e}");
            }
        });
    }

    fn filter_rows(&self, visibility: Visibility, row_ids: &[&str]) {
        let row_ids: Vec<String> = row_ids.iter().map(|id| id.to_string()).collect();
        let state = self.state.clone();
        let view_id = self.id.clone();

        self.ready.then(move || {
            if let Err(e) = state.borrow_mut().apply(visibility, &row_ids) {
                log::error!("view {view_id}: updating markers failed: {e}");
            }
        });
    }
}

impl View for MapView {
    fn init(&mut self) -> Result<()> {
        if self.init_started {
            log::warn!("view {}: init() called more than once", self.id);
            return Ok(());
        }

        if let Some(height) = &self.options.height {
            self.host.borrow_mut().set_height(height);
        }

        let load = self.loader.using(ENGINE_MODULE);
        let view_id = self.id.clone();
        let cluster_options = self.cluster_options.clone();
        let controller = self.controller.clone();
        let factory = self.factory.clone();
        let state = self.state.clone();
        let ready = self.ready.clone();

        spawn_local(self.spawner.as_ref(), async move {
            if let Err(e) = load.await {
                // No retry: everything chained on the signal stays pending
                log::error!("view {view_id}: loading {ENGINE_MODULE} failed: {e}");
                return;
            }

            let built = IndexBuilder::new(&view_id, &factory)
                .with_cluster_options(cluster_options)
                .build(controller.data());
            match built {
                Ok(built) => {
                    state.borrow_mut().data_ready(built);
                    log::debug!("view {view_id}: data ready");
                    ready.resolve();
                }
                Err(e) => log::error!("view {view_id}: building markers failed: {e}"),
            }
        })?;

        self.init_started = true;
        Ok(())
    }

    fn show(&mut self) {
        self.visible = true;
        self.late_init();
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn show_rows(&mut self, row_ids: &[&str]) {
        self.filter_rows(Visibility::Show, row_ids);
    }

    fn hide_rows(&mut self, row_ids: &[&str]) {
        self.filter_rows(Visibility::Hide, row_ids);
    }
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("id", &self.id)
            .field("lifecycle", &self.lifecycle())
            .field("visible", &self.visible)
            .field("ready", &self.ready)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng,
        data::rows::{Dataset, Row},
        view::host::Panel,
    };

    fn built_index() -> BuiltIndex {
        let dataset = Dataset::from_rows(vec![
            ("a", Row::new().with_positions("map", vec![LatLng::new(10.0, 10.0)])),
            (
                "b",
                Row::new().with_positions("map", vec![LatLng::new(20.0, 20.0), LatLng::new(30.0, 30.0)]),
            ),
        ]);
        let factory = MarkerFactory::new("/maps/");
        IndexBuilder::new("map", &factory).build(&dataset).unwrap()
    }

    #[test]
    fn test_failed_attach_keeps_cluster() {
        let mut state = ViewState::new();
        state.cluster = Some(built_index().cluster);
        let mut panel = Panel::default();

        assert!(state.attach("map", &mut panel, &ViewOptions::default()).is_err());
        assert!(state.map.is_none());
        assert!(panel.bound_maps().is_empty());
        assert_eq!(state.cluster().map(MarkerClusterGroup::len), Some(3));
    }

    #[test]
    fn test_cluster_joins_fitted_map_last() {
        let mut state = ViewState::new();
        state.data_ready(built_index());
        let options = ViewOptions {
            map_provider: Some("OpenStreetMap.HOT".to_string()),
            ..ViewOptions::default()
        };

        state.attach("map", &mut Panel::default(), &options).unwrap();
        assert_eq!(state.lifecycle, LifecycleState::Attached);
        assert!(state.cluster.is_none());

        let map = state.map.as_ref().unwrap();
        assert_eq!(map.layers().len(), 2);
        assert_eq!(map.zoom(), 5.0);

        let cluster = state.cluster().unwrap();
        assert!(cluster.is_on_map());
        assert_eq!(cluster.markers_in_view().len(), 3);

        state.apply(Visibility::Hide, &["b".to_string()]).unwrap();
        assert_eq!(state.cluster().map(MarkerClusterGroup::len), Some(1));
    }
}
