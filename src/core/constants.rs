//! Core constants derived from Leaflet defaults and the map view's assets.
//! Keeping them in a single place makes it easier to tweak view-wide magic numbers.

/// Module that has to be loaded before the map engine can be used.
pub const ENGINE_MODULE: &str = "ext.srf.filtered.map-view.leaflet";

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom limits applied when the display options do not set any.
pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

/// Padding (in pixels) kept around the data when fitting the viewport.
pub const FIT_BOUNDS_PADDING: f64 = 20.0;

/// Host size assumed when the host element reports no usable size.
pub const FALLBACK_HOST_SIZE: (f64, f64) = (800.0, 600.0);

/// Icon assets live below `<resource path>css/images/`.
pub const ICON_ASSET_DIR: &str = "css/images/";
pub const MARKER_ICON_FILE: &str = "marker-icon.png";
pub const MARKER_ICON_RETINA_FILE: &str = "marker-icon-2x.png";
pub const MARKER_SHADOW_FILE: &str = "marker-shadow.png";

/// Marker icon default size (regular PNG).
pub const MARKER_ICON_SIZE: (u32, u32) = (25, 41);

/// Anchor inside the icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (12, 41);

/// Popup offset relative to the icon anchor.
pub const MARKER_POPUP_ANCHOR: (i32, i32) = (1, -34);

/// Shadow image size.
pub const MARKER_SHADOW_SIZE: (u32, u32) = (41, 41);

/// Pixel radius a cluster may cover (Leaflet.markercluster default).
pub const CLUSTER_RADIUS: f64 = 80.0;
