//! Configuration for the map view
//!
//! The surrounding result display hands the view a loose option map. This
//! module turns it into an explicit structure where every recognised key is a
//! named, optional field, and derives the viewport configuration from it.

use crate::core::{
    constants::{CLUSTER_RADIUS, DEFAULT_MAX_ZOOM},
    geo::{LatLng, LatLngBounds},
};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Panel height as given in the display options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Height {
    /// Plain number, interpreted as CSS pixels
    Pixels(f64),
    /// Any CSS length, e.g. `"400px"` or `"50vh"`
    Css(String),
}

impl Height {
    /// CSS value suitable for a `height` style property
    pub fn to_css(&self) -> String {
        match self {
            Height::Pixels(px) => format!("{px}px"),
            Height::Css(value) if value.trim().parse::<f64>().is_ok() => {
                format!("{}px", value.trim())
            }
            Height::Css(value) => value.clone(),
        }
    }
}

/// Display options recognised by the map view.
///
/// * `height` - applied to the host element as soon as `init()` runs
/// * `zoom` - explicit initial zoom; disables fitting the viewport to the data
/// * `min zoom` / `max zoom` - zoom limits of the map surface
/// * `map provider` - tile provider name; no tile layer when absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    #[serde(default)]
    pub height: Option<Height>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub zoom: Option<f64>,
    #[serde(default, rename = "min zoom", deserialize_with = "lenient_f64")]
    pub min_zoom: Option<f64>,
    #[serde(default, rename = "max zoom", deserialize_with = "lenient_f64")]
    pub max_zoom: Option<f64>,
    #[serde(default, rename = "map provider")]
    pub map_provider: Option<String>,
}

impl ViewOptions {
    /// Parses the display options from their JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let options = serde_json::from_str(json).map_err(crate::MapError::from)?;
        Ok(options)
    }

    /// Parses the display options from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        let options = serde_json::from_value(value).map_err(crate::MapError::from)?;
        Ok(options)
    }
}

/// Options arrive from query parameters as well as from JSON, so numbers may be strings.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    let value = match Option::<NumberOrString>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrString::Number(value)) => value,
        Some(NumberOrString::String(value)) if value.trim().is_empty() => return Ok(None),
        Some(NumberOrString::String(value)) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got {value:?}")))?,
    };

    // "nan" and "inf" parse as floats
    if !value.is_finite() {
        return Err(de::Error::custom(format!("expected a finite number, got {value}")));
    }
    Ok(Some(value))
}

/// Viewport configuration of the map surface, derived once from the display options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl MapOptions {
    /// Derives the map options; the center is the bounds center, or the origin without bounds
    pub fn derive(options: &ViewOptions, bounds: Option<&LatLngBounds>) -> Self {
        Self {
            center: bounds.map(LatLngBounds::center).unwrap_or_default(),
            zoom: options.zoom,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
        }
    }

    /// An explicit zoom always wins over fitting the viewport to the data
    pub fn should_fit_bounds(&self) -> bool {
        self.zoom.is_none()
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self::derive(&ViewOptions::default(), None)
    }
}

/// Configuration of the marker cluster layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    /// Animate markers added after the layer is on a map
    pub animate_adding_markers: bool,
    /// Maximum distance (in pixels) a cluster may cover
    pub max_cluster_radius: f64,
    /// From this zoom level on, every marker is shown on its own
    pub disable_clustering_at_zoom: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            animate_adding_markers: true,
            max_cluster_radius: CLUSTER_RADIUS,
            disable_clustering_at_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_options_keys() {
        let options = ViewOptions::from_json(
            r#"{"height": 400, "zoom": 7, "min zoom": "2", "max zoom": 12,
                "map provider": "OpenStreetMap.DE", "format": "map"}"#,
        )
        .unwrap();

        assert_eq!(options.height, Some(Height::Pixels(400.0)));
        assert_eq!(options.zoom, Some(7.0));
        assert_eq!(options.min_zoom, Some(2.0));
        assert_eq!(options.max_zoom, Some(12.0));
        assert_eq!(options.map_provider.as_deref(), Some("OpenStreetMap.DE"));
    }

    #[test]
    fn test_view_options_defaults() {
        let options = ViewOptions::from_json("{}").unwrap();
        assert_eq!(options, ViewOptions::default());
    }

    #[test]
    fn test_view_options_rejects_garbage_zoom() {
        assert!(ViewOptions::from_json(r#"{"zoom": "close"}"#).is_err());
    }

    #[test]
    fn test_view_options_rejects_non_finite_zoom() {
        assert!(ViewOptions::from_json(r#"{"min zoom": "nan"}"#).is_err());
        assert!(ViewOptions::from_json(r#"{"zoom": "inf"}"#).is_err());
        assert!(ViewOptions::from_json(r#"{"max zoom": "-Infinity"}"#).is_err());
        assert_eq!(
            ViewOptions::from_json(r#"{"zoom": " 3.5 "}"#).unwrap().zoom,
            Some(3.5)
        );
    }

    #[test]
    fn test_height_css() {
        assert_eq!(Height::Pixels(300.0).to_css(), "300px");
        assert_eq!(Height::Css("250".to_string()).to_css(), "250px");
        assert_eq!(Height::Css("50vh".to_string()).to_css(), "50vh");
    }

    #[test]
    fn test_map_options_center() {
        let bounds = LatLngBounds::from_coords(10.0, 10.0, 30.0, 30.0);
        let options = MapOptions::derive(&ViewOptions::default(), Some(&bounds));

        assert_eq!(options.center, LatLng::new(20.0, 20.0));
        assert!(options.should_fit_bounds());

        let no_bounds = MapOptions::derive(&ViewOptions::default(), None);
        assert_eq!(no_bounds.center, LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_explicit_zoom_disables_fit() {
        let view_options = ViewOptions {
            zoom: Some(4.0),
            ..ViewOptions::default()
        };
        let options = MapOptions::derive(&view_options, None);

        assert_eq!(options.zoom, Some(4.0));
        assert!(!options.should_fit_bounds());
    }
}
