//! Tile layer and the provider registry behind the `map provider` option
//!
//! Provider names follow the Leaflet-providers naming (`Provider.Variant`).
//! Tiles are not fetched here; the layer only knows how to address them.

use crate::{
    core::{constants::TILE_SIZE, geo::LatLngBounds},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// A slippy map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub attribution: Option<String>,
    pub subdomains: Vec<String>,
    pub z_index: i32,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: 0,
            max_zoom: 18,
            attribution: None,
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            z_index: 1,
        }
    }
}

/// A named tile provider: URL template plus layer options
#[derive(Debug, Clone, PartialEq)]
pub struct TileProvider {
    pub name: String,
    pub url_template: String,
    pub options: TileLayerOptions,
}

const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const ESRI_ATTRIBUTION: &str = "Tiles &copy; Esri";
const CARTO_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

impl TileProvider {
    /// Names accepted by [`TileProvider::from_name`]
    pub const NAMES: &'static [&'static str] = &[
        "OpenStreetMap",
        "OpenStreetMap.Mapnik",
        "OpenStreetMap.DE",
        "OpenStreetMap.France",
        "OpenStreetMap.HOT",
        "OpenTopoMap",
        "Esri.WorldStreetMap",
        "Esri.WorldImagery",
        "CartoDB.Positron",
        "CartoDB.DarkMatter",
        "Wikimedia",
    ];

    /// Resolves a provider by its `Provider.Variant` name
    pub fn from_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let (template, attribution, max_zoom, subdomains): (&str, &str, u8, &[&str]) = match trimmed {
            "OpenStreetMap" | "OpenStreetMap.Mapnik" => (
                "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
                19,
                &[],
            ),
            "OpenStreetMap.DE" => (
                "https://tile.openstreetmap.de/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
                18,
                &[],
            ),
            "OpenStreetMap.France" => (
                "https://{s}.tile.openstreetmap.fr/osmfr/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
                20,
                &["a", "b", "c"],
            ),
            "OpenStreetMap.HOT" => (
                "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
                19,
                &["a", "b", "c"],
            ),
            "OpenTopoMap" => (
                "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
                "Map data: &copy; OpenStreetMap contributors, SRTM | Map style: &copy; OpenTopoMap (CC-BY-SA)",
                17,
                &["a", "b", "c"],
            ),
            "Esri.WorldStreetMap" => (
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
                ESRI_ATTRIBUTION,
                18,
                &[],
            ),
            "Esri.WorldImagery" => (
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                ESRI_ATTRIBUTION,
                18,
                &[],
            ),
            "CartoDB.Positron" => (
                "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
                CARTO_ATTRIBUTION,
                20,
                &["a", "b", "c", "d"],
            ),
            "CartoDB.DarkMatter" => (
                "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
                CARTO_ATTRIBUTION,
                20,
                &["a", "b", "c", "d"],
            ),
            "Wikimedia" => (
                "https://maps.wikimedia.org/osm-intl/{z}/{x}/{y}.png",
                "<a href=\"https://wikimediafoundation.org/wiki/Maps_Terms_of_Use\">Wikimedia</a>",
                19,
                &[],
            ),
            _ => return Err(MapError::UnknownProvider(name.to_string()).into()),
        };

        Ok(Self {
            name: trimmed.to_string(),
            url_template: template.to_string(),
            options: TileLayerOptions {
                max_zoom,
                attribution: Some(attribution.to_string()),
                subdomains: subdomains.iter().map(|s| s.to_string()).collect(),
                ..TileLayerOptions::default()
            },
        })
    }
}

impl TileSource for TileProvider {
    fn url(&self, coord: TileCoord) -> String {
        let subdomain = if self.options.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.options.subdomains.len() as u32) as usize;
            self.options.subdomains[idx].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

/// Base layer showing tiles from a provider
pub struct TileLayer {
    properties: LayerProperties,
    provider: TileProvider,
}

impl TileLayer {
    pub fn new(provider: TileProvider) -> Self {
        let properties = LayerProperties::new(format!("tiles-{}", provider.name), LayerType::Tile)
            .with_z_index(provider.options.z_index);
        Self {
            properties,
            provider,
        }
    }

    /// Shorthand for a layer from a provider name
    pub fn provider(name: &str) -> Result<Self> {
        Ok(Self::new(TileProvider::from_name(name)?))
    }

    pub fn tile_provider(&self) -> &TileProvider {
        &self.provider
    }

    pub fn attribution(&self) -> Option<&str> {
        self.provider.options.attribution.as_deref()
    }
}

impl TileSource for TileLayer {
    fn url(&self, coord: TileCoord) -> String {
        self.provider.url(coord)
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": self.provider.name,
            "url": self.provider.url_template,
            "attribution": self.provider.options.attribution,
            "maxZoom": self.provider.options.max_zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_provider_resolves() {
        for name in TileProvider::NAMES {
            let provider = TileProvider::from_name(name).unwrap();
            assert_eq!(provider.name, *name);
            assert!(provider.options.attribution.is_some());
        }
    }

    #[test]
    fn test_url_templating() {
        let osm = TileProvider::from_name("OpenStreetMap").unwrap();
        assert_eq!(
            osm.url(TileCoord::new(1, 2, 3)),
            "https://tile.openstreetmap.org/3/1/2.png"
        );

        let esri = TileProvider::from_name("Esri.WorldImagery").unwrap();
        assert!(esri.url(TileCoord::new(4, 5, 6)).ends_with("/tile/6/5/4"));

        let hot = TileProvider::from_name("OpenStreetMap.HOT").unwrap();
        assert_eq!(
            hot.url(TileCoord::new(1, 1, 2)),
            "https://c.tile.openstreetmap.fr/hot/2/1/1.png"
        );
    }

    #[test]
    fn test_unknown_provider() {
        let err = TileLayer::provider("Nowhere.Maps").err().unwrap();
        assert_eq!(err.to_string(), "Unknown map provider: Nowhere.Maps");
    }

    #[test]
    fn test_tile_layer_identity() {
        let layer = TileLayer::provider("OpenTopoMap").unwrap();
        assert_eq!(layer.id(), "tiles-OpenTopoMap");
        assert_eq!(layer.layer_type(), LayerType::Tile);
        assert_eq!(layer.options()["maxZoom"], 17);
    }
}
