use crate::core::constants::{
    ICON_ASSET_DIR, MARKER_ICON_ANCHOR, MARKER_ICON_FILE, MARKER_ICON_RETINA_FILE,
    MARKER_ICON_SIZE, MARKER_POPUP_ANCHOR, MARKER_SHADOW_FILE, MARKER_SHADOW_SIZE,
};
use serde::{Deserialize, Serialize};

/// Icon descriptor shared by markers: image URLs plus geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub icon_url: String,
    pub icon_retina_url: Option<String>,
    pub shadow_url: Option<String>,
    pub icon_size: (u32, u32),
    pub icon_anchor: (u32, u32),
    pub popup_anchor: (i32, i32),
    pub shadow_size: Option<(u32, u32)>,
}

impl Icon {
    pub fn new(icon_url: impl Into<String>, icon_size: (u32, u32), icon_anchor: (u32, u32)) -> Self {
        Self {
            icon_url: icon_url.into(),
            icon_retina_url: None,
            shadow_url: None,
            icon_size,
            icon_anchor,
            popup_anchor: (0, 0),
            shadow_size: None,
        }
    }

    /// The default pin marker, with assets below `<resource_path>css/images/`
    pub fn default_marker(resource_path: &str) -> Self {
        let base = format!("{resource_path}{ICON_ASSET_DIR}");
        Self {
            icon_url: format!("{base}{MARKER_ICON_FILE}"),
            icon_retina_url: Some(format!("{base}{MARKER_ICON_RETINA_FILE}")),
            shadow_url: Some(format!("{base}{MARKER_SHADOW_FILE}")),
            icon_size: MARKER_ICON_SIZE,
            icon_anchor: MARKER_ICON_ANCHOR,
            popup_anchor: MARKER_POPUP_ANCHOR,
            shadow_size: Some(MARKER_SHADOW_SIZE),
        }
    }

    /// URL to use on a display with the given pixel ratio
    pub fn url_for_ratio(&self, device_pixel_ratio: f64) -> &str {
        match &self.icon_retina_url {
            Some(retina) if device_pixel_ratio > 1.0 => retina,
            _ => &self.icon_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker_assets() {
        let icon = Icon::default_marker("/w/extensions/SemanticResultFormats/");

        assert_eq!(
            icon.icon_url,
            "/w/extensions/SemanticResultFormats/css/images/marker-icon.png"
        );
        assert_eq!(
            icon.shadow_url.as_deref(),
            Some("/w/extensions/SemanticResultFormats/css/images/marker-shadow.png")
        );
        assert_eq!(icon.icon_size, (25, 41));
        assert_eq!(icon.icon_anchor, (12, 41));
        assert_eq!(icon.popup_anchor, (1, -34));
        assert_eq!(icon.shadow_size, Some((41, 41)));
    }

    #[test]
    fn test_retina_url() {
        let icon = Icon::default_marker("res/");
        assert_eq!(icon.url_for_ratio(1.0), "res/css/images/marker-icon.png");
        assert_eq!(icon.url_for_ratio(2.0), "res/css/images/marker-icon-2x.png");

        let plain = Icon::new("pin.png", (10, 10), (5, 10));
        assert_eq!(plain.url_for_ratio(2.0), "pin.png");
    }
}
