use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        icon::Icon,
        popup::Popup,
    },
};
use std::rc::Rc;

/// Opaque handle identifying a marker within one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

/// A single point placement with an optional title, popup and icon
#[derive(Debug, Clone)]
pub struct Marker {
    properties: LayerProperties,
    marker_id: MarkerId,
    position: LatLng,
    title: Option<String>,
    alt: Option<String>,
    popup: Option<Popup>,
    icon: Option<Rc<Icon>>,
}

impl Marker {
    pub fn new(marker_id: MarkerId, position: LatLng) -> Self {
        Self {
            properties: LayerProperties::new(marker_id.to_string(), LayerType::Marker),
            marker_id,
            position,
            title: None,
            alt: None,
            popup: None,
            icon: None,
        }
    }

    /// Sets the hover title; the alt text follows the title
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.alt = title.clone();
        self.title = title;
        self
    }

    pub fn bind_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn set_icon(&mut self, icon: Rc<Icon>) {
        self.icon = Some(icon);
    }

    pub fn marker_id(&self) -> MarkerId {
        self.marker_id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn icon(&self) -> Option<&Rc<Icon>> {
        self.icon.as_ref()
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "title": self.title,
            "alt": self.alt,
            "popup": self.popup.as_ref().map(|p| p.content.as_str()),
            "icon": self.icon.as_deref().map(|i| i.icon_url.as_str()),
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::from_point(self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_title_sets_alt() {
        let marker = Marker::new(MarkerId(3), LatLng::new(52.5, 13.4))
            .with_title(Some("Berlin".to_string()));

        assert_eq!(marker.id(), "marker-3");
        assert_eq!(marker.title(), Some("Berlin"));
        assert_eq!(marker.alt(), Some("Berlin"));
        assert_eq!(
            marker.bounds(),
            Some(LatLngBounds::from_coords(52.5, 13.4, 52.5, 13.4))
        );
    }

    #[test]
    fn test_marker_options() {
        let mut marker = Marker::new(MarkerId(1), LatLng::new(1.0, 2.0))
            .bind_popup(Popup::new("<b>x</b>".to_string()));
        marker.set_icon(Rc::new(Icon::default_marker("res/")));

        let options = marker.options();
        assert_eq!(options["position"]["lat"], 1.0);
        assert_eq!(options["popup"], "<b>x</b>");
        assert_eq!(options["icon"], "res/css/images/marker-icon.png");
        assert!(options["title"].is_null());
    }
}
