//! Collaborators the map view is embedded in: the host element it draws into
//! and the controller that owns the result data.

use crate::{
    core::{config::Height, constants::FALLBACK_HOST_SIZE, geo::Point},
    data::rows::Dataset,
};

/// The element a view draws into
pub trait HostElement {
    /// Applies a panel height
    fn set_height(&mut self, height: &Height);

    /// Current size in pixels; zero when not laid out yet
    fn size(&self) -> Point;

    /// Called when a map surface is bound to the element
    fn bind(&mut self, map_id: &str);
}

/// In-memory host element, for headless use and tests
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    size: Point,
    height: Option<String>,
    bound_maps: Vec<String>,
}

impl Panel {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Point::new(width, height),
            height: None,
            bound_maps: Vec::new(),
        }
    }

    /// CSS height applied through [`HostElement::set_height`]
    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    /// Ids of the map surfaces bound so far, in binding order
    pub fn bound_maps(&self) -> &[String] {
        &self.bound_maps
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(FALLBACK_HOST_SIZE.0, FALLBACK_HOST_SIZE.1)
    }
}

impl HostElement for Panel {
    fn set_height(&mut self, height: &Height) {
        self.height = Some(height.to_css());
        if let Height::Pixels(px) = height {
            self.size.y = *px;
        }
    }

    fn size(&self) -> Point {
        self.size
    }

    fn bind(&mut self, map_id: &str) {
        self.bound_maps.push(map_id.to_string());
    }
}

/// Source of the result rows and of the extension's resource path
pub trait DataController {
    fn data(&self) -> &Dataset;

    /// Base path of the extension's resources, ending in `/`
    fn path(&self) -> &str;
}

/// Controller over a fixed dataset
#[derive(Debug, Clone, Default)]
pub struct StaticController {
    data: Dataset,
    path: String,
}

impl StaticController {
    pub fn new(data: Dataset, path: impl Into<String>) -> Self {
        Self {
            data,
            path: path.into(),
        }
    }
}

impl DataController for StaticController {
    fn data(&self) -> &Dataset {
        &self.data
    }

    fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_height() {
        let mut panel = Panel::default();
        panel.set_height(&Height::Pixels(300.0));

        assert_eq!(panel.height(), Some("300px"));
        assert_eq!(panel.size(), Point::new(800.0, 300.0));

        panel.set_height(&Height::Css("50vh".to_string()));
        assert_eq!(panel.height(), Some("50vh"));
        assert_eq!(panel.size().y, 300.0);
    }

    #[test]
    fn test_panel_records_binds() {
        let mut panel = Panel::new(640.0, 480.0);
        panel.bind("a");
        panel.bind("b");
        assert_eq!(panel.bound_maps(), ["a".to_string(), "b".to_string()]);
    }
}
