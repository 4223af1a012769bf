//! Row-to-marker index
//!
//! Turns the rows of a dataset into markers (one per row position), groups
//! them by row for later show/hide, puts all of them on a cluster layer and
//! accumulates the region they cover.

use crate::{
    core::{
        config::ClusterOptions,
        geo::{LatLng, LatLngBounds},
    },
    data::rows::{Dataset, Row},
    layers::{
        cluster::MarkerClusterGroup,
        icon::Icon,
        marker::{Marker, MarkerId},
        popup::{escape_html, Popup},
    },
    prelude::HashMap,
    Result,
};
use once_cell::unsync::OnceCell;
use std::{cell::Cell, rc::Rc};

/// Id of the cluster layer on the map surface
pub const CLUSTER_LAYER_ID: &str = "markers";

/// Creates markers for one view. The shared icon is built on first use and
/// then reused for every marker.
pub struct MarkerFactory {
    resource_path: String,
    icon: OnceCell<Rc<Icon>>,
    next_id: Cell<u64>,
}

impl MarkerFactory {
    pub fn new(resource_path: impl Into<String>) -> Self {
        Self {
            resource_path: resource_path.into(),
            icon: OnceCell::new(),
            next_id: Cell::new(0),
        }
    }

    pub fn icon(&self) -> Rc<Icon> {
        self.icon
            .get_or_init(|| {
                log::debug!("building marker icon below {}", self.resource_path);
                Rc::new(Icon::default_marker(&self.resource_path))
            })
            .clone()
    }

    /// The icon, if any marker has been created yet
    pub fn built_icon(&self) -> Option<Rc<Icon>> {
        self.icon.get().cloned()
    }

    /// Creates the marker for one position of a row
    pub fn marker(&self, position: LatLng, row: &Row) -> Marker {
        let id = MarkerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let icon = self.icon();
        let popup = Popup::new(popup_content(row)).with_offset(icon.popup_anchor);

        let mut marker = Marker::new(id, position)
            .with_title(marker_title(row))
            .bind_popup(popup);
        marker.set_icon(icon);
        marker
    }
}

/// Raw values of the row's first printout; none without printouts
pub fn marker_title(row: &Row) -> Option<String> {
    row.printouts().next().map(|printout| printout.values_text())
}

/// Popup HTML: the first printout's formatted values in bold, then one line
/// per further printout with its label (if any) in bold.
pub fn popup_content(row: &Row) -> String {
    row.printouts()
        .enumerate()
        .map(|(i, printout)| {
            if i == 0 {
                format!("<b>{}</b>", printout.formatted_text())
            } else {
                let label = printout
                    .label()
                    .map(|label| format!("<b>{}:</b> ", escape_html(label)))
                    .unwrap_or_default();
                format!("{label}{}", printout.formatted_text())
            }
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Markers grouped by owning row, plus the region they cover
#[derive(Debug, Clone)]
pub struct MarkerIndex {
    groups: HashMap<String, Vec<Marker>>,
    marker_count: usize,
    data_bounds: Option<LatLngBounds>,
}

impl MarkerIndex {
    /// Markers of a row; `None` for rows without positions and unknown ids
    pub fn group(&self, row_id: &str) -> Option<&[Marker]> {
        self.groups.get(row_id).map(Vec::as_slice)
    }

    /// Markers of all given rows, in the given order; unknown ids add nothing
    pub fn markers_for<S: AsRef<str>>(&self, row_ids: &[S]) -> Vec<Marker> {
        row_ids
            .iter()
            .filter_map(|row_id| self.groups.get(row_id.as_ref()))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn contains_row(&self, row_id: &str) -> bool {
        self.groups.contains_key(row_id)
    }

    /// Number of rows owning at least one marker
    pub fn row_count(&self) -> usize {
        self.groups.len()
    }

    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    pub fn is_empty(&self) -> bool {
        self.marker_count == 0
    }

    /// Region enclosing every marker; the whole world when there are none
    pub fn bounds(&self) -> LatLngBounds {
        self.data_bounds.clone().unwrap_or_else(LatLngBounds::world)
    }

    /// Region enclosing every marker, if there is any
    pub fn data_bounds(&self) -> Option<&LatLngBounds> {
        self.data_bounds.as_ref()
    }
}

/// Result of building the index: the index and the cluster layer holding every marker
pub struct BuiltIndex {
    pub index: MarkerIndex,
    pub cluster: MarkerClusterGroup,
}

/// Builds the marker index of one view from a dataset
pub struct IndexBuilder<'a> {
    view_id: &'a str,
    factory: &'a MarkerFactory,
    cluster_options: ClusterOptions,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(view_id: &'a str, factory: &'a MarkerFactory) -> Self {
        Self {
            view_id,
            factory,
            cluster_options: ClusterOptions::default(),
        }
    }

    pub fn with_cluster_options(mut self, options: ClusterOptions) -> Self {
        self.cluster_options = options;
        self
    }

    pub fn build(&self, dataset: &Dataset) -> Result<BuiltIndex> {
        let mut cluster = MarkerClusterGroup::new(CLUSTER_LAYER_ID, self.cluster_options.clone());
        let mut groups: HashMap<String, Vec<Marker>> = HashMap::default();
        let mut data_bounds: Option<LatLngBounds> = None;
        let mut marker_count = 0;

        for (row_id, row) in dataset.rows() {
            let positions = row.positions(self.view_id);
            if positions.is_empty() {
                continue;
            }

            let group = groups.entry(row_id.to_string()).or_default();
            for position in positions {
                match data_bounds.as_mut() {
                    Some(bounds) => bounds.extend(position),
                    None => data_bounds = Some(LatLngBounds::from_point(*position)),
                }

                let marker = self.factory.marker(*position, row);
                cluster.add_layer(marker.clone())?;
                group.push(marker);
                marker_count += 1;
            }
        }

        log::debug!(
            "view {}: {} markers for {} of {} rows",
            self.view_id,
            marker_count,
            groups.len(),
            dataset.len()
        );

        Ok(BuiltIndex {
            index: MarkerIndex {
                groups,
                marker_count,
                data_bounds,
            },
            cluster,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::rows::Printout;

    fn city_row() -> Row {
        Row::new()
            .with_positions("map", vec![LatLng::new(52.52, 13.40)])
            .with_printout(
                "name",
                Printout::new(Some(""), ["Berlin", "Berlin (DE)"], ["<a>Berlin</a>", "<a>Berlin (DE)</a>"]),
            )
            .with_printout("pop", Printout::new(Some("Population"), [3_700_000], ["3,700,000"]))
            .with_printout("area", Printout::new(None, ["891"], ["891 km²"]))
            .with_printout("note", Printout::new(Some("R&D <lab>"), ["x"], ["<i>x</i>"]))
    }

    #[test]
    fn test_title_from_first_printout() {
        assert_eq!(marker_title(&city_row()).as_deref(), Some("Berlin, Berlin (DE)"));
        assert_eq!(marker_title(&Row::new()), None);
    }

    #[test]
    fn test_popup_layout() {
        assert_eq!(
            popup_content(&city_row()),
            "<b><a>Berlin</a>, <a>Berlin (DE)</a></b><br>\
             <b>Population:</b> 3,700,000<br>\
             891 km²<br>\
             <b>R&amp;D &lt;lab&gt;:</b> <i>x</i>"
        );
        assert_eq!(popup_content(&Row::new()), "");
    }

    #[test]
    fn test_icon_is_shared_and_lazy() {
        let factory = MarkerFactory::new("res/");
        assert!(factory.built_icon().is_none());

        let row = city_row();
        let a = factory.marker(LatLng::new(1.0, 1.0), &row);
        let b = factory.marker(LatLng::new(2.0, 2.0), &row);

        assert!(Rc::ptr_eq(a.icon().unwrap(), b.icon().unwrap()));
        assert_ne!(a.marker_id(), b.marker_id());
        assert_eq!(a.popup().unwrap().offset, (1, -34));
        assert_eq!(a.alt(), Some("Berlin, Berlin (DE)"));
    }

    #[test]
    fn test_groups_and_bounds() {
        let dataset = Dataset::from_rows(vec![
            ("a", Row::new().with_positions("map", vec![LatLng::new(10.0, 10.0)])),
            (
                "b",
                Row::new().with_positions("map", vec![LatLng::new(20.0, 20.0), LatLng::new(30.0, 30.0)]),
            ),
            ("c", Row::new().with_positions("other", vec![LatLng::new(80.0, 80.0)])),
        ]);
        let factory = MarkerFactory::new("res/");
        let built = IndexBuilder::new("map", &factory).build(&dataset).unwrap();

        assert_eq!(built.index.marker_count(), 3);
        assert_eq!(built.cluster.len(), 3);
        assert_eq!(built.index.group("a").unwrap().len(), 1);
        assert_eq!(built.index.group("b").unwrap().len(), 2);
        assert!(built.index.group("c").is_none());
        assert_eq!(built.index.row_count(), 2);
        assert_eq!(
            built.index.bounds(),
            LatLngBounds::from_coords(10.0, 10.0, 30.0, 30.0)
        );

        let flattened = built.index.markers_for(&["b", "missing", "a", "b"]);
        assert_eq!(flattened.len(), 5);
        assert_eq!(flattened[0].position(), LatLng::new(20.0, 20.0));
        assert_eq!(flattened[2].position(), LatLng::new(10.0, 10.0));
    }

    #[test]
    fn test_empty_dataset_falls_back_to_world() {
        let factory = MarkerFactory::new("res/");
        let built = IndexBuilder::new("map", &factory)
            .build(&Dataset::default())
            .unwrap();

        assert!(built.index.is_empty());
        assert!(built.index.data_bounds().is_none());
        assert_eq!(built.index.bounds(), LatLngBounds::world());
        assert!(built.cluster.is_empty());
        assert!(factory.built_icon().is_none());
    }
}
