//! Row data as supplied by the result controller
//!
//! ```json
//! {
//!   "row-1": {
//!     "data": { "map-view": { "positions": [ { "lat": 52.5, "lng": 13.4 } ] } },
//!     "printouts": {
//!       "name": { "label": "", "values": ["Berlin"], "formatted values": ["<a>Berlin</a>"] }
//!     }
//!   }
//! }
//! ```
//!
//! Row and printout order is kept as it appears in the source. A repeated key
//! keeps its first position and its last value.

use crate::{core::geo::LatLng, prelude::HashMap, MapError, Result};
use indexmap::IndexMap;
use serde::{
    de::{MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer,
};
use serde_json::Value;
use std::{fmt, marker::PhantomData};

/// Per-view data of a row; only the positions are of interest here
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewData {
    #[serde(default)]
    pub positions: Vec<LatLng>,
}

/// One labelled attribute of a row, in raw and formatted form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Printout {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub values: Vec<Value>,
    #[serde(default, rename = "formatted values")]
    pub formatted_values: Vec<Value>,
}

impl Printout {
    pub fn new<V, F>(label: Option<&str>, values: V, formatted_values: F) -> Self
    where
        V: IntoIterator,
        V::Item: Into<Value>,
        F: IntoIterator,
        F::Item: Into<Value>,
    {
        Self {
            label: label.map(str::to_string),
            values: values.into_iter().map(Into::into).collect(),
            formatted_values: formatted_values.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw values joined with `", "`
    pub fn values_text(&self) -> String {
        join_values(&self.values)
    }

    /// Formatted values joined with `", "`
    pub fn formatted_text(&self) -> String {
        join_values(&self.formatted_values)
    }

    /// The label, if it is non-empty
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }
}

/// Text form of a JSON value: strings verbatim, null as empty
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_values(values: &[Value]) -> String {
    values.iter().map(value_text).collect::<Vec<_>>().join(", ")
}

/// A data record with per-view positions and ordered printouts
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub data: HashMap<String, ViewData>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub printouts: IndexMap<String, Printout>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(mut self, view_id: &str, positions: Vec<LatLng>) -> Self {
        self.data.insert(view_id.to_string(), ViewData { positions });
        self
    }

    pub fn with_printout(mut self, printout_id: &str, printout: Printout) -> Self {
        self.printouts.insert(printout_id.to_string(), printout);
        self
    }

    /// Positions the row contributes to a view; none when the view has no entry
    pub fn positions(&self, view_id: &str) -> &[LatLng] {
        self.data
            .get(view_id)
            .map(|view| view.positions.as_slice())
            .unwrap_or(&[])
    }

    /// Printouts in source order
    pub fn printouts(&self) -> impl Iterator<Item = &Printout> {
        self.printouts.values()
    }
}

/// Rows keyed by row id, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: IndexMap<String, Row>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset = serde_json::from_str(json).map_err(MapError::from)?;
        Ok(dataset)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let dataset = serde_json::from_value(value).map_err(MapError::from)?;
        Ok(dataset)
    }

    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, Row)>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(|(id, row)| (id.into(), row)).collect(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.rows.iter().map(|(id, row)| (id.as_str(), row))
    }

    pub fn get(&self, row_id: &str) -> Option<&Row> {
        self.rows.get(row_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of positions across all rows for a view
    pub fn position_count(&self, view_id: &str) -> usize {
        self.rows
            .values()
            .map(|row| row.positions(view_id).len())
            .sum()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ordered_entries(deserializer).map(|rows| Dataset { rows })
    }
}

/// Deserializes a JSON object into an ordered map; later duplicates replace
/// earlier values in place.
///
/// An array is accepted as well (an empty PHP array encodes as `[]`); its
/// elements are keyed by index.
fn ordered_entries<'de, D, V>(deserializer: D) -> std::result::Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object or an array")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                entries.insert(key, value);
            }
            Ok(entries)
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut entries = IndexMap::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(value) = seq.next_element::<V>()? {
                entries.insert(entries.len().to_string(), value);
            }
            Ok(entries)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
            Ok(IndexMap::new())
        }
    }

    deserializer.deserialize_any(EntriesVisitor(PhantomData))
}
