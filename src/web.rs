//! Browser bindings: a host element backed by a DOM element and a spawner on
//! the browser's microtask queue.

use crate::{
    core::{config::Height, geo::Point},
    prelude::Pin,
    runtime::LocalSpawner,
    view::host::HostElement,
    Result,
};
use futures::Future;
use web_sys::HtmlElement;

/// Attribute naming the map surface bound to an element
const MAP_ID_ATTRIBUTE: &str = "data-map-id";

/// Host element over a DOM element
pub struct WebPanel {
    element: HtmlElement,
}

impl WebPanel {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl HostElement for WebPanel {
    fn set_height(&mut self, height: &Height) {
        if let Err(e) = self.element.style().set_property("height", &height.to_css()) {
            log::warn!("could not set panel height: {e:?}");
        }
    }

    fn size(&self) -> Point {
        Point::new(
            f64::from(self.element.client_width()),
            f64::from(self.element.client_height()),
        )
    }

    fn bind(&mut self, map_id: &str) {
        if let Err(e) = self.element.set_attribute(MAP_ID_ATTRIBUTE, map_id) {
            log::warn!("could not bind map {map_id}: {e:?}");
        }
    }
}

/// Spawns onto the browser event loop
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmSpawner;

impl LocalSpawner for WasmSpawner {
    fn spawn_local_boxed(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> Result<()> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}
