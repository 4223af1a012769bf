//! The view contract of the result display and its map implementation

pub mod host;
pub mod index;
pub mod map_view;
pub mod ready;

use crate::Result;

/// Lifecycle contract every result view implements.
///
/// `init` prepares data and must not block; `show` makes the view visible
/// and finishes any on-screen setup. Row filtering may be requested at any
/// time, before or after either of them.
pub trait View {
    /// Begin data and engine preparation
    fn init(&mut self) -> Result<()>;

    /// Make the view visible and complete its on-screen setup
    fn show(&mut self);

    /// Hide the view; on-screen state is kept for the next `show`
    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    /// Show the rows with the given ids
    fn show_rows(&mut self, row_ids: &[&str]);

    /// Hide the rows with the given ids
    fn hide_rows(&mut self, row_ids: &[&str]);
}
