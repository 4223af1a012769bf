pub mod base;
pub mod cluster;
pub mod icon;
pub mod macros;
pub mod manager;
pub mod marker;
pub mod popup;
pub mod tile;
