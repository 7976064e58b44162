//! What the renderer needs from a built level. Nothing here draws.

pub mod cull;

pub use cull::{camera_view_rect, query_visible, query_visible_rect, DrawItem, LocalView};
