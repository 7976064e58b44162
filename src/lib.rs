//! Room extraction and tile partitioning for Tiled JSON levels.
//!
//! A level load normalizes the map's layers into a [`TileGrid`], flood fills
//! the room around the start tile into a [`Region`], and splits the room's
//! bounding box into a [`PartitionTree`] of one-tile cells that renderers and
//! gameplay code query by coordinate, point or box.

#![warn(missing_docs)]

mod config;
mod error;
mod geom;
mod grid;
mod ir_map;
mod layer;
mod level;
mod loader {
    pub mod json_loader;
}
mod region;
pub mod render;
mod spatial;
mod tileset;

pub use config::{LevelConfig, DEFAULT_MAX_ROOM_TILES};
pub use error::MapError;
pub use geom::Aabb;
pub use grid::TileGrid;
pub use ir_map::{IrLayer, IrMap, IrTileMetadata, IrTileset, Properties, PropertyValue};
pub use layer::{Gid, Layer, TileCoord, TileId, LAYER_COUNT};
pub use level::Level;
pub use loader::json_loader::{
    decode_map_file_to_ir, decode_map_str, decode_tileset_file, decode_tileset_str,
};
pub use region::Region;
pub use spatial::{
    Cell, CellId, ManifoldEntry, Node, NodeId, NodeKind, PartitionTree, TileBlock, MAX_BUILD_DEPTH,
    MAX_MANIFOLD_TILES,
};
pub use tileset::{TileDef, TileRegistry};
