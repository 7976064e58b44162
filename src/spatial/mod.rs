//! Tile partition tree: one-tile leaves under a binary split of the room's
//! bounding box, with a coordinate index over the leaves.

mod cell;
mod index;

pub use cell::{Cell, CellId, NodeId, TileBlock};
pub use index::{ManifoldEntry, Node, NodeKind, PartitionTree, MAX_BUILD_DEPTH, MAX_MANIFOLD_TILES};
