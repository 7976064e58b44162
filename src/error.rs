use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geom::Aabb;
use crate::layer::TileCoord;

/// Everything that can abort loading a level.
///
/// Missing tile definitions are not errors (the slot stays empty) and
/// out-of-range queries return `None`; only unreadable input and broken
/// structural invariants end up here.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// JSON parse error
    #[error("JSON parse error in {}: {source}", .path.display())]
    Json {
        /// File being parsed, `<memory>` for strings.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },

    /// Unsupported file format (non-JSON)
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Map header is unusable: zero or oversized dimensions, or no known
    /// layer at all
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// Level configuration failed validation
    #[error("Invalid level config: {0}")]
    InvalidConfig(String),

    /// A layer's data length does not match width * height
    #[error("Invalid layer size for layer '{0}': data length does not match map dimensions")]
    InvalidLayerSize(String),

    /// The Border layer holds no start tile
    #[error("No start tile (id {start_tile}) found on the Border layer")]
    MissingStart {
        /// Internal id that was searched for.
        start_tile: u32,
    },

    /// Flood fill produced a bounding box with min past max
    #[error("Region bounds inverted: min {min} > max {max}")]
    RegionBoundsInverted {
        /// Top-left corner found.
        min: TileCoord,
        /// Bottom-right corner found.
        max: TileCoord,
    },

    /// The start tile is not walkable
    #[error("Region flood fill from {start} found no walkable tiles")]
    EmptyRegion {
        /// Where the fill began.
        start: TileCoord,
    },

    /// Flood fill ran past [`crate::LevelConfig::max_room_tiles`]
    #[error("Region flood fill from {start} exceeded {limit} tiles")]
    RegionTooLarge {
        /// Where the fill began.
        start: TileCoord,
        /// Configured cap.
        limit: usize,
    },

    /// A partition node box is not a whole number of tiles
    #[error("Partition node {bounds:?} is not a whole number of {tile_size}px tiles")]
    UnalignedNode {
        /// Offending box in pixels.
        bounds: Aabb,
        /// Tile edge in pixels.
        tile_size: u32,
    },

    /// Two leaves claimed the same coordinate
    #[error("Cell {0} registered twice")]
    DuplicateCell(TileCoord),

    /// Subdivision went deeper than [`crate::MAX_BUILD_DEPTH`]
    #[error("Partition depth {depth} exceeds limit {limit} at {bounds:?}")]
    DepthExceeded {
        /// Depth reached.
        depth: usize,
        /// Allowed depth.
        limit: usize,
        /// Box being split.
        bounds: Aabb,
    },
}
