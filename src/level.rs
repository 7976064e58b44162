use log::{info, warn};
use macroquad::prelude::*;

use crate::config::LevelConfig;
use crate::error::MapError;
use crate::geom::Aabb;
use crate::grid::TileGrid;
use crate::ir_map::IrMap;
use crate::layer::{Layer, TileCoord};
use crate::loader::json_loader::{decode_map_file_to_ir, decode_map_str};
use crate::region::Region;
use crate::render::{query_visible_rect, LocalView};
use crate::spatial::{Cell, PartitionTree, TileBlock};

/// A loaded level: the tile grid, the room flood-filled from its start tile,
/// and the partition tree over that room.
///
/// The three are built together and replaced together; the tree's cells are
/// a snapshot of the grid at build time.
pub struct Level {
    config: LevelConfig,
    grid: TileGrid,
    region: Region,
    tree: PartitionTree,
}

impl Level {
    /// Loads a Tiled JSON map file.
    pub fn load(path: &str, config: LevelConfig) -> Result<Self, MapError> {
        let ir = decode_map_file_to_ir(path)?;
        Self::from_ir(&ir, config)
    }

    /// Loads a Tiled JSON map from memory.
    pub fn load_from_str(json: &str, config: LevelConfig) -> Result<Self, MapError> {
        let ir = decode_map_str(json)?;
        Self::from_ir(&ir, config)
    }

    /// Builds from an already decoded map. A tile size differing from the
    /// config's is logged and the config wins.
    pub fn from_ir(ir: &IrMap, config: LevelConfig) -> Result<Self, MapError> {
        if ir.tile_w != config.tile_size || ir.tile_h != config.tile_size {
            warn!(
                "map tiles are {}x{}px, building with {}px tiles",
                ir.tile_w, ir.tile_h, config.tile_size
            );
        }
        Self::from_grid(TileGrid::from_ir(ir)?, config)
    }

    /// Finds the start tile, flood fills the room and builds its tree.
    pub fn from_grid(grid: TileGrid, config: LevelConfig) -> Result<Self, MapError> {
        config.validate()?;
        let start = Self::find_start(&grid, &config)?;
        let region = Region::extract(&grid, start, &config)?;
        let tree = PartitionTree::build(&region, &grid, &config)?;

        info!(
            "level built: start {}, {} floor / {} border / {} door tiles, {} cells",
            start,
            region.found().len(),
            region.border().len(),
            region.doors().len(),
            tree.cell_count()
        );

        Ok(Level {
            config,
            grid,
            region,
            tree,
        })
    }

    /// First start tile on the Border layer in row-major order.
    pub fn find_start(grid: &TileGrid, config: &LevelConfig) -> Result<TileCoord, MapError> {
        let mut starts = grid.find_all(Layer::Border, config.start_tile);
        let start = starts.next().ok_or(MapError::MissingStart {
            start_tile: config.start_tile.0,
        })?;
        let extra = starts.count();
        if extra > 0 {
            warn!("{} extra start tiles ignored, using {}", extra, start);
        }
        Ok(start)
    }

    /// Throws away region and tree and builds both again from the grid,
    /// restoring every picked-up block.
    pub fn rebuild(self) -> Result<Self, MapError> {
        Self::from_grid(self.grid, self.config)
    }

    /// Configuration the level was built with.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// The full map, outside the room included.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The flood-filled room.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Partition tree over the room's bounding box.
    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    /// Where the flood fill began.
    pub fn start(&self) -> TileCoord {
        self.region.start()
    }

    /// Cell at a tile coordinate.
    pub fn cell(&self, coord: TileCoord) -> Option<&Cell> {
        self.tree.get_cell(coord)
    }

    /// Cell under a world-space point.
    pub fn cell_at(&self, world: Vec2) -> Option<&Cell> {
        self.tree.get_cell_for_point(world)
    }

    /// Removes the block on `layer` at `coord`; the cell itself stays.
    pub fn pick_up(&mut self, coord: TileCoord, layer: Layer) -> Option<TileBlock> {
        self.tree.get_cell_mut(coord)?.take(layer)
    }

    /// See [`PartitionTree::is_blocked`].
    pub fn is_blocked(&self, b: &Aabb, layer: Layer) -> bool {
        self.tree.is_blocked(b, layer)
    }

    /// Blocks to draw for a viewport, padded by one tile.
    pub fn visible_rect(&self, view_min: Vec2, view_max: Vec2) -> LocalView<'_> {
        query_visible_rect(&self.tree, view_min, view_max)
    }
}
