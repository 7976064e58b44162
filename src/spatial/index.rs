use log::{debug, trace};
use macroquad::prelude::*;
use std::collections::HashMap;

use super::cell::{Cell, CellId, NodeId, TileBlock};
use crate::config::LevelConfig;
use crate::error::MapError;
use crate::geom::Aabb;
use crate::grid::TileGrid;
use crate::layer::{Layer, TileCoord};
use crate::region::Region;

/// Subdivision deeper than this means the input boxes are broken.
pub const MAX_BUILD_DEPTH: usize = 100;

/// Manifold queries spanning more tiles than this are clipped to the tree's
/// extent plus a one-tile ring.
pub const MAX_MANIFOLD_TILES: u64 = 1 << 16;

/// Whether a node splits further or holds a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Two halves of the node's box, top/left first.
    Internal {
        /// Child nodes in the node arena.
        children: [NodeId; 2],
    },
    /// A single tile.
    Leaf {
        /// The tile's payload in the cell arena.
        cell: CellId,
    },
}

/// A tile-aligned box and what it splits into.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Pixel box, always a whole number of tiles on each side.
    pub bounds: Aabb,
    /// Split or leaf.
    pub kind: NodeKind,
}

impl Node {
    /// True for one-tile nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

/// One slot of a manifold query: the coordinate is always present, the
/// cell only when that tile belongs to the tree.
#[derive(Debug, Clone, Copy)]
pub struct ManifoldEntry<'t> {
    /// Tile the query box touches.
    pub coord: TileCoord,
    /// Its cell, `None` outside the room's bounding box.
    pub cell: Option<&'t Cell>,
}

/// Binary subdivision of a region's bounding box down to one-tile leaves.
///
/// Nodes and cells live in two arenas; `cell_dict` indexes the cells by
/// coordinate and always holds exactly one entry per leaf. The only mutation
/// allowed after construction is clearing a cell's layer slot.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    nodes: Vec<Node>,
    cells: Vec<Cell>,
    cell_dict: HashMap<TileCoord, CellId>,
    root: NodeId,
    tile_size: u32,
    depth: usize,
    min_tile: TileCoord,
    max_tile: TileCoord,
}

struct Builder<'a> {
    grid: &'a TileGrid,
    config: &'a LevelConfig,
    ts: f32,
    nodes: Vec<Node>,
    cells: Vec<Cell>,
    cell_dict: HashMap<TileCoord, CellId>,
    depth: usize,
}

impl Builder<'_> {
    /// Whole tile count spanned by `len` pixels.
    fn tiles(&self, len: f32, bounds: &Aabb) -> Result<u32, MapError> {
        let n = len / self.ts;
        if n < 1.0 || n.fract() != 0.0 {
            return Err(MapError::UnalignedNode {
                bounds: *bounds,
                tile_size: self.config.tile_size,
            });
        }
        Ok(n as u32)
    }

    fn build(&mut self, bounds: Aabb, depth: usize) -> Result<NodeId, MapError> {
        if depth > MAX_BUILD_DEPTH {
            return Err(MapError::DepthExceeded {
                depth,
                limit: MAX_BUILD_DEPTH,
                bounds,
            });
        }
        self.depth = self.depth.max(depth);

        let tiles_x = self.tiles(bounds.width(), &bounds)?;
        let tiles_y = self.tiles(bounds.height(), &bounds)?;

        if tiles_x == 1 && tiles_y == 1 {
            return self.leaf(bounds);
        }

        // split the longer side; ties go to y
        let (a, b) = if tiles_x > tiles_y {
            let mid = bounds.min.x + (tiles_x / 2) as f32 * self.ts;
            (
                Aabb::new(bounds.min, vec2(mid, bounds.max.y)),
                Aabb::new(vec2(mid, bounds.min.y), bounds.max),
            )
        } else {
            let mid = bounds.min.y + (tiles_y / 2) as f32 * self.ts;
            (
                Aabb::new(bounds.min, vec2(bounds.max.x, mid)),
                Aabb::new(vec2(bounds.min.x, mid), bounds.max),
            )
        };

        let first = self.build(a, depth + 1)?;
        let second = self.build(b, depth + 1)?;
        Ok(self.push(Node {
            bounds,
            kind: NodeKind::Internal {
                children: [first, second],
            },
        }))
    }

    fn leaf(&mut self, bounds: Aabb) -> Result<NodeId, MapError> {
        let coord = TileCoord::new(
            (bounds.min.x / self.ts).floor() as i32,
            (bounds.min.y / self.ts).floor() as i32,
        );
        let cell_id = CellId(self.cells.len() as u32);
        let node_id = NodeId(self.nodes.len() as u32);

        if self.cell_dict.insert(coord, cell_id).is_some() {
            return Err(MapError::DuplicateCell(coord));
        }

        let mut cell = Cell::new(coord, node_id);
        for layer in Layer::ALL {
            let gid = self.grid.gid(coord, layer);
            let Some(id) = gid.tile() else {
                continue;
            };
            match self.config.registry.populatable(id) {
                Some(def) => cell.layers[layer.index()] = Some(TileBlock::new(def, gid, &bounds)),
                None => trace!("{coord} {layer}: tile {} not populatable, slot left empty", id.0),
            }
        }

        self.cells.push(cell);
        Ok(self.push(Node {
            bounds,
            kind: NodeKind::Leaf { cell: cell_id },
        }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

impl PartitionTree {
    /// Builds the tree over the bounding box of `region`, filling each leaf
    /// from `grid`.
    pub fn build(region: &Region, grid: &TileGrid, config: &LevelConfig) -> Result<Self, MapError> {
        let ts = config.tile_px();
        let min = region.min();
        let root_bounds = Aabb::from_pos_size(
            vec2(min.x as f32 * ts, min.y as f32 * ts),
            vec2(
                region.width_tiles() as f32 * ts,
                region.height_tiles() as f32 * ts,
            ),
        );

        let leaves = region.width_tiles() * region.height_tiles();
        let mut builder = Builder {
            grid,
            config,
            ts,
            nodes: Vec::with_capacity(leaves * 2),
            cells: Vec::with_capacity(leaves),
            cell_dict: HashMap::with_capacity(leaves),
            depth: 0,
        };
        let root = builder.build(root_bounds, 0)?;

        debug!(
            "partition tree: {} nodes, {} cells, depth {}",
            builder.nodes.len(),
            builder.cells.len(),
            builder.depth
        );

        Ok(PartitionTree {
            nodes: builder.nodes,
            cells: builder.cells,
            cell_dict: builder.cell_dict,
            root,
            tile_size: config.tile_size,
            depth: builder.depth,
            min_tile: region.min(),
            max_tile: region.max(),
        })
    }

    #[inline]
    fn ts(&self) -> f32 {
        self.tile_size as f32
    }

    /// Tile edge in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Deepest leaf distance from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Handle of the node spanning the whole room.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Pixel box of the root, i.e. the room's bounding box.
    pub fn bounds(&self) -> Aabb {
        self.nodes[self.root.index()].bounds
    }

    /// Node by handle.
    ///
    /// # Panics
    ///
    /// If `id` came from a different, larger tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node arena, children before parents.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The cell arena, in build order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of leaves, equal to the bounding box area in tiles.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Coordinates with a registered cell, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.cell_dict.keys().copied()
    }

    /// Pixel box of the leaf owning `cell`.
    pub fn cell_bounds(&self, cell: &Cell) -> Aabb {
        self.nodes[cell.node.index()].bounds
    }

    /// Pixel box of the tile at `coord`, whether or not it is in the tree.
    pub fn tile_bounds(&self, coord: TileCoord) -> Aabb {
        let ts = self.ts();
        Aabb::from_pos_size(
            vec2(coord.x as f32 * ts, coord.y as f32 * ts),
            vec2(ts, ts),
        )
    }

    /// Pixel centre of the tile at `coord`.
    pub fn centroid(&self, coord: TileCoord) -> Vec2 {
        let ts = self.ts();
        vec2((coord.x as f32 + 0.5) * ts, (coord.y as f32 + 0.5) * ts)
    }

    /// Dictionary lookup by tile coordinate.
    pub fn get_cell(&self, coord: TileCoord) -> Option<&Cell> {
        self.cell_dict
            .get(&coord)
            .map(|id| &self.cells[id.index()])
    }

    /// Mutable access for clearing slots; the tree shape cannot change.
    pub fn get_cell_mut(&mut self, coord: TileCoord) -> Option<&mut Cell> {
        let id = *self.cell_dict.get(&coord)?;
        Some(&mut self.cells[id.index()])
    }

    /// Descends from the root to the leaf containing `p`.
    ///
    /// # Panics
    ///
    /// If the descent takes more steps than the tree is deep, which only a
    /// corrupted node arena can cause.
    pub fn get_cell_for_point(&self, p: Vec2) -> Option<&Cell> {
        let mut node = &self.nodes[self.root.index()];
        if !node.bounds.contains_point_inclusive(p) {
            return None;
        }

        let cap = self.depth + 1;
        for _ in 0..=cap {
            match node.kind {
                NodeKind::Leaf { cell } => return Some(&self.cells[cell.index()]),
                NodeKind::Internal { children } => {
                    let next = children
                        .iter()
                        .map(|c| &self.nodes[c.index()])
                        .find(|c| c.bounds.contains_point_inclusive(p))?;
                    node = next;
                }
            }
        }

        panic!(
            "point query at {p} did not reach a leaf within {cap} steps; partition tree is corrupt"
        );
    }

    /// Point query at the centroid of `coord`.
    pub fn get_cell_for_pointi(&self, coord: TileCoord) -> Option<&Cell> {
        self.get_cell_for_point(self.centroid(coord))
    }

    /// The cell `(dx, dy)` tiles away from `cell`, if the tree has one there.
    pub fn get_neighbor_cell(&self, cell: &Cell, dx: i32, dy: i32) -> Option<&Cell> {
        self.get_cell_for_pointi(cell.coord.checked_offset(dx, dy)?)
    }

    /// The 3x3 neighbourhood of `cell`, row-major, centre at index 4.
    ///
    /// Without corners the four diagonal slots are always `None`.
    pub fn get_surrounding_cells<'t>(
        &'t self,
        cell: &'t Cell,
        include_corners: bool,
    ) -> [Option<&'t Cell>; 9] {
        let mut out = [None; 9];
        for dy in -1..=1i32 {
            for dx in -1..=1i32 {
                let slot = ((dy + 1) * 3 + (dx + 1)) as usize;
                out[slot] = match (dx, dy) {
                    (0, 0) => Some(cell),
                    _ if dx != 0 && dy != 0 && !include_corners => None,
                    _ => self.get_neighbor_cell(cell, dx, dy),
                };
            }
        }
        out
    }

    /// Every tile whose box inclusively intersects `b`, row-major, with
    /// `None` for tiles that have no cell.
    ///
    /// Boxes covering more than [`MAX_MANIFOLD_TILES`] tiles, or reaching
    /// past the `i32` coordinate range, are first clipped to the tree plus a
    /// one-tile ring, so every cell the box touches is still reported.
    pub fn get_cell_manifold_for_box(&self, b: &Aabb) -> Vec<ManifoldEntry<'_>> {
        let ts = self.ts();
        // float to int casts saturate, NaN becomes 0
        let mut x0 = ((b.min.x / ts).ceil() as i64).saturating_sub(1);
        let mut y0 = ((b.min.y / ts).ceil() as i64).saturating_sub(1);
        let mut x1 = (b.max.x / ts).floor() as i64;
        let mut y1 = (b.max.y / ts).floor() as i64;

        let span = |lo: i64, hi: i64| hi.saturating_sub(lo).saturating_add(1).max(0) as u64;
        let representable = [x0, y0, x1, y1].iter().all(|v| i32::try_from(*v).is_ok());
        if !representable || span(x0, x1).saturating_mul(span(y0, y1)) > MAX_MANIFOLD_TILES {
            trace!("manifold for {b:?} clipped to the tree");
            x0 = x0.max(self.min_tile.x as i64 - 1).max(i32::MIN as i64);
            y0 = y0.max(self.min_tile.y as i64 - 1).max(i32::MIN as i64);
            x1 = x1.min(self.max_tile.x as i64 + 1).min(i32::MAX as i64);
            y1 = y1.min(self.max_tile.y as i64 + 1).min(i32::MAX as i64);
        }
        if x0 > x1 || y0 > y1 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity((span(x0, x1) * span(y0, y1)) as usize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let coord = TileCoord::new(x as i32, y as i32);
                out.push(ManifoldEntry {
                    coord,
                    cell: self.get_cell(coord),
                });
            }
        }
        out
    }

    /// True when a block on `layer` overlaps `b`.
    pub fn is_blocked(&self, b: &Aabb, layer: Layer) -> bool {
        self.get_cell_manifold_for_box(b)
            .into_iter()
            .filter_map(|e| e.cell)
            .any(|cell| {
                cell.get(layer).is_some_and(|block| {
                    block
                        .collision_box(&self.cell_bounds(cell))
                        .intersects_inclusive(b)
                })
            })
    }
}
