use crate::geom::Aabb;
use crate::layer::{Gid, Layer, TileCoord, TileId, LAYER_COUNT};
use crate::tileset::{TileDef, TileRegistry};

/// Index of a node in the partition tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// Index of a cell in the partition tree's cell arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) u32);

impl NodeId {
    /// Position in [`crate::PartitionTree::nodes`].
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl CellId {
    /// Position in [`crate::PartitionTree::cells`].
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One layer's content in a cell.
///
/// Holds the tile id rather than the definition; look the definition up in
/// the [`TileRegistry`] the level was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBlock {
    /// Internal id of the tile placed here.
    pub tile: TileId,
    /// Animation frame, starting at 0.
    pub frame: u32,
    /// World-space collision box for tiles that do not fill their cell.
    pub custom_box: Option<Aabb>,
    /// Horizontal flip from the gid.
    pub flip_h: bool,
    /// Vertical flip from the gid.
    pub flip_v: bool,
    /// Anti-diagonal flip from the gid.
    pub flip_d: bool,
}

impl TileBlock {
    pub(crate) fn new(def: &TileDef, gid: Gid, cell_bounds: &Aabb) -> Self {
        TileBlock {
            tile: def.id,
            frame: 0,
            custom_box: def.collision.map(|b| b.translated(cell_bounds.min)),
            flip_h: gid.flip_h(),
            flip_v: gid.flip_v(),
            flip_d: gid.flip_d(),
        }
    }

    /// Definition of [`TileBlock::tile`] in `registry`.
    pub fn def<'r>(&self, registry: &'r TileRegistry) -> Option<&'r TileDef> {
        registry.get(self.tile)
    }

    /// Collision box in world space: the custom box if any, else the cell.
    pub fn collision_box(&self, cell_bounds: &Aabb) -> Aabb {
        self.custom_box.unwrap_or(*cell_bounds)
    }
}

/// Payload of a one-tile leaf: one optional block per layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) coord: TileCoord,
    pub(crate) node: NodeId,
    pub(crate) layers: [Option<TileBlock>; LAYER_COUNT],
}

impl Cell {
    pub(crate) fn new(coord: TileCoord, node: NodeId) -> Self {
        Cell {
            coord,
            node,
            layers: Default::default(),
        }
    }

    /// Tile coordinate of the leaf.
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// The leaf node that owns this cell.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Block on `layer`, if any.
    pub fn get(&self, layer: Layer) -> Option<&TileBlock> {
        self.layers[layer.index()].as_ref()
    }

    /// Mutable block on `layer`, e.g. to advance its frame.
    pub fn get_mut(&mut self, layer: Layer) -> Option<&mut TileBlock> {
        self.layers[layer.index()].as_mut()
    }

    /// Clears one layer slot, e.g. when an item is picked up.
    pub fn take(&mut self, layer: Layer) -> Option<TileBlock> {
        self.layers[layer.index()].take()
    }

    /// True when every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Option::is_none)
    }

    /// Filled slots in layer order.
    pub fn blocks(&self) -> impl Iterator<Item = (Layer, &TileBlock)> {
        Layer::ALL
            .into_iter()
            .zip(self.layers.iter())
            .filter_map(|(layer, slot)| slot.as_ref().map(|b| (layer, b)))
    }
}
