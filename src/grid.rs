use log::{debug, warn};

use crate::error::MapError;
use crate::ir_map::IrMap;
use crate::layer::{Gid, Layer, TileCoord, TileId, LAYER_COUNT};

/// Dense `[row][col][layer]` array of exported gids.
///
/// Built once from an [`IrMap`] and never edited afterwards: the region and
/// partition tree are snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Gid>,
}

impl TileGrid {
    /// An all-empty grid.
    ///
    /// # Panics
    ///
    /// If `width * height * LAYER_COUNT` overflows `usize`. Maps read from
    /// disk go through [`TileGrid::from_ir`], which reports that as an error.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Gid::EMPTY; width * height * LAYER_COUNT],
        }
    }

    /// Normalizes the named flat layers of `ir` into the grid.
    ///
    /// Layers whose name is not one of [`Layer::ALL`] are ignored; missing
    /// layers stay empty, but at least one known layer must be present.
    /// Every layer is checked against the header before anything is
    /// allocated.
    pub fn from_ir(ir: &IrMap) -> Result<Self, MapError> {
        if ir.width == 0 || ir.height == 0 {
            return Err(MapError::InvalidMap(format!(
                "map dimensions must be non-zero, got {}x{}",
                ir.width, ir.height
            )));
        }
        if i32::try_from(ir.width).is_err() || i32::try_from(ir.height).is_err() {
            return Err(MapError::InvalidMap(format!(
                "map dimensions {}x{} exceed the tile coordinate range",
                ir.width, ir.height
            )));
        }
        let too_large = || {
            MapError::InvalidMap(format!("map of {}x{} tiles is too large", ir.width, ir.height))
        };
        let expected = ir.width.checked_mul(ir.height).ok_or_else(too_large)?;
        expected.checked_mul(LAYER_COUNT).ok_or_else(too_large)?;

        let mut known = Vec::with_capacity(ir.layers.len());
        for layer in &ir.layers {
            let Some(lz) = Layer::from_name(&layer.name) else {
                debug!("ignoring layer '{}'", layer.name);
                continue;
            };
            if layer.data.len() != expected {
                return Err(MapError::InvalidLayerSize(layer.name.clone()));
            }
            known.push((lz, layer));
        }
        if known.is_empty() {
            return Err(MapError::InvalidMap(format!(
                "none of the layers {} is present",
                Layer::ALL.map(Layer::name).join(", ")
            )));
        }

        let mut grid = TileGrid::new(ir.width, ir.height);
        let mut seen = [false; LAYER_COUNT];
        for (lz, layer) in known {
            if seen[lz.index()] {
                warn!("layer '{}' appears twice, later one wins", layer.name);
            }
            seen[lz.index()] = true;

            for (idx, gid) in layer.data.iter().enumerate() {
                let col = idx % ir.width;
                let row = idx / ir.width;
                let slot = grid.slot(col, row, lz);
                grid.tiles[slot] = Gid(*gid);
            }
        }

        Ok(grid)
    }

    #[inline]
    fn slot(&self, col: usize, row: usize, layer: Layer) -> usize {
        (row * self.width + col) * LAYER_COUNT + layer.index()
    }

    /// Columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when `coord` names a tile of the grid.
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Raw gid at `coord`, [`Gid::EMPTY`] outside the grid.
    pub fn gid(&self, coord: TileCoord, layer: Layer) -> Gid {
        if !self.contains(coord) {
            return Gid::EMPTY;
        }
        self.tiles[self.slot(coord.x as usize, coord.y as usize, layer)]
    }

    /// Internal tile id at `coord`, `None` for empty or out-of-range.
    #[inline]
    pub fn get(&self, coord: TileCoord, layer: Layer) -> Option<TileId> {
        self.gid(coord, layer).tile()
    }

    /// Writes a tile while assembling a grid in code.
    pub fn set(&mut self, coord: TileCoord, layer: Layer, tile: Option<TileId>) {
        if !self.contains(coord) {
            return;
        }
        let slot = self.slot(coord.x as usize, coord.y as usize, layer);
        self.tiles[slot] = tile.map(TileId::to_gid).unwrap_or(Gid::EMPTY);
    }

    /// Every coordinate holding `tile` on `layer`, in row-major order.
    pub fn find_all(&self, layer: Layer, tile: TileId) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).filter_map(move |col| {
                let coord = TileCoord::new(col as i32, row as i32);
                (self.get(coord, layer) == Some(tile)).then_some(coord)
            })
        })
    }
}
