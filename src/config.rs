//! Level construction settings.
//!
//! The sentinel ids and the tile registry come from the game's tile
//! catalogue; nothing here is derived from the map itself.

use std::collections::HashSet;
use std::path::Path;

use macroquad::prelude::*;
use serde::Deserialize;

use crate::error::MapError;
use crate::geom::Aabb;
use crate::layer::TileId;
use crate::loader::json_loader::{decode_tileset_file, decode_tileset_str};
use crate::ir_map::IrTileset;
use crate::tileset::{TileDef, TileRegistry};

/// Flood-fill cap used when a config does not set one.
pub const DEFAULT_MAX_ROOM_TILES: usize = 10_000;

#[derive(Deserialize)]
struct RawTileDef {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default = "one")]
    frames: u32,
    #[serde(default = "default_true")]
    populate: bool,
    /// `[x, y, w, h]` in tile-local pixels
    #[serde(default)]
    collision: Option<[f32; 4]>,
}

#[derive(Deserialize)]
struct RawLevelConfig {
    tile_size: u32,
    border_tile: u32,
    start_tile: u32,
    #[serde(default)]
    door_tiles: Vec<u32>,
    #[serde(default = "default_max_room_tiles")]
    max_room_tiles: usize,
    #[serde(default)]
    tiles: Vec<RawTileDef>,
}

fn default_true() -> bool {
    true
}
fn one() -> u32 {
    1
}
fn default_max_room_tiles() -> usize {
    DEFAULT_MAX_ROOM_TILES
}

impl RawTileDef {
    fn into_def(self) -> TileDef {
        let name = if self.name.is_empty() {
            format!("tile_{}", self.id)
        } else {
            self.name
        };
        TileDef {
            id: TileId(self.id),
            name,
            frames: self.frames.max(1),
            populate: self.populate,
            collision: self
                .collision
                .map(|[x, y, w, h]| Aabb::from_pos_size(vec2(x, y), vec2(w, h))),
        }
    }
}

/// Everything region extraction and tree construction need besides the
/// grid. All ids are internal (exported gid minus one).
#[derive(Debug, Clone)]
pub struct LevelConfig {
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Wall tile on the Border layer; also marks corners on Midground.
    pub border_tile: TileId,
    /// Where the flood fill begins; the first one in row-major order wins.
    pub start_tile: TileId,
    /// Border-layer tiles reported as doors instead of walls.
    pub door_tiles: HashSet<TileId>,
    /// Flood fills finding more walkable tiles than this abort the load.
    pub max_room_tiles: usize,
    /// Definitions for every tile partition cells may carry.
    pub registry: TileRegistry,
}

impl LevelConfig {
    /// Config with no doors, no tile definitions and the default room cap.
    pub fn new(tile_size: u32, border_tile: TileId, start_tile: TileId) -> Self {
        LevelConfig {
            tile_size,
            border_tile,
            start_tile,
            door_tiles: HashSet::new(),
            max_room_tiles: DEFAULT_MAX_ROOM_TILES,
            registry: TileRegistry::new(),
        }
    }

    /// Adds door tiles.
    pub fn with_doors(mut self, doors: impl IntoIterator<Item = TileId>) -> Self {
        self.door_tiles.extend(doors);
        self
    }

    /// Registers a tile definition.
    pub fn with_tile(mut self, def: TileDef) -> Self {
        self.registry.insert(def);
        self
    }

    #[allow(missing_docs)]
    pub fn with_max_room_tiles(mut self, limit: usize) -> Self {
        self.max_room_tiles = limit;
        self
    }

    #[allow(missing_docs)]
    pub fn is_door(&self, id: TileId) -> bool {
        self.door_tiles.contains(&id)
    }

    /// [`LevelConfig::tile_size`] as a float, for pixel math.
    #[inline]
    pub fn tile_px(&self) -> f32 {
        self.tile_size as f32
    }

    /// Rejects a zero tile size or room cap, and a wall tile that is also
    /// the start tile.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.tile_size == 0 {
            return Err(MapError::InvalidConfig("tile_size must be non-zero".into()));
        }
        if self.border_tile == self.start_tile {
            return Err(MapError::InvalidConfig(format!(
                "border and start tile share id {}",
                self.border_tile.0
            )));
        }
        if self.max_room_tiles == 0 {
            return Err(MapError::InvalidConfig("max_room_tiles must be non-zero".into()));
        }
        Ok(())
    }

    /// Parses a JSON config held in memory.
    pub fn from_json_str(txt: &str) -> Result<Self, MapError> {
        Self::from_json(txt, Path::new("<inline>"))
    }

    /// Loads a JSON config file.
    pub fn load(path: &str) -> Result<Self, MapError> {
        let p = Path::new(path);
        if p.extension().and_then(|e| e.to_str()) != Some("json") {
            return Err(MapError::UnsupportedFormat(path.to_owned()));
        }
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        Self::from_json(&txt, p)
    }

    fn from_json(txt: &str, path: &Path) -> Result<Self, MapError> {
        let raw: RawLevelConfig = serde_json::from_str(txt).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let cfg = LevelConfig {
            tile_size: raw.tile_size,
            border_tile: TileId(raw.border_tile),
            start_tile: TileId(raw.start_tile),
            door_tiles: raw.door_tiles.into_iter().map(TileId).collect(),
            max_room_tiles: raw.max_room_tiles,
            registry: raw.tiles.into_iter().map(RawTileDef::into_def).collect(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds the config from a Tiled tileset export whose tiles are tagged
    /// with the bool properties `border`, `start` and `door`.
    ///
    /// The tile size is the tileset's `tilewidth`; non-square tiles are
    /// rejected.
    pub fn from_tileset(path: &str) -> Result<Self, MapError> {
        Self::from_ir_tileset(&decode_tileset_file(path)?)
    }

    /// [`LevelConfig::from_tileset`] for a tileset held in memory.
    pub fn from_tileset_str(txt: &str) -> Result<Self, MapError> {
        Self::from_ir_tileset(&decode_tileset_str(txt)?)
    }

    fn from_ir_tileset(ts: &IrTileset) -> Result<Self, MapError> {
        if ts.tile_w != ts.tile_h {
            return Err(MapError::InvalidConfig(format!(
                "tiles must be square, got {}x{}",
                ts.tile_w, ts.tile_h
            )));
        }

        let tagged = |prop: &str| -> Vec<TileId> {
            ts.tiles
                .iter()
                .filter(|t| t.properties.get_bool(prop) == Some(true))
                .map(|t| TileId(t.id))
                .collect()
        };
        let single = |prop: &str| -> Result<TileId, MapError> {
            match tagged(prop).as_slice() {
                [id] => Ok(*id),
                [] => Err(MapError::InvalidConfig(format!("no tile tagged '{prop}'"))),
                many => Err(MapError::InvalidConfig(format!(
                    "{} tiles tagged '{prop}', expected one",
                    many.len()
                ))),
            }
        };

        let cfg = LevelConfig {
            tile_size: ts.tile_w,
            border_tile: single("border")?,
            start_tile: single("start")?,
            door_tiles: tagged("door").into_iter().collect(),
            max_room_tiles: DEFAULT_MAX_ROOM_TILES,
            registry: TileDef::from_tileset(ts).into_iter().collect(),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
