use std::collections::HashMap;

use crate::geom::Aabb;
use crate::ir_map::IrTileset;
use crate::layer::TileId;

/// Shared definition of one tile id.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDef {
    #[allow(missing_docs)]
    pub id: TileId,
    /// Human-readable label, e.g. `"coin"`.
    pub name: String,
    /// Animation frame count, at least 1.
    pub frames: u32,
    /// Whether partition cells get a block for this tile.
    pub populate: bool,
    /// Irregular collision shape in tile-local pixels.
    pub collision: Option<Aabb>,
}

impl TileDef {
    /// One-frame, populatable, full-cell definition.
    pub fn new(id: TileId, name: impl Into<String>) -> Self {
        TileDef {
            id,
            name: name.into(),
            frames: 1,
            populate: true,
            collision: None,
        }
    }

    /// Tile definitions for every id of a decoded tileset.
    ///
    /// Properties read per tile: `name` (string), `frames` (int) and
    /// `populate` (bool, default true).
    pub fn from_tileset(ts: &IrTileset) -> Vec<TileDef> {
        let mut defs: Vec<TileDef> = (0..ts.tilecount)
            .map(|id| TileDef::new(TileId(id), format!("tile_{id}")))
            .collect();

        for meta in &ts.tiles {
            let Some(def) = defs.get_mut(meta.id as usize) else {
                continue;
            };
            if let Some(name) = meta.properties.get_string("name") {
                def.name = name.to_owned();
            }
            if let Some(frames) = meta.properties.get_i64("frames") {
                def.frames = frames.clamp(1, u32::MAX as i64) as u32;
            }
            if let Some(populate) = meta.properties.get_bool("populate") {
                def.populate = populate;
            }
            def.collision = meta.collision;
        }

        defs
    }
}

/// Lookup from tile id to its definition.
///
/// Partition cells refer to definitions by [`TileId`]; the registry outlives
/// any level built from it.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    defs: HashMap<TileId, TileDef>,
}

impl TileRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, def: TileDef) {
        self.defs.insert(def.id, def);
    }

    /// Definition for `id`, populatable or not.
    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.defs.get(&id)
    }

    /// The definition for `id` if cells should carry it.
    pub fn populatable(&self, id: TileId) -> Option<&TileDef> {
        self.get(id).filter(|d| d.populate)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TileDef> {
        self.defs.values()
    }
}

impl FromIterator<TileDef> for TileRegistry {
    fn from_iter<I: IntoIterator<Item = TileDef>>(iter: I) -> Self {
        let mut reg = TileRegistry::new();
        for def in iter {
            reg.insert(def);
        }
        reg
    }
}
