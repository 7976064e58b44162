// src/ir_map.rs
use std::collections::HashMap;

use crate::geom::Aabb;

/// Canonical, format-agnostic map.
#[derive(Debug, Clone)]
pub struct IrMap {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Tile layers in file order, groups flattened.
    pub layers: Vec<IrLayer>,
}

/// One named plane of exported gids, row-major, `width * height` long.
#[derive(Debug, Clone)]
pub struct IrLayer {
    /// Name as written in the map.
    pub name: String,
    /// Raw gids, flip flags included.
    pub data: Vec<u32>,
}

impl IrMap {
    /// First layer named exactly `name`.
    pub fn layer(&self, name: &str) -> Option<&IrLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// A tileset export reduced to what the tile registry needs.
#[derive(Debug, Clone)]
pub struct IrTileset {
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    #[allow(missing_docs)]
    pub tilecount: u32,
    /// Only tiles that carry properties or a collision shape.
    pub tiles: Vec<IrTileMetadata>,
}

/// Extra data attached to one tile of a tileset.
#[derive(Debug, Clone)]
pub struct IrTileMetadata {
    /// Tileset-local, 0-based.
    pub id: u32,
    #[allow(missing_docs)]
    pub properties: Properties,
    /// First rectangle of the tile's object group, tile-local pixels.
    pub collision: Option<Aabb>,
}

/// A Tiled custom property value.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum PropertyValue {
    Bool(bool),
    I64(i64),
    F32(f32),
    String(String),
}

/// Named custom properties of a map, tileset or tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(HashMap<String, PropertyValue>);

#[allow(missing_docs)]
impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, value: PropertyValue) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// `None` when missing or not a bool; likewise for the other getters.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
