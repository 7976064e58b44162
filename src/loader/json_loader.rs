// src/loader/json_loader.rs
use crate::error::MapError;
use crate::geom::Aabb;
use crate::ir_map::*;
use macroquad::prelude::*;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
    #[serde(default)]
    layers: Vec<JsonLayer>, // children of a "group" layer
}

#[derive(Deserialize)]
struct JsonMap {
    width: usize,
    height: usize,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    ellipse: bool,
    #[serde(default)]
    polygon: Vec<JsonValue>,
    #[serde(default)]
    polyline: Vec<JsonValue>,
}

impl JsonObject {
    fn is_rectangle(&self) -> bool {
        !self.point && !self.ellipse && self.polygon.is_empty() && self.polyline.is_empty()
    }
}

#[derive(Deserialize, Default)]
struct JsonObjectGroup {
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    objectgroup: JsonObjectGroup,
}

const INLINE_SOURCE: &str = "<inline>";

fn json_property_to_ir(prop: JsonProperty) -> Option<(String, PropertyValue)> {
    let JsonProperty { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") | Some("object") => value.as_i64().map(PropertyValue::I64),
        Some("float") => value.as_f64().map(|n| PropertyValue::F32(n as f32)),
        Some("string") | Some("file") | Some("color") => {
            value.as_str().map(|s| PropertyValue::String(s.to_owned()))
        }
        // class-typed and future property kinds carry nothing the registry reads
        Some(_) => None,
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::I64(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::F32(v as f32))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    parsed.map(|value| (name, value))
}

fn properties_from_json(props: Vec<JsonProperty>) -> Properties {
    let mut out = Properties::new();
    for p in props {
        if let Some((name, value)) = json_property_to_ir(p) {
            out.insert(name, value);
        }
    }
    out
}

fn flatten_tile_layers(layers: Vec<JsonLayer>, out: &mut Vec<IrLayer>) {
    for l in layers {
        match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => out.push(IrLayer {
                name: l.name,
                data: l.data,
            }),
            "group" => flatten_tile_layers(l.layers, out),
            _ => {}
        }
    }
}

fn read_json_file(path: &str) -> Result<(String, PathBuf), MapError> {
    let p = Path::new(path);
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.to_owned()));
    }

    let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    Ok((txt, p.to_path_buf()))
}

fn map_from_json(txt: &str, path: &Path) -> Result<IrMap, MapError> {
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut layers = Vec::with_capacity(j.layers.len());
    flatten_tile_layers(j.layers, &mut layers);

    Ok(IrMap {
        width: j.width,
        height: j.height,
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        layers,
    })
}

fn tileset_from_json(txt: &str, path: &Path) -> Result<IrTileset, MapError> {
    let ext: ExternalTileset = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tiles = ext
        .tiles
        .into_iter()
        .map(|tile| {
            // first plain rectangle in the tile's collision editor wins
            let collision = tile
                .objectgroup
                .objects
                .iter()
                .find(|o| o.is_rectangle() && o.width > 0.0 && o.height > 0.0)
                .map(|o| Aabb::from_pos_size(vec2(o.x, o.y), vec2(o.width, o.height)));
            IrTileMetadata {
                id: tile.id,
                properties: properties_from_json(tile.properties),
                collision,
            }
        })
        .collect();

    Ok(IrTileset {
        tile_w: ext.tilewidth,
        tile_h: ext.tileheight,
        tilecount: ext.tilecount,
        tiles,
    })
}

/// Decodes a Tiled JSON map export held in memory.
pub fn decode_map_str(txt: &str) -> Result<IrMap, MapError> {
    map_from_json(txt, Path::new(INLINE_SOURCE))
}

/// Reads and decodes a `.json` map file.
pub fn decode_map_file_to_ir(path: &str) -> Result<IrMap, MapError> {
    let (txt, p) = read_json_file(path)?;
    map_from_json(&txt, &p)
}

/// Decodes a Tiled JSON tileset export held in memory.
pub fn decode_tileset_str(txt: &str) -> Result<IrTileset, MapError> {
    tileset_from_json(txt, Path::new(INLINE_SOURCE))
}

/// Reads and decodes a `.json` tileset file.
pub fn decode_tileset_file(path: &str) -> Result<IrTileset, MapError> {
    let (txt, p) = read_json_file(path)?;
    tileset_from_json(&txt, &p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_tile_layers_and_flattens_groups() {
        let map_json = r#"{
          "width": 2,
          "height": 1,
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [
            {"type":"tilelayer","name":"Border","width":2,"height":1,"data":[1,0]},
            {"type":"objectgroup","name":"spawns","objects":[]},
            {"type":"group","name":"deco","layers":[
              {"type":"tilelayer","name":"Foreground","data":[0,3]}
            ]}
          ]
        }"#;

        let ir = decode_map_str(map_json).expect("decode");
        assert_eq!((ir.width, ir.height, ir.tile_w), (2, 1, 16));
        assert_eq!(ir.layers.len(), 2);
        assert_eq!(ir.layer("Border").unwrap().data, vec![1, 0]);
        assert_eq!(ir.layer("Foreground").unwrap().data, vec![0, 3]);
    }

    #[test]
    fn parses_tileset_properties_and_collision() {
        let tileset_json = r#"{
          "tilewidth":16,
          "tileheight":16,
          "tilecount":4,
          "columns":2,
          "image":"tiles.png",
          "tiles":[
            {
              "id":0,
              "properties":[
                {"name":"border","type":"bool","value":true},
                {"name":"frames","type":"int","value":3},
                {"name":"label","type":"string","value":"wall"},
                {"name":"style","type":"class","value":{}}
              ],
              "objectgroup":{
                "objects":[
                  {"id":1,"x":0,"y":0,"point":true},
                  {"id":2,"x":2,"y":4,"width":12,"height":8}
                ]
              }
            },
            {"id":3}
          ]
        }"#;

        let ts = decode_tileset_str(tileset_json).expect("decode");
        assert_eq!(ts.tilecount, 4);
        assert_eq!(ts.tiles.len(), 2);

        let wall = &ts.tiles[0];
        assert_eq!(wall.properties.get_bool("border"), Some(true));
        assert_eq!(wall.properties.get_i64("frames"), Some(3));
        assert_eq!(wall.properties.get_string("label"), Some("wall"));
        assert!(wall.properties.get("style").is_none());
        assert_eq!(
            wall.collision,
            Some(Aabb::new(vec2(2.0, 4.0), vec2(14.0, 12.0)))
        );
        assert!(ts.tiles[1].properties.is_empty());
        assert!(ts.tiles[1].collision.is_none());
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = dir.path().join("map.json");
        fs::write(&map_path, "{ not json").expect("failed to write map");

        let err = decode_map_file_to_ir(map_path.to_str().expect("path utf8"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = dir.path().join("missing.json");

        let err = decode_map_file_to_ir(map_path.to_str().expect("path utf8"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn rejects_non_json_extension() {
        let err = decode_tileset_file("tiles.tsx").err().expect("expected error");
        assert!(matches!(err, MapError::UnsupportedFormat(p) if p == "tiles.tsx"));
    }
}
