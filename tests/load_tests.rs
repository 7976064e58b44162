// tests/load_tests.rs

use std::fs;

use macroquad_tiled_room::{Level, LevelConfig, MapError, TileId};

const MAP_JSON: &str = r#"
{
    "width": 3,
    "height": 1,
    "tilewidth": 8,
    "tileheight": 8,
    "layers": [
        { "name": "Border", "data": [0, 2, 0] },
        { "name": "Objects", "data": [0, 0, 4] }
    ]
}
"#;

const CONFIG_JSON: &str = r#"
{
    "tile_size": 8,
    "border_tile": 0,
    "start_tile": 1,
    "tiles": [ { "id": 3, "name": "key" } ]
}
"#;

#[test]
fn integration_load_map_and_config_from_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let map_path = dir.path().join("room.json");
    let config_path = dir.path().join("tiles.json");
    fs::write(&map_path, MAP_JSON)?;
    fs::write(&config_path, CONFIG_JSON)?;

    let config = LevelConfig::load(config_path.to_str().expect("utf8"))?;
    let level = Level::load(map_path.to_str().expect("utf8"), config)?;

    assert_eq!(level.region().found().len(), 3);
    assert_eq!(level.tree().tile_size(), 8);
    let key = level
        .tree()
        .cells()
        .iter()
        .find_map(|c| c.get(macroquad_tiled_room::Layer::Objects))
        .expect("key block");
    assert_eq!(key.tile, TileId(3));
    assert_eq!(
        key.def(&level.config().registry).map(|d| d.name.as_str()),
        Some("key")
    );
    Ok(())
}

#[test]
fn integration_load_with_tileset_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let ts_path = dir.path().join("tiles.json");
    fs::write(
        &ts_path,
        r#"{
          "tilewidth": 8, "tileheight": 8, "tilecount": 4,
          "tiles": [
            {"id": 0, "properties": [{"name":"border","type":"bool","value":true}]},
            {"id": 1, "properties": [{"name":"start","type":"bool","value":true}]}
          ]
        }"#,
    )?;

    let config = LevelConfig::from_tileset(ts_path.to_str().expect("utf8"))?;
    let level = Level::load_from_str(MAP_JSON, config)?;
    assert_eq!(level.start().x, 1);
    Ok(())
}

#[test]
fn integration_unsupported_format() {
    let config = LevelConfig::from_json_str(CONFIG_JSON).expect("config");
    let err = Level::load("foo.tmx", config).err().expect("tmx is not supported");
    match err {
        MapError::UnsupportedFormat(ext) => assert_eq!(ext, "foo.tmx"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn integration_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nonexistent.json");
    let config = LevelConfig::from_json_str(CONFIG_JSON).expect("config");
    let err = Level::load(path.to_str().expect("utf8"), config).err().expect("missing");
    assert!(matches!(err, MapError::Io { .. }));
}

#[test]
fn integration_malformed_config() {
    let err = LevelConfig::from_json_str("{ \"tile_size\": ").unwrap_err();
    assert!(matches!(err, MapError::Json { .. }));
}
