// Loads a level and prints what the flood fill and partition tree found.
//
//   room_info <map.json> <config.json>
//   room_info <map.json> --tileset <tileset.json>

use anyhow::{bail, Context};
use macroquad_tiled_room::{Layer, Level, LevelConfig};

fn usage() -> ! {
    eprintln!("usage: room_info <map.json> (<config.json> | --tileset <tileset.json>)");
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (map_path, config) = match args.as_slice() {
        [map, flag, tileset] if flag == "--tileset" => (
            map,
            LevelConfig::from_tileset(tileset)
                .with_context(|| format!("Reading tileset {}", tileset))?,
        ),
        [map, config] if !config.starts_with("--") => (
            map,
            LevelConfig::load(config).with_context(|| format!("Reading config {}", config))?,
        ),
        _ => usage(),
    };

    let level = Level::load(map_path, config).with_context(|| format!("Loading level {}", map_path))?;
    let region = level.region();
    let tree = level.tree();

    if tree.cell_count() != region.width_tiles() * region.height_tiles() {
        bail!(
            "partition tree has {} cells for a {}x{} room",
            tree.cell_count(),
            region.width_tiles(),
            region.height_tiles()
        );
    }

    println!("start      {}", region.start());
    println!("bounds     {} .. {}", region.min(), region.max());
    println!("size       {}x{} tiles", region.width_tiles(), region.height_tiles());
    println!("floor      {}", region.found().len());
    println!("border     {}", region.border().len());
    println!("doors      {}", region.doors().len());
    println!("tree       {} nodes, depth {}", tree.nodes().len(), tree.depth());

    for layer in Layer::ALL {
        let filled = tree.cells().iter().filter(|c| c.get(layer).is_some()).count();
        println!("{:<10} {} blocks", layer.name(), filled);
    }

    let mut doors: Vec<_> = region.doors().iter().copied().collect();
    doors.sort();
    for door in doors {
        println!("door       {}", door);
    }

    Ok(())
}
