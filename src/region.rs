//! Flood-fill room extraction.
//!
//! Walks the Border layer outward from the start tile with an explicit
//! stack, sorting every reachable tile into walkable interior, border or
//! door. Work is bounded by the grid size and by
//! [`LevelConfig::max_room_tiles`].

use std::collections::HashSet;

use log::debug;

use crate::config::LevelConfig;
use crate::error::MapError;
use crate::grid::TileGrid;
use crate::layer::{Layer, TileCoord};

/// The connected room reachable from the start tile.
///
/// Built once per level load and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    start: TileCoord,
    min: TileCoord,
    max: TileCoord,
    found: HashSet<TileCoord>,
    border: HashSet<TileCoord>,
    doors: HashSet<TileCoord>,
    width_tiles: usize,
    height_tiles: usize,
}

impl Region {
    /// Flood fills `grid` from `start`.
    ///
    /// Neighbours outside the grid are skipped individually; the fill keeps
    /// going from every other frontier tile.
    pub fn extract(grid: &TileGrid, start: TileCoord, config: &LevelConfig) -> Result<Self, MapError> {
        let mut found = HashSet::new();
        let mut border = HashSet::new();
        let mut doors = HashSet::new();
        let mut min = TileCoord::new(i32::MAX, i32::MAX);
        let mut max = TileCoord::new(i32::MIN, i32::MIN);

        let mut stack = vec![start];
        while let Some(coord) = stack.pop() {
            if !grid.contains(coord) || found.contains(&coord) {
                continue;
            }

            let tile = grid.get(coord, Layer::Border);
            if tile == Some(config.border_tile) {
                if border.insert(coord) {
                    // corner tiles are never reached by the 4-way walk; pick
                    // them up from the Midground plane next to the border
                    for n in coord.neighbors4() {
                        if grid.get(n, Layer::Midground) == Some(config.border_tile) {
                            border.insert(n);
                        }
                    }
                }
            } else if tile.is_some_and(|t| config.is_door(t)) {
                if !border.contains(&coord) {
                    doors.insert(coord);
                }
            } else {
                found.insert(coord);
                if found.len() > config.max_room_tiles {
                    return Err(MapError::RegionTooLarge {
                        start,
                        limit: config.max_room_tiles,
                    });
                }
                min = TileCoord::new(min.x.min(coord.x), min.y.min(coord.y));
                max = TileCoord::new(max.x.max(coord.x), max.y.max(coord.y));
                stack.extend(coord.neighbors4());
            }
        }

        let mut region = Region {
            start,
            min,
            max,
            found,
            border,
            doors,
            width_tiles: 0,
            height_tiles: 0,
        };
        region.validate(config)?;
        region.width_tiles = (region.max.x - region.min.x + 1) as usize;
        region.height_tiles = (region.max.y - region.min.y + 1) as usize;

        debug!(
            "region from {}: {} floor, {} border, {} doors, {}x{} tiles",
            start,
            region.found.len(),
            region.border.len(),
            region.doors.len(),
            region.width_tiles,
            region.height_tiles
        );
        Ok(region)
    }

    fn validate(&self, config: &LevelConfig) -> Result<(), MapError> {
        if self.found.is_empty() {
            return Err(MapError::EmptyRegion { start: self.start });
        }
        if self.found.len() > config.max_room_tiles {
            return Err(MapError::RegionTooLarge {
                start: self.start,
                limit: config.max_room_tiles,
            });
        }
        if self.min.x > self.max.x || self.min.y > self.max.y {
            return Err(MapError::RegionBoundsInverted {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Tile the fill began from.
    pub fn start(&self) -> TileCoord {
        self.start
    }

    /// Top-left corner of the tight bounding box of [`Region::found`].
    pub fn min(&self) -> TileCoord {
        self.min
    }

    /// Bottom-right corner of the same box, inclusive.
    pub fn max(&self) -> TileCoord {
        self.max
    }

    /// Walkable interior tiles.
    pub fn found(&self) -> &HashSet<TileCoord> {
        &self.found
    }

    /// Wall tiles touching the room, corners included.
    pub fn border(&self) -> &HashSet<TileCoord> {
        &self.border
    }

    /// Door tiles in the wall, not counted as border.
    pub fn doors(&self) -> &HashSet<TileCoord> {
        &self.doors
    }

    /// Bounding box width in tiles.
    pub fn width_tiles(&self) -> usize {
        self.width_tiles
    }

    /// Bounding box height in tiles.
    pub fn height_tiles(&self) -> usize {
        self.height_tiles
    }

    /// True for walkable interior tiles.
    pub fn is_floor(&self, coord: TileCoord) -> bool {
        self.found.contains(&coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::TileId;

    const WALL: TileId = TileId(0);
    const START: TileId = TileId(1);
    const DOOR: TileId = TileId(2);

    fn config() -> LevelConfig {
        LevelConfig::new(16, WALL, START).with_doors([DOOR])
    }

    /// `w`x`h` interior at (1, 1) inside a one-tile wall ring, drawn on both
    /// the Border and Midground planes.
    fn walled_room(w: usize, h: usize) -> TileGrid {
        let mut grid = TileGrid::new(w + 2, h + 2);
        for y in 0..h + 2 {
            for x in 0..w + 2 {
                if x == 0 || y == 0 || x == w + 1 || y == h + 1 {
                    let c = TileCoord::new(x as i32, y as i32);
                    grid.set(c, Layer::Border, Some(WALL));
                    grid.set(c, Layer::Midground, Some(WALL));
                }
            }
        }
        grid
    }

    #[test]
    fn three_by_three_room_in_five_by_five_ring() {
        let mut grid = walled_room(3, 3);
        grid.set(TileCoord::new(2, 2), Layer::Border, Some(START));

        let region = Region::extract(&grid, TileCoord::new(2, 2), &config()).unwrap();
        assert_eq!(region.found().len(), 9);
        assert_eq!(region.border().len(), 16);
        assert_eq!(region.doors().len(), 0);
        assert_eq!(region.width_tiles(), 3);
        assert_eq!(region.height_tiles(), 3);
        assert_eq!(region.min(), TileCoord::new(1, 1));
        assert_eq!(region.max(), TileCoord::new(3, 3));
    }

    #[test]
    fn rectangular_rooms_from_any_start() {
        for (w, h) in [(1, 1), (4, 2), (2, 7), (6, 5)] {
            let grid = walled_room(w, h);
            for sy in 1..=h {
                for sx in 1..=w {
                    let start = TileCoord::new(sx as i32, sy as i32);
                    let region = Region::extract(&grid, start, &config()).unwrap();
                    assert_eq!(region.found().len(), w * h);
                    assert_eq!(region.width_tiles(), w);
                    assert_eq!(region.height_tiles(), h);
                    assert_eq!(region.border().len(), 2 * (w + 2) + 2 * h);
                    assert!(region.doors().is_empty());
                }
            }
        }
    }

    #[test]
    fn corners_need_the_midground_border() {
        let mut grid = TileGrid::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                if x == 0 || y == 0 || x == 4 || y == 4 {
                    grid.set(TileCoord::new(x, y), Layer::Border, Some(WALL));
                }
            }
        }
        let region = Region::extract(&grid, TileCoord::new(2, 2), &config()).unwrap();
        // only the 12 edge tiles are reachable without the Midground check
        assert_eq!(region.border().len(), 12);
        assert!(!region.border().contains(&TileCoord::new(0, 0)));
    }

    #[test]
    fn doors_are_classified_and_stop_the_fill() {
        let mut grid = walled_room(3, 3);
        grid.set(TileCoord::new(4, 2), Layer::Border, Some(DOOR));
        grid.set(TileCoord::new(4, 2), Layer::Midground, None);
        grid.set(TileCoord::new(2, 2), Layer::Border, Some(DOOR));

        let region = Region::extract(&grid, TileCoord::new(1, 1), &config()).unwrap();
        assert_eq!(region.found().len(), 8);
        assert_eq!(region.doors().len(), 2);
        assert!(region.doors().contains(&TileCoord::new(4, 2)));
        assert!(!region.border().contains(&TileCoord::new(4, 2)));
        assert!(!region.is_floor(TileCoord::new(2, 2)));
    }

    #[test]
    fn open_edges_are_skipped_not_fatal() {
        // no walls at all: the fill runs into the grid edge on every side
        let grid = TileGrid::new(4, 3);
        let region = Region::extract(&grid, TileCoord::new(0, 0), &config()).unwrap();
        assert_eq!(region.found().len(), 12);
        assert_eq!(region.width_tiles(), 4);
        assert_eq!(region.height_tiles(), 3);
        assert!(region.border().is_empty());
    }

    #[test]
    fn start_on_a_wall_is_an_empty_region() {
        let grid = walled_room(2, 2);
        let err = Region::extract(&grid, TileCoord::new(0, 0), &config()).unwrap_err();
        assert!(matches!(err, MapError::EmptyRegion { .. }));
    }

    #[test]
    fn start_outside_the_grid_is_an_empty_region() {
        let grid = walled_room(2, 2);
        let err = Region::extract(&grid, TileCoord::new(-3, 1), &config()).unwrap_err();
        assert!(matches!(err, MapError::EmptyRegion { .. }));
    }

    #[test]
    fn oversized_room_aborts() {
        let grid = walled_room(10, 10);
        let cfg = config().with_max_room_tiles(50);
        let err = Region::extract(&grid, TileCoord::new(1, 1), &cfg).unwrap_err();
        assert!(matches!(err, MapError::RegionTooLarge { limit: 50, .. }));
    }

    #[test]
    fn extraction_is_repeatable() {
        let mut grid = walled_room(5, 4);
        grid.set(TileCoord::new(0, 3), Layer::Border, Some(DOOR));
        let a = Region::extract(&grid, TileCoord::new(3, 3), &config()).unwrap();
        let b = Region::extract(&grid, TileCoord::new(3, 3), &config()).unwrap();
        assert_eq!(a, b);
    }
}
