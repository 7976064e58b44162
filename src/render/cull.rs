//! Viewport culling over the partition tree.

use crate::geom::Aabb;
use crate::layer::{Layer, TileCoord};
use crate::spatial::{PartitionTree, TileBlock};
use macroquad::prelude::*;

const CULL_MARGIN_TILES: f32 = 1.0;

/// One block to draw: where, on which layer, and what.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'t> {
    /// Tile the block sits on.
    pub coord: TileCoord,
    /// Plane to draw it on.
    pub layer: Layer,
    /// Tile id, frame and flips.
    pub block: &'t TileBlock,
    /// Top-left corner of the tile in world pixels.
    pub dest: Vec2,
}

/// Blocks overlapping a viewport, in draw order: layer first, then rows top
/// to bottom, then columns left to right.
pub struct LocalView<'t> {
    /// Everything to draw, already sorted.
    pub items: Vec<DrawItem<'t>>,
}

/// World-space rectangle seen by `cam`.
pub fn camera_view_rect(cam: &Camera2D) -> Aabb {
    let half_w = 1.0 / cam.zoom.x.abs();
    let half_h = 1.0 / cam.zoom.y.abs();
    Aabb::new(
        cam.target - vec2(half_w, half_h),
        cam.target + vec2(half_w, half_h),
    )
}

/// Blocks visible through `cam`.
pub fn query_visible<'t>(tree: &'t PartitionTree, cam: &Camera2D) -> LocalView<'t> {
    let view = camera_view_rect(cam);
    query_visible_rect(tree, view.min, view.max)
}

/// Blocks overlapping the rectangle spanned by two opposite corners.
pub fn query_visible_rect<'t>(tree: &'t PartitionTree, view_min: Vec2, view_max: Vec2) -> LocalView<'t> {
    //pad by one tile
    let pad = CULL_MARGIN_TILES * tree.tile_size() as f32;
    let query = Aabb::new(
        view_min.min(view_max) - vec2(pad, pad),
        view_min.max(view_max) + vec2(pad, pad),
    );

    let mut items = Vec::new();
    for entry in tree.get_cell_manifold_for_box(&query) {
        let Some(cell) = entry.cell else {
            continue;
        };
        let dest = tree.cell_bounds(cell).min;
        for (layer, block) in cell.blocks() {
            items.push(DrawItem {
                coord: entry.coord,
                layer,
                block,
                dest,
            });
        }
    }
    items.sort_by_key(|i| (i.layer, i.coord.y, i.coord.x));

    LocalView { items }
}
