use std::fmt;

/// The fixed set of tile planes, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Walls, doors and the start tile; drives the flood fill.
    Border,
    /// Floor and backdrop, drawn first.
    Background,
    /// Solid scenery; also carries the corner pieces of the wall ring.
    Midground,
    /// Pick-ups and other removable blocks.
    Objects,
    /// Drawn over everything else.
    Foreground,
}

/// Number of [`Layer`] planes.
pub const LAYER_COUNT: usize = 5;

impl Layer {
    /// Every layer in draw order.
    pub const ALL: [Layer; LAYER_COUNT] = [
        Layer::Border,
        Layer::Background,
        Layer::Midground,
        Layer::Objects,
        Layer::Foreground,
    ];

    /// Slot of this layer in per-cell and per-grid storage.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical Tiled layer name.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Border => "Border",
            Layer::Background => "Background",
            Layer::Midground => "Midground",
            Layer::Objects => "Objects",
            Layer::Foreground => "Foreground",
        }
    }

    /// Matches a Tiled layer name, ignoring case.
    pub fn from_name(name: &str) -> Option<Layer> {
        Layer::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal flip flag.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Anti-diagonal flip flag.
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// Strips the flip flags off a raw gid.
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// A gid exactly as exported by Tiled: `0` is empty, anything else is the
/// internal tile id plus one, possibly carrying flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gid(pub u32);

impl Gid {
    /// No tile.
    pub const EMPTY: Gid = Gid(0);

    /// Value as stored in the map, flags included.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// Value with the flip flags masked off.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// Flipped horizontally.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Flipped vertically.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Flipped along the anti-diagonal.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    /// True when no tile is placed, whatever the flags say.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.clean() == 0
    }

    /// Internal 0-based id, `None` for the empty gid.
    #[inline]
    pub fn tile(self) -> Option<TileId> {
        match self.clean() {
            0 => None,
            g => Some(TileId(g - 1)),
        }
    }
}

/// Internal 0-based tile id, as used by the tile registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    /// The gid Tiled would export for this tile.
    pub fn to_gid(self) -> Gid {
        Gid(self.0 + 1)
    }
}

/// Integer position in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TileCoord {
    /// Column.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl TileCoord {
    /// Coordinate at column `x`, row `y`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifted by `(dx, dy)`, wrapping at the `i32` range.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Shifted by `(dx, dy)`, or `None` if either axis leaves the `i32` range.
    #[inline]
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// The four axis neighbours: right, left, down, up.
    pub fn neighbors4(self) -> [TileCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
