//! Marquee drag-selection and the stamp it produces.
//!
//! The same state machine drives both pick sites: selecting source tiles on
//! the atlas pane and re-selecting already painted tiles on the map pane.
//! Only the stamp construction differs, so it is parameterized by the data
//! source ([`Stamp::from_atlas_region`] / [`Stamp::from_layer_region`]).

use crate::grid::TileLayer;
use crate::view::{GridPoint, BASE_TILE_SIZE};
use macroquad::prelude::*;

/// Axis-aligned selection bounds in world pixels. Always covers at least one
/// full tile; edges are grid-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SelectionBounds {
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// A completed drag: final bounds plus the tile the drag started on, which
/// anchors every stamp offset.
#[derive(Debug, Clone, Copy)]
pub struct MarqueeRegion {
    pub bounds: SelectionBounds,
    pub start_tile: GridPoint,
}

/// Drag-selection state machine: Idle -> Selecting -> Idle. Feed it one
/// grid-snapped pointer sample per tick; it emits the completed region
/// exactly once, on release.
pub struct Marquee {
    selecting: bool,
    start: GridPoint,
    end: GridPoint,
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new()
    }
}

impl Marquee {
    pub fn new() -> Self {
        Marquee {
            selecting: false,
            start: GridPoint { x: 0, y: 0 },
            end: GridPoint { x: 0, y: 0 },
        }
    }

    #[inline]
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// One pointer sample. While `pressed` the drag begins or continues; the
    /// first released sample after a drag completes it.
    pub fn update(&mut self, snapped: GridPoint, pressed: bool) -> Option<MarqueeRegion> {
        if pressed {
            if !self.selecting {
                self.selecting = true;
                self.start = snapped;
            }
            self.end = snapped;
            None
        } else if self.selecting {
            self.selecting = false;
            Some(MarqueeRegion {
                bounds: self.bounds(),
                start_tile: GridPoint {
                    x: self.start.x.div_euclid(BASE_TILE_SIZE as i32),
                    y: self.start.y.div_euclid(BASE_TILE_SIZE as i32),
                },
            })
        } else {
            None
        }
    }

    /// Current bounds, extended one tile past the smaller coordinate on each
    /// axis so a zero-movement drag still covers a full tile.
    pub fn bounds(&self) -> SelectionBounds {
        let tile = BASE_TILE_SIZE as i32;
        SelectionBounds {
            left: self.start.x.min(self.end.x),
            top: self.start.y.min(self.end.y),
            right: self.start.x.max(self.end.x) + tile,
            bottom: self.start.y.max(self.end.y) + tile,
        }
    }
}

/// One stamp entry: a source region of the atlas plus its grid offset from
/// the tile the selection started on. Offsets go negative when the drag ran
/// up or left of its start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampTile {
    pub source_rect: Rect,
    pub offset: GridPoint,
}

/// An immutable multi-tile brush. Built once per completed drag, replaced
/// wholesale by the next one; holds copies, so later grid edits cannot
/// change it.
#[derive(Debug, Clone, Default)]
pub struct Stamp {
    pub tiles: Vec<StampTile>,
}

impl Stamp {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Stamp covering every cell of the region, row-major. The region is
    /// not clamped to the atlas image extent: cells past the image edge are
    /// kept and simply render empty.
    pub fn from_atlas_region(region: &MarqueeRegion) -> Self {
        let tile = BASE_TILE_SIZE as i32;
        let bounds = region.bounds;
        let mut tiles = Vec::new();
        let mut y = bounds.top;
        while y < bounds.bottom {
            let mut x = bounds.left;
            while x < bounds.right {
                tiles.push(StampTile {
                    source_rect: Rect::new(x as f32, y as f32, BASE_TILE_SIZE, BASE_TILE_SIZE),
                    offset: GridPoint {
                        x: x.div_euclid(tile) - region.start_tile.x,
                        y: y.div_euclid(tile) - region.start_tile.y,
                    },
                });
                x += tile;
            }
            y += tile;
        }
        Stamp { tiles }
    }

    /// Stamp built from the painted cells of a layer inside the region,
    /// row-major. Cells outside the layer and empty cells are skipped, so
    /// stamping the result back never plants blanks.
    pub fn from_layer_region(region: &MarqueeRegion, layer: &TileLayer) -> Self {
        let tile = BASE_TILE_SIZE as i32;
        let bounds = region.bounds;
        let mut tiles = Vec::new();
        for ty in bounds.top.div_euclid(tile)..bounds.bottom.div_euclid(tile) {
            for tx in bounds.left.div_euclid(tile)..bounds.right.div_euclid(tile) {
                let Some(cell) = layer.tile(tx, ty) else {
                    continue;
                };
                if cell.is_painted() {
                    tiles.push(StampTile {
                        source_rect: cell.source_rect,
                        offset: GridPoint {
                            x: tx - region.start_tile.x,
                            y: ty - region.start_tile.y,
                        },
                    });
                }
            }
        }
        Stamp { tiles }
    }
}
