//! One layer of the map: a fixed-size tile grid plus a parallel collision
//! grid. All cell access is bounds-checked; writes outside the grid are
//! silent no-ops.

use macroquad::prelude::*;

/// Sentinel atlas index meaning "no tile painted here".
pub const EMPTY_TILE: i32 = -1;

/// One grid cell's paint state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Index of the source cell in the atlas; negative means empty.
    pub index: i32,
    /// Region of the atlas image this cell displays.
    pub source_rect: Rect,
    /// Rendered pixel position (grid coordinates times the scaled tile
    /// size). Derived, but carried so the save format can persist it.
    pub screen_pos: Vec2,
}

impl Default for Tile {
    fn default() -> Self {
        Tile {
            index: EMPTY_TILE,
            source_rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            screen_pos: Vec2::ZERO,
        }
    }
}

impl Tile {
    #[inline]
    pub fn is_painted(&self) -> bool {
        self.index >= 0
    }
}

/// A single map layer. Dimensions are fixed at creation.
#[derive(Debug)]
pub struct TileLayer {
    width: i32,
    height: i32,
    pub visible: bool,
    pub opacity: f32,
    tiles: Vec<Tile>,
    collision: Vec<bool>,
}

impl TileLayer {
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        TileLayer {
            width,
            height,
            visible: true,
            opacity: 1.0,
            tiles: vec![Tile::default(); cells],
            collision: vec![false; cells],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn slot(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.slot(x, y).map(|i| &self.tiles[i])
    }

    /// Overwrites the cell unconditionally with the given atlas index and
    /// source region; the rendered position follows from the grid
    /// coordinates and the current tile size.
    pub fn paint(&mut self, x: i32, y: i32, index: i32, source_rect: Rect, tile_size: f32) {
        if let Some(slot) = self.slot(x, y) {
            self.tiles[slot] = Tile {
                index,
                source_rect,
                screen_pos: vec2(x as f32 * tile_size, y as f32 * tile_size),
            };
        }
    }

    /// Replaces the cell verbatim (used when restoring a saved map, where
    /// the persisted pixel position is kept as-is).
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(slot) = self.slot(x, y) {
            self.tiles[slot] = tile;
        }
    }

    /// Clears the cell back to the empty sentinel.
    pub fn erase(&mut self, x: i32, y: i32) {
        if let Some(slot) = self.slot(x, y) {
            self.tiles[slot] = Tile::default();
        }
    }

    pub fn set_collision(&mut self, x: i32, y: i32, solid: bool) {
        if let Some(slot) = self.slot(x, y) {
            self.collision[slot] = solid;
        }
    }

    pub fn collision(&self, x: i32, y: i32) -> bool {
        self.slot(x, y).map(|i| self.collision[i]).unwrap_or(false)
    }

    /// Resets every cell to empty and clears the collision grid.
    pub fn clear(&mut self) {
        self.tiles.fill(Tile::default());
        self.collision.fill(false);
    }

    /// Recomputes every painted tile's rendered position for a new scaled
    /// tile size. Grid coordinates are untouched.
    pub fn rescale(&mut self, tile_size: f32) {
        let width = self.width;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if tile.is_painted() {
                let x = i as i32 % width;
                let y = i as i32 / width;
                tile.screen_pos = vec2(x as f32 * tile_size, y as f32 * tile_size);
            }
        }
    }

    /// All cells with their grid coordinates, row-major (top row first,
    /// left to right).
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, &Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (i as i32 % width, i as i32 / width, tile))
    }

    /// Grid coordinates of every solid collision cell, row-major.
    pub fn solid_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width;
        self.collision
            .iter()
            .enumerate()
            .filter(|(_, solid)| **solid)
            .map(move |(i, _)| (i as i32 % width, i as i32 / width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_is_empty_visible_and_opaque() {
        let layer = TileLayer::new(3, 2);
        assert!(layer.visible);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.cells().count(), 6);
        assert!(layer.cells().all(|(_, _, t)| !t.is_painted()));
        assert!(layer.solid_cells().next().is_none());
    }

    #[test]
    fn paint_erase_roundtrip() {
        let mut layer = TileLayer::new(4, 4);
        let rect = Rect::new(32.0, 16.0, 16.0, 16.0);
        layer.paint(2, 1, 7, rect, 16.0);

        let tile = layer.tile(2, 1).unwrap();
        assert_eq!(tile.index, 7);
        assert_eq!(tile.source_rect, rect);
        assert_eq!(tile.screen_pos, vec2(32.0, 16.0));

        layer.erase(2, 1);
        assert_eq!(layer.tile(2, 1).unwrap().index, EMPTY_TILE);
    }

    #[test]
    fn out_of_range_writes_are_noops() {
        let mut layer = TileLayer::new(2, 2);
        let rect = Rect::new(0.0, 0.0, 16.0, 16.0);
        layer.paint(-1, 0, 1, rect, 16.0);
        layer.paint(0, 2, 1, rect, 16.0);
        layer.erase(5, 5);
        layer.set_collision(2, 0, true);

        assert!(layer.cells().all(|(_, _, t)| !t.is_painted()));
        assert!(layer.solid_cells().next().is_none());
        assert!(layer.tile(-1, 0).is_none());
        assert!(!layer.collision(-1, -1));
    }

    #[test]
    fn collision_cells_are_independent_of_tiles() {
        let mut layer = TileLayer::new(3, 3);
        layer.set_collision(1, 2, true);
        assert!(layer.collision(1, 2));
        assert!(!layer.tile(1, 2).unwrap().is_painted());
        assert_eq!(layer.solid_cells().collect::<Vec<_>>(), vec![(1, 2)]);

        layer.set_collision(1, 2, false);
        assert!(!layer.collision(1, 2));
    }

    #[test]
    fn clear_resets_tiles_and_collision() {
        let mut layer = TileLayer::new(2, 2);
        layer.paint(0, 0, 3, Rect::new(0.0, 0.0, 16.0, 16.0), 16.0);
        layer.set_collision(1, 1, true);
        layer.clear();
        assert!(layer.cells().all(|(_, _, t)| !t.is_painted()));
        assert!(!layer.collision(1, 1));
    }

    #[test]
    fn rescale_moves_rendered_positions_only() {
        let mut layer = TileLayer::new(3, 3);
        layer.paint(1, 2, 0, Rect::new(0.0, 0.0, 16.0, 16.0), 16.0);
        layer.rescale(64.0);
        let tile = layer.tile(1, 2).unwrap();
        assert_eq!(tile.screen_pos, vec2(64.0, 128.0));
        assert_eq!(tile.index, 0);
    }
}
