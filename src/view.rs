//! Per-pane pan/zoom state and the screen-to-grid coordinate transform.
//!
//! Every pane (atlas, map) owns its own [`ViewTransform`]; zooming or panning
//! one pane never affects the other. Zoom is discrete: an index into
//! [`ZOOM_LEVELS`], scaled relative to the first entry.

use macroquad::prelude::*;

/// Zoom multiples. The scale factor is the selected level divided by the base.
pub const ZOOM_LEVELS: [i32; 3] = [1, 4, 8];

/// Tile edge length in world pixels at scale 1.0.
pub const BASE_TILE_SIZE: f32 = 16.0;

/// A point snapped to the tile grid, in world pixels (multiples of
/// [`BASE_TILE_SIZE`]). May be negative when the view is panned past the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

/// Pan offset plus discrete zoom for one pane.
pub struct ViewTransform {
    /// Accumulated panning offset in device pixels.
    pub pan_offset: Vec2,
    zoom_index: usize,
    scale_factor: f32,
    last_pointer: Option<Vec2>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        ViewTransform {
            pan_offset: Vec2::ZERO,
            zoom_index: 0,
            scale_factor: 1.0,
            last_pointer: None,
        }
    }

    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Tile edge length in device pixels at the current zoom level.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        BASE_TILE_SIZE * self.scale_factor
    }

    /// Device pixels to world pixels, undoing panning and zoom.
    #[inline]
    pub fn screen_to_world(&self, device: Vec2) -> Vec2 {
        (device + self.pan_offset) / self.scale_factor
    }

    /// Device pixels to discrete grid cell coordinates. Floors toward
    /// negative infinity so cells left/above the origin resolve correctly
    /// when the view is panned past it.
    pub fn screen_to_grid(&self, device: Vec2) -> (i32, i32) {
        let world = self.screen_to_world(device);
        (
            (world.x / BASE_TILE_SIZE).floor() as i32,
            (world.y / BASE_TILE_SIZE).floor() as i32,
        )
    }

    /// Device pixels to the world-pixel position of the containing cell's
    /// top-left corner.
    pub fn snap_to_grid(&self, device: Vec2) -> GridPoint {
        let (gx, gy) = self.screen_to_grid(device);
        let tile = BASE_TILE_SIZE as i32;
        GridPoint {
            x: gx * tile,
            y: gy * tile,
        }
    }

    /// One sample of a middle-drag pan gesture. The first sample of a
    /// gesture only primes the reference point; each following sample moves
    /// the view by the pointer delta.
    pub fn pan_sample(&mut self, pointer: Vec2) {
        if let Some(last) = self.last_pointer {
            self.pan_offset += last - pointer;
        }
        self.last_pointer = Some(pointer);
    }

    /// Ends the pan gesture so the next one starts from a fresh sample.
    pub fn pan_end(&mut self) {
        self.last_pointer = None;
    }

    /// Steps the zoom level (+1 in, -1 out), clamped to the level table.
    /// Returns whether the level actually changed.
    pub fn zoom(&mut self, direction: i32) -> bool {
        let last = (ZOOM_LEVELS.len() - 1) as i32;
        let next = (self.zoom_index as i32 + direction).clamp(0, last) as usize;
        if next == self.zoom_index {
            return false;
        }
        self.zoom_index = next;
        self.scale_factor = ZOOM_LEVELS[next] as f32 / ZOOM_LEVELS[0] as f32;
        true
    }
}

/// A pane's share of the window, as fractions of the total size. The pixel
/// mapping is recomputed from the live window size every query, so resizing
/// the window moves the pane without touching pan or zoom state.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Viewport { x, y, w, h }
    }

    pub fn pixel_rect(&self, screen: Vec2) -> Rect {
        Rect::new(
            self.x * screen.x,
            self.y * screen.y,
            self.w * screen.x,
            self.h * screen.y,
        )
    }

    /// Top-left corner of the pane in device pixels.
    pub fn origin(&self, screen: Vec2) -> Vec2 {
        vec2(self.x * screen.x, self.y * screen.y)
    }

    pub fn contains(&self, point: Vec2, screen: Vec2) -> bool {
        self.pixel_rect(screen).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut view = ViewTransform::new();
        assert!(!view.zoom(-1));
        assert_eq!(view.scale_factor(), 1.0);

        assert!(view.zoom(1));
        assert_eq!(view.scale_factor(), 4.0);
        assert!(view.zoom(1));
        assert_eq!(view.scale_factor(), 8.0);

        // already at the top level: no change reported, factor untouched
        assert!(!view.zoom(1));
        assert_eq!(view.scale_factor(), 8.0);
        assert_eq!(view.tile_size(), 8.0 * BASE_TILE_SIZE);
    }

    #[test]
    fn panes_zoom_independently() {
        let mut atlas = ViewTransform::new();
        let map = ViewTransform::new();
        atlas.zoom(1);
        assert_eq!(atlas.scale_factor(), 4.0);
        assert_eq!(map.scale_factor(), 1.0);
    }

    #[test]
    fn screen_to_grid_floors_negative_coordinates() {
        let mut view = ViewTransform::new();
        view.pan_offset = vec2(-40.0, -40.0);
        // world (-40, -40) is inside cell (-3, -3), not (-2, -2)
        assert_eq!(view.screen_to_grid(Vec2::ZERO), (-3, -3));
        assert_eq!(view.snap_to_grid(Vec2::ZERO), GridPoint { x: -48, y: -48 });
    }

    #[test]
    fn screen_to_grid_accounts_for_zoom() {
        let mut view = ViewTransform::new();
        view.zoom(1); // scale 4, effective tile 64 device px
        assert_eq!(view.screen_to_grid(vec2(65.0, 10.0)), (1, 0));
    }

    #[test]
    fn pan_gesture_applies_deltas_after_the_first_sample() {
        let mut view = ViewTransform::new();
        view.pan_sample(vec2(10.0, 10.0));
        assert_eq!(view.pan_offset, Vec2::ZERO);
        view.pan_sample(vec2(4.0, 7.0));
        assert_eq!(view.pan_offset, vec2(6.0, 3.0));
    }

    #[test]
    fn released_gesture_leaves_no_stale_delta() {
        let mut view = ViewTransform::new();
        view.pan_sample(vec2(10.0, 10.0));
        view.pan_sample(vec2(0.0, 0.0));
        let offset = view.pan_offset;
        view.pan_end();

        // a brand-new gesture far away must not jump the view
        view.pan_sample(vec2(500.0, 500.0));
        assert_eq!(view.pan_offset, offset);
    }

    #[test]
    fn viewport_tracks_window_size() {
        let pane = Viewport::new(0.25, 0.0, 0.75, 0.75);
        let small = pane.pixel_rect(vec2(800.0, 600.0));
        let large = pane.pixel_rect(vec2(1920.0, 1080.0));
        assert_eq!(small.x, 200.0);
        assert_eq!(large.x, 480.0);
        assert!(pane.contains(vec2(500.0, 100.0), vec2(1920.0, 1080.0)));
        assert!(!pane.contains(vec2(100.0, 100.0), vec2(1920.0, 1080.0)));
    }
}
