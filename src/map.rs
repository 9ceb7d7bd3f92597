//! The layered map model: layer stack, active-layer tracking, stamping,
//! erasing, collision painting, map-side re-selection and the read-only
//! render projections (merged layers, collision overlay, marquee).

use crate::grid::TileLayer;
use crate::input::Command;
use crate::selection::{Marquee, Stamp};
use crate::view::{ViewTransform, BASE_TILE_SIZE};
use macroquad::logging::{info, warn};
use macroquad::prelude::*;

const GRID_LINE: Color = Color::new(0.4, 0.4, 0.4, 0.6);
const MARQUEE_FILL: Color = Color::new(0.0, 1.0, 0.0, 0.4);
const COLLISION_FILL: Color = Color::new(1.0, 0.0, 0.0, 0.4);
/// Alpha for non-active layers in the merged view, regardless of their
/// stored per-layer opacity.
const MERGED_ALPHA: f32 = 100.0 / 255.0;

pub struct TileMap {
    layers: Vec<TileLayer>,
    active: Option<usize>,
    pub show_merged: bool,
    pub show_collision: bool,
    pub eraser_active: bool,
    marquee: Marquee,
    stamp: Option<Stamp>,
    tile_size: f32,
    scale_factor: f32,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TileMap {
    pub fn new() -> Self {
        TileMap {
            layers: Vec::new(),
            active: None,
            show_merged: false,
            show_collision: false,
            eraser_active: false,
            marquee: Marquee::new(),
            stamp: None,
            tile_size: BASE_TILE_SIZE,
            scale_factor: 1.0,
        }
    }

    // ---------------------------------------------------------------- layers

    /// Appends an empty layer and makes it the active one.
    pub fn add_layer(&mut self, width: i32, height: i32) {
        self.layers.push(TileLayer::new(width, height));
        self.active = Some(self.layers.len() - 1);
    }

    /// Removes a layer; later layers shift down one index and the active
    /// index follows. Invalid indices are logged and ignored.
    pub fn remove_layer(&mut self, index: usize) {
        if index >= self.layers.len() {
            warn!("invalid layer index for removal: {}", index);
            return;
        }
        self.layers.remove(index);
        self.active = if self.layers.is_empty() {
            None
        } else {
            match self.active {
                Some(a) if a > index => Some(a - 1),
                Some(a) if a == index => Some(index.min(self.layers.len() - 1)),
                other => other,
            }
        };
    }

    pub fn set_active_layer(&mut self, index: usize) {
        if index < self.layers.len() {
            self.active = Some(index);
            info!("switched to layer: {}", index);
        } else {
            warn!("invalid layer index: {}", index);
        }
    }

    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&TileLayer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut TileLayer> {
        self.layers.get_mut(index)
    }

    pub fn active_layer(&self) -> Option<&TileLayer> {
        self.active.and_then(|i| self.layers.get(i))
    }

    /// Discards every current layer in favor of a freshly loaded stack; the
    /// first loaded layer becomes active.
    pub fn replace_layers(&mut self, layers: Vec<TileLayer>) {
        self.layers = layers;
        self.active = if self.layers.is_empty() { None } else { Some(0) };
    }

    pub fn toggle_active_visibility(&mut self) {
        let Some(index) = self.active else { return };
        let layer = &mut self.layers[index];
        layer.visible = !layer.visible;
    }

    pub fn clear_active_layer(&mut self) {
        if let Some(index) = self.active {
            self.layers[index].clear();
        }
    }

    // -------------------------------------------------------------- commands

    /// Applies a UI command to the model. File commands are routed by the
    /// shell before they get here.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::AddLayer { width, height } => self.add_layer(width, height),
            Command::ToggleMergedLayers => self.show_merged = !self.show_merged,
            Command::ToggleCollisionOverlay => self.show_collision = !self.show_collision,
            Command::ToggleEraser => self.eraser_active = !self.eraser_active,
            Command::ToggleLayerVisibility => self.toggle_active_visibility(),
            Command::ClearLayer => self.clear_active_layer(),
            Command::RemoveLayer => {
                if let Some(index) = self.active {
                    self.remove_layer(index);
                } else {
                    warn!("no active layer to remove");
                }
            }
            Command::BeginSave | Command::BeginLoad => {}
        }
    }

    // -------------------------------------------------------------- painting

    pub fn set_stamp(&mut self, stamp: Stamp) {
        self.stamp = Some(stamp);
    }

    pub fn stamp(&self) -> Option<&Stamp> {
        self.stamp.as_ref()
    }

    /// Stamps the current selection onto the active layer, anchored at the
    /// cell under the pointer. Each entry's atlas index is recomputed from
    /// its source rect against the atlas image width as it is *now*, not as
    /// it was when the selection was taken.
    pub fn paint_at(&mut self, device: Vec2, view: &ViewTransform, atlas_width_px: f32) {
        let Some(stamp) = &self.stamp else { return };
        let Some(index) = self.active else { return };

        let (base_x, base_y) = view.screen_to_grid(device);
        let columns = (atlas_width_px / BASE_TILE_SIZE) as i32;
        let tile_size = self.tile_size;
        let layer = &mut self.layers[index];

        for entry in &stamp.tiles {
            let atlas_index = (entry.source_rect.y / BASE_TILE_SIZE) as i32 * columns
                + (entry.source_rect.x / BASE_TILE_SIZE) as i32;
            layer.paint(
                base_x + entry.offset.x,
                base_y + entry.offset.y,
                atlas_index,
                entry.source_rect,
                tile_size,
            );
        }
    }

    /// Erases the cell under the pointer on the active layer.
    pub fn erase_at(&mut self, device: Vec2, view: &ViewTransform) {
        let Some(index) = self.active else { return };
        let (x, y) = view.screen_to_grid(device);
        self.layers[index].erase(x, y);
    }

    /// Writes a collision flag at the cell under the pointer.
    pub fn set_collision_at(&mut self, device: Vec2, view: &ViewTransform, solid: bool) {
        let Some(index) = self.active else { return };
        let (x, y) = view.screen_to_grid(device);
        self.layers[index].set_collision(x, y, solid);
    }

    /// Map-side marquee: re-selects painted tiles from the active layer.
    /// On completion the harvested cells replace the current stamp.
    pub fn select_at(&mut self, device: Vec2, view: &ViewTransform, pressed: bool) {
        let snapped = view.snap_to_grid(device);
        if let Some(region) = self.marquee.update(snapped, pressed) {
            if let Some(layer) = self.active_layer() {
                self.stamp = Some(Stamp::from_layer_region(&region, layer));
            }
        }
    }

    // --------------------------------------------------------------- scaling

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Adopts a new zoom scale: updates the effective tile size and every
    /// painted tile's rendered position. Grid contents never change.
    pub fn rescale(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
        self.tile_size = BASE_TILE_SIZE * scale_factor;
        for layer in &mut self.layers {
            layer.rescale(self.tile_size);
        }
    }

    // -------------------------------------------------------------- drawing

    /// Draws the active layer's tiles at its own opacity, plus grid lines.
    pub fn draw_active_layer(&self, origin: Vec2, view: &ViewTransform, texture: &Texture2D) {
        let Some(index) = self.active else { return };
        let layer = &self.layers[index];
        let pan = view.pan_offset;
        let tint = Color::new(1.0, 1.0, 1.0, layer.opacity);

        for (_, _, tile) in layer.cells() {
            if !tile.is_painted() {
                continue;
            }
            let pos = origin + tile.screen_pos - pan;
            draw_texture_ex(
                texture,
                pos.x,
                pos.y,
                tint,
                DrawTextureParams {
                    dest_size: Some(vec2(self.tile_size, self.tile_size)),
                    source: Some(tile.source_rect),
                    ..Default::default()
                },
            );
        }
        self.draw_grid_lines(origin, pan, layer);
    }

    /// Draws every other visible layer at a fixed reduced alpha under the
    /// active one. Read-only projection; the stored opacity is not used
    /// here, only the active layer's own pass uses it.
    pub fn draw_merged_layers(&self, origin: Vec2, view: &ViewTransform, texture: &Texture2D) {
        let pan = view.pan_offset;
        let tint = Color::new(1.0, 1.0, 1.0, MERGED_ALPHA);
        for (i, layer) in self.layers.iter().enumerate() {
            if Some(i) == self.active || !layer.visible {
                continue;
            }
            for (x, y, tile) in layer.cells() {
                if !tile.is_painted() {
                    continue;
                }
                let pos = origin + vec2(x as f32, y as f32) * self.tile_size - pan;
                draw_texture_ex(
                    texture,
                    pos.x,
                    pos.y,
                    tint,
                    DrawTextureParams {
                        dest_size: Some(vec2(self.tile_size, self.tile_size)),
                        source: Some(tile.source_rect),
                        ..Default::default()
                    },
                );
            }
        }
    }

    /// Translucent red squares over the active layer's solid cells.
    pub fn draw_collision_overlay(&self, origin: Vec2, view: &ViewTransform) {
        let Some(layer) = self.active_layer() else { return };
        let pan = view.pan_offset;
        for (x, y) in layer.solid_cells() {
            let pos = origin + vec2(x as f32, y as f32) * self.tile_size - pan;
            draw_rectangle(pos.x, pos.y, self.tile_size, self.tile_size, COLLISION_FILL);
        }
    }

    /// The in-progress selection rectangle, scaled to the current zoom.
    pub fn draw_marquee(&self, origin: Vec2, view: &ViewTransform) {
        if !self.marquee.is_selecting() {
            return;
        }
        let bounds = self.marquee.bounds();
        let scale = view.scale_factor();
        let pos = origin + vec2(bounds.left as f32, bounds.top as f32) * scale - view.pan_offset;
        draw_rectangle(
            pos.x,
            pos.y,
            bounds.width() as f32 * scale,
            bounds.height() as f32 * scale,
            MARQUEE_FILL,
        );
    }

    fn draw_grid_lines(&self, origin: Vec2, pan: Vec2, layer: &TileLayer) {
        let grid_w = layer.width() as f32 * self.tile_size;
        let grid_h = layer.height() as f32 * self.tile_size;

        let mut x = 0.0;
        while x <= grid_w {
            let sx = origin.x + x - pan.x;
            draw_line(sx, origin.y - pan.y, sx, origin.y + grid_h - pan.y, 1.0, GRID_LINE);
            x += self.tile_size;
        }
        let mut y = 0.0;
        while y <= grid_h {
            let sy = origin.y + y - pan.y;
            draw_line(origin.x - pan.x, sy, origin.x + grid_w - pan.x, sy, 1.0, GRID_LINE);
            y += self.tile_size;
        }
    }
}
