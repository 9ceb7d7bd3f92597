//! The source tile image and drag-selection on the atlas pane.

use crate::selection::{Marquee, Stamp};
use crate::view::{ViewTransform, BASE_TILE_SIZE};
use anyhow::Context;
use macroquad::prelude::*;

const GRID_LINE: Color = Color::new(0.4, 0.4, 0.4, 0.6);
const MARQUEE_FILL: Color = Color::new(0.0, 1.0, 0.0, 0.4);

// The atlas pane draws a fixed guide grid regardless of the image size,
// like graph paper behind the texture.
const GUIDE_COLUMNS: i32 = 50;
const GUIDE_ROWS: i32 = 100;

pub struct TileAtlas {
    texture: Texture2D,
    tile_size: f32,
    marquee: Marquee,
}

impl TileAtlas {
    /// Loads the atlas image. Failure here is fatal to the editor; the
    /// caller surfaces it before the main loop starts.
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let texture = load_texture(path)
            .await
            .with_context(|| format!("Loading tile atlas {}", path))?;
        texture.set_filter(FilterMode::Nearest);
        Ok(TileAtlas {
            texture,
            tile_size: BASE_TILE_SIZE,
            marquee: Marquee::new(),
        })
    }

    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }

    /// Atlas image width in pixels; the paint pipeline derives the atlas
    /// index of each stamped tile from it.
    pub fn width(&self) -> f32 {
        self.texture.width()
    }

    pub fn update_tile_size(&mut self, scale_factor: f32) {
        self.tile_size = BASE_TILE_SIZE * scale_factor;
    }

    /// Right-button marquee over the atlas. Returns the finished stamp on
    /// release; the selection is deliberately not clamped to the image, so
    /// cells past the edge become (empty-rendering) stamp entries.
    pub fn select_at(
        &mut self,
        device: Vec2,
        view: &ViewTransform,
        pressed: bool,
    ) -> Option<Stamp> {
        let snapped = view.snap_to_grid(device);
        self.marquee
            .update(snapped, pressed)
            .map(|region| Stamp::from_atlas_region(&region))
    }

    /// Draws the atlas texture, the guide grid and any in-progress marquee.
    pub fn draw(&self, origin: Vec2, view: &ViewTransform) {
        let pan = view.pan_offset;
        let scale = view.scale_factor();
        let pos = origin - pan;
        draw_texture_ex(
            &self.texture,
            pos.x,
            pos.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(self.texture.width(), self.texture.height()) * scale),
                ..Default::default()
            },
        );

        let grid_w = GUIDE_COLUMNS as f32 * self.tile_size;
        let grid_h = GUIDE_ROWS as f32 * self.tile_size;
        let mut x = 0.0;
        while x <= grid_w {
            draw_line(pos.x + x, pos.y, pos.x + x, pos.y + grid_h, 1.0, GRID_LINE);
            x += self.tile_size;
        }
        let mut y = 0.0;
        while y <= grid_h {
            draw_line(pos.x, pos.y + y, pos.x + grid_w, pos.y + y, 1.0, GRID_LINE);
            y += self.tile_size;
        }

        if self.marquee.is_selecting() {
            let bounds = self.marquee.bounds();
            let at = origin + vec2(bounds.left as f32, bounds.top as f32) * scale - pan;
            draw_rectangle(
                at.x,
                at.y,
                bounds.width() as f32 * scale,
                bounds.height() as f32 * scale,
                MARQUEE_FILL,
            );
        }
    }
}
