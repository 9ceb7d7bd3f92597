//! The persisted map format: save and load of the whole layer stack.
//!
//! The on-disk shape is pretty-printed JSON with one object per layer:
//! `width`, `height`, `isVisible`, `opacity`, a `tiles` grid of
//! `height x width` entries (`null` for empty cells) and a `collisionGrid`
//! of booleans. Non-null tile entries carry the atlas `index`, the
//! `textureRect` source region and the rendered pixel `position` at save
//! time. The pixel position is restored verbatim on load but is not
//! authoritative; the next rescale recomputes it from grid coordinates.
//!
//! Transient editor state (selection, pan, zoom, active layer) is never
//! persisted.

use crate::error::Error;
use crate::grid::{Tile, TileLayer};
use crate::map::TileMap;
use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct TextureRectData {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

#[derive(Serialize, Deserialize)]
struct PositionData {
    x: f32,
    y: f32,
}

#[derive(Serialize, Deserialize)]
struct TileData {
    index: i32,
    #[serde(rename = "textureRect")]
    texture_rect: TextureRectData,
    position: PositionData,
}

#[derive(Serialize, Deserialize)]
struct LayerData {
    width: i32,
    height: i32,
    #[serde(rename = "isVisible")]
    is_visible: bool,
    opacity: f32,
    tiles: Vec<Vec<Option<TileData>>>,
    #[serde(rename = "collisionGrid")]
    collision_grid: Vec<Vec<bool>>,
}

#[derive(Serialize, Deserialize)]
struct MapData {
    layers: Vec<LayerData>,
}

fn layer_to_data(layer: &TileLayer) -> LayerData {
    let mut tiles = Vec::with_capacity(layer.height() as usize);
    let mut collision = Vec::with_capacity(layer.height() as usize);
    for y in 0..layer.height() {
        let mut tile_row = Vec::with_capacity(layer.width() as usize);
        let mut collision_row = Vec::with_capacity(layer.width() as usize);
        for x in 0..layer.width() {
            let cell = layer.tile(x, y).filter(|t| t.is_painted());
            tile_row.push(cell.map(|t| TileData {
                index: t.index,
                texture_rect: TextureRectData {
                    left: t.source_rect.x as i32,
                    top: t.source_rect.y as i32,
                    width: t.source_rect.w as i32,
                    height: t.source_rect.h as i32,
                },
                position: PositionData {
                    x: t.screen_pos.x,
                    y: t.screen_pos.y,
                },
            }));
            collision_row.push(layer.collision(x, y));
        }
        tiles.push(tile_row);
        collision.push(collision_row);
    }
    LayerData {
        width: layer.width(),
        height: layer.height(),
        is_visible: layer.visible,
        opacity: layer.opacity,
        tiles,
        collision_grid: collision,
    }
}

fn layer_from_data(index: usize, data: LayerData) -> Result<TileLayer, Error> {
    if data.width < 0 || data.height < 0 {
        return Err(Error::Corrupt(format!(
            "layer {} has negative dimensions {}x{}",
            index, data.width, data.height
        )));
    }
    let (width, height) = (data.width as usize, data.height as usize);
    if data.tiles.len() != height || data.collision_grid.len() != height {
        return Err(Error::Corrupt(format!(
            "layer {} row count does not match height {}",
            index, height
        )));
    }

    let mut layer = TileLayer::new(data.width, data.height);
    layer.visible = data.is_visible;
    layer.opacity = data.opacity;

    for (y, row) in data.tiles.into_iter().enumerate() {
        if row.len() != width {
            return Err(Error::Corrupt(format!(
                "layer {} tile row {} does not match width {}",
                index, y, width
            )));
        }
        for (x, cell) in row.into_iter().enumerate() {
            if let Some(tile) = cell {
                layer.set_tile(
                    x as i32,
                    y as i32,
                    Tile {
                        index: tile.index,
                        source_rect: Rect::new(
                            tile.texture_rect.left as f32,
                            tile.texture_rect.top as f32,
                            tile.texture_rect.width as f32,
                            tile.texture_rect.height as f32,
                        ),
                        screen_pos: vec2(tile.position.x, tile.position.y),
                    },
                );
            }
        }
    }
    for (y, row) in data.collision_grid.into_iter().enumerate() {
        if row.len() != width {
            return Err(Error::Corrupt(format!(
                "layer {} collision row {} does not match width {}",
                index, y, width
            )));
        }
        for (x, solid) in row.into_iter().enumerate() {
            layer.set_collision(x as i32, y as i32, solid);
        }
    }
    Ok(layer)
}

/// Serializes the map's layer stack. Empty cells round-trip as `null`.
pub fn map_to_string(map: &TileMap) -> Result<String, Error> {
    let data = MapData {
        layers: map.layers().iter().map(layer_to_data).collect(),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

/// Parses a saved map into a fresh layer stack, validating that every grid
/// row matches the declared dimensions.
pub fn layers_from_str(text: &str) -> Result<Vec<TileLayer>, Error> {
    let data: MapData = serde_json::from_str(text)?;
    data.layers
        .into_iter()
        .enumerate()
        .map(|(i, layer)| layer_from_data(i, layer))
        .collect()
}

/// Writes the map to `path`; fails with [`Error::Io`] when the path cannot
/// be opened for writing.
pub fn save_tile_map(map: &TileMap, path: &Path) -> Result<(), Error> {
    let text = map_to_string(map)?;
    fs::write(path, text)?;
    Ok(())
}

/// Reads a layer stack from `path`. The caller swaps it into the model via
/// [`TileMap::replace_layers`], which also resets the active layer.
pub fn load_tile_map(path: &Path) -> Result<Vec<TileLayer>, Error> {
    let text = fs::read_to_string(path)?;
    layers_from_str(&text)
}
