// tests/format_roundtrip.rs

use macroquad::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tile_forge::format::{layers_from_str, map_to_string};
use tile_forge::selection::{Stamp, StampTile};
use tile_forge::view::GridPoint;
use tile_forge::{load_tile_map, save_tile_map, Error, TileLayer, TileMap, ViewTransform};

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tile_forge_fmt_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn stamp_for(atlas_x: f32, atlas_y: f32) -> Stamp {
    Stamp {
        tiles: vec![StampTile {
            source_rect: Rect::new(atlas_x, atlas_y, 16.0, 16.0),
            offset: GridPoint { x: 0, y: 0 },
        }],
    }
}

fn paint_cell(map: &mut TileMap, view: &ViewTransform, x: i32, y: i32, atlas_x: f32, atlas_y: f32) {
    map.set_stamp(stamp_for(atlas_x, atlas_y));
    map.paint_at(vec2(x as f32 * 16.0 + 1.0, y as f32 * 16.0 + 1.0), view, 128.0);
}

fn assert_layers_match(loaded: &[TileLayer], original: &[TileLayer]) {
    assert_eq!(loaded.len(), original.len());
    for (a, b) in loaded.iter().zip(original) {
        assert_eq!(a.width(), b.width());
        assert_eq!(a.height(), b.height());
        assert_eq!(a.visible, b.visible);
        assert_eq!(a.opacity, b.opacity);
        for y in 0..b.height() {
            for x in 0..b.width() {
                let (at, bt) = (a.tile(x, y).unwrap(), b.tile(x, y).unwrap());
                assert_eq!(at.index, bt.index, "tile index mismatch at ({x},{y})");
                if bt.is_painted() {
                    assert_eq!(at.source_rect, bt.source_rect);
                    assert_eq!(at.screen_pos, bt.screen_pos);
                }
                assert_eq!(a.collision(x, y), b.collision(x, y));
            }
        }
    }
}

#[test]
fn save_then_load_reproduces_the_layer_stack() {
    let view = ViewTransform::new();
    let mut map = TileMap::new();

    map.add_layer(4, 3);
    paint_cell(&mut map, &view, 0, 0, 0.0, 0.0);
    paint_cell(&mut map, &view, 3, 2, 48.0, 16.0);
    map.set_collision_at(vec2(33.0, 1.0), &view, true);

    map.add_layer(2, 5);
    paint_cell(&mut map, &view, 1, 4, 112.0, 96.0);
    map.layer_mut(1).unwrap().opacity = 0.25;
    map.layer_mut(1).unwrap().visible = false;

    let dir = temp_dir();
    let path = dir.join("map.json");
    save_tile_map(&map, &path).expect("save should succeed");

    let loaded = load_tile_map(&path).expect("load should succeed");
    assert_layers_match(&loaded, map.layers());
}

#[test]
fn load_replaces_the_layer_collection_and_resets_the_active_layer() {
    let view = ViewTransform::new();
    let mut source = TileMap::new();
    source.add_layer(3, 3);
    paint_cell(&mut source, &view, 1, 1, 80.0, 0.0);

    let dir = temp_dir();
    let path = dir.join("map.json");
    save_tile_map(&source, &path).expect("save should succeed");

    let mut target = TileMap::new();
    target.add_layer(10, 10);
    target.add_layer(10, 10);
    target.set_active_layer(1);

    target.replace_layers(load_tile_map(&path).expect("load should succeed"));
    assert_eq!(target.layers().len(), 1);
    assert_eq!(target.active_index(), Some(0));
    assert_eq!(target.layers()[0].width(), 3);

    // a zero-layer file leaves no active layer
    fs::write(&path, r#"{ "layers": [] }"#).unwrap();
    target.replace_layers(load_tile_map(&path).expect("empty map should load"));
    assert_eq!(target.active_index(), None);
}

#[test]
fn three_by_three_scenario() {
    // paint atlas index 5 at (1,1) of a 3x3 layer; everything else stays empty
    let view = ViewTransform::new();
    let mut map = TileMap::new();
    map.add_layer(3, 3);
    // 128 px atlas -> 8 columns; rect (80, 0) is column 5, row 0 -> index 5
    paint_cell(&mut map, &view, 1, 1, 80.0, 0.0);
    assert_eq!(map.layers()[0].tile(1, 1).unwrap().index, 5);

    let dir = temp_dir();
    let path = dir.join("scenario.json");
    save_tile_map(&map, &path).expect("save should succeed");

    let mut fresh = TileMap::new();
    fresh.replace_layers(load_tile_map(&path).expect("load should succeed"));

    let layer = &fresh.layers()[0];
    for y in 0..3 {
        for x in 0..3 {
            let tile = layer.tile(x, y).unwrap();
            if (x, y) == (1, 1) {
                assert_eq!(tile.index, 5);
            } else {
                assert!(tile.index < 0, "cell ({x},{y}) should be empty");
            }
        }
    }
}

#[test]
fn empty_cells_are_written_as_null_with_the_exact_field_names() {
    let view = ViewTransform::new();
    let mut map = TileMap::new();
    map.add_layer(2, 1);
    paint_cell(&mut map, &view, 1, 0, 16.0, 0.0);
    map.set_collision_at(vec2(17.0, 1.0), &view, true);

    let text = map_to_string(&map).expect("serialize should succeed");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    let layer = &value["layers"][0];
    assert!(layer["tiles"][0][0].is_null());
    assert_eq!(layer["tiles"][0][1]["index"], 1);
    assert_eq!(layer["tiles"][0][1]["textureRect"]["left"], 16);
    assert_eq!(layer["tiles"][0][1]["position"]["x"], 16.0);
    assert_eq!(layer["isVisible"], true);
    assert_eq!(layer["collisionGrid"][0][1], true);
}

#[test]
fn persisted_position_survives_load_until_the_next_rescale() {
    let view = ViewTransform::new();
    let mut map = TileMap::new();
    map.add_layer(2, 2);
    paint_cell(&mut map, &view, 1, 1, 0.0, 0.0);

    let dir = temp_dir();
    let path = dir.join("map.json");
    save_tile_map(&map, &path).expect("save should succeed");

    let mut fresh = TileMap::new();
    fresh.replace_layers(load_tile_map(&path).expect("load should succeed"));
    // restored verbatim from the file
    assert_eq!(fresh.layers()[0].tile(1, 1).unwrap().screen_pos, vec2(16.0, 16.0));

    // the next zoom change recomputes it from grid coordinates
    fresh.rescale(4.0);
    assert_eq!(fresh.layers()[0].tile(1, 1).unwrap().screen_pos, vec2(64.0, 64.0));
}

#[test]
fn missing_file_fails_with_an_io_error() {
    let dir = temp_dir();
    let err = load_tile_map(&dir.join("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn unwritable_path_fails_with_an_io_error() {
    let map = TileMap::new();
    // the temp dir itself is a directory, not a writable file path
    let err = save_tile_map(&map, &temp_dir()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn malformed_json_fails_with_a_parse_error() {
    let err = layers_from_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn truncated_grid_fails_with_a_corrupt_error() {
    let text = r#"{
      "layers": [
        {
          "width": 3, "height": 2,
          "isVisible": true, "opacity": 1.0,
          "tiles": [[null, null, null]],
          "collisionGrid": [[false, false, false], [false, false, false]]
        }
      ]
    }"#;
    let err = layers_from_str(text).unwrap_err();
    assert!(matches!(err, Error::Corrupt(_)));
}
