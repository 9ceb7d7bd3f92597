//! Editor shell: window setup, the per-tick input drain and the render
//! pass. All editing semantics live in the library; this file only routes
//! device input to the model and draws the result.

use macroquad::logging::{error, warn};
use macroquad::prelude::*;
use std::path::Path;
use tile_forge::input::{layer_hotkey, LAYER_HOTKEYS};
use tile_forge::ui::{ButtonPanel, PendingFile, TextEntry};
use tile_forge::{
    load_tile_map, map_tool, save_tile_map, Command, MapTool, Pane, PaneLayout, TileAtlas,
    TileMap, ViewTransform,
};

const ATLAS_PATH: &str = "assets/map/tilemap16.png";

fn window_conf() -> Conf {
    Conf {
        window_title: "Tile Forge".into(),
        window_width: 1920,
        window_height: 1080,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // the editor cannot run without its atlas; fail before the loop starts
    let mut atlas = match TileAtlas::load(ATLAS_PATH).await {
        Ok(atlas) => atlas,
        Err(err) => {
            error!("failed to start editor: {:#}", err);
            return;
        }
    };

    let layout = PaneLayout::new();
    let mut atlas_view = ViewTransform::new();
    let mut map_view = ViewTransform::new();
    let mut map = TileMap::new();
    let panel = ButtonPanel::new();
    let mut text_entry = TextEntry::new();

    loop {
        let screen = vec2(screen_width(), screen_height());

        // keyboard first: either the modal filename entry or the hotkeys
        if text_entry.is_active() {
            if let Some((purpose, filename)) = text_entry.update() {
                run_file_command(&mut map, purpose, &filename);
            }
        } else {
            for key in LAYER_HOTKEYS {
                if is_key_pressed(key) {
                    if let Some(index) = layer_hotkey(key) {
                        map.set_active_layer(index);
                    }
                }
            }
            if is_key_pressed(KeyCode::E) {
                map.eraser_active = !map.eraser_active;
            }
        }

        // pointer events go to the pane under the cursor
        let mouse = Vec2::from(mouse_position());
        let pane = layout.hit_test(mouse, screen);
        let (_, wheel_y) = mouse_wheel();
        let zoom_dir = if wheel_y > 0.0 {
            1
        } else if wheel_y < 0.0 {
            -1
        } else {
            0
        };

        match pane {
            Some(Pane::Atlas) => {
                let local = mouse - layout.atlas.origin(screen);
                if is_mouse_button_down(MouseButton::Right) {
                    if let Some(stamp) = atlas.select_at(local, &atlas_view, true) {
                        map.set_stamp(stamp);
                    }
                }
                if is_mouse_button_down(MouseButton::Middle) {
                    atlas_view.pan_sample(local);
                }
                if zoom_dir != 0 && atlas_view.zoom(zoom_dir) {
                    atlas.update_tile_size(atlas_view.scale_factor());
                }
            }
            Some(Pane::Map) => {
                let local = mouse - layout.map.origin(screen);
                if is_mouse_button_down(MouseButton::Left) {
                    match map_tool(map.show_collision, map.eraser_active) {
                        MapTool::Collision { solid } => {
                            map.set_collision_at(local, &map_view, solid)
                        }
                        MapTool::Erase => map.erase_at(local, &map_view),
                        MapTool::Paint => map.paint_at(local, &map_view, atlas.width()),
                    }
                }
                if is_mouse_button_down(MouseButton::Right) {
                    map.select_at(local, &map_view, true);
                }
                if is_mouse_button_down(MouseButton::Middle) {
                    map_view.pan_sample(local);
                }
                if zoom_dir != 0 && map_view.zoom(zoom_dir) {
                    map.rescale(map_view.scale_factor());
                }
            }
            Some(Pane::Ui) => {
                if is_mouse_button_pressed(MouseButton::Left) && !text_entry.is_active() {
                    let local = mouse - layout.ui.origin(screen);
                    match panel.handle_click(local) {
                        Some(Command::BeginSave) => text_entry.begin(PendingFile::Save),
                        Some(Command::BeginLoad) => text_entry.begin(PendingFile::Load),
                        Some(command) => map.apply(command),
                        None => {}
                    }
                }
            }
            None => {}
        }

        // gesture ends are handled wherever the pointer is, so releasing a
        // button outside the pane still resets the state machines
        if is_mouse_button_released(MouseButton::Right) {
            if let Some(stamp) = atlas.select_at(mouse - layout.atlas.origin(screen), &atlas_view, false)
            {
                map.set_stamp(stamp);
            }
            map.select_at(mouse - layout.map.origin(screen), &map_view, false);
        }
        if is_mouse_button_released(MouseButton::Middle) {
            atlas_view.pan_end();
            map_view.pan_end();
        }

        // render pass
        clear_background(BLACK);

        let map_origin = layout.map.origin(screen);
        if map.show_merged {
            map.draw_merged_layers(map_origin, &map_view, atlas.texture());
        }
        map.draw_active_layer(map_origin, &map_view, atlas.texture());
        map.draw_marquee(map_origin, &map_view);
        if map.show_collision {
            map.draw_collision_overlay(map_origin, &map_view);
        }

        atlas.draw(layout.atlas.origin(screen), &atlas_view);

        let ui_origin = layout.ui.origin(screen);
        panel.draw(ui_origin);
        text_entry.draw(ui_origin);

        // separators between the panes
        let atlas_edge = layout.atlas.pixel_rect(screen).right();
        let map_edge = layout.map.pixel_rect(screen).bottom();
        draw_line(atlas_edge, 0.0, atlas_edge, screen.y, 2.0, WHITE);
        draw_line(atlas_edge, map_edge, screen.x, map_edge, 2.0, WHITE);

        next_frame().await;
    }
}

fn run_file_command(map: &mut TileMap, purpose: PendingFile, filename: &str) {
    match purpose {
        PendingFile::Save => {
            if let Err(err) = save_tile_map(map, Path::new(filename)) {
                warn!("failed to save {}: {}", filename, err);
            }
        }
        PendingFile::Load => match load_tile_map(Path::new(filename)) {
            Ok(layers) => map.replace_layers(layers),
            Err(err) => warn!("failed to load {}: {}", filename, err),
        },
    }
}
