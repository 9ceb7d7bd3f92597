//! Input routing rules: which pane owns the pointer, which tool the map
//! pane's left button drives, and the command set the UI emits. The rules
//! live here as pure functions so the dispatch contract is testable without
//! a window.

use crate::view::Viewport;
use macroquad::prelude::*;

/// The three panes of the editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Atlas,
    Map,
    Ui,
}

/// Fractional window split: atlas column on the left, map on the upper
/// right, button panel below the map.
pub struct PaneLayout {
    pub atlas: Viewport,
    pub map: Viewport,
    pub ui: Viewport,
}

impl Default for PaneLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneLayout {
    pub fn new() -> Self {
        PaneLayout {
            atlas: Viewport::new(0.0, 0.0, 0.25, 1.0),
            map: Viewport::new(0.25, 0.0, 0.75, 0.75),
            ui: Viewport::new(0.25, 0.75, 0.75, 0.25),
        }
    }

    /// First pane containing the point, in fixed precedence order
    /// (atlas, map, ui). The panes only overlap on shared edge pixels, so
    /// precedence decides nothing else.
    pub fn hit_test(&self, point: Vec2, screen: Vec2) -> Option<Pane> {
        if self.atlas.contains(point, screen) {
            Some(Pane::Atlas)
        } else if self.map.contains(point, screen) {
            Some(Pane::Map)
        } else if self.ui.contains(point, screen) {
            Some(Pane::Ui)
        } else {
            None
        }
    }
}

/// What the left mouse button does in the map pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTool {
    /// Collision overlay active: write collision flags. With the eraser
    /// toggled the flag written is `false`, so the eraser clears collision.
    Collision { solid: bool },
    Erase,
    Paint,
}

/// Tool precedence: collision overlay beats the eraser beats painting.
pub fn map_tool(show_collision: bool, eraser_active: bool) -> MapTool {
    if show_collision {
        MapTool::Collision {
            solid: !eraser_active,
        }
    } else if eraser_active {
        MapTool::Erase
    } else {
        MapTool::Paint
    }
}

/// Editor actions the UI layer can request. The model consumes these by
/// pattern match; no button label text crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddLayer { width: i32, height: i32 },
    ToggleMergedLayers,
    ToggleCollisionOverlay,
    ToggleEraser,
    ToggleLayerVisibility,
    ClearLayer,
    RemoveLayer,
    BeginSave,
    BeginLoad,
}

/// Maps the fixed layer hotkeys `1`-`6` to layer indices.
pub fn layer_hotkey(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Key1 => Some(0),
        KeyCode::Key2 => Some(1),
        KeyCode::Key3 => Some(2),
        KeyCode::Key4 => Some(3),
        KeyCode::Key5 => Some(4),
        KeyCode::Key6 => Some(5),
        _ => None,
    }
}

pub const LAYER_HOTKEYS: [KeyCode; 6] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
];
