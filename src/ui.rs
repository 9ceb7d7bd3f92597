//! Thin UI glue for the bottom-right pane: a button panel that emits
//! [`Command`]s and the filename text entry used by save/load. None of the
//! editing model lives here.

use crate::input::Command;
use macroquad::prelude::*;

const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 25.0);
const BUTTON_SPACING: f32 = 5.0;
const BUTTONS_PER_COLUMN: usize = 6;
const BUTTON_FILL: Color = Color::new(0.6, 0.6, 0.6, 1.0);
const ENTRY_FILL: Color = Color::new(0.8, 0.8, 0.8, 1.0);

struct Button {
    label: &'static str,
    command: Command,
    rect: Rect,
}

pub struct ButtonPanel {
    buttons: Vec<Button>,
}

impl Default for ButtonPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonPanel {
    pub fn new() -> Self {
        let entries: [(&'static str, Command); 11] = [
            ("50x50 Grid", Command::AddLayer { width: 50, height: 50 }),
            ("100x100 Grid", Command::AddLayer { width: 100, height: 100 }),
            ("200x200 Grid", Command::AddLayer { width: 200, height: 200 }),
            ("Merge Layers", Command::ToggleMergedLayers),
            ("Toggle Collision", Command::ToggleCollisionOverlay),
            ("Toggle Eraser", Command::ToggleEraser),
            ("Hide Layer", Command::ToggleLayerVisibility),
            ("Clear Layer", Command::ClearLayer),
            ("Remove Layer", Command::RemoveLayer),
            ("Save Tilemap", Command::BeginSave),
            ("Load Tilemap", Command::BeginLoad),
        ];
        let buttons = entries
            .into_iter()
            .enumerate()
            .map(|(i, (label, command))| {
                let column = i / BUTTONS_PER_COLUMN;
                let row = i % BUTTONS_PER_COLUMN;
                Button {
                    label,
                    command,
                    rect: Rect::new(
                        BUTTON_SPACING + column as f32 * (BUTTON_SIZE.x + BUTTON_SPACING),
                        BUTTON_SPACING + row as f32 * (BUTTON_SIZE.y + BUTTON_SPACING),
                        BUTTON_SIZE.x,
                        BUTTON_SIZE.y,
                    ),
                }
            })
            .collect();
        ButtonPanel { buttons }
    }

    /// Resolves a click at pane-local coordinates to the button under it.
    pub fn handle_click(&self, local: Vec2) -> Option<Command> {
        self.buttons
            .iter()
            .find(|b| b.rect.contains(local))
            .map(|b| b.command)
    }

    pub fn draw(&self, origin: Vec2) {
        for button in &self.buttons {
            let rect = button.rect.offset(origin);
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, BUTTON_FILL);
            draw_text(button.label, rect.x + 8.0, rect.y + 17.0, 16.0, BLACK);
        }
    }
}

/// Whether a pending filename is for saving or loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFile {
    Save,
    Load,
}

/// Modal filename entry. While active it owns the keyboard: printable
/// characters append, Backspace deletes, Enter commits, Escape discards.
pub struct TextEntry {
    active: Option<PendingFile>,
    buffer: String,
}

impl Default for TextEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEntry {
    pub fn new() -> Self {
        TextEntry {
            active: None,
            buffer: String::new(),
        }
    }

    pub fn begin(&mut self, purpose: PendingFile) {
        self.active = Some(purpose);
        self.buffer.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Drains this frame's keyboard input into the buffer. Returns the
    /// purpose and filename once on Enter; Escape cancels silently.
    pub fn update(&mut self) -> Option<(PendingFile, String)> {
        let purpose = self.active?;
        while let Some(ch) = get_char_pressed() {
            if !ch.is_control() {
                self.buffer.push(ch);
            }
        }
        if is_key_pressed(KeyCode::Backspace) {
            self.buffer.pop();
        }
        if is_key_pressed(KeyCode::Enter) {
            self.active = None;
            return Some((purpose, std::mem::take(&mut self.buffer)));
        }
        if is_key_pressed(KeyCode::Escape) {
            self.active = None;
            self.buffer.clear();
        }
        None
    }

    pub fn draw(&self, origin: Vec2) {
        if self.active.is_none() {
            return;
        }
        let pos = origin + vec2(240.0, 5.0);
        draw_rectangle(pos.x, pos.y, 300.0, 50.0, ENTRY_FILL);
        draw_text(&self.buffer, pos.x + 10.0, pos.y + 32.0, 20.0, BLACK);
    }
}
