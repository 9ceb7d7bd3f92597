//! Three-pane tile-map editor for Macroquad.
//!
//! The left pane shows a tile atlas to drag-select stamps from, the main
//! pane paints those stamps onto a stack of fixed-size grid layers (with
//! per-cell collision flags), and the bottom panel drives layer management
//! and JSON save/load. Each pane has independent pan and discrete zoom.

pub mod atlas;
pub mod error;
pub mod format;
pub mod grid;
pub mod input;
pub mod map;
pub mod selection;
pub mod ui;
pub mod view;

pub use atlas::TileAtlas;
pub use error::Error;
pub use format::{load_tile_map, save_tile_map};
pub use grid::{Tile, TileLayer, EMPTY_TILE};
pub use input::{map_tool, Command, MapTool, Pane, PaneLayout};
pub use map::TileMap;
pub use selection::{Marquee, Stamp, StampTile};
pub use view::{GridPoint, ViewTransform, Viewport, BASE_TILE_SIZE, ZOOM_LEVELS};
