//! Interaction core for the grid collage editor.
//!
//! The canvas is a fixed 2048×2048 bitmap shown on a plane in a perspective
//! scene. Users pick a cell of a snapping grid and write glyphs or images
//! into it. This crate owns everything between raw input and drawing: the
//! modal state machine, the selection and frame geometry with its snapping
//! rules, pan/zoom camera math, and the undo history. Drawing, rendering,
//! glyph rasterization, image decoding, and persistence belong to the host,
//! reached through the traits in [`surface`] and [`glyph`] or returned as
//! [`engine::Effect`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Editor`]: owns state and runs actions |
//! | [`machine`] | Pure `(state, event) -> (state, actions)` transition table |
//! | [`input`] | Modes, input events, key map, and pointer tracking |
//! | [`camera`] | Screen, world, and canvas-pixel conversions |
//! | [`zoom`] | Pan/zoom controller that owns the camera |
//! | [`region`] | Canvas rectangles, snapping, and directional moves |
//! | [`history`] | Undo/redo ring of canvas snapshots |
//! | [`surface`] | Renderer and drawing-surface boundaries, image fitting |
//! | [`glyph`] | Glyph sheet layout and the atlas boundary |
//! | [`prefs`] | Persisted preferences: colors, fit mode, toggles |
//! | [`persist`] | Seed state and change notifications |
//! | [`debounce`] | Trailing-edge debounce for glyph regeneration |
//! | [`config`] | Editor tuning knobs |
//! | [`error`] | Parse and decode error types |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod config;
pub mod consts;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod glyph;
pub mod history;
pub mod input;
pub mod machine;
pub mod persist;
pub mod prefs;
pub mod region;
pub mod surface;
pub mod zoom;

pub use engine::{Editor, Effect};
pub use error::{ImageError, ParseError};
