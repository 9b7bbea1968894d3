//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, overlays and the notification banner
//! - `input`: keyboard event handling
//! - `styles`: light and dark palettes
//! - `tabs`: per-tab content (dashboard, users, settings)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
