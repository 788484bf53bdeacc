//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `form`: Entry form panel
//! - `table`: Ledger table panel

pub mod form;
pub mod input;
pub mod render;
pub mod styles;
pub mod table;
