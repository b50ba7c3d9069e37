//! Formula source handling
//!
//! Pure text functions applied to raw formula source at render time, plus the
//! shared plugin configuration.

pub mod config;
pub mod display;
pub mod normalize;

pub use config::FormulaConfig;
pub use display::{needs_block_layout, DisplayMode};
pub use normalize::normalize;
