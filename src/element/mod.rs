//! Custom visual element for formulas
//!
//! - `card`: the formula card state machine (value, stylesheet gate, output)
//! - `renderer`: the typesetter seam
//! - `stylesheet`: primary/fallback stylesheet loading
//! - `registry`: lookup-or-install element definitions

pub mod card;
pub mod registry;
pub mod renderer;
pub mod stylesheet;

pub use card::{CardOutput, FormulaCard, OBSERVED_ATTRIBUTES};
pub use registry::{define_global, ElementDefinition, ElementRegistry};
pub use renderer::{MathRenderer, RenderError, RenderOptions};
pub use stylesheet::{AttemptTicket, SheetSource, SheetState, StylesheetLoader};
