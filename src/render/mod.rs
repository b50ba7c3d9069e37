//! Visual tree output for plugin elements

pub mod adapter;
pub mod vnode;

pub use adapter::render_formula;
pub use vnode::VNode;
