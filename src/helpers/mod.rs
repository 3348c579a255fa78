//! Helper functions shared by the Markdown renderer and layout filters

mod date;
mod html;

pub use date::*;
pub use html::*;
