//! Rendering module for writing outlines to output formats.

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{Leader, RenderOptions};
pub use text::{render_entry, to_text};
