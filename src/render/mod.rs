//! Output rendering for parse results.
//!
//! JSON is the hand-off format for callers that persist imports; the text
//! summary is meant for terminals.
//!
//! # Example
//!
//! ```no_run
//! use balanta::{parse_file, render::*};
//!
//! let result = parse_file("balanta.xlsx");
//!
//! let json = to_json(&result, JsonFormat::Pretty)?;
//! let text = to_text(&result);
//! # Ok::<(), balanta::Error>(())
//! ```

mod json;
mod text;

pub use json::{to_json, to_json_default, JsonFormat};
pub use text::to_text;
