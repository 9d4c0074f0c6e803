//! Data model for trial-balance ingestion.
//!
//! The decoder produces a [`Grid`] of raw [`CellValue`]s; the ingestion
//! pipeline turns that grid into [`ParsedAccount`]s, [`Totals`] and a
//! [`ParseResult`].

mod account;
mod grid;
mod result;

pub use account::*;
pub use grid::*;
pub use result::*;
