//! Generic utility primitives with zero domain knowledge.
//!
//! - `text` - Summary rendering and clipping
//! - `validation` - Input validation helpers

pub mod text;
pub mod validation;
