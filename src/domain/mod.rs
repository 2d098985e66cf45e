//! Domain types for the survey intake service.

mod survey;

pub use survey::*;
