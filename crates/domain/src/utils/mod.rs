//! Domain utilities

pub mod dates;

pub use dates::{normalize_date, parse_date};
