//! # Ponto Domain
//!
//! Business domain types for the Ponto client core.
//!
//! This crate contains:
//! - Typed API resources and the JSON:API envelope
//! - The structured API error consumed by presentation code
//! - Configuration structures
//! - API constants and date filter normalization
//!
//! ## Architecture
//! - No dependencies on other Ponto crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::dates::{normalize_date, parse_date};
