//! Error helpers shared across infrastructure modules

pub mod conversions;
