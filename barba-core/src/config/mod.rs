//! Configuration types
//!
//! Rail sections are parsed from the machine's text configuration and can be
//! stored as postcard binary data.

pub mod parser;
#[cfg(feature = "serde")]
pub mod persist;
pub mod rail;

pub use parser::{parse_config, ParseError};
pub use rail::*;
