//! # Core Types
//!
//! The foundational data structures shared by every other crate in the workspace.
//! This crate has no knowledge of storage, HTTP or configuration files.
//!
//! - `Observation`: a single `(timestamp, symbol, price)` reading.
//! - `Statistics`: the four extremal observations of a symbol.
//! - `SymbolUniverse`: the ordered set of symbols the system answers questions about.

pub mod error;
pub mod structs;
pub mod symbol;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{Observation, Statistics};
pub use symbol::SymbolUniverse;
