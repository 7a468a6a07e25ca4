//! # Statistics Engine
//!
//! This crate turns per-symbol observation tables into answers: extremal
//! statistics, normalized ranges and the volatility ranking.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Logic:** Depends on `core-types` and the observation store only.
//!   It knows nothing about HTTP or configuration files.
//! - **Stateless Calculation:** Every query is a fresh computation over the
//!   current contents of the store. Nothing is cached between calls.
//!
//! ## Public API
//!
//! - `StatisticsEngine`: statistics, ranking and top-symbol-for-day queries.
//! - `normalized_range`: the shared `(max - min) / min` formula (2 dp, half-up).
//! - `RankedSymbol`: a ranking entry.
//! - `AnalyticsError`: the error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod range;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::StatisticsEngine;
pub use error::AnalyticsError;
pub use range::{normalized_range, normalized_range_of};
pub use report::RankedSymbol;
