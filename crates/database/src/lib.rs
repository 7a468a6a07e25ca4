//! # Observation Store
//!
//! This crate is the read-only storage adapter of the system. It turns each
//! symbol's raw observation table into `Observation` values and answers the four
//! extremal questions the statistics engine is built on.
//!
//! ## Public API
//!
//! - `ObservationSource`: the capability trait for a per-symbol raw table.
//! - `CsvSource`, `PgSource`, `MemorySource`: flat-file, PostgreSQL and in-memory sources.
//! - `ObservationStore`: `minimum` / `maximum` / `oldest` / `newest`, optionally per UTC day.
//! - `connect`, `run_migrations`: PostgreSQL pool setup.
//! - `DbError`: the error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod csv_source;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod source;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use csv_source::CsvSource;
pub use error::DbError;
pub use memory::MemorySource;
pub use postgres::PgSource;
pub use repository::ObservationStore;
pub use source::ObservationSource;
