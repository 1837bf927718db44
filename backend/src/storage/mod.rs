//! # Storage Module
//!
//! Persistence for the calculation history.
//!
//! - **connection**: the SQLite database handle, its schema and lifecycle
//! - **traits**: the storage abstraction the domain layer depends on
//! - **calculation_repository**: the SQLite implementation of that abstraction
//!
//! The history is append-only: there is no update or delete path.

pub mod calculation_repository;
pub mod connection;
pub mod traits;

pub use calculation_repository::CalculationRepository;
pub use connection::DbConnection;
pub use traits::CalculationStorage;
