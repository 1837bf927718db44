//! # Storage Traits
//!
//! The abstraction the domain layer uses to reach the calculation history, so
//! services and the exporter never depend on SQLite directly.

use async_trait::async_trait;
use shared::{CalculationRecord, NewCalculation, RecordId};

use crate::domain::errors::DeskResult;

/// Append-only history of performed calculations
#[async_trait]
pub trait CalculationStorage: Send + Sync {
    /// Ensure the backing table exists. Idempotent.
    async fn initialize(&self) -> DeskResult<()>;

    /// Store a calculation and return the identifier assigned to it.
    /// Returns only after the write is committed.
    async fn append(&self, calculation: &NewCalculation) -> DeskResult<RecordId>;

    /// Every stored calculation in insertion order
    async fn fetch_all(&self) -> DeskResult<Vec<CalculationRecord>>;
}
