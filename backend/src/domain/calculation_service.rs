use chrono::Local;
use shared::{CalculationRecord, NewCalculation, Operator};
use std::sync::Arc;
use tracing::{error, info};

use super::calculator;
use super::errors::{DeskError, DeskResult};
use crate::storage::CalculationStorage;

/// Computes calculations and records the successful ones in the history
#[derive(Clone)]
pub struct CalculationService {
    store: Arc<dyn CalculationStorage>,
}

impl CalculationService {
    pub fn new(store: Arc<dyn CalculationStorage>) -> Self {
        Self { store }
    }

    /// Compute `a op b`, store it, and return the stored record.
    ///
    /// Nothing is stored when the operator is unknown, the operands are not
    /// finite, or the division is by zero.
    pub async fn calculate(&self, a: f64, op: &str, b: f64) -> DeskResult<CalculationRecord> {
        match self.try_calculate(a, op, b).await {
            Ok(record) => {
                info!("{} {} {} = {}", a, record.operator, b, record.result);
                Ok(record)
            }
            Err(e) => {
                error!("Calculation {} {} {} failed: {}", a, op, b, e);
                Err(e)
            }
        }
    }

    async fn try_calculate(&self, a: f64, op: &str, b: f64) -> DeskResult<CalculationRecord> {
        let operator: Operator = op.parse()?;
        if !a.is_finite() || !b.is_finite() {
            return Err(DeskError::Domain("Operands must be finite numbers".to_string()));
        }
        let result = calculator::apply(a, b, operator)?;

        let calculation = NewCalculation {
            timestamp: current_timestamp(),
            operand_a: a,
            operator,
            operand_b: b,
            result,
        };
        let id = self.store.append(&calculation).await?;

        Ok(CalculationRecord::from_new(id, calculation))
    }

    /// Every stored calculation, oldest first
    pub async fn history(&self) -> DeskResult<Vec<CalculationRecord>> {
        self.store.fetch_all().await.inspect_err(|e| {
            error!("Failed to load calculation history: {}", e);
        })
    }
}

/// Local wall-clock time in ISO 8601 with microseconds, e.g. `2023-01-01T09:30:00.000000`
pub fn current_timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
