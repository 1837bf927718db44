//! Four-operator arithmetic.

use shared::Operator;

use super::errors::{DeskError, DeskResult};

/// Apply `op` to the two operands.
///
/// Division by zero (including `-0.0`) is rejected with [`DeskError::Domain`].
pub fn apply(a: f64, b: f64, op: Operator) -> DeskResult<f64> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Subtract => Ok(a - b),
        Operator::Multiply => Ok(a * b),
        Operator::Divide if b == 0.0 => Err(DeskError::division_by_zero()),
        Operator::Divide => Ok(a / b),
    }
}

/// Parse the operator symbol, then [`apply`] it
pub fn compute(a: f64, b: f64, op: &str) -> DeskResult<f64> {
    let op: Operator = op.parse()?;
    apply(a, b, op)
}
