use async_trait::async_trait;
use shared::{CalculationRecord, NewCalculation, Operator, RecordId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::connection::DbConnection;
use super::traits::CalculationStorage;
use crate::domain::errors::DeskResult;

/// SQLite-backed calculation history
#[derive(Clone)]
pub struct CalculationRepository {
    db: DbConnection,
}

impl CalculationRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DbConnection {
        &self.db
    }

    fn row_to_record(row: &SqliteRow) -> Result<CalculationRecord, sqlx::Error> {
        let op: String = row.try_get("op")?;
        let operator = op
            .parse::<Operator>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(CalculationRecord {
            id: row.try_get("id")?,
            timestamp: row.try_get("timestamp")?,
            operand_a: row.try_get("a")?,
            operator,
            operand_b: row.try_get("b")?,
            result: row.try_get("result")?,
        })
    }
}

#[async_trait]
impl CalculationStorage for CalculationRepository {
    async fn initialize(&self) -> DeskResult<()> {
        self.db.initialize().await
    }

    async fn append(&self, calculation: &NewCalculation) -> DeskResult<RecordId> {
        let result = sqlx::query(
            r#"
            INSERT INTO operations (timestamp, a, op, b, result)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&calculation.timestamp)
        .bind(calculation.operand_a)
        .bind(calculation.operator.symbol())
        .bind(calculation.operand_b)
        .bind(calculation.result)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Stored calculation {} at {}", id, calculation.timestamp);
        Ok(id)
    }

    async fn fetch_all(&self) -> DeskResult<Vec<CalculationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, a, op, b, result
            FROM operations
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let records = rows
            .iter()
            .map(Self::row_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
