use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the history store when a calculation is appended
pub type RecordId = i64;

/// One of the four supported binary arithmetic operators.
///
/// Serialized as its symbol (`"+"`, `"-"`, `"*"`, `"/"`) both over JSON and in
/// the history table, so the wire form and the stored form are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// Every operator, in the order they are offered to users
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Returned when a string is not one of the supported operator symbols
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid operation: '{0}'")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s.trim())
            .ok_or_else(|| ParseOperatorError(s.to_string()))
    }
}

/// A calculation that has been computed but not yet stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalculation {
    /// Local wall-clock time of the calculation (ISO 8601, microseconds)
    pub timestamp: String,
    #[serde(rename = "a")]
    pub operand_a: f64,
    #[serde(rename = "op")]
    pub operator: Operator,
    #[serde(rename = "b")]
    pub operand_b: f64,
    pub result: f64,
}

/// A persisted calculation.
///
/// Field order matches the history table and the CSV report columns:
/// `id, timestamp, a, op, b, result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Store-assigned, strictly increasing, never reused
    pub id: RecordId,
    /// Local wall-clock time of the calculation (ISO 8601, microseconds)
    pub timestamp: String,
    #[serde(rename = "a")]
    pub operand_a: f64,
    #[serde(rename = "op")]
    pub operator: Operator,
    #[serde(rename = "b")]
    pub operand_b: f64,
    pub result: f64,
}

impl CalculationRecord {
    /// Attach the identifier the store assigned to a new calculation
    pub fn from_new(id: RecordId, calculation: NewCalculation) -> Self {
        Self {
            id,
            timestamp: calculation.timestamp,
            operand_a: calculation.operand_a,
            operator: calculation.operator,
            operand_b: calculation.operand_b,
            result: calculation.result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub a: f64,
    /// Operator symbol; validated by the backend so unknown symbols get a clear error
    pub op: String,
    pub b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationListResponse {
    pub calculations: Vec<CalculationRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Destination file; the backend default is used when absent or blank
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub file_path: String,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub city: String,
}

/// Current conditions for a city as reported by the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub description: String,
    /// Degrees Celsius
    pub temperature: f64,
}

impl WeatherReport {
    /// One-line summary used for display and notifications
    pub fn summary(&self) -> String {
        format!("{}: {}, {}°C", self.city, self.description, self.temperature)
    }
}

/// Outcome of one best-effort delivery attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Skipped(String),
    Failed(String),
}

impl DeliveryStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryStatus::Sent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationReport {
    pub email: DeliveryStatus,
    pub sms: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub report: WeatherReport,
    /// The summary line that was displayed and sent
    pub info: String,
    pub notifications: NotificationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parses_every_symbol() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
        }
        assert_eq!(" / ".parse::<Operator>().unwrap(), Operator::Divide);
    }

    #[test]
    fn test_operator_rejects_unknown_symbol() {
        let err = "%".parse::<Operator>().unwrap_err();
        assert_eq!(err, ParseOperatorError("%".to_string()));
        assert!("".parse::<Operator>().is_err());
        assert!("plus".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Operator::Multiply).unwrap(), "\"*\"");
        let op: Operator = serde_json::from_str("\"-\"").unwrap();
        assert_eq!(op, Operator::Subtract);
        assert!(serde_json::from_str::<Operator>("\"^\"").is_err());
    }

    #[test]
    fn test_record_uses_column_names_on_the_wire() {
        let record = CalculationRecord {
            id: 1,
            timestamp: "2023-01-01T00:00:00".to_string(),
            operand_a: 3.0,
            operator: Operator::Add,
            operand_b: 4.0,
            result: 7.0,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["a"], 3.0);
        assert_eq!(json["op"], "+");
        assert_eq!(json["b"], 4.0);
        assert_eq!(json["result"], 7.0);
    }

    #[test]
    fn test_weather_summary_format() {
        let report = WeatherReport {
            city: "London".to_string(),
            description: "light rain".to_string(),
            temperature: 12.5,
        };
        assert_eq!(report.summary(), "London: light rain, 12.5°C");
    }

    #[test]
    fn test_delivery_status_wire_format() {
        let json = serde_json::to_value(DeliveryStatus::Skipped("no config".into())).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["detail"], "no config");
        assert!(DeliveryStatus::Sent.is_sent());
        assert!(!DeliveryStatus::Failed("x".into()).is_sent());
    }
}
