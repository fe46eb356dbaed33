use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::money::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

/// What the flow hands over when the conductor presses done.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPayment {
    pub amount: Amount,
    pub phone_number: Option<String>,
}

// History row as shown under the amount screen
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub amount: String,
    pub phone_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub time: String,
    pub status: TransactionStatus,
    pub status_label: &'static str,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        TransactionView {
            id: tx.id.clone(),
            amount: tx.amount.display_ksh(),
            phone_number: tx.phone_number.clone(),
            timestamp: tx.timestamp,
            time: tx.timestamp.format("%I:%M %p").to_string(),
            status: tx.status,
            status_label: tx.status.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction {
            id: "TRX1700000000000".to_string(),
            amount: Amount::parse("150").unwrap(),
            phone_number: Some("0712345678".to_string()),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 0).unwrap(),
            status: TransactionStatus::Completed,
        }
    }

    #[test]
    fn serializes_status_lowercase_and_timestamp_as_rfc3339() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["phoneNumber"], "0712345678");
        assert_eq!(json["timestamp"], "2024-03-01T14:05:00Z");
    }

    #[test]
    fn timestamps_are_rebuilt_on_load() {
        let raw = r#"{"id":"TRX1","amount":"50","timestamp":"2024-03-01T14:05:00.123Z","status":"pending"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.timestamp.timestamp_millis(), 1709301900123);
        assert_eq!(tx.phone_number, None);
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[test]
    fn view_formats_amount_time_and_status() {
        let view = TransactionView::from(&sample());
        assert_eq!(view.amount, "KSh 150.00");
        assert_eq!(view.time, "02:05 PM");
        assert_eq!(view.status_label, "Completed");
    }
}
