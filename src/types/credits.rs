//! Credit balance and ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub credits: i64,
    pub daily_free_credits: i64,
}

impl CreditBalance {
    pub fn total(&self) -> i64 {
        self.credits + self.daily_free_credits
    }

    /// Whether a job costing `cost` credits can be submitted.
    pub fn covers(&self, cost: u32) -> bool {
        self.total() >= i64::from(cost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Usage,
    Purchase,
    Free,
    Refund,
    AdminAdjustment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Signed change; usage is negative.
    pub credits: i64,
    pub balance_after: i64,
    pub description: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance() {
        let balance = CreditBalance {
            credits: 1,
            daily_free_credits: 0,
        };
        assert!(balance.covers(1));
        assert!(!balance.covers(2));
    }

    #[test]
    fn test_parse_transactions() {
        let json = r#"[
            {"id":"t1","type":"purchase","credits":2100,"balance_after":2100,
             "description":"Purchased 2100 credits","created_at":"2025-03-01T10:00:00"},
            {"id":"t2","type":"usage","credits":-2,"balance_after":2098,
             "description":"Try-on (full)","created_at":"2025-03-01T10:05:00"},
            {"id":"t3","type":"admin_adjustment","credits":5,"balance_after":2103,
             "description":"Goodwill","created_at":"2025-03-02T00:00:00"}
        ]"#;

        let txs: Vec<CreditTransaction> = serde_json::from_str(json).unwrap();
        assert_eq!(txs[0].kind, TransactionType::Purchase);
        assert_eq!(txs[1].credits, -2);
        assert_eq!(txs[2].kind, TransactionType::AdminAdjustment);
    }
}
