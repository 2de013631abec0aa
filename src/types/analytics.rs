//! Per-user usage statistics.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reporting window for the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "1d",
            Period::Week => "7d",
            Period::Month => "30d",
            Period::Quarter => "90d",
        }
    }

    /// Windows accepted by request statistics.
    pub fn supports_requests(self) -> bool {
        matches!(self, Period::Day | Period::Week | Period::Month)
    }

    /// Windows accepted by the credit usage report.
    pub fn supports_credits(self) -> bool {
        matches!(self, Period::Week | Period::Month | Period::Quarter)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRequests {
    pub date: NaiveDate,
    pub requests: u64,
    pub credits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_credits_used: u64,
    /// Milliseconds.
    pub average_response_time: f64,
    #[serde(with = "super::timestamp")]
    pub period_start: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub period_end: DateTime<Utc>,
    #[serde(default)]
    pub daily_breakdown: Vec<DailyRequests>,
}

impl UsageStats {
    /// Share of 2xx responses, 0 when there were no requests.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCredits {
    pub date: NaiveDate,
    pub used: u64,
    pub purchased: u64,
    pub free: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditUsage {
    pub period: Period,
    #[serde(with = "super::timestamp")]
    pub period_start: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub period_end: DateTime<Utc>,
    #[serde(default)]
    pub daily_breakdown: Vec<DailyCredits>,
}

impl CreditUsage {
    pub fn total_used(&self) -> u64 {
        self.daily_breakdown.iter().map(|day| day.used).sum()
    }

    pub fn total_purchased(&self) -> u64 {
        self.daily_breakdown.iter().map(|day| day.purchased).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStats {
    pub endpoint: String,
    pub total_requests: u64,
    /// Percent, 0 to 100.
    pub success_rate: f64,
    pub average_response_time: f64,
    pub credits_used: u64,
}
