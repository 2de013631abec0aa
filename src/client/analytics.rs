//! `/analytics` endpoints.

use super::{ApiRequest, Client};
use crate::types::{CreditUsage, EndpointStats, Period, UsageStats};
use crate::{Error, Result};

pub struct AnalyticsClient<'a> {
    client: &'a Client,
}

impl<'a> AnalyticsClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Request totals and daily breakdown. Accepts 1d, 7d or 30d.
    pub async fn usage(&self, period: Period) -> Result<UsageStats> {
        check_period(period, period.supports_requests(), "usage")?;
        let request = ApiRequest::get(["analytics", "usage"]).query("period", period);
        self.client.execute(request).await
    }

    /// Credits used, purchased and granted per day. Accepts 7d, 30d or 90d.
    pub async fn credits(&self, period: Period) -> Result<CreditUsage> {
        check_period(period, period.supports_credits(), "credit usage")?;
        let request = ApiRequest::get(["analytics", "credits"]).query("period", period);
        self.client.execute(request).await
    }

    /// Busiest endpoints first. Accepts 1d, 7d or 30d.
    pub async fn endpoints(&self, period: Period) -> Result<Vec<EndpointStats>> {
        check_period(period, period.supports_requests(), "endpoint")?;
        let request = ApiRequest::get(["analytics", "endpoints"]).query("period", period);
        self.client.execute(request).await
    }
}

fn check_period(period: Period, supported: bool, report: &str) -> Result<()> {
    if supported {
        Ok(())
    } else {
        Err(Error::invalid_request(format!(
            "{report} statistics are not available for period {period}"
        )))
    }
}
