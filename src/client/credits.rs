//! `/credits` endpoints.

use super::{ApiRequest, Client};
use crate::Result;
use crate::types::{CreditBalance, CreditTransaction};

pub struct CreditsClient<'a> {
    client: &'a Client,
}

impl<'a> CreditsClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn balance(&self) -> Result<CreditBalance> {
        self.client.execute(ApiRequest::get(["credits"])).await
    }

    /// Most recent first; the server defaults to 100 when `limit` is `None`.
    pub async fn transactions(&self, limit: Option<u32>) -> Result<Vec<CreditTransaction>> {
        let mut request = ApiRequest::get(["credits", "transactions"]);
        if let Some(limit) = limit {
            request = request.query("limit", limit);
        }
        self.client.execute(request).await
    }
}
