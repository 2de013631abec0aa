//! `/invoices` endpoints.

use serde::Deserialize;

use super::{ApiRequest, Client, require_id};
use crate::Result;
use crate::types::Invoice;

#[derive(Deserialize)]
struct InvoiceListEnvelope {
    invoices: Vec<Invoice>,
}

#[derive(Deserialize)]
struct InvoiceEnvelope {
    invoice: Invoice,
}

pub struct InvoicesClient<'a> {
    client: &'a Client,
}

impl<'a> InvoicesClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Newest first.
    pub async fn list(&self, limit: u32, skip: u32) -> Result<Vec<Invoice>> {
        let request = ApiRequest::get(["invoices"])
            .query("limit", limit)
            .query("skip", skip);
        let envelope: InvoiceListEnvelope = self.client.execute(request).await?;
        Ok(envelope.invoices)
    }

    /// Another user's invoice is rejected with 403.
    pub async fn get(&self, invoice_id: &str) -> Result<Invoice> {
        let invoice_id = require_id("invoice", invoice_id)?;
        let envelope: InvoiceEnvelope = self
            .client
            .execute(ApiRequest::get(["invoices", invoice_id]))
            .await?;
        Ok(envelope.invoice)
    }
}
