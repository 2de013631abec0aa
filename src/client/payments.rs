//! `/payments` endpoints.
//!
//! Checkout submits only the credit count; the charged amount is whatever the
//! server computes, never a locally previewed quote.

use serde::{Deserialize, Serialize};

use super::pricing::check_purchasable;
use super::{ApiRequest, Client, require_id};
use crate::Result;
use crate::types::{Payment, PaymentOrder, PaymentVerification, VerifyPaymentRequest};

#[derive(Serialize)]
struct CreateOrderRequest {
    credits: u32,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    order: PaymentOrder,
}

#[derive(Deserialize)]
struct VerificationEnvelope {
    result: PaymentVerification,
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    payments: Vec<Payment>,
}

#[derive(Deserialize)]
struct PaymentEnvelope {
    payment: Payment,
}

pub struct PaymentsClient<'a> {
    client: &'a Client,
}

impl<'a> PaymentsClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create_order(&self, credits: u32) -> Result<PaymentOrder> {
        check_purchasable(credits)?;
        let request =
            ApiRequest::post(["payments", "create-order"]).json(&CreateOrderRequest { credits })?;
        let envelope: OrderEnvelope = self.client.execute(request).await?;
        tracing::debug!(
            order_id = %envelope.order.order_id,
            credits,
            amount = envelope.order.amount,
            "payment order created"
        );
        Ok(envelope.order)
    }

    /// Forwards the gateway callback for signature verification. Verifying an
    /// already processed payment succeeds with `already_processed`.
    pub async fn verify(&self, verification: &VerifyPaymentRequest) -> Result<PaymentVerification> {
        let request = ApiRequest::post(["payments", "verify"]).json(verification)?;
        let envelope: VerificationEnvelope = self.client.execute(request).await?;
        Ok(envelope.result)
    }

    pub async fn history(&self, limit: u32, skip: u32) -> Result<Vec<Payment>> {
        let request = ApiRequest::get(["payments", "history"])
            .query("limit", limit)
            .query("skip", skip);
        let envelope: HistoryEnvelope = self.client.execute(request).await?;
        Ok(envelope.payments)
    }

    pub async fn get(&self, payment_id: &str) -> Result<Payment> {
        let payment_id = require_id("payment", payment_id)?;
        let envelope: PaymentEnvelope = self
            .client
            .execute(ApiRequest::get(["payments", payment_id]))
            .await?;
        Ok(envelope.payment)
    }
}
