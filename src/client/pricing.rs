//! `/pricing` endpoints plus the offline preview.

use serde::Deserialize;

use super::{ApiRequest, Client};
use crate::pricing::{MAX_CREDITS, MIN_CREDITS, PricingQuote, STANDARD_SCHEDULE};
use crate::types::{DiscountRules, PricingPlans};
use crate::{Error, Result};

#[derive(Deserialize)]
struct QuoteEnvelope {
    pricing: PricingQuote,
}

pub struct PricingClient<'a> {
    client: &'a Client,
}

impl<'a> PricingClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Server-computed quote, the one checkout will charge.
    pub async fn calculate(&self, credits: u32) -> Result<PricingQuote> {
        check_purchasable(credits)?;
        let request = ApiRequest::get(["pricing", "calculate"]).query("credits", credits);
        let envelope: QuoteEnvelope = self.client.execute(request).await?;
        Ok(envelope.pricing)
    }

    pub async fn plans(&self) -> Result<PricingPlans> {
        self.client.execute(ApiRequest::get(["pricing", "plans"])).await
    }

    /// Discount rules; with `credits`, also the server's discount for that
    /// quantity. Needs no session.
    pub async fn discount(&self, credits: Option<u32>) -> Result<DiscountRules> {
        let mut request = ApiRequest::get(["pricing", "discount"]);
        if let Some(credits) = credits.filter(|&c| c > 0) {
            request = request.query("credits", credits);
        }
        self.client.execute_public(request).await
    }

    /// Local quote against the standard schedule. No I/O.
    pub fn preview(&self, credits: u32) -> PricingQuote {
        STANDARD_SCHEDULE.quote(credits)
    }
}

pub(crate) fn check_purchasable(credits: u32) -> Result<()> {
    if STANDARD_SCHEDULE.contains(credits) {
        Ok(())
    } else {
        Err(Error::invalid_request(format!(
            "credits must be between {MIN_CREDITS} and {MAX_CREDITS}, got {credits}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_purchasable_range() {
        assert!(check_purchasable(300).is_ok());
        assert!(check_purchasable(50_000).is_ok());
        assert!(matches!(
            check_purchasable(299),
            Err(Error::InvalidRequest(_))
        ));
        assert!(check_purchasable(50_001).is_err());
    }

    #[test]
    fn test_preview_is_local() {
        let client = Client::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        assert_eq!(client.pricing().preview(10_000).final_price, dec!(8760));
    }
}
