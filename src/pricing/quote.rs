//! Computed price preview for a credit quantity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::STANDARD_SCHEDULE;

/// Price breakdown for a credit purchase.
///
/// Never persisted: it is recomputed whenever the selected quantity changes, and
/// the charged amount is always recomputed server-side at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    #[serde(with = "rust_decimal::serde::float")]
    pub credits: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings: Decimal,
}

impl PricingQuote {
    /// Quote against the standard schedule.
    pub fn for_credits(credits: impl Into<Decimal>) -> Self {
        STANDARD_SCHEDULE.quote(credits)
    }

    pub(crate) fn from_discount(credits: Decimal, discount_percent: Decimal) -> Self {
        // 1 currency unit buys 1 credit
        let base_price = credits;
        // base * percent overflows near Decimal::MAX; the factor is at most 1
        let discount_amount = base_price * (discount_percent / dec!(100));
        let final_price = base_price - discount_amount;

        Self {
            credits,
            base_price,
            discount_percent,
            discount_amount,
            final_price,
            savings: discount_amount,
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percent > Decimal::ZERO
    }

    /// Whether the standard schedule's cap has been reached.
    pub fn is_max_discount(&self) -> bool {
        self.discount_percent >= STANDARD_SCHEDULE.max_discount()
    }

    /// Credits still needed before the standard schedule grants any discount.
    pub fn credits_until_discount(&self) -> Option<Decimal> {
        STANDARD_SCHEDULE.credits_until_discount(self.credits)
    }

    /// Final price in the currency's minor unit (paise), truncated.
    pub fn final_price_minor_units(&self) -> i64 {
        let Some(minor) = self.final_price.checked_mul(dec!(100)) else {
            return if self.final_price.is_sign_negative() {
                i64::MIN
            } else {
                i64::MAX
            };
        };
        minor
            .round_dp_with_strategy(0, RoundingStrategy::ToZero)
            .to_i64()
            .unwrap_or(if minor.is_sign_negative() { i64::MIN } else { i64::MAX })
    }
}
