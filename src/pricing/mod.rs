//! Tiered credit pricing.
//!
//! Pure, deterministic price previews for credit purchases. The quote computed
//! here is informational: checkout submits only the credit count and the
//! server recomputes the charged amount.

mod display;
mod plans;
mod quote;
mod schedule;

pub use display::{CurrencyFormat, QuoteDisplay};
pub use plans::{
    FIXED_PLAN_CREDITS, FIXED_PLAN_NAME, Plan, SAMPLE_TIER_CREDITS, fixed_plan, sample_tiers,
};
pub use quote::PricingQuote;
pub use schedule::{
    DiscountSchedule, DiscountScheduleBuilder, FIRST_TIER_CREDITS, FIRST_TIER_DISCOUNT,
    MAX_CREDITS, MAX_DISCOUNT, MAX_TIER_CREDITS, MIN_CREDITS, STANDARD_SCHEDULE,
};

use rust_decimal::Decimal;

/// Discount percentage for `credits` under the standard schedule.
pub fn discount_percent(credits: impl Into<Decimal>) -> Decimal {
    STANDARD_SCHEDULE.discount_percent(credits.into())
}
