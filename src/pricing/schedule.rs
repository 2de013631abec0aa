//! Volume discount schedule for credit purchases.
//!
//! Three regimes: no discount below the first paid tier, linear interpolation
//! between the first tier and the cap, and a flat cap at or above the cap.
//! Interpolated discounts are truncated to one decimal place so a preview can
//! never show a larger discount than the one that will be charged.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::PricingQuote;
use crate::config::{ConfigError, ConfigResult};

pub const MIN_CREDITS: u32 = 300;
pub const MAX_CREDITS: u32 = 50_000;
pub const FIRST_TIER_CREDITS: u32 = 2_100;
pub const FIRST_TIER_DISCOUNT: Decimal = dec!(10);
pub const MAX_TIER_CREDITS: u32 = 50_000;
pub const MAX_DISCOUNT: Decimal = dec!(25);

/// Published schedule: 0% below 2,100 credits, 10% at 2,100, 25% from 50,000.
pub const STANDARD_SCHEDULE: DiscountSchedule = DiscountSchedule {
    min_credits: MIN_CREDITS,
    max_credits: MAX_CREDITS,
    first_tier_credits: FIRST_TIER_CREDITS,
    first_tier_discount: FIRST_TIER_DISCOUNT,
    max_tier_credits: MAX_TIER_CREDITS,
    max_discount: MAX_DISCOUNT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountSchedule {
    min_credits: u32,
    max_credits: u32,
    first_tier_credits: u32,
    first_tier_discount: Decimal,
    max_tier_credits: u32,
    max_discount: Decimal,
}

impl DiscountSchedule {
    pub fn builder() -> DiscountScheduleBuilder {
        DiscountScheduleBuilder::new()
    }

    pub fn min_credits(&self) -> u32 {
        self.min_credits
    }

    pub fn max_credits(&self) -> u32 {
        self.max_credits
    }

    pub fn first_tier_credits(&self) -> u32 {
        self.first_tier_credits
    }

    pub fn first_tier_discount(&self) -> Decimal {
        self.first_tier_discount
    }

    pub fn max_tier_credits(&self) -> u32 {
        self.max_tier_credits
    }

    pub fn max_discount(&self) -> Decimal {
        self.max_discount
    }

    /// Discount percentage for `credits`, truncated to one decimal place.
    ///
    /// Both anchors are explicit branches so they come out exact instead of
    /// landing a hair below through interpolation.
    pub fn discount_percent(&self, credits: Decimal) -> Decimal {
        let first = Decimal::from(self.first_tier_credits);
        let cap = Decimal::from(self.max_tier_credits);

        if credits < first {
            Decimal::ZERO
        } else if credits == first {
            self.first_tier_discount
        } else if credits >= cap {
            self.max_discount
        } else {
            let raw = self.interpolate(credits);
            (raw * dec!(10)).floor() / dec!(10)
        }
    }

    /// Interpolated discount before truncation.
    ///
    /// Matches [`discount_percent`](Self::discount_percent) outside the
    /// interpolated segment.
    pub fn raw_discount_percent(&self, credits: Decimal) -> Decimal {
        let first = Decimal::from(self.first_tier_credits);
        let cap = Decimal::from(self.max_tier_credits);

        if credits < first {
            Decimal::ZERO
        } else if credits == first {
            self.first_tier_discount
        } else if credits >= cap {
            self.max_discount
        } else {
            self.interpolate(credits)
        }
    }

    fn interpolate(&self, credits: Decimal) -> Decimal {
        let first = Decimal::from(self.first_tier_credits);
        let range_credits = Decimal::from(self.max_tier_credits - self.first_tier_credits);
        let range_discount = self.max_discount - self.first_tier_discount;
        self.first_tier_discount + (credits - first) / range_credits * range_discount
    }

    pub fn quote(&self, credits: impl Into<Decimal>) -> PricingQuote {
        let credits = credits.into();
        PricingQuote::from_discount(credits, self.discount_percent(credits))
    }

    /// Bound an arbitrary user-entered quantity to the purchasable range.
    pub fn clamp_credits(&self, requested: i64) -> u32 {
        let bounded = requested.clamp(i64::from(self.min_credits), i64::from(self.max_credits));
        u32::try_from(bounded).unwrap_or(self.min_credits)
    }

    pub fn contains(&self, credits: u32) -> bool {
        (self.min_credits..=self.max_credits).contains(&credits)
    }

    /// Credits still needed to reach the first discounted tier.
    pub fn credits_until_discount(&self, credits: Decimal) -> Option<Decimal> {
        let first = Decimal::from(self.first_tier_credits);
        (credits < first).then(|| first - credits)
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        STANDARD_SCHEDULE
    }
}

#[derive(Debug, Clone)]
pub struct DiscountScheduleBuilder {
    schedule: DiscountSchedule,
}

impl DiscountScheduleBuilder {
    pub fn new() -> Self {
        Self {
            schedule: STANDARD_SCHEDULE,
        }
    }

    pub fn credit_range(mut self, min: u32, max: u32) -> Self {
        self.schedule.min_credits = min;
        self.schedule.max_credits = max;
        self
    }

    pub fn first_tier(mut self, credits: u32, discount: Decimal) -> Self {
        self.schedule.first_tier_credits = credits;
        self.schedule.first_tier_discount = discount;
        self
    }

    pub fn max_tier(mut self, credits: u32, discount: Decimal) -> Self {
        self.schedule.max_tier_credits = credits;
        self.schedule.max_discount = discount;
        self
    }

    /// Validate the anchors. A schedule that passes is non-decreasing in credits.
    pub fn build(self) -> ConfigResult<DiscountSchedule> {
        let s = self.schedule;

        if s.min_credits > s.max_credits {
            return Err(invalid(
                "pricing.credit_range",
                format!("min {} exceeds max {}", s.min_credits, s.max_credits),
            ));
        }
        if s.first_tier_credits >= s.max_tier_credits {
            return Err(invalid(
                "pricing.first_tier",
                format!(
                    "first tier at {} credits must be below the cap at {}",
                    s.first_tier_credits, s.max_tier_credits
                ),
            ));
        }
        if s.first_tier_discount < Decimal::ZERO {
            return Err(invalid(
                "pricing.first_tier",
                format!("discount {} is negative", s.first_tier_discount),
            ));
        }
        if s.first_tier_discount > s.max_discount || s.max_discount > dec!(100) {
            return Err(invalid(
                "pricing.max_tier",
                format!(
                    "discounts must satisfy {} <= {} <= 100",
                    s.first_tier_discount, s.max_discount
                ),
            ));
        }

        Ok(s)
    }
}

impl Default for DiscountScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}
