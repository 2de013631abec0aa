//! Named purchase plans and sample tiers for pricing tables.

use serde::{Deserialize, Serialize};

use super::{FIRST_TIER_CREDITS, PricingQuote, STANDARD_SCHEDULE};

/// Quantities shown in the pricing table.
pub const SAMPLE_TIER_CREDITS: [u32; 7] = [300, 1_000, 2_100, 5_000, 10_000, 25_000, 50_000];

pub const FIXED_PLAN_NAME: &str = "Starter Pack";
pub const FIXED_PLAN_CREDITS: u32 = FIRST_TIER_CREDITS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub credits: u32,
    pub pricing: PricingQuote,
    pub recommended: bool,
}

/// The recommended fixed-size plan, priced at the first discount tier.
pub fn fixed_plan() -> Plan {
    Plan {
        name: FIXED_PLAN_NAME.to_string(),
        credits: FIXED_PLAN_CREDITS,
        pricing: STANDARD_SCHEDULE.quote(FIXED_PLAN_CREDITS),
        recommended: true,
    }
}

pub fn sample_tiers() -> Vec<PricingQuote> {
    SAMPLE_TIER_CREDITS
        .iter()
        .map(|&credits| STANDARD_SCHEDULE.quote(credits))
        .collect()
}
