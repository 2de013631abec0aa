//! Checkout orders, verification and payment records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{
    FIRST_TIER_CREDITS, FIRST_TIER_DISCOUNT, MAX_CREDITS, MAX_DISCOUNT, MAX_TIER_CREDITS,
    MIN_CREDITS, Plan, PricingQuote, fixed_plan, sample_tiers,
};

/// Gateway order created by `/payments/create-order`.
///
/// `amount` is what the gateway will charge, in paise, as computed by the
/// server. The embedded `pricing` is the server's quote, not the local preview.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentOrder {
    pub payment_id: String,
    pub order_id: String,
    pub amount: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_inr: Decimal,
    pub currency: String,
    pub credits: u32,
    pub pricing: PricingQuote,
    #[serde(default)]
    pub key_id: Option<String>,
}

/// Gateway callback fields forwarded for server-side signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Success,
    AlreadyProcessed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentVerification {
    pub status: VerificationStatus,
    pub payment_id: String,
    #[serde(default)]
    pub credits_added: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub invoice_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Refunded
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub credits_purchased: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "super::timestamp::option")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, with = "super::timestamp::option")]
    pub refunded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPlan {
    pub name: String,
    pub min_credits: u32,
    pub max_credits: u32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountInfo {
    pub min_threshold: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_discount: Decimal,
    pub max_discount_threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedDiscount {
    pub credits: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
}

/// Body of `/pricing/discount`: human-readable rules plus, when credits were
/// given, the server's discount for them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscountRules {
    #[serde(rename = "discount_rules")]
    pub rules: BTreeMap<String, String>,
    #[serde(default)]
    pub calculated_discount: Option<CalculatedDiscount>,
}

/// Body of `/pricing/plans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlans {
    pub fixed_plan: Plan,
    pub custom_plan: CustomPlan,
    pub pricing_tiers: Vec<PricingQuote>,
    pub discount_info: DiscountInfo,
}

impl PricingPlans {
    /// The same catalogue built offline from the standard schedule.
    pub fn local() -> Self {
        Self {
            fixed_plan: fixed_plan(),
            custom_plan: CustomPlan {
                name: "Custom Plan".to_string(),
                min_credits: MIN_CREDITS,
                max_credits: MAX_CREDITS,
                description: "Choose any amount between 300 and 50,000 credits".to_string(),
            },
            pricing_tiers: sample_tiers(),
            discount_info: DiscountInfo {
                min_threshold: FIRST_TIER_CREDITS,
                min_discount: FIRST_TIER_DISCOUNT,
                max_discount: MAX_DISCOUNT,
                max_discount_threshold: MAX_TIER_CREDITS,
            },
        }
    }
}
