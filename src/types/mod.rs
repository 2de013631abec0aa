//! Request and response models for the TrailRoom REST API.

mod analytics;
mod credits;
mod image;
mod invoice;
mod job;
mod payment;
pub(crate) mod timestamp;
mod user;
mod webhook;

pub use analytics::{CreditUsage, DailyCredits, DailyRequests, EndpointStats, Period, UsageStats};
pub use credits::{CreditBalance, CreditTransaction, TransactionType};
pub use image::{ImageInput, MAX_IMAGE_BYTES};
pub use invoice::{Invoice, InvoiceLineItem, InvoiceStatus};
pub use job::{
    BatchItem, BatchJob, BatchJobStatus, JobHistory, JobStatus, MAX_BATCH_SIZE, TryOnJob,
    TryOnMode, TryOnRequest,
};
pub use payment::{
    CalculatedDiscount, CustomPlan, DiscountInfo, DiscountRules, Payment, PaymentOrder,
    PaymentStatus, PaymentVerification, PricingPlans, VerificationStatus, VerifyPaymentRequest,
};
pub use user::{AuthProvider, AuthResponse, GoogleAuthUrl, RegisterRequest, User, UserRole};
pub use webhook::{
    CreateWebhookRequest, DeliveryStatus, SupportedEvents, UpdateWebhookRequest, Webhook,
    WebhookDelivery,
};

use serde::Deserialize;

/// `{"message": "..."}` acknowledgements from delete/logout endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
