//! Crypto payment provider
//!
//! Only the stub provider exists: it hands out payment ids and links but never
//! observes a settlement, so every status check reports `pending`.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::config::PaymentsConfig;
use crate::models::{CryptoPayment, PaymentStatus, Plan};
use crate::utils::errors::{Result, UiBotError};

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_payment(&self, user_id: i64, plan: Plan, amount: f64, currency: &str) -> Result<CryptoPayment>;

    async fn check_status(&self, payment_id: &str) -> Result<PaymentStatus>;
}

impl PaymentsConfig {
    /// Price of a purchasable plan in the settlement asset
    pub fn price_for(&self, plan: Plan) -> Option<f64> {
        match plan {
            Plan::Long => Some(self.long_price),
            Plan::Short => Some(self.short_price),
            Plan::Vip => Some(self.vip_price),
            Plan::Free | Plan::Pro => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CryptoPaymentStub {
    pay_url_base: String,
}

impl CryptoPaymentStub {
    pub fn new(config: &PaymentsConfig) -> Self {
        Self {
            pay_url_base: config.pay_url_base.trim_end_matches('/').to_string(),
        }
    }

    fn generate_payment_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("cp_{}", &hex[..16])
    }
}

#[async_trait]
impl PaymentProvider for CryptoPaymentStub {
    async fn create_payment(&self, user_id: i64, plan: Plan, amount: f64, currency: &str) -> Result<CryptoPayment> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(UiBotError::InvalidInput(format!("invalid payment amount: {}", amount)));
        }

        let payment_id = Self::generate_payment_id();
        let payment = CryptoPayment {
            pay_url: Some(format!("{}/{}", self.pay_url_base, payment_id)),
            payment_id,
            user_id,
            plan,
            amount,
            currency: currency.to_string(),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        };

        info!(user_id, plan = %plan, payment_id = %payment.payment_id, amount, "Crypto payment created");
        Ok(payment)
    }

    async fn check_status(&self, _payment_id: &str) -> Result<PaymentStatus> {
        Ok(PaymentStatus::Pending)
    }
}
