//! Signal request submission
//!
//! A signal request is an opaque work item handed to an external sink (a
//! Supabase REST table) for the analysis core to pick up.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::SignalSinkConfig;
use crate::models::Plan;
use crate::utils::errors::{Result, UiBotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    LatestSignal,
    Long,
    Short,
}

impl RequestType {
    pub fn code(&self) -> &'static str {
        match self {
            RequestType::LatestSignal => "latest_signal",
            RequestType::Long => "long",
            RequestType::Short => "short",
        }
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "latest_signal" => Ok(RequestType::LatestSignal),
            "long" => Ok(RequestType::Long),
            "short" => Ok(RequestType::Short),
            other => Err(format!("unknown request type: {}", other)),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which plans may submit which request types
pub trait Entitlement: Send + Sync {
    fn allows(&self, plan: Plan, request: RequestType) -> bool;
}

/// Long and short signals need their own plan (or an all-access one)
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanEntitlement;

impl Entitlement for PlanEntitlement {
    fn allows(&self, plan: Plan, request: RequestType) -> bool {
        match request {
            RequestType::LatestSignal => plan.is_paid(),
            RequestType::Long => matches!(plan, Plan::Long | Plan::Vip | Plan::Pro),
            RequestType::Short => matches!(plan, Plan::Short | Plan::Vip | Plan::Pro),
        }
    }
}

/// Any paid plan may request any signal
#[derive(Debug, Clone, Copy, Default)]
pub struct PaidPlanEntitlement;

impl Entitlement for PaidPlanEntitlement {
    fn allows(&self, plan: Plan, _request: RequestType) -> bool {
        plan.is_paid()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub user_id: i64,
    pub request_type: RequestType,
    pub status: String,
}

impl WorkItem {
    pub fn pending(user_id: i64, request_type: RequestType) -> Self {
        Self {
            user_id,
            request_type,
            status: "pending".to_string(),
        }
    }
}

/// External work-submission sink
#[async_trait]
pub trait WorkSink: Send + Sync {
    async fn submit(&self, item: &WorkItem) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}

/// [`WorkSink`] inserting rows through the Supabase REST API
#[derive(Debug, Clone)]
pub struct SupabaseSink {
    client: reqwest::Client,
    table_url: String,
}

impl SupabaseSink {
    /// Build the sink when both the URL and the key are configured
    pub fn from_config(config: &SignalSinkConfig) -> Result<Option<Self>> {
        let (Some(url), Some(key)) = (&config.url, &config.key) else {
            return Ok(None);
        };
        if !config.is_configured() {
            return Ok(None);
        }

        let base = url::Url::parse(url)?;
        let table_url = format!("{}/rest/v1/{}", base.as_str().trim_end_matches('/'), config.table);

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).map_err(|e| UiBotError::Config(format!("Invalid Supabase key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| UiBotError::Config(format!("Invalid Supabase key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        info!(table = %config.table, "Supabase signal sink configured");
        Ok(Some(Self { client, table_url }))
    }
}

#[async_trait]
impl WorkSink for SupabaseSink {
    async fn submit(&self, item: &WorkItem) -> Result<()> {
        debug!(user_id = item.user_id, request_type = %item.request_type, "Submitting signal request");

        let response = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(item)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "Signal sink rejected request");
            return Err(UiBotError::ServiceUnavailable(format!("signal sink returned {}", status)));
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UiBotError::ServiceUnavailable(format!(
                "signal sink health check returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
