//! REST operations against the intelligence feed.
//!
//! The feed exposes a Shodan-compatible API: alert subscriptions under
//! `/shodan/alert`, the account profile under `/account/profile`, and
//! the firehose on a separate streaming host.

use serde::{Deserialize, Serialize};

use portwatch_core::{AlertFilters, RegisteredAlert};

use crate::error::{IntelError, Result};
use crate::stream::{EventStream, Firehose};

/// Operations the monitor needs from the intelligence feed.
///
/// The monitor is generic over this trait so its tests can script the
/// remote side without a network.
#[allow(async_fn_in_trait)]
pub trait IntelFeed {
    /// Stream handle returned by [`IntelFeed::open_event_stream`].
    type Stream: EventStream;

    /// List the alert subscriptions registered for this account.
    async fn list_alerts(&self) -> Result<Vec<RegisteredAlert>>;

    /// Register a new alert subscription covering the given networks.
    /// `expires_secs = 0` means the alert never expires. Returns the
    /// remote alert id.
    async fn create_alert(&self, name: &str, networks: &[String], expires_secs: u64)
        -> Result<String>;

    /// Fetch the account profile. Status/diagnostic use only.
    async fn account_profile(&self) -> Result<AccountProfile>;

    /// Open the live banner firehose, scoped to all registered alerts.
    async fn open_event_stream(&self) -> Result<Self::Stream>;
}

/// Account profile as reported by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub member: bool,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub created: Option<String>,
}

/// Body of a create-alert request.
#[derive(Debug, Serialize)]
struct CreateAlertRequest<'a> {
    name: &'a str,
    filters: AlertFilters,
    expires: u64,
}

/// HTTP client for the feed's REST API and firehose.
pub struct ShodanClient {
    http: reqwest::Client,
    api_base: String,
    stream_base: String,
    api_key: String,
}

impl ShodanClient {
    pub fn new(api_base: &str, stream_base: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            stream_base: stream_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}?key={}", self.api_base, path, self.api_key)
    }

    fn stream_url(&self, path: &str) -> String {
        format!("{}{}?key={}", self.stream_base, path, self.api_key)
    }

    /// Map non-2xx responses to [`IntelError::Api`].
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(IntelError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

impl IntelFeed for ShodanClient {
    type Stream = Firehose;

    async fn list_alerts(&self) -> Result<Vec<RegisteredAlert>> {
        let resp = self.http.get(self.api_url("/shodan/alert/info")).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn create_alert(
        &self,
        name: &str,
        networks: &[String],
        expires_secs: u64,
    ) -> Result<String> {
        let body = CreateAlertRequest {
            name,
            filters: AlertFilters {
                ip: networks.to_vec(),
            },
            expires: expires_secs,
        };

        let resp = self
            .http
            .post(self.api_url("/shodan/alert"))
            .json(&body)
            .send()
            .await?;

        let created: RegisteredAlert = Self::check(resp).await?.json().await?;
        tracing::debug!(alert = name, id = %created.id, "Alert registered");
        Ok(created.id)
    }

    async fn account_profile(&self) -> Result<AccountProfile> {
        let resp = self.http.get(self.api_url("/account/profile")).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn open_event_stream(&self) -> Result<Firehose> {
        let resp = self.http.get(self.stream_url("/shodan/alert")).send().await?;
        let resp = Self::check(resp).await?;
        tracing::info!("Banner firehose opened");
        Ok(Firehose::new(resp))
    }
}
