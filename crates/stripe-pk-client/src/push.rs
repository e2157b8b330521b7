//! Pushes Stripe keys to many sites through their settings endpoint.

use futures::stream::{self, StreamExt};
use serde::Serialize;

use stripe_pk_core::{
    PublishableKey, SecretKey, SettingUpdate, PUBLISHABLE_KEY_SETTING_PATH, SECRET_KEY_SETTING_PATH,
};

use crate::sites::{site_url, SiteClient};

/// Default number of sites pushed to concurrently.
pub const DEFAULT_PUSH_CONCURRENCY: usize = 10;

/// Result of pushing the key to one site.
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    /// Site base URL.
    pub site: String,
    /// The site answered 200.
    pub ok: bool,
    /// Response body, or a synthesized description of the failure.
    pub body: serde_json::Value,
}

/// Results of a push across sites.
#[derive(Debug, Clone, Serialize)]
pub struct PushSummary {
    /// Per-site outcomes, in completion order.
    pub outcomes: Vec<PushOutcome>,
    /// Sites that accepted the key.
    pub succeeded: usize,
    /// Sites that did not.
    pub failed: usize,
}

impl PushOutcome {
    fn failed(site: &str, body: serde_json::Value) -> Self {
        Self {
            site: site.to_string(),
            ok: false,
            body,
        }
    }
}

impl PushSummary {
    fn from_outcomes(outcomes: Vec<PushOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.ok).count();
        Self {
            failed: outcomes.len() - succeeded,
            succeeded,
            outcomes,
        }
    }

    /// Outcomes of sites that rejected the key.
    pub fn failures(&self) -> impl Iterator<Item = &PushOutcome> {
        self.outcomes.iter().filter(|o| !o.ok)
    }
}

impl SiteClient {
    /// `PUT /api/export/settings/stripe_publishable_key` on `site`.
    pub async fn push_publishable_key(
        &self,
        site: &str,
        key: &PublishableKey,
        master_key: &str,
    ) -> PushOutcome {
        self.push_setting(
            site,
            PUBLISHABLE_KEY_SETTING_PATH,
            key.as_str(),
            &key.redacted(),
            master_key,
        )
        .await
    }

    /// `PUT /api/export/settings/stripe_secret_key` on `site`.
    ///
    /// Only the masked key is ever logged.
    pub async fn push_secret_key(
        &self,
        site: &str,
        key: &SecretKey,
        master_key: &str,
    ) -> PushOutcome {
        self.push_setting(
            site,
            SECRET_KEY_SETTING_PATH,
            key.expose(),
            &key.masked(),
            master_key,
        )
        .await
    }

    /// PUT `{"value": value}` to a settings path. `shown` stands in for the
    /// value in logs.
    async fn push_setting(
        &self,
        site: &str,
        setting_path: &str,
        value: &str,
        shown: &str,
        master_key: &str,
    ) -> PushOutcome {
        let update = SettingUpdate {
            value: Some(value.to_string()),
        };

        let result = self
            .client
            .put(site_url(site, setting_path))
            .header("x-api-key", master_key)
            .json(&update)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%site, path = setting_path, error = %e, "Setting push failed");
                return PushOutcome::failed(site, serde_json::json!({ "error": e.to_string() }));
            }
        };

        let status = response.status();
        let body: serde_json::Value = match response.text().await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|_| {
                serde_json::json!({ "status_code": status.as_u16(), "text": text })
            }),
            Err(e) => {
                serde_json::json!({ "status_code": status.as_u16(), "error": e.to_string() })
            }
        };

        let ok = status == reqwest::StatusCode::OK;
        if ok {
            tracing::info!(%site, path = setting_path, value = shown, "Setting pushed");
        } else {
            tracing::warn!(
                %site,
                path = setting_path,
                status = status.as_u16(),
                %body,
                "Site rejected setting push"
            );
        }

        PushOutcome {
            site: site.to_string(),
            ok,
            body,
        }
    }

    /// Push `key` to every site, at most `concurrency` requests in flight.
    pub async fn push_to_sites(
        &self,
        sites: &[String],
        key: &PublishableKey,
        master_key: &str,
        concurrency: usize,
    ) -> PushSummary {
        let outcomes = stream::iter(sites)
            .map(|site| self.push_publishable_key(site, key, master_key))
            .buffer_unordered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        PushSummary::from_outcomes(outcomes)
    }

    /// Push a secret key to every site, at most `concurrency` requests in flight.
    pub async fn push_secret_to_sites(
        &self,
        sites: &[String],
        key: &SecretKey,
        master_key: &str,
        concurrency: usize,
    ) -> PushSummary {
        let outcomes = stream::iter(sites)
            .map(|site| self.push_secret_key(site, key, master_key))
            .buffer_unordered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        PushSummary::from_outcomes(outcomes)
    }
}
