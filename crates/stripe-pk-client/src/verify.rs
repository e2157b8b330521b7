//! Checks that sites serve a usable publishable key.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use stripe_pk_core::{
    publishable_key_from_body, KeyMode, StripeHealth, STRIPE_HEALTH_PATH, STRIPE_PK_PATH,
};

use crate::sites::{site_url, SiteClient};

/// Result of probing `/api/stripe-pk` on one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCheck {
    /// A key was served.
    pub ok: bool,
    /// The served key.
    pub key: Option<String>,
    /// Failure reason.
    pub error: Option<String>,
}

impl KeyCheck {
    fn passed(key: String) -> Self {
        Self {
            ok: true,
            key: Some(key),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            key: None,
            error: Some(error.into()),
        }
    }
}

/// Verification results for one site.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    /// Site base URL.
    pub site: String,
    /// When the site was checked.
    pub timestamp: DateTime<Utc>,
    /// Whether the key check passed.
    pub publishable_key_ok: bool,
    /// The served key.
    pub publishable_key: Option<String>,
    /// Health endpoint result, when requested.
    pub health_check_ok: Option<bool>,
    /// Health endpoint body.
    pub health_details: Option<StripeHealth>,
    /// Failures counted against the site.
    pub errors: Vec<String>,
}

impl SiteReport {
    /// Mode of the served key.
    #[must_use]
    pub fn mode(&self) -> Option<KeyMode> {
        self.publishable_key.as_deref().map(KeyMode::from_key)
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Timeout".to_string()
    } else if err.is_connect() {
        "Connection refused".to_string()
    } else {
        err.to_string()
    }
}

impl SiteClient {
    /// Probe `GET /api/stripe-pk` on `site`.
    pub async fn check_publishable_key(&self, site: &str) -> KeyCheck {
        let response = match self.client.get(site_url(site, STRIPE_PK_PATH)).send().await {
            Ok(response) => response,
            Err(e) => return KeyCheck::failed(describe(&e)),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return KeyCheck::failed(format!("HTTP {}", status.as_u16()));
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => match publishable_key_from_body(&body) {
                Some(key) => KeyCheck::passed(key.into()),
                None => KeyCheck::failed("No publishable key in response"),
            },
            Err(e) => KeyCheck::failed(describe(&e)),
        }
    }

    /// Probe `GET /api/health/stripe` on `site`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the endpoint is unavailable.
    pub async fn check_health(&self, site: &str) -> Result<StripeHealth, String> {
        let response = self
            .client
            .get(site_url(site, STRIPE_HEALTH_PATH))
            .send()
            .await
            .map_err(|e| describe(&e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response.json().await.map_err(|e| describe(&e))
    }

    /// Verify one site. Health failures are recorded but not counted as errors.
    pub async fn verify_site(&self, site: &str, check_health: bool) -> SiteReport {
        let check = self.check_publishable_key(site).await;

        let mut errors = Vec::new();
        match (&check.key, &check.error) {
            (Some(key), _) => {
                tracing::info!(
                    %site,
                    key = %stripe_pk_core::redact(key),
                    mode = %KeyMode::from_key(key),
                    "Publishable key OK"
                );
            }
            (None, error) => {
                let reason = error.as_deref().unwrap_or("unknown");
                tracing::warn!(%site, error = %reason, "Publishable key check failed");
                errors.push(format!("Publishable key check failed: {reason}"));
            }
        }

        let (health_check_ok, health_details) = if check_health {
            match self.check_health(site).await {
                Ok(health) => (Some(true), Some(health)),
                Err(reason) => {
                    tracing::debug!(%site, error = %reason, "Health endpoint not available");
                    (Some(false), None)
                }
            }
        } else {
            (None, None)
        };

        SiteReport {
            site: site.to_string(),
            timestamp: Utc::now(),
            publishable_key_ok: check.ok,
            publishable_key: check.key,
            health_check_ok,
            health_details,
            errors,
        }
    }

    /// Verify sites one after another.
    pub async fn verify_sites(&self, sites: &[String], check_health: bool) -> Vec<SiteReport> {
        let mut reports = Vec::with_capacity(sites.len());
        for site in sites {
            reports.push(self.verify_site(site, check_health).await);
        }
        reports
    }
}

/// Aggregate view over [`SiteReport`]s.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationSummary {
    /// Sites checked.
    pub total: usize,
    /// Sites serving a key.
    pub key_ok: usize,
    /// Sites not serving a key.
    pub key_failed: usize,
    /// Sites whose health endpoint was probed.
    pub health_checked: usize,
    /// Sites whose health endpoint answered.
    pub health_ok: usize,
    /// Failed sites with their errors.
    pub failed_sites: Vec<(String, Vec<String>)>,
    /// Number of sites per key mode.
    pub environments: BTreeMap<String, usize>,
}

impl VerificationSummary {
    /// Summarize a batch of reports.
    #[must_use]
    pub fn from_reports(reports: &[SiteReport]) -> Self {
        let key_ok = reports.iter().filter(|r| r.publishable_key_ok).count();

        let mut environments = BTreeMap::new();
        for mode in reports.iter().filter_map(SiteReport::mode) {
            *environments.entry(mode.to_string()).or_insert(0) += 1;
        }

        Self {
            total: reports.len(),
            key_ok,
            key_failed: reports.len() - key_ok,
            health_checked: reports.iter().filter(|r| r.health_check_ok.is_some()).count(),
            health_ok: reports
                .iter()
                .filter(|r| r.health_check_ok == Some(true))
                .count(),
            failed_sites: reports
                .iter()
                .filter(|r| !r.publishable_key_ok)
                .map(|r| (r.site.clone(), r.errors.clone()))
                .collect(),
            environments,
        }
    }

    /// Every site served a key.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.key_failed == 0
    }

    /// Sites disagree on test vs live mode.
    #[must_use]
    pub fn mixed_environments(&self) -> bool {
        self.environments.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(site: &str, key: Option<&str>) -> SiteReport {
        SiteReport {
            site: site.to_string(),
            timestamp: Utc::now(),
            publishable_key_ok: key.is_some(),
            publishable_key: key.map(String::from),
            health_check_ok: None,
            health_details: None,
            errors: if key.is_some() {
                vec![]
            } else {
                vec!["Publishable key check failed: HTTP 404".to_string()]
            },
        }
    }

    #[test]
    fn summary_counts_failures() {
        let reports = vec![
            report("https://a.example", Some("pk_test_1")),
            report("https://b.example", None),
        ];
        let summary = VerificationSummary::from_reports(&reports);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.key_ok, 1);
        assert_eq!(summary.key_failed, 1);
        assert!(!summary.all_ok());
        assert_eq!(summary.failed_sites[0].0, "https://b.example");
        assert!(!summary.mixed_environments());
    }

    #[test]
    fn summary_detects_mixed_environments() {
        let reports = vec![
            report("https://a.example", Some("pk_test_1")),
            report("https://b.example", Some("pk_live_1")),
            report("https://c.example", Some("pk_live_2")),
        ];
        let summary = VerificationSummary::from_reports(&reports);
        assert!(summary.all_ok());
        assert!(summary.mixed_environments());
        assert_eq!(summary.environments.get("live"), Some(&2));
        assert_eq!(summary.environments.get("test"), Some(&1));
    }

    #[test]
    fn health_counts_only_probed_sites() {
        let mut probed = report("https://a.example", Some("pk_test_1"));
        probed.health_check_ok = Some(false);
        let other = report("https://b.example", Some("pk_test_2"));
        let summary = VerificationSummary::from_reports(&[probed, other]);
        assert_eq!(summary.health_checked, 1);
        assert_eq!(summary.health_ok, 0);
    }
}
