//! Implementation of the `stripe-pk verify` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use stripe_pk_client::{
    load_sites, redact, SiteClient, SiteReport, VerificationSummary,
    DEFAULT_SITE_TIMEOUT_SECONDS,
};

use crate::output::{output, CommandOutput};

#[derive(Args, Debug)]
#[group(id = "source", required = true, multiple = false, args = ["site", "sites_file"])]
pub struct VerifyArgs {
    /// Verify a single site
    #[arg(long)]
    pub site: Option<String>,

    /// File containing site URLs (one per line, # for comments)
    #[arg(long)]
    pub sites_file: Option<PathBuf>,

    /// Also check /api/health/stripe
    #[arg(long)]
    pub check_health: bool,

    /// Save per-site results to a JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_SITE_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Only show the summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub reports: Vec<SiteReport>,
    pub summary: VerificationSummary,
    #[serde(skip)]
    pub quiet: bool,
}

impl CommandOutput for VerifyOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        if !self.quiet {
            for report in &self.reports {
                lines.push(format!("\n{}", report.site));
                match &report.publishable_key {
                    Some(key) => lines.push(format!(
                        "  Publishable key: OK {} ({})",
                        redact(key),
                        report.mode().map(|m| m.to_string()).unwrap_or_default()
                    )),
                    None => {
                        lines.push("  Publishable key: FAILED".to_string());
                        for error in &report.errors {
                            lines.push(format!("    {error}"));
                        }
                    }
                }
                match (&report.health_check_ok, &report.health_details) {
                    (Some(true), Some(health)) => lines.push(format!(
                        "  Health: publishable={} secret={} environment={}",
                        health.publishable_key_configured,
                        health.secret_key_configured,
                        health.environment
                    )),
                    (Some(_), _) => lines.push("  Health: not available".to_string()),
                    (None, _) => {}
                }
            }
        }

        let summary = &self.summary;
        lines.push(String::new());
        lines.push(format!("Total sites checked: {}", summary.total));
        lines.push(format!("Publishable key OK: {}", summary.key_ok));
        lines.push(format!("Publishable key FAILED: {}", summary.key_failed));
        if summary.health_checked > 0 {
            lines.push(format!(
                "Health check available: {}/{}",
                summary.health_ok, summary.health_checked
            ));
        }
        if !summary.failed_sites.is_empty() {
            lines.push("Failed sites:".to_string());
            for (site, errors) in &summary.failed_sites {
                lines.push(format!("  - {site}"));
                for error in errors {
                    lines.push(format!("    {error}"));
                }
            }
        }
        if summary.mixed_environments() {
            lines.push("WARNING: mixed environments detected".to_string());
            for (mode, count) in &summary.environments {
                lines.push(format!("  - {count} site(s) using {mode} keys"));
            }
        }

        lines.join("\n")
    }
}

/// Returns `false` when any site failed the key check.
pub async fn execute(args: VerifyArgs, json_mode: bool) -> Result<bool> {
    let sites = match (args.site, args.sites_file) {
        (Some(site), _) => vec![site],
        (None, Some(path)) => load_sites(&path)
            .await
            .with_context(|| format!("Failed to load sites from {}", path.display()))?,
        (None, None) => anyhow::bail!("either --site or --sites-file is required"),
    };

    let client = SiteClient::new(args.timeout).context("Failed to build HTTP client")?;
    let reports = client.verify_sites(&sites, args.check_health).await;
    let summary = VerificationSummary::from_reports(&reports);
    let all_ok = summary.all_ok();

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&reports)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Results saved");
    }

    output(
        &VerifyOutput {
            reports,
            summary,
            quiet: args.quiet,
        },
        json_mode,
    );

    Ok(all_ok)
}
