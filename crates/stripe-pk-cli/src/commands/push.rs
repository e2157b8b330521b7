//! Implementation of the `stripe-pk push` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use stripe_pk_client::{
    load_sites, PublishableKey, PushSummary, SecretKey, SiteClient, DEFAULT_PUSH_CONCURRENCY,
    DEFAULT_SITE_TIMEOUT_SECONDS,
};

use crate::output::{output, CommandOutput};

#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("value")
        .required(true)
        .multiple(false)
        .args(["key", "secret_key"])
))]
pub struct PushArgs {
    /// Publishable key to push (pk_test_... or pk_live_...)
    #[arg(long, visible_alias = "publishable-key")]
    pub key: Option<String>,

    /// Secret key to push (sk_test_... or sk_live_...); only ever shown masked
    #[arg(long, visible_alias = "sk")]
    pub secret_key: Option<String>,

    /// Master key sent as X-API-Key
    #[arg(long, env = "STRIPE_PK_MASTER_KEY", hide_env_values = true)]
    pub master_key: String,

    /// File containing site URLs (one per line, # for comments)
    #[arg(long)]
    pub sites_file: PathBuf,

    /// Maximum concurrent requests
    #[arg(long, default_value_t = DEFAULT_PUSH_CONCURRENCY)]
    pub concurrency: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_SITE_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// List target sites without pushing
    #[arg(long)]
    pub dry_run: bool,
}

/// The validated key being pushed.
#[derive(Debug)]
enum KeyToPush {
    Publishable(PublishableKey),
    Secret(SecretKey),
}

impl KeyToPush {
    fn from_args(args: &PushArgs) -> Result<Self> {
        match (&args.key, &args.secret_key) {
            (Some(key), None) => PublishableKey::parse_strict(key.as_str())
                .map(Self::Publishable)
                .context("Refusing to push an invalid publishable key"),
            (None, Some(secret)) => SecretKey::parse(secret.as_str())
                .map(Self::Secret)
                .context("Refusing to push an invalid secret key"),
            _ => anyhow::bail!("exactly one of --key or --secret-key is required"),
        }
    }

    fn setting(&self) -> &'static str {
        match self {
            Self::Publishable(_) => "stripe_publishable_key",
            Self::Secret(_) => "stripe_secret_key",
        }
    }

    /// Redacted publishable key or masked secret, never the raw secret.
    fn shown(&self) -> String {
        match self {
            Self::Publishable(key) => key.redacted(),
            Self::Secret(key) => key.masked(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PushOutput {
    pub setting: &'static str,
    pub key: String,
    pub dry_run: bool,
    pub sites: Vec<String>,
    pub summary: Option<PushSummary>,
}

impl CommandOutput for PushOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Will push {} ({}) to {} site(s) (dry-run={})",
            self.setting,
            self.key,
            self.sites.len(),
            self.dry_run
        )];

        match &self.summary {
            None => {
                for site in &self.sites {
                    lines.push(format!("  - {site}"));
                }
            }
            Some(summary) => {
                lines.push(format!("OK: {}, Failed: {}", summary.succeeded, summary.failed));
                if summary.failed > 0 {
                    lines.push("Failed details:".to_string());
                    for outcome in summary.failures() {
                        lines.push(format!("  {} {}", outcome.site, outcome.body));
                    }
                }
            }
        }

        lines.join("\n")
    }
}

/// Returns `false` when any site rejected the key.
pub async fn execute(args: PushArgs, json_mode: bool) -> Result<bool> {
    let key = KeyToPush::from_args(&args)?;

    let sites = load_sites(&args.sites_file)
        .await
        .with_context(|| format!("Failed to load sites from {}", args.sites_file.display()))?;

    let mut out = PushOutput {
        setting: key.setting(),
        key: key.shown(),
        dry_run: args.dry_run,
        sites,
        summary: None,
    };

    if args.dry_run {
        output(&out, json_mode);
        return Ok(true);
    }

    let client = SiteClient::new(args.timeout).context("Failed to build HTTP client")?;
    let summary = match &key {
        KeyToPush::Publishable(key) => {
            client
                .push_to_sites(&out.sites, key, &args.master_key, args.concurrency)
                .await
        }
        KeyToPush::Secret(key) => {
            client
                .push_secret_to_sites(&out.sites, key, &args.master_key, args.concurrency)
                .await
        }
    };
    let all_ok = summary.failed == 0;

    out.summary = Some(summary);
    output(&out, json_mode);

    Ok(all_ok)
}
