//! Implementation of the `stripe-pk init` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use stripe_pk_client::{
    init_from_server, KeyLoader, LoaderOptions, StripeContext, StripeHandle, StripeJs,
    DEFAULT_API_BASE,
};

use crate::output::{output, CommandOutput};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Base URL of the site serving /api/stripe-pk
    #[arg(long, env = "STRIPE_PK_BASE_URL")]
    pub base_url: String,

    /// Reject keys not shaped like pk_(test|live)_<alphanumeric>
    #[arg(long)]
    pub strict: bool,

    /// Only fetch the key, without building a Stripe handle
    #[arg(long)]
    pub no_sdk: bool,

    /// Stripe API base the handle talks to
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub endpoint: String,
    pub publishable_key: Option<String>,
    pub mode: Option<String>,
    pub handle_created: bool,
    pub failure: Option<String>,
    pub failure_kind: Option<String>,
}

impl InitOutput {
    fn from_context(endpoint: String, ctx: &StripeContext<StripeHandle>) -> Self {
        Self {
            success: ctx.is_ready(),
            endpoint,
            publishable_key: ctx.publishable_key().map(|k| k.redacted()),
            mode: ctx.publishable_key().map(|k| k.mode().to_string()),
            handle_created: ctx.handle().is_some(),
            failure: ctx.failure().map(ToString::to_string),
            failure_kind: ctx.failure().map(|f| format!("{:?}", f.kind()).to_lowercase()),
        }
    }
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Endpoint: {}", self.endpoint)];
        match (&self.publishable_key, &self.mode) {
            (Some(key), Some(mode)) => lines.push(format!("Key: {key} ({mode})")),
            _ => lines.push("Key: (none)".to_string()),
        }
        lines.push(format!(
            "Stripe handle: {}",
            if self.handle_created { "initialized" } else { "not initialized" }
        ));
        if let Some(failure) = &self.failure {
            lines.push(format!("Reason: {failure}"));
        }
        lines.join("\n")
    }
}

/// Failure paths are reported, not treated as command errors.
pub async fn execute(args: InitArgs, json_mode: bool) -> Result<bool> {
    let options = LoaderOptions {
        timeout_seconds: args.timeout,
        strict_key_format: args.strict,
    };
    let loader =
        KeyLoader::with_options(&args.base_url, options).context("Failed to build HTTP client")?;

    let factory = (!args.no_sdk).then(|| StripeJs::with_api_base(&args.api_base));
    let ctx = init_from_server(&loader, factory.as_ref()).await;

    output(&InitOutput::from_context(loader.endpoint(), &ctx), json_mode);
    Ok(true)
}
