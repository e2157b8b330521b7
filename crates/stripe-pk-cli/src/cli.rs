//! Command-line definitions.

use clap::{Parser, Subcommand};

use crate::commands::init::InitArgs;
use crate::commands::push::PushArgs;
use crate::commands::verify::VerifyArgs;

#[derive(Parser, Debug)]
#[command(name = "stripe-pk", version, about = "Stripe publishable key bootstrap tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a site's publishable key and initialize a Stripe handle once
    Init(InitArgs),
    /// Check that sites serve a publishable key
    Verify(VerifyArgs),
    /// Push a publishable or secret key to sites
    Push(PushArgs),
}
