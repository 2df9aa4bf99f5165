//! ZeroTier DNS Sync
//!
//! Publishes every member of a ZeroTier network as an `A` record in a
//! Route 53 hosted zone. Runs once and exits.
//!
//! # Usage
//! ```bash
//! # Configuration from the environment (or a .env file)
//! ZT_NETWORK=8056c2e21c000001 ZT_TOKEN=... DOMAIN=zt.example.com R53_ZONE=Z0123456789ABC \
//!     zerotier-dns-sync
//!
//! # Show what would be published
//! zerotier-dns-sync --dry-run --output json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zerotier_dns_sync::types::{PublishResult, PublishStatus};
use zerotier_dns_sync::zerotier::ZEROTIER_API_BASE;
use zerotier_dns_sync::{
    MemberDnsSync, MissingAddressPolicy, PreparedSync, RawConfig, Route53Publisher, ZeroTierClient,
};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "zerotier-dns-sync", version, about)]
struct Args {
    #[command(flatten)]
    config: RawConfig,

    /// ZeroTier Central API base URL
    #[arg(long, env = "ZT_API_URL", default_value = ZEROTIER_API_BASE)]
    api_url: String,

    /// AWS region override (defaults to the AWS provider chain)
    #[arg(long, env = "AWS_REGION")]
    aws_region: Option<String>,

    /// What to do with members that have no assigned address
    #[arg(long, value_enum, env = "ZT_MISSING_ADDRESS", default_value = "skip")]
    on_missing_address: MissingAddressPolicy,

    /// Dry run - build the change batch but don't publish it
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Log format
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args);

    let config = args.config.clone().validate().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    info!(
        network_id = %config.network_id,
        hosted_zone_id = %config.hosted_zone_id,
        dry_run = args.dry_run,
        "ZeroTier DNS sync starting"
    );

    let directory = ZeroTierClient::with_base_url(config.auth_token.clone(), &args.api_url)
        .context("Failed to initialize ZeroTier client")?
        .missing_address_policy(args.on_missing_address);

    let (network_id, hosted_zone_id) = (config.network_id.clone(), config.hosted_zone_id.clone());
    let publisher = Route53Publisher::from_env(args.aws_region.clone()).await;

    let sync = MemberDnsSync::new(Box::new(directory), Box::new(publisher), config).dry_run(args.dry_run);

    let prepared = sync.prepare().await.context("Member DNS sync failed")?;
    if let OutputFormat::Text = args.output {
        print_batch(&network_id, &hosted_zone_id, &prepared);
    }

    let report = sync.publish(prepared).await.context("Member DNS sync failed")?;

    match args.output {
        OutputFormat::Text => print_result(&report.result),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?
            );
        }
    }

    Ok(())
}

fn init_logging(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn print_batch(network_id: &str, hosted_zone_id: &str, prepared: &PreparedSync) {
    println!("Members of {}:", network_id);
    for member in &prepared.members {
        println!("  {:<24} {}", member.name, member.address);
    }

    println!("\nChange batch for zone {}:", hosted_zone_id);
    for change in &prepared.batch.changes {
        println!("  {}", change);
    }
}

fn print_result(result: &PublishResult) {
    match result.status {
        PublishStatus::Submitted => {
            println!("\nChange Response:");
            println!("  id:        {}", result.change_id.as_deref().unwrap_or("-"));
            println!("  status:    {}", result.provider_status.as_deref().unwrap_or("-"));
            println!("  submitted: {}", result.submitted_at.as_deref().unwrap_or("-"));
        }
        PublishStatus::Empty => println!("\nNo members to publish."),
        PublishStatus::DryRun => println!("\nDry run: {} records not submitted.", result.changes),
    }
}
