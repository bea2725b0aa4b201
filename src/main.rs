// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use pe_dns_manager::{
    client::arm::ArmConnection, constants::ARM_ACCESS_TOKEN_ENV, orchestrator::EventProcessor,
    settings::Settings, zone_mapping::DnsZoneMapping,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Link a newly created private endpoint to its private DNS zones.
#[derive(Parser, Debug)]
#[command(name = "pe-dns-manager", version, about)]
struct Args {
    /// Event payload file, or `-` to read from stdin
    #[arg(long, default_value = "-")]
    event: String,

    /// JSON document with `privateDnsZoneMappings`
    #[arg(long)]
    zone_mappings: PathBuf,

    /// Optional YAML settings file (retry policy, zone group name, endpoint)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Resource Manager endpoint, overriding the settings file
    #[arg(long)]
    arm_endpoint: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("pe-dns-manager")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

fn init_logging() {
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT=json|text
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

fn read_event(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read event from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read event file {source}"))
    }
}

async fn async_main(args: Args) -> Result<()> {
    init_logging();
    debug!(?args, "Logging initialized");

    let settings = match &args.settings {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };
    let policy = settings.retry_policy()?;
    let mapping = DnsZoneMapping::from_path(&args.zone_mappings)?;
    info!(
        zone_mappings = mapping.len(),
        max_retries = policy.max_retries(),
        "Configuration loaded"
    );

    let token = std::env::var(ARM_ACCESS_TOKEN_ENV).ok();
    if token.is_none() {
        warn!("{ARM_ACCESS_TOKEN_ENV} is not set, Resource Manager requests will be unauthenticated");
    }
    let endpoint = args.arm_endpoint.as_deref().unwrap_or(&settings.arm_endpoint);
    let connection = ArmConnection::new(endpoint, token)?;

    let processor = EventProcessor::new(connection, mapping, policy)
        .with_zone_group_name(settings.zone_group_name.clone());

    let payload: serde_json::Value =
        serde_json::from_str(&read_event(&args.event)?).context("Event is not valid JSON")?;
    let report = processor.process_payload(payload).await?;

    if report.has_failures() {
        warn!("Some group IDs could not be configured, see report");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
