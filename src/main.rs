use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::*;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use rust_takeover_hunter::cli::Args;
use rust_takeover_hunter::config::{prompt_for_providers, ProvidersLocator};
use rust_takeover_hunter::fetcher::HttpFetcher;
use rust_takeover_hunter::providers::FingerprintDatabase;
use rust_takeover_hunter::reporting::{summary_table, OutputWriter, Reporter};
use rust_takeover_hunter::resolver::DnsResolver;
use rust_takeover_hunter::scanner::Scanner;
use rust_takeover_hunter::targets::read_targets;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "warn,rust_takeover_hunter=debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    println!("{}", r#"
  SubTover :: subdomain takeover hunter
==================================================
    "#.cyan().bold());

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "ERROR:".red().bold(), e);
        std::process::exit(1);
    }

    println!("\n[~] Enjoy your hunt!");
}

async fn run(args: Args) -> anyhow::Result<()> {
    // ==========================================================================
    // PROVIDERS
    // ==========================================================================
    let locator = ProvidersLocator::from_home()?;
    let explicit = args.providers.clone();
    let providers_path = tokio::task::spawn_blocking(move || {
        locator.locate(explicit.as_deref(), prompt_for_providers)
    })
    .await
    .context("Providers lookup task failed")??;

    let db = FingerprintDatabase::load(&providers_path)?;
    info!("Loaded {} providers from {}", db.len(), providers_path.display());

    // ==========================================================================
    // TARGETS
    // ==========================================================================
    let targets = read_targets(&args.hosts_list).await?;
    if targets.is_empty() {
        println!("No hosts to scan.");
        return Ok(());
    }

    let config = args.scan_config();
    let resolver = Arc::new(DnsResolver::from_system_conf()?);
    let fetcher = Arc::new(HttpFetcher::new()?);
    let scanner = Arc::new(Scanner::new(db, resolver, fetcher, config)?);

    println!(
        "Checking {} hosts with {} workers{}",
        targets.len(),
        scanner.config().concurrency,
        if scanner.config().all_mode { " (all hosts)" } else { "" }
    );

    // Log lines and the bar would fight over stderr.
    let progress = if args.verbose {
        None
    } else {
        let pb = ProgressBar::new(targets.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    };

    let reporter = Reporter::new(progress);
    let summary = scanner.run(targets, &reporter).await;
    reporter.finish();

    println!("\n{}", "Scan Summary".bold().underline());
    println!(
        "Hosts: {}  Fetched: {}  Fetch errors: {}  Takeovers: {}",
        summary.scanned,
        summary.selected,
        summary.fetch_failures,
        summary.findings.len().to_string().red().bold()
    );
    if !summary.findings.is_empty() {
        println!("{}", summary_table(&summary));
    }

    // --- OUTPUT LOGIC ---
    if let Some(output_path) = &args.output {
        println!("Saving findings to {}...", output_path.display());
        OutputWriter::new(output_path).write(&summary.findings)?;
        println!("{}", "Success!".green());
    }

    Ok(())
}
