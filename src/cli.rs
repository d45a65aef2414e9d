use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::scanner::ScanConfig;

#[derive(Parser, Debug)]
#[command(name = "takeover-hunter")]
#[command(version)]
#[command(about = "An asynchronous subdomain takeover scanner.", long_about = None)]
pub struct Args {
    /// List of hosts to check takeovers on (one per line).
    #[arg(short = 'l', long = "list")]
    pub hosts_list: PathBuf,

    /// Number of concurrent workers.
    #[arg(short = 't', long = "threads", default_value_t = 20,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub threads: u64,

    /// Check all hosts regardless of CNAME.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Show verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Force HTTPS connections (default: http://).
    #[arg(long)]
    pub https: bool,

    /// Seconds to wait before timeout.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// File to write findings to (`.json` for JSON output).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Path to the providers.json file (optional).
    #[arg(long)]
    pub providers: Option<PathBuf>,
}

impl Args {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            concurrency: self.threads as usize,
            all_mode: self.all,
            force_https: self.https,
            timeout: Duration::from_secs(self.timeout),
            ..Default::default()
        }
    }
}
