// src/reporting/console.rs
//! Console output.
//!
//! All lines are emitted by the single task draining the scan stream, so
//! findings never interleave. With a progress bar attached, lines go through
//! `ProgressBar::println` to keep the bar intact.

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use indicatif::ProgressBar;

use crate::models::Finding;
use crate::scanner::ScanSummary;

/// `[provider] Takeover Possible At target[ with CNAME cname]`
pub fn plain_line(finding: &Finding) -> String {
    match &finding.cname {
        Some(cname) => format!(
            "[{}] Takeover Possible At {} with CNAME {}",
            finding.provider, finding.target, cname
        ),
        None => format!("[{}] Takeover Possible At {}", finding.provider, finding.target),
    }
}

pub fn console_line(finding: &Finding) -> String {
    let tag = finding.provider.red().bold().underline();
    match &finding.cname {
        Some(cname) => format!("[{}] Takeover Possible At {} with CNAME {}", tag, finding.target, cname),
        None => format!("[{}] Takeover Possible At {}", tag, finding.target),
    }
}

pub struct Reporter {
    progress: Option<ProgressBar>,
    quiet: bool,
}

impl Reporter {
    pub fn new(progress: Option<ProgressBar>) -> Self {
        Reporter { progress, quiet: false }
    }

    /// Prints nothing; used when only the summary matters.
    pub fn quiet() -> Self {
        Reporter { progress: None, quiet: true }
    }

    pub fn report(&self, finding: &Finding) {
        if self.quiet {
            return;
        }
        let line = console_line(finding);
        match &self.progress {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    pub fn advance(&self) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
    }
}

pub fn summary_table(summary: &ScanSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Provider", "Target", "CNAME"]);

    for finding in &summary.findings {
        table.add_row(vec![
            finding.provider.clone(),
            finding.target.clone(),
            finding.cname.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    table
}
