use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use log::{debug, info};
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;

use crate::config::ConfigError;
use crate::fetcher::{BodyFetcher, FetchOptions};
use crate::matcher::{select_mode, Matcher, DEFAULT_ESCALATION_TIMEOUT};
use crate::models::{Finding, MatchMode, ScanOutcome, Stage, Verdict};
use crate::providers::FingerprintDatabase;
use crate::reporting::Reporter;
use crate::resolver::CnameResolver;
use crate::utils::Scheme;

pub const DEFAULT_CONCURRENCY: usize = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of workers pulling from the target queue.
    pub concurrency: usize,
    /// Check every provider's body signatures regardless of CNAME.
    pub all_mode: bool,
    pub force_https: bool,
    pub timeout: Duration,
    pub escalation_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            all_mode: false,
            force_https: false,
            timeout: DEFAULT_TIMEOUT,
            escalation_timeout: DEFAULT_ESCALATION_TIMEOUT,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency < 1 {
            return Err(ConfigError::InvalidConcurrency { value: self.concurrency });
        }
        if self.timeout < Duration::from_secs(1) {
            return Err(ConfigError::InvalidTimeout { secs: self.timeout.as_secs() });
        }
        Ok(())
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(Scheme::from_force_https(self.force_https), self.timeout)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    pub scanned: usize,
    /// Targets whose body was fetched.
    pub selected: usize,
    pub fetch_failures: usize,
    pub findings: Vec<Finding>,
}

impl ScanSummary {
    pub fn record(&mut self, outcome: &ScanOutcome) {
        self.scanned += 1;
        match outcome.stage {
            Stage::Skipped => {}
            Stage::FetchFailed => {
                self.selected += 1;
                self.fetch_failures += 1;
            }
            Stage::Evaluated => self.selected += 1,
        }
        if let Verdict::Vulnerable(finding) = &outcome.verdict {
            self.findings.push(finding.clone());
        }
    }
}

pub struct Scanner {
    resolver: Arc<dyn CnameResolver>,
    fetcher: Arc<dyn BodyFetcher>,
    matcher: Matcher,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(
        db: FingerprintDatabase,
        resolver: Arc<dyn CnameResolver>,
        fetcher: Arc<dyn BodyFetcher>,
        config: ScanConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let matcher = Matcher::with_escalation_timeout(db, fetcher.clone(), config.escalation_timeout);

        Ok(Scanner {
            resolver,
            fetcher,
            matcher,
            config,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs one target through resolve -> select -> fetch -> evaluate.
    pub async fn check_target(&self, target: &str) -> ScanOutcome {
        let resolution = self.resolver.resolve_cname(target).await;

        let mode = match select_mode(&resolution, self.config.all_mode, self.matcher.database()) {
            Some(mode) => mode,
            None => return outcome(target, Stage::Skipped, Verdict::NotVulnerable),
        };

        match &mode {
            MatchMode::Selective(cname) => info!("[SELECTED] {} => {}", target, cname),
            MatchMode::Unconditional => info!("[ALL] {}", target),
        }

        let body = match self.fetcher.fetch(target, &self.config.fetch_options()).await {
            Ok(body) => body,
            Err(e) => {
                info!("[ERROR] Get: {} => {}", target, e);
                return outcome(target, Stage::FetchFailed, Verdict::NotVulnerable);
            }
        };

        let verdict = self.matcher.evaluate(&mode, target, &body).await;
        outcome(target, Stage::Evaluated, verdict)
    }

    /// Spawns the worker pool and yields one outcome per scheduled target as
    /// it completes. Blank targets are never scheduled. The stream ends once
    /// every worker has drained the queue.
    pub fn stream(self: Arc<Self>, targets: Vec<String>) -> ReceiverStream<ScanOutcome> {
        let workers = self.config.concurrency;
        let (job_tx, job_rx) = mpsc::channel::<String>(workers);
        let (out_tx, out_rx) = mpsc::channel::<ScanOutcome>(workers);
        let job_rx = Arc::new(Mutex::new(job_rx));

        tokio::spawn(async move {
            for target in targets {
                if target.trim().is_empty() {
                    continue;
                }
                if job_tx.send(target).await.is_err() {
                    break;
                }
            }
        });

        for id in 0..workers {
            let scanner = self.clone();
            let job_rx = job_rx.clone();
            let out_tx = out_tx.clone();

            tokio::spawn(async move {
                loop {
                    let next = job_rx.lock().await.recv().await;
                    let Some(target) = next else { break };

                    let outcome = scanner.check_target(&target).await;
                    if out_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
                debug!("Worker {} finished", id);
            });
        }

        ReceiverStream::new(out_rx)
    }

    /// Drains `stream`, reporting each finding as soon as it arrives.
    pub async fn run(self: Arc<Self>, targets: Vec<String>, reporter: &Reporter) -> ScanSummary {
        let mut outcomes = self.stream(targets);
        let mut summary = ScanSummary::default();

        while let Some(outcome) = outcomes.next().await {
            if let Some(finding) = outcome.verdict.finding() {
                reporter.report(finding);
            }
            reporter.advance();
            summary.record(&outcome);
        }

        summary
    }
}

fn outcome(target: &str, stage: Stage, verdict: Verdict) -> ScanOutcome {
    ScanOutcome {
        target: target.to_string(),
        stage,
        verdict,
    }
}
