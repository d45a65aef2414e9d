// src/matcher.rs
//! Takeover decision logic.
//!
//! `select_mode` decides whether a target is worth fetching at all, and
//! `Matcher::evaluate` turns a fetched body into a verdict. Providers are
//! visited in database order and the first body hit ends the evaluation;
//! with a CNAME in hand only the first provider claiming it is examined.
//! The only I/O here is the CloudFront re-check.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::fetcher::{BodyFetcher, FetchOptions};
use crate::models::{Finding, MatchMode, ProviderRecord, Resolution, Verdict};
use crate::providers::FingerprintDatabase;
use crate::utils::Scheme;

/// Edge caches of this provider serve stale "not found" pages on healthy
/// distributions, so its first hit must be confirmed by a second fetch.
pub const ESCALATING_PROVIDER: &str = "cloudfront";

pub const DEFAULT_ESCALATION_TIMEOUT: Duration = Duration::from_secs(120);

/// `None` means the target is skipped without fetching.
pub fn select_mode(resolution: &Resolution, all_mode: bool, db: &FingerprintDatabase) -> Option<MatchMode> {
    if all_mode {
        return Some(MatchMode::Unconditional);
    }

    match resolution {
        Resolution::NoCname => None,
        Resolution::Cname(cname) if db.cname_is_interesting(cname) => {
            Some(MatchMode::Selective(cname.clone()))
        }
        Resolution::Cname(_) => None,
    }
}

/// First provider/signature pair that fires for `body` under `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub provider: &'a ProviderRecord,
    pub signature: &'a str,
}

/// In selective mode only the first provider whose CNAME signature matches is
/// examined; a body miss there ends the search.
pub fn find_match<'a>(mode: &MatchMode, body: &str, db: &'a FingerprintDatabase) -> Option<Candidate<'a>> {
    let hit = |provider: &'a ProviderRecord| {
        provider
            .matching_body_signature(body)
            .map(|signature| Candidate { provider, signature })
    };

    match mode {
        MatchMode::Unconditional => db.records().iter().find_map(hit),
        MatchMode::Selective(cname) => db
            .records()
            .iter()
            .find(|provider| provider.matches_cname(cname))
            .and_then(hit),
    }
}

pub struct Matcher {
    db: FingerprintDatabase,
    fetcher: Arc<dyn BodyFetcher>,
    escalation: FetchOptions,
}

impl Matcher {
    pub fn new(db: FingerprintDatabase, fetcher: Arc<dyn BodyFetcher>) -> Self {
        Self::with_escalation_timeout(db, fetcher, DEFAULT_ESCALATION_TIMEOUT)
    }

    pub fn with_escalation_timeout(
        db: FingerprintDatabase,
        fetcher: Arc<dyn BodyFetcher>,
        timeout: Duration,
    ) -> Self {
        Matcher {
            db,
            fetcher,
            escalation: FetchOptions::new(Scheme::Https, timeout),
        }
    }

    pub(crate) fn database(&self) -> &FingerprintDatabase {
        &self.db
    }

    pub async fn evaluate(&self, mode: &MatchMode, target: &str, body: &str) -> Verdict {
        let candidate = match find_match(mode, body, &self.db) {
            Some(c) => c,
            None => return Verdict::NotVulnerable,
        };

        let cname = mode.cname().map(str::to_string);

        if cname.is_some()
            && candidate.provider.name == ESCALATING_PROVIDER
            && !self.confirm(target, candidate.signature).await
        {
            info!("[ESCALATION] {} not confirmed for {}", candidate.provider.name, target);
            return Verdict::NotVulnerable;
        }

        Verdict::Vulnerable(Finding {
            provider: candidate.provider.name.clone(),
            target: target.to_string(),
            cname,
        })
    }

    /// Re-fetches over HTTPS and looks for the same signature again.
    async fn confirm(&self, target: &str, signature: &str) -> bool {
        debug!("[ESCALATION] Re-checking {} over HTTPS", target);
        match self.fetcher.fetch(target, &self.escalation).await {
            Ok(body) => body.contains(signature),
            Err(e) => {
                debug!("[ESCALATION] {} => {}", target, e);
                false
            }
        }
    }
}
