#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_takeover_hunter::fetcher::{BodyFetcher, FetchError, FetchOptions};
use rust_takeover_hunter::models::{ProviderRecord, Resolution};
use rust_takeover_hunter::providers::FingerprintDatabase;
use rust_takeover_hunter::resolver::CnameResolver;

pub const GITHUB_SIG: &str = "There isn't a GitHub Pages site here";
pub const CLOUDFRONT_SIG: &str = "ERROR: The request could not be satisfied";

pub fn database() -> FingerprintDatabase {
    FingerprintDatabase::from_records(vec![
        ProviderRecord::new("github", &["github.io"], &[GITHUB_SIG]),
        ProviderRecord::new("cloudfront", &["cloudfront.net"], &[CLOUDFRONT_SIG]),
    ])
}

/// Answers from a fixed table; unknown hosts have no CNAME.
#[derive(Default)]
pub struct StaticResolver {
    answers: HashMap<String, String>,
    pub lookups: AtomicUsize,
}

impl StaticResolver {
    pub fn with(mut self, host: &str, cname: &str) -> Self {
        self.answers.insert(host.to_string(), cname.to_string());
        self
    }
}

#[async_trait]
impl CnameResolver for StaticResolver {
    async fn resolve_cname(&self, host: &str) -> Resolution {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(host) {
            Some(cname) => Resolution::Cname(cname.clone()),
            None => Resolution::NoCname,
        }
    }
}

/// Serves queued bodies per host and records every request.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: Mutex<HashMap<String, Vec<String>>>,
    pub requests: Mutex<Vec<(String, FetchOptions)>>,
    pub delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StaticFetcher {
    /// Bodies are handed out in the order given; a host with no body left fails.
    pub fn with(self, host: &str, bodies: &[&str]) -> Self {
        self.bodies
            .lock()
            .unwrap()
            .insert(host.to_string(), bodies.iter().rev().map(|b| b.to_string()).collect());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests_for(&self, host: &str) -> Vec<FetchOptions> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, o)| *o)
            .collect()
    }
}

#[async_trait]
impl BodyFetcher for StaticFetcher {
    async fn fetch(&self, host: &str, options: &FetchOptions) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push((host.to_string(), *options));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.bodies.lock().unwrap().get_mut(host).and_then(|queue| queue.pop());
        next.ok_or_else(|| FetchError::Timeout {
            url: format!("{}://{}/", options.scheme, host),
            secs: options.timeout.as_secs(),
        })
    }
}
