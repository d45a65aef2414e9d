mod common;

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::*;
use futures::StreamExt;
use rust_takeover_hunter::reporting::Reporter;
use rust_takeover_hunter::scanner::{ScanConfig, Scanner};

fn hosts(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("host{}.example.com", i)).collect()
}

#[tokio::test]
async fn test_every_target_yields_exactly_one_outcome() {
    let targets = hosts(57);
    let resolver = Arc::new(StaticResolver::default());
    let fetcher = Arc::new(StaticFetcher::default());

    for workers in [1, 3, 8] {
        let config = ScanConfig { concurrency: workers, ..Default::default() };
        let scanner = Arc::new(Scanner::new(database(), resolver.clone(), fetcher.clone(), config).unwrap());

        let outcomes: Vec<_> = scanner.stream(targets.clone()).collect().await;
        assert_eq!(outcomes.len(), targets.len(), "workers = {}", workers);

        let seen: HashSet<_> = outcomes.iter().map(|o| o.target.clone()).collect();
        assert_eq!(seen.len(), targets.len());
    }

    assert_eq!(resolver.lookups.load(Ordering::SeqCst), 57 * 3);
}

#[tokio::test]
async fn test_blank_targets_are_not_scheduled() {
    let resolver = Arc::new(StaticResolver::default());
    let fetcher = Arc::new(StaticFetcher::default());
    let scanner = Arc::new(Scanner::new(database(), resolver.clone(), fetcher, ScanConfig::default()).unwrap());

    let targets = vec!["a.example.com".to_string(), String::new(), "   ".to_string(), "b.example.com".to_string()];
    let summary = scanner.run(targets, &Reporter::quiet()).await;

    assert_eq!(summary.scanned, 2);
    assert_eq!(resolver.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_workers_never_exceed_concurrency() {
    let mut resolver = StaticResolver::default();
    let mut fetcher = StaticFetcher::default().with_delay(Duration::from_millis(20));
    for host in hosts(24) {
        let cname = host.replace("example.com", "github.io");
        resolver = resolver.with(&host, &cname);
        fetcher = fetcher.with(&host, &[GITHUB_SIG]);
    }
    let resolver = Arc::new(resolver);
    let fetcher = Arc::new(fetcher);

    let config = ScanConfig { concurrency: 4, ..Default::default() };
    let scanner = Arc::new(Scanner::new(database(), resolver, fetcher.clone(), config).unwrap());

    let summary = scanner.run(hosts(24), &Reporter::quiet()).await;

    assert_eq!(summary.findings.len(), 24);
    assert_eq!(fetcher.request_count(), 24);
    let peak = fetcher.max_in_flight.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 4, "peak in-flight = {}", peak);
}
