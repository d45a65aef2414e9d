// src/resolver.rs
//! CNAME resolution.
//!
//! Lookup failures of any kind (NXDOMAIN, timeout, no CNAME record) are not
//! surfaced as errors: the target is simply not a CNAME candidate.

use async_trait::async_trait;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioResolver;
use log::debug;

use crate::models::Resolution;

#[async_trait]
pub trait CnameResolver: Send + Sync {
    async fn resolve_cname(&self, host: &str) -> Resolution;
}

/// Resolver backed by the system DNS configuration.
pub struct DnsResolver {
    inner: TokioResolver,
}

impl DnsResolver {
    pub fn from_system_conf() -> Result<Self, anyhow::Error> {
        let inner = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| anyhow::anyhow!("Failed to create resolver: {}", e))?
            .build();
        Ok(DnsResolver { inner })
    }
}

#[async_trait]
impl CnameResolver for DnsResolver {
    async fn resolve_cname(&self, host: &str) -> Resolution {
        match self.inner.lookup(host, RecordType::CNAME).await {
            Ok(response) => {
                // The answer may hold a chain; the last alias is the canonical name.
                let canonical = response
                    .iter()
                    .filter_map(|record| record.as_cname())
                    .map(|cname| cname.0.to_string())
                    .last();

                match canonical {
                    Some(name) => Resolution::Cname(normalize_name(&name)),
                    None => {
                        debug!("[RESOLVE] {} has no CNAME record", host);
                        Resolution::NoCname
                    }
                }
            }
            Err(e) => {
                debug!("[RESOLVE] {} => {}", host, e);
                Resolution::NoCname
            }
        }
    }
}

/// Strips the trailing root dot that DNS names carry.
pub fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}
