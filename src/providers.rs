// src/providers.rs
//! Provider Fingerprint Database
//!
//! Loads the ordered list of takeover fingerprints once, before scanning.
//! The database is never mutated afterwards and is shared by all workers
//! through an `Arc`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::models::ProviderRecord;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read providers file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed providers file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable, ordered set of provider records. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct FingerprintDatabase {
    records: Arc<Vec<ProviderRecord>>,
}

impl FingerprintDatabase {
    pub fn from_records(records: Vec<ProviderRecord>) -> Self {
        if records.is_empty() {
            warn!("Fingerprint database is empty; no target can be flagged");
        }
        FingerprintDatabase { records: Arc::new(records) }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<ProviderRecord> = serde_json::from_str(raw)?;
        Ok(Self::from_records(records))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let db = Self::from_json(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loaded {} providers from {}", db.len(), path.display());
        Ok(db)
    }

    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when at least one provider's CNAME signature occurs in `cname`.
    pub fn cname_is_interesting(&self, cname: &str) -> bool {
        self.records.iter().any(|p| p.matches_cname(cname))
    }
}
