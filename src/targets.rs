use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetsError {
    #[error("Failed to read hosts list '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One hostname per line; blank lines are dropped.
pub fn parse_targets(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn read_targets(path: impl AsRef<Path>) -> Result<Vec<String>, TargetsError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await.map_err(|source| TargetsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_targets(&raw))
}
