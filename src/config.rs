// src/config.rs
//! Configuration bootstrap.
//!
//! On first run the providers file is looked up under
//! `~/.config/SubTover/providers.json`. When it is missing the operator is
//! asked for a path and the file is copied there for later runs.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

pub const CONFIG_DIR_NAME: &str = "SubTover";
pub const PROVIDERS_FILE_NAME: &str = "providers.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("Failed to create config directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error reading provided providers.json file '{path}': {source}")]
    ReadProviders {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error writing providers.json to '{path}': {source}")]
    WriteProviders {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No providers.json path was given")]
    NoProvidersPath,

    #[error("Failed to read input: {0}")]
    Prompt(#[source] io::Error),

    #[error("Invalid thread count: {value} (must be >= 1)")]
    InvalidConcurrency { value: usize },

    #[error("Invalid timeout: {secs}s (must be >= 1)")]
    InvalidTimeout { secs: u64 },
}

/// `$HOME/.config/SubTover`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

pub struct ProvidersLocator {
    config_dir: PathBuf,
}

impl ProvidersLocator {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        ProvidersLocator { config_dir: config_dir.into() }
    }

    pub fn from_home() -> Result<Self, ConfigError> {
        Ok(Self::new(default_config_dir()?))
    }

    pub fn default_path(&self) -> PathBuf {
        self.config_dir.join(PROVIDERS_FILE_NAME)
    }

    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::CreateDir {
            path: self.config_dir.clone(),
            source,
        })
    }

    /// Picks the providers file to load.
    ///
    /// `explicit` wins when it exists, otherwise the default location is
    /// used. If neither exists, `ask` is called with the missing path and the
    /// file it returns is installed at the default location.
    pub fn locate<F>(&self, explicit: Option<&Path>, ask: F) -> Result<PathBuf, ConfigError>
    where
        F: FnOnce(&Path) -> io::Result<Option<PathBuf>>,
    {
        self.ensure_config_dir()?;

        let wanted = explicit.map(Path::to_path_buf).unwrap_or_else(|| self.default_path());
        if wanted.exists() {
            return Ok(wanted);
        }

        let provided = ask(&wanted).map_err(ConfigError::Prompt)?.ok_or(ConfigError::NoProvidersPath)?;
        self.install(&provided)
    }

    /// Copies `source` to the default location and returns that location.
    pub fn install(&self, source: &Path) -> Result<PathBuf, ConfigError> {
        let raw = fs::read(source).map_err(|e| ConfigError::ReadProviders {
            path: source.to_path_buf(),
            source: e,
        })?;

        let target = self.default_path();
        fs::write(&target, raw).map_err(|e| ConfigError::WriteProviders {
            path: target.clone(),
            source: e,
        })?;

        info!("Installed providers file at {}", target.display());
        Ok(target)
    }
}

/// Asks on stdin for the providers file path.
pub fn prompt_for_providers(missing: &Path) -> io::Result<Option<PathBuf>> {
    println!("providers.json not found at: {}", missing.display());
    print!("Please provide the path to the providers.json file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();

    if line.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(line)))
    }
}
