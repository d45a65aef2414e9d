// src/reporting/output.rs
//! Output file for the `-o` flag.
//!
//! Plain text holds one finding per line in the console format; a `.json`
//! path gets a pretty-printed array of findings instead.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Finding;
use super::console::plain_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub struct OutputWriter {
    path: PathBuf,
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = OutputFormat::from_path(&path);
        OutputWriter { path, format }
    }

    pub fn render(&self, findings: &[Finding]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(findings)
                .context("Failed to serialize findings"),
            OutputFormat::Text => Ok(findings
                .iter()
                .map(|f| format!("{}\n", plain_line(f)))
                .collect()),
        }
    }

    pub fn write(&self, findings: &[Finding]) -> Result<()> {
        let contents = self.render(findings)?;

        let mut file = File::create(&self.path)
            .with_context(|| format!("Failed to create output file {}", self.path.display()))?;

        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write output file {}", self.path.display()))?;

        Ok(())
    }
}
