// src/reporting/mod.rs
//! Reporting
//!
//! Live console lines for each finding, the `-o` output file and the
//! end-of-scan summary table.

pub mod console;
pub mod output;

pub use console::{console_line, plain_line, summary_table, Reporter};
pub use output::{OutputFormat, OutputWriter};
