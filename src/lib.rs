pub mod models;
pub mod utils;
pub mod cli;
pub mod config;
pub mod targets;
pub mod providers;
pub mod resolver;
pub mod fetcher;
pub mod matcher;
pub mod scanner;

/// Console lines, output file and summary table
pub mod reporting;
