//! CNU Stats Parser CLI - Turn MoCA CNU statistics log lines into a report.

use anyhow::{Context, Result};
use clap::Parser;
use cnu_stats_parser::scan::{ScanOptions, run};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CNU Stats Parser - Extract MoCA CNU link statistics from a device log
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input log file
    input: PathBuf,

    /// Print the lines that did not match after the report
    #[arg(short, long)]
    debug: bool,

    /// Write the report to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            debug: self.debug,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; the report may be on stdout, so logs go to stderr.
    // RUST_LOG only tunes these diagnostics and never changes the report.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stats = run(&args.scan_options()).context("CNU stats scan failed")?;
    info!(
        "Matched {} of {} lines",
        stats.records_matched, stats.lines_read
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["cnu-stats-parser", "device.log"]).unwrap();
        let options = args.scan_options();

        assert_eq!(options.input, PathBuf::from("device.log"));
        assert!(options.output.is_none());
        assert!(!options.debug);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_parse_short_flags() {
        let args =
            Args::try_parse_from(["cnu-stats-parser", "device.log", "-d", "-o", "report.txt"])
                .unwrap();
        let options = args.scan_options();

        assert!(options.debug);
        assert_eq!(options.output, Some(PathBuf::from("report.txt")));
    }

    #[test]
    fn test_parse_long_flags() {
        let args = Args::try_parse_from([
            "cnu-stats-parser",
            "--debug",
            "--output",
            "report.txt",
            "device.log",
        ])
        .unwrap();

        assert!(args.debug);
        assert_eq!(args.output, Some(PathBuf::from("report.txt")));
        assert_eq!(args.input, PathBuf::from("device.log"));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["cnu-stats-parser", "-d"]).is_err());
    }
}
