//! Per-run counters for a log scan.
//!
//! These describe the scan itself (how many lines were seen, matched or
//! rejected) and are reported through logging. They never end up in the
//! report output.

use std::time::{Duration, Instant};

use crate::record::{ParsedRecord, Reporter};

/// Statistics collector for a single scan.
#[derive(Debug)]
pub struct ScanStats {
    /// Total number of lines read
    pub lines_read: u64,

    /// Total bytes of line text read (terminators excluded)
    pub bytes_read: u64,

    /// Lines parsed into a record
    pub records_matched: u64,

    /// Channel groups across all matched records
    pub channels_extracted: u64,

    /// Matched records reported by a Micronode
    pub micronode_reports: u64,

    /// Matched records reported by a CNU
    pub cnu_reports: u64,

    /// Lines dropped by the quick pre-filter
    pub non_stat_lines: u64,

    /// Lines that passed the pre-filter but failed the full grammar
    pub parse_failures: u64,

    /// When the scan started
    start_time: Instant,
}

impl ScanStats {
    /// Create a new statistics collector.
    pub fn new() -> Self {
        Self {
            lines_read: 0,
            bytes_read: 0,
            records_matched: 0,
            channels_extracted: 0,
            micronode_reports: 0,
            cnu_reports: 0,
            non_stat_lines: 0,
            parse_failures: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a line read from the input.
    pub fn record_line(&mut self, bytes: u64) {
        self.lines_read += 1;
        self.bytes_read += bytes;
    }

    /// Record a successfully parsed record.
    pub fn record_match(&mut self, record: &ParsedRecord) {
        self.records_matched += 1;
        self.channels_extracted += record.channels.len() as u64;

        match record.reporter() {
            Reporter::Micronode => self.micronode_reports += 1,
            Reporter::Cnu => self.cnu_reports += 1,
        }
    }

    /// Record a line rejected by the pre-filter.
    pub fn record_non_stat_line(&mut self) {
        self.non_stat_lines += 1;
    }

    /// Record a line rejected by the full grammar.
    pub fn record_parse_failure(&mut self) {
        self.parse_failures += 1;
    }

    /// Total lines that did not produce a record.
    pub fn rejected(&self) -> u64 {
        self.non_stat_lines + self.parse_failures
    }

    /// Get the elapsed time since the scan started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Generate a summary report.
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            elapsed_secs: self.elapsed().as_secs_f64(),
            lines_read: self.lines_read,
            bytes_read: self.bytes_read,
            records_matched: self.records_matched,
            channels_extracted: self.channels_extracted,
            micronode_reports: self.micronode_reports,
            cnu_reports: self.cnu_reports,
            non_stat_lines: self.non_stat_lines,
            parse_failures: self.parse_failures,
        }
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a finished scan.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub elapsed_secs: f64,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub records_matched: u64,
    pub channels_extracted: u64,
    pub micronode_reports: u64,
    pub cnu_reports: u64,
    pub non_stat_lines: u64,
    pub parse_failures: u64,
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let match_rate = if self.lines_read > 0 {
            self.records_matched as f64 / self.lines_read as f64 * 100.0
        } else {
            0.0
        };

        write!(
            f,
            "{} lines ({} KB) in {:.3}s: {} records ({:.1}%, {} from Micronode, {} from CNU), \
             {} channel groups, {} non-stat lines, {} parse failures",
            self.lines_read,
            self.bytes_read / 1024,
            self.elapsed_secs,
            self.records_matched,
            match_rate,
            self.micronode_reports,
            self.cnu_reports,
            self.channels_extracted,
            self.non_stat_lines,
            self.parse_failures
        )
    }
}
