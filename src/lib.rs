//! CNU Stats Parser - extract MoCA CNU link statistics from device trace logs.
//!
//! This crate provides:
//! - A nom-based parser for CNU statistics log lines
//! - A fixed-layout text renderer for the parsed records
//! - A streaming scanner that turns a whole log into a report
//!
//! # Example
//!
//! ```rust
//! use cnu_stats_parser::parser::parse_line;
//!
//! let line = "12:1699999999.123:INFO:moca:handleCnuStats:45: <2:eth0>,<7:AA:BB:CC:DD:EE:FF>,<1> \
//!             <Rx Good/Bad,Percent 100/ 2, 1.96%> blah per channel <0:4/-3/30/100,4/200>";
//! let record = parse_line(line).expect("Failed to parse line");
//!
//! println!("{}", record);
//! ```

pub mod parser;
pub mod record;
pub mod report;
pub mod scan;
pub mod stats;

pub use parser::{Rejection, looks_like_cnu_stats, parse_channels, parse_line, try_parse_line};
pub use record::{ChannelStat, ParsedRecord, Reporter};
pub use report::{write_no_match_section, write_record};
pub use scan::{LogLines, ScanError, ScanOptions, run, scan};
pub use stats::{ScanStats, ScanSummary};
