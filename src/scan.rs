//! Line-by-line scan of a log file into the text report.
//!
//! Matched records are written as soon as they are parsed. Unmatched lines
//! are kept until the end of input, since they are only printed in debug mode
//! after every record.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::parser::{looks_like_cnu_stats, try_parse_line};
use crate::record::ParsedRecord;
use crate::report::{write_no_match_section, write_record};
use crate::stats::ScanStats;

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Cannot open input file {}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("Cannot open output file {}", .path.display())]
    OpenOutput { path: PathBuf, source: io::Error },

    #[error("Failed to read input line {line}")]
    Read { line: usize, source: io::Error },

    #[error("Failed to write report")]
    Write(#[from] io::Error),
}

/// What to scan and where the report goes.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Log file to read.
    pub input: PathBuf,

    /// Report destination; standard output when `None`.
    pub output: Option<PathBuf>,

    /// Append the unmatched lines after the report.
    pub debug: bool,
}

/// Open the input and output named in `options` and scan.
///
/// The input is opened first, so a missing input never truncates an existing
/// output file.
pub fn run(options: &ScanOptions) -> Result<ScanStats, ScanError> {
    let input = File::open(&options.input).map_err(|source| ScanError::OpenInput {
        path: options.input.clone(),
        source,
    })?;
    let reader = BufReader::new(input);

    info!("Scanning {}", options.input.display());

    match &options.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| ScanError::OpenOutput {
                path: path.clone(),
                source,
            })?;
            info!("Writing report to {}", path.display());
            let mut writer = BufWriter::new(file);
            scan(reader, &mut writer, options.debug)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            scan(reader, &mut writer, options.debug)
        }
    }
}

/// Lines of a log, split on `\n`, `\r\n` or a lone `\r`.
///
/// Terminators are stripped; every other character is kept. Some device
/// consoles emit bare carriage returns, so a `\r` alone also ends a line.
pub struct LogLines<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.pop_front() {
            return Some(Ok(line));
        }

        let mut chunk = Vec::new();
        match self.reader.read_until(b'\n', &mut chunk) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(e)),
        }

        if chunk.last() == Some(&b'\n') {
            chunk.pop();
        }
        if chunk.last() == Some(&b'\r') {
            chunk.pop();
        }

        let text = match String::from_utf8(chunk) {
            Ok(text) => text,
            Err(e) => return Some(Err(io::Error::new(io::ErrorKind::InvalidData, e))),
        };

        // Any '\r' left in the chunk ends a line of its own
        let mut lines = text.split('\r').map(str::to_string);
        let first = lines.next().unwrap_or_default();
        self.pending.extend(lines);
        Some(Ok(first))
    }
}

/// Scan `input` line by line, writing one block per matched line to `out`.
///
/// When `debug` is set and some lines did not match, they are listed after
/// all record blocks, in input order. The writer is flushed before returning.
pub fn scan<R, W>(input: R, out: &mut W, debug: bool) -> Result<ScanStats, ScanError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = ScanStats::new();
    let mut no_match_lines = Vec::new();

    for (index, line) in LogLines::new(input).enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| ScanError::Read {
            line: line_number,
            source,
        })?;
        stats.record_line(line.len() as u64);

        match process_line(line_number, &line, &mut stats) {
            Some(record) => write_record(out, &record)?,
            None => no_match_lines.push(line),
        }
    }

    if debug {
        write_no_match_section(out, &no_match_lines)?;
    }
    out.flush()?;

    info!("Scan finished: {}", stats.summary());
    Ok(stats)
}

/// Process a single line from the log.
fn process_line(
    line_number: usize,
    line: &str,
    stats: &mut ScanStats,
) -> Option<ParsedRecord> {
    // Quick filter for the bulk of the trace log
    if !looks_like_cnu_stats(line) {
        stats.record_non_stat_line();
        debug!("Line {}: not a CNU stats line: {}", line_number, line);
        return None;
    }

    match try_parse_line(line) {
        Ok(record) => {
            stats.record_match(&record);
            Some(record)
        }
        Err(rejection) => {
            stats.record_parse_failure();
            debug!("Line {}: {}: {}", line_number, rejection, line);
            None
        }
    }
}
