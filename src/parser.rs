//! Parser for MoCA CNU statistics log lines.
//!
//! This module uses the `nom` parsing library to pull CNU link statistics out
//! of device trace logs. Most lines in such a log are not statistics lines;
//! those are simply rejected. A line is either matched in full or rejected,
//! there is no partial result.
//!
//! # Line Format
//!
//! ```text
//! ID:TIMESTAMP:LEVEL:MODULE: FUNCTION :LINE: <PORT:DEV>,<CNU,MAC>,<SRC> <Rx Good/Bad,Percent G/ B, P%> ... per channel <...><...>
//! ```
//!
//! Example:
//! ```text
//! 12:1699999999.123:INFO:moca:handleCnuStats:45: <2:eth0>,<7:AA:BB:CC:DD:EE:FF>,<1> <Rx Good/Bad,Percent 100/ 2, 1.96%> blah per channel <0:4/-3/30/100,4/200><1:5/2/28/90,3/180>
//! ```
//!
//! Each channel group has the shape
//! `<band: rxBitsPerSym/rxPower/rxSnr/rxPhyRate,txBitsPerSym/txPhyRate>`.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till1, take_until, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, opt, recognize, rest},
    error::ErrorKind,
    sequence::{delimited, preceded, separated_pair, terminated},
};
use thiserror::Error;
use tracing::trace;

use crate::record::{ChannelStat, ParsedRecord};

/// Literal tag that introduces the good/bad packet counters.
pub const RX_COUNTERS_TAG: &str = "<Rx Good/Bad,Percent";

/// Literal marker that precedes the channel groups.
pub const CHANNEL_MARKER: &str = "per channel";

/// Why a line did not match: the header field that failed and where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no match at {stage} (column {column}, {kind:?})")]
pub struct Rejection {
    /// Header field the parser was reading.
    pub stage: &'static str,

    /// Byte offset into the line where parsing stopped.
    pub column: usize,

    /// The nom error kind reported at that point.
    pub kind: ErrorKind,
}

/// Tag a header step's failure with its stage and position in `line`.
fn at_stage<'a, O>(
    line: &str,
    stage: &'static str,
    result: IResult<&'a str, O>,
) -> Result<(&'a str, O), Rejection> {
    result.map_err(|e| {
        let (column, kind) = match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => (line.len() - e.input.len(), e.code),
            nom::Err::Incomplete(_) => (line.len(), ErrorKind::Eof),
        };
        Rejection {
            stage,
            column,
            kind,
        }
    })
}

/// Check if a character belongs to a word token (level and module names).
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check if a character may appear in a timestamp or percentage.
fn is_decimal_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Parse zero or more whitespace characters.
fn whitespace0(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace).parse(input)
}

/// Parse one or more whitespace characters.
fn whitespace1(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace).parse(input)
}

fn decimal_text(input: &str) -> IResult<&str, &str> {
    take_while1(is_decimal_char).parse(input)
}

/// Parse the free text inside an angle-bracket group, up to the closing `>`.
fn bracket_text(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '>').parse(input)
}

/// Parse the leading identifier. It is not used in the report.
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    preceded(whitespace0, terminated(digit1, char(':'))).parse(input)
}

fn parse_timestamp(input: &str) -> IResult<&str, &str> {
    terminated(decimal_text, char(':')).parse(input)
}

/// Parse a word token followed by a colon (trace level, module).
fn parse_word_field(input: &str) -> IResult<&str, &str> {
    terminated(take_while1(is_word_char), char(':')).parse(input)
}

/// Parse the function name. Whitespace is allowed around it.
fn parse_function(input: &str) -> IResult<&str, &str> {
    delimited(
        whitespace0,
        take_till1(|c: char| c.is_whitespace() || c == ':'),
        (whitespace0, char(':'), whitespace0),
    )
    .parse(input)
}

fn parse_source_line(input: &str) -> IResult<&str, &str> {
    terminated(digit1, (char(':'), whitespace0)).parse(input)
}

/// Parse the `<port:dev>` group.
fn parse_port_group(input: &str) -> IResult<&str, (&str, &str)> {
    delimited(
        char('<'),
        separated_pair(digit1, char(':'), bracket_text),
        char('>'),
    )
    .parse(input)
}

/// Parse the `<cnuId,mac>` group.
///
/// Firmware builds differ on the separator, both `<7,AA:BB:..>` and
/// `<7:AA:BB:..>` are seen in the field.
fn parse_cnu_group(input: &str) -> IResult<&str, (&str, &str)> {
    delimited(
        char('<'),
        separated_pair(digit1, one_of(",:"), bracket_text),
        char('>'),
    )
    .parse(input)
}

fn parse_group_separator(input: &str) -> IResult<&str, char> {
    char(',').parse(input)
}

fn parse_source_type(input: &str) -> IResult<&str, &str> {
    delimited(char('<'), digit1, char('>')).parse(input)
}

/// Parse `<Rx Good/Bad,Percent G/ B, P%>` into (good, bad, percent).
fn parse_rx_counters(input: &str) -> IResult<&str, (&str, &str, &str)> {
    (
        preceded(
            (whitespace0, tag(RX_COUNTERS_TAG), whitespace1),
            terminated(digit1, (char('/'), whitespace0)),
        ),
        terminated(digit1, (char(','), whitespace0)),
        terminated(decimal_text, tag("%>")),
    )
        .parse(input)
}

/// Skip to the first `per channel` marker and return everything after it.
fn parse_channel_segment(input: &str) -> IResult<&str, &str> {
    preceded(
        (take_until(CHANNEL_MARKER), tag(CHANNEL_MARKER), whitespace0),
        rest,
    )
    .parse(input)
}

/// Parse one `<band: rxBits/rxPower/rxSnr/rxPhy,txBits/txPhy>` group.
fn parse_channel(input: &str) -> IResult<&str, ChannelStat> {
    map(
        (
            delimited(char('<'), digit1, (char(':'), whitespace0)),
            terminated(digit1, char('/')),
            terminated(recognize((opt(char('-')), digit1)), char('/')),
            terminated(digit1, char('/')),
            terminated(digit1, char(',')),
            terminated(digit1, char('/')),
            terminated(digit1, char('>')),
        ),
        |(band_index, rx_bits, rx_power, rx_snr, rx_phy, tx_bits, tx_phy): (
            &str,
            &str,
            &str,
            &str,
            &str,
            &str,
            &str,
        )| ChannelStat {
            band_index: band_index.to_string(),
            rx_bits_per_sym: rx_bits.to_string(),
            rx_power: rx_power.to_string(),
            rx_snr: rx_snr.to_string(),
            rx_phy_rate: rx_phy.to_string(),
            tx_bits_per_sym: tx_bits.to_string(),
            tx_phy_rate: tx_phy.to_string(),
        },
    )
    .parse(input)
}

/// Collect every channel group in `segment`, left to right.
///
/// Text that is not a well-formed group is skipped. Matches never overlap:
/// scanning resumes right after the closing `>` of the previous group.
///
/// # Example
///
/// ```
/// use cnu_stats_parser::parser::parse_channels;
///
/// let channels = parse_channels("<0:4/-3/30/100,4/200> junk <1: 5/2/28/90,3/180>");
/// assert_eq!(channels.len(), 2);
/// assert_eq!(channels[0].rx_power, "-3");
/// assert_eq!(channels[1].band_index, "1");
/// ```
pub fn parse_channels(segment: &str) -> Vec<ChannelStat> {
    let mut channels = Vec::new();
    let mut remaining = segment;

    while let Some(start) = remaining.find('<') {
        let candidate = &remaining[start..];
        match parse_channel(candidate) {
            Ok((after, channel)) => {
                channels.push(channel);
                remaining = after;
            }
            // '<' is one byte, so slicing past it stays on a char boundary
            Err(_) => remaining = &candidate[1..],
        }
    }

    channels
}

/// Parse a full statistics line into a record, or say where it stopped.
///
/// # Example
///
/// ```
/// use cnu_stats_parser::parser::try_parse_line;
///
/// let rejection = try_parse_line("12:1699999999.123:INFO moca").unwrap_err();
/// assert_eq!(rejection.stage, "trace level");
/// ```
pub fn try_parse_line(line: &str) -> Result<ParsedRecord, Rejection> {
    let (input, _identifier) = at_stage(line, "identifier", parse_identifier(line))?;
    let (input, timestamp) = at_stage(line, "timestamp", parse_timestamp(input))?;
    let (input, trace_level) = at_stage(line, "trace level", parse_word_field(input))?;
    let (input, module) = at_stage(line, "module", parse_word_field(input))?;
    let (input, function) = at_stage(line, "function", parse_function(input))?;
    let (input, source_line) = at_stage(line, "source line", parse_source_line(input))?;
    let (input, (moca_port, moca_port_dev)) =
        at_stage(line, "port group", parse_port_group(input))?;
    let (input, _) = at_stage(line, "group separator", parse_group_separator(input))?;
    let (input, (cnu_id, cnu_mac)) = at_stage(line, "cnu group", parse_cnu_group(input))?;
    let (input, _) = at_stage(line, "group separator", parse_group_separator(input))?;
    let (input, source_type) = at_stage(line, "source type", parse_source_type(input))?;
    let (input, (rx_good, rx_bad, rx_bad_percent)) =
        at_stage(line, "rx counters", parse_rx_counters(input))?;
    let (_, channel_segment) = at_stage(line, "channel marker", parse_channel_segment(input))?;

    Ok(ParsedRecord {
        timestamp: timestamp.to_string(),
        trace_level: trace_level.to_string(),
        module: module.to_string(),
        function: function.to_string(),
        source_line: source_line.to_string(),
        moca_port: moca_port.to_string(),
        moca_port_dev: moca_port_dev.trim().to_string(),
        cnu_id: cnu_id.to_string(),
        cnu_mac: cnu_mac.trim().to_string(),
        source_type: source_type.to_string(),
        rx_good: rx_good.to_string(),
        rx_bad: rx_bad.to_string(),
        rx_bad_percent: rx_bad_percent.to_string(),
        channels: parse_channels(channel_segment),
    })
}

/// Parse a single log line (line terminator already stripped).
///
/// Returns `None` when the line is not a CNU statistics line. The header is
/// all-or-nothing; a channel segment without any groups is still a match.
///
/// # Example
///
/// ```
/// use cnu_stats_parser::parser::parse_line;
///
/// let line = "12:1699999999.123:INFO:moca:handleCnuStats:45: <2:eth0>,<7,AA:BB:CC:DD:EE:FF>,<0> \
///             <Rx Good/Bad,Percent 100/ 2, 1.96%> per channel <0:4/-3/30/100,4/200>";
/// let record = parse_line(line).unwrap();
/// assert_eq!(record.cnu_mac, "AA:BB:CC:DD:EE:FF");
/// assert_eq!(record.channels[0].rx_power, "-3");
/// ```
pub fn parse_line(line: &str) -> Option<ParsedRecord> {
    match try_parse_line(line) {
        Ok(record) => {
            trace!(
                "Matched CNU {} on port {} with {} channels",
                record.cnu_id,
                record.moca_port,
                record.channels.len()
            );
            Some(record)
        }
        Err(_) => None,
    }
}

/// Check if a line could be a statistics line (quick pre-filter).
///
/// This is a fast check to avoid running the full parser on the bulk of a
/// trace log. It never rejects a line that [`parse_line`] would accept.
#[inline]
pub fn looks_like_cnu_stats(line: &str) -> bool {
    line.contains(RX_COUNTERS_TAG) && line.contains(CHANNEL_MARKER)
}
