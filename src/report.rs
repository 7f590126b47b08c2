//! Fixed-layout text report for parsed records.
//!
//! The layout is consumed by people and by downstream scripts that grep the
//! labels, so field order, label padding and divider width never change.

use std::fmt;
use std::io::{self, Write};

use crate::record::{ChannelStat, ParsedRecord};

/// Divider printed above and below every record block.
pub const DIVIDER: &str = "---------------------------------------------------";

/// Heading of the trailing section listing unmatched lines.
pub const NO_MATCH_HEADING: &str = "=== DEBUG MODE: NO MATCH LINES ===";

impl fmt::Display for ChannelStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BandIndex: {} | RX bits/sym: {} | Power: {} dBm? | SNR: {} dB | RX PHY: {} Mbps | TX bits/sym: {} | TX PHY: {} Mbps",
            self.band_index,
            self.rx_bits_per_sym,
            self.rx_power,
            self.rx_snr,
            self.rx_phy_rate,
            self.tx_bits_per_sym,
            self.tx_phy_rate
        )
    }
}

/// Renders the whole record block, both dividers included, without a
/// trailing newline.
impl fmt::Display for ParsedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DIVIDER)?;
        writeln!(f, "Timestamp:  {}", self.timestamp)?;
        writeln!(f, "Level:      {}", self.trace_level)?;
        writeln!(f, "Module:     {}", self.module)?;
        writeln!(f, "Function:   {}", self.function)?;
        writeln!(f, "Line:       {}", self.source_line)?;
        writeln!(f, "MoCA Port:  {} ({})", self.moca_port, self.moca_port_dev)?;
        writeln!(f, "CNU ID:     {}", self.cnu_id)?;
        writeln!(f, "CNU MAC:    {}", self.cnu_mac)?;
        writeln!(f, "Source:     {}", self.reporter())?;
        writeln!(f, "Rx Good:    {}", self.rx_good)?;
        writeln!(f, "Rx Bad:     {}", self.rx_bad)?;
        writeln!(f, "Rx % Bad:   {}", self.rx_bad_percent)?;
        writeln!(f, "Channel Stats:")?;
        for channel in &self.channels {
            writeln!(f, "  {}", channel)?;
        }
        write!(f, "{}", DIVIDER)
    }
}

/// Write one record block followed by a newline.
pub fn write_record<W: Write>(out: &mut W, record: &ParsedRecord) -> io::Result<()> {
    writeln!(out, "{}", record)
}

/// Write the debug section listing lines that did not match.
///
/// Writes nothing when `lines` is empty.
pub fn write_no_match_section<W, S>(out: &mut W, lines: &[S]) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    if lines.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}", NO_MATCH_HEADING)?;
    for line in lines {
        writeln!(out, "NO MATCH: {}", line.as_ref())?;
    }
    Ok(())
}
