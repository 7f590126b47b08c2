//! Data structures representing parsed CNU statistics records.
//!
//! Every captured value is kept as the exact text that appeared in the log
//! line. Nothing is converted to a numeric type, so the rendered report shows
//! the device's own formatting (signs, leading zeros, trailing zeros).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the MoCA link produced the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporter {
    /// Reported by the head-end Micronode (source type `0`)
    Micronode,
    /// Reported by the CNU itself (any other source type)
    Cnu,
}

impl Reporter {
    /// Map the raw source-type token to a reporter.
    ///
    /// Only `"0"` means Micronode. Every other value, including ones the
    /// firmware is not known to emit, falls back to CNU.
    pub fn from_source_type(source_type: &str) -> Self {
        if source_type == "0" {
            Reporter::Micronode
        } else {
            Reporter::Cnu
        }
    }
}

impl fmt::Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporter::Micronode => write!(f, "Micronode"),
            Reporter::Cnu => write!(f, "CNU"),
        }
    }
}

/// One `<band: rxBits/rxPower/rxSnr/rxPhy,txBits/txPhy>` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStat {
    pub band_index: String,
    pub rx_bits_per_sym: String,
    /// Receive power, sign preserved (e.g. `-3`).
    pub rx_power: String,
    pub rx_snr: String,
    pub rx_phy_rate: String,
    pub tx_bits_per_sym: String,
    pub tx_phy_rate: String,
}

/// A single matched CNU statistics log line.
///
/// # Example
///
/// A raw line like:
/// ```text
/// 12:1699999999.123:INFO:moca:handleCnuStats:45: <2:eth0>,<7:AA:BB:CC:DD:EE:FF>,<1> <Rx Good/Bad,Percent 100/ 2, 1.96%> per channel <0:4/-3/30/100,4/200>
/// ```
///
/// Would be parsed into a `ParsedRecord` with:
/// - `timestamp`: "1699999999.123"
/// - `moca_port`: "2", `moca_port_dev`: "eth0"
/// - `cnu_id`: "7", `cnu_mac`: "AA:BB:CC:DD:EE:FF"
/// - `source_type`: "1" (reported by the CNU)
/// - `rx_good`: "100", `rx_bad`: "2", `rx_bad_percent`: "1.96"
/// - one channel with `rx_power`: "-3"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Epoch-style timestamp, kept as text (no rounding).
    pub timestamp: String,

    /// Trace severity label.
    pub trace_level: String,

    /// Subsystem that emitted the line.
    pub module: String,

    /// Function that emitted the line.
    pub function: String,

    /// Line number in the emitting source file.
    pub source_line: String,

    /// MoCA port index.
    pub moca_port: String,

    /// MoCA port device name, surrounding whitespace trimmed.
    pub moca_port_dev: String,

    /// CNU identifier on the port.
    pub cnu_id: String,

    /// CNU MAC address text, surrounding whitespace trimmed.
    pub cnu_mac: String,

    /// Raw source-type token. See [`ParsedRecord::reporter`].
    pub source_type: String,

    /// Good packet count.
    pub rx_good: String,

    /// Bad packet count.
    pub rx_bad: String,

    /// Bad packet percentage, without the `%` sign.
    pub rx_bad_percent: String,

    /// Per-channel measurements in the order they appeared in the line.
    pub channels: Vec<ChannelStat>,
}

impl ParsedRecord {
    /// Returns which side of the link reported these statistics.
    pub fn reporter(&self) -> Reporter {
        Reporter::from_source_type(&self.source_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(source_type: &str) -> ParsedRecord {
        ParsedRecord {
            timestamp: "1699999999.123".to_string(),
            trace_level: "INFO".to_string(),
            module: "moca".to_string(),
            function: "handleCnuStats".to_string(),
            source_line: "45".to_string(),
            moca_port: "2".to_string(),
            moca_port_dev: "eth0".to_string(),
            cnu_id: "7".to_string(),
            cnu_mac: "AA:BB:CC:DD:EE:FF".to_string(),
            source_type: source_type.to_string(),
            rx_good: "100".to_string(),
            rx_bad: "2".to_string(),
            rx_bad_percent: "1.96".to_string(),
            channels: Vec::new(),
        }
    }

    #[test]
    fn test_reporter_mapping() {
        assert_eq!(make_record("0").reporter(), Reporter::Micronode);
        assert_eq!(make_record("1").reporter(), Reporter::Cnu);
        // Unknown source types are treated as CNU
        assert_eq!(make_record("2").reporter(), Reporter::Cnu);
        assert_eq!(make_record("00").reporter(), Reporter::Cnu);
    }

    #[test]
    fn test_reporter_display() {
        assert_eq!(Reporter::Micronode.to_string(), "Micronode");
        assert_eq!(Reporter::Cnu.to_string(), "CNU");
    }

    #[test]
    fn test_serialize_keeps_text_values() {
        let mut record = make_record("1");
        record.channels.push(ChannelStat {
            band_index: "0".to_string(),
            rx_bits_per_sym: "4".to_string(),
            rx_power: "-03".to_string(),
            rx_snr: "30".to_string(),
            rx_phy_rate: "100".to_string(),
            tx_bits_per_sym: "4".to_string(),
            tx_phy_rate: "200".to_string(),
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "1699999999.123");
        assert_eq!(json["rx_bad_percent"], "1.96");
        assert_eq!(json["channels"][0]["rx_power"], "-03");

        let back: ParsedRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
