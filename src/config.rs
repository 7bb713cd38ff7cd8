use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use neo6m_protocol::SentenceKind;
use neo6m_protocol::serial::DEFAULT_BAUD_RATE;

/// Decode RMC and VTG sentences from a NEO-6M GPS receiver.
#[derive(Debug, Parser)]
#[command(name = "neo6m-monitor", version)]
pub struct Args {
    /// Serial port of the receiver. Auto-detected when neither this nor
    /// --file is given.
    #[arg(short, long, conflicts_with = "file")]
    pub port: Option<String>,

    /// Read sentences from a capture file instead (`-` for stdin).
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Serial baud rate.
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Serial read timeout in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only print one sentence type.
    #[arg(long, value_enum)]
    pub only: Option<SentenceFilter>,

    /// Also report sentences whose status flag says there is no fix.
    #[arg(long)]
    pub show_void: bool,
}

/// How decoded sentences are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per sentence.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SentenceFilter {
    Rmc,
    Vtg,
}

impl From<SentenceFilter> for SentenceKind {
    fn from(filter: SentenceFilter) -> Self {
        match filter {
            SentenceFilter::Rmc => SentenceKind::Rmc,
            SentenceFilter::Vtg => SentenceKind::Vtg,
        }
    }
}

/// Where sentences are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A serial port; `None` means auto-detect.
    Serial {
        port: Option<String>,
        baud_rate: u32,
        timeout: Duration,
    },
    /// A capture file.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

/// Settings for the decode loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Output format.
    pub format: OutputFormat,
    /// Restrict output to one sentence type.
    pub only: Option<SentenceKind>,
    /// Report void sentences instead of dropping them silently.
    pub show_void: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            only: None,
            show_void: false,
        }
    }
}

impl MonitorConfig {
    /// Whether sentences of `kind` should be printed.
    pub fn accepts(&self, kind: SentenceKind) -> bool {
        self.only.is_none_or(|only| only == kind)
    }
}

impl Args {
    /// The input source selected on the command line.
    pub fn source(&self) -> Source {
        match &self.file {
            Some(path) if path.as_os_str() == "-" => Source::Stdin,
            Some(path) => Source::File(path.clone()),
            None => Source::Serial {
                port: self.port.clone(),
                baud_rate: self.baud,
                timeout: Duration::from_millis(self.timeout_ms),
            },
        }
    }

    /// Decode loop settings.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            format: self.format,
            only: self.only.map(SentenceKind::from),
            show_void: self.show_void,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["neo6m-monitor"]).unwrap();
        assert_eq!(
            args.source(),
            Source::Serial {
                port: None,
                baud_rate: 9600,
                timeout: Duration::from_millis(1000),
            }
        );
        let config = args.monitor_config();
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.only.is_none());
        assert!(!config.show_void);
    }

    #[test]
    fn test_serial_options() {
        let args = Args::try_parse_from([
            "neo6m-monitor",
            "--port",
            "/dev/ttyUSB0",
            "--baud",
            "38400",
            "--timeout-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(
            args.source(),
            Source::Serial {
                port: Some("/dev/ttyUSB0".into()),
                baud_rate: 38400,
                timeout: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn test_file_and_stdin() {
        let args = Args::try_parse_from(["neo6m-monitor", "-f", "capture.nmea"]).unwrap();
        assert_eq!(args.source(), Source::File(PathBuf::from("capture.nmea")));

        let args = Args::try_parse_from(["neo6m-monitor", "--file", "-"]).unwrap();
        assert_eq!(args.source(), Source::Stdin);
    }

    #[test]
    fn test_port_conflicts_with_file() {
        assert!(Args::try_parse_from(["neo6m-monitor", "-p", "COM3", "-f", "x.nmea"]).is_err());
    }

    #[test]
    fn test_filter_and_format() {
        let args = Args::try_parse_from([
            "neo6m-monitor",
            "--only",
            "vtg",
            "--format",
            "json",
            "--show-void",
        ])
        .unwrap();
        let config = args.monitor_config();
        assert_eq!(config.only, Some(SentenceKind::Vtg));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.show_void);
        assert!(config.accepts(SentenceKind::Vtg));
        assert!(!config.accepts(SentenceKind::Rmc));
    }

    #[test]
    fn test_accepts_everything_by_default() {
        let config = MonitorConfig::default();
        assert!(config.accepts(SentenceKind::Rmc));
        assert!(config.accepts(SentenceKind::Vtg));
    }
}
