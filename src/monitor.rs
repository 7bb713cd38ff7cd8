use std::io::{self, BufRead, ErrorKind, Write};

use log::{debug, trace};
use neo6m_protocol::protocol::{LF, MAX_LINE_LEN};
use neo6m_protocol::{NmeaError, RmcInfo, Sentence, VtgInfo, decode_any};

use crate::config::{MonitorConfig, OutputFormat};
use crate::error::Result;

/// Per-run line counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Lines read, complete or not.
    pub lines: usize,
    /// Sentences decoded and printed.
    pub decoded: usize,
    /// Sentences decoded but filtered out by `only`.
    pub filtered: usize,
    /// Known sentences with a void status flag.
    pub void: usize,
    /// Lines with an unknown identifier.
    pub unknown: usize,
    /// Lines the tokenizer rejected.
    pub malformed: usize,
}

/// Decode every line from `reader` and write the results to `writer`.
///
/// Lines are split on `\n`. Read timeouts (from a serial port) are retried
/// without losing a partially received line; any other I/O error ends the
/// run. Returns at end of input.
pub fn run<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    config: &MonitorConfig,
) -> Result<MonitorStats> {
    let mut stats = MonitorStats::default();
    let mut line = Vec::with_capacity(MAX_LINE_LEN + 1);

    loop {
        match read_line(&mut reader, &mut line)? {
            Line::Eof => break,
            Line::Complete => {
                stats.lines += 1;
                handle_line(&line, &mut writer, config, &mut stats)?;
            }
            Line::Oversized => {
                debug!("dropping line longer than {MAX_LINE_LEN} bytes");
                stats.lines += 1;
                stats.malformed += 1;
            }
        }
        line.clear();
    }

    Ok(stats)
}

/// Result of reading one line into the caller's buffer.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// A `\n`-terminated line, or the unterminated tail at end of input.
    Complete,
    /// The line outgrew `MAX_LINE_LEN`; the rest of it was skipped.
    Oversized,
    /// No more input.
    Eof,
}

/// Append the next line to `line`, keeping at most `MAX_LINE_LEN + 1` bytes.
///
/// Once the cap is passed the remaining bytes up to the next `\n` are
/// consumed and dropped.
fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<Line> {
    let mut oversized = false;

    loop {
        let (found, used) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(match (oversized, line.is_empty()) {
                    (true, _) => Line::Oversized,
                    (false, true) => Line::Eof,
                    (false, false) => Line::Complete,
                });
            }
            let (found, used) = match available.iter().position(|&b| b == LF) {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            };
            if !oversized {
                let room = (MAX_LINE_LEN + 1).saturating_sub(line.len());
                line.extend_from_slice(&available[..used.min(room)]);
                oversized = line.len() > MAX_LINE_LEN;
            }
            (found, used)
        };
        reader.consume(used);

        if found {
            return Ok(if oversized { Line::Oversized } else { Line::Complete });
        }
    }
}

fn handle_line<W: Write>(
    line: &[u8],
    writer: &mut W,
    config: &MonitorConfig,
    stats: &mut MonitorStats,
) -> Result<()> {
    match decode_any(line) {
        Ok(sentence) if config.accepts(sentence.kind()) => {
            stats.decoded += 1;
            write_sentence(writer, &sentence, config.format)?;
        }
        Ok(sentence) => {
            trace!("filtered {}", sentence.kind());
            stats.filtered += 1;
        }
        Err(NmeaError::SentenceVoid) => {
            stats.void += 1;
            if config.show_void {
                let text = String::from_utf8_lossy(line);
                writeln!(writer, "VOID {}", text.trim_end())?;
                writer.flush()?;
            }
        }
        Err(NmeaError::UnknownSentence) => stats.unknown += 1,
        Err(e) => {
            debug!("dropping line: {e}");
            stats.malformed += 1;
        }
    }
    Ok(())
}

fn write_sentence<W: Write>(writer: &mut W, sentence: &Sentence, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, sentence)?;
            writeln!(writer)?;
        }
        OutputFormat::Text => match sentence {
            Sentence::Rmc(rmc) => write_rmc(writer, rmc)?,
            Sentence::Vtg(vtg) => write_vtg(writer, vtg)?,
        },
    }
    writer.flush()?;
    Ok(())
}

fn write_rmc<W: Write>(writer: &mut W, rmc: &RmcInfo) -> std::io::Result<()> {
    writeln!(
        writer,
        "RMC {} {} lat {} lon {}",
        rmc.date, rmc.time, rmc.latitude, rmc.longitude
    )
}

fn write_vtg<W: Write>(writer: &mut W, vtg: &VtgInfo) -> std::io::Result<()> {
    writeln!(
        writer,
        "VTG course {:.2} speed {:.3} kn {:.3} km/h",
        vtg.course, vtg.speed_knots, vtg.speed_kph
    )
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor, Read};

    use neo6m_protocol::SentenceKind;

    use super::*;

    const CAPTURE: &str = "\
$GPRMC,142754.00,A,1048.17086,N,10639.46105,E,0.034,,210923,,,A*73\r
$GPVTG,184.34,T,,M,1.936,N,3.586,K,A*32\r
$GPGSV,4,4,14,47,10,093,42,50,44,103,35*73\r
$GPRMC,,V,,,,,,,,,,N*53\r
$GPVTG,,T,,M,2.181,N,4.039,K,D*27\r
$GPVTG,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17,18,19,20\r
";

    fn run_capture(input: &str, config: &MonitorConfig) -> (MonitorStats, String) {
        let mut out = Vec::new();
        let stats = run(Cursor::new(input), &mut out, config).unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_run_counts() {
        let (stats, _) = run_capture(CAPTURE, &MonitorConfig::default());
        assert_eq!(
            stats,
            MonitorStats {
                lines: 6,
                decoded: 2,
                filtered: 0,
                void: 2,
                unknown: 1,
                malformed: 1,
            }
        );
    }

    #[test]
    fn test_run_text_output() {
        let (_, out) = run_capture(CAPTURE, &MonitorConfig::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "RMC 2023-09-21 14:27:54 lat 10.80284 N lon 106.65768 E",
                "VTG course 184.34 speed 1.936 kn 3.586 km/h",
            ]
        );
    }

    #[test]
    fn test_run_json_output() {
        let config = MonitorConfig {
            format: OutputFormat::Json,
            ..Default::default()
        };
        let (_, out) = run_capture(CAPTURE, &config);
        let values: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["type"], "rmc");
        assert_eq!(values[0]["time"]["hour"], 14);
        assert_eq!(values[0]["longitude"]["hemisphere"], "E");
        assert_eq!(values[1]["type"], "vtg");
        assert!((values[1]["speed_kph"].as_f64().unwrap() - 3.586).abs() < 1e-4);
    }

    #[test]
    fn test_run_filter() {
        let config = MonitorConfig {
            only: Some(SentenceKind::Vtg),
            ..Default::default()
        };
        let (stats, out) = run_capture(CAPTURE, &config);
        assert_eq!(stats.decoded, 1);
        assert_eq!(stats.filtered, 1);
        assert!(out.starts_with("VTG"));
    }

    #[test]
    fn test_run_show_void() {
        let config = MonitorConfig {
            show_void: true,
            ..Default::default()
        };
        let (_, out) = run_capture(CAPTURE, &config);
        assert!(out.contains("VOID $GPRMC,,V,,,,,,,,,,N*53\n"));
        assert!(out.contains("VOID $GPVTG,,T,,M,2.181,N,4.039,K,D*27\n"));
    }

    #[test]
    fn test_run_unterminated_tail() {
        let (stats, out) = run_capture(
            "$GPVTG,184.34,T,,M,1.936,N,3.586,K,A*32",
            &MonitorConfig::default(),
        );
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.malformed, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_oversized_line_is_bounded() {
        let noise = io::repeat(b'x').take(4 << 20);
        let reader = noise.chain(Cursor::new(&b"\n$GPVTG,184.34,T,,M,1.936,N,3.586,K,A*32\r\n"[..]));
        let mut out = Vec::new();
        let stats = run(BufReader::new(reader), &mut out, &MonitorConfig::default()).unwrap();
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.decoded, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "VTG course 184.34 speed 1.936 kn 3.586 km/h\n"
        );
    }

    #[test]
    fn test_read_line_caps_buffer() {
        let mut reader = BufReader::new(io::repeat(b'x').take(1 << 16));
        let mut line = Vec::new();
        assert_eq!(read_line(&mut reader, &mut line).unwrap(), Line::Oversized);
        assert_eq!(line.len(), MAX_LINE_LEN + 1);
        line.clear();
        assert_eq!(read_line(&mut reader, &mut line).unwrap(), Line::Eof);
    }

    #[test]
    fn test_read_line_at_cap_is_complete() {
        let mut text = vec![b','; MAX_LINE_LEN - 1];
        text.push(LF);
        let mut reader = Cursor::new(text);
        let mut line = Vec::new();
        assert_eq!(read_line(&mut reader, &mut line).unwrap(), Line::Complete);
        assert_eq!(line.len(), MAX_LINE_LEN);
    }

    /// Yields a timeout in the middle of a line, like a serial port would.
    struct StutteringReader {
        chunks: Vec<io::Result<&'static [u8]>>,
    }

    impl Read for StutteringReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0)?;
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_run_retries_timeouts() {
        let reader = StutteringReader {
            chunks: vec![
                Ok(&b"$GPVTG,184.34,T,,M,"[..]),
                Err(io::Error::from(ErrorKind::TimedOut)),
                Ok(&b"1.936,N,3.586,K,A*32\r\n"[..]),
            ],
        };
        let mut out = Vec::new();
        let stats = run(BufReader::new(reader), &mut out, &MonitorConfig::default()).unwrap();
        assert_eq!(stats.decoded, 1);
        assert_eq!(stats.malformed, 0);
    }

    #[test]
    fn test_run_propagates_other_errors() {
        let reader = StutteringReader {
            chunks: vec![Err(io::Error::from(ErrorKind::BrokenPipe))],
        };
        let result = run(BufReader::new(reader), Vec::new(), &MonitorConfig::default());
        assert!(result.is_err());
    }
}
