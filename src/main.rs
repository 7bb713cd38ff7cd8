use std::fs::File;
use std::io::{self, BufReader};

use clap::Parser;
use log::info;

use neo6m_monitor::{Args, MonitorError, MonitorStats, Source, run};
use neo6m_protocol::{NmeaError, serial};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.monitor_config();

    let result = match args.source() {
        Source::Stdin => run(io::stdin().lock(), io::stdout().lock(), &config),
        Source::File(path) => File::open(&path)
            .map_err(MonitorError::from)
            .and_then(|file| run(BufReader::new(file), io::stdout().lock(), &config)),
        Source::Serial {
            port,
            baud_rate,
            timeout,
        } => port
            .map_or_else(serial::find_gps_port, Ok)
            .and_then(|name| serial::open_port(&name, baud_rate, timeout))
            .map_err(MonitorError::from)
            .and_then(|port| run(BufReader::new(port), io::stdout().lock(), &config)),
    };

    match result {
        Ok(stats) => report(&stats),
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, MonitorError::Nmea(NmeaError::PortNotFound)) {
                eprintln!();
                eprintln!("Troubleshooting:");
                eprintln!("  1. Connect the receiver's USB-UART adapter (or pass --port)");
                eprintln!("  2. Wire NEO-6M TX to the adapter RX and share ground");
                eprintln!("  3. Check the adapter driver (CP210x / CH340 / FTDI) is installed");
                eprintln!("  4. Or replay a capture with --file <PATH>");
            }
            std::process::exit(1);
        }
    }
}

fn report(stats: &MonitorStats) {
    info!(
        "{} lines: {} decoded, {} filtered, {} void, {} unknown, {} malformed",
        stats.lines, stats.decoded, stats.filtered, stats.void, stats.unknown, stats.malformed
    );
}
