use std::time::Duration;

use log::{debug, info, warn};
use serialport::{SerialPort, SerialPortType, UsbPortInfo};

use crate::error::{NmeaError, Result};

/// NEO-6M factory default baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// u-blox USB vendor ID (receivers with native USB).
const UBLOX_VID: u16 = 0x1546;

/// USB-UART bridges commonly wired to NEO-6M breakout boards.
const BRIDGE_VIDS: &[(u16, &str)] = &[
    (0x10C4, "CP210x"),
    (0x1A86, "CH340"),
    (0x0403, "FTDI"),
    (0x067B, "PL2303"),
];

/// Default serial port settings.
const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;
const STOP_BITS: serialport::StopBits = serialport::StopBits::One;
const PARITY: serialport::Parity = serialport::Parity::None;

/// Find the serial port of a GPS receiver.
///
/// Prefers a u-blox device with native USB, then falls back to the first
/// known USB-UART bridge.
pub fn find_gps_port() -> Result<String> {
    let ports = serialport::available_ports().map_err(NmeaError::Serial)?;

    let usb: Vec<(&str, &UsbPortInfo)> = ports
        .iter()
        .filter_map(|port| {
            debug!("found port: {} ({:?})", port.port_name, port.port_type);
            match &port.port_type {
                SerialPortType::UsbPort(usb_info) => Some((port.port_name.as_str(), usb_info)),
                _ => None,
            }
        })
        .collect();

    if let Some((name, _)) = usb.iter().find(|(_, usb_info)| usb_info.vid == UBLOX_VID) {
        info!("found u-blox receiver on {}", name);
        return Ok((*name).to_string());
    }

    for (name, usb_info) in &usb {
        if let Some((_, bridge)) = BRIDGE_VIDS.iter().find(|(vid, _)| *vid == usb_info.vid) {
            info!("using {} bridge on {}", bridge, name);
            return Ok((*name).to_string());
        }
    }

    // Log available ports for troubleshooting.
    if ports.is_empty() {
        warn!("no serial ports found");
    } else {
        warn!("no GPS receiver among {} port(s):", ports.len());
        for port in &ports {
            warn!("  {} ({:?})", port.port_name, port.port_type);
        }
    }

    Err(NmeaError::PortNotFound)
}

/// Open a serial port (8N1) at the given baud rate.
pub fn open_port(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DATA_BITS)
        .stop_bits(STOP_BITS)
        .parity(PARITY)
        .timeout(timeout)
        .open()
        .map_err(NmeaError::Serial)?;

    info!("opened {} at {} baud", port_name, baud_rate);
    Ok(port)
}
