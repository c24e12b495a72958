use std::io::Write;

use anyhow::Result;
use serialport::{SerialPortInfo, SerialPortType};

/// A serial device as reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    pub device: String,
    pub description: String,
}

impl PortDescriptor {
    pub fn new(device: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            description: description.into(),
        }
    }
}

impl From<SerialPortInfo> for PortDescriptor {
    fn from(info: SerialPortInfo) -> Self {
        let description = match info.port_type {
            SerialPortType::UsbPort(usb) => usb
                .product
                .or(usb.manufacturer)
                .unwrap_or_else(|| "n/a".to_string()),
            SerialPortType::PciPort => "PCI".to_string(),
            SerialPortType::BluetoothPort => "Bluetooth".to_string(),
            SerialPortType::Unknown => "n/a".to_string(),
        };
        Self {
            device: info.port_name,
            description,
        }
    }
}

/// Source of the currently attached serial devices.
pub trait PortDiscovery {
    fn ports(&self) -> Result<Vec<PortDescriptor>>;
}

/// Enumerates ports through the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPorts;

impl PortDiscovery for SystemPorts {
    fn ports(&self) -> Result<Vec<PortDescriptor>> {
        let ports = serialport::available_ports()?;
        debug!("serialport reported {} port(s)", ports.len());
        Ok(ports.into_iter().map(PortDescriptor::from).collect())
    }
}

impl<T: PortDiscovery + ?Sized> PortDiscovery for &T {
    fn ports(&self) -> Result<Vec<PortDescriptor>> {
        (**self).ports()
    }
}

pub fn format_port(index: usize, port: &PortDescriptor) -> String {
    format!("{}: {} ({})", index, port.device, port.description)
}

/// Writes the indexed port table in enumeration order.
pub fn print_ports<W: Write>(out: &mut W, ports: &[PortDescriptor]) -> Result<()> {
    writeln!(out, "Available COM ports:")?;
    for (i, port) in ports.iter().enumerate() {
        writeln!(out, "{}", format_port(i, port))?;
    }
    Ok(())
}

pub fn run<D: PortDiscovery, W: Write>(discovery: D, out: &mut W) -> Result<()> {
    let ports = discovery.ports()?;
    if ports.is_empty() {
        writeln!(out, "No serial ports found.")?;
        return Ok(());
    }
    print_ports(out, &ports)
}
