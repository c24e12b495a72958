pub mod list;
pub mod select;

pub use list::{PortDescriptor, PortDiscovery, SystemPorts};
pub use select::{select_port, SelectError};
