//! Request middleware shared by the fkit servers

pub mod request_log;
pub mod serial;

pub use request_log::log_request_uri;
pub use serial::{serial_from_header, serial_number, with_serial, ClientSerial};
