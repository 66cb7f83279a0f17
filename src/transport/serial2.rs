//! Serial port transport implementation using the `serial2` crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Re-exported `serial2` crate in case you need to modify serial port settings.
pub use serial2;

/// Default read and write timeout for opened ports.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection parameters for a serial port.
///
/// The port is opened with 8 bit characters, 1 stop bit, no parity and no flow control.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SerialSettings {
	/// The path or name of the serial port (`/dev/ttyUSB0`, `COM3`, ...).
	pub path: PathBuf,

	/// The baud rate of the serial line.
	pub baud_rate: u32,

	/// Timeout applied to every read and write on the opened port.
	pub timeout: Duration,
}

impl SerialSettings {
	/// Create settings for a port with the default timeout.
	pub fn new(path: impl Into<PathBuf>, baud_rate: u32) -> Self {
		Self {
			path: path.into(),
			baud_rate,
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Use a different read and write timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

impl crate::Connect for SerialSettings {
	type Transport = serial2::SerialPort;
	type Error = std::io::Error;

	fn port(&self) -> &Path {
		&self.path
	}

	fn connect(&self) -> Result<Self::Transport, Self::Error> {
		let mut port = serial2::SerialPort::open(&self.path, self.baud_rate)?;
		port.set_read_timeout(self.timeout)?;
		port.set_write_timeout(self.timeout)?;
		Ok(port)
	}
}

impl crate::Transport for serial2::SerialPort {
	type Error = std::io::Error;

	fn write_all(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
		serial2::SerialPort::write_all(self, buffer)
	}

	fn read(&mut self, buffer: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
		self.set_read_timeout(timeout)?;
		match serial2::SerialPort::read(self, buffer) {
			Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
			x => x,
		}
	}
}

/// List the serial ports available on the system.
pub fn list_ports() -> std::io::Result<Vec<PathBuf>> {
	serial2::SerialPort::available_ports()
}
