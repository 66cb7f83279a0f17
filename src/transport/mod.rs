//! Traits to support different serial connections.
//!
//! The [`Sender`](crate::Sender) never opens a port itself.
//! It is given a [`Connect`] implementation and calls it from the delivery thread,
//! so a slow or hanging device never blocks the caller.

use core::time::Duration;
use std::path::Path;

#[cfg(feature = "serial2")]
pub mod serial2;

/// An open connection to the display board.
///
/// The connection is owned by the delivery thread and dropped (closed) when the thread exits.
pub trait Transport: Send + 'static {
	/// The error type returned when reading or writing fails.
	type Error: std::error::Error + Send + Sync + 'static;

	/// Write all bytes in the buffer to the transport.
	fn write_all(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

	/// Read available bytes, blocking until at least one byte is available or the timeout expires.
	///
	/// Returns `Ok(0)` if the timeout expired.
	fn read(&mut self, buffer: &mut [u8], timeout: Duration) -> Result<usize, Self::Error>;
}

/// Opens a [`Transport`].
pub trait Connect: Send + Sync + 'static {
	/// The transport created by this connector.
	type Transport: Transport;

	/// The error returned when the transport can not be opened.
	type Error: std::error::Error + Send + Sync + 'static;

	/// The port identifier, used in log messages and errors.
	fn port(&self) -> &Path;

	/// Open the transport.
	fn connect(&self) -> Result<Self::Transport, Self::Error>;
}
