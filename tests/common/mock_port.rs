use display_board::{Connect, Transport};
use log::trace;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// The far end of a mock serial line, shared between the test and the transport.
#[derive(Clone, Default)]
pub struct Wire {
	writes: Arc<Mutex<Vec<(Instant, Vec<u8>)>>>,
	inbound: Arc<Mutex<VecDeque<u8>>>,
	connects: Arc<AtomicUsize>,
	open: Arc<AtomicUsize>,
}

impl Wire {
	/// All writes so far, as text.
	pub fn written(&self) -> Vec<String> {
		self.writes
			.lock()
			.unwrap()
			.iter()
			.map(|(_, data)| String::from_utf8_lossy(data).into_owned())
			.collect()
	}

	/// The time of each write so far.
	pub fn write_times(&self) -> Vec<Instant> {
		self.writes.lock().unwrap().iter().map(|(time, _)| *time).collect()
	}

	/// Make bytes available for the transport to read.
	pub fn push_inbound(&self, data: &[u8]) {
		self.inbound.lock().unwrap().extend(data);
	}

	/// How many times the port was opened.
	pub fn connects(&self) -> usize {
		self.connects.load(Ordering::SeqCst)
	}

	/// How many opened transports have not been dropped yet.
	pub fn open_ports(&self) -> usize {
		self.open.load(Ordering::SeqCst)
	}
}

/// Blocks `connect()` until released.
#[derive(Clone, Default)]
pub struct Gate {
	inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
	pub fn release(&self) {
		let (lock, condvar) = &*self.inner;
		*lock.lock().unwrap() = true;
		condvar.notify_all();
	}

	fn wait(&self) {
		let (lock, condvar) = &*self.inner;
		let guard = lock.lock().unwrap();
		let (_guard, result) = condvar
			.wait_timeout_while(guard, Duration::from_secs(10), |released| !*released)
			.unwrap();
		assert!(!result.timed_out(), "gate was never released");
	}
}

#[derive(Clone)]
pub struct MockConnector {
	pub path: PathBuf,
	pub wire: Wire,
	pub fail_open: bool,
	/// Fail every write after this many successful writes.
	pub fail_write_after: Option<usize>,
	/// Fail every read on the opened transport.
	pub fail_read: bool,
	pub gate: Option<Gate>,
	/// Blocks every write until released.
	pub write_gate: Option<Gate>,
}

impl MockConnector {
	pub fn new() -> Self {
		Self {
			path: PathBuf::from("/dev/mock0"),
			wire: Wire::default(),
			fail_open: false,
			fail_write_after: None,
			fail_read: false,
			gate: None,
			write_gate: None,
		}
	}

	pub fn failing_open() -> Self {
		Self {
			fail_open: true,
			..Self::new()
		}
	}

	pub fn failing_write_after(count: usize) -> Self {
		Self {
			fail_write_after: Some(count),
			..Self::new()
		}
	}

	pub fn failing_read() -> Self {
		Self {
			fail_read: true,
			..Self::new()
		}
	}

	pub fn gated_writes(gate: Gate) -> Self {
		Self {
			write_gate: Some(gate),
			..Self::new()
		}
	}

	pub fn gated(gate: Gate) -> Self {
		Self {
			gate: Some(gate),
			..Self::new()
		}
	}
}

impl Connect for MockConnector {
	type Transport = MockTransport;
	type Error = std::io::Error;

	fn port(&self) -> &Path {
		&self.path
	}

	fn connect(&self) -> Result<MockTransport, std::io::Error> {
		if let Some(gate) = &self.gate {
			gate.wait();
		}
		if self.fail_open {
			return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such device"));
		}
		self.wire.connects.fetch_add(1, Ordering::SeqCst);
		self.wire.open.fetch_add(1, Ordering::SeqCst);
		Ok(MockTransport {
			wire: self.wire.clone(),
			fail_write_after: self.fail_write_after,
			fail_read: self.fail_read,
			write_gate: self.write_gate.clone(),
			written: 0,
		})
	}
}

pub struct MockTransport {
	wire: Wire,
	fail_write_after: Option<usize>,
	fail_read: bool,
	write_gate: Option<Gate>,
	written: usize,
}

impl Transport for MockTransport {
	type Error = std::io::Error;

	fn write_all(&mut self, buffer: &[u8]) -> Result<(), std::io::Error> {
		if let Some(gate) = &self.write_gate {
			gate.wait();
		}
		if self.fail_write_after.map_or(false, |limit| self.written >= limit) {
			return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device unplugged"));
		}
		trace!("mock write: {:?}", String::from_utf8_lossy(buffer));
		self.wire.writes.lock().unwrap().push((Instant::now(), buffer.to_vec()));
		self.written += 1;
		Ok(())
	}

	fn read(&mut self, buffer: &mut [u8], timeout: Duration) -> Result<usize, std::io::Error> {
		if self.fail_read {
			return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device unplugged"));
		}
		let deadline = Instant::now() + timeout;
		loop {
			{
				let mut inbound = self.wire.inbound.lock().unwrap();
				if !inbound.is_empty() {
					let len = buffer.len().min(inbound.len());
					for (target, byte) in buffer.iter_mut().zip(inbound.drain(..len)) {
						*target = byte;
					}
					return Ok(len);
				}
			}
			if Instant::now() >= deadline {
				return Ok(0);
			}
			std::thread::sleep(Duration::from_millis(1));
		}
	}
}

impl Drop for MockTransport {
	fn drop(&mut self) {
		self.wire.open.fetch_sub(1, Ordering::SeqCst);
	}
}
