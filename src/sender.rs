use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{NotRunning, OpenError, ReadError, SendError, WriteError};
use crate::frame::Frame;
use crate::observer::Observer;
use crate::queue::{FrameQueue, Pacing, Pop};
use crate::transport::{Connect, Transport};

/// Tuning parameters for a [`Sender`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SenderOptions {
	/// How long the delivery loop waits for a frame before checking the stop flag again.
	///
	/// This is also the delay between the last write of a batch and [`Observer::on_done()`].
	pub poll_interval: Duration,

	/// How long [`Sender::stop()`] waits for the delivery loop to exit.
	pub stop_timeout: Duration,

	/// Read and log bytes sent by the board between writes.
	pub drain_inbound: bool,

	/// Read timeout used when draining inbound bytes.
	pub read_timeout: Duration,
}

impl Default for SenderOptions {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(500),
			stop_timeout: Duration::from_secs(2),
			drain_inbound: false,
			read_timeout: Duration::from_millis(10),
		}
	}
}

/// The state of a run of the delivery loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum State {
	/// No run was started yet.
	Idle,
	/// The port is being opened.
	Opening,
	/// The port could not be opened.
	OpenFailed,
	/// The port is open and the queue is drained.
	Connected,
	/// The port is open and frames are being written.
	Sending,
	/// An I/O error ended the run.
	Failed,
	/// The delivery loop exited and the port is closed.
	Stopped,
}

/// Paced frame writer that owns a serial connection on a background thread.
///
/// Frames submitted with [`Self::send()`] are written in order,
/// with at least one `period` between consecutive writes.
/// Submitting never blocks: the pacing happens on the delivery thread.
///
/// Failures are never retried.
/// After a failure, call [`Self::start()`] again to open a new connection.
pub struct Sender<C: Connect> {
	connector: Arc<C>,
	period: Duration,
	options: SenderOptions,
	observer: Arc<dyn Observer>,
	run: Option<Run>,
}

/// One started delivery loop.
struct Run {
	shared: Arc<Shared>,
	worker: Option<JoinHandle<()>>,
}

/// State shared between the caller and the delivery thread.
struct Shared {
	queue: FrameQueue,
	state: Mutex<State>,
}

impl<C: Connect> std::fmt::Debug for Sender<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Sender")
			.field("port", &self.connector.port())
			.field("period", &self.period)
			.field("state", &self.state())
			.finish_non_exhaustive()
	}
}

impl<C: Connect> Sender<C> {
	/// Create a sender that is not running yet.
	pub fn new(connector: C, period: Duration, observer: impl Observer) -> Self {
		Self::with_options(connector, period, observer, SenderOptions::default())
	}

	/// Create a sender with custom tuning parameters.
	pub fn with_options(connector: C, period: Duration, observer: impl Observer, options: SenderOptions) -> Self {
		Self {
			connector: Arc::new(connector),
			period,
			options,
			observer: Arc::new(observer),
			run: None,
		}
	}

	/// Get the connector used to open the port.
	pub fn connector(&self) -> &C {
		&self.connector
	}

	/// The minimum spacing between paced writes.
	pub fn period(&self) -> Duration {
		self.period
	}

	/// Start the delivery loop, unless it is already running.
	///
	/// The port is opened on the delivery thread.
	/// If that fails, the failure is reported to the observer and the run ends.
	///
	/// Returns `false` without starting a new run if the delivery thread of the previous run
	/// is still stuck in a write and does not exit within [`SenderOptions::stop_timeout`].
	/// The previous thread still owns the port, so a second one could not open it.
	pub fn start(&mut self) -> bool {
		if self.is_running() {
			return true;
		}

		// A previous run may have ended by itself after a failure, or its stop may have timed out.
		if !self.reap_previous() {
			warn!(
				"not restarting {}: the previous delivery thread is still running",
				self.connector.port().display()
			);
			return false;
		}

		let shared = Arc::new(Shared {
			queue: FrameQueue::new(),
			state: Mutex::new(State::Idle),
		});

		let worker = Worker {
			connector: self.connector.clone(),
			period: self.period,
			options: self.options,
			observer: self.observer.clone(),
			shared: shared.clone(),
		};

		let spawned = std::thread::Builder::new()
			.name("display-board-sender".into())
			.spawn(move || worker.run());

		let worker = match spawned {
			Ok(handle) => Some(handle),
			Err(e) => {
				error!("failed to spawn delivery thread: {}", e);
				shared.queue.stop();
				set_state(&shared, &*self.observer, State::OpenFailed);
				self.observer.on_failure(SendError::Open(OpenError {
					port: self.connector.port().to_path_buf(),
					source: Box::new(e),
				}));
				set_state(&shared, &*self.observer, State::Stopped);
				None
			},
		};

		self.run = Some(Run { shared, worker });
		true
	}

	/// Stop the delivery loop and close the port.
	///
	/// Frames that were not written yet are discarded.
	/// A write that is already in progress is allowed to finish.
	///
	/// Returns `false` if the delivery loop did not exit within [`SenderOptions::stop_timeout`].
	/// In that case the port is closed as soon as the pending write completes,
	/// and a later call to [`Self::stop()`] or [`Self::start()`] waits for the thread again.
	pub fn stop(&mut self) -> bool {
		match &self.run {
			Some(run) => run.shared.queue.stop(),
			None => return true,
		}
		self.reap_previous()
	}

	/// Wait for the delivery thread of a stopped or failed run to exit.
	///
	/// The join handle is kept if the thread does not exit in time.
	fn reap_previous(&mut self) -> bool {
		let run = match self.run.as_mut() {
			Some(run) => run,
			None => return true,
		};
		let worker = match run.worker.take() {
			Some(worker) => worker,
			None => return true,
		};

		let deadline = Instant::now() + self.options.stop_timeout;
		while !worker.is_finished() {
			if Instant::now() >= deadline {
				warn!(
					"delivery thread for {} did not stop within {:?}",
					self.connector.port().display(),
					self.options.stop_timeout
				);
				run.worker = Some(worker);
				return false;
			}
			std::thread::sleep(Duration::from_millis(5));
		}

		if worker.join().is_err() {
			error!("delivery thread for {} panicked", self.connector.port().display());
		}
		true
	}

	/// Check if the delivery loop is running.
	///
	/// This becomes `false` by itself if the run fails.
	pub fn is_running(&self) -> bool {
		self.run.as_ref().map_or(false, |run| run.shared.queue.is_running())
	}

	/// The state of the current or last run.
	///
	/// After [`Self::stop()`] this reports [`State::Stopped`] once the delivery thread has exited.
	pub fn state(&self) -> State {
		match &self.run {
			Some(run) => *run.shared.state.lock().unwrap_or_else(|e| e.into_inner()),
			None => State::Idle,
		}
	}

	/// The number of frames waiting to be written.
	pub fn pending(&self) -> usize {
		self.run.as_ref().map_or(0, |run| run.shared.queue.len())
	}

	/// Queue a frame, to be written one period after the previous write.
	pub fn send(&self, frame: Frame) -> Result<(), NotRunning> {
		self.push(frame, Pacing::Paced)
	}

	/// Queue a frame that is written without waiting for the pacing window once it reaches the head of the queue.
	pub fn send_immediate(&self, frame: Frame) -> Result<(), NotRunning> {
		self.push(frame, Pacing::Immediate)
	}

	fn push(&self, frame: Frame, pacing: Pacing) -> Result<(), NotRunning> {
		let run = self.run.as_ref().ok_or(NotRunning)?;
		trace!("queueing {} ({:?})", frame, pacing);
		run.shared.queue.push(frame, pacing)
	}

	/// Discard all frames that were not written yet, returning how many were discarded.
	pub fn clear_queue(&self) -> usize {
		self.run.as_ref().map_or(0, |run| run.shared.queue.clear())
	}
}

#[cfg(feature = "serial2")]
impl Sender<crate::SerialSettings> {
	/// List the serial ports available on the system.
	pub fn list_ports() -> std::io::Result<Vec<std::path::PathBuf>> {
		crate::list_ports()
	}
}

impl<C: Connect> Drop for Sender<C> {
	fn drop(&mut self) {
		self.stop();
	}
}

fn set_state(shared: &Shared, observer: &dyn Observer, state: State) {
	let changed = {
		let mut current = shared.state.lock().unwrap_or_else(|e| e.into_inner());
		let changed = *current != state;
		*current = state;
		changed
	};
	if changed {
		observer.on_state(state);
	}
}

/// The delivery loop, running on its own thread.
struct Worker<C: Connect> {
	connector: Arc<C>,
	period: Duration,
	options: SenderOptions,
	observer: Arc<dyn Observer>,
	shared: Arc<Shared>,
}

impl<C: Connect> Worker<C> {
	fn run(self) {
		self.set_state(State::Opening);
		let port = self.connector.port().display().to_string();

		let transport = match self.connector.connect() {
			Ok(transport) => transport,
			Err(e) => {
				error!("failed to open {}: {}", port, e);
				self.shared.queue.stop();
				self.set_state(State::OpenFailed);
				self.observer.on_failure(SendError::Open(OpenError {
					port: self.connector.port().to_path_buf(),
					source: Box::new(e),
				}));
				self.set_state(State::Stopped);
				return;
			},
		};

		debug!("opened {}", port);
		self.observer.log(&format!("connected to {}", port));
		self.set_state(State::Connected);

		// The transport is consumed here, so the port is closed when this returns.
		let result = self.deliver(transport);

		if let Err(e) = result {
			error!("{}", e);
			self.shared.queue.stop();
			self.set_state(State::Failed);
			self.observer.on_failure(e);
		}

		debug!("closed {}", port);
		self.observer.log(&format!("disconnected from {}", port));
		self.set_state(State::Stopped);
	}

	fn deliver(&self, mut transport: C::Transport) -> Result<(), SendError> {
		let mut sent_since_done = false;
		let mut next_write: Option<Instant> = None;
		let mut inbound = [0u8; 256];

		loop {
			match self.shared.queue.pop(next_write, self.options.poll_interval) {
				Pop::Stopped => return Ok(()),
				Pop::Ready(entry) => {
					self.set_state(State::Sending);
					let bytes = entry.frame.to_bytes();
					if let Err(e) = transport.write_all(&bytes) {
						return Err(WriteError {
							frame: bytes,
							source: Box::new(e),
						}
						.into());
					}
					next_write = Some(Instant::now() + self.period);
					sent_since_done = true;
					trace!("sent {:?}", String::from_utf8_lossy(&bytes));
					self.observer.on_sent(&entry.frame);
					self.observer.log(&format!("sent: {}", entry.frame));
				},
				Pop::Pending => (),
				Pop::Empty => {
					if sent_since_done {
						sent_since_done = false;
						self.set_state(State::Connected);
						self.observer.on_done();
					}
				},
			}

			if self.options.drain_inbound {
				self.drain(&mut transport, &mut inbound)?;
			}
		}
	}

	fn drain(&self, transport: &mut C::Transport, buffer: &mut [u8]) -> Result<(), ReadError> {
		let read = transport
			.read(buffer, self.options.read_timeout)
			.map_err(|e| ReadError { source: Box::new(e) })?;
		if read > 0 {
			let received = String::from_utf8_lossy(&buffer[..read]);
			trace!("received {:?}", received);
			self.observer.log(&format!("received: {}", received.trim_end()));
		}
		Ok(())
	}

	fn set_state(&self, state: State) {
		set_state(&self.shared, &*self.observer, state);
	}
}
