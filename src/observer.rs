//! Notifications from the delivery thread.

use crate::error::SendError;
use crate::frame::Frame;
use crate::sender::State;

/// Receives notifications from the delivery thread of a [`Sender`](crate::Sender).
///
/// All functions are called on the delivery thread, never on the thread that called `send()`.
/// Implementations that update a user interface must hand the notification over to the right thread themselves.
///
/// Every function has an empty default implementation.
pub trait Observer: Send + Sync + 'static {
	/// The run failed and the delivery loop exited.
	///
	/// Called at most once per run.
	fn on_failure(&self, error: SendError) {
		let _ = error;
	}

	/// Every queued frame has been written.
	///
	/// Called once per drained batch, and only if at least one frame was written since the previous call.
	fn on_done(&self) {}

	/// A human readable progress message.
	fn log(&self, message: &str) {
		let _ = message;
	}

	/// The run moved to a new state.
	fn on_state(&self, state: State) {
		let _ = state;
	}

	/// A frame was written to the port.
	fn on_sent(&self, frame: &Frame) {
		let _ = frame;
	}
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// An observer that forwards notifications to the `log` crate.
#[cfg(feature = "log")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

#[cfg(feature = "log")]
impl Observer for LogObserver {
	fn on_failure(&self, error: SendError) {
		::log::error!(target: "display_board::sender", "{}", error);
	}

	fn on_done(&self) {
		::log::info!(target: "display_board::sender", "all queued frames sent");
	}

	fn log(&self, message: &str) {
		::log::debug!(target: "display_board::sender", "{}", message);
	}

	fn on_state(&self, state: State) {
		::log::trace!(target: "display_board::sender", "state: {:?}", state);
	}
}

/// A notification, as delivered to an [`Event`] channel.
///
/// `std::sync::mpsc::Sender<Event>` implements [`Observer`],
/// which lets the caller receive notifications on its own thread.
#[derive(Debug)]
pub enum Event {
	Failed(SendError),
	Done,
	Log(String),
	State(State),
	Sent(Frame),
}

impl Observer for std::sync::mpsc::Sender<Event> {
	// A disconnected receiver means nobody is listening anymore, which is fine.
	fn on_failure(&self, error: SendError) {
		let _ = self.send(Event::Failed(error));
	}

	fn on_done(&self) {
		let _ = self.send(Event::Done);
	}

	fn log(&self, message: &str) {
		let _ = self.send(Event::Log(message.to_string()));
	}

	fn on_state(&self, state: State) {
		let _ = self.send(Event::State(state));
	}

	fn on_sent(&self, frame: &Frame) {
		let _ = self.send(Event::Sent(frame.clone()));
	}
}
