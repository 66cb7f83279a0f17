use core::time::Duration;

use crate::config::ValidConfiguration;
use crate::error::NotRunning;
use crate::frame;
use crate::observer::Observer;
use crate::sender::{Sender, SenderOptions, State};
use crate::transport::Connect;

/// A display board behind a [`Sender`].
///
/// Implements the usual workflow on top of the raw frame queue:
/// show a configuration, blank the board when done, or force it blank on a bad link.
#[derive(Debug)]
pub struct Board<C: Connect> {
	sender: Sender<C>,
}

impl<C: Connect> Board<C> {
	/// Create a board that writes frames at most once every `period`.
	pub fn new(connector: C, period: Duration, observer: impl Observer) -> Self {
		Self {
			sender: Sender::new(connector, period, observer),
		}
	}

	/// Create a board with custom sender tuning.
	pub fn with_options(connector: C, period: Duration, observer: impl Observer, options: SenderOptions) -> Self {
		Self {
			sender: Sender::with_options(connector, period, observer, options),
		}
	}

	/// Get the underlying sender.
	pub fn sender(&self) -> &Sender<C> {
		&self.sender
	}

	/// Get the underlying sender mutably.
	pub fn sender_mut(&mut self) -> &mut Sender<C> {
		&mut self.sender
	}

	/// Consume the board to get the underlying sender.
	pub fn into_sender(self) -> Sender<C> {
		self.sender
	}

	/// Open the port and start the delivery loop.
	///
	/// See [`Sender::start()`].
	pub fn start(&mut self) -> bool {
		self.sender.start()
	}

	/// Stop the delivery loop and close the port.
	///
	/// See [`Sender::stop()`].
	pub fn stop(&mut self) -> bool {
		self.sender.stop()
	}

	pub fn state(&self) -> State {
		self.sender.state()
	}

	/// Replace whatever is queued with the frames for `config`.
	///
	/// Returns the number of frames queued.
	pub fn show(&self, config: &ValidConfiguration) -> Result<usize, NotRunning> {
		let frames = frame::encode(config);
		let count = frames.len();
		self.sender.clear_queue();
		for frame in frames {
			self.sender.send(frame)?;
		}
		debug!("queued {} frames for series {} group {}", count, config.series(), config.group());
		Ok(count)
	}

	/// Drop queued frames and blank the board with a single end frame.
	pub fn finish(&self) -> Result<(), NotRunning> {
		self.sender.clear_queue();
		self.sender.send_immediate(frame::end())
	}

	/// Drop queued frames and blank the board with the repeated end frame.
	pub fn force_end(&self) -> Result<(), NotRunning> {
		self.sender.clear_queue();
		for end in frame::force_stop() {
			self.sender.send_immediate(end)?;
		}
		Ok(())
	}
}
