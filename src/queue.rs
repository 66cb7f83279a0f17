use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::NotRunning;
use crate::frame::Frame;

/// How a queued frame interacts with the pacing window.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Pacing {
	/// Written no sooner than one period after the previous write.
	Paced,
	/// Written as soon as it reaches the head of the queue.
	Immediate,
}

#[derive(Debug)]
pub(crate) struct Entry {
	pub frame: Frame,
	pub pacing: Pacing,
}

/// Result of [`FrameQueue::pop()`].
#[derive(Debug)]
pub(crate) enum Pop {
	/// A frame that may be written right away.
	Ready(Entry),
	/// The head of the queue is a paced frame that is not due yet.
	Pending,
	/// The queue stayed empty for the whole poll interval.
	Empty,
	/// The queue was stopped.
	Stopped,
}

/// FIFO queue shared between the caller and the delivery thread.
///
/// All operations take the same lock, so a clear can never interleave with a pop.
#[derive(Debug)]
pub(crate) struct FrameQueue {
	inner: Mutex<Inner>,
	condvar: Condvar,
}

#[derive(Debug)]
struct Inner {
	frames: VecDeque<Entry>,
	running: bool,
}

impl FrameQueue {
	/// Create a new, running queue.
	pub fn new() -> Self {
		Self {
			inner: Mutex::new(Inner {
				frames: VecDeque::new(),
				running: true,
			}),
			condvar: Condvar::new(),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		// The lock is never held while calling out, so a poisoned queue is still consistent.
		self.inner.lock().unwrap_or_else(|e| e.into_inner())
	}

	pub fn is_running(&self) -> bool {
		self.lock().running
	}

	pub fn len(&self) -> usize {
		self.lock().frames.len()
	}

	/// Append a frame without blocking.
	pub fn push(&self, frame: Frame, pacing: Pacing) -> Result<(), NotRunning> {
		let mut inner = self.lock();
		if !inner.running {
			return Err(NotRunning);
		}
		inner.frames.push_back(Entry { frame, pacing });
		self.condvar.notify_all();
		Ok(())
	}

	/// Discard all queued frames, returning how many were discarded.
	pub fn clear(&self) -> usize {
		let mut inner = self.lock();
		let discarded = inner.frames.len();
		inner.frames.clear();
		self.condvar.notify_all();
		discarded
	}

	/// Stop the queue and wake up the delivery thread.
	///
	/// Queued frames are discarded.
	pub fn stop(&self) {
		let mut inner = self.lock();
		inner.running = false;
		inner.frames.clear();
		self.condvar.notify_all();
	}

	/// Take the next frame that may be written.
	///
	/// A paced frame is only taken once `not_before` has passed, an immediate frame is taken at once.
	/// Blocks for at most `poll_interval`.
	pub fn pop(&self, not_before: Option<Instant>, poll_interval: Duration) -> Pop {
		let deadline = Instant::now() + poll_interval;
		let mut inner = self.lock();
		loop {
			if !inner.running {
				return Pop::Stopped;
			}

			let now = Instant::now();
			let due = not_before.map_or(true, |not_before| now >= not_before);
			let head = inner.frames.front().map(|entry| entry.pacing);
			let wake_at = match head {
				None if now >= deadline => return Pop::Empty,
				None => deadline,
				Some(pacing) if due || pacing == Pacing::Immediate => {
					return inner.frames.pop_front().map_or(Pop::Empty, Pop::Ready);
				},
				Some(_) if now >= deadline => return Pop::Pending,
				Some(_) => not_before.map_or(deadline, |not_before| not_before.min(deadline)),
			};

			let timeout = wake_at.saturating_duration_since(now);
			inner = match self.condvar.wait_timeout(inner, timeout) {
				Ok((inner, _)) => inner,
				Err(e) => e.into_inner().0,
			};
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::frame;
	use assert2::{assert, let_assert};
	use std::sync::Arc;
	use std::thread;

	const POLL: Duration = Duration::from_millis(50);

	#[test]
	fn test_fifo_order() {
		let queue = FrameQueue::new();
		let frames = frame::force_stop();
		for frame in frames.iter() {
			assert!(let Ok(()) = queue.push(frame.clone(), Pacing::Paced));
		}
		assert!(queue.len() == 4);
		for _ in 0..4 {
			let_assert!(Pop::Ready(entry) = queue.pop(None, POLL));
			assert!(entry.pacing == Pacing::Paced);
		}
		assert!(let Pop::Empty = queue.pop(None, POLL));
	}

	#[test]
	fn test_paced_frame_waits_for_window() {
		let queue = FrameQueue::new();
		assert!(let Ok(()) = queue.push(frame::end(), Pacing::Paced));
		let not_before = Instant::now() + Duration::from_secs(10);
		assert!(let Pop::Pending = queue.pop(Some(not_before), POLL));
		assert!(queue.len() == 1);

		let start = Instant::now();
		let not_before = start + Duration::from_millis(30);
		let_assert!(Pop::Ready(_) = queue.pop(Some(not_before), Duration::from_secs(1)));
		assert!(start.elapsed() >= Duration::from_millis(30));
	}

	#[test]
	fn test_immediate_frame_skips_window() {
		let queue = FrameQueue::new();
		assert!(let Ok(()) = queue.push(frame::end(), Pacing::Immediate));
		let not_before = Instant::now() + Duration::from_secs(10);
		let_assert!(Pop::Ready(entry) = queue.pop(Some(not_before), POLL));
		assert!(entry.pacing == Pacing::Immediate);
	}

	#[test]
	fn test_clear() {
		let queue = FrameQueue::new();
		assert!(let Ok(()) = queue.push(frame::end(), Pacing::Paced));
		assert!(let Ok(()) = queue.push(frame::end(), Pacing::Immediate));
		assert!(queue.clear() == 2);
		assert!(queue.clear() == 0);
		assert!(let Pop::Empty = queue.pop(None, POLL));
		assert!(let Ok(()) = queue.push(frame::end(), Pacing::Paced));
		assert!(let Pop::Ready(_) = queue.pop(None, POLL));
	}

	#[test]
	fn test_stop_wakes_waiting_pop() {
		let queue = Arc::new(FrameQueue::new());
		let waiter = thread::spawn({
			let queue = queue.clone();
			move || {
				let start = Instant::now();
				let pop = queue.pop(None, Duration::from_secs(10));
				(pop, start.elapsed())
			}
		});
		thread::sleep(Duration::from_millis(20));
		queue.stop();
		let_assert!(Ok((pop, elapsed)) = waiter.join());
		assert!(let Pop::Stopped = pop);
		assert!(elapsed < Duration::from_secs(5));
		assert!(queue.push(frame::end(), Pacing::Paced) == Err(NotRunning));
	}

	#[test]
	fn test_push_wakes_waiting_pop() {
		let queue = Arc::new(FrameQueue::new());
		let waiter = thread::spawn({
			let queue = queue.clone();
			move || queue.pop(None, Duration::from_secs(10))
		});
		thread::sleep(Duration::from_millis(20));
		assert!(let Ok(()) = queue.push(frame::end(), Pacing::Paced));
		let_assert!(Ok(Pop::Ready(entry)) = waiter.join());
		assert!(entry.frame == frame::end());
	}
}
