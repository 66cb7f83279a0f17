#![allow(dead_code)]

mod mock_port;

pub use mock_port::{Gate, MockConnector, Wire};

use display_board::{Event, SenderOptions, State};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// Sender options with short intervals, so tests don't wait for the production defaults.
pub fn fast_options() -> SenderOptions {
	SenderOptions {
		poll_interval: Duration::from_millis(20),
		stop_timeout: Duration::from_secs(2),
		drain_inbound: false,
		read_timeout: Duration::from_millis(5),
	}
}

/// Receive events until `predicate` matches one, returning all events seen including the match.
///
/// Panics if no matching event arrives within `timeout`.
pub fn wait_for(events: &Receiver<Event>, timeout: Duration, predicate: impl Fn(&Event) -> bool) -> Vec<Event> {
	let deadline = Instant::now() + timeout;
	let mut seen = Vec::new();
	loop {
		let remaining = deadline.saturating_duration_since(Instant::now());
		match events.recv_timeout(remaining) {
			Ok(event) => {
				let done = predicate(&event);
				seen.push(event);
				if done {
					return seen;
				}
			},
			Err(e) => panic!("no matching event within {:?} ({}), got: {:?}", timeout, e, seen),
		}
	}
}

/// Collect the events that arrive within `duration`.
pub fn collect_for(events: &Receiver<Event>, duration: Duration) -> Vec<Event> {
	let deadline = Instant::now() + duration;
	let mut seen = Vec::new();
	while let Ok(event) = events.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
		seen.push(event);
	}
	seen
}

pub fn is_done(event: &Event) -> bool {
	matches!(event, Event::Done)
}

pub fn is_failure(event: &Event) -> bool {
	matches!(event, Event::Failed(_))
}

pub fn is_stopped(event: &Event) -> bool {
	matches!(event, Event::State(State::Stopped))
}

pub fn count(events: &[Event], predicate: impl Fn(&Event) -> bool) -> usize {
	events.iter().filter(|event| predicate(event)).count()
}
