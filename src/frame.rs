//! Encoder for the display board wire protocol.
//!
//! Every frame on the wire is a `#` marker, an ASCII payload and a CR LF terminator.
//! The board reads payloads by column, so the widths produced here are exact:
//!
//! | Frame       | Payload     |
//! |-------------|-------------|
//! | SeriesGroup | `SS  G `    |
//! | Open        | `O HH:MM`   |
//! | Close       | `C HH:MM`   |
//! | Orientation | `RIGHT  ` or `LEFT   ` |
//! | End         | eight spaces |

use crate::config::{ClockTime, Group, ValidConfiguration};

/// Marker byte that starts every frame.
pub const MARKER: u8 = b'#';

/// Terminator that ends every frame.
pub const TERMINATOR: &[u8; 2] = b"\r\n";

/// Width of the orientation payload.
const FIELD_WIDTH: usize = 7;

/// Width of the end payload, one column wider than the other fields.
const END_WIDTH: usize = 8;

/// The number of end frames in [`force_stop()`].
pub const FORCE_STOP_REPEAT: usize = 4;

/// The kind of message carried by a [`Frame`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FrameKind {
	SeriesGroup,
	Open,
	Close,
	Orientation,
	End,
}

/// A single protocol message.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Frame {
	kind: FrameKind,
	payload: String,
}

impl Frame {
	fn new(kind: FrameKind, payload: String) -> Self {
		debug_assert!(payload.is_ascii());
		Self { kind, payload }
	}

	pub fn kind(&self) -> FrameKind {
		self.kind
	}

	/// The payload, without marker and terminator.
	pub fn payload(&self) -> &str {
		&self.payload
	}

	/// The frame as it appears on the wire, without the terminator.
	pub fn text(&self) -> String {
		format!("#{}", self.payload)
	}

	/// The number of bytes the frame occupies on the wire.
	pub fn wire_len(&self) -> usize {
		1 + self.payload.len() + TERMINATOR.len()
	}

	/// Append the wire bytes of the frame to a buffer.
	pub fn encode_into(&self, buffer: &mut Vec<u8>) {
		buffer.reserve(self.wire_len());
		buffer.push(MARKER);
		buffer.extend_from_slice(self.payload.as_bytes());
		buffer.extend_from_slice(TERMINATOR);
	}

	/// The exact bytes written to the serial port.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buffer = Vec::with_capacity(self.wire_len());
		self.encode_into(&mut buffer);
		buffer
	}
}

impl std::fmt::Display for Frame {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "#{}", self.payload)
	}
}

/// Encode a configuration into the frames that make the board show it.
///
/// The series and group frame is always present.
/// The open, close and orientation frames follow in that order, each only if the field is set.
pub fn encode(config: &ValidConfiguration) -> Vec<Frame> {
	let mut frames = Vec::with_capacity(4);
	frames.push(series_group(config));
	if let Some(time) = config.open_time() {
		frames.push(Frame::new(FrameKind::Open, time_payload('O', time)));
	}
	if let Some(time) = config.close_time() {
		frames.push(Frame::new(FrameKind::Close, time_payload('C', time)));
	}
	if let Some(a_right) = config.a_right() {
		frames.push(orientation(config.group(), a_right));
	}
	frames
}

/// The frame that blanks the board.
pub fn end() -> Frame {
	Frame::new(FrameKind::End, " ".repeat(END_WIDTH))
}

/// The end frame repeated, for links that may drop a single frame.
pub fn force_stop() -> [Frame; FORCE_STOP_REPEAT] {
	[end(), end(), end(), end()]
}

/// Check if the board side for `group` is the right side.
///
/// Groups A and C sit on the side named by the mounting flag, groups B and D on the other one.
pub fn is_right_side(group: Group, a_right: bool) -> bool {
	let first_or_third = group.position() % 2 == 0;
	first_or_third == a_right
}

fn series_group(config: &ValidConfiguration) -> Frame {
	Frame::new(FrameKind::SeriesGroup, format!("{}  {} ", config.series(), config.group()))
}

fn time_payload(marker: char, time: ClockTime) -> String {
	format!("{} {}", marker, time)
}

fn orientation(group: Group, a_right: bool) -> Frame {
	let side = if is_right_side(group, a_right) { "RIGHT" } else { "LEFT" };
	Frame::new(FrameKind::Orientation, format!("{:<width$}", side, width = FIELD_WIDTH))
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::config::{Period, Series};
	use assert2::{assert, let_assert};

	fn config(series: u8, group: Group) -> ValidConfiguration {
		let_assert!(Some(series) = Series::new(series));
		let_assert!(Some(period) = Period::from_secs(5));
		ValidConfiguration::new(series, group, period)
	}

	fn time(hour: u8, minute: u8) -> ClockTime {
		let_assert!(Some(time) = ClockTime::new(hour, minute));
		time
	}

	fn texts(frames: &[Frame]) -> Vec<String> {
		frames.iter().map(Frame::text).collect()
	}

	#[test]
	fn test_full_configuration() {
		let config = config(12, Group::A)
			.with_open_time(time(8, 30))
			.with_close_time(time(17, 45))
			.with_orientation(true);
		assert!(texts(&encode(&config)) == ["#12  A ", "#O 08:30", "#C 17:45", "#RIGHT  "]);
	}

	#[test]
	fn test_orientation_examples() {
		let b_left = config(12, Group::B).with_orientation(false);
		assert!(texts(&encode(&b_left))[1] == "#RIGHT  ");
		let b_right = config(12, Group::B).with_orientation(true);
		assert!(texts(&encode(&b_right))[1] == "#LEFT   ");
	}

	#[test]
	fn test_orientation_table() {
		let table = [
			(Group::A, true, "RIGHT  "),
			(Group::A, false, "LEFT   "),
			(Group::B, true, "LEFT   "),
			(Group::B, false, "RIGHT  "),
			(Group::C, true, "RIGHT  "),
			(Group::C, false, "LEFT   "),
			(Group::D, true, "LEFT   "),
			(Group::D, false, "RIGHT  "),
		];
		for (group, a_right, expected) in table {
			let frames = encode(&config(1, group).with_orientation(a_right));
			let_assert!(Some(frame) = frames.last());
			assert!(frame.kind() == FrameKind::Orientation);
			assert!(frame.payload() == expected, "group {} a_right {}", group, a_right);
		}
	}

	#[test]
	fn test_frame_order_and_count() {
		let base = config(3, Group::C);
		let frames = encode(&base);
		assert!(frames.len() == 1);
		assert!(frames[0].payload() == "03  C ");

		let frames = encode(&base.with_close_time(time(0, 0)));
		let kinds: Vec<_> = frames.iter().map(Frame::kind).collect();
		assert!(kinds == [FrameKind::SeriesGroup, FrameKind::Close]);

		let frames = encode(&base.with_orientation(false).with_open_time(time(23, 59)));
		let kinds: Vec<_> = frames.iter().map(Frame::kind).collect();
		assert!(kinds == [FrameKind::SeriesGroup, FrameKind::Open, FrameKind::Orientation]);
		assert!(frames[1].payload() == "O 23:59");
	}

	#[test]
	fn test_time_payloads_are_fixed_width() {
		for hour in 0..24 {
			for minute in 0..60 {
				let frames = encode(&config(0, Group::D).with_open_time(time(hour, minute)));
				let payload = frames[1].payload();
				assert!(payload.len() == 7);
				assert!(payload == format!("O {:02}:{:02}", hour, minute));
			}
		}
	}

	#[test]
	fn test_wire_bytes() {
		let frames = encode(&config(7, Group::B).with_open_time(time(6, 5)));
		assert!(frames[0].to_bytes() == b"#07  B \r\n");
		assert!(frames[1].to_bytes() == b"#O 06:05\r\n");
		assert!(frames[1].wire_len() == 10);

		let mut buffer = Vec::new();
		frames[0].encode_into(&mut buffer);
		frames[1].encode_into(&mut buffer);
		assert!(buffer == b"#07  B \r\n#O 06:05\r\n");
	}

	#[test]
	fn test_end_and_force_stop() {
		let end = end();
		assert!(end.kind() == FrameKind::End);
		assert!(end.payload() == "        ");
		assert!(end.to_bytes() == b"#        \r\n");
		assert!(end.wire_len() == 11);

		let frames = force_stop();
		assert!(frames.len() == 4);
		assert!(frames.iter().all(|frame| *frame == end));
	}
}
