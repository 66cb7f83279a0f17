use std::path::PathBuf;

/// A fault that terminated a run of the delivery loop.
///
/// Passed to [`Observer::on_failure`](crate::Observer::on_failure).
#[derive(Debug)]
pub enum SendError {
	Open(OpenError),
	Write(WriteError),
	Read(ReadError),
}

/// The serial port could not be opened.
#[derive(Debug)]
pub struct OpenError {
	/// The port that was being opened.
	pub port: PathBuf,
	/// The error reported by the transport.
	pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Writing a frame to the serial port failed.
#[derive(Debug)]
pub struct WriteError {
	/// The wire bytes of the frame that was being written.
	pub frame: Vec<u8>,
	pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Draining inbound bytes from the serial port failed.
///
/// Read timeouts are not reported as errors.
#[derive(Debug)]
pub struct ReadError {
	pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// A frame was submitted while no delivery loop is running.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NotRunning;

/// A field of a [`Configuration`](crate::Configuration) that must be set before encoding.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MissingField {
	Series,
	Group,
	OpenTime,
	CloseTime,
	Period,
	Orientation,
}

/// The configuration is incomplete and can not be encoded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConfigurationInvalid {
	/// All fields that are missing, in declaration order.
	pub missing: Vec<MissingField>,
}

/// The text is not a series number in the range 0..=99.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseSeriesError {
	pub input: String,
}

/// The text is not one of the group letters.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseGroupError {
	pub input: String,
}

/// The text is not a valid `HH:MM` time of day.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseClockTimeError {
	pub input: String,
}

/// The text is not a positive number of seconds.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsePeriodError {
	pub input: String,
}

impl SendError {
	/// Check if the run failed before the port was opened.
	pub fn is_open_error(&self) -> bool {
		matches!(self, Self::Open(_))
	}
}

impl std::error::Error for SendError {}
impl std::error::Error for OpenError {}
impl std::error::Error for WriteError {}
impl std::error::Error for ReadError {}
impl std::error::Error for NotRunning {}
impl std::error::Error for ConfigurationInvalid {}
impl std::error::Error for ParseSeriesError {}
impl std::error::Error for ParseGroupError {}
impl std::error::Error for ParseClockTimeError {}
impl std::error::Error for ParsePeriodError {}

impl From<OpenError> for SendError {
	fn from(other: OpenError) -> Self {
		Self::Open(other)
	}
}

impl From<WriteError> for SendError {
	fn from(other: WriteError) -> Self {
		Self::Write(other)
	}
}

impl From<ReadError> for SendError {
	fn from(other: ReadError) -> Self {
		Self::Read(other)
	}
}

impl std::fmt::Display for SendError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Open(e) => write!(f, "{}", e),
			Self::Write(e) => write!(f, "{}", e),
			Self::Read(e) => write!(f, "{}", e),
		}
	}
}

impl std::fmt::Display for OpenError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "failed to open serial port {}: {}", self.port.display(), self.source)
	}
}

impl std::fmt::Display for WriteError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"failed to write {:?} to serial port: {}",
			String::from_utf8_lossy(&self.frame),
			self.source
		)
	}
}

impl std::fmt::Display for ReadError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "failed to read from serial port: {}", self.source)
	}
}

impl std::fmt::Display for NotRunning {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "sender is not running")
	}
}

impl std::fmt::Display for MissingField {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Series => write!(f, "series"),
			Self::Group => write!(f, "group"),
			Self::OpenTime => write!(f, "open time"),
			Self::CloseTime => write!(f, "close time"),
			Self::Period => write!(f, "period"),
			Self::Orientation => write!(f, "orientation"),
		}
	}
}

impl std::fmt::Display for ConfigurationInvalid {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "configuration is incomplete, missing: ")?;
		for (i, field) in self.missing.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{}", field)?;
		}
		Ok(())
	}
}

impl std::fmt::Display for ParseSeriesError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid series {:?}, expected a number in the range 0..=99", self.input)
	}
}

impl std::fmt::Display for ParseGroupError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid group {:?}, expected one of A, B, C or D", self.input)
	}
}

impl std::fmt::Display for ParseClockTimeError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid time {:?}, expected HH:MM", self.input)
	}
}

impl std::fmt::Display for ParsePeriodError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid period {:?}, expected a positive number of seconds", self.input)
	}
}
