//! What to show on the board.
//!
//! [`Configuration`] is the editable form, where every field may still be unset.
//! [`Configuration::validate()`] turns it into a [`ValidConfiguration`], which is the only thing the [`frame`](crate::frame) encoder accepts.

use core::time::Duration;
use std::path::PathBuf;

use crate::error::{
	ConfigurationInvalid, MissingField, ParseClockTimeError, ParseGroupError, ParsePeriodError, ParseSeriesError,
};

/// The baud rate used when none is configured.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Series number shown on the board, in the range 0..=99.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Series(u8);

/// Group letter shown on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Group {
	A,
	B,
	C,
	D,
}

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ClockTime {
	hour: u8,
	minute: u8,
}

/// Minimum spacing between two frames on the wire, in whole seconds.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Period(u32);

/// Editable display configuration.
///
/// Fields are public and may be left unset while the caller collects them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Configuration {
	pub series: Option<Series>,
	pub group: Option<Group>,
	pub open_time: Option<ClockTime>,
	pub close_time: Option<ClockTime>,
	pub period: Option<Period>,
	/// Mounting flag: group A is shown on the right side of the board.
	pub a_right: Option<bool>,
	pub port: Option<PathBuf>,
	pub baud_rate: u32,
}

/// A configuration that can be encoded.
///
/// Obtained from [`Configuration::validate()`], which always fills in every field,
/// or built directly from typed parts with [`ValidConfiguration::new()`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ValidConfiguration {
	series: Series,
	group: Group,
	period: Period,
	open_time: Option<ClockTime>,
	close_time: Option<ClockTime>,
	a_right: Option<bool>,
}

impl Series {
	/// Create a series number, or `None` if it is larger than 99.
	pub fn new(value: u8) -> Option<Self> {
		if value <= 99 {
			Some(Self(value))
		} else {
			None
		}
	}

	/// The numeric value.
	pub fn get(self) -> u8 {
		self.0
	}
}

impl Group {
	/// All groups, in board order.
	pub const ALL: [Group; 4] = [Group::A, Group::B, Group::C, Group::D];

	/// Zero based position of the group in [`Group::ALL`].
	pub fn position(self) -> usize {
		self as usize
	}

	/// The group letter.
	pub fn letter(self) -> char {
		match self {
			Self::A => 'A',
			Self::B => 'B',
			Self::C => 'C',
			Self::D => 'D',
		}
	}
}

impl ClockTime {
	/// Create a time of day, or `None` if the hour or minute is out of range.
	pub fn new(hour: u8, minute: u8) -> Option<Self> {
		if hour < 24 && minute < 60 {
			Some(Self { hour, minute })
		} else {
			None
		}
	}

	pub fn hour(self) -> u8 {
		self.hour
	}

	pub fn minute(self) -> u8 {
		self.minute
	}

	/// Add a number of minutes, wrapping around at midnight.
	pub fn add_minutes(self, minutes: u32) -> Self {
		const MINUTES_PER_DAY: u32 = 24 * 60;
		let total = (u32::from(self.hour) * 60 + u32::from(self.minute) + minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
		Self {
			hour: (total / 60) as u8,
			minute: (total % 60) as u8,
		}
	}
}

impl Period {
	/// Create a period, or `None` for zero seconds.
	pub fn from_secs(seconds: u32) -> Option<Self> {
		if seconds > 0 {
			Some(Self(seconds))
		} else {
			None
		}
	}

	pub fn as_secs(self) -> u32 {
		self.0
	}

	pub fn as_duration(self) -> Duration {
		Duration::from_secs(self.0.into())
	}
}

impl From<Period> for Duration {
	fn from(other: Period) -> Self {
		other.as_duration()
	}
}

impl Default for Configuration {
	fn default() -> Self {
		Self::new()
	}
}

impl Configuration {
	/// Create an empty configuration with the default baud rate.
	pub fn new() -> Self {
		Self {
			series: None,
			group: None,
			open_time: None,
			close_time: None,
			period: None,
			a_right: None,
			port: None,
			baud_rate: DEFAULT_BAUD_RATE,
		}
	}

	/// Check if all fields needed for encoding are set.
	pub fn is_valid(&self) -> bool {
		self.missing_fields().is_empty()
	}

	/// Get the encodable form of the configuration.
	///
	/// The port and baud rate are connection parameters and are not checked here.
	pub fn validate(&self) -> Result<ValidConfiguration, ConfigurationInvalid> {
		let invalid = || ConfigurationInvalid {
			missing: self.missing_fields(),
		};
		let series = self.series.ok_or_else(invalid)?;
		let group = self.group.ok_or_else(invalid)?;
		let period = self.period.ok_or_else(invalid)?;
		let open_time = self.open_time.ok_or_else(invalid)?;
		let close_time = self.close_time.ok_or_else(invalid)?;
		let a_right = self.a_right.ok_or_else(invalid)?;
		Ok(ValidConfiguration::new(series, group, period)
			.with_open_time(open_time)
			.with_close_time(close_time)
			.with_orientation(a_right))
	}

	fn missing_fields(&self) -> Vec<MissingField> {
		let mut missing = Vec::new();
		if self.series.is_none() {
			missing.push(MissingField::Series);
		}
		if self.group.is_none() {
			missing.push(MissingField::Group);
		}
		if self.open_time.is_none() {
			missing.push(MissingField::OpenTime);
		}
		if self.close_time.is_none() {
			missing.push(MissingField::CloseTime);
		}
		if self.period.is_none() {
			missing.push(MissingField::Period);
		}
		if self.a_right.is_none() {
			missing.push(MissingField::Orientation);
		}
		missing
	}
}

impl ValidConfiguration {
	/// Create a configuration that only identifies the series and group.
	///
	/// Use the `with_*` functions to add the optional parts.
	pub fn new(series: Series, group: Group, period: Period) -> Self {
		Self {
			series,
			group,
			period,
			open_time: None,
			close_time: None,
			a_right: None,
		}
	}

	pub fn with_open_time(mut self, time: ClockTime) -> Self {
		self.open_time = Some(time);
		self
	}

	pub fn with_close_time(mut self, time: ClockTime) -> Self {
		self.close_time = Some(time);
		self
	}

	/// Set the mounting flag (group A is on the right side).
	pub fn with_orientation(mut self, a_right: bool) -> Self {
		self.a_right = Some(a_right);
		self
	}

	pub fn series(&self) -> Series {
		self.series
	}

	pub fn group(&self) -> Group {
		self.group
	}

	pub fn open_time(&self) -> Option<ClockTime> {
		self.open_time
	}

	pub fn close_time(&self) -> Option<ClockTime> {
		self.close_time
	}

	pub fn a_right(&self) -> Option<bool> {
		self.a_right
	}

	/// The minimum spacing between frames on the wire.
	pub fn period(&self) -> Duration {
		self.period.as_duration()
	}
}

impl std::str::FromStr for Series {
	type Err = ParseSeriesError;

	fn from_str(data: &str) -> Result<Self, Self::Err> {
		let error = || ParseSeriesError { input: data.to_string() };
		let trimmed = data.trim();
		if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
			return Err(error());
		}
		trimmed.parse().ok().and_then(Self::new).ok_or_else(error)
	}
}

impl std::str::FromStr for Group {
	type Err = ParseGroupError;

	fn from_str(data: &str) -> Result<Self, Self::Err> {
		match data.trim() {
			"A" | "a" => Ok(Self::A),
			"B" | "b" => Ok(Self::B),
			"C" | "c" => Ok(Self::C),
			"D" | "d" => Ok(Self::D),
			_ => Err(ParseGroupError { input: data.to_string() }),
		}
	}
}

impl std::str::FromStr for ClockTime {
	type Err = ParseClockTimeError;

	fn from_str(data: &str) -> Result<Self, Self::Err> {
		let error = || ParseClockTimeError { input: data.to_string() };
		let (hour, minute) = data.trim().split_once(':').ok_or_else(error)?;
		let valid_digits = |x: &str| (1..=2).contains(&x.len()) && x.bytes().all(|b| b.is_ascii_digit());
		if !valid_digits(hour) || minute.len() != 2 || !valid_digits(minute) {
			return Err(error());
		}
		let hour = hour.parse().map_err(|_| error())?;
		let minute = minute.parse().map_err(|_| error())?;
		Self::new(hour, minute).ok_or_else(error)
	}
}

impl std::str::FromStr for Period {
	type Err = ParsePeriodError;

	fn from_str(data: &str) -> Result<Self, Self::Err> {
		data.trim()
			.parse()
			.ok()
			.and_then(Self::from_secs)
			.ok_or_else(|| ParsePeriodError { input: data.to_string() })
	}
}

impl std::fmt::Display for Series {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{:02}", self.0)
	}
}

impl std::fmt::Display for Group {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.letter())
	}
}

impl std::fmt::Display for ClockTime {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{:02}:{:02}", self.hour, self.minute)
	}
}

impl std::fmt::Display for Period {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}s", self.0)
	}
}
