//! Paced serial driver for ASCII protocol display boards.
//!
//! The board understands a handful of short text frames, each starting with `#` and terminated by CR LF.
//! This crate has two halves:
//!
//! * the [`frame`] encoder, which turns a [`ValidConfiguration`] into the frames the board expects, and
//! * the [`Sender`], which owns the serial connection on a background thread and writes queued frames
//!   no faster than the configured period.
//!
//! The [`Board`] wrapper combines both for the common show / finish / force-end workflow.
//!
//! # Example
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use display_board::{Board, Configuration, LogObserver, SerialSettings};
//!
//! let mut config = Configuration::new();
//! config.series = Some("12".parse()?);
//! config.group = Some("A".parse()?);
//! config.open_time = Some("08:30".parse()?);
//! config.close_time = Some("17:45".parse()?);
//! config.period = Some("5".parse()?);
//! config.a_right = Some(true);
//! let config = config.validate()?;
//!
//! let settings = SerialSettings::new("/dev/ttyUSB0", 9600);
//! let mut board = Board::new(settings, config.period(), LogObserver);
//! board.start();
//! board.show(&config)?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod log;

pub mod config;
pub mod frame;
pub mod transport;

mod board;
mod error;
mod observer;
mod queue;
mod sender;

pub use config::{ClockTime, Configuration, Group, Period, Series, ValidConfiguration};
pub use board::Board;
pub use error::{
	ConfigurationInvalid, MissingField, NotRunning, OpenError, ParseClockTimeError, ParseGroupError, ParsePeriodError,
	ParseSeriesError, ReadError, SendError, WriteError,
};
pub use frame::{Frame, FrameKind};
#[cfg(feature = "log")]
pub use observer::LogObserver;
pub use observer::{Event, NullObserver, Observer};
pub use sender::{Sender, SenderOptions, State};
pub use transport::{Connect, Transport};

#[cfg(feature = "serial2")]
pub use transport::serial2::{list_ports, SerialSettings};
