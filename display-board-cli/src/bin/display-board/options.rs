use display_board::{ClockTime, Configuration, Group, Period, Series};
use std::path::PathBuf;

/// Drive an ASCII protocol display board over a serial port.
///
/// The board shows a series number, a group letter, an opening and closing time and a side indicator.
/// Frames are written no faster than the configured period, since the board firmware drops frames that arrive too quickly.
#[derive(clap::Parser)]
#[command(version)]
pub struct Options {
	#[arg(long, short, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[arg(long, short, global = true)]
	#[cfg_attr(target_os = "windows", arg(default_value = "COM1"))]
	#[cfg_attr(not(target_os = "windows"), arg(default_value = "/dev/ttyUSB0"))]
	pub serial_port: PathBuf,

	#[arg(long, short, global = true)]
	#[arg(default_value_t = display_board::config::DEFAULT_BAUD_RATE)]
	pub baud_rate: u32,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// List the serial ports available on this system.
	ListPorts,

	/// Print the frames for a configuration without opening the serial port.
	Encode {
		#[command(flatten)]
		board: BoardArgs,
	},

	/// Show a configuration on the board.
	Show {
		#[command(flatten)]
		board: BoardArgs,

		/// Blank the board again once all frames are written.
		#[arg(long)]
		finish: bool,
	},

	/// Blank the board with a single end frame.
	End,

	/// Blank the board with the end frame repeated, for unreliable links.
	ForceEnd,

	/// Write shell completions to a file or to standard output.
	ShellCompletion {
		/// The shell for which to generate completions.
		#[arg(long)]
		shell: clap_complete::Shell,

		/// The file to write the generated completion file to.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
}

#[derive(clap::Args)]
pub struct BoardArgs {
	/// The series number, 0 to 99.
	#[arg(value_name = "SERIES")]
	pub series: Option<Series>,

	/// The group letter, A to D.
	#[arg(value_name = "GROUP")]
	pub group: Option<Group>,

	/// The opening time, as HH:MM.
	#[arg(long, value_name = "HH:MM")]
	pub open: Option<ClockTime>,

	/// The closing time, as HH:MM.
	///
	/// Defaults to 15 minutes after the opening time.
	#[arg(long, value_name = "HH:MM")]
	pub close: Option<ClockTime>,

	/// The minimum number of seconds between frames.
	#[arg(long, value_name = "SECONDS", default_value = "5")]
	pub period: Period,

	/// Whether group A sits on the right side of the board.
	#[arg(long, value_name = "true|false")]
	pub a_right: Option<bool>,
}

impl BoardArgs {
	/// Build the configuration described by the arguments.
	pub fn to_configuration(&self, options: &Options) -> Configuration {
		Configuration {
			series: self.series,
			group: self.group,
			open_time: self.open,
			close_time: self.close.or_else(|| self.open.map(|open| open.add_minutes(15))),
			period: Some(self.period),
			a_right: self.a_right,
			port: Some(options.serial_port.clone()),
			baud_rate: options.baud_rate,
		}
	}
}
