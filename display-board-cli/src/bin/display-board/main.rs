use display_board::{Board, Event, NotRunning, SendError, SerialSettings, State, ValidConfiguration};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

mod logging;
mod options;

use options::{BoardArgs, Command, Options};

fn main() {
	if let Err(()) = do_main(clap::Parser::parse()) {
		std::process::exit(1);
	}
}

fn do_main(options: Options) -> Result<(), ()> {
	logging::init(module_path!(), options.verbose);
	match &options.command {
		Command::ListPorts => {
			let ports = display_board::list_ports().map_err(|e| log::error!("Failed to list serial ports: {}", e))?;
			if ports.is_empty() {
				log::warn!("No serial ports found");
			}
			for port in ports {
				log::info!("{}", port.display());
			}
		},
		Command::Encode { board } => {
			let config = validate(board, &options)?;
			for frame in display_board::frame::encode(&config) {
				println!("{}", frame);
			}
		},
		Command::Show { board: args, finish } => {
			let config = validate(args, &options)?;
			let (board, events) = open_board(&options, config.period());
			let start = Instant::now();
			let count = board
				.show(&config)
				.map_err(|e| report_not_running(&events, "Failed to queue frames", e))?;
			log::debug!("Queued {} frames, one every {:?}", count, config.period());
			wait_until_done(&events)?;
			log::info!("{:?}: Ok", start.elapsed());
			if *finish {
				board
					.finish()
					.map_err(|e| report_not_running(&events, "Failed to queue end frame", e))?;
				wait_until_done(&events)?;
			}
			close_board(board);
		},
		Command::End => {
			let (board, events) = open_board(&options, Duration::ZERO);
			board
				.finish()
				.map_err(|e| report_not_running(&events, "Failed to queue end frame", e))?;
			wait_until_done(&events)?;
			close_board(board);
		},
		Command::ForceEnd => {
			let (board, events) = open_board(&options, Duration::ZERO);
			board
				.force_end()
				.map_err(|e| report_not_running(&events, "Failed to queue end frames", e))?;
			wait_until_done(&events)?;
			close_board(board);
		},
		Command::ShellCompletion { shell, output } => {
			write_shell_completion(*shell, output.as_deref())?;
		},
	}

	Ok(())
}

fn validate(args: &BoardArgs, options: &Options) -> Result<ValidConfiguration, ()> {
	args.to_configuration(options)
		.validate()
		.map_err(|e| log::error!("{}", e))
}

fn open_board(options: &Options, period: Duration) -> (Board<SerialSettings>, mpsc::Receiver<Event>) {
	log::debug!(
		"Using serial port {} with baud rate {}",
		options.serial_port.display(),
		options.baud_rate
	);
	let settings = SerialSettings::new(&options.serial_port, options.baud_rate);
	let (events_tx, events) = mpsc::channel();
	let mut board = Board::new(settings, period, events_tx);
	board.start();
	(board, events)
}

fn close_board(mut board: Board<SerialSettings>) {
	if !board.stop() {
		log::warn!("Serial port was not closed in time");
	}
}

/// Log the failure that ended the run, if the delivery thread reports one.
fn report_not_running(events: &mpsc::Receiver<Event>, context: &str, error: NotRunning) {
	match run_failure(events, Duration::from_secs(1)) {
		Some(e) => log::error!("{}", e),
		None => log::error!("{}: {}", context, error),
	}
}

/// Wait for the failure of a run that stopped by itself.
///
/// Returns `None` if the run stopped without a failure or nothing arrives within `timeout`.
fn run_failure(events: &mpsc::Receiver<Event>, timeout: Duration) -> Option<SendError> {
	let deadline = Instant::now() + timeout;
	while let Ok(event) = events.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
		match event {
			Event::Failed(e) => return Some(e),
			Event::State(State::Stopped) => return None,
			_ => (),
		}
	}
	None
}

/// Forward sender notifications to the log until the queued frames are written.
fn wait_until_done(events: &mpsc::Receiver<Event>) -> Result<(), ()> {
	for event in events {
		match event {
			Event::Done => return Ok(()),
			Event::Failed(e) => {
				log::error!("{}", e);
				return Err(());
			},
			Event::Sent(frame) => log::info!("Sent {}", frame),
			Event::Log(message) => log::debug!("{}", message),
			Event::State(state) => log::trace!("State: {:?}", state),
		}
	}
	log::error!("Sender stopped unexpectedly");
	Err(())
}

fn write_shell_completion(shell: clap_complete::Shell, path: Option<&Path>) -> Result<(), ()> {
	use clap::CommandFactory;
	use std::io::Write;

	let mut buffer = Vec::with_capacity(4 * 1024);

	let mut command = Options::command();
	clap_complete::generate(shell, &mut command, env!("CARGO_BIN_NAME"), &mut buffer);
	if !buffer.ends_with(b"\n") {
		buffer.push(b'\n');
	}

	let path = path.unwrap_or_else(|| Path::new("-"));
	if path == Path::new("-") {
		log::debug!("Writing shell completion for {} to stdout", shell);
		std::io::stdout()
			.lock()
			.write_all(&buffer)
			.map_err(|e| log::error!("Failed to write to stdout: {}", e))?;
	} else {
		log::debug!("Writing shell completion for {} to {}", shell, path.display());
		let mut output = std::fs::File::create(path).map_err(|e| log::error!("Failed to create {}: {}", path.display(), e))?;
		output
			.write_all(&buffer)
			.map_err(|e| log::error!("Failed to write to {}: {}", path.display(), e))?;
	}

	Ok(())
}
