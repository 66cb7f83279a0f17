//! Internal logging macros.
//!
//! With the `log` feature these forward to the `log` crate.
//! Without it they still type-check their arguments, but emit nothing.

#[cfg(feature = "log")]
#[allow(unused)]
#[macro_use]
mod imp {
	macro_rules! trace {
		($($args:tt)*) => { ::log::trace!(target: "display_board", $($args)*) }
	}

	macro_rules! debug {
		($($args:tt)*) => { ::log::debug!(target: "display_board", $($args)*) }
	}

	macro_rules! warn {
		($($args:tt)*) => { ::log::warn!(target: "display_board", $($args)*) }
	}

	macro_rules! error {
		($($args:tt)*) => { ::log::error!(target: "display_board", $($args)*) }
	}
}

#[cfg(not(feature = "log"))]
#[allow(unused)]
#[macro_use]
mod imp {
	macro_rules! trace {
		($($args:tt)*) => { { let _ = format_args!($($args)*); } }
	}

	macro_rules! debug {
		($($args:tt)*) => { { let _ = format_args!($($args)*); } }
	}

	macro_rules! warn {
		($($args:tt)*) => { { let _ = format_args!($($args)*); } }
	}

	macro_rules! error {
		($($args:tt)*) => { { let _ = format_args!($($args)*); } }
	}
}
