// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Installs the process wide `tracing` subscriber.

use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
	Compact,
	Json,
}

/// Builder for the `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub struct TracingBuilder {
	level: String,
	format: LogFormat,
	ansi: bool,
	with_target: bool,
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
			ansi: true,
			with_target: true,
		}
	}

	/// A filter directive such as `debug` or `polystore_engine=trace,info`.
	pub fn with_level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	pub fn with_format(mut self, format: LogFormat) -> Self {
		self.format = format;
		self
	}

	pub fn with_ansi(mut self, ansi: bool) -> Self {
		self.ansi = ansi;
		self
	}

	pub fn with_target(mut self, with_target: bool) -> Self {
		self.with_target = with_target;
		self
	}

	/// Returns false when a global subscriber was already installed, in which
	/// case nothing changes.
	pub fn install(self) -> bool {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
		let builder = fmt().with_env_filter(filter).with_ansi(self.ansi).with_target(self.with_target);
		let result = match self.format {
			LogFormat::Compact => builder.compact().try_init(),
			LogFormat::Json => builder.json().try_init(),
		};
		result.is_ok()
	}
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_second_install_is_noop() {
		let _ = TracingBuilder::new().with_level("warn").install();
		assert!(!TracingBuilder::new().with_format(LogFormat::Json).install());
	}
}
