// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	/// `position` is the character offset into the statement text.
	#[error("parse error at position {position}: {message}")]
	Parse {
		message: String,
		position: usize,
	},
}

impl Error {
	pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
		Error::Parse {
			message: message.into(),
			position,
		}
	}

	pub fn position(&self) -> usize {
		match self {
			Error::Parse {
				position,
				..
			} => *position,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
