// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("parse error: {0}")]
	Parse(String),

	#[error("invalid arguments: {0}")]
	Json(#[from] serde_json::Error),

	#[error("unsupported operator '{0}'")]
	UnsupportedOperator(String),

	#[error("unsupported value for '{field}': {reason}")]
	UnsupportedValue {
		field: String,
		reason: String,
	},
}

pub type Result<T> = std::result::Result<T, Error>;
