// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_core::{LockError, ResourceId, TransactionId};
use polystore_plan::PlanError;
use polystore_transaction::TransactionError;
use polystore_type::TypeError;

use crate::Language;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{language} parse error: {message}")]
	Parse {
		language: Language,
		message: String,
		/// Character offset into the statement text, when known.
		position: Option<usize>,
	},

	#[error("{operation} is not supported for {language}")]
	Unsupported {
		operation: &'static str,
		language: Language,
	},

	#[error(transparent)]
	SchemaGeneration(#[from] SchemaGenerationError),

	#[error("transaction {transaction} was chosen as deadlock victim")]
	Deadlock {
		transaction: TransactionId,
		resources: Vec<ResourceId>,
	},

	#[error("unknown query language '{0}'")]
	UnknownLanguage(String),

	#[error("execution failed: {0}")]
	Execution(String),

	#[error("{0} is already initialized")]
	AlreadyInitialized(&'static str),

	#[error("{kind} '{name}' not found")]
	NotFound {
		kind: &'static str,
		name: String,
	},

	#[error("invalid statement: {0}")]
	Validation(String),

	#[error("invalid configuration: {0}")]
	Config(#[from] serde_json::Error),

	#[error(transparent)]
	Transaction(#[from] TransactionError),

	#[error(transparent)]
	Plan(#[from] PlanError),

	#[error(transparent)]
	Type(#[from] TypeError),
}

/// Why an implicit object could not be created. Callers tell the two causes
/// apart.
#[derive(Debug, thiserror::Error)]
pub enum SchemaGenerationError {
	/// The statement names no object. The transaction was committed.
	#[error("statement has no target object to create")]
	NoTarget,

	#[error("could not create implicit object")]
	CommitFailed {
		#[source]
		source: TransactionError,
	},
}

impl Error {
	/// Whether resubmitting the same statement may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Error::Deadlock { .. })
	}

	pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
		Error::NotFound {
			kind,
			name: name.into(),
		}
	}

	pub(crate) fn validation(message: impl Into<String>) -> Self {
		Error::Validation(message.into())
	}
}

impl From<LockError> for Error {
	fn from(err: LockError) -> Self {
		match err {
			LockError::Deadlock {
				transaction,
				resources,
			} => Error::Deadlock {
				transaction,
				resources,
			},
		}
	}
}

impl From<polystore_sql::Error> for Error {
	fn from(err: polystore_sql::Error) -> Self {
		let position = Some(err.position());
		let polystore_sql::Error::Parse {
			message,
			..
		} = err;
		Error::Parse {
			language: Language::Sql,
			message,
			position,
		}
	}
}

impl From<polystore_mql::Error> for Error {
	fn from(err: polystore_mql::Error) -> Self {
		Error::Parse {
			language: Language::Mql,
			message: err.to_string(),
			position: None,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
