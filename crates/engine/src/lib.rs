// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Compiles statements of every supported query language into logical plans.
//!
//! A [`Pipeline`] parses a request with the [`QueryProcessor`] of its
//! language, serializes it behind the global lock, creates implicit
//! collections, translates and decorrelates the statement and hands the
//! finished plan to an [`Executor`].

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

mod config;
mod environment;
mod error;
mod executor;
mod logging;
mod pipeline;
pub mod processor;
pub mod test_utils;

pub use config::{DEFAULT_GLOBAL_LOCK_RESOURCE, DEFAULT_NAMESPACE, EngineConfig};
pub use environment::{Environment, EnvironmentBuilder};
pub use error::{Error, Result, SchemaGenerationError};
pub use executor::{ExecutionResult, Executor, NoopExecutor};
pub use logging::{LogFormat, TracingBuilder};
pub use pipeline::{ExecutionOutcome, Pipeline, QueryRequest};
pub use processor::{MqlProcessor, QueryParameters, QueryProcessor, SqlProcessor, Translation};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Language {
	Sql,
	Mql,
}

impl Display for Language {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Language::Sql => f.write_str("sql"),
			Language::Mql => f.write_str("mql"),
		}
	}
}

impl FromStr for Language {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"sql" => Ok(Language::Sql),
			"mql" | "mongo" => Ok(Language::Mql),
			_ => Err(Error::UnknownLanguage(s.to_string())),
		}
	}
}
