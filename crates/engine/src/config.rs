// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_sql::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_GLOBAL_LOCK_RESOURCE: &str = "polystore.global";
pub const DEFAULT_NAMESPACE: &str = "public";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	pub sql: ParserConfig,
	/// Create missing document collections on insert.
	pub implicit_collections: bool,
	/// The resource every statement holds exclusively while it compiles and
	/// executes.
	pub global_lock_resource: String,
	/// Used when a request names no namespace.
	pub default_namespace: String,
	/// Run the validation stage of processors that have one.
	pub validate: bool,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			sql: ParserConfig::default(),
			implicit_collections: true,
			global_lock_resource: DEFAULT_GLOBAL_LOCK_RESOURCE.to_string(),
			default_namespace: DEFAULT_NAMESPACE.to_string(),
			validate: true,
		}
	}
}

impl EngineConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn with_sql(mut self, sql: ParserConfig) -> Self {
		self.sql = sql;
		self
	}

	pub fn with_implicit_collections(mut self, enabled: bool) -> Self {
		self.implicit_collections = enabled;
		self
	}

	pub fn with_global_lock_resource(mut self, resource: impl Into<String>) -> Self {
		self.global_lock_resource = resource.into();
		self
	}

	pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.default_namespace = namespace.into();
		self
	}

	pub fn with_validate(mut self, validate: bool) -> Self {
		self.validate = validate;
		self
	}
}
