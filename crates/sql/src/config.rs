// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// How closely the accepted syntax follows the standard.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conformance {
	#[default]
	Default,
	/// Rejects `!=` and a trailing `;`.
	Strict,
	/// Also accepts `==` and a trailing comma in select lists.
	Lenient,
}

/// Options that only change how statement text is read, never what a parsed
/// statement means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
	/// When false, unquoted identifiers are folded to lower case.
	pub case_sensitive: bool,
	/// Encloses identifiers that keep their case and may collide with keywords.
	pub quote: char,
	pub conformance: Conformance,
}

impl Default for ParserConfig {
	fn default() -> Self {
		Self {
			case_sensitive: false,
			quote: '"',
			conformance: Conformance::Default,
		}
	}
}

impl ParserConfig {
	pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
		self.case_sensitive = case_sensitive;
		self
	}

	pub fn with_quote(mut self, quote: char) -> Self {
		self.quote = quote;
		self
	}

	pub fn with_conformance(mut self, conformance: Conformance) -> Self {
		self.conformance = conformance;
		self
	}

	pub fn is_strict(&self) -> bool {
		self.conformance == Conformance::Strict
	}

	pub fn is_lenient(&self) -> bool {
		self.conformance == Conformance::Lenient
	}
}
