// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The tag of a [`crate::Value`], also used to describe columns in a row shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	Undefined,
	Boolean,
	Int1,
	Int2,
	Int4,
	Int8,
	Decimal,
	Utf8,
	Date,
	Time,
	DateTime,
	Interval,
	/// A schemaless document, only produced by document collections
	Document,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int1 | Type::Int2 | Type::Int4 | Type::Int8 | Type::Decimal)
	}

	pub fn is_exact_integer(&self) -> bool {
		matches!(self, Type::Int1 | Type::Int2 | Type::Int4 | Type::Int8)
	}

	pub fn is_temporal(&self) -> bool {
		matches!(self, Type::Date | Type::Time | Type::DateTime | Type::Interval)
	}

	/// Width in bits of an exact integer type.
	pub fn width(&self) -> Option<u32> {
		match self {
			Type::Int1 => Some(8),
			Type::Int2 => Some(16),
			Type::Int4 => Some(32),
			Type::Int8 => Some(64),
			_ => None,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Undefined => f.write_str("UNDEFINED"),
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int1 => f.write_str("INT1"),
			Type::Int2 => f.write_str("INT2"),
			Type::Int4 => f.write_str("INT4"),
			Type::Int8 => f.write_str("INT8"),
			Type::Decimal => f.write_str("DECIMAL"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Date => f.write_str("DATE"),
			Type::Time => f.write_str("TIME"),
			Type::DateTime => f.write_str("DATETIME"),
			Type::Interval => f.write_str("INTERVAL"),
			Type::Document => f.write_str("DOCUMENT"),
		}
	}
}
