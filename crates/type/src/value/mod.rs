// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod date;
mod datetime;
pub mod decimal;
mod interval;
pub mod number;
pub mod temporal;
mod time;
mod r#type;

pub use date::Date;
pub use datetime::DateTime;
pub use decimal::{DECIMAL_PRECISION, Decimal};
pub use interval::Interval;
pub use number::ArithmeticOp;
pub use time::Time;
pub use r#type::Type;

/// A runtime value, represented as a native Rust type.
///
/// Values are immutable: every operation returns a new value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 1-byte exact integer
	Int1(i8),
	/// A 2-byte exact integer
	Int2(i16),
	/// A 4-byte exact integer
	Int4(i32),
	/// An 8-byte exact integer
	Int8(i64),
	/// An arbitrary-precision decimal
	Decimal(Decimal),
	/// A UTF-8 encoded text
	Utf8(String),
	/// Days since 1970-01-01
	Date(Date),
	/// Milliseconds since midnight
	Time(Time),
	/// Milliseconds since 1970-01-01T00:00:00
	DateTime(DateTime),
	/// A month and millisecond based duration
	Interval(Interval),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int1(v: impl Into<i8>) -> Self {
		Value::Int1(v.into())
	}

	pub fn int2(v: impl Into<i16>) -> Self {
		Value::Int2(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn decimal(v: impl Into<Decimal>) -> Self {
		Value::Decimal(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn date(v: impl Into<Date>) -> Self {
		Value::Date(v.into())
	}

	pub fn time(v: impl Into<Time>) -> Self {
		Value::Time(v.into())
	}

	pub fn datetime(v: impl Into<DateTime>) -> Self {
		Value::DateTime(v.into())
	}

	pub fn interval(v: impl Into<Interval>) -> Self {
		Value::Interval(v.into())
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int1(_) => Type::Int1,
			Value::Int2(_) => Type::Int2,
			Value::Int4(_) => Type::Int4,
			Value::Int8(_) => Type::Int8,
			Value::Decimal(_) => Type::Decimal,
			Value::Utf8(_) => Type::Utf8,
			Value::Date(_) => Type::Date,
			Value::Time(_) => Type::Time,
			Value::DateTime(_) => Type::DateTime,
			Value::Interval(_) => Type::Interval,
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn is_number(&self) -> bool {
		self.get_type().is_number()
	}

	pub fn is_temporal(&self) -> bool {
		self.get_type().is_temporal()
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(s) => Some(s.as_str()),
			_ => None,
		}
	}

	/// The exact integer payload widened to 64 bits.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int1(v) => Some(*v as i64),
			Value::Int2(v) => Some(*v as i64),
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}

	/// The numeric payload as a decimal, `None` for non-numeric values.
	pub fn to_decimal(&self) -> Option<Decimal> {
		match self {
			Value::Decimal(d) => Some(d.clone()),
			other => other.as_i64().map(Decimal::from),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(true) => f.write_str("true"),
			Value::Boolean(false) => f.write_str("false"),
			Value::Int1(value) => Display::fmt(value, f),
			Value::Int2(value) => Display::fmt(value, f),
			Value::Int4(value) => Display::fmt(value, f),
			Value::Int8(value) => Display::fmt(value, f),
			Value::Decimal(value) => Display::fmt(value, f),
			Value::Utf8(value) => Display::fmt(value, f),
			Value::Date(value) => Display::fmt(value, f),
			Value::Time(value) => Display::fmt(value, f),
			Value::DateTime(value) => Display::fmt(value, f),
			Value::Interval(value) => Display::fmt(value, f),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int4(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl From<Decimal> for Value {
	fn from(v: Decimal) -> Self {
		Value::Decimal(v)
	}
}
