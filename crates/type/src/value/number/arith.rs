// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use super::{ArithmeticOp, Promoted, promote};
use crate::{
	Result, TypeError,
	value::{Interval, Time, Value, temporal::MILLIS_PER_DAY},
};

/// Exact integer arithmetic in a single width. Overflow wraps silently: callers
/// that need the precise result must compute in decimal.
macro_rules! exact {
	($op:expr, $l:expr, $r:expr, $variant:ident) => {{
		let (l, r) = ($l, $r);
		match $op {
			ArithmeticOp::Add => Ok(Value::$variant(l.wrapping_add(r))),
			ArithmeticOp::Subtract => Ok(Value::$variant(l.wrapping_sub(r))),
			ArithmeticOp::Multiply => Ok(Value::$variant(l.wrapping_mul(r))),
			ArithmeticOp::Remainder => {
				if r == 0 {
					return Err(TypeError::DivisionByZero);
				}
				let rem = l.wrapping_rem(r);
				if rem != 0 && ((rem < 0) != (r < 0)) {
					Ok(Value::$variant(rem.wrapping_add(r)))
				} else {
					Ok(Value::$variant(rem))
				}
			}
			ArithmeticOp::Divide => unreachable!("division is always promoted to decimal"),
		}
	}};
}

impl Value {
	pub fn add(&self, other: &Value) -> Result<Value> {
		self.apply(ArithmeticOp::Add, other)
	}

	pub fn subtract(&self, other: &Value) -> Result<Value> {
		self.apply(ArithmeticOp::Subtract, other)
	}

	pub fn multiply(&self, other: &Value) -> Result<Value> {
		self.apply(ArithmeticOp::Multiply, other)
	}

	/// Always produces a decimal for numeric operands.
	pub fn divide(&self, other: &Value) -> Result<Value> {
		self.apply(ArithmeticOp::Divide, other)
	}

	/// Floor remainder: the result takes the sign of the divisor.
	pub fn remainder(&self, other: &Value) -> Result<Value> {
		self.apply(ArithmeticOp::Remainder, other)
	}

	pub fn apply(&self, op: ArithmeticOp, other: &Value) -> Result<Value> {
		if self.is_undefined() || other.is_undefined() {
			return Ok(Value::Undefined);
		}

		if let Some(promoted) = promote(op, self, other) {
			return match promoted {
				Promoted::Int1(l, r) => exact!(op, l, r, Int1),
				Promoted::Int2(l, r) => exact!(op, l, r, Int2),
				Promoted::Int4(l, r) => exact!(op, l, r, Int4),
				Promoted::Int8(l, r) => exact!(op, l, r, Int8),
				Promoted::Decimal(l, r) => match op {
					ArithmeticOp::Add => Ok(Value::Decimal(l.add(&r))),
					ArithmeticOp::Subtract => Ok(Value::Decimal(l.sub(&r))),
					ArithmeticOp::Multiply => Ok(Value::Decimal(l.mul(&r))),
					ArithmeticOp::Divide => l.div(&r).map(Value::Decimal),
					ArithmeticOp::Remainder => l.rem(&r).map(Value::Decimal),
				},
			};
		}

		self.apply_temporal(op, other)
	}

	fn apply_temporal(&self, op: ArithmeticOp, other: &Value) -> Result<Value> {
		let not_applicable = || TypeError::OperatorNotApplicable {
			op,
			left: self.get_type(),
			right: other.get_type(),
		};

		let interval = match (op, other) {
			(ArithmeticOp::Add, Value::Interval(i)) => Some(*i),
			(ArithmeticOp::Subtract, Value::Interval(i)) => Some(i.negate()),
			_ => None,
		};

		match (self, other, interval) {
			(Value::Date(date), _, Some(interval)) => {
				let shifted = date.add_months(interval.months())?;
				// partial days are dropped
				Ok(Value::Date(shifted.add_days(interval.millis() / MILLIS_PER_DAY)?))
			}
			(Value::DateTime(dt), _, Some(interval)) => {
				let shifted = dt.add_months(interval.months())?;
				Ok(Value::DateTime(shifted.add_millis(interval.millis())?))
			}
			(Value::Time(time), _, Some(interval)) => Ok(Value::Time(Time::from_millis_of_day(
				time.to_millis_of_day() as i64 + interval.millis(),
			))),
			(Value::Interval(l), _, Some(r)) => Ok(Value::Interval(l.wrapping_add(&r))),
			(Value::Date(l), Value::Date(r), None) if op == ArithmeticOp::Subtract => Ok(Value::Interval(
				Interval::from_days(l.to_days_since_epoch() as i64 - r.to_days_since_epoch() as i64),
			)),
			(Value::DateTime(l), Value::DateTime(r), None) if op == ArithmeticOp::Subtract => {
				Ok(Value::Interval(Interval::from_millis(
					l.to_millis_since_epoch().wrapping_sub(r.to_millis_since_epoch()),
				)))
			}
			_ => Err(not_applicable()),
		}
	}

	pub fn negate(&self) -> Result<Value> {
		match self {
			Value::Undefined => Ok(Value::Undefined),
			Value::Int1(v) => Ok(Value::Int1(v.wrapping_neg())),
			Value::Int2(v) => Ok(Value::Int2(v.wrapping_neg())),
			Value::Int4(v) => Ok(Value::Int4(v.wrapping_neg())),
			Value::Int8(v) => Ok(Value::Int8(v.wrapping_neg())),
			Value::Decimal(v) => Ok(Value::Decimal(v.neg())),
			Value::Interval(v) => Ok(Value::Interval(v.negate())),
			other => Err(TypeError::NegationNotApplicable(other.get_type())),
		}
	}
}
