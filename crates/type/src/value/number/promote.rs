// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::value::{ArithmeticOp, Decimal, Value};

/// The representation a binary numeric operation is computed in.
#[derive(Clone, Debug, PartialEq)]
pub enum Promoted {
	Int1(i8, i8),
	Int2(i16, i16),
	Int4(i32, i32),
	Int8(i64, i64),
	Decimal(Decimal, Decimal),
}

/// Selects the representation for `l op r`.
///
/// Division always goes to decimal since exact integers are not closed under
/// it. Otherwise a decimal on either side promotes both operands to decimal,
/// and two exact integers are computed in the width of the *left* operand:
/// the right operand is truncated into that width and results wrap on
/// overflow. Returns `None` when either side is not numeric.
pub fn promote(op: ArithmeticOp, l: &Value, r: &Value) -> Option<Promoted> {
	if !l.is_number() || !r.is_number() {
		return None;
	}

	if op == ArithmeticOp::Divide || matches!(l, Value::Decimal(_)) || matches!(r, Value::Decimal(_)) {
		return Some(Promoted::Decimal(l.to_decimal()?, r.to_decimal()?));
	}

	let right = r.as_i64()?;
	Some(match l {
		Value::Int1(l) => Promoted::Int1(*l, right as i8),
		Value::Int2(l) => Promoted::Int2(*l, right as i16),
		Value::Int4(l) => Promoted::Int4(*l, right as i32),
		Value::Int8(l) => Promoted::Int8(*l, right),
		_ => return None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_left_width_wins() {
		assert_eq!(
			promote(ArithmeticOp::Add, &Value::int1(1i8), &Value::int8(300i64)),
			Some(Promoted::Int1(1, 300i64 as i8))
		);
		assert_eq!(promote(ArithmeticOp::Add, &Value::int8(1i64), &Value::int1(2i8)), Some(Promoted::Int8(1, 2)));
	}

	#[test]
	fn test_decimal_on_either_side() {
		assert!(matches!(
			promote(ArithmeticOp::Multiply, &Value::int4(2), &Value::decimal(Decimal::from(3))),
			Some(Promoted::Decimal(_, _))
		));
		assert!(matches!(
			promote(ArithmeticOp::Multiply, &Value::decimal(Decimal::from(3)), &Value::int4(2)),
			Some(Promoted::Decimal(_, _))
		));
	}

	#[test]
	fn test_division_always_decimal() {
		assert!(matches!(
			promote(ArithmeticOp::Divide, &Value::int4(7), &Value::int4(2)),
			Some(Promoted::Decimal(_, _))
		));
	}

	#[test]
	fn test_non_numeric() {
		assert_eq!(promote(ArithmeticOp::Add, &Value::int4(7), &Value::utf8("2")), None);
	}
}
