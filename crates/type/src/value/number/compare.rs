// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use crate::value::Value;

impl Value {
	/// Total order over all values.
	///
	/// Numbers compare by their numeric value after promotion, so `Int1(2)`
	/// equals `Int8(2)` and `Decimal(2)`. Any number sorts before a non-numeric
	/// value. Non-numeric values of different types order by type tag, values
	/// of the same type compare natively.
	pub fn compare(&self, other: &Value) -> Ordering {
		match (self.is_number(), other.is_number()) {
			(true, true) => compare_numbers(self, other),
			(true, false) => Ordering::Less,
			(false, true) => Ordering::Greater,
			(false, false) => compare_same_kind(self, other),
		}
	}
}

fn compare_numbers(l: &Value, r: &Value) -> Ordering {
	if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
		return l.cmp(&r);
	}
	match (l.to_decimal(), r.to_decimal()) {
		(Some(l), Some(r)) => l.cmp(&r),
		_ => Ordering::Equal,
	}
}

fn compare_same_kind(l: &Value, r: &Value) -> Ordering {
	match (l, r) {
		(Value::Undefined, Value::Undefined) => Ordering::Equal,
		(Value::Boolean(l), Value::Boolean(r)) => l.cmp(r),
		(Value::Utf8(l), Value::Utf8(r)) => l.cmp(r),
		(Value::Date(l), Value::Date(r)) => l.cmp(r),
		(Value::Time(l), Value::Time(r)) => l.cmp(r),
		(Value::DateTime(l), Value::DateTime(r)) => l.cmp(r),
		(Value::Interval(l), Value::Interval(r)) => l.cmp(r),
		(l, r) => l.get_type().cmp(&r.get_type()),
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		self.compare(other) == Ordering::Equal
	}
}

impl Eq for Value {}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Value {
	fn cmp(&self, other: &Self) -> Ordering {
		self.compare(other)
	}
}

#[cfg(test)]
mod tests {
	use std::cmp::Ordering;

	use crate::{Date, Decimal, Value};

	#[test]
	fn test_numbers_compare_after_promotion() {
		assert_eq!(Value::int1(2i8), Value::int8(2i64));
		assert_eq!(Value::int4(2), Value::decimal(Decimal::from(2)));
		assert!(Value::int8(3i64) > Value::decimal(Decimal::parse("2.5").unwrap()));
		assert!(Value::int1(-1i8) < Value::int2(1i16));
	}

	#[test]
	fn test_numbers_sort_before_non_numeric() {
		assert_eq!(Value::int4(100).compare(&Value::utf8("a")), Ordering::Less);
		assert_eq!(Value::utf8("a").compare(&Value::int4(100)), Ordering::Greater);
		assert_eq!(Value::Undefined.compare(&Value::int4(0)), Ordering::Greater);
	}

	#[test]
	fn test_same_type_compares_natively() {
		assert!(Value::utf8("a") < Value::utf8("b"));
		assert!(Value::Date(Date::new(2020, 1, 1).unwrap()) < Value::Date(Date::new(2021, 1, 1).unwrap()));
	}

	#[test]
	fn test_sort_is_deterministic() {
		let mut values = vec![
			Value::utf8("b"),
			Value::int4(3),
			Value::bool(false),
			Value::decimal(Decimal::parse("1.5").unwrap()),
			Value::utf8("a"),
		];
		values.sort();
		assert_eq!(
			values,
			vec![
				Value::decimal(Decimal::parse("1.5").unwrap()),
				Value::int4(3),
				Value::bool(false),
				Value::utf8("a"),
				Value::utf8("b"),
			]
		);
	}
}
