// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Calendar arithmetic over epoch offsets.
//!
//! Dates are signed day offsets from 1970-01-01, timestamps are signed
//! millisecond offsets from 1970-01-01T00:00:00. All field extraction goes
//! through [`floor_div`] and [`floor_mod`] so pre-epoch offsets resolve to the
//! correct calendar fields.

mod calendar;
mod parse;

pub use calendar::{
	add_months, add_months_to_timestamp, checked_add_months, checked_add_months_to_timestamp, days_in_month,
	days_to_ymd, is_leap_year, split_timestamp, subtract_months, subtract_months_between_timestamps, ymd_to_days,
};
pub(crate) use parse::{parse_date, parse_datetime, parse_time};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Integer division rounding towards negative infinity.
///
/// `floor_div(a, b) * b + floor_mod(a, b) == a` for every `a` and non-zero `b`.
#[inline]
pub fn floor_div(a: i64, b: i64) -> i64 {
	let q = a / b;
	if (a % b != 0) && ((a < 0) != (b < 0)) {
		q - 1
	} else {
		q
	}
}

/// Modulo whose result carries the sign of the divisor, so for `b > 0` the
/// result is always in `0..b`.
#[inline]
pub fn floor_mod(a: i64, b: i64) -> i64 {
	let r = a % b;
	if r != 0 && ((r < 0) != (b < 0)) {
		r + b
	} else {
		r
	}
}
