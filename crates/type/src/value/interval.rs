// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::temporal::MILLIS_PER_DAY;

/// A duration made of a calendar part (months) and an exact part
/// (milliseconds).
///
/// The two parts are kept apart because a month has no fixed length: adding
/// one month to a date moves the calendar, adding 30 days does not.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
	months: i32,
	millis: i64,
}

impl Interval {
	pub fn new(months: i32, millis: i64) -> Self {
		Self {
			months,
			millis,
		}
	}

	pub fn from_months(months: i32) -> Self {
		Self::new(months, 0)
	}

	pub fn from_days(days: i64) -> Self {
		Self::new(0, days * MILLIS_PER_DAY)
	}

	pub fn from_millis(millis: i64) -> Self {
		Self::new(0, millis)
	}

	pub fn months(&self) -> i32 {
		self.months
	}

	pub fn millis(&self) -> i64 {
		self.millis
	}

	pub fn negate(&self) -> Self {
		Self::new(self.months.wrapping_neg(), self.millis.wrapping_neg())
	}

	pub fn wrapping_add(&self, other: &Interval) -> Self {
		Self::new(self.months.wrapping_add(other.months), self.millis.wrapping_add(other.millis))
	}
}

impl Display for Interval {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut parts = Vec::new();
		if self.months != 0 {
			parts.push(format!("{} months", self.months));
		}
		if self.millis != 0 || self.months == 0 {
			parts.push(format!("{} ms", self.millis));
		}
		f.write_str(&parts.join(" "))
	}
}
