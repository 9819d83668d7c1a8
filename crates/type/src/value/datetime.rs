// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{
	Date, Time, Type,
	temporal::{self, MILLIS_PER_DAY, checked_add_months_to_timestamp, floor_mod, split_timestamp},
};
use crate::{Result, TypeError};

/// A timestamp without time zone, stored as milliseconds since
/// 1970-01-01T00:00:00.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateTime {
	millis_since_epoch: i64,
}

impl DateTime {
	pub fn new(date: Date, time: Time) -> Self {
		Self {
			millis_since_epoch: date.to_days_since_epoch() as i64 * MILLIS_PER_DAY
				+ time.to_millis_of_day() as i64,
		}
	}

	pub fn from_millis_since_epoch(millis_since_epoch: i64) -> Self {
		Self {
			millis_since_epoch,
		}
	}

	pub fn parse(text: &str) -> Result<Self> {
		temporal::parse_datetime(text).map(Self::from_millis_since_epoch).ok_or_else(|| TypeError::InvalidLiteral {
			ty: Type::DateTime,
			text: text.to_string(),
		})
	}

	pub fn to_millis_since_epoch(&self) -> i64 {
		self.millis_since_epoch
	}

	/// Fails when the date part lies outside the [`Date`] range.
	pub fn date(&self) -> Result<Date> {
		split_timestamp(self.millis_since_epoch).map(|(days, _)| Date::from_days_since_epoch(days)).ok_or(
			TypeError::OutOfRange {
				ty: Type::Date,
			},
		)
	}

	pub fn time(&self) -> Time {
		Time::from_millis_of_day(floor_mod(self.millis_since_epoch, MILLIS_PER_DAY))
	}

	/// Month arithmetic on the date part; the time of day is never altered.
	pub fn add_months(&self, months: i32) -> Result<Self> {
		checked_add_months_to_timestamp(self.millis_since_epoch, months).map(Self::from_millis_since_epoch).ok_or(
			TypeError::OutOfRange {
				ty: Type::DateTime,
			},
		)
	}

	pub fn add_millis(&self, millis: i64) -> Result<Self> {
		self.millis_since_epoch.checked_add(millis).map(Self::from_millis_since_epoch).ok_or(
			TypeError::OutOfRange {
				ty: Type::DateTime,
			},
		)
	}

	pub fn months_since(&self, other: &DateTime) -> Result<i32> {
		temporal::subtract_months_between_timestamps(self.millis_since_epoch, other.millis_since_epoch).ok_or(
			TypeError::OutOfRange {
				ty: Type::DateTime,
			},
		)
	}
}

impl Display for DateTime {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.date() {
			Ok(date) => write!(f, "{} {}", date, self.time()),
			Err(_) => write!(f, "{}ms", self.millis_since_epoch),
		}
	}
}
