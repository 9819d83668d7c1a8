// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{
	Type,
	temporal::{self, checked_add_months, days_to_ymd, ymd_to_days},
};
use crate::{Result, TypeError};

/// A date value representing a calendar date (year, month, day) without time
/// information.
///
/// Internally stored as days since Unix epoch (1970-01-01).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Date {
	// Negative values represent dates before 1970
	days_since_epoch: i32,
}

impl Date {
	pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
		ymd_to_days(year, month, day).map(|days_since_epoch| Self {
			days_since_epoch,
		})
	}

	pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
		Self::new(year, month, day).ok_or_else(|| TypeError::InvalidLiteral {
			ty: Type::Date,
			text: format!("{}-{:02}-{:02}", year, month, day),
		})
	}

	pub fn parse(text: &str) -> Result<Self> {
		temporal::parse_date(text)
			.map(|days_since_epoch| Self {
				days_since_epoch,
			})
			.ok_or_else(|| TypeError::InvalidLiteral {
				ty: Type::Date,
				text: text.to_string(),
			})
	}

	pub fn from_days_since_epoch(days_since_epoch: i32) -> Self {
		Self {
			days_since_epoch,
		}
	}

	pub fn to_days_since_epoch(&self) -> i32 {
		self.days_since_epoch
	}

	pub fn ymd(&self) -> (i32, u32, u32) {
		days_to_ymd(self.days_since_epoch)
	}

	pub fn year(&self) -> i32 {
		self.ymd().0
	}

	pub fn month(&self) -> u32 {
		self.ymd().1
	}

	pub fn day(&self) -> u32 {
		self.ymd().2
	}

	/// Month arithmetic clamping the day to the end of the target month.
	pub fn add_months(&self, months: i32) -> Result<Self> {
		checked_add_months(self.days_since_epoch, months)
			.map(Self::from_days_since_epoch)
			.ok_or(TypeError::OutOfRange {
				ty: Type::Date,
			})
	}

	pub fn add_days(&self, days: i64) -> Result<Self> {
		i32::try_from(self.days_since_epoch as i64 + days).map(Self::from_days_since_epoch).map_err(|_| {
			TypeError::OutOfRange {
				ty: Type::Date,
			}
		})
	}

	/// Whole months from `other` to `self`, negative when `self` is earlier.
	pub fn months_since(&self, other: &Date) -> i32 {
		temporal::subtract_months(self.days_since_epoch, other.days_since_epoch)
	}
}

impl Display for Date {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let (year, month, day) = self.ymd();
		if year < 0 {
			write!(f, "-{:04}-{:02}-{:02}", -year, month, day)
		} else {
			write!(f, "{:04}-{:02}-{:02}", year, month, day)
		}
	}
}
