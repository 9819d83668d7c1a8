// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{
	Type,
	temporal::{self, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, floor_mod},
};
use crate::{Result, TypeError};

/// A time of day, stored as milliseconds since midnight.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time {
	millis_of_day: i32,
}

impl Time {
	pub fn new(hour: u32, minute: u32, second: u32, millis: u32) -> Option<Self> {
		if hour > 23 || minute > 59 || second > 59 || millis > 999 {
			return None;
		}
		let millis_of_day = hour as i64 * MILLIS_PER_HOUR
			+ minute as i64 * MILLIS_PER_MINUTE
			+ second as i64 * MILLIS_PER_SECOND
			+ millis as i64;
		Some(Self {
			millis_of_day: millis_of_day as i32,
		})
	}

	pub fn parse(text: &str) -> Result<Self> {
		temporal::parse_time(text)
			.map(|millis_of_day| Self {
				millis_of_day,
			})
			.ok_or_else(|| TypeError::InvalidLiteral {
				ty: Type::Time,
				text: text.to_string(),
			})
	}

	/// Wraps any millisecond count onto the 24 hour clock.
	pub fn from_millis_of_day(millis: i64) -> Self {
		Self {
			millis_of_day: floor_mod(millis, MILLIS_PER_DAY) as i32,
		}
	}

	pub fn midnight() -> Self {
		Self::default()
	}

	pub fn to_millis_of_day(&self) -> i32 {
		self.millis_of_day
	}

	pub fn hour(&self) -> u32 {
		(self.millis_of_day as i64 / MILLIS_PER_HOUR) as u32
	}

	pub fn minute(&self) -> u32 {
		(self.millis_of_day as i64 % MILLIS_PER_HOUR / MILLIS_PER_MINUTE) as u32
	}

	pub fn second(&self) -> u32 {
		(self.millis_of_day as i64 % MILLIS_PER_MINUTE / MILLIS_PER_SECOND) as u32
	}

	pub fn millisecond(&self) -> u32 {
		(self.millis_of_day as i64 % MILLIS_PER_SECOND) as u32
	}
}

impl Display for Time {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())?;
		if self.millisecond() != 0 {
			write!(f, ".{:03}", self.millisecond())?;
		}
		Ok(())
	}
}
