// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use super::{MILLIS_PER_DAY, floor_div, floor_mod};

/// Proleptic Gregorian leap year rule.
#[inline]
pub fn is_leap_year(year: i32) -> bool {
	(year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[inline]
pub fn days_in_month(year: i32, month: u32) -> u32 {
	match month {
		1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
		4 | 6 | 9 | 11 => 30,
		2 => {
			if is_leap_year(year) {
				29
			} else {
				28
			}
		}
		_ => 0,
	}
}

/// Convert year/month/day to days since Unix epoch
pub fn ymd_to_days(year: i32, month: u32, day: u32) -> Option<i32> {
	if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
		return None;
	}

	// Algorithm based on Howard Hinnant's date algorithms
	// Convert month from [1,12] to [0,11] where Mar=0
	let (y, m) = if month <= 2 {
		(year as i64 - 1, month as i64 + 9)
	} else {
		(year as i64, month as i64 - 3)
	};

	let era = floor_div(y, 400);
	let yoe = y - era * 400; // [0, 399]
	let doy = (153 * m + 2) / 5 + day as i64 - 1; // [0, 365]
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
	let days = era * 146097 + doe - 719468;

	i32::try_from(days).ok()
}

/// Convert days since Unix epoch to year/month/day
pub fn days_to_ymd(days: i32) -> (i32, u32, u32) {
	// Adjust to the algorithm's epoch
	let days_since_ce = days as i64 + 719468;

	let era = floor_div(days_since_ce, 146097);
	let doe = days_since_ce - era * 146097; // [0, 146096]
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
	let y = yoe + era * 400;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
	let mp = (5 * doy + 2) / 153; // [0, 11]
	let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
	let m = if mp < 10 {
		mp + 3
	} else {
		mp - 9
	}; // [1, 12]
	let year = if m <= 2 {
		y + 1
	} else {
		y
	};

	(year as i32, m as u32, d as u32)
}

/// Adds `months` to a day offset, clamping the day to the last valid day of
/// the target month (Jan 31 + 1 month is Feb 28, or Feb 29 in a leap year).
///
/// Panics if the result does not fit a day offset; see [`checked_add_months`].
pub fn add_months(date: i32, months: i32) -> i32 {
	checked_add_months(date, months).expect("date out of range")
}

/// Like [`add_months`], returning `None` when the result leaves the day
/// offset range.
pub fn checked_add_months(date: i32, months: i32) -> Option<i32> {
	let (year, month, day) = days_to_ymd(date);

	let month_index = month as i64 - 1 + months as i64;
	let year = i32::try_from(year as i64 + floor_div(month_index, 12)).ok()?;
	let month = (floor_mod(month_index, 12) + 1) as u32;

	let day = day.min(days_in_month(year, month));
	ymd_to_days(year, month, day)
}

/// Adds `months` to a millisecond timestamp. Only the date part moves, the
/// time of day is carried over unchanged.
pub fn add_months_to_timestamp(timestamp: i64, months: i32) -> i64 {
	checked_add_months_to_timestamp(timestamp, months).expect("timestamp out of range")
}

pub fn checked_add_months_to_timestamp(timestamp: i64, months: i32) -> Option<i64> {
	let (days, millis) = split_timestamp(timestamp)?;
	let days = checked_add_months(days, months)?;
	(days as i64).checked_mul(MILLIS_PER_DAY)?.checked_add(millis)
}

/// Number of whole months between two day offsets, anti-symmetric in its
/// arguments.
///
/// Returns the largest `m` such that `add_months(date1, m) <= date0`.
pub fn subtract_months(date0: i32, date1: i32) -> i32 {
	if date0 < date1 {
		return -subtract_months(date1, date0);
	}

	// No calendar month is longer than 31 days, so this never overshoots.
	let mut m = ((date0 as i64 - date1 as i64) / 31) as i32;
	// a month past the day offset range is never <= date0
	while checked_add_months(date1, m + 1).is_some_and(|date| date <= date0) {
		m += 1;
	}
	m
}

/// Number of whole months between two millisecond timestamps. A month only
/// counts once the time of day of the later timestamp has been reached too.
///
/// Returns `None` when either date part leaves the day offset range.
pub fn subtract_months_between_timestamps(t0: i64, t1: i64) -> Option<i32> {
	if t0 < t1 {
		return subtract_months_between_timestamps(t1, t0).map(|months| -months);
	}

	let (d0, millis0) = split_timestamp(t0)?;
	let (d1, millis1) = split_timestamp(t1)?;

	let mut months = subtract_months(d0, d1);
	if checked_add_months(d1, months) == Some(d0) && millis0 < millis1 {
		months -= 1;
	}
	Some(months)
}

/// Splits a millisecond timestamp into its day offset and the milliseconds
/// since midnight.
pub fn split_timestamp(timestamp: i64) -> Option<(i32, i64)> {
	let days = i32::try_from(floor_div(timestamp, MILLIS_PER_DAY)).ok()?;
	Some((days, floor_mod(timestamp, MILLIS_PER_DAY)))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ymd(year: i32, month: u32, day: u32) -> i32 {
		ymd_to_days(year, month, day).unwrap()
	}

	#[test]
	fn test_epoch() {
		assert_eq!(ymd(1970, 1, 1), 0);
		assert_eq!(days_to_ymd(0), (1970, 1, 1));
		assert_eq!(days_to_ymd(-1), (1969, 12, 31));
	}

	#[test]
	fn test_ymd_roundtrip_across_eras() {
		for days in (-800_000..800_000).step_by(997) {
			let (y, m, d) = days_to_ymd(days);
			assert_eq!(ymd(y, m, d), days);
		}
	}

	#[test]
	fn test_invalid_ymd() {
		assert_eq!(ymd_to_days(2023, 2, 29), None);
		assert_eq!(ymd_to_days(2023, 13, 1), None);
		assert_eq!(ymd_to_days(2023, 4, 31), None);
	}

	#[test]
	fn test_leap_years() {
		assert!(is_leap_year(2024));
		assert!(is_leap_year(2000));
		assert!(!is_leap_year(1900));
		assert!(!is_leap_year(2023));
	}

	#[test]
	fn test_add_months_clamps_to_month_end() {
		assert_eq!(add_months(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
		assert_eq!(add_months(ymd(2023, 1, 31), 1), ymd(2023, 2, 28));
		assert_eq!(add_months(ymd(2023, 3, 31), 1), ymd(2023, 4, 30));
	}

	#[test]
	fn test_add_months_year_carry() {
		assert_eq!(add_months(ymd(2023, 11, 15), 3), ymd(2024, 2, 15));
		assert_eq!(add_months(ymd(2023, 1, 15), -1), ymd(2022, 12, 15));
		assert_eq!(add_months(ymd(1970, 1, 1), -1), ymd(1969, 12, 1));
		assert_eq!(add_months(ymd(2000, 6, 10), -30), ymd(1997, 12, 10));
		assert_eq!(add_months(ymd(2000, 6, 10), 0), ymd(2000, 6, 10));
	}

	#[test]
	fn test_checked_add_months_out_of_range() {
		assert_eq!(checked_add_months(0, i32::MAX), None);
		assert_eq!(checked_add_months_to_timestamp(i64::MAX - 1, 1), None);
	}

	#[test]
	fn test_add_months_before_epoch() {
		assert_eq!(add_months(ymd(1900, 1, 31), 1), ymd(1900, 2, 28));
		assert_eq!(add_months(ymd(1600, 1, 31), 1), ymd(1600, 2, 29));
	}

	#[test]
	fn test_add_months_to_timestamp_keeps_time_of_day() {
		let time = 13 * 3_600_000 + 45 * 60_000 + 7_123;
		let ts = ymd(2024, 1, 31) as i64 * MILLIS_PER_DAY + time;
		assert_eq!(add_months_to_timestamp(ts, 1), ymd(2024, 2, 29) as i64 * MILLIS_PER_DAY + time);

		let before_epoch = ymd(1969, 12, 31) as i64 * MILLIS_PER_DAY + time;
		assert_eq!(add_months_to_timestamp(before_epoch, 2), ymd(1970, 2, 28) as i64 * MILLIS_PER_DAY + time);
	}

	#[test]
	fn test_subtract_months() {
		assert_eq!(subtract_months(ymd(2024, 3, 15), ymd(2024, 1, 15)), 2);
		assert_eq!(subtract_months(ymd(2024, 3, 14), ymd(2024, 1, 15)), 1);
		assert_eq!(subtract_months(ymd(2024, 1, 15), ymd(2024, 3, 15)), -2);
		assert_eq!(subtract_months(ymd(2024, 2, 29), ymd(2024, 1, 31)), 1);
		assert_eq!(subtract_months(ymd(2024, 1, 1), ymd(2024, 1, 1)), 0);
	}

	#[test]
	fn test_subtract_months_is_anti_symmetric() {
		let a = ymd(2021, 7, 19);
		let b = ymd(1999, 2, 3);
		assert_eq!(subtract_months(a, b), -subtract_months(b, a));
	}

	#[test]
	fn test_subtract_months_roundtrip() {
		for d in (ymd(1950, 1, 1)..ymd(2050, 1, 1)).step_by(37) {
			let (_, _, day) = days_to_ymd(d);
			if day > 28 {
				continue;
			}
			for n in [-25, -12, -1, 0, 1, 2, 11, 12, 13, 120] {
				assert_eq!(subtract_months(add_months(d, n), d), n, "d={d} n={n}");
			}
		}
	}

	#[test]
	fn test_subtract_months_between_timestamps() {
		let t1 = ymd(2024, 1, 15) as i64 * MILLIS_PER_DAY + 10 * 3_600_000;
		let t0 = ymd(2024, 3, 15) as i64 * MILLIS_PER_DAY + 9 * 3_600_000;
		assert_eq!(subtract_months_between_timestamps(t0, t1), Some(1));

		let t0 = ymd(2024, 3, 15) as i64 * MILLIS_PER_DAY + 11 * 3_600_000;
		assert_eq!(subtract_months_between_timestamps(t0, t1), Some(2));
		assert_eq!(subtract_months_between_timestamps(t1, t0), Some(-2));
	}

	#[test]
	fn test_subtract_months_at_range_ends() {
		let (year, month, _) = days_to_ymd(i32::MAX);
		let expected = (year as i64 - 1970) * 12 + (month as i64 - 1);
		assert_eq!(subtract_months(i32::MAX, 0) as i64, expected);
		assert_eq!(subtract_months(0, i32::MAX) as i64, -expected);

		let to_min = subtract_months(0, i32::MIN);
		assert!(to_min > 0);
		assert_eq!(subtract_months(i32::MIN, 0), -to_min);
		assert!(add_months(i32::MIN, to_min) <= 0);

		let span = subtract_months(i32::MAX, i32::MIN);
		assert!(add_months(i32::MIN, span) <= i32::MAX);
		assert_eq!(checked_add_months(i32::MIN, span + 1), None);
	}

	#[test]
	fn test_split_timestamp() {
		assert_eq!(split_timestamp(-1), Some((-1, MILLIS_PER_DAY - 1)));
		assert_eq!(split_timestamp(MILLIS_PER_DAY + 5), Some((1, 5)));
		assert_eq!(split_timestamp(i64::MAX), None);
		assert_eq!(split_timestamp(i64::MIN), None);
	}

	#[test]
	fn test_subtract_months_between_far_timestamps() {
		assert_eq!(subtract_months_between_timestamps(i64::MAX, 0), None);
		assert_eq!(subtract_months_between_timestamps(0, i64::MIN), None);

		let last = i32::MAX as i64 * MILLIS_PER_DAY;
		assert_eq!(subtract_months_between_timestamps(last, 0), Some(subtract_months(i32::MAX, 0)));
	}
}
