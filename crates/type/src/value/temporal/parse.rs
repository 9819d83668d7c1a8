// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use super::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, calendar::ymd_to_days};

/// Parses `YYYY-MM-DD`, with an optional leading `-` for years before 0.
pub(crate) fn parse_date(text: &str) -> Option<i32> {
	let text = text.trim();
	let (negative, rest) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text),
	};

	let mut parts = rest.split('-');
	let year = parts.next()?;
	let month = parts.next()?;
	let day = parts.next()?;
	if parts.next().is_some() || year.len() < 4 || month.len() != 2 || day.len() != 2 {
		return None;
	}

	let year: i32 = digits(year)?.try_into().ok()?;
	let year = if negative {
		-year
	} else {
		year
	};
	let month = digits(month)? as u32;
	let day = digits(day)? as u32;

	ymd_to_days(year, month, day)
}

/// Parses `HH:MM:SS[.fff]` into milliseconds since midnight. Fractions finer
/// than a millisecond are truncated.
pub(crate) fn parse_time(text: &str) -> Option<i32> {
	let text = text.trim();
	let mut parts = text.split(':');
	let hour = parts.next()?;
	let minute = parts.next()?;
	let second = parts.next()?;
	if parts.next().is_some() || hour.len() != 2 || minute.len() != 2 {
		return None;
	}

	let (second, fraction) = match second.split_once('.') {
		Some((second, fraction)) => (second, Some(fraction)),
		None => (second, None),
	};
	if second.len() != 2 {
		return None;
	}

	let hour = digits(hour)?;
	let minute = digits(minute)?;
	let second = digits(second)?;
	if hour > 23 || minute > 59 || second > 59 {
		return None;
	}

	let millis = match fraction {
		None => 0,
		Some(fraction) if fraction.is_empty() || fraction.len() > 9 => return None,
		Some(fraction) => {
			let mut padded = fraction.chars().take(3).collect::<String>();
			while padded.len() < 3 {
				padded.push('0');
			}
			digits(fraction)?;
			digits(&padded)?
		}
	};

	let total = hour * MILLIS_PER_HOUR + minute * MILLIS_PER_MINUTE + second * MILLIS_PER_SECOND + millis;
	debug_assert!(total < MILLIS_PER_DAY);
	Some(total as i32)
}

/// Parses `YYYY-MM-DD HH:MM:SS[.fff]` (a `T` separator is accepted as well)
/// into milliseconds since the epoch.
pub(crate) fn parse_datetime(text: &str) -> Option<i64> {
	let text = text.trim().trim_end_matches('Z');
	let (date, time) = text.split_once(['T', ' ']).unwrap_or((text, "00:00:00"));
	let days = parse_date(date)? as i64;
	let millis = parse_time(time)? as i64;
	days.checked_mul(MILLIS_PER_DAY)?.checked_add(millis)
}

fn digits(text: &str) -> Option<i64> {
	if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	text.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_date() {
		assert_eq!(parse_date("1970-01-01"), Some(0));
		assert_eq!(parse_date("1969-12-31"), Some(-1));
		assert_eq!(parse_date("2024-02-29"), ymd_to_days(2024, 2, 29));
	}

	#[test]
	fn test_parse_date_invalid() {
		assert_eq!(parse_date("2023-02-29"), None);
		assert_eq!(parse_date("2023-2-01"), None);
		assert_eq!(parse_date("20230201"), None);
		assert_eq!(parse_date("abcd-01-01"), None);
	}

	#[test]
	fn test_parse_time() {
		assert_eq!(parse_time("00:00:00"), Some(0));
		assert_eq!(parse_time("01:02:03"), Some(3_723_000));
		assert_eq!(parse_time("01:02:03.5"), Some(3_723_500));
		assert_eq!(parse_time("23:59:59.999999"), Some(86_399_999));
	}

	#[test]
	fn test_parse_time_invalid() {
		assert_eq!(parse_time("24:00:00"), None);
		assert_eq!(parse_time("12:60:00"), None);
		assert_eq!(parse_time("12:00"), None);
		assert_eq!(parse_time("12:00:00."), None);
	}

	#[test]
	fn test_parse_datetime() {
		assert_eq!(parse_datetime("1970-01-01 00:00:01"), Some(1_000));
		assert_eq!(parse_datetime("1970-01-01T00:00:01.250Z"), Some(1_250));
		assert_eq!(parse_datetime("1969-12-31 23:59:59"), Some(-1_000));
		assert_eq!(parse_datetime("1970-01-02"), Some(MILLIS_PER_DAY));
	}
}
