// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	borrow::Cow,
	cmp::Ordering,
	fmt::{Display, Formatter},
	str::FromStr,
};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use super::Type;
use crate::{Result, TypeError};

/// Significant digits kept by every decimal operation.
pub const DECIMAL_PRECISION: u64 = 64;

/// An arbitrary-precision decimal, rounded to [`DECIMAL_PRECISION`]
/// significant digits after every operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Decimal(BigDecimal);

impl Decimal {
	pub fn new(inner: BigDecimal) -> Self {
		Self(round_to_context(inner))
	}

	pub fn zero() -> Self {
		Self(BigDecimal::zero())
	}

	pub fn parse(text: &str) -> Result<Self> {
		let trimmed = text.trim();
		let value = if trimmed.contains('_') {
			Cow::Owned(trimmed.replace('_', ""))
		} else {
			Cow::Borrowed(trimmed)
		};

		if value.is_empty() {
			return Err(TypeError::InvalidLiteral {
				ty: Type::Decimal,
				text: text.to_string(),
			});
		}

		BigDecimal::from_str(&value).map(Self::new).map_err(|_| TypeError::InvalidLiteral {
			ty: Type::Decimal,
			text: text.to_string(),
		})
	}

	pub fn inner(&self) -> &BigDecimal {
		&self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn add(&self, other: &Decimal) -> Decimal {
		Self::new(&self.0 + &other.0)
	}

	pub fn sub(&self, other: &Decimal) -> Decimal {
		Self::new(&self.0 - &other.0)
	}

	pub fn mul(&self, other: &Decimal) -> Decimal {
		Self::new(&self.0 * &other.0)
	}

	pub fn div(&self, other: &Decimal) -> Result<Decimal> {
		if other.is_zero() {
			return Err(TypeError::DivisionByZero);
		}
		Ok(Self::new(divide_to_context(&self.0, &other.0)))
	}

	pub fn rem(&self, other: &Decimal) -> Result<Decimal> {
		if other.is_zero() {
			return Err(TypeError::DivisionByZero);
		}
		Ok(Self::new(&self.0 % &other.0))
	}

	pub fn neg(&self) -> Decimal {
		Self(-&self.0)
	}
}

fn round_to_context(value: BigDecimal) -> BigDecimal {
	let value = if value.digits() > DECIMAL_PRECISION {
		value.with_prec(DECIMAL_PRECISION)
	} else {
		value
	};
	value.normalized()
}

/// `dividend / divisor` rounded once, half to even, to [`DECIMAL_PRECISION`]
/// significant digits. `divisor` must not be zero.
fn divide_to_context(dividend: &BigDecimal, divisor: &BigDecimal) -> BigDecimal {
	let (numerator, numerator_scale) = dividend.as_bigint_and_exponent();
	let (denominator, denominator_scale) = divisor.as_bigint_and_exponent();
	if numerator.is_zero() {
		return BigDecimal::zero();
	}

	let negative = numerator.sign() != denominator.sign();
	let numerator = numerator.abs();
	let denominator = denominator.abs();

	// at least two digits past the context, so the quotient never ends on
	// the rounding digit
	let shift = (DECIMAL_PRECISION as i64 + 2 + decimal_digits(&denominator) - decimal_digits(&numerator)).max(0);
	let scaled = numerator * ten_pow(shift as u64);
	let quotient = &scaled / &denominator;
	let inexact = !(&scaled % &denominator).is_zero();

	let dropped = (decimal_digits(&quotient) - DECIMAL_PRECISION as i64).max(0) as u64;
	let unit = ten_pow(dropped);
	let mut kept = &quotient / &unit;
	let rest = &quotient % &unit;

	let twice_rest: BigInt = rest * 2;
	let round_up = match twice_rest.cmp(&unit) {
		Ordering::Greater => true,
		Ordering::Equal => inexact || !(&kept % 2_i32).is_zero(),
		Ordering::Less => false,
	};
	if round_up {
		kept += 1;
	}
	if negative {
		kept = -kept;
	}

	BigDecimal::new(kept, numerator_scale - denominator_scale + shift - dropped as i64)
}

fn decimal_digits(value: &BigInt) -> i64 {
	value.magnitude().to_str_radix(10).len() as i64
}

fn ten_pow(exponent: u64) -> BigInt {
	num_traits::pow(BigInt::from(10), exponent as usize)
}

impl Display for Decimal {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl From<i64> for Decimal {
	fn from(value: i64) -> Self {
		Self::new(BigDecimal::from(value))
	}
}

impl From<i32> for Decimal {
	fn from(value: i32) -> Self {
		Self::new(BigDecimal::from(value))
	}
}

impl From<BigInt> for Decimal {
	fn from(value: BigInt) -> Self {
		Self::new(BigDecimal::from(value))
	}
}

impl From<BigDecimal> for Decimal {
	fn from(value: BigDecimal) -> Self {
		Self::new(value)
	}
}
