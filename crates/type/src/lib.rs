// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Runtime values used during plan construction and constant evaluation.
//!
//! Every [`Value`] carries a tag that decides which arithmetic closure rules
//! apply: exact integers stay in the width of the left operand, decimals are
//! computed under a fixed 64 digit context and temporal values are plain
//! offsets from the Unix epoch.

pub mod error;
pub mod value;

pub use error::{Result, TypeError};
pub use value::{
	ArithmeticOp, DECIMAL_PRECISION, Date, DateTime, Decimal, Interval, Time, Type, Value,
	temporal::{self, MILLIS_PER_DAY, floor_div, floor_mod},
};
