// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod arith;
mod compare;
mod promote;

pub use promote::{Promoted, promote};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	Remainder,
}

impl Display for ArithmeticOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ArithmeticOp::Add => f.write_str("+"),
			ArithmeticOp::Subtract => f.write_str("-"),
			ArithmeticOp::Multiply => f.write_str("*"),
			ArithmeticOp::Divide => f.write_str("/"),
			ArithmeticOp::Remainder => f.write_str("%"),
		}
	}
}
