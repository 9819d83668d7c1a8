// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::value::{ArithmeticOp, Type};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
	#[error("invalid {ty} literal '{text}'")]
	InvalidLiteral {
		ty: Type,
		text: String,
	},

	#[error("operator {op} is not applicable to {left} and {right}")]
	OperatorNotApplicable {
		op: ArithmeticOp,
		left: Type,
		right: Type,
	},

	#[error("cannot negate a value of type {0}")]
	NegationNotApplicable(Type),

	#[error("division by zero")]
	DivisionByZero,

	#[error("{ty} value out of range")]
	OutOfRange {
		ty: Type,
	},
}

pub type Result<T> = std::result::Result<T, TypeError>;
