// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use polystore_core::CorrelationId;
use polystore_type::{ArithmeticOp, Type, Value};

use crate::{PlanError, Result, RowShape};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	Remainder,
	Equal,
	NotEqual,
	LessThan,
	LessThanEqual,
	GreaterThan,
	GreaterThanEqual,
	And,
	Or,
}

impl BinaryOp {
	fn arithmetic(&self) -> Option<ArithmeticOp> {
		match self {
			BinaryOp::Add => Some(ArithmeticOp::Add),
			BinaryOp::Subtract => Some(ArithmeticOp::Subtract),
			BinaryOp::Multiply => Some(ArithmeticOp::Multiply),
			BinaryOp::Divide => Some(ArithmeticOp::Divide),
			BinaryOp::Remainder => Some(ArithmeticOp::Remainder),
			_ => None,
		}
	}

	pub fn is_comparison(&self) -> bool {
		matches!(
			self,
			BinaryOp::Equal
				| BinaryOp::NotEqual
				| BinaryOp::LessThan | BinaryOp::LessThanEqual
				| BinaryOp::GreaterThan
				| BinaryOp::GreaterThanEqual
		)
	}

	fn compare(&self, ordering: Ordering) -> bool {
		match self {
			BinaryOp::Equal => ordering == Ordering::Equal,
			BinaryOp::NotEqual => ordering != Ordering::Equal,
			BinaryOp::LessThan => ordering == Ordering::Less,
			BinaryOp::LessThanEqual => ordering != Ordering::Greater,
			BinaryOp::GreaterThan => ordering == Ordering::Greater,
			BinaryOp::GreaterThanEqual => ordering != Ordering::Less,
			_ => false,
		}
	}
}

impl Display for BinaryOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			BinaryOp::Add => "+",
			BinaryOp::Subtract => "-",
			BinaryOp::Multiply => "*",
			BinaryOp::Divide => "/",
			BinaryOp::Remainder => "%",
			BinaryOp::Equal => "=",
			BinaryOp::NotEqual => "<>",
			BinaryOp::LessThan => "<",
			BinaryOp::LessThanEqual => "<=",
			BinaryOp::GreaterThan => ">",
			BinaryOp::GreaterThanEqual => ">=",
			BinaryOp::And => "AND",
			BinaryOp::Or => "OR",
		};
		f.write_str(symbol)
	}
}

/// A scalar expression over the input row of a plan node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Constant(Value),
	/// Positional reference into the input row.
	Column(usize),
	/// Path into a schemaless document.
	Field(String),
	/// A column of the outer row bound by a correlated subquery.
	Correlated {
		correlation: CorrelationId,
		column: usize,
	},
	Binary {
		op: BinaryOp,
		left: Box<Expression>,
		right: Box<Expression>,
	},
	Not(Box<Expression>),
	IsNull(Box<Expression>),
}

impl Expression {
	pub fn constant(value: impl Into<Value>) -> Self {
		Expression::Constant(value.into())
	}

	pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
		Expression::Binary {
			op,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn eq(left: Expression, right: Expression) -> Self {
		Self::binary(BinaryOp::Equal, left, right)
	}

	pub fn and(left: Expression, right: Expression) -> Self {
		Self::binary(BinaryOp::And, left, right)
	}

	pub fn is_constant(&self) -> bool {
		matches!(self, Expression::Constant(_))
	}

	fn map_children(self, f: &mut impl FnMut(Expression) -> Expression) -> Expression {
		match self {
			Expression::Binary {
				op,
				left,
				right,
			} => Expression::Binary {
				op,
				left: Box::new(f(*left)),
				right: Box::new(f(*right)),
			},
			Expression::Not(inner) => Expression::Not(Box::new(f(*inner))),
			Expression::IsNull(inner) => Expression::IsNull(Box::new(f(*inner))),
			leaf => leaf,
		}
	}

	/// Rewrites bottom-up.
	pub fn transform(self, f: &mut impl FnMut(Expression) -> Expression) -> Expression {
		let rewritten = self.map_children(&mut |child| child.transform(f));
		f(rewritten)
	}

	pub fn visit(&self, f: &mut impl FnMut(&Expression)) {
		f(self);
		match self {
			Expression::Binary {
				left,
				right,
				..
			} => {
				left.visit(f);
				right.visit(f);
			}
			Expression::Not(inner) | Expression::IsNull(inner) => inner.visit(f),
			_ => {}
		}
	}

	/// Moves every input column reference `offset` positions to the right.
	pub fn shift_columns(self, offset: usize) -> Expression {
		self.transform(&mut |e| match e {
			Expression::Column(index) => Expression::Column(index + offset),
			other => other,
		})
	}

	pub fn references_correlation(&self, id: CorrelationId) -> bool {
		let mut found = false;
		self.visit(&mut |e| {
			if let Expression::Correlated {
				correlation,
				..
			} = e
			{
				found |= *correlation == id;
			}
		});
		found
	}

	/// Replaces references to the outer row of `id` with plain columns.
	pub fn uncorrelate(self, id: CorrelationId) -> Expression {
		self.transform(&mut |e| match e {
			Expression::Correlated {
				correlation,
				column,
			} if correlation == id => Expression::Column(column),
			other => other,
		})
	}

	pub fn columns(&self) -> Vec<usize> {
		let mut result = Vec::new();
		self.visit(&mut |e| {
			if let Expression::Column(index) = e {
				if !result.contains(index) {
					result.push(*index);
				}
			}
		});
		result
	}

	/// Constant folding through the value algebra. Subexpressions whose
	/// evaluation fails are kept as written.
	pub fn fold(self) -> Expression {
		self.transform(&mut fold_node)
	}

	/// Evaluates an expression without input row, surfacing value errors such
	/// as division by zero.
	pub fn evaluate_constant(&self) -> Result<Value> {
		match self {
			Expression::Constant(value) => Ok(value.clone()),
			Expression::Binary {
				op,
				left,
				right,
			} => {
				let l = left.evaluate_constant()?;
				let r = right.evaluate_constant()?;
				if let Some(arithmetic) = op.arithmetic() {
					return Ok(l.apply(arithmetic, &r)?);
				}
				match Expression::binary(*op, Expression::Constant(l), Expression::Constant(r)).fold() {
					Expression::Constant(value) => Ok(value),
					other => Err(PlanError::NotConstant(other.to_string())),
				}
			}
			Expression::Not(_) | Expression::IsNull(_) => match self.clone().fold() {
				Expression::Constant(value) => Ok(value),
				other => Err(PlanError::NotConstant(other.to_string())),
			},
			other => Err(PlanError::NotConstant(other.to_string())),
		}
	}

	pub fn result_type(&self, input: &RowShape) -> Type {
		match self {
			Expression::Constant(value) => value.get_type(),
			Expression::Column(index) => input.field(*index).map(|f| f.ty).unwrap_or(Type::Undefined),
			Expression::Field(_) => Type::Document,
			Expression::Correlated {
				..
			} => Type::Undefined,
			Expression::Binary {
				op,
				left,
				right,
			} => match op {
				BinaryOp::Divide => Type::Decimal,
				op if op.arithmetic().is_some() => {
					let (l, r) = (left.result_type(input), right.result_type(input));
					if l == Type::Decimal || r == Type::Decimal {
						Type::Decimal
					} else {
						l
					}
				}
				_ => Type::Boolean,
			},
			Expression::Not(_) | Expression::IsNull(_) => Type::Boolean,
		}
	}
}

fn fold_node(expression: Expression) -> Expression {
	match expression {
		Expression::Binary {
			op,
			left,
			right,
		} => match (op, *left, *right) {
			(BinaryOp::And, Expression::Constant(Value::Boolean(true)), other)
			| (BinaryOp::And, other, Expression::Constant(Value::Boolean(true))) => other,
			(BinaryOp::And, Expression::Constant(Value::Boolean(false)), _)
			| (BinaryOp::And, _, Expression::Constant(Value::Boolean(false))) => Expression::constant(false),
			(BinaryOp::Or, Expression::Constant(Value::Boolean(false)), other)
			| (BinaryOp::Or, other, Expression::Constant(Value::Boolean(false))) => other,
			(BinaryOp::Or, Expression::Constant(Value::Boolean(true)), _)
			| (BinaryOp::Or, _, Expression::Constant(Value::Boolean(true))) => Expression::constant(true),
			(op, Expression::Constant(l), Expression::Constant(r)) => fold_constants(op, l, r),
			(op, left, right) => Expression::binary(op, left, right),
		},
		Expression::Not(inner) => match *inner {
			Expression::Constant(Value::Boolean(b)) => Expression::constant(!b),
			inner => Expression::Not(Box::new(inner)),
		},
		Expression::IsNull(inner) => match *inner {
			Expression::Constant(value) => Expression::constant(value.is_undefined()),
			inner => Expression::IsNull(Box::new(inner)),
		},
		other => other,
	}
}

fn fold_constants(op: BinaryOp, l: Value, r: Value) -> Expression {
	if let Some(arithmetic) = op.arithmetic() {
		return match l.apply(arithmetic, &r) {
			Ok(value) => Expression::Constant(value),
			Err(_) => Expression::binary(op, Expression::Constant(l), Expression::Constant(r)),
		};
	}
	if op.is_comparison() {
		if l.is_undefined() || r.is_undefined() {
			return Expression::Constant(Value::Undefined);
		}
		return Expression::constant(op.compare(l.compare(&r)));
	}
	Expression::binary(op, Expression::Constant(l), Expression::Constant(r))
}

/// Splits a predicate into its top-level `AND` operands.
pub fn conjuncts(expression: Expression) -> Vec<Expression> {
	match expression {
		Expression::Binary {
			op: BinaryOp::And,
			left,
			right,
		} => {
			let mut result = conjuncts(*left);
			result.extend(conjuncts(*right));
			result
		}
		other => vec![other],
	}
}

pub fn conjunction(expressions: Vec<Expression>) -> Option<Expression> {
	expressions.into_iter().reduce(Expression::and)
}

impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Expression::Constant(Value::Utf8(s)) => write!(f, "'{}'", s),
			Expression::Constant(value) => write!(f, "{}", value),
			Expression::Column(index) => write!(f, "#{}", index),
			Expression::Field(path) => write!(f, "{}", path),
			Expression::Correlated {
				correlation,
				column,
			} => write!(f, "$cor{}.#{}", correlation, column),
			Expression::Binary {
				op,
				left,
				right,
			} => write!(f, "({} {} {})", left, op, right),
			Expression::Not(inner) => write!(f, "NOT {}", inner),
			Expression::IsNull(inner) => write!(f, "{} IS NULL", inner),
		}
	}
}

#[cfg(test)]
mod tests {
	use polystore_type::Decimal;

	use super::*;

	#[test]
	fn test_fold_arithmetic() {
		let e = Expression::binary(BinaryOp::Add, Expression::constant(1), Expression::constant(2));
		assert_eq!(e.fold(), Expression::Constant(Value::Int4(3)));
	}

	#[test]
	fn test_fold_division_is_decimal() {
		let e = Expression::binary(BinaryOp::Divide, Expression::constant(7), Expression::constant(2));
		assert_eq!(e.fold(), Expression::Constant(Value::Decimal(Decimal::parse("3.5").unwrap())));
	}

	#[test]
	fn test_fold_keeps_failing_subexpression() {
		let e = Expression::binary(BinaryOp::Divide, Expression::constant(1), Expression::constant(0));
		assert_eq!(e.clone().fold(), e);
		assert!(e.evaluate_constant().is_err());
	}

	#[test]
	fn test_fold_boolean_identities() {
		let e = Expression::and(Expression::constant(true), Expression::eq(Expression::Column(0), Expression::constant(1)));
		assert_eq!(e.fold(), Expression::eq(Expression::Column(0), Expression::constant(1)));

		let e = Expression::and(Expression::Column(2), Expression::constant(false));
		assert_eq!(e.fold(), Expression::constant(false));
	}

	#[test]
	fn test_fold_comparison() {
		let e = Expression::binary(BinaryOp::LessThan, Expression::constant(1), Expression::constant(2i64));
		assert_eq!(e.fold(), Expression::constant(true));
	}

	#[test]
	fn test_shift_and_uncorrelate() {
		let id = CorrelationId(1);
		let e = Expression::eq(
			Expression::Column(0),
			Expression::Correlated {
				correlation: id,
				column: 2,
			},
		);
		assert!(e.references_correlation(id));
		assert!(!e.references_correlation(CorrelationId(2)));

		let rewritten = e.shift_columns(3).uncorrelate(id);
		assert_eq!(rewritten, Expression::eq(Expression::Column(3), Expression::Column(2)));
	}

	#[test]
	fn test_conjuncts_roundtrip() {
		let a = Expression::Column(0);
		let b = Expression::Column(1);
		let c = Expression::Column(2);
		let e = Expression::and(Expression::and(a.clone(), b.clone()), c.clone());
		assert_eq!(conjuncts(e), vec![a, b, c]);
		assert_eq!(conjunction(vec![]), None);
	}

	#[test]
	fn test_display() {
		let e = Expression::eq(Expression::Column(0), Expression::constant("x"));
		assert_eq!(e.to_string(), "(#0 = 'x')");
	}
}
