// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use polystore_type::{Type, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	Query(Query),
	Insert(InsertStatement),
	Update(UpdateStatement),
	Delete(DeleteStatement),
	CreateTable(CreateTableStatement),
}

impl Statement {
	/// The table a statement writes to or creates.
	pub fn target(&self) -> Option<&ObjectName> {
		match self {
			Statement::Query(_) => None,
			Statement::Insert(insert) => Some(&insert.table),
			Statement::Update(update) => Some(&update.table),
			Statement::Delete(delete) => Some(&delete.table),
			Statement::CreateTable(create) => Some(&create.name),
		}
	}

	pub fn is_mutation(&self) -> bool {
		matches!(self, Statement::Insert(_) | Statement::Update(_) | Statement::Delete(_))
	}
}

/// A possibly namespace qualified table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
	pub namespace: Option<String>,
	pub name: String,
}

impl ObjectName {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			namespace: None,
			name: name.into(),
		}
	}

	pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: Some(namespace.into()),
			name: name.into(),
		}
	}
}

impl Display for ObjectName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.namespace {
			Some(namespace) => write!(f, "{}.{}", namespace, self.name),
			None => f.write_str(&self.name),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
	Select(Box<SelectStatement>),
	SetOperation {
		op: SetOperator,
		/// Keep duplicates.
		all: bool,
		left: Box<Query>,
		right: Box<Query>,
	},
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetOperator {
	Union,
	Intersect,
	Except,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
	pub distinct: bool,
	pub items: Vec<SelectItem>,
	pub from: Option<TableRef>,
	pub joins: Vec<JoinClause>,
	pub selection: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
	Wildcard,
	Expr {
		expr: Expr,
		alias: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
	pub name: ObjectName,
	pub alias: Option<String>,
}

impl TableRef {
	/// The name columns of this table are qualified with.
	pub fn reference_name(&self) -> &str {
		self.alias.as_deref().unwrap_or(&self.name.name)
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JoinType {
	Inner,
	Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
	pub join_type: JoinType,
	pub table: TableRef,
	pub on: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
	pub table: ObjectName,
	pub columns: Vec<String>,
	pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
	Values(Vec<Vec<Expr>>),
	Query(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
	pub table: ObjectName,
	pub assignments: Vec<Assignment>,
	pub selection: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
	pub column: String,
	pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
	pub table: ObjectName,
	pub selection: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
	pub name: ObjectName,
	pub columns: Vec<ColumnDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
	pub name: String,
	pub ty: Type,
	pub nullable: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
	Plus,
	Minus,
	Multiply,
	Divide,
	Modulo,
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	And,
	Or,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
	Not,
	Minus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Literal(Value),
	Column {
		qualifier: Option<String>,
		name: String,
	},
	/// A `?` placeholder, numbered from zero in order of appearance.
	Parameter(usize),
	Binary {
		op: BinaryOperator,
		left: Box<Expr>,
		right: Box<Expr>,
	},
	Unary {
		op: UnaryOperator,
		expr: Box<Expr>,
	},
	IsNull {
		expr: Box<Expr>,
		negated: bool,
	},
	InList {
		expr: Box<Expr>,
		list: Vec<Expr>,
		negated: bool,
	},
	InSubquery {
		expr: Box<Expr>,
		query: Box<Query>,
		negated: bool,
	},
	Exists {
		query: Box<Query>,
		negated: bool,
	},
}

impl Expr {
	pub fn column(name: impl Into<String>) -> Self {
		Expr::Column {
			qualifier: None,
			name: name.into(),
		}
	}

	pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
		Expr::Column {
			qualifier: Some(qualifier.into()),
			name: name.into(),
		}
	}

	pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
		Expr::Binary {
			op,
			left: Box::new(left),
			right: Box::new(right),
		}
	}
}
