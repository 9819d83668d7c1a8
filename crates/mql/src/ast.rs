// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use polystore_type::Value;

/// A document as written in the statement.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// `use <namespace>`
	Use(String),
	/// `db.createCollection("<name>")`
	CreateCollection(String),
	Find {
		collection: String,
		filter: Filter,
		projection: Option<Projection>,
	},
	Count {
		collection: String,
		filter: Filter,
	},
	/// `insertOne` holds a single document.
	Insert {
		collection: String,
		documents: Vec<Document>,
	},
	Update {
		collection: String,
		filter: Filter,
		set: Document,
	},
	Delete {
		collection: String,
		filter: Filter,
	},
}

impl Statement {
	/// The collection a statement reads, writes or creates.
	pub fn collection(&self) -> Option<&str> {
		match self {
			Statement::Use(_) => None,
			Statement::CreateCollection(name) => Some(name),
			Statement::Find {
				collection,
				..
			}
			| Statement::Count {
				collection,
				..
			}
			| Statement::Insert {
				collection,
				..
			}
			| Statement::Update {
				collection,
				..
			}
			| Statement::Delete {
				collection,
				..
			} => Some(collection),
		}
	}

	pub fn is_insert(&self) -> bool {
		matches!(self, Statement::Insert { .. })
	}

	pub fn is_mutation(&self) -> bool {
		matches!(self, Statement::Insert { .. } | Statement::Update { .. } | Statement::Delete { .. })
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Gt,
	Gte,
	Lt,
	Lte,
}

impl CompareOp {
	pub fn from_operator(name: &str) -> Option<CompareOp> {
		let op = match name {
			"$eq" => CompareOp::Eq,
			"$ne" => CompareOp::Ne,
			"$gt" => CompareOp::Gt,
			"$gte" => CompareOp::Gte,
			"$lt" => CompareOp::Lt,
			"$lte" => CompareOp::Lte,
			_ => return None,
		};
		Some(op)
	}
}

impl Display for CompareOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			CompareOp::Eq => f.write_str("$eq"),
			CompareOp::Ne => f.write_str("$ne"),
			CompareOp::Gt => f.write_str("$gt"),
			CompareOp::Gte => f.write_str("$gte"),
			CompareOp::Lt => f.write_str("$lt"),
			CompareOp::Lte => f.write_str("$lte"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
	/// The empty filter `{}`.
	All,
	Compare {
		/// Dotted path into the document.
		path: String,
		op: CompareOp,
		value: Value,
	},
	And(Vec<Filter>),
	Or(Vec<Filter>),
}

/// Fields kept by `find`, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
	pub include: Vec<String>,
	pub exclude_id: bool,
}
