// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The per-language half of the pipeline.
//!
//! Every supported language implements [`QueryProcessor`]. The pipeline calls
//! the stages in a fixed order: `parse`, `lock`, `needs_implicit_schema` /
//! `auto_generate_schema`, `validate` and `translate`.

mod mql;
mod sql;

use std::fmt::Debug;

pub use mql::MqlProcessor;
use polystore_catalog::{CatalogSnapshot, CollectionDef, NamespaceDef, Pattern};
use polystore_core::{LockGuard, LockManager, LockRequest, ResourceId, TransactionId, lock_scoped};
use polystore_plan::{PlanNode, PlanRef, RowShape, ValuesNode};
use polystore_transaction::Transaction;
use polystore_type::Value;
pub use sql::SqlProcessor;
use tracing::debug;

use crate::{Error, Language, Result, SchemaGenerationError};

/// Request scoped inputs of the translation stages.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
	/// Resolves names that carry no namespace.
	pub namespace: String,
	/// Positional values for `?` placeholders.
	pub values: Vec<Value>,
}

impl QueryParameters {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			values: Vec::new(),
		}
	}

	pub fn with_values(mut self, values: Vec<Value>) -> Self {
		self.values = values;
		self
	}
}

/// The output of [`QueryProcessor::translate`].
#[derive(Debug, Clone)]
pub struct Translation {
	pub plan: PlanRef,
	pub row_shape: RowShape,
	/// Set when the statement switched the session namespace.
	pub namespace: Option<String>,
}

impl Translation {
	pub fn new(plan: PlanRef) -> Self {
		let row_shape = plan.row_shape();
		Self {
			plan,
			row_shape,
			namespace: None,
		}
	}
}

pub trait QueryProcessor {
	type Statement: Debug;

	fn language(&self) -> Language;

	/// Parses exactly one statement without touching shared state.
	fn parse(&self, text: &str) -> Result<Self::Statement>;

	/// The global resource every statement of this language holds while it
	/// compiles and executes.
	fn lock_resource(&self) -> &ResourceId;

	/// Takes [`lock_resource`](Self::lock_resource) exclusively. The lock is
	/// released when the returned guard is dropped.
	fn lock<'a>(&self, manager: &'a dyn LockManager, transaction: TransactionId) -> Result<LockGuard<'a>> {
		let guard = lock_scoped(manager, &[LockRequest::exclusive(self.lock_resource().clone())], transaction)?;
		Ok(guard)
	}

	fn unlock(&self, guard: LockGuard<'_>) {
		drop(guard);
	}

	/// Whether the statement addresses an object missing from the snapshot of
	/// `transaction`.
	fn needs_implicit_schema(
		&self,
		statement: &Self::Statement,
		transaction: &Transaction,
		params: &QueryParameters,
	) -> bool;

	/// Creates the object [`needs_implicit_schema`](Self::needs_implicit_schema)
	/// found missing and commits `transaction`.
	///
	/// Languages without implicit objects commit and fail with
	/// [`SchemaGenerationError::NoTarget`].
	fn auto_generate_schema(
		&self,
		statement: &Self::Statement,
		transaction: &mut Transaction,
		params: &QueryParameters,
	) -> Result<()> {
		let _ = (statement, params);
		commit_implicit(transaction)?;
		Err(SchemaGenerationError::NoTarget.into())
	}

	/// Static checks of the statement against the snapshot. Schemaless
	/// languages fail with [`Error::Unsupported`].
	fn validate(&self, statement: &Self::Statement, transaction: &Transaction, params: &QueryParameters)
	-> Result<()>;

	/// Converts the statement into a decorrelated plan. DDL is buffered in
	/// `transaction`.
	fn translate(
		&self,
		statement: &Self::Statement,
		transaction: &mut Transaction,
		params: &QueryParameters,
	) -> Result<Translation>;
}

pub(crate) fn commit_implicit(transaction: &mut Transaction) -> Result<()> {
	match transaction.commit() {
		Ok(version) => {
			debug!(transaction = %transaction.id(), version, "implicit schema committed");
			Ok(())
		}
		Err(source) => Err(SchemaGenerationError::CommitFailed {
			source,
		}
		.into()),
	}
}

pub(crate) fn resolve_namespace(snapshot: &CatalogSnapshot, name: &str) -> Result<NamespaceDef> {
	snapshot
		.lookup_namespaces(&Pattern::exact(name))
		.into_iter()
		.next()
		.ok_or_else(|| Error::not_found("namespace", name))
}

/// Collection names compare with the case sensitivity of their namespace.
pub(crate) fn find_collection(
	snapshot: &CatalogSnapshot,
	namespace: &NamespaceDef,
	name: &str,
) -> Option<CollectionDef> {
	let pattern = Pattern::exact(name).with_case_sensitive(namespace.case_sensitive);
	snapshot.get_collections(namespace.id).into_iter().find(|c| pattern.matches(&c.name))
}

/// The plan of statements that only change the catalog.
pub(crate) fn empty_plan() -> PlanRef {
	PlanNode::Values(ValuesNode {
		rows: vec![],
		shape: RowShape::default(),
	})
	.into_ref()
}
