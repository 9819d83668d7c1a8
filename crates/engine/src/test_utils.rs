// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::Mutex;
use polystore_catalog::NamespaceKind;
use polystore_core::TransactionId;
use polystore_plan::{PlanRef, RowShape};
use polystore_transaction::{CollectionToCreate, ColumnToCreate, NamespaceToCreate, TableToCreate};
use polystore_type::Type;

use crate::{EngineConfig, Environment, Error, ExecutionResult, Executor, Result};

/// An environment with a seeded catalog:
///
/// - `public` (relational): `users(id int4 not null, name utf8, age int4)`
///   and `orders(id int4 not null, user_id int4 not null, total decimal)`
/// - `docs` (document): collection `people`
pub fn test_environment() -> Environment {
	test_environment_with(EngineConfig::default())
}

pub fn test_environment_with(config: EngineConfig) -> Environment {
	let environment = Environment::builder().with_config(config).build();

	let mut tx = environment.transactions().begin();
	let public = tx
		.create_namespace(NamespaceToCreate {
			name: "public".to_string(),
			kind: NamespaceKind::Relational,
			case_sensitive: false,
		})
		.unwrap();
	let docs = tx
		.create_namespace(NamespaceToCreate {
			name: "docs".to_string(),
			kind: NamespaceKind::Document,
			case_sensitive: true,
		})
		.unwrap();
	tx.commit().unwrap();

	let mut tx = environment.transactions().begin();
	tx.create_table(TableToCreate {
		namespace: public.id,
		name: "users".to_string(),
		columns: vec![column("id", Type::Int4, false), column("name", Type::Utf8, true), column("age", Type::Int4, true)],
	})
	.unwrap();
	tx.create_table(TableToCreate {
		namespace: public.id,
		name: "orders".to_string(),
		columns: vec![
			column("id", Type::Int4, false),
			column("user_id", Type::Int4, false),
			column("total", Type::Decimal, true),
		],
	})
	.unwrap();
	tx.create_collection(CollectionToCreate {
		namespace: docs.id,
		name: "people".to_string(),
	})
	.unwrap();
	tx.commit().unwrap();

	environment
}

fn column(name: &str, ty: Type, nullable: bool) -> ColumnToCreate {
	ColumnToCreate {
		name: name.to_string(),
		ty,
		nullable,
	}
}

/// Keeps every plan it is handed.
#[derive(Default)]
pub struct RecordingExecutor {
	plans: Mutex<Vec<PlanRef>>,
	row_count: u64,
}

impl RecordingExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_row_count(row_count: u64) -> Self {
		Self {
			plans: Mutex::new(Vec::new()),
			row_count,
		}
	}

	pub fn plans(&self) -> Vec<PlanRef> {
		self.plans.lock().clone()
	}

	pub fn last(&self) -> Option<PlanRef> {
		self.plans.lock().last().cloned()
	}
}

impl Executor for RecordingExecutor {
	fn execute(&self, plan: &PlanRef, _row_shape: &RowShape, _transaction: TransactionId) -> Result<ExecutionResult> {
		self.plans.lock().push(plan.clone());
		Ok(ExecutionResult {
			row_count: self.row_count,
		})
	}
}

/// Fails every plan.
pub struct FailingExecutor;

impl Executor for FailingExecutor {
	fn execute(&self, plan: &PlanRef, _row_shape: &RowShape, _transaction: TransactionId) -> Result<ExecutionResult> {
		Err(Error::Execution(format!("{} rejected", plan.name())))
	}
}
