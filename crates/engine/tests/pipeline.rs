// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

use polystore_core::{
	LockError, LockManager, LockRequest, ResourceId, TransactionId, WaitForGraphLockManager,
};
use polystore_engine::{
	EngineConfig, Environment, Error, ExecutionResult, Executor, Pipeline, QueryRequest, Result,
	test_utils::{FailingExecutor, RecordingExecutor, test_environment, test_environment_with},
};
use polystore_plan::{JoinKind, ModifyOperation, PlanNode, PlanRef, RowShape};
use polystore_type::Value;

const GLOBAL: &str = "polystore.global";

fn shared_lock_manager(environment: &Environment) -> Arc<WaitForGraphLockManager> {
	let manager = Arc::new(WaitForGraphLockManager::new());
	environment.install_lock_manager(manager.clone()).unwrap();
	manager
}

/// Records whether the global lock was held while the plan executed.
struct LockWitness {
	manager: Arc<WaitForGraphLockManager>,
	held: AtomicBool,
}

impl Executor for LockWitness {
	fn execute(&self, _plan: &PlanRef, _row_shape: &RowShape, _transaction: TransactionId) -> Result<ExecutionResult> {
		self.held.store(self.manager.is_locked(&ResourceId::new(GLOBAL)), Ordering::SeqCst);
		Ok(ExecutionResult::default())
	}
}

/// Reports every request as a deadlock victim.
struct AlwaysDeadlocks;

impl LockManager for AlwaysDeadlocks {
	fn lock(&self, requests: &[LockRequest], transaction: TransactionId) -> polystore_core::lock::Result<()> {
		Err(LockError::Deadlock {
			transaction,
			resources: requests.iter().map(|r| r.resource.clone()).collect(),
		})
	}

	fn unlock(&self, _resources: &[ResourceId], _transaction: TransactionId) {}

	fn unlock_all(&self, _transaction: TransactionId) {}
}

#[test]
fn test_select_with_exists_is_decorrelated() {
	let executor = Arc::new(RecordingExecutor::with_row_count(2));
	let pipeline = Pipeline::new(test_environment()).with_executor(executor.clone());

	let outcome = pipeline
		.execute(QueryRequest::sql(
			"SELECT u.name FROM users u WHERE EXISTS (SELECT * FROM orders o WHERE o.user_id = u.id AND o.id > 10)",
		))
		.unwrap();

	assert_eq!(outcome.result.row_count, 2);
	assert_eq!(outcome.row_shape.names(), vec!["name"]);
	let PlanNode::Project(project) = outcome.plan.as_ref() else {
		panic!("expected project, got {}", outcome.plan.name());
	};
	let PlanNode::Join(join) = project.input.as_ref() else {
		panic!("expected join, got {}", project.input.name());
	};
	assert_eq!(join.kind, JoinKind::Semi);
	// the uncorrelated conjunct stays below the join
	assert!(matches!(join.right.as_ref(), PlanNode::Filter(_)));
	assert_eq!(executor.plans().len(), 1);
}

#[test]
fn test_insert_is_wrapped_in_change_data_capture() {
	let pipeline = Pipeline::new(test_environment());
	let outcome = pipeline
		.execute(QueryRequest::sql("INSERT INTO users (id, name) VALUES (?, ?)").with_params(vec![
			Value::int4(1),
			Value::utf8("ada"),
		]))
		.unwrap();

	let PlanNode::ChangeDataCapture(cdc) = outcome.plan.as_ref() else {
		panic!("expected change data capture, got {}", outcome.plan.name());
	};
	assert_eq!(cdc.operation(), ModifyOperation::Insert);
	assert_eq!(cdc.fields(), ["id", "name", "age"]);
	assert_eq!(cdc.transaction(), outcome.transaction);
	assert_eq!(cdc.statement(), outcome.statement);
	assert!(!cdc.accessed_partitions().is_empty());
	assert!(matches!(cdc.input().as_ref(), PlanNode::TableModify(_)));
}

#[test]
fn test_lock_is_held_during_execution_and_released_after() {
	let environment = test_environment();
	let manager = shared_lock_manager(&environment);
	let witness = Arc::new(LockWitness {
		manager: manager.clone(),
		held: AtomicBool::new(false),
	});
	let pipeline = Pipeline::new(environment).with_executor(witness.clone());

	pipeline.execute(QueryRequest::sql("SELECT * FROM users")).unwrap();

	assert!(witness.held.load(Ordering::SeqCst));
	assert!(!manager.is_locked(&ResourceId::new(GLOBAL)));
	assert!(pipeline.environment().lock_owners().is_empty());
}

#[test]
fn test_lock_is_released_after_failures() {
	let environment = test_environment();
	let manager = shared_lock_manager(&environment);
	let pipeline = Pipeline::new(environment.clone());

	let err = pipeline.execute(QueryRequest::sql("SELECT * FROM missing")).unwrap_err();
	assert!(matches!(err, Error::NotFound { .. }));
	assert!(!manager.is_locked(&ResourceId::new(GLOBAL)));

	let failing = Pipeline::new(environment).with_executor(Arc::new(FailingExecutor));
	let err = failing.execute(QueryRequest::sql("DELETE FROM users")).unwrap_err();
	assert!(matches!(err, Error::Execution(_)));
	assert!(!manager.is_locked(&ResourceId::new(GLOBAL)));
	assert!(failing.environment().lock_owners().is_empty());
}

#[test]
fn test_parse_errors_never_lock() {
	let environment = test_environment();
	let manager = shared_lock_manager(&environment);
	let pipeline = Pipeline::new(environment);

	let err = pipeline.execute(QueryRequest::sql("SELEC * FROM users")).unwrap_err();
	assert!(matches!(err, Error::Parse { .. }));
	assert!(manager.holders(&ResourceId::new(GLOBAL)).is_empty());
}

#[test]
fn test_deadlock_is_retryable() {
	let environment = test_environment();
	environment.install_lock_manager(Arc::new(AlwaysDeadlocks)).unwrap();
	let pipeline = Pipeline::new(environment);

	let err = pipeline.execute(QueryRequest::sql("SELECT * FROM users")).unwrap_err();
	assert!(err.is_retryable());
	assert!(matches!(err, Error::Deadlock { ref resources, .. } if resources == &[ResourceId::new(GLOBAL)]));
	assert!(pipeline.environment().lock_owners().is_empty());
}

#[test]
fn test_unknown_language() {
	let pipeline = Pipeline::new(test_environment());
	let err = pipeline.execute(QueryRequest::new("cypher", "MATCH (n) RETURN n")).unwrap_err();
	assert!(matches!(err, Error::UnknownLanguage(name) if name == "cypher"));
}

#[test]
fn test_mql_validation_is_skipped() {
	let pipeline = Pipeline::new(test_environment());
	let outcome = pipeline
		.execute(QueryRequest::mql(r#"db.people.find({"age": {"$gte": 21}})"#).with_namespace("docs"))
		.unwrap();
	assert!(matches!(outcome.plan.as_ref(), PlanNode::Filter(_)));
}

#[test]
fn test_sql_validation_can_be_disabled() {
	let environment = test_environment_with(EngineConfig::default().with_validate(false));
	let pipeline = Pipeline::new(environment);
	// translation still rejects the statement
	let err = pipeline.execute(QueryRequest::sql("SELECT nope FROM users")).unwrap_err();
	assert!(matches!(err, Error::NotFound { kind: "column", .. }));
}

#[test]
fn test_create_table_is_committed() {
	let pipeline = Pipeline::new(test_environment());
	pipeline.execute(QueryRequest::sql("CREATE TABLE events (id INT NOT NULL, at TIMESTAMP)")).unwrap();

	let outcome = pipeline.execute(QueryRequest::sql("SELECT at FROM events")).unwrap();
	assert_eq!(outcome.row_shape.names(), vec!["at"]);
}

#[test]
fn test_use_returns_namespace() {
	let pipeline = Pipeline::new(test_environment());
	let outcome = pipeline.execute(QueryRequest::mql("use docs")).unwrap();
	assert_eq!(outcome.namespace.as_deref(), Some("docs"));
}

#[test]
fn test_statements_are_serialized() {
	let environment = test_environment();
	let manager = shared_lock_manager(&environment);
	let pipeline = Arc::new(Pipeline::new(environment));

	let handles: Vec<_> = (0..8)
		.map(|i| {
			let pipeline = pipeline.clone();
			std::thread::spawn(move || {
				let text = format!(r#"db.shared.insertOne({{"n": {}}})"#, i);
				pipeline.execute(QueryRequest::mql(text).with_namespace("docs"))
			})
		})
		.collect();

	for handle in handles {
		handle.join().unwrap().unwrap();
	}

	let snapshot = pipeline.environment().catalog().snapshot();
	let docs = snapshot.find_namespace_by_name("docs").unwrap();
	assert_eq!(snapshot.get_collections(docs.id).iter().filter(|c| c.name == "shared").count(), 1);
	assert!(!manager.is_locked(&ResourceId::new(GLOBAL)));
}
