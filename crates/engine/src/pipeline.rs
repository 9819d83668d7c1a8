// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use polystore_core::{LockGuard, StatementId, TransactionId};
use polystore_plan::{ChangeDataCaptureNode, PlanNode, PlanRef, RowShape, transform_up};
use polystore_type::Value;
use tracing::{debug, instrument, warn};

use crate::{
	Environment, Error, ExecutionResult, Executor, Language, NoopExecutor, Result,
	processor::{MqlProcessor, QueryParameters, QueryProcessor, SqlProcessor},
};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
	/// `sql` or `mql`, case insensitive.
	pub language: String,
	pub text: String,
	/// Falls back to the configured default namespace.
	pub namespace: Option<String>,
	pub params: Vec<Value>,
}

impl QueryRequest {
	pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			language: language.into(),
			text: text.into(),
			namespace: None,
			params: Vec::new(),
		}
	}

	pub fn sql(text: impl Into<String>) -> Self {
		Self::new("sql", text)
	}

	pub fn mql(text: impl Into<String>) -> Self {
		Self::new("mql", text)
	}

	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn with_params(mut self, params: Vec<Value>) -> Self {
		self.params = params;
		self
	}
}

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
	pub plan: PlanRef,
	pub row_shape: RowShape,
	/// The transaction the plan ran in. After an implicit collection was
	/// created this is the second transaction of the request.
	pub transaction: TransactionId,
	pub statement: StatementId,
	pub result: ExecutionResult,
	/// The namespace selected by the statement, if it selected one.
	pub namespace: Option<String>,
}

/// Drives one request through its processor and the executor.
pub struct Pipeline {
	environment: Environment,
	executor: Arc<dyn Executor>,
	sql: SqlProcessor,
	mql: MqlProcessor,
}

impl Pipeline {
	pub fn new(environment: Environment) -> Self {
		let sql = SqlProcessor::from_config(environment.config());
		let mql = MqlProcessor::from_config(environment.config());
		Self {
			environment,
			executor: Arc::new(NoopExecutor),
			sql,
			mql,
		}
	}

	pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
		self.executor = executor;
		self
	}

	pub fn environment(&self) -> &Environment {
		&self.environment
	}

	#[instrument(name = "engine::pipeline::execute", level = "debug", skip_all, fields(language = %request.language))]
	pub fn execute(&self, request: QueryRequest) -> Result<ExecutionOutcome> {
		let language: Language = request.language.parse()?;
		let params = QueryParameters {
			namespace: request.namespace.unwrap_or_else(|| self.environment.config().default_namespace.clone()),
			values: request.params,
		};
		match language {
			Language::Sql => self.execute_with(&self.sql, &request.text, &params),
			Language::Mql => self.execute_with(&self.mql, &request.text, &params),
		}
	}

	/// Drives `text` through `processor`. The statement lock is released on
	/// every path out of this call.
	pub fn execute_with<P: QueryProcessor>(
		&self,
		processor: &P,
		text: &str,
		params: &QueryParameters,
	) -> Result<ExecutionOutcome> {
		let config = self.environment.config();
		let statement = processor.parse(text)?;
		debug!(language = %processor.language(), ?statement, "statement parsed");

		// the snapshot is captured only once the lock is held
		let transactions = self.environment.transactions();
		let owner = transactions.allocate_id();
		let lock = HeldLock::acquire(&self.environment, processor, owner)?;
		let mut transaction = transactions.begin_with_id(owner);

		if config.implicit_collections && processor.needs_implicit_schema(&statement, &transaction, params) {
			processor.auto_generate_schema(&statement, &mut transaction, params)?;
			transaction = transactions.begin();
			debug!(transaction = %transaction.id(), "continuing after implicit schema");
		}

		if config.validate {
			match processor.validate(&statement, &transaction, params) {
				Ok(()) => {}
				Err(Error::Unsupported {
					operation,
					language,
				}) => debug!(operation, %language, "validation skipped"),
				Err(err) => return Err(err),
			}
		}

		let statement_id = transaction.next_statement()?;
		let translation = processor.translate(&statement, &mut transaction, params)?;
		let plan = capture_changes(&translation.plan, transaction.id(), statement_id);

		let result = self.executor.execute(&plan, &translation.row_shape, transaction.id())?;
		transaction.commit()?;
		drop(lock);

		Ok(ExecutionOutcome {
			plan,
			row_shape: translation.row_shape,
			transaction: transaction.id(),
			statement: statement_id,
			result,
			namespace: translation.namespace,
		})
	}
}

/// Wraps every table modification in a change data capture node.
fn capture_changes(plan: &PlanRef, transaction: TransactionId, statement: StatementId) -> PlanRef {
	transform_up(plan, &mut |node| match node.as_ref() {
		PlanNode::TableModify(_) => Some(
			PlanNode::ChangeDataCapture(ChangeDataCaptureNode::create(
				vec![node.clone()],
				vec![],
				std::iter::empty(),
				transaction,
				statement,
			))
			.into_ref(),
		),
		_ => None,
	})
}

/// The statement lock, registered with the environment for as long as it is
/// held.
struct HeldLock<'a> {
	environment: &'a Environment,
	transaction: TransactionId,
	_guard: LockGuard<'a>,
}

impl<'a> HeldLock<'a> {
	fn acquire<P: QueryProcessor>(
		environment: &'a Environment,
		processor: &P,
		transaction: TransactionId,
	) -> Result<HeldLock<'a>> {
		let guard = match processor.lock(environment.lock_manager(), transaction) {
			Ok(guard) => guard,
			Err(err) => {
				if err.is_retryable() {
					warn!(transaction = %transaction, "statement chosen as deadlock victim");
				}
				return Err(err);
			}
		};
		environment.register_lock_owner(transaction);
		Ok(HeldLock {
			environment,
			transaction,
			_guard: guard,
		})
	}
}

impl Drop for HeldLock<'_> {
	fn drop(&mut self) {
		// deregister before the guard field unlocks
		self.environment.release_lock_owner(self.transaction);
	}
}
