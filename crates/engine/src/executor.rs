// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_core::TransactionId;
use polystore_plan::{PlanRef, RowShape};
use tracing::trace;

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
	pub row_count: u64,
}

/// Runs finished plans. Physical execution lives behind this boundary.
pub trait Executor: Send + Sync {
	fn execute(&self, plan: &PlanRef, row_shape: &RowShape, transaction: TransactionId) -> Result<ExecutionResult>;
}

/// Accepts every plan and reports no rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExecutor;

impl Executor for NoopExecutor {
	fn execute(&self, plan: &PlanRef, _row_shape: &RowShape, transaction: TransactionId) -> Result<ExecutionResult> {
		trace!(transaction = %transaction, root = plan.name(), "plan discarded");
		Ok(ExecutionResult::default())
	}
}
