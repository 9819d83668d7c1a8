// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The language-neutral logical plan.
//!
//! Plan nodes are immutable and shared through [`PlanRef`]. Rewrites build new
//! nodes with [`transform_up`] and keep unchanged subtrees shared.

mod decorrelate;
mod error;
mod explain;
mod expression;
mod node;
mod rewrite;
mod shape;

pub use decorrelate::decorrelate;
pub use error::{PlanError, Result};
pub use explain::explain;
pub use expression::{BinaryOp, Expression, conjunction, conjuncts};
pub use node::{
	AggregateNode, ChangeDataCaptureNode, CorrelateNode, FilterNode, JoinKind, JoinNode, KEY_TERMINATOR,
	ModifyOperation, PlanNode, PlanRef, ProjectNode, ScanNode, SetOperationKind, SetOperationNode, Source,
	TRIGGER_EXECUTION_ROW_ESTIMATE, TableModifyNode, TriggerExecutionNode, ValuesNode,
};
pub use rewrite::transform_up;
pub use shape::{Field, RowShape};
