// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod cdc;
mod estimate;
mod input;
mod key;
mod shape;

use std::{
	collections::BTreeSet,
	fmt::{Display, Formatter},
	sync::Arc,
};

pub use estimate::TRIGGER_EXECUTION_ROW_ESTIMATE;
pub use key::KEY_TERMINATOR;
use polystore_core::{CollectionId, CorrelationId, PartitionId, StatementId, TableId, TransactionId};

use crate::{Expression, RowShape};

pub type PlanRef = Arc<PlanNode>;

#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
	Scan(ScanNode),
	Values(ValuesNode),
	Filter(FilterNode),
	Project(ProjectNode),
	Join(JoinNode),
	Correlate(CorrelateNode),
	Aggregate(AggregateNode),
	SetOperation(SetOperationNode),
	TriggerExecution(TriggerExecutionNode),
	TableModify(TableModifyNode),
	ChangeDataCapture(ChangeDataCaptureNode),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
	Table(TableId),
	Collection(CollectionId),
}

impl Display for Source {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Source::Table(id) => write!(f, "table:{}", id),
			Source::Collection(id) => write!(f, "collection:{}", id),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanNode {
	pub source: Source,
	pub name: String,
	pub shape: RowShape,
	pub partitions: Vec<PartitionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuesNode {
	pub rows: Vec<Vec<Expression>>,
	pub shape: RowShape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
	pub input: PlanRef,
	pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectNode {
	pub input: PlanRef,
	pub expressions: Vec<Expression>,
	pub names: Vec<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum JoinKind {
	Inner,
	Left,
	/// Left rows with at least one match, each emitted once.
	Semi,
	/// Left rows without any match.
	Anti,
}

impl JoinKind {
	/// Whether right-side columns appear in the output row.
	pub fn projects_right(&self) -> bool {
		matches!(self, JoinKind::Inner | JoinKind::Left)
	}
}

impl Display for JoinKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			JoinKind::Inner => f.write_str("Inner"),
			JoinKind::Left => f.write_str("Left"),
			JoinKind::Semi => f.write_str("Semi"),
			JoinKind::Anti => f.write_str("Anti"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
	pub left: PlanRef,
	pub right: PlanRef,
	pub kind: JoinKind,
	/// Over the concatenated left and right row, `None` joins every pair.
	pub condition: Option<Expression>,
}

/// A dependent join: `right` is evaluated once per row of `left`, reading that
/// row through [`Expression::Correlated`] references carrying `correlation`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelateNode {
	pub left: PlanRef,
	pub right: PlanRef,
	pub correlation: CorrelationId,
	pub kind: JoinKind,
}

/// `count(*)` over the input.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateNode {
	pub input: PlanRef,
	pub name: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SetOperationKind {
	Union,
	Intersect,
	Minus,
}

impl Display for SetOperationKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SetOperationKind::Union => f.write_str("Union"),
			SetOperationKind::Intersect => f.write_str("Intersect"),
			SetOperationKind::Minus => f.write_str("Minus"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetOperationNode {
	pub kind: SetOperationKind,
	pub inputs: Vec<PlanRef>,
	/// Keep duplicates when true.
	pub all: bool,
}

/// Runs trigger bodies whose plans are not expanded yet. Shaped like a union
/// of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerExecutionNode {
	pub inputs: Vec<PlanRef>,
	pub all: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModifyOperation {
	Insert,
	Update,
	Delete,
	Merge,
}

impl Display for ModifyOperation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ModifyOperation::Insert => f.write_str("Insert"),
			ModifyOperation::Update => f.write_str("Update"),
			ModifyOperation::Delete => f.write_str("Delete"),
			ModifyOperation::Merge => f.write_str("Merge"),
		}
	}
}

/// Writes the rows produced by `input` to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModifyNode {
	pub input: PlanRef,
	pub target: Source,
	pub name: String,
	pub operation: ModifyOperation,
	/// Columns assigned by an update, parallel to `source_expressions`.
	pub updated_columns: Vec<String>,
	pub source_expressions: Vec<Expression>,
	/// Every field of the target before the mutation.
	pub fields: Vec<String>,
	pub partitions: Vec<PartitionId>,
}

/// Records exactly what the wrapped mutation changed, for replication and
/// trigger dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeDataCaptureNode {
	pub(crate) input: PlanRef,
	pub(crate) operation: ModifyOperation,
	pub(crate) target: Source,
	pub(crate) updated_columns: Vec<String>,
	pub(crate) source_expressions: Vec<Expression>,
	pub(crate) fields: Vec<String>,
	pub(crate) accessed_partitions: BTreeSet<PartitionId>,
	pub(crate) transaction: TransactionId,
	pub(crate) statement: StatementId,
}

impl PlanNode {
	pub fn name(&self) -> &'static str {
		match self {
			PlanNode::Scan(_) => "Scan",
			PlanNode::Values(_) => "Values",
			PlanNode::Filter(_) => "Filter",
			PlanNode::Project(_) => "Project",
			PlanNode::Join(_) => "Join",
			PlanNode::Correlate(_) => "Correlate",
			PlanNode::Aggregate(_) => "Aggregate",
			PlanNode::SetOperation(node) => match node.kind {
				SetOperationKind::Union => "Union",
				SetOperationKind::Intersect => "Intersect",
				SetOperationKind::Minus => "Minus",
			},
			PlanNode::TriggerExecution(_) => "TriggerExecution",
			PlanNode::TableModify(_) => "TableModify",
			PlanNode::ChangeDataCapture(_) => "ChangeDataCapture",
		}
	}

	pub fn into_ref(self) -> PlanRef {
		Arc::new(self)
	}
}
