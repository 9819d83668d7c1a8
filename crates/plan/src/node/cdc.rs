// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeSet;

use polystore_core::{PartitionId, StatementId, TransactionId};
use tracing::trace;

use super::{ChangeDataCaptureNode, ModifyOperation, PlanNode, PlanRef, Source};
use crate::Expression;

impl ChangeDataCaptureNode {
	/// Wraps a mutation subplan.
	///
	/// `partitions` are added to the partitions the mutation itself targets,
	/// so the accessed set always covers the wrapped mutation.
	///
	/// # Panics
	///
	/// If `mutations` does not hold exactly one [`PlanNode::TableModify`].
	/// Capturing several mutation targets in one node is not supported.
	pub fn create(
		mutations: Vec<PlanRef>,
		fields: Vec<String>,
		partitions: impl IntoIterator<Item = PartitionId>,
		transaction: TransactionId,
		statement: StatementId,
	) -> ChangeDataCaptureNode {
		if mutations.len() > 1 {
			unimplemented!("change data capture over {} mutation targets", mutations.len());
		}
		let Some(input) = mutations.into_iter().next() else {
			panic!("change data capture requires a mutation");
		};

		let PlanNode::TableModify(modify) = input.as_ref() else {
			panic!("change data capture must wrap a table modification, got {}", input.name());
		};

		let mut accessed_partitions: BTreeSet<PartitionId> = modify.partitions.iter().copied().collect();
		accessed_partitions.extend(partitions);

		let fields = if fields.is_empty() {
			modify.fields.clone()
		} else {
			fields
		};

		trace!(target = %modify.target, operation = %modify.operation, "change data capture");
		ChangeDataCaptureNode {
			operation: modify.operation,
			target: modify.target,
			updated_columns: modify.updated_columns.clone(),
			source_expressions: modify.source_expressions.clone(),
			fields,
			accessed_partitions,
			transaction,
			statement,
			input,
		}
	}

	pub fn input(&self) -> &PlanRef {
		&self.input
	}

	pub fn operation(&self) -> ModifyOperation {
		self.operation
	}

	pub fn table(&self) -> Source {
		self.target
	}

	pub fn updated_columns(&self) -> &[String] {
		&self.updated_columns
	}

	pub fn source_expressions(&self) -> &[Expression] {
		&self.source_expressions
	}

	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	pub fn accessed_partitions(&self) -> &BTreeSet<PartitionId> {
		&self.accessed_partitions
	}

	pub fn transaction(&self) -> TransactionId {
		self.transaction
	}

	pub fn statement(&self) -> StatementId {
		self.statement
	}
}

#[cfg(test)]
mod tests {
	use polystore_core::TableId;
	use polystore_type::Type;

	use super::*;
	use crate::{RowShape, TableModifyNode, ValuesNode};

	fn insert() -> PlanRef {
		PlanNode::TableModify(TableModifyNode {
			input: PlanNode::Values(ValuesNode {
				rows: vec![vec![Expression::constant(1)]],
				shape: RowShape::single("id", Type::Int4),
			})
			.into_ref(),
			target: Source::Table(TableId(7)),
			name: "users".to_string(),
			operation: ModifyOperation::Insert,
			updated_columns: vec![],
			source_expressions: vec![],
			fields: vec!["id".to_string()],
			partitions: vec![PartitionId(3)],
		})
		.into_ref()
	}

	#[test]
	fn test_create_from_single_mutation() {
		let cdc = ChangeDataCaptureNode::create(
			vec![insert()],
			vec![],
			[PartitionId(4)],
			TransactionId(1),
			StatementId(2),
		);
		assert_eq!(cdc.operation(), ModifyOperation::Insert);
		assert_eq!(cdc.table(), Source::Table(TableId(7)));
		assert_eq!(cdc.fields(), ["id".to_string()]);
		assert_eq!(cdc.accessed_partitions(), &BTreeSet::from([PartitionId(3), PartitionId(4)]));
		assert_eq!(cdc.transaction(), TransactionId(1));
		assert_eq!(cdc.statement(), StatementId(2));
		assert_eq!(PlanNode::ChangeDataCapture(cdc).inputs().len(), 1);
	}

	#[test]
	#[should_panic(expected = "not implemented")]
	fn test_multiple_mutations_fail_loudly() {
		ChangeDataCaptureNode::create(vec![insert(), insert()], vec![], [], TransactionId(1), StatementId(1));
	}

	#[test]
	#[should_panic(expected = "must wrap a table modification")]
	fn test_non_mutation_rejected() {
		let values = PlanNode::Values(ValuesNode {
			rows: vec![],
			shape: RowShape::default(),
		})
		.into_ref();
		ChangeDataCaptureNode::create(vec![values], vec![], [], TransactionId(1), StatementId(1));
	}
}
