// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use polystore_core::{PartitionId, StatementId, TableId, TransactionId};
use polystore_plan::{
	AggregateNode, ChangeDataCaptureNode, Expression, FilterNode, ModifyOperation, PlanNode, PlanRef, RowShape,
	SetOperationKind, SetOperationNode, Source, TRIGGER_EXECUTION_ROW_ESTIMATE, TableModifyNode,
	TriggerExecutionNode, ValuesNode,
};
use polystore_type::{Type, Value};

fn values(n: i32) -> PlanRef {
	PlanNode::Values(ValuesNode {
		rows: vec![vec![Expression::constant(n)]],
		shape: RowShape::single("x", Type::Int4),
	})
	.into_ref()
}

fn update() -> PlanRef {
	PlanNode::TableModify(TableModifyNode {
		input: values(1),
		target: Source::Table(TableId(5)),
		name: "users".to_string(),
		operation: ModifyOperation::Update,
		updated_columns: vec!["x".to_string()],
		source_expressions: vec![Expression::constant(2)],
		fields: vec!["x".to_string()],
		partitions: vec![PartitionId(1), PartitionId(2)],
	})
	.into_ref()
}

#[test]
fn test_copy_preserves_attributes() {
	let original = PlanNode::SetOperation(SetOperationNode {
		kind: SetOperationKind::Minus,
		inputs: vec![values(1), values(2)],
		all: true,
	});
	let replacement = vec![values(3), values(4), values(5)];
	let copy = original.copy(replacement.clone());

	let PlanNode::SetOperation(copied) = &copy else {
		panic!("variant changed");
	};
	assert_eq!(copied.kind, SetOperationKind::Minus);
	assert!(copied.all);
	assert_eq!(copied.inputs.len(), 3);
	assert!(copied.inputs.iter().zip(&replacement).all(|(a, b)| Arc::ptr_eq(a, b)));

	// the original is untouched
	let PlanNode::SetOperation(original) = &original else {
		unreachable!()
	};
	assert_eq!(original.inputs.len(), 2);
}

#[test]
fn test_copy_of_cdc_keeps_payload() {
	let cdc = PlanNode::ChangeDataCapture(ChangeDataCaptureNode::create(
		vec![update()],
		vec![],
		[],
		TransactionId(3),
		StatementId(4),
	));
	let copy = cdc.copy(vec![update()]);
	let (PlanNode::ChangeDataCapture(a), PlanNode::ChangeDataCapture(b)) = (&cdc, &copy) else {
		panic!("variant changed");
	};
	assert_eq!(a.operation(), b.operation());
	assert_eq!(a.updated_columns(), b.updated_columns());
	assert_eq!(a.source_expressions(), b.source_expressions());
	assert_eq!(a.accessed_partitions(), b.accessed_partitions());
	assert_eq!(b.transaction(), TransactionId(3));
	assert_eq!(b.statement(), StatementId(4));
	assert!(!Arc::ptr_eq(a.input(), b.input()));
}

#[test]
fn test_replace_input_on_single_input_node() {
	let filter = PlanNode::Filter(FilterNode {
		input: values(1),
		condition: Expression::constant(true),
	});
	let replacement = values(9);
	let replaced = filter.replace_input(0, replacement.clone());
	assert!(Arc::ptr_eq(replaced.inputs()[0], &replacement));
}

#[test]
#[should_panic(expected = "cannot replace input 1")]
fn test_replace_input_wrong_ordinal_panics() {
	let aggregate = PlanNode::Aggregate(AggregateNode {
		input: values(1),
		name: "count".to_string(),
	});
	aggregate.replace_input(1, values(2));
}

#[test]
#[should_panic(expected = "cannot replace input 1")]
fn test_replace_input_on_cdc_wrong_ordinal_panics() {
	let cdc =
		PlanNode::ChangeDataCapture(ChangeDataCaptureNode::create(vec![update()], vec![], [], TransactionId(1), StatementId(1)));
	cdc.replace_input(1, update());
}

#[test]
#[should_panic(expected = "takes exactly one input")]
fn test_copy_with_wrong_arity_panics() {
	let filter = PlanNode::Filter(FilterNode {
		input: values(1),
		condition: Expression::constant(true),
	});
	filter.copy(vec![values(1), values(2)]);
}

#[test]
fn test_trigger_execution_estimate_is_constant() {
	let small = PlanNode::TriggerExecution(TriggerExecutionNode {
		inputs: vec![values(1)],
		all: true,
	});
	let large = PlanNode::TriggerExecution(TriggerExecutionNode {
		inputs: (0..100).map(values).collect(),
		all: true,
	});
	assert_eq!(small.estimate_row_count(), TRIGGER_EXECUTION_ROW_ESTIMATE);
	assert_eq!(large.estimate_row_count(), TRIGGER_EXECUTION_ROW_ESTIMATE);
}

#[test]
fn test_set_operation_shape_follows_first_input() {
	let union = PlanNode::SetOperation(SetOperationNode {
		kind: SetOperationKind::Union,
		inputs: vec![values(1), values(2)],
		all: false,
	});
	assert_eq!(union.row_shape(), RowShape::single("x", Type::Int4));
	assert_eq!(union.estimate_row_count(), 1.0);
}

#[test]
fn test_cdc_shape_and_accessors() {
	let cdc = ChangeDataCaptureNode::create(vec![update()], vec![], [PartitionId(2)], TransactionId(1), StatementId(1));
	assert_eq!(cdc.accessed_partitions().len(), 2);
	assert_eq!(cdc.source_expressions(), [Expression::Constant(Value::Int4(2))]);
	assert_eq!(PlanNode::ChangeDataCapture(cdc).row_shape(), RowShape::single("rowcount", Type::Int8));
}
