// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{PlanNode, PlanRef};

/// Renders a plan as an indented tree, one node per line.
pub fn explain(plan: &PlanRef) -> String {
	let mut output = String::new();
	render(plan, "", true, &mut output);
	output
}

fn render(plan: &PlanNode, prefix: &str, is_last: bool, output: &mut String) {
	let branch = if is_last {
		"└──"
	} else {
		"├──"
	};
	let child_prefix = format!(
		"{}{}",
		prefix,
		if is_last {
			"    "
		} else {
			"│   "
		}
	);

	output.push_str(&format!("{}{} {}\n", prefix, branch, describe(plan)));

	let inputs = plan.inputs();
	for (i, input) in inputs.iter().enumerate() {
		render(input, &child_prefix, i == inputs.len() - 1, output);
	}
}

fn describe(plan: &PlanNode) -> String {
	match plan {
		PlanNode::Scan(node) => format!("Scan {} ({})", node.name, node.source),
		PlanNode::Values(node) => format!("Values rows={} {}", node.rows.len(), node.shape),
		PlanNode::Filter(node) => format!("Filter {}", node.condition),
		PlanNode::Project(node) => format!(
			"Project {}",
			node.expressions
				.iter()
				.zip(&node.names)
				.map(|(e, name)| format!("{} AS {}", e, name))
				.collect::<Vec<_>>()
				.join(", ")
		),
		PlanNode::Join(node) => match &node.condition {
			Some(condition) => format!("Join {} ON {}", node.kind, condition),
			None => format!("Join {}", node.kind),
		},
		PlanNode::Correlate(node) => format!("Correlate {} $cor{}", node.kind, node.correlation),
		PlanNode::Aggregate(node) => format!("Aggregate count(*) AS {}", node.name),
		PlanNode::SetOperation(node) => format!("{} all={}", node.kind, node.all),
		PlanNode::TriggerExecution(node) => format!("TriggerExecution all={}", node.all),
		PlanNode::TableModify(node) => {
			if node.updated_columns.is_empty() {
				format!("TableModify {} {}", node.operation, node.name)
			} else {
				format!(
					"TableModify {} {} SET {}",
					node.operation,
					node.name,
					node.updated_columns
						.iter()
						.zip(&node.source_expressions)
						.map(|(c, e)| format!("{} = {}", c, e))
						.collect::<Vec<_>>()
						.join(", ")
				)
			}
		}
		PlanNode::ChangeDataCapture(node) => format!(
			"ChangeDataCapture {} {} tx={} stmt={} partitions={:?}",
			node.operation,
			node.target,
			node.transaction,
			node.statement,
			node.accessed_partitions.iter().map(|p| p.0).collect::<Vec<_>>()
		),
	}
}

#[cfg(test)]
mod tests {
	use polystore_core::TableId;
	use polystore_type::Type;

	use super::*;
	use crate::{Expression, FilterNode, RowShape, ScanNode, SetOperationKind, SetOperationNode, Source};

	#[test]
	fn test_explain_tree() {
		let scan = PlanNode::Scan(ScanNode {
			source: Source::Table(TableId(1)),
			name: "users".to_string(),
			shape: RowShape::single("id", Type::Int8),
			partitions: vec![],
		})
		.into_ref();
		let filter = PlanNode::Filter(FilterNode {
			input: scan.clone(),
			condition: Expression::eq(Expression::Column(0), Expression::constant(1)),
		})
		.into_ref();
		let plan = PlanNode::SetOperation(SetOperationNode {
			kind: SetOperationKind::Union,
			inputs: vec![filter, scan],
			all: false,
		})
		.into_ref();

		assert_eq!(
			explain(&plan),
			"└── Union all=false\n    ├── Filter (#0 = 1)\n    │   └── Scan users (table:1)\n    └── Scan users (table:1)\n"
		);
	}
}
