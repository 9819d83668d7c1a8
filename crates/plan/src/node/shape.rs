// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_type::Type;

use super::PlanNode;
use crate::{Field, RowShape};

impl PlanNode {
	pub fn row_shape(&self) -> RowShape {
		match self {
			PlanNode::Scan(node) => node.shape.clone(),
			PlanNode::Values(node) => node.shape.clone(),
			PlanNode::Filter(node) => node.input.row_shape(),
			PlanNode::Project(node) => {
				let input = node.input.row_shape();
				RowShape::new(
					node.expressions
						.iter()
						.zip(&node.names)
						.map(|(e, name)| Field::new(name.clone(), e.result_type(&input)))
						.collect(),
				)
			}
			PlanNode::Join(node) => join_shape(&node.left.row_shape(), &node.right.row_shape(), node.kind.projects_right()),
			PlanNode::Correlate(node) => {
				join_shape(&node.left.row_shape(), &node.right.row_shape(), node.kind.projects_right())
			}
			PlanNode::Aggregate(node) => RowShape::single(node.name.clone(), Type::Int8),
			PlanNode::SetOperation(node) => {
				node.inputs.first().map(|input| input.row_shape()).unwrap_or_default()
			}
			PlanNode::TriggerExecution(node) => {
				node.inputs.first().map(|input| input.row_shape()).unwrap_or_default()
			}
			PlanNode::TableModify(_) => RowShape::single("rowcount", Type::Int8),
			PlanNode::ChangeDataCapture(node) => node.input.row_shape(),
		}
	}
}

fn join_shape(left: &RowShape, right: &RowShape, projects_right: bool) -> RowShape {
	if projects_right {
		left.concat(right)
	} else {
		left.clone()
	}
}
