// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{PlanNode, PlanRef};

impl PlanNode {
	pub fn inputs(&self) -> Vec<&PlanRef> {
		match self {
			PlanNode::Scan(_) | PlanNode::Values(_) => vec![],
			PlanNode::Filter(node) => vec![&node.input],
			PlanNode::Project(node) => vec![&node.input],
			PlanNode::Aggregate(node) => vec![&node.input],
			PlanNode::TableModify(node) => vec![&node.input],
			PlanNode::ChangeDataCapture(node) => vec![&node.input],
			PlanNode::Join(node) => vec![&node.left, &node.right],
			PlanNode::Correlate(node) => vec![&node.left, &node.right],
			PlanNode::SetOperation(node) => node.inputs.iter().collect(),
			PlanNode::TriggerExecution(node) => node.inputs.iter().collect(),
		}
	}

	/// A new node with the same attributes as this one over `inputs`.
	///
	/// # Panics
	///
	/// If the number of inputs does not fit the variant.
	pub fn copy(&self, inputs: Vec<PlanRef>) -> PlanNode {
		let mut copy = self.clone();
		match &mut copy {
			PlanNode::Scan(_) | PlanNode::Values(_) => {
				assert!(inputs.is_empty(), "{} takes no inputs, got {}", self.name(), inputs.len());
			}
			PlanNode::Filter(node) => node.input = single(self.name(), inputs),
			PlanNode::Project(node) => node.input = single(self.name(), inputs),
			PlanNode::Aggregate(node) => node.input = single(self.name(), inputs),
			PlanNode::TableModify(node) => node.input = single(self.name(), inputs),
			PlanNode::ChangeDataCapture(node) => node.input = single(self.name(), inputs),
			PlanNode::Join(node) => (node.left, node.right) = pair(self.name(), inputs),
			PlanNode::Correlate(node) => (node.left, node.right) = pair(self.name(), inputs),
			PlanNode::SetOperation(node) => node.inputs = inputs,
			PlanNode::TriggerExecution(node) => node.inputs = inputs,
		}
		copy
	}

	/// A new node with the input at `ordinal` replaced.
	///
	/// # Panics
	///
	/// If `ordinal` does not name an input; single-input nodes only accept 0.
	pub fn replace_input(&self, ordinal: usize, input: PlanRef) -> PlanNode {
		let mut inputs: Vec<PlanRef> = self.inputs().into_iter().cloned().collect();
		assert!(
			ordinal < inputs.len(),
			"{} has {} input(s), cannot replace input {}",
			self.name(),
			inputs.len(),
			ordinal
		);
		inputs[ordinal] = input;
		self.copy(inputs)
	}
}

fn single(name: &str, inputs: Vec<PlanRef>) -> PlanRef {
	assert_eq!(inputs.len(), 1, "{} takes exactly one input", name);
	let mut inputs = inputs;
	inputs.remove(0)
}

fn pair(name: &str, inputs: Vec<PlanRef>) -> (PlanRef, PlanRef) {
	assert_eq!(inputs.len(), 2, "{} takes exactly two inputs", name);
	let mut inputs = inputs.into_iter();
	match (inputs.next(), inputs.next()) {
		(Some(left), Some(right)) => (left, right),
		_ => unreachable!(),
	}
}
