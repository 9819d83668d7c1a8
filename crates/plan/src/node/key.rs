// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::PlanNode;

/// Closes every comparison key so that a key is never a prefix of another.
pub const KEY_TERMINATOR: &str = ";";

impl PlanNode {
	/// A deterministic key used to memoize and deduplicate plans.
	///
	/// Two nodes with equal keys are interchangeable. For set operations and
	/// trigger execution the key is `variant$key(input1)$...$all;`, so
	/// changing the variant, any input or the `all` flag changes the key.
	/// Other variants put their attributes where set operations put `all`.
	///
	/// Attributes are escaped, so user text such as string constants can never
	/// produce a raw `$` or `;`.
	pub fn comparison_key(&self) -> String {
		let inputs: Vec<String> = self.inputs().into_iter().map(|input| input.comparison_key()).collect();
		format!("{}${}${}{}", self.name(), inputs.join("$"), escape(&self.key_attributes()), KEY_TERMINATOR)
	}

	// Expressions and names use their `Debug` form, which quotes strings.
	fn key_attributes(&self) -> String {
		match self {
			PlanNode::SetOperation(node) => node.all.to_string(),
			PlanNode::TriggerExecution(node) => node.all.to_string(),
			PlanNode::Scan(node) => node.source.to_string(),
			PlanNode::Values(node) => format!("{:?}", node.rows),
			PlanNode::Filter(node) => format!("{:?}", node.condition),
			PlanNode::Project(node) => format!("{:?}:{:?}", node.expressions, node.names),
			PlanNode::Join(node) => format!("{}:{:?}", node.kind, node.condition),
			PlanNode::Correlate(node) => format!("{}:{}", node.kind, node.correlation),
			PlanNode::Aggregate(node) => format!("count:{:?}", node.name),
			PlanNode::TableModify(node) => format!(
				"{}:{}:{:?}:{:?}",
				node.operation, node.target, node.updated_columns, node.source_expressions
			),
			PlanNode::ChangeDataCapture(node) => {
				format!("{}:{}:{}:{}", node.operation, node.target, node.transaction, node.statement)
			}
		}
	}
}

fn escape(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	for c in text.chars() {
		if matches!(c, '\\' | '$' | ';') {
			result.push('\\');
		}
		result.push(c);
	}
	result
}
