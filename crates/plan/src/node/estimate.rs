// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{JoinKind, PlanNode, SetOperationKind};

const SCAN_ROW_ESTIMATE: f64 = 100.0;
const FILTER_SELECTIVITY: f64 = 0.25;
const JOIN_SELECTIVITY: f64 = 0.1;

/// Row count reported for trigger execution. This is a fixed placeholder for
/// bodies that are not expanded yet, not a statistic.
pub const TRIGGER_EXECUTION_ROW_ESTIMATE: f64 = 1.0;

impl PlanNode {
	/// A rough cardinality estimate; only relative sizes are meaningful.
	pub fn estimate_row_count(&self) -> f64 {
		match self {
			PlanNode::Scan(_) => SCAN_ROW_ESTIMATE,
			PlanNode::Values(node) => node.rows.len() as f64,
			PlanNode::Filter(node) => node.input.estimate_row_count() * FILTER_SELECTIVITY,
			PlanNode::Project(node) => node.input.estimate_row_count(),
			PlanNode::Aggregate(_) => 1.0,
			PlanNode::TableModify(node) => node.input.estimate_row_count(),
			PlanNode::ChangeDataCapture(node) => node.input.estimate_row_count(),
			PlanNode::Join(node) => {
				join_estimate(node.kind, node.left.estimate_row_count(), node.right.estimate_row_count())
			}
			PlanNode::Correlate(node) => {
				join_estimate(node.kind, node.left.estimate_row_count(), node.right.estimate_row_count())
			}
			PlanNode::SetOperation(node) => {
				let counts: Vec<f64> = node.inputs.iter().map(|input| input.estimate_row_count()).collect();
				let estimate: f64 = match node.kind {
					SetOperationKind::Union => counts.iter().sum(),
					SetOperationKind::Intersect => counts.iter().copied().fold(f64::INFINITY, f64::min) * 0.25,
					SetOperationKind::Minus => {
						let first = counts.first().copied().unwrap_or(0.0);
						let rest: f64 = counts.iter().skip(1).sum();
						(first - 0.5 * rest).max(first * 0.1)
					}
				};
				let estimate = if estimate.is_finite() {
					estimate
				} else {
					0.0
				};
				if node.all || node.kind != SetOperationKind::Union {
					estimate
				} else {
					estimate * 0.5
				}
			}
			PlanNode::TriggerExecution(_) => TRIGGER_EXECUTION_ROW_ESTIMATE,
		}
	}
}

fn join_estimate(kind: JoinKind, left: f64, right: f64) -> f64 {
	match kind {
		JoinKind::Inner => left * right * JOIN_SELECTIVITY,
		JoinKind::Left => (left * right * JOIN_SELECTIVITY).max(left),
		JoinKind::Semi | JoinKind::Anti => left * 0.5,
	}
}
