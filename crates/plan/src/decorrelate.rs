// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Removes correlated-subquery nesting.
//!
//! A [`CorrelateNode`] evaluates its right side once per left row. When the
//! right side is a chain of filters and projections over an uncorrelated
//! input, and the outer row is only read by filter conjuncts, those conjuncts
//! are pulled above the chain and become the condition of an ordinary join:
//!
//! | Before | After |
//! |---|---|
//! | `Correlate(Semi)` over `Filter(inner.x = $cor.y)` | `Join(Semi, inner.x = outer.y)` |
//! | `Correlate(Anti)` over `Project(Filter(..))` | `Join(Anti, ..)` |
//!
//! Anything else is left correlated.

use tracing::{instrument, trace};

use crate::{
	CorrelateNode, Expression, FilterNode, JoinNode, PlanNode, PlanRef, ProjectNode, conjunction, conjuncts,
	transform_up,
};

#[instrument(name = "plan::decorrelate", level = "trace", skip_all)]
pub fn decorrelate(plan: &PlanRef) -> PlanRef {
	transform_up(plan, &mut |node| match node.as_ref() {
		PlanNode::Correlate(correlate) => rewrite_correlate(correlate),
		_ => None,
	})
}

fn rewrite_correlate(correlate: &CorrelateNode) -> Option<PlanRef> {
	let right_visible = correlate.kind.projects_right();
	let (right, predicates) = pull_up(&correlate.right, correlate, right_visible)?;

	let left_arity = correlate.left.row_shape().arity();
	let condition = conjunction(
		predicates.into_iter().map(|p| p.shift_columns(left_arity).uncorrelate(correlate.correlation)).collect(),
	);

	trace!(
		correlation = %correlate.correlation,
		kind = %correlate.kind,
		condition = ?condition.as_ref().map(|c| c.to_string()),
		"correlate rewritten into join"
	);

	Some(PlanNode::Join(JoinNode {
		left: correlate.left.clone(),
		right,
		kind: correlate.kind,
		condition,
	})
	.into_ref())
}

/// Returns `node` without its correlated filter conjuncts, plus those
/// conjuncts expressed over the output columns of the returned node.
fn pull_up(node: &PlanRef, correlate: &CorrelateNode, right_visible: bool) -> Option<(PlanRef, Vec<Expression>)> {
	let id = correlate.correlation;
	match node.as_ref() {
		PlanNode::Filter(filter) => {
			let (input, mut pulled) = pull_up(&filter.input, correlate, right_visible)?;
			let (correlated, kept): (Vec<_>, Vec<_>) =
				conjuncts(filter.condition.clone()).into_iter().partition(|c| c.references_correlation(id));
			pulled.extend(correlated);

			let node = match conjunction(kept) {
				Some(condition) => PlanNode::Filter(FilterNode {
					input,
					condition,
				})
				.into_ref(),
				None => input,
			};
			Some((node, pulled))
		}
		PlanNode::Project(project) => {
			if project.expressions.iter().any(|e| e.references_correlation(id)) {
				return None;
			}
			let (input, pulled) = pull_up(&project.input, correlate, right_visible)?;
			let mut expressions = project.expressions.clone();
			let mut names = project.names.clone();

			let mut pulled_through = Vec::with_capacity(pulled.len());
			for predicate in pulled {
				let mut remapped = true;
				let predicate = predicate.transform(&mut |e| match e {
					Expression::Column(index) => {
						let position = expressions.iter().position(|p| *p == Expression::Column(index));
						match position {
							Some(position) => Expression::Column(position),
							// the right side is not visible in the output, so
							// extra columns can be carried through
							None if !right_visible => {
								expressions.push(Expression::Column(index));
								names.push(format!("_cor{}", index));
								Expression::Column(expressions.len() - 1)
							}
							None => {
								remapped = false;
								Expression::Column(index)
							}
						}
					}
					other => other,
				});
				if !remapped {
					return None;
				}
				pulled_through.push(predicate);
			}

			let node = PlanNode::Project(ProjectNode {
				input,
				expressions,
				names,
			})
			.into_ref();
			Some((node, pulled_through))
		}
		_ => {
			if subtree_references(node, correlate) {
				return None;
			}
			Some((node.clone(), vec![]))
		}
	}
}

fn subtree_references(node: &PlanRef, correlate: &CorrelateNode) -> bool {
	let id = correlate.correlation;
	let here = match node.as_ref() {
		PlanNode::Filter(filter) => filter.condition.references_correlation(id),
		PlanNode::Project(project) => project.expressions.iter().any(|e| e.references_correlation(id)),
		PlanNode::Join(join) => join.condition.as_ref().is_some_and(|c| c.references_correlation(id)),
		PlanNode::Values(values) => values.rows.iter().flatten().any(|e| e.references_correlation(id)),
		PlanNode::TableModify(modify) => modify.source_expressions.iter().any(|e| e.references_correlation(id)),
		_ => false,
	};
	here || node.inputs().into_iter().any(|input| subtree_references(input, correlate))
}
