// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::PlanRef;

/// Post-order rewrite of a plan tree.
///
/// `f` sees every node after its inputs were rewritten and returns a
/// replacement or `None` to keep it. A node whose inputs and itself are
/// unchanged is returned as the same `Arc`, so untouched subtrees stay shared
/// with the original plan.
pub fn transform_up<F>(node: &PlanRef, f: &mut F) -> PlanRef
where
	F: FnMut(&PlanRef) -> Option<PlanRef>,
{
	let inputs = node.inputs();
	let rewritten: Vec<PlanRef> = inputs.iter().map(|input| transform_up(input, f)).collect();

	let changed = inputs.iter().zip(&rewritten).any(|(before, after)| !Arc::ptr_eq(before, after));
	let node = if changed {
		Arc::new(node.copy(rewritten))
	} else {
		node.clone()
	};

	f(&node).unwrap_or(node)
}
