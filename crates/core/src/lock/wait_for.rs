// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use parking_lot::{Condvar, Mutex};
use tracing::{instrument, trace, warn};

use super::{LockError, LockManager, LockMode, LockRequest, ResourceId, Result};
use crate::TransactionId;

#[derive(Debug)]
struct Holding {
	mode: LockMode,
	owners: BTreeSet<TransactionId>,
}

#[derive(Debug, Default)]
struct State {
	held: HashMap<ResourceId, Holding>,
	waiting: HashMap<TransactionId, Vec<LockRequest>>,
}

impl State {
	fn grantable(&self, request: &LockRequest, transaction: TransactionId) -> bool {
		let Some(holding) = self.held.get(&request.resource) else {
			return true;
		};
		if holding.owners.len() == 1 && holding.owners.contains(&transaction) {
			return true;
		}
		holding.mode.is_compatible(&request.mode)
	}

	/// Transactions `transaction` waits for, given its pending requests.
	fn blockers(&self, transaction: TransactionId) -> BTreeSet<TransactionId> {
		let mut result = BTreeSet::new();
		let Some(requests) = self.waiting.get(&transaction) else {
			return result;
		};
		for request in requests {
			if self.grantable(request, transaction) {
				continue;
			}
			if let Some(holding) = self.held.get(&request.resource) {
				result.extend(holding.owners.iter().copied().filter(|owner| *owner != transaction));
			}
		}
		result
	}

	fn closes_cycle(&self, transaction: TransactionId) -> bool {
		let mut visited = HashSet::new();
		let mut stack: Vec<TransactionId> = self.blockers(transaction).into_iter().collect();
		while let Some(current) = stack.pop() {
			if current == transaction {
				return true;
			}
			if visited.insert(current) {
				stack.extend(self.blockers(current));
			}
		}
		false
	}

	fn grant(&mut self, requests: &[LockRequest], transaction: TransactionId) {
		for request in requests {
			let holding = self.held.entry(request.resource.clone()).or_insert_with(|| Holding {
				mode: request.mode,
				owners: BTreeSet::new(),
			});
			holding.owners.insert(transaction);
			if request.mode == LockMode::Exclusive {
				holding.mode = LockMode::Exclusive;
			}
		}
	}

	fn release(&mut self, resource: &ResourceId, transaction: TransactionId) -> bool {
		let Some(holding) = self.held.get_mut(resource) else {
			return false;
		};
		let removed = holding.owners.remove(&transaction);
		if holding.owners.is_empty() {
			self.held.remove(resource);
		}
		removed
	}
}

/// In-memory lock manager with shared and exclusive modes.
///
/// Locks are re-entrant for the owning transaction, and a sole shared holder
/// may upgrade to exclusive. Every time a caller has to wait, the wait-for
/// graph is searched for a cycle through the caller; the caller that would
/// close one is aborted with [`LockError::Deadlock`].
#[derive(Debug, Default)]
pub struct WaitForGraphLockManager {
	state: Mutex<State>,
	released: Condvar,
}

impl WaitForGraphLockManager {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn holders(&self, resource: &ResourceId) -> Vec<(TransactionId, LockMode)> {
		let state = self.state.lock();
		state.held
			.get(resource)
			.map(|holding| holding.owners.iter().map(|owner| (*owner, holding.mode)).collect())
			.unwrap_or_default()
	}

	pub fn is_locked(&self, resource: &ResourceId) -> bool {
		self.state.lock().held.contains_key(resource)
	}
}

/// Sorts requests by resource and merges duplicates into the strongest mode,
/// so all callers acquire in the same order.
fn normalize(requests: &[LockRequest]) -> Vec<LockRequest> {
	let mut merged: BTreeMap<ResourceId, LockMode> = BTreeMap::new();
	for request in requests {
		let mode = merged.entry(request.resource.clone()).or_insert(request.mode);
		if request.mode == LockMode::Exclusive {
			*mode = LockMode::Exclusive;
		}
	}
	merged.into_iter()
		.map(|(resource, mode)| LockRequest {
			resource,
			mode,
		})
		.collect()
}

impl LockManager for WaitForGraphLockManager {
	#[instrument(name = "core::lock::lock", level = "trace", skip(self, requests))]
	fn lock(&self, requests: &[LockRequest], transaction: TransactionId) -> Result<()> {
		let requests = normalize(requests);
		let mut state = self.state.lock();

		loop {
			if requests.iter().all(|request| state.grantable(request, transaction)) {
				state.waiting.remove(&transaction);
				state.grant(&requests, transaction);
				trace!(transaction = %transaction, "granted");
				return Ok(());
			}

			state.waiting.insert(transaction, requests.clone());
			if state.closes_cycle(transaction) {
				state.waiting.remove(&transaction);
				self.released.notify_all();
				warn!(transaction = %transaction, "deadlock victim");
				return Err(LockError::Deadlock {
					transaction,
					resources: requests.into_iter().map(|r| r.resource).collect(),
				});
			}

			trace!(transaction = %transaction, "waiting");
			self.released.wait(&mut state);
		}
	}

	#[instrument(name = "core::lock::unlock", level = "trace", skip(self, resources))]
	fn unlock(&self, resources: &[ResourceId], transaction: TransactionId) {
		let mut state = self.state.lock();
		let mut changed = false;
		for resource in resources {
			changed |= state.release(resource, transaction);
		}
		if changed {
			self.released.notify_all();
		}
	}

	#[instrument(name = "core::lock::unlock_all", level = "trace", skip(self))]
	fn unlock_all(&self, transaction: TransactionId) {
		let mut state = self.state.lock();
		let held: Vec<ResourceId> = state
			.held
			.iter()
			.filter(|(_, holding)| holding.owners.contains(&transaction))
			.map(|(resource, _)| resource.clone())
			.collect();
		for resource in &held {
			state.release(resource, transaction);
		}
		state.waiting.remove(&transaction);
		if !held.is_empty() {
			self.released.notify_all();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resource(name: &str) -> ResourceId {
		ResourceId::new(name)
	}

	#[test]
	fn test_shared_locks_coexist() {
		let manager = WaitForGraphLockManager::new();
		manager.lock(&[LockRequest::shared("a")], TransactionId(1)).unwrap();
		manager.lock(&[LockRequest::shared("a")], TransactionId(2)).unwrap();
		assert_eq!(manager.holders(&resource("a")).len(), 2);
	}

	#[test]
	fn test_reentrant() {
		let manager = WaitForGraphLockManager::new();
		manager.lock(&[LockRequest::exclusive("a")], TransactionId(1)).unwrap();
		manager.lock(&[LockRequest::exclusive("a")], TransactionId(1)).unwrap();
		manager.lock(&[LockRequest::shared("a")], TransactionId(1)).unwrap();
		assert_eq!(manager.holders(&resource("a")), vec![(TransactionId(1), LockMode::Exclusive)]);
	}

	#[test]
	fn test_sole_holder_upgrades() {
		let manager = WaitForGraphLockManager::new();
		manager.lock(&[LockRequest::shared("a")], TransactionId(1)).unwrap();
		manager.lock(&[LockRequest::exclusive("a")], TransactionId(1)).unwrap();
		assert_eq!(manager.holders(&resource("a")), vec![(TransactionId(1), LockMode::Exclusive)]);
	}

	#[test]
	fn test_unlock_twice_is_noop() {
		let manager = WaitForGraphLockManager::new();
		manager.lock(&[LockRequest::exclusive("a")], TransactionId(1)).unwrap();
		manager.unlock(&[resource("a")], TransactionId(1));
		manager.unlock(&[resource("a")], TransactionId(1));
		assert!(!manager.is_locked(&resource("a")));
	}

	#[test]
	fn test_unlock_all() {
		let manager = WaitForGraphLockManager::new();
		manager.lock(&[LockRequest::exclusive("a"), LockRequest::shared("b")], TransactionId(1)).unwrap();
		manager.unlock_all(TransactionId(1));
		assert!(!manager.is_locked(&resource("a")));
		assert!(!manager.is_locked(&resource("b")));
	}

	#[test]
	fn test_normalize_merges_to_strongest_and_sorts() {
		let normalized = normalize(&[
			LockRequest::shared("b"),
			LockRequest::shared("a"),
			LockRequest::exclusive("b"),
		]);
		assert_eq!(normalized, vec![LockRequest::shared("a"), LockRequest::exclusive("b")]);
	}

	#[test]
	fn test_blockers_and_cycles() {
		let mut state = State::default();
		state.grant(&[LockRequest::exclusive("a")], TransactionId(1));
		state.grant(&[LockRequest::exclusive("b")], TransactionId(2));

		state.waiting.insert(TransactionId(1), vec![LockRequest::shared("b")]);
		assert_eq!(state.blockers(TransactionId(1)), BTreeSet::from([TransactionId(2)]));
		assert!(!state.closes_cycle(TransactionId(1)));

		state.waiting.insert(TransactionId(2), vec![LockRequest::shared("a")]);
		assert!(state.closes_cycle(TransactionId(2)));
	}
}
