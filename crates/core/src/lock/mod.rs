// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Named-resource locks held by transactions.
//!
//! A [`LockManager`] grants a whole list of `(resource, mode)` requests
//! atomically or not at all, blocks the caller while any of them conflicts,
//! and aborts a blocked caller with [`LockError::Deadlock`] when waiting would
//! close a cycle between transactions.

mod error;
mod wait_for;

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

pub use error::{LockError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
pub use wait_for::WaitForGraphLockManager;

use crate::TransactionId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LockMode {
	Shared,
	Exclusive,
}

impl LockMode {
	pub fn is_compatible(&self, other: &LockMode) -> bool {
		matches!((self, other), (LockMode::Shared, LockMode::Shared))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(Arc<str>);

impl ResourceId {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for ResourceId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ResourceId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for ResourceId {
	fn from(value: String) -> Self {
		Self(Arc::from(value))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockRequest {
	pub resource: ResourceId,
	pub mode: LockMode,
}

impl LockRequest {
	pub fn shared(resource: impl Into<ResourceId>) -> Self {
		Self {
			resource: resource.into(),
			mode: LockMode::Shared,
		}
	}

	pub fn exclusive(resource: impl Into<ResourceId>) -> Self {
		Self {
			resource: resource.into(),
			mode: LockMode::Exclusive,
		}
	}
}

pub trait LockManager: Send + Sync {
	/// Blocks until every request is granted to `transaction`, or fails with
	/// [`LockError::Deadlock`]. Nothing is granted when the call fails.
	fn lock(&self, requests: &[LockRequest], transaction: TransactionId) -> Result<()>;

	/// Releasing a resource the transaction does not hold is a no-op.
	fn unlock(&self, resources: &[ResourceId], transaction: TransactionId);

	fn unlock_all(&self, transaction: TransactionId);
}

/// Releases its resources when dropped, on every exit path.
#[must_use = "the locks are released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
	manager: &'a dyn LockManager,
	resources: Vec<ResourceId>,
	transaction: TransactionId,
}

impl<'a> LockGuard<'a> {
	pub fn transaction(&self) -> TransactionId {
		self.transaction
	}

	pub fn resources(&self) -> &[ResourceId] {
		&self.resources
	}
}

impl Drop for LockGuard<'_> {
	fn drop(&mut self) {
		self.manager.unlock(&self.resources, self.transaction);
		debug!(transaction = %self.transaction, resources = ?self.resources, "locks released");
	}
}

pub fn lock_scoped<'a>(
	manager: &'a dyn LockManager,
	requests: &[LockRequest],
	transaction: TransactionId,
) -> Result<LockGuard<'a>> {
	manager.lock(requests, transaction)?;
	debug!(transaction = %transaction, requests = requests.len(), "locks acquired");
	Ok(LockGuard {
		manager,
		resources: requests.iter().map(|r| r.resource.clone()).collect(),
		transaction,
	})
}
