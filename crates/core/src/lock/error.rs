// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{TransactionId, lock::ResourceId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
	/// Granting the request would have closed a wait-for cycle. The requesting
	/// transaction is the victim; locks it held before the request are kept
	/// until it releases them.
	#[error("deadlock detected: transaction {transaction} waiting for {resources:?}")]
	Deadlock {
		transaction: TransactionId,
		resources: Vec<ResourceId>,
	},
}

pub type Result<T> = std::result::Result<T, LockError>;
