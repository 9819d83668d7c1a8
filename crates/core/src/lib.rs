// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod id;
pub mod lock;

pub use id::{
	CollectionId, ColumnId, CorrelationId, NamespaceId, PartitionId, StatementId, TableId, TransactionId,
};
pub use lock::{
	LockError, LockGuard, LockManager, LockMode, LockRequest, ResourceId, WaitForGraphLockManager, lock_scoped,
};
