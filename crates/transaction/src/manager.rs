// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use polystore_catalog::Catalog;
use polystore_core::TransactionId;
use tracing::{debug, instrument};

use crate::Transaction;

#[derive(Clone)]
pub struct TransactionManager {
	catalog: Catalog,
	next_transaction: Arc<AtomicU64>,
}

impl TransactionManager {
	pub fn new(catalog: Catalog) -> Self {
		Self {
			catalog,
			next_transaction: Arc::new(AtomicU64::new(1)),
		}
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	/// Starts a transaction pinned to the latest committed catalog version.
	pub fn begin(&self) -> Transaction {
		self.begin_with_id(self.allocate_id())
	}

	/// Reserves an id before the transaction exists, so locks can be taken
	/// for it ahead of capturing the snapshot.
	pub fn allocate_id(&self) -> TransactionId {
		TransactionId(self.next_transaction.fetch_add(1, Ordering::Relaxed))
	}

	/// Starts a transaction under an id from [`allocate_id`](Self::allocate_id).
	#[instrument(name = "transaction::begin", level = "trace", skip(self))]
	pub fn begin_with_id(&self, id: TransactionId) -> Transaction {
		let snapshot = self.catalog.snapshot();
		debug!(transaction = %id, version = snapshot.version(), "transaction started");
		Transaction::new(id, self.catalog.clone(), snapshot)
	}
}
