// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeSet,
	ops::Deref,
	sync::{Arc, OnceLock},
};

use parking_lot::Mutex;
use polystore_catalog::Catalog;
use polystore_core::{LockManager, TransactionId, WaitForGraphLockManager};
use polystore_transaction::TransactionManager;
use tracing::{debug, info};

use crate::{EngineConfig, Error, Result};

/// Process scoped state shared by every pipeline: configuration, the live
/// catalog, the transaction manager and the lock manager.
///
/// Built once at startup and handed to consumers by cloning the handle. The
/// lock manager slot can be filled exactly once; a manager that was never
/// installed defaults to [`WaitForGraphLockManager`] on first use.
#[derive(Clone)]
pub struct Environment(Arc<EnvironmentInner>);

pub struct EnvironmentInner {
	config: EngineConfig,
	catalog: Catalog,
	transactions: TransactionManager,
	lock_manager: OnceLock<Arc<dyn LockManager>>,
	lock_owners: Mutex<BTreeSet<TransactionId>>,
}

impl Deref for Environment {
	type Target = EnvironmentInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Environment {
	pub fn builder() -> EnvironmentBuilder {
		EnvironmentBuilder::new()
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn transactions(&self) -> &TransactionManager {
		&self.transactions
	}

	pub fn install_lock_manager(&self, manager: Arc<dyn LockManager>) -> Result<()> {
		self.lock_manager.set(manager).map_err(|_| Error::AlreadyInitialized("lock manager"))?;
		debug!("lock manager installed");
		Ok(())
	}

	pub fn lock_manager(&self) -> &dyn LockManager {
		self.lock_manager.get_or_init(|| Arc::new(WaitForGraphLockManager::new())).as_ref()
	}

	pub(crate) fn register_lock_owner(&self, transaction: TransactionId) {
		self.lock_owners.lock().insert(transaction);
	}

	pub(crate) fn release_lock_owner(&self, transaction: TransactionId) {
		self.lock_owners.lock().remove(&transaction);
	}

	/// Transactions currently holding pipeline locks.
	pub fn lock_owners(&self) -> Vec<TransactionId> {
		self.lock_owners.lock().iter().copied().collect()
	}

	/// Releases every lock still held by a live statement.
	pub fn shutdown(&self) {
		let owners = std::mem::take(&mut *self.lock_owners.lock());
		for transaction in &owners {
			self.lock_manager().unlock_all(*transaction);
		}
		info!(released = owners.len(), "environment shut down");
	}
}

pub struct EnvironmentBuilder {
	config: EngineConfig,
	catalog: Option<Catalog>,
	lock_manager: Option<Arc<dyn LockManager>>,
}

impl EnvironmentBuilder {
	pub fn new() -> Self {
		Self {
			config: EngineConfig::default(),
			catalog: None,
			lock_manager: None,
		}
	}

	pub fn with_config(mut self, config: EngineConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_catalog(mut self, catalog: Catalog) -> Self {
		self.catalog = Some(catalog);
		self
	}

	pub fn with_lock_manager(mut self, manager: Arc<dyn LockManager>) -> Self {
		self.lock_manager = Some(manager);
		self
	}

	pub fn build(self) -> Environment {
		let catalog = self.catalog.unwrap_or_default();
		let lock_manager = OnceLock::new();
		if let Some(manager) = self.lock_manager {
			let _ = lock_manager.set(manager);
		}
		Environment(Arc::new(EnvironmentInner {
			config: self.config,
			transactions: TransactionManager::new(catalog.clone()),
			catalog,
			lock_manager,
			lock_owners: Mutex::new(BTreeSet::new()),
		}))
	}
}

impl Default for EnvironmentBuilder {
	fn default() -> Self {
		Self::new()
	}
}
