// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_catalog::{
	Catalog, CatalogChange, CatalogError, CatalogSnapshot, CatalogVersion, CollectionDef, ColumnDef, NamespaceDef,
	TableDef,
};
use polystore_core::{NamespaceId, StatementId, TransactionId};
use tracing::{debug, instrument, warn};

use crate::{CollectionToCreate, NamespaceToCreate, Result, TableToCreate, TransactionError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransactionState {
	Active,
	Committed,
	RolledBack,
}

/// A unit of work against the catalog.
///
/// Name resolution uses the snapshot captured at `begin`. Schema changes are
/// buffered and become visible to everyone, this transaction included, only
/// once `commit` succeeds. Dropping an active transaction rolls it back.
pub struct Transaction {
	id: TransactionId,
	catalog: Catalog,
	snapshot: CatalogSnapshot,
	pending: Vec<CatalogChange>,
	next_statement: u64,
	state: TransactionState,
}

impl Transaction {
	pub(crate) fn new(id: TransactionId, catalog: Catalog, snapshot: CatalogSnapshot) -> Self {
		Self {
			id,
			catalog,
			snapshot,
			pending: Vec::new(),
			next_statement: 1,
			state: TransactionState::Active,
		}
	}

	pub fn id(&self) -> TransactionId {
		self.id
	}

	pub fn snapshot(&self) -> &CatalogSnapshot {
		&self.snapshot
	}

	pub fn state(&self) -> TransactionState {
		self.state
	}

	pub fn is_active(&self) -> bool {
		self.state == TransactionState::Active
	}

	pub fn pending(&self) -> &[CatalogChange] {
		&self.pending
	}

	pub fn next_statement(&mut self) -> Result<StatementId> {
		self.ensure_active()?;
		let id = StatementId(self.next_statement);
		self.next_statement += 1;
		Ok(id)
	}

	fn ensure_active(&self) -> Result<()> {
		match self.state {
			TransactionState::Active => Ok(()),
			_ => Err(TransactionError::Finished(self.id)),
		}
	}

	fn pending_name_taken(&self, namespace: Option<NamespaceId>, name: &str) -> bool {
		self.pending.iter().any(|change| match (change, namespace) {
			(CatalogChange::CreateNamespace(def), None) => def.name == name,
			(CatalogChange::CreateCollection(def), Some(ns)) => def.namespace == ns && def.name == name,
			(CatalogChange::CreateTable(def), Some(ns)) => def.namespace == ns && def.name == name,
			_ => false,
		})
	}

	fn ensure_object_name_free(&self, namespace: NamespaceId, name: &str) -> Result<()> {
		if self.snapshot.find_collection_by_name(namespace, name).is_some()
			|| self.snapshot.find_table_by_name(namespace, name).is_some()
			|| self.pending_name_taken(Some(namespace), name)
		{
			return Err(CatalogError::AlreadyExists {
				kind: "object",
				name: name.to_string(),
			}
			.into());
		}
		Ok(())
	}

	#[instrument(name = "transaction::create_namespace", level = "debug", skip(self, to_create), fields(name = %to_create.name))]
	pub fn create_namespace(&mut self, to_create: NamespaceToCreate) -> Result<NamespaceDef> {
		self.ensure_active()?;
		if self.snapshot.find_namespace_by_name(&to_create.name).is_some()
			|| self.pending_name_taken(None, &to_create.name)
		{
			return Err(CatalogError::AlreadyExists {
				kind: "namespace",
				name: to_create.name,
			}
			.into());
		}

		let def = NamespaceDef {
			id: self.catalog.next_namespace_id(),
			name: to_create.name,
			kind: to_create.kind,
			case_sensitive: to_create.case_sensitive,
		};
		self.pending.push(CatalogChange::CreateNamespace(def.clone()));
		Ok(def)
	}

	#[instrument(name = "transaction::create_collection", level = "debug", skip(self, to_create), fields(name = %to_create.name))]
	pub fn create_collection(&mut self, to_create: CollectionToCreate) -> Result<CollectionDef> {
		self.ensure_active()?;
		self.ensure_object_name_free(to_create.namespace, &to_create.name)?;

		let def = CollectionDef {
			id: self.catalog.next_collection_id(),
			namespace: to_create.namespace,
			name: to_create.name,
			partitions: vec![self.catalog.next_partition_id()],
		};
		self.pending.push(CatalogChange::CreateCollection(def.clone()));
		Ok(def)
	}

	#[instrument(name = "transaction::create_table", level = "debug", skip(self, to_create), fields(name = %to_create.name))]
	pub fn create_table(&mut self, to_create: TableToCreate) -> Result<TableDef> {
		self.ensure_active()?;
		self.ensure_object_name_free(to_create.namespace, &to_create.name)?;

		let columns = to_create
			.columns
			.into_iter()
			.map(|column| ColumnDef {
				id: self.catalog.next_column_id(),
				name: column.name,
				ty: column.ty,
				nullable: column.nullable,
			})
			.collect();

		let def = TableDef {
			id: self.catalog.next_table_id(),
			namespace: to_create.namespace,
			name: to_create.name,
			columns,
			partitions: vec![self.catalog.next_partition_id()],
		};
		self.pending.push(CatalogChange::CreateTable(def.clone()));
		Ok(def)
	}

	/// Publishes the buffered schema changes. On failure nothing is published
	/// and the transaction is rolled back.
	#[instrument(name = "transaction::commit", level = "debug", skip(self), fields(transaction = %self.id))]
	pub fn commit(&mut self) -> Result<CatalogVersion> {
		self.ensure_active()?;
		let changes = std::mem::take(&mut self.pending);
		match self.catalog.apply(changes) {
			Ok(version) => {
				self.state = TransactionState::Committed;
				debug!(version, "committed");
				Ok(version)
			}
			Err(source) => {
				self.state = TransactionState::RolledBack;
				warn!(error = %source, "commit failed");
				Err(TransactionError::CommitConflict {
					transaction: self.id,
					source,
				})
			}
		}
	}

	#[instrument(name = "transaction::rollback", level = "debug", skip(self), fields(transaction = %self.id))]
	pub fn rollback(&mut self) -> Result<()> {
		self.ensure_active()?;
		self.pending.clear();
		self.state = TransactionState::RolledBack;
		Ok(())
	}
}

impl Drop for Transaction {
	fn drop(&mut self) {
		if self.state == TransactionState::Active {
			warn!(transaction = %self.id, pending = self.pending.len(), "transaction dropped while active, rolling back");
			self.pending.clear();
			self.state = TransactionState::RolledBack;
		}
	}
}
