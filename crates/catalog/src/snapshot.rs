// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use polystore_core::{CollectionId, NamespaceId, TableId};
use tracing::instrument;

use crate::{CatalogVersion, CollectionDef, NamespaceDef, Pattern, TableDef, state::CatalogState};

/// An immutable view of the catalog at one committed version.
///
/// Cloning is cheap and never observes later commits.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
	version: CatalogVersion,
	state: Arc<CatalogState>,
}

impl CatalogSnapshot {
	pub(crate) fn new(version: CatalogVersion, state: Arc<CatalogState>) -> Self {
		Self {
			version,
			state,
		}
	}

	pub fn version(&self) -> CatalogVersion {
		self.version
	}

	#[instrument(name = "catalog::snapshot::lookup_namespaces", level = "trace", skip(self, pattern), fields(pattern = %pattern))]
	pub fn lookup_namespaces(&self, pattern: &Pattern) -> Vec<NamespaceDef> {
		self.state.namespaces.values().filter(|ns| pattern.matches(&ns.name)).cloned().collect()
	}

	#[instrument(name = "catalog::snapshot::get_collections", level = "trace", skip(self))]
	pub fn get_collections(&self, namespace: NamespaceId) -> Vec<CollectionDef> {
		self.state.collections.values().filter(|c| c.namespace == namespace).cloned().collect()
	}

	pub fn get_tables(&self, namespace: NamespaceId) -> Vec<TableDef> {
		self.state.tables.values().filter(|t| t.namespace == namespace).cloned().collect()
	}

	pub fn namespaces(&self) -> Vec<NamespaceDef> {
		self.state.namespaces.values().cloned().collect()
	}

	pub fn get_namespace(&self, id: NamespaceId) -> Option<&NamespaceDef> {
		self.state.namespaces.get(&id)
	}

	pub fn get_collection(&self, id: CollectionId) -> Option<&CollectionDef> {
		self.state.collections.get(&id)
	}

	pub fn get_table(&self, id: TableId) -> Option<&TableDef> {
		self.state.tables.get(&id)
	}

	#[instrument(name = "catalog::namespace::find_by_name", level = "trace", skip(self))]
	pub fn find_namespace_by_name(&self, name: &str) -> Option<&NamespaceDef> {
		self.state.namespace_by_name(name)
	}

	#[instrument(name = "catalog::collection::find_by_name", level = "trace", skip(self))]
	pub fn find_collection_by_name(&self, namespace: NamespaceId, name: &str) -> Option<&CollectionDef> {
		self.state.collection_by_name(namespace, name)
	}

	#[instrument(name = "catalog::table::find_by_name", level = "trace", skip(self))]
	pub fn find_table_by_name(&self, namespace: NamespaceId, name: &str) -> Option<&TableDef> {
		self.state.table_by_name(namespace, name)
	}
}
