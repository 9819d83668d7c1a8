// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use polystore_core::{CollectionId, NamespaceId, TableId};

use crate::{CatalogChange, CatalogError, CollectionDef, NamespaceDef, Result, TableDef};

/// One committed catalog state. Never mutated once published.
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogState {
	pub(crate) namespaces: BTreeMap<NamespaceId, NamespaceDef>,
	pub(crate) collections: BTreeMap<CollectionId, CollectionDef>,
	pub(crate) tables: BTreeMap<TableId, TableDef>,
}

impl CatalogState {
	pub(crate) fn namespace_by_name(&self, name: &str) -> Option<&NamespaceDef> {
		self.namespaces.values().find(|ns| ns.name == name)
	}

	pub(crate) fn collection_by_name(&self, namespace: NamespaceId, name: &str) -> Option<&CollectionDef> {
		self.collections.values().find(|c| c.namespace == namespace && c.name == name)
	}

	pub(crate) fn table_by_name(&self, namespace: NamespaceId, name: &str) -> Option<&TableDef> {
		self.tables.values().find(|t| t.namespace == namespace && t.name == name)
	}

	/// Collections and tables share one name space per namespace.
	fn ensure_object_name_free(&self, namespace: NamespaceId, name: &str) -> Result<()> {
		if !self.namespaces.contains_key(&namespace) {
			return Err(CatalogError::NamespaceNotFound(namespace));
		}
		if self.collection_by_name(namespace, name).is_some() {
			return Err(CatalogError::AlreadyExists {
				kind: "collection",
				name: name.to_string(),
			});
		}
		if self.table_by_name(namespace, name).is_some() {
			return Err(CatalogError::AlreadyExists {
				kind: "table",
				name: name.to_string(),
			});
		}
		Ok(())
	}

	pub(crate) fn apply(&mut self, change: CatalogChange) -> Result<()> {
		match change {
			CatalogChange::CreateNamespace(def) => {
				if self.namespace_by_name(&def.name).is_some() {
					return Err(CatalogError::AlreadyExists {
						kind: "namespace",
						name: def.name,
					});
				}
				self.namespaces.insert(def.id, def);
			}
			CatalogChange::CreateCollection(def) => {
				self.ensure_object_name_free(def.namespace, &def.name)?;
				self.collections.insert(def.id, def);
			}
			CatalogChange::CreateTable(def) => {
				self.ensure_object_name_free(def.namespace, &def.name)?;
				self.tables.insert(def.id, def);
			}
		}
		Ok(())
	}
}
