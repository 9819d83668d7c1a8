// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use crossbeam_skiplist::SkipMap;
use parking_lot::Mutex;
use polystore_core::{CollectionId, ColumnId, NamespaceId, PartitionId, TableId};
use tracing::{debug, instrument};

use crate::{CatalogChange, CatalogSnapshot, CatalogVersion, Result, state::CatalogState};

/// The live, multi-versioned catalog.
///
/// Each commit publishes a complete new state under the next version; readers
/// take a [`CatalogSnapshot`] and are never affected by later commits.
#[derive(Clone)]
pub struct Catalog(Arc<CatalogInner>);

pub struct CatalogInner {
	versions: SkipMap<CatalogVersion, Arc<CatalogState>>,
	/// Serializes writers so each commit builds on the latest version.
	commit: Mutex<()>,
	next_id: AtomicU64,
}

impl std::ops::Deref for Catalog {
	type Target = CatalogInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Default for Catalog {
	fn default() -> Self {
		Self::new()
	}
}

impl Catalog {
	pub fn new() -> Self {
		let versions = SkipMap::new();
		versions.insert(0, Arc::new(CatalogState::default()));
		Self(Arc::new(CatalogInner {
			versions,
			commit: Mutex::new(()),
			next_id: AtomicU64::new(1),
		}))
	}

	pub fn version(&self) -> CatalogVersion {
		self.versions.back().map(|entry| *entry.key()).unwrap_or(0)
	}

	/// The latest committed state.
	pub fn snapshot(&self) -> CatalogSnapshot {
		match self.versions.back() {
			Some(entry) => CatalogSnapshot::new(*entry.key(), entry.value().clone()),
			None => CatalogSnapshot::new(0, Arc::new(CatalogState::default())),
		}
	}

	/// The state as of `version`, or the closest earlier one.
	pub fn snapshot_at(&self, version: CatalogVersion) -> CatalogSnapshot {
		match self.versions.range(..=version).next_back() {
			Some(entry) => CatalogSnapshot::new(*entry.key(), entry.value().clone()),
			None => CatalogSnapshot::new(0, Arc::new(CatalogState::default())),
		}
	}

	/// Applies `changes` atomically on top of the latest version. Either all
	/// of them become visible under one new version or none does.
	#[instrument(name = "catalog::apply", level = "debug", skip(self, changes), fields(changes = changes.len()))]
	pub fn apply(&self, changes: Vec<CatalogChange>) -> Result<CatalogVersion> {
		let _commit = self.commit.lock();
		let current = self.snapshot();
		if changes.is_empty() {
			return Ok(current.version());
		}

		let mut next = match self.versions.get(&current.version()) {
			Some(entry) => CatalogState::clone(entry.value()),
			None => CatalogState::default(),
		};
		for change in changes {
			next.apply(change)?;
		}

		let version = current.version() + 1;
		self.versions.insert(version, Arc::new(next));
		debug!(version, "catalog committed");
		Ok(version)
	}

	fn next(&self) -> u64 {
		self.next_id.fetch_add(1, Ordering::Relaxed)
	}

	pub fn next_namespace_id(&self) -> NamespaceId {
		NamespaceId(self.next())
	}

	pub fn next_collection_id(&self) -> CollectionId {
		CollectionId(self.next())
	}

	pub fn next_table_id(&self) -> TableId {
		TableId(self.next())
	}

	pub fn next_partition_id(&self) -> PartitionId {
		PartitionId(self.next())
	}

	pub fn next_column_id(&self) -> ColumnId {
		ColumnId(self.next())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{CatalogError, CollectionDef, NamespaceDef, NamespaceKind, Pattern};

	fn namespace(catalog: &Catalog, name: &str) -> NamespaceDef {
		NamespaceDef {
			id: catalog.next_namespace_id(),
			name: name.to_string(),
			kind: NamespaceKind::Document,
			case_sensitive: true,
		}
	}

	fn collection(catalog: &Catalog, namespace: NamespaceId, name: &str) -> CollectionDef {
		CollectionDef {
			id: catalog.next_collection_id(),
			namespace,
			name: name.to_string(),
			partitions: vec![catalog.next_partition_id()],
		}
	}

	#[test]
	fn test_empty_catalog() {
		let catalog = Catalog::new();
		assert_eq!(catalog.version(), 0);
		assert!(catalog.snapshot().namespaces().is_empty());
	}

	#[test]
	fn test_apply_bumps_version() {
		let catalog = Catalog::new();
		let docs = namespace(&catalog, "docs");
		let version = catalog.apply(vec![CatalogChange::CreateNamespace(docs.clone())]).unwrap();
		assert_eq!(version, 1);
		assert_eq!(catalog.snapshot().find_namespace_by_name("docs"), Some(&docs));
	}

	#[test]
	fn test_snapshot_is_isolated_from_later_commits() {
		let catalog = Catalog::new();
		let docs = namespace(&catalog, "docs");
		catalog.apply(vec![CatalogChange::CreateNamespace(docs.clone())]).unwrap();

		let before = catalog.snapshot();
		let people = collection(&catalog, docs.id, "people");
		catalog.apply(vec![CatalogChange::CreateCollection(people.clone())]).unwrap();

		assert!(before.get_collections(docs.id).is_empty());
		assert_eq!(catalog.snapshot().get_collections(docs.id), vec![people]);
		assert_eq!(catalog.snapshot_at(before.version()).get_collections(docs.id).len(), 0);
	}

	#[test]
	fn test_duplicate_rejected_atomically() {
		let catalog = Catalog::new();
		let docs = namespace(&catalog, "docs");
		catalog.apply(vec![CatalogChange::CreateNamespace(docs.clone())]).unwrap();
		catalog.apply(vec![CatalogChange::CreateCollection(collection(&catalog, docs.id, "people"))]).unwrap();

		let version = catalog.version();
		let result = catalog.apply(vec![
			CatalogChange::CreateCollection(collection(&catalog, docs.id, "orders")),
			CatalogChange::CreateCollection(collection(&catalog, docs.id, "people")),
		]);
		assert_eq!(
			result,
			Err(CatalogError::AlreadyExists {
				kind: "collection",
				name: "people".to_string(),
			})
		);
		assert_eq!(catalog.version(), version);
		assert!(catalog.snapshot().find_collection_by_name(docs.id, "orders").is_none());
	}

	#[test]
	fn test_unknown_namespace() {
		let catalog = Catalog::new();
		let result = catalog.apply(vec![CatalogChange::CreateCollection(collection(&catalog, NamespaceId(99), "x"))]);
		assert_eq!(result, Err(CatalogError::NamespaceNotFound(NamespaceId(99))));
	}

	#[test]
	fn test_lookup_namespaces_by_pattern() {
		let catalog = Catalog::new();
		catalog.apply(vec![
			CatalogChange::CreateNamespace(namespace(&catalog, "docs")),
			CatalogChange::CreateNamespace(namespace(&catalog, "drafts")),
			CatalogChange::CreateNamespace(namespace(&catalog, "public")),
		])
		.unwrap();

		let snapshot = catalog.snapshot();
		let mut names: Vec<_> = snapshot.lookup_namespaces(&Pattern::like("d%")).into_iter().map(|ns| ns.name).collect();
		names.sort();
		assert_eq!(names, vec!["docs", "drafts"]);
		assert_eq!(snapshot.lookup_namespaces(&Pattern::exact("DOCS").case_insensitive()).len(), 1);
	}
}
