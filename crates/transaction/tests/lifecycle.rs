// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_catalog::{Catalog, CatalogError, NamespaceKind};
use polystore_core::StatementId;
use polystore_transaction::{
	CollectionToCreate, ColumnToCreate, NamespaceToCreate, TableToCreate, TransactionError, TransactionManager,
	TransactionState,
};
use polystore_type::Type;

fn manager_with_docs() -> (TransactionManager, polystore_core::NamespaceId) {
	let manager = TransactionManager::new(Catalog::new());
	let mut tx = manager.begin();
	let docs = tx
		.create_namespace(NamespaceToCreate {
			name: "docs".to_string(),
			kind: NamespaceKind::Document,
			case_sensitive: true,
		})
		.unwrap();
	tx.commit().unwrap();
	(manager, docs.id)
}

#[test]
fn test_transaction_ids_are_unique() {
	let manager = TransactionManager::new(Catalog::new());
	let first = manager.begin();
	let second = manager.begin();
	assert_ne!(first.id(), second.id());
}

#[test]
fn test_snapshot_is_captured_after_reserving_id() {
	let catalog = Catalog::new();
	let manager = TransactionManager::new(catalog.clone());
	let id = manager.allocate_id();

	let mut other = manager.begin();
	assert_ne!(other.id(), id);
	other
		.create_namespace(NamespaceToCreate {
			name: "late".to_string(),
			kind: NamespaceKind::Relational,
			case_sensitive: false,
		})
		.unwrap();
	other.commit().unwrap();

	let tx = manager.begin_with_id(id);
	assert_eq!(tx.id(), id);
	assert!(tx.snapshot().find_namespace_by_name("late").is_some());
}

#[test]
fn test_statement_ids_are_monotonic() {
	let manager = TransactionManager::new(Catalog::new());
	let mut tx = manager.begin();
	assert_eq!(tx.next_statement().unwrap(), StatementId(1));
	assert_eq!(tx.next_statement().unwrap(), StatementId(2));
}

#[test]
fn test_pending_changes_visible_only_after_commit() {
	let (manager, docs) = manager_with_docs();

	let mut tx = manager.begin();
	tx.create_collection(CollectionToCreate {
		namespace: docs,
		name: "people".to_string(),
	})
	.unwrap();

	assert!(tx.snapshot().find_collection_by_name(docs, "people").is_none());
	assert!(manager.catalog().snapshot().find_collection_by_name(docs, "people").is_none());

	tx.commit().unwrap();
	assert_eq!(tx.state(), TransactionState::Committed);
	assert!(manager.catalog().snapshot().find_collection_by_name(docs, "people").is_some());
	assert!(manager.begin().snapshot().find_collection_by_name(docs, "people").is_some());
}

#[test]
fn test_create_table_allocates_columns() {
	let (manager, docs) = manager_with_docs();
	let mut tx = manager.begin();
	let table = tx
		.create_table(TableToCreate {
			namespace: docs,
			name: "users".to_string(),
			columns: vec![
				ColumnToCreate {
					name: "id".to_string(),
					ty: Type::Int8,
					nullable: false,
				},
				ColumnToCreate {
					name: "name".to_string(),
					ty: Type::Utf8,
					nullable: true,
				},
			],
		})
		.unwrap();
	assert_eq!(table.column_names(), vec!["id", "name"]);
	assert_ne!(table.columns[0].id, table.columns[1].id);
	assert_eq!(table.partitions.len(), 1);
}

#[test]
fn test_duplicate_in_same_transaction() {
	let (manager, docs) = manager_with_docs();
	let mut tx = manager.begin();
	let to_create = CollectionToCreate {
		namespace: docs,
		name: "people".to_string(),
	};
	tx.create_collection(to_create.clone()).unwrap();
	assert!(matches!(
		tx.create_collection(to_create),
		Err(TransactionError::Catalog(CatalogError::AlreadyExists { .. }))
	));
}

#[test]
fn test_conflicting_commit_fails() {
	let (manager, docs) = manager_with_docs();
	let mut first = manager.begin();
	let mut second = manager.begin();
	for tx in [&mut first, &mut second] {
		tx.create_collection(CollectionToCreate {
			namespace: docs,
			name: "people".to_string(),
		})
		.unwrap();
	}

	first.commit().unwrap();
	let result = second.commit();
	assert!(matches!(result, Err(TransactionError::CommitConflict { .. })));
	assert_eq!(second.state(), TransactionState::RolledBack);
	assert_eq!(manager.catalog().snapshot().get_collections(docs).len(), 1);
}

#[test]
fn test_finished_transaction_rejects_work() {
	let manager = TransactionManager::new(Catalog::new());
	let mut tx = manager.begin();
	tx.rollback().unwrap();
	assert_eq!(tx.next_statement(), Err(TransactionError::Finished(tx.id())));
	assert_eq!(tx.commit(), Err(TransactionError::Finished(tx.id())));
}

#[test]
fn test_drop_rolls_back() {
	let (manager, docs) = manager_with_docs();
	{
		let mut tx = manager.begin();
		tx.create_collection(CollectionToCreate {
			namespace: docs,
			name: "lost".to_string(),
		})
		.unwrap();
	}
	assert!(manager.catalog().snapshot().find_collection_by_name(docs, "lost").is_none());
}
