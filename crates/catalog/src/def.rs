// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_core::{CollectionId, ColumnId, NamespaceId, PartitionId, TableId};
use polystore_type::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceKind {
	/// Holds tables with a declared column list.
	Relational,
	/// Holds schemaless collections of documents.
	Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDef {
	pub id: NamespaceId,
	pub name: String,
	pub kind: NamespaceKind,
	pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDef {
	pub id: CollectionId,
	pub namespace: NamespaceId,
	pub name: String,
	pub partitions: Vec<PartitionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub id: ColumnId,
	pub name: String,
	pub ty: Type,
	pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
	pub id: TableId,
	pub namespace: NamespaceId,
	pub name: String,
	pub columns: Vec<ColumnDef>,
	pub partitions: Vec<PartitionId>,
}

impl TableDef {
	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.name == name)
	}

	pub fn column_names(&self) -> Vec<String> {
		self.columns.iter().map(|c| c.name.clone()).collect()
	}
}
