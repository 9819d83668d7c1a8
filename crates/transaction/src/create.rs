// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_catalog::NamespaceKind;
use polystore_core::NamespaceId;
use polystore_type::Type;

#[derive(Debug, Clone)]
pub struct NamespaceToCreate {
	pub name: String,
	pub kind: NamespaceKind,
	pub case_sensitive: bool,
}

#[derive(Debug, Clone)]
pub struct CollectionToCreate {
	pub namespace: NamespaceId,
	pub name: String,
}

#[derive(Debug, Clone)]
pub struct ColumnToCreate {
	pub name: String,
	pub ty: Type,
	pub nullable: bool,
}

#[derive(Debug, Clone)]
pub struct TableToCreate {
	pub namespace: NamespaceId,
	pub name: String,
	pub columns: Vec<ColumnToCreate>,
}
