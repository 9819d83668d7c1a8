// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{CollectionDef, NamespaceDef, TableDef};

/// One schema change, applied to the live catalog at commit.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
	CreateNamespace(NamespaceDef),
	CreateCollection(CollectionDef),
	CreateTable(TableDef),
}

impl CatalogChange {
	pub fn name(&self) -> &str {
		match self {
			CatalogChange::CreateNamespace(def) => &def.name,
			CatalogChange::CreateCollection(def) => &def.name,
			CatalogChange::CreateTable(def) => &def.name,
		}
	}
}
