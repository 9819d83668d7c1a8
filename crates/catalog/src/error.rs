// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_core::NamespaceId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
	#[error("{kind} '{name}' already exists")]
	AlreadyExists {
		kind: &'static str,
		name: String,
	},

	#[error("namespace {0} not found")]
	NamespaceNotFound(NamespaceId),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
