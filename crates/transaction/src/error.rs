// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_catalog::CatalogError;
use polystore_core::TransactionId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransactionError {
	#[error("transaction {0} is already finished")]
	Finished(TransactionId),

	#[error(transparent)]
	Catalog(#[from] CatalogError),

	#[error("transaction {transaction} failed to commit")]
	CommitConflict {
		transaction: TransactionId,
		#[source]
		source: CatalogError,
	},
}

pub type Result<T> = std::result::Result<T, TransactionError>;
