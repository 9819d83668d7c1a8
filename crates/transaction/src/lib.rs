// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod create;
mod error;
mod manager;
mod transaction;

pub use create::{CollectionToCreate, ColumnToCreate, NamespaceToCreate, TableToCreate};
pub use error::{Result, TransactionError};
pub use manager::TransactionManager;
pub use transaction::{Transaction, TransactionState};
