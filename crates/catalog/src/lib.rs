// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Schema metadata for the compiler.
//!
//! The live [`Catalog`] is versioned: every committed batch of changes
//! produces a new immutable state, and a [`CatalogSnapshot`] pins one of them
//! for the duration of a compilation.

mod catalog;
mod change;
mod def;
mod error;
mod pattern;
mod snapshot;
mod state;

pub use catalog::Catalog;
pub use change::CatalogChange;
pub use def::{CollectionDef, ColumnDef, NamespaceDef, NamespaceKind, TableDef};
pub use error::{CatalogError, Result};
pub use pattern::Pattern;
pub use snapshot::CatalogSnapshot;

/// The version of a committed catalog state. Version 0 is the empty catalog.
pub type CatalogVersion = u64;
