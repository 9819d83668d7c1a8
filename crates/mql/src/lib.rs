// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The document query language: shell style `db.<collection>.<method>(...)`
//! calls with JSON arguments.

pub mod ast;
mod error;
mod filter;
mod parser;

pub use error::{Error, Result};
pub use filter::{document_value, scalar_value};
pub use parser::parse;
