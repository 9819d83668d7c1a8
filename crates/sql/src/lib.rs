// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQL text to [`ast::Statement`].
//!
//! Parsing is controlled by [`ParserConfig`], which only changes how text is
//! read: identifier case folding, the identifier quote character and how
//! strictly the grammar is applied.

pub mod ast;
mod config;
mod error;
mod parser;
mod token;

pub use config::{Conformance, ParserConfig};
pub use error::{Error, Result};
pub use parser::parse;
pub use token::{Keyword, Token, TokenKind, tokenize};
