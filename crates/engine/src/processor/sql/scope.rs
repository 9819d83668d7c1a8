// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_plan::{Field, RowShape};
use polystore_type::Type;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct ScopeColumn {
	pub qualifier: Option<String>,
	pub name: String,
	pub ty: Type,
}

/// The columns visible to expressions over one input row, parallel to the row
/// shape of that input.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
	pub columns: Vec<ScopeColumn>,
}

impl Scope {
	pub fn from_shape(qualifier: &str, shape: &RowShape) -> Self {
		Self {
			columns: shape
				.fields
				.iter()
				.map(|f| ScopeColumn {
					qualifier: Some(qualifier.to_string()),
					name: f.name.clone(),
					ty: f.ty,
				})
				.collect(),
		}
	}

	pub fn unqualified(shape: &RowShape) -> Self {
		Self {
			columns: shape
				.fields
				.iter()
				.map(|f| ScopeColumn {
					qualifier: None,
					name: f.name.clone(),
					ty: f.ty,
				})
				.collect(),
		}
	}

	pub fn arity(&self) -> usize {
		self.columns.len()
	}

	pub fn concat(&self, other: &Scope) -> Scope {
		let mut columns = self.columns.clone();
		columns.extend(other.columns.iter().cloned());
		Scope {
			columns,
		}
	}

	pub fn shape(&self) -> RowShape {
		RowShape::new(self.columns.iter().map(|c| Field::new(c.name.clone(), c.ty)).collect())
	}

	/// Position of the column, `None` when no column matches.
	pub fn resolve(&self, qualifier: Option<&str>, name: &str) -> Result<Option<usize>> {
		let mut found = None;
		for (index, column) in self.columns.iter().enumerate() {
			let qualifier_matches = match qualifier {
				Some(q) => column.qualifier.as_deref() == Some(q),
				None => true,
			};
			if !qualifier_matches || column.name != name {
				continue;
			}
			if found.is_some() {
				return Err(Error::validation(format!("column reference '{}' is ambiguous", name)));
			}
			found = Some(index);
		}
		Ok(found)
	}

	/// Whether a document column is visible under `qualifier`; unknown names
	/// then address fields inside the document.
	pub fn has_document(&self, qualifier: Option<&str>) -> bool {
		self.columns.iter().any(|c| {
			c.ty == Type::Document
				&& match qualifier {
					Some(q) => c.qualifier.as_deref() == Some(q),
					None => true,
				}
		})
	}
}
