// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use polystore_type::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
	pub name: String,
	pub ty: Type,
}

impl Field {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// The ordered fields of the rows a plan node produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowShape {
	pub fields: Vec<Field>,
}

impl RowShape {
	pub fn new(fields: Vec<Field>) -> Self {
		Self {
			fields,
		}
	}

	pub fn single(name: impl Into<String>, ty: Type) -> Self {
		Self::new(vec![Field::new(name, ty)])
	}

	/// A schemaless document row.
	pub fn document() -> Self {
		Self::single("_doc", Type::Document)
	}

	pub fn arity(&self) -> usize {
		self.fields.len()
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|f| f.name == name)
	}

	pub fn field(&self, index: usize) -> Option<&Field> {
		self.fields.get(index)
	}

	pub fn names(&self) -> Vec<&str> {
		self.fields.iter().map(|f| f.name.as_str()).collect()
	}

	pub fn concat(&self, other: &RowShape) -> RowShape {
		let mut fields = self.fields.clone();
		fields.extend(other.fields.iter().cloned());
		RowShape::new(fields)
	}
}

impl Display for RowShape {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("(")?;
		for (i, field) in self.fields.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{} {}", field.name, field.ty)?;
		}
		f.write_str(")")
	}
}
