// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeSet;

use polystore_catalog::CollectionDef;
use polystore_mql::{
	ast::{CompareOp, Document, Filter, Projection},
	document_value,
};
use polystore_plan::{
	AggregateNode, BinaryOp, Expression, Field, FilterNode, ModifyOperation, PlanNode, PlanRef, ProjectNode, RowShape,
	ScanNode, Source, TableModifyNode, ValuesNode, conjunction,
};
use polystore_type::{Type, Value};

use crate::{Error, Result};

/// The one field every document row has.
const DOCUMENT_FIELD: &str = "_doc";

pub(crate) fn scan(collection: &CollectionDef) -> PlanRef {
	PlanNode::Scan(ScanNode {
		source: Source::Collection(collection.id),
		name: collection.name.clone(),
		shape: RowShape::document(),
		partitions: collection.partitions.clone(),
	})
	.into_ref()
}

pub(crate) fn filtered_scan(collection: &CollectionDef, filter: &Filter) -> PlanRef {
	let input = scan(collection);
	match condition(filter) {
		Some(condition) => PlanNode::Filter(FilterNode {
			input,
			condition,
		})
		.into_ref(),
		None => input,
	}
}

/// `None` when the filter accepts every document.
pub(crate) fn condition(filter: &Filter) -> Option<Expression> {
	match filter {
		Filter::All => None,
		Filter::Compare {
			path,
			op,
			value,
		} => Some(compare(path, *op, value)),
		Filter::And(filters) => conjunction(filters.iter().filter_map(condition).collect()),
		Filter::Or(filters) => {
			let mut alternatives = Vec::with_capacity(filters.len());
			for filter in filters {
				// one unrestricted branch accepts everything
				alternatives.push(condition(filter)?);
			}
			alternatives.into_iter().reduce(|l, r| Expression::binary(BinaryOp::Or, l, r))
		}
	}
}

fn compare(path: &str, op: CompareOp, value: &Value) -> Expression {
	let field = Expression::Field(path.to_string());
	match (op, value.is_undefined()) {
		(CompareOp::Eq, true) => Expression::IsNull(Box::new(field)),
		(CompareOp::Ne, true) => Expression::Not(Box::new(Expression::IsNull(Box::new(field)))),
		(op, _) => {
			let op = match op {
				CompareOp::Eq => BinaryOp::Equal,
				CompareOp::Ne => BinaryOp::NotEqual,
				CompareOp::Gt => BinaryOp::GreaterThan,
				CompareOp::Gte => BinaryOp::GreaterThanEqual,
				CompareOp::Lt => BinaryOp::LessThan,
				CompareOp::Lte => BinaryOp::LessThanEqual,
			};
			Expression::binary(op, field, Expression::Constant(value.clone()))
		}
	}
}

/// Keeps the listed paths. `_id` comes first unless excluded.
pub(crate) fn project(input: PlanRef, projection: &Projection) -> PlanRef {
	if projection.include.is_empty() {
		return input;
	}
	let mut names = Vec::with_capacity(projection.include.len() + 1);
	if !projection.exclude_id && !projection.include.iter().any(|p| p == "_id") {
		names.push("_id".to_string());
	}
	names.extend(projection.include.iter().cloned());

	PlanNode::Project(ProjectNode {
		input,
		expressions: names.iter().map(|name| Expression::Field(name.clone())).collect(),
		names,
	})
	.into_ref()
}

pub(crate) fn count(input: PlanRef) -> PlanRef {
	PlanNode::Aggregate(AggregateNode {
		input,
		name: "count".to_string(),
	})
	.into_ref()
}

/// One row per document over the sorted union of their top-level keys.
/// Absent keys are undefined.
pub(crate) fn insert(collection: &CollectionDef, documents: &[Document]) -> Result<PlanRef> {
	let keys: Vec<String> = documents.iter().flat_map(|d| d.keys().cloned()).collect::<BTreeSet<_>>().into_iter().collect();

	let mut types: Vec<Option<Type>> = vec![None; keys.len()];
	let mut rows = Vec::with_capacity(documents.len());
	for document in documents {
		let mut row = Vec::with_capacity(keys.len());
		for (index, key) in keys.iter().enumerate() {
			let value = match document.get(key) {
				Some(json) => document_value(key, json).map_err(|e| Error::validation(e.to_string()))?,
				None => Value::Undefined,
			};
			if !value.is_undefined() {
				let ty = value.get_type();
				types[index] = match types[index] {
					None => Some(ty),
					Some(seen) if seen == ty => Some(seen),
					Some(_) => Some(Type::Document),
				};
			}
			row.push(Expression::Constant(value));
		}
		rows.push(row);
	}

	let shape = RowShape::new(
		keys.iter().zip(&types).map(|(key, ty)| Field::new(key.clone(), ty.unwrap_or(Type::Undefined))).collect(),
	);
	let input = PlanNode::Values(ValuesNode {
		rows,
		shape,
	})
	.into_ref();

	let sources = (0..keys.len()).map(Expression::Column).collect();
	Ok(modify(collection, input, ModifyOperation::Insert, keys, sources))
}

pub(crate) fn update(collection: &CollectionDef, filter: &Filter, set: &Document) -> Result<PlanRef> {
	let mut columns = Vec::with_capacity(set.len());
	let mut sources = Vec::with_capacity(set.len());
	for (key, json) in set {
		let value = document_value(key, json).map_err(|e| Error::validation(e.to_string()))?;
		columns.push(key.clone());
		sources.push(Expression::Constant(value));
	}
	Ok(modify(collection, filtered_scan(collection, filter), ModifyOperation::Update, columns, sources))
}

pub(crate) fn delete(collection: &CollectionDef, filter: &Filter) -> PlanRef {
	modify(collection, filtered_scan(collection, filter), ModifyOperation::Delete, vec![], vec![])
}

fn modify(
	collection: &CollectionDef,
	input: PlanRef,
	operation: ModifyOperation,
	updated_columns: Vec<String>,
	source_expressions: Vec<Expression>,
) -> PlanRef {
	PlanNode::TableModify(TableModifyNode {
		input,
		target: Source::Collection(collection.id),
		name: collection.name.clone(),
		operation,
		updated_columns,
		source_expressions,
		fields: vec![DOCUMENT_FIELD.to_string()],
		partitions: collection.partitions.clone(),
	})
	.into_ref()
}
