// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_type::{Decimal, Value};
use serde_json::Value as Json;

use crate::{
	Error, Result,
	ast::{CompareOp, Document, Filter, Projection},
};

pub(crate) fn parse_filter(argument: Option<&Json>) -> Result<Filter> {
	match argument {
		None | Some(Json::Null) => Ok(Filter::All),
		Some(Json::Object(document)) => parse_document_filter(document),
		Some(other) => Err(Error::Parse(format!("expected a filter document, found {}", other))),
	}
}

fn parse_document_filter(document: &Document) -> Result<Filter> {
	let mut parts = Vec::with_capacity(document.len());
	for (key, value) in document {
		match key.as_str() {
			"$and" | "$or" => {
				let Some(items) = value.as_array() else {
					return Err(Error::UnsupportedValue {
						field: key.clone(),
						reason: "expected an array of filters".into(),
					});
				};
				let filters = items
					.iter()
					.map(|item| match item.as_object() {
						Some(document) => parse_document_filter(document),
						None => Err(Error::UnsupportedValue {
							field: key.clone(),
							reason: "expected an array of filters".into(),
						}),
					})
					.collect::<Result<Vec<_>>>()?;
				parts.push(if key == "$and" {
					Filter::And(filters)
				} else {
					Filter::Or(filters)
				});
			}
			operator if operator.starts_with('$') => return Err(Error::UnsupportedOperator(operator.to_string())),
			path => parse_field(path, value, &mut parts)?,
		}
	}

	Ok(match parts.len() {
		0 => Filter::All,
		1 => parts.remove(0),
		_ => Filter::And(parts),
	})
}

fn parse_field(path: &str, value: &Json, parts: &mut Vec<Filter>) -> Result<()> {
	match value {
		Json::Object(operators) if operators.keys().any(|k| k.starts_with('$')) => {
			for (name, operand) in operators {
				let op = CompareOp::from_operator(name)
					.ok_or_else(|| Error::UnsupportedOperator(name.clone()))?;
				parts.push(Filter::Compare {
					path: path.to_string(),
					op,
					value: scalar_value(path, operand)?,
				});
			}
		}
		other => parts.push(Filter::Compare {
			path: path.to_string(),
			op: CompareOp::Eq,
			value: scalar_value(path, other)?,
		}),
	}
	Ok(())
}

pub(crate) fn parse_projection(argument: Option<&Json>) -> Result<Option<Projection>> {
	let document = match argument {
		None | Some(Json::Null) => return Ok(None),
		Some(Json::Object(document)) => document,
		Some(other) => return Err(Error::Parse(format!("expected a projection document, found {}", other))),
	};

	let mut projection = Projection {
		include: Vec::new(),
		exclude_id: false,
	};
	for (field, flag) in document {
		let included = match flag {
			Json::Bool(b) => *b,
			Json::Number(n) => n.as_f64() != Some(0.0),
			_ => {
				return Err(Error::UnsupportedValue {
					field: field.clone(),
					reason: "projection flags are 0, 1, true or false".into(),
				});
			}
		};
		match (field.as_str(), included) {
			(_, true) => projection.include.push(field.clone()),
			("_id", false) => projection.exclude_id = true,
			(_, false) => {
				return Err(Error::UnsupportedValue {
					field: field.clone(),
					reason: "exclusion projections are not supported".into(),
				});
			}
		}
	}
	Ok(Some(projection))
}

/// Converts a scalar JSON value. Integers take Int4 when they fit, then Int8,
/// everything else numeric becomes a decimal.
pub fn scalar_value(field: &str, json: &Json) -> Result<Value> {
	match json {
		Json::Null => Ok(Value::Undefined),
		Json::Bool(b) => Ok(Value::Boolean(*b)),
		Json::String(s) => Ok(Value::Utf8(s.clone())),
		Json::Number(n) => {
			if let Some(i) = n.as_i64() {
				return Ok(match i32::try_from(i) {
					Ok(i) => Value::Int4(i),
					Err(_) => Value::Int8(i),
				});
			}
			Decimal::parse(&n.to_string()).map(Value::Decimal).map_err(|e| Error::UnsupportedValue {
				field: field.to_string(),
				reason: e.to_string(),
			})
		}
		Json::Array(_) | Json::Object(_) => Err(Error::UnsupportedValue {
			field: field.to_string(),
			reason: "nested documents and arrays can not be compared".into(),
		}),
	}
}

/// Like [`scalar_value`], but keeps nested documents and arrays as their JSON
/// text.
pub fn document_value(field: &str, json: &Json) -> Result<Value> {
	match json {
		Json::Array(_) | Json::Object(_) => Ok(Value::Utf8(json.to_string())),
		scalar => scalar_value(field, scalar),
	}
}
