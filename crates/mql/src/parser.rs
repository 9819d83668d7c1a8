// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde_json::Value as Json;
use tracing::instrument;

use crate::{
	Error, Result,
	ast::{Document, Statement},
	filter::{parse_filter, parse_projection},
};

/// Parses one statement such as `db.people.find({"age": {"$gt": 30}})`.
///
/// Arguments are JSON. Object keys may be left unquoted and strings may use
/// single quotes, as in the interactive shell.
#[instrument(name = "mql::parse", level = "trace")]
pub fn parse(text: &str) -> Result<Statement> {
	let text = text.trim();
	let text = text.strip_suffix(';').unwrap_or(text).trim_end();

	if let Some(rest) = text.strip_prefix("use") {
		if rest.starts_with(char::is_whitespace) {
			let namespace = rest.trim();
			validate_name(namespace)?;
			return Ok(Statement::Use(namespace.to_string()));
		}
	}

	let Some(rest) = text.strip_prefix("db.") else {
		return Err(Error::Parse(format!("expected 'db.' or 'use', found '{}'", text)));
	};
	let Some(open) = rest.find('(') else {
		return Err(Error::Parse("expected '(' after method name".into()));
	};
	let Some(arguments) = rest[open + 1..].strip_suffix(')') else {
		return Err(Error::Parse("expected ')' at end of statement".into()));
	};

	let target = rest[..open].trim_end();
	let arguments = parse_arguments(arguments)?;

	let Some((collection, method)) = target.rsplit_once('.') else {
		return match target {
			"createCollection" => {
				expect_arguments(target, &arguments, 1, 1)?;
				match &arguments[0] {
					Json::String(name) => {
						validate_name(name)?;
						Ok(Statement::CreateCollection(name.clone()))
					}
					other => Err(Error::Parse(format!("expected a collection name, found {}", other))),
				}
			}
			other => Err(Error::Parse(format!("unknown database method '{}'", other))),
		};
	};
	validate_name(collection)?;
	let collection = collection.to_string();

	match method {
		"find" => {
			expect_arguments(method, &arguments, 0, 2)?;
			Ok(Statement::Find {
				collection,
				filter: parse_filter(arguments.first())?,
				projection: parse_projection(arguments.get(1))?,
			})
		}
		"count" | "countDocuments" => {
			expect_arguments(method, &arguments, 0, 1)?;
			Ok(Statement::Count {
				collection,
				filter: parse_filter(arguments.first())?,
			})
		}
		"insertOne" => {
			expect_arguments(method, &arguments, 1, 1)?;
			Ok(Statement::Insert {
				collection,
				documents: vec![document(&arguments[0])?],
			})
		}
		"insertMany" => {
			expect_arguments(method, &arguments, 1, 1)?;
			let Json::Array(items) = &arguments[0] else {
				return Err(Error::Parse("insertMany expects an array of documents".into()));
			};
			if items.is_empty() {
				return Err(Error::Parse("insertMany expects at least one document".into()));
			}
			Ok(Statement::Insert {
				collection,
				documents: items.iter().map(document).collect::<Result<Vec<_>>>()?,
			})
		}
		"updateMany" => {
			expect_arguments(method, &arguments, 2, 2)?;
			Ok(Statement::Update {
				collection,
				filter: parse_filter(arguments.first())?,
				set: set_document(&arguments[1])?,
			})
		}
		"deleteMany" => {
			expect_arguments(method, &arguments, 1, 1)?;
			Ok(Statement::Delete {
				collection,
				filter: parse_filter(arguments.first())?,
			})
		}
		other => Err(Error::Parse(format!("unknown collection method '{}'", other))),
	}
}

fn expect_arguments(method: &str, arguments: &[Json], min: usize, max: usize) -> Result<()> {
	if arguments.len() < min || arguments.len() > max {
		let expected = if min == max {
			min.to_string()
		} else {
			format!("{} to {}", min, max)
		};
		return Err(Error::Parse(format!(
			"{} takes {} argument(s), got {}",
			method,
			expected,
			arguments.len()
		)));
	}
	Ok(())
}

fn document(json: &Json) -> Result<Document> {
	match json {
		Json::Object(document) => Ok(document.clone()),
		other => Err(Error::Parse(format!("expected a document, found {}", other))),
	}
}

fn set_document(json: &Json) -> Result<Document> {
	let update = document(json)?;
	let mut set = None;
	for (operator, value) in update {
		match operator.as_str() {
			"$set" => set = Some(document(&value)?),
			other => return Err(Error::UnsupportedOperator(other.to_string())),
		}
	}
	set.ok_or_else(|| Error::Parse("updateMany expects a {\"$set\": {...}} document".into()))
}

fn validate_name(name: &str) -> Result<()> {
	let mut chars = name.chars();
	let valid = match chars.next() {
		Some(first) => {
			(first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
		}
		None => false,
	};
	if valid {
		Ok(())
	} else {
		Err(Error::Parse(format!("invalid name '{}'", name)))
	}
}

fn parse_arguments(text: &str) -> Result<Vec<Json>> {
	if text.trim().is_empty() {
		return Ok(Vec::new());
	}
	let json = format!("[{}]", normalize(text)?);
	Ok(serde_json::from_str(&json)?)
}

/// Rewrites shell style object literals into JSON: bare keys are quoted and
/// single quoted strings become double quoted.
fn normalize(text: &str) -> Result<String> {
	let chars: Vec<char> = text.chars().collect();
	let mut out = String::with_capacity(text.len() + 16);
	let mut i = 0;
	// Last non-whitespace character emitted outside a string
	let mut last = None;

	while i < chars.len() {
		let c = chars[i];
		match c {
			'"' => {
				out.push(c);
				i += 1;
				while i < chars.len() && chars[i] != '"' {
					if chars[i] == '\\' && i + 1 < chars.len() {
						out.push(chars[i]);
						i += 1;
					}
					out.push(chars[i]);
					i += 1;
				}
				if i >= chars.len() {
					return Err(Error::Parse("unterminated string".into()));
				}
				out.push('"');
				i += 1;
				last = Some('"');
			}
			'\'' => {
				out.push('"');
				i += 1;
				while i < chars.len() && chars[i] != '\'' {
					match chars[i] {
						'"' => out.push_str("\\\""),
						'\\' if i + 1 < chars.len() => {
							out.push('\\');
							out.push(chars[i + 1]);
							i += 1;
						}
						other => out.push(other),
					}
					i += 1;
				}
				if i >= chars.len() {
					return Err(Error::Parse("unterminated string".into()));
				}
				out.push('"');
				i += 1;
				last = Some('"');
			}
			c if (c.is_alphabetic() || c == '_' || c == '$') && matches!(last, Some('{') | Some(',')) => {
				let start = i;
				while i < chars.len() && (chars[i].is_alphanumeric() || matches!(chars[i], '_' | '$' | '.')) {
					i += 1;
				}
				let word: String = chars[start..i].iter().collect();
				let next = chars[i..].iter().find(|c| !c.is_whitespace());
				if next == Some(&':') {
					out.push('"');
					out.push_str(&word);
					out.push('"');
				} else {
					out.push_str(&word);
				}
				last = word.chars().last();
			}
			c => {
				out.push(c);
				if !c.is_whitespace() {
					last = Some(c);
				}
				i += 1;
			}
		}
	}
	Ok(out)
}
