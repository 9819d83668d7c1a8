// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_mql::{
	Error,
	ast::{CompareOp, Filter, Statement},
	parse,
};
use polystore_type::Value;

#[test]
fn test_use() {
	assert_eq!(parse("use docs").unwrap(), Statement::Use("docs".into()));
	assert_eq!(parse("  use   docs ; ").unwrap(), Statement::Use("docs".into()));
	assert!(parse("use").is_err());
	assert!(parse("use two words").is_err());
}

#[test]
fn test_create_collection() {
	assert_eq!(parse(r#"db.createCollection("people")"#).unwrap(), Statement::CreateCollection("people".into()));
	assert_eq!(parse("db.createCollection('people');").unwrap(), Statement::CreateCollection("people".into()));
	assert!(parse("db.createCollection(42)").is_err());
	assert!(parse("db.createCollection()").is_err());
}

#[test]
fn test_find_with_filter_and_projection() {
	let statement = parse("db.people.find({age: {$gt: 30}}, {name: 1})").unwrap();
	let Statement::Find {
		collection,
		filter,
		projection,
	} = statement
	else {
		panic!("expected find");
	};
	assert_eq!(collection, "people");
	assert_eq!(
		filter,
		Filter::Compare {
			path: "age".into(),
			op: CompareOp::Gt,
			value: Value::Int4(30),
		}
	);
	assert_eq!(projection.unwrap().include, vec!["name".to_string()]);
}

#[test]
fn test_find_without_arguments() {
	let statement = parse("db.people.find()").unwrap();
	assert_eq!(
		statement,
		Statement::Find {
			collection: "people".into(),
			filter: Filter::All,
			projection: None,
		}
	);
}

#[test]
fn test_count() {
	let statement = parse(r#"db.people.count({"city": "Oslo"})"#).unwrap();
	assert!(matches!(statement, Statement::Count { ref collection, .. } if collection == "people"));
}

#[test]
fn test_inserts() {
	let one = parse(r#"db.people.insertOne({"name": "ada", "age": 36})"#).unwrap();
	assert!(one.is_insert());
	assert_eq!(one.collection(), Some("people"));

	let many = parse(r#"db.people.insertMany([{"name": "ada"}, {"name": "alan"}])"#).unwrap();
	let Statement::Insert {
		documents,
		..
	} = many
	else {
		panic!("expected insert");
	};
	assert_eq!(documents.len(), 2);
	assert_eq!(documents[1]["name"], "alan");

	assert!(parse("db.people.insertMany([])").is_err());
	assert!(parse("db.people.insertOne(1)").is_err());
}

#[test]
fn test_update_many() {
	let statement = parse(r#"db.people.updateMany({"name": "ada"}, {"$set": {"age": 37}})"#).unwrap();
	let Statement::Update {
		set,
		..
	} = statement
	else {
		panic!("expected update");
	};
	assert_eq!(set["age"], 37);

	let err = parse(r#"db.people.updateMany({}, {"$inc": {"age": 1}})"#).unwrap_err();
	assert!(matches!(err, Error::UnsupportedOperator(op) if op == "$inc"));
}

#[test]
fn test_delete_many() {
	let statement = parse("db.people.deleteMany({})").unwrap();
	assert_eq!(
		statement,
		Statement::Delete {
			collection: "people".into(),
			filter: Filter::All,
		}
	);
	assert!(statement.is_mutation());
}

#[test]
fn test_malformed() {
	for text in [
		"",
		"select * from people",
		"db.people.find(",
		"db.people.find({)",
		"db.people.aggregate([])",
		"db.dropDatabase()",
		"db.bad-name.find()",
	] {
		assert!(parse(text).is_err(), "'{}' should not parse", text);
	}
}

#[test]
fn test_invalid_json_surfaces_serde_error() {
	let err = parse("db.people.find({\"a\": })").unwrap_err();
	assert!(matches!(err, Error::Json(_)));
}
