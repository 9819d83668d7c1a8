// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_sql::{
	Conformance, Error, ParserConfig,
	ast::{
		BinaryOperator, Expr, InsertSource, JoinType, ObjectName, Query, SelectItem, SetOperator, Statement,
	},
	parse,
};
use polystore_type::{Date, Type, Value};

fn select(sql: &str) -> polystore_sql::ast::SelectStatement {
	match parse(sql, &ParserConfig::default()).unwrap() {
		Statement::Query(Query::Select(select)) => *select,
		other => panic!("expected a plain select, got {:?}", other),
	}
}

#[test]
fn test_select_with_join_and_alias() {
	let select = select("SELECT u.name AS who, o.total FROM users u LEFT OUTER JOIN orders AS o ON u.id = o.user_id");
	assert!(!select.distinct);
	assert_eq!(select.items.len(), 2);
	assert_eq!(
		select.items[0],
		SelectItem::Expr {
			expr: Expr::qualified("u", "name"),
			alias: Some("who".into()),
		}
	);

	let from = select.from.unwrap();
	assert_eq!(from.name, ObjectName::new("users"));
	assert_eq!(from.reference_name(), "u");

	assert_eq!(select.joins.len(), 1);
	assert_eq!(select.joins[0].join_type, JoinType::Left);
	assert_eq!(select.joins[0].table.reference_name(), "o");
	assert_eq!(
		select.joins[0].on,
		Expr::binary(BinaryOperator::Eq, Expr::qualified("u", "id"), Expr::qualified("o", "user_id"))
	);
}

#[test]
fn test_select_distinct_qualified_table() {
	let select = select("SELECT DISTINCT * FROM docs.people");
	assert!(select.distinct);
	assert_eq!(select.items, vec![SelectItem::Wildcard]);
	assert_eq!(select.from.unwrap().name, ObjectName::qualified("docs", "people"));
}

#[test]
fn test_exists_subquery() {
	let select = select("SELECT * FROM users u WHERE NOT EXISTS (SELECT * FROM orders o WHERE o.user_id = u.id)");
	let Some(Expr::Exists {
		query,
		negated,
	}) = select.selection
	else {
		panic!("expected EXISTS");
	};
	assert!(negated);
	assert!(matches!(*query, Query::Select(_)));
}

#[test]
fn test_in_subquery() {
	let select = select("SELECT id FROM users WHERE id IN (SELECT user_id FROM orders)");
	assert!(matches!(select.selection, Some(Expr::InSubquery { negated: false, .. })));
}

#[test]
fn test_set_operations_bind_intersect_tighter() {
	let statement = parse(
		"SELECT id FROM a UNION ALL SELECT id FROM b INTERSECT SELECT id FROM c",
		&ParserConfig::default(),
	)
	.unwrap();
	let Statement::Query(Query::SetOperation {
		op,
		all,
		right,
		..
	}) = statement
	else {
		panic!("expected set operation");
	};
	assert_eq!(op, SetOperator::Union);
	assert!(all);
	assert!(matches!(
		*right,
		Query::SetOperation {
			op: SetOperator::Intersect,
			all: false,
			..
		}
	));
}

#[test]
fn test_insert_values() {
	let statement =
		parse("INSERT INTO users (id, name) VALUES (1, 'a'), (2, 'b');", &ParserConfig::default()).unwrap();
	let Statement::Insert(insert) = statement else {
		panic!("expected insert");
	};
	assert_eq!(insert.table, ObjectName::new("users"));
	assert_eq!(insert.columns, vec!["id".to_string(), "name".to_string()]);
	let InsertSource::Values(rows) = insert.source else {
		panic!("expected VALUES");
	};
	assert_eq!(rows.len(), 2);
	assert_eq!(rows[1][1], Expr::Literal(Value::utf8("b")));
}

#[test]
fn test_insert_select() {
	let statement = parse("INSERT INTO archive SELECT * FROM users", &ParserConfig::default()).unwrap();
	let Statement::Insert(insert) = statement else {
		panic!("expected insert");
	};
	assert!(insert.columns.is_empty());
	assert!(matches!(insert.source, InsertSource::Query(_)));
}

#[test]
fn test_update_and_delete() {
	let Statement::Update(update) =
		parse("UPDATE users SET name = 'x', age = age + 1 WHERE id = ?", &ParserConfig::default()).unwrap()
	else {
		panic!("expected update");
	};
	assert_eq!(update.assignments.len(), 2);
	assert_eq!(update.assignments[1].column, "age");
	assert!(update.selection.is_some());

	let Statement::Delete(delete) = parse("DELETE FROM users", &ParserConfig::default()).unwrap() else {
		panic!("expected delete");
	};
	assert_eq!(delete.table, ObjectName::new("users"));
	assert!(delete.selection.is_none());
}

#[test]
fn test_create_table() {
	let Statement::CreateTable(create) = parse(
		"CREATE TABLE events (id BIGINT NOT NULL, title VARCHAR(64), day DATE, price DECIMAL(10, 2) NULL)",
		&ParserConfig::default(),
	)
	.unwrap() else {
		panic!("expected create table");
	};
	let columns: Vec<(&str, Type, bool)> =
		create.columns.iter().map(|c| (c.name.as_str(), c.ty, c.nullable)).collect();
	assert_eq!(
		columns,
		vec![
			("id", Type::Int8, false),
			("title", Type::Utf8, true),
			("day", Type::Date, true),
			("price", Type::Decimal, true),
		]
	);
}

#[test]
fn test_typed_literals() {
	let select = select("SELECT DATE '2024-02-29', TIMESTAMP '2024-01-01 10:00:00', TRUE, NULL");
	let values: Vec<Value> = select
		.items
		.into_iter()
		.map(|item| match item {
			SelectItem::Expr {
				expr: Expr::Literal(value),
				..
			} => value,
			other => panic!("expected literal, got {:?}", other),
		})
		.collect();
	assert_eq!(values[0], Value::Date(Date::new(2024, 2, 29).unwrap()));
	assert_eq!(values[1].get_type(), Type::DateTime);
	assert_eq!(values[2], Value::Boolean(true));
	assert!(values[3].is_undefined());
}

#[test]
fn test_invalid_date_literal_reports_position() {
	let err = parse("SELECT DATE '2023-02-29'", &ParserConfig::default()).unwrap_err();
	assert_eq!(err.position(), 7);
}

#[test]
fn test_case_sensitivity() {
	let folded = select("SELECT Name FROM Users");
	assert_eq!(folded.from.unwrap().name.name, "users");

	let config = ParserConfig::default().with_case_sensitive(true);
	let Statement::Query(Query::Select(kept)) = parse("SELECT Name FROM Users", &config).unwrap() else {
		panic!("expected select");
	};
	assert_eq!(kept.from.unwrap().name.name, "Users");

	let quoted = select(r#"SELECT * FROM "Users""#);
	assert_eq!(quoted.from.unwrap().name.name, "Users");
}

#[test]
fn test_strict_rejects_trailing_semicolon() {
	let config = ParserConfig::default().with_conformance(Conformance::Strict);
	let err = parse("SELECT 1;", &config).unwrap_err();
	assert_eq!(
		err,
		Error::Parse {
			message: "trailing ';' is not allowed".into(),
			position: 8,
		}
	);
	assert!(parse("SELECT 1;", &ParserConfig::default()).is_ok());
}

#[test]
fn test_lenient_trailing_comma() {
	let config = ParserConfig::default().with_conformance(Conformance::Lenient);
	assert!(parse("SELECT a, b, FROM t", &config).is_ok());
	assert!(parse("SELECT a, b, FROM t", &ParserConfig::default()).is_err());
}

#[test]
fn test_malformed_statements() {
	for sql in ["", "SELECT", "SELECT * FROM", "INSERT users VALUES (1)", "SELECT 1 2", "DROP TABLE t"] {
		let result = parse(sql, &ParserConfig::default());
		assert!(result.is_err(), "'{}' should not parse", sql);
	}
}

#[test]
fn test_scalar_subquery_rejected() {
	let err = parse("SELECT (SELECT 1)", &ParserConfig::default()).unwrap_err();
	assert!(err.to_string().contains("scalar subqueries"));
}
