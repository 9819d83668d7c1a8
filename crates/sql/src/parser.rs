// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_type::{Date, DateTime, Decimal, Interval, Time, Type, TypeError, Value};
use tracing::instrument;

use crate::{
	Error, ParserConfig, Result,
	ast::{
		Assignment, BinaryOperator, ColumnDefinition, CreateTableStatement, DeleteStatement, Expr, InsertSource,
		InsertStatement, JoinClause, JoinType, ObjectName, Query, SelectItem, SelectStatement, SetOperator,
		Statement, TableRef, UnaryOperator, UpdateStatement,
	},
	token::{Keyword, Token, TokenKind, tokenize},
};

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
enum Precedence {
	None,
	LogicOr,
	LogicAnd,
	LogicNot,
	Comparison,
	Term,
	Factor,
	Prefix,
}

/// Parses exactly one statement, optionally followed by `;`.
#[instrument(name = "sql::parse", level = "trace", skip(config))]
pub fn parse(sql: &str, config: &ParserConfig) -> Result<Statement> {
	let tokens = tokenize(sql, config)?;
	let mut parser = Parser::new(tokens, config, sql.chars().count());
	let statement = parser.parse_statement()?;
	parser.finish()?;
	Ok(statement)
}

struct Parser<'a> {
	tokens: Vec<Token>,
	position: usize,
	config: &'a ParserConfig,
	end: usize,
	parameters: usize,
}

impl<'a> Parser<'a> {
	fn new(tokens: Vec<Token>, config: &'a ParserConfig, end: usize) -> Self {
		Self {
			tokens,
			position: 0,
			config,
			end,
			parameters: 0,
		}
	}

	fn finish(&mut self) -> Result<()> {
		let position = self.current_position();
		if self.consume_if(&TokenKind::Semicolon) && self.config.is_strict() {
			return Err(Error::parse("trailing ';' is not allowed", position));
		}
		if !self.is_eof() {
			return Err(self.unexpected("end of statement"));
		}
		Ok(())
	}

	fn parse_statement(&mut self) -> Result<Statement> {
		match self.peek() {
			Some(TokenKind::Keyword(Keyword::Select)) | Some(TokenKind::OpenParen) => {
				Ok(Statement::Query(self.parse_query()?))
			}
			Some(TokenKind::Keyword(Keyword::Insert)) => Ok(Statement::Insert(self.parse_insert()?)),
			Some(TokenKind::Keyword(Keyword::Update)) => Ok(Statement::Update(self.parse_update()?)),
			Some(TokenKind::Keyword(Keyword::Delete)) => Ok(Statement::Delete(self.parse_delete()?)),
			Some(TokenKind::Keyword(Keyword::Create)) => Ok(Statement::CreateTable(self.parse_create_table()?)),
			_ => Err(self.unexpected("statement")),
		}
	}

	// UNION and EXCEPT bind looser than INTERSECT
	fn parse_query(&mut self) -> Result<Query> {
		let mut left = self.parse_intersect()?;
		loop {
			let op = if self.consume_if_keyword(Keyword::Union) {
				SetOperator::Union
			} else if self.consume_if_keyword(Keyword::Except) {
				SetOperator::Except
			} else {
				break;
			};
			let all = self.consume_if_keyword(Keyword::All);
			let right = self.parse_intersect()?;
			left = Query::SetOperation {
				op,
				all,
				left: Box::new(left),
				right: Box::new(right),
			};
		}
		Ok(left)
	}

	fn parse_intersect(&mut self) -> Result<Query> {
		let mut left = self.parse_query_primary()?;
		while self.consume_if_keyword(Keyword::Intersect) {
			let all = self.consume_if_keyword(Keyword::All);
			let right = self.parse_query_primary()?;
			left = Query::SetOperation {
				op: SetOperator::Intersect,
				all,
				left: Box::new(left),
				right: Box::new(right),
			};
		}
		Ok(left)
	}

	fn parse_query_primary(&mut self) -> Result<Query> {
		if self.consume_if(&TokenKind::OpenParen) {
			let query = self.parse_query()?;
			self.consume(&TokenKind::CloseParen)?;
			return Ok(query);
		}
		self.consume_keyword(Keyword::Select)?;
		Ok(Query::Select(Box::new(self.parse_select_body()?)))
	}

	fn parse_select_body(&mut self) -> Result<SelectStatement> {
		let distinct = self.consume_if_keyword(Keyword::Distinct);
		if !distinct {
			self.consume_if_keyword(Keyword::All);
		}

		let mut items = Vec::new();
		loop {
			items.push(self.parse_select_item()?);
			if !self.consume_if(&TokenKind::Comma) {
				break;
			}
			if self.config.is_lenient() && self.peek_keyword(Keyword::From) {
				break;
			}
		}

		let from = if self.consume_if_keyword(Keyword::From) {
			Some(self.parse_table_ref()?)
		} else {
			None
		};

		let mut joins = Vec::new();
		if from.is_some() {
			while let Some(join_type) = self.parse_join_type()? {
				let table = self.parse_table_ref()?;
				self.consume_keyword(Keyword::On)?;
				let on = self.parse_expr(Precedence::None)?;
				joins.push(JoinClause {
					join_type,
					table,
					on,
				});
			}
		}

		let selection = self.parse_where()?;

		Ok(SelectStatement {
			distinct,
			items,
			from,
			joins,
			selection,
		})
	}

	fn parse_select_item(&mut self) -> Result<SelectItem> {
		if self.consume_if(&TokenKind::Asterisk) {
			return Ok(SelectItem::Wildcard);
		}
		let expr = self.parse_expr(Precedence::None)?;
		let alias = self.parse_alias()?;
		Ok(SelectItem::Expr {
			expr,
			alias,
		})
	}

	fn parse_join_type(&mut self) -> Result<Option<JoinType>> {
		if self.consume_if_keyword(Keyword::Join) {
			return Ok(Some(JoinType::Inner));
		}
		if self.consume_if_keyword(Keyword::Inner) {
			self.consume_keyword(Keyword::Join)?;
			return Ok(Some(JoinType::Inner));
		}
		if self.consume_if_keyword(Keyword::Left) {
			self.consume_if_keyword(Keyword::Outer);
			self.consume_keyword(Keyword::Join)?;
			return Ok(Some(JoinType::Left));
		}
		Ok(None)
	}

	fn parse_where(&mut self) -> Result<Option<Expr>> {
		if self.consume_if_keyword(Keyword::Where) {
			Ok(Some(self.parse_expr(Precedence::None)?))
		} else {
			Ok(None)
		}
	}

	fn parse_alias(&mut self) -> Result<Option<String>> {
		if self.consume_if_keyword(Keyword::As) {
			return Ok(Some(self.parse_identifier()?));
		}
		match self.peek() {
			Some(TokenKind::Ident(_)) | Some(TokenKind::QuotedIdent(_)) => Ok(Some(self.parse_identifier()?)),
			_ => Ok(None),
		}
	}

	fn parse_table_ref(&mut self) -> Result<TableRef> {
		let name = self.parse_object_name()?;
		let alias = self.parse_alias()?;
		Ok(TableRef {
			name,
			alias,
		})
	}

	fn parse_object_name(&mut self) -> Result<ObjectName> {
		let first = self.parse_identifier()?;
		if self.consume_if(&TokenKind::Dot) {
			let name = self.parse_identifier()?;
			return Ok(ObjectName::qualified(first, name));
		}
		Ok(ObjectName::new(first))
	}

	fn parse_identifier(&mut self) -> Result<String> {
		match self.peek() {
			Some(TokenKind::Ident(_)) | Some(TokenKind::QuotedIdent(_)) => {}
			_ => return Err(self.unexpected("identifier")),
		}
		match self.advance()?.kind {
			TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => Ok(name),
			_ => unreachable!(),
		}
	}

	fn parse_insert(&mut self) -> Result<InsertStatement> {
		self.consume_keyword(Keyword::Insert)?;
		self.consume_keyword(Keyword::Into)?;
		let table = self.parse_object_name()?;

		let mut columns = Vec::new();
		if self.peek() == Some(&TokenKind::OpenParen) && !self.peek_nth_is_keyword(1, Keyword::Select) {
			self.advance()?;
			loop {
				columns.push(self.parse_identifier()?);
				if !self.consume_if(&TokenKind::Comma) {
					break;
				}
			}
			self.consume(&TokenKind::CloseParen)?;
		}

		let source = if self.consume_if_keyword(Keyword::Values) {
			let mut rows = Vec::new();
			loop {
				self.consume(&TokenKind::OpenParen)?;
				rows.push(self.parse_expr_list()?);
				self.consume(&TokenKind::CloseParen)?;
				if !self.consume_if(&TokenKind::Comma) {
					break;
				}
			}
			InsertSource::Values(rows)
		} else if self.peek_keyword(Keyword::Select) || self.peek() == Some(&TokenKind::OpenParen) {
			InsertSource::Query(Box::new(self.parse_query()?))
		} else {
			return Err(self.unexpected("VALUES or SELECT"));
		};

		Ok(InsertStatement {
			table,
			columns,
			source,
		})
	}

	fn parse_update(&mut self) -> Result<UpdateStatement> {
		self.consume_keyword(Keyword::Update)?;
		let table = self.parse_object_name()?;
		self.consume_keyword(Keyword::Set)?;

		let mut assignments = Vec::new();
		loop {
			let column = self.parse_identifier()?;
			self.consume(&TokenKind::Eq)?;
			let value = self.parse_expr(Precedence::None)?;
			assignments.push(Assignment {
				column,
				value,
			});
			if !self.consume_if(&TokenKind::Comma) {
				break;
			}
		}

		let selection = self.parse_where()?;
		Ok(UpdateStatement {
			table,
			assignments,
			selection,
		})
	}

	fn parse_delete(&mut self) -> Result<DeleteStatement> {
		self.consume_keyword(Keyword::Delete)?;
		self.consume_keyword(Keyword::From)?;
		let table = self.parse_object_name()?;
		let selection = self.parse_where()?;
		Ok(DeleteStatement {
			table,
			selection,
		})
	}

	fn parse_create_table(&mut self) -> Result<CreateTableStatement> {
		self.consume_keyword(Keyword::Create)?;
		self.consume_keyword(Keyword::Table)?;
		let name = self.parse_object_name()?;
		self.consume(&TokenKind::OpenParen)?;

		let mut columns = Vec::new();
		loop {
			let column = self.parse_identifier()?;
			let ty = self.parse_type()?;
			let nullable = if self.consume_if_keyword(Keyword::Not) {
				self.consume_keyword(Keyword::Null)?;
				false
			} else {
				self.consume_if_keyword(Keyword::Null);
				true
			};
			columns.push(ColumnDefinition {
				name: column,
				ty,
				nullable,
			});
			if !self.consume_if(&TokenKind::Comma) {
				break;
			}
		}
		self.consume(&TokenKind::CloseParen)?;

		Ok(CreateTableStatement {
			name,
			columns,
		})
	}

	fn parse_type(&mut self) -> Result<Type> {
		let position = self.current_position();
		let token = self.advance()?;
		let ty = match token.kind {
			TokenKind::Keyword(Keyword::Date) => Type::Date,
			TokenKind::Keyword(Keyword::Time) => Type::Time,
			TokenKind::Keyword(Keyword::Timestamp) => Type::DateTime,
			TokenKind::Keyword(Keyword::Interval) => Type::Interval,
			TokenKind::Ident(name) => match name.to_ascii_lowercase().as_str() {
				"tinyint" | "int1" => Type::Int1,
				"smallint" | "int2" => Type::Int2,
				"int" | "integer" | "int4" => Type::Int4,
				"bigint" | "int8" => Type::Int8,
				"decimal" | "numeric" => Type::Decimal,
				"text" | "varchar" | "char" | "utf8" => Type::Utf8,
				"boolean" | "bool" => Type::Boolean,
				"datetime" => Type::DateTime,
				_ => return Err(Error::parse(format!("unknown type '{}'", name), position)),
			},
			other => return Err(Error::parse(format!("expected type, found {}", other), position)),
		};

		// Length and precision modifiers are accepted and ignored
		if self.consume_if(&TokenKind::OpenParen) {
			loop {
				match self.peek() {
					Some(TokenKind::Number(_)) => {
						self.advance()?;
					}
					_ => return Err(self.unexpected("type modifier")),
				}
				if !self.consume_if(&TokenKind::Comma) {
					break;
				}
			}
			self.consume(&TokenKind::CloseParen)?;
		}
		Ok(ty)
	}

	fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
		let mut result = Vec::new();
		loop {
			result.push(self.parse_expr(Precedence::None)?);
			if !self.consume_if(&TokenKind::Comma) {
				break;
			}
		}
		Ok(result)
	}

	fn parse_expr(&mut self, precedence: Precedence) -> Result<Expr> {
		let mut left = self.parse_prefix()?;
		while !self.is_eof() {
			if precedence >= self.current_precedence() {
				break;
			}
			left = self.parse_infix(left)?;
		}
		Ok(left)
	}

	fn current_precedence(&self) -> Precedence {
		match self.peek() {
			Some(TokenKind::Keyword(Keyword::Or)) => Precedence::LogicOr,
			Some(TokenKind::Keyword(Keyword::And)) => Precedence::LogicAnd,
			Some(TokenKind::Eq)
			| Some(TokenKind::NotEq)
			| Some(TokenKind::Lt)
			| Some(TokenKind::LtEq)
			| Some(TokenKind::Gt)
			| Some(TokenKind::GtEq)
			| Some(TokenKind::Keyword(Keyword::Is))
			| Some(TokenKind::Keyword(Keyword::In)) => Precedence::Comparison,
			Some(TokenKind::Keyword(Keyword::Not)) if self.peek_nth_is_keyword(1, Keyword::In) => {
				Precedence::Comparison
			}
			Some(TokenKind::Plus) | Some(TokenKind::Minus) => Precedence::Term,
			Some(TokenKind::Asterisk) | Some(TokenKind::Slash) | Some(TokenKind::Percent) => Precedence::Factor,
			_ => Precedence::None,
		}
	}

	fn parse_infix(&mut self, left: Expr) -> Result<Expr> {
		let token = self.advance()?;
		let (op, precedence) = match token.kind {
			TokenKind::Keyword(Keyword::Or) => (BinaryOperator::Or, Precedence::LogicOr),
			TokenKind::Keyword(Keyword::And) => (BinaryOperator::And, Precedence::LogicAnd),
			TokenKind::Eq => (BinaryOperator::Eq, Precedence::Comparison),
			TokenKind::NotEq => (BinaryOperator::NotEq, Precedence::Comparison),
			TokenKind::Lt => (BinaryOperator::Lt, Precedence::Comparison),
			TokenKind::LtEq => (BinaryOperator::LtEq, Precedence::Comparison),
			TokenKind::Gt => (BinaryOperator::Gt, Precedence::Comparison),
			TokenKind::GtEq => (BinaryOperator::GtEq, Precedence::Comparison),
			TokenKind::Plus => (BinaryOperator::Plus, Precedence::Term),
			TokenKind::Minus => (BinaryOperator::Minus, Precedence::Term),
			TokenKind::Asterisk => (BinaryOperator::Multiply, Precedence::Factor),
			TokenKind::Slash => (BinaryOperator::Divide, Precedence::Factor),
			TokenKind::Percent => (BinaryOperator::Modulo, Precedence::Factor),
			TokenKind::Keyword(Keyword::Is) => {
				let negated = self.consume_if_keyword(Keyword::Not);
				self.consume_keyword(Keyword::Null)?;
				return Ok(Expr::IsNull {
					expr: Box::new(left),
					negated,
				});
			}
			TokenKind::Keyword(Keyword::In) => return self.parse_in(left, false),
			TokenKind::Keyword(Keyword::Not) => {
				self.consume_keyword(Keyword::In)?;
				return self.parse_in(left, true);
			}
			other => return Err(Error::parse(format!("unexpected {}", other), token.position)),
		};
		let right = self.parse_expr(precedence)?;
		Ok(Expr::binary(op, left, right))
	}

	fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<Expr> {
		self.consume(&TokenKind::OpenParen)?;
		let result = if self.peek_keyword(Keyword::Select) {
			Expr::InSubquery {
				expr: Box::new(expr),
				query: Box::new(self.parse_query()?),
				negated,
			}
		} else {
			Expr::InList {
				expr: Box::new(expr),
				list: self.parse_expr_list()?,
				negated,
			}
		};
		self.consume(&TokenKind::CloseParen)?;
		Ok(result)
	}

	fn parse_exists(&mut self, negated: bool) -> Result<Expr> {
		self.consume_keyword(Keyword::Exists)?;
		self.consume(&TokenKind::OpenParen)?;
		let query = self.parse_query()?;
		self.consume(&TokenKind::CloseParen)?;
		Ok(Expr::Exists {
			query: Box::new(query),
			negated,
		})
	}

	fn parse_prefix(&mut self) -> Result<Expr> {
		if self.is_eof() {
			return Err(self.unexpected("expression"));
		}
		if self.peek_keyword(Keyword::Exists) {
			return self.parse_exists(false);
		}

		let token = self.advance()?;
		let position = token.position;
		match token.kind {
			TokenKind::Number(text) => Ok(Expr::Literal(number_literal(&text, position)?)),
			TokenKind::StringLit(text) => Ok(Expr::Literal(Value::Utf8(text))),
			TokenKind::Keyword(Keyword::True) => Ok(Expr::Literal(Value::Boolean(true))),
			TokenKind::Keyword(Keyword::False) => Ok(Expr::Literal(Value::Boolean(false))),
			TokenKind::Keyword(Keyword::Null) => Ok(Expr::Literal(Value::Undefined)),
			TokenKind::Keyword(Keyword::Date) => {
				let text = self.parse_string("date literal")?;
				Ok(Expr::Literal(Value::Date(Date::parse(&text).map_err(|e| at(e, position))?)))
			}
			TokenKind::Keyword(Keyword::Time) => {
				let text = self.parse_string("time literal")?;
				Ok(Expr::Literal(Value::Time(Time::parse(&text).map_err(|e| at(e, position))?)))
			}
			TokenKind::Keyword(Keyword::Timestamp) => {
				let text = self.parse_string("timestamp literal")?;
				Ok(Expr::Literal(Value::DateTime(DateTime::parse(&text).map_err(|e| at(e, position))?)))
			}
			TokenKind::Keyword(Keyword::Interval) => Ok(Expr::Literal(Value::Interval(self.parse_interval(position)?))),
			TokenKind::Question => {
				let index = self.parameters;
				self.parameters += 1;
				Ok(Expr::Parameter(index))
			}
			TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
				if self.consume_if(&TokenKind::Dot) {
					let column = self.parse_identifier()?;
					return Ok(Expr::qualified(name, column));
				}
				Ok(Expr::column(name))
			}
			TokenKind::OpenParen => {
				if self.peek_keyword(Keyword::Select) {
					return Err(Error::parse("scalar subqueries are not supported", position));
				}
				let expr = self.parse_expr(Precedence::None)?;
				self.consume(&TokenKind::CloseParen)?;
				Ok(expr)
			}
			TokenKind::Minus => match self.parse_expr(Precedence::Prefix)? {
				Expr::Literal(value) => Ok(Expr::Literal(value.negate().map_err(|e| at(e, position))?)),
				expr => Ok(Expr::Unary {
					op: UnaryOperator::Minus,
					expr: Box::new(expr),
				}),
			},
			TokenKind::Plus => self.parse_expr(Precedence::Prefix),
			TokenKind::Keyword(Keyword::Not) => {
				if self.peek_keyword(Keyword::Exists) {
					return self.parse_exists(true);
				}
				Ok(Expr::Unary {
					op: UnaryOperator::Not,
					expr: Box::new(self.parse_expr(Precedence::LogicNot)?),
				})
			}
			other => Err(Error::parse(format!("expected expression, found {}", other), position)),
		}
	}

	/// `INTERVAL '<n>' <unit>` with unit one of year, month, day, hour,
	/// minute or second.
	fn parse_interval(&mut self, position: usize) -> Result<Interval> {
		let amount = match self.peek() {
			Some(TokenKind::Number(_)) => match self.advance()?.kind {
				TokenKind::Number(text) => text,
				_ => unreachable!(),
			},
			_ => self.parse_string("interval amount")?,
		};
		let amount: i64 = amount
			.trim()
			.parse()
			.map_err(|_| Error::parse(format!("invalid interval amount '{}'", amount), position))?;

		let unit = self.parse_identifier()?.to_ascii_lowercase();
		let out_of_range = || Error::parse("interval out of range", position);
		let months = |factor: i64| -> Result<Interval> {
			let months = amount.checked_mul(factor).and_then(|m| i32::try_from(m).ok()).ok_or_else(out_of_range)?;
			Ok(Interval::from_months(months))
		};
		let millis = |factor: i64| -> Result<Interval> {
			amount.checked_mul(factor).map(Interval::from_millis).ok_or_else(out_of_range)
		};

		match unit.trim_end_matches('s') {
			"year" => months(12),
			"month" => months(1),
			"day" => millis(86_400_000),
			"hour" => millis(3_600_000),
			"minute" => millis(60_000),
			"second" => millis(1_000),
			_ => Err(Error::parse(format!("unknown interval unit '{}'", unit), position)),
		}
	}

	fn parse_string(&mut self, what: &str) -> Result<String> {
		match self.peek() {
			Some(TokenKind::StringLit(_)) => {}
			_ => return Err(self.unexpected(what)),
		}
		match self.advance()?.kind {
			TokenKind::StringLit(text) => Ok(text),
			_ => unreachable!(),
		}
	}

	fn advance(&mut self) -> Result<Token> {
		if self.position >= self.tokens.len() {
			return Err(Error::parse("unexpected end of input", self.end));
		}
		let token = self.tokens[self.position].clone();
		self.position += 1;
		Ok(token)
	}

	fn consume(&mut self, expected: &TokenKind) -> Result<Token> {
		if self.peek() != Some(expected) {
			return Err(self.unexpected(&expected.to_string()));
		}
		self.advance()
	}

	fn consume_if(&mut self, expected: &TokenKind) -> bool {
		if self.peek() == Some(expected) {
			self.position += 1;
			true
		} else {
			false
		}
	}

	fn consume_keyword(&mut self, expected: Keyword) -> Result<Token> {
		self.consume(&TokenKind::Keyword(expected))
	}

	fn consume_if_keyword(&mut self, expected: Keyword) -> bool {
		self.consume_if(&TokenKind::Keyword(expected))
	}

	fn peek(&self) -> Option<&TokenKind> {
		self.tokens.get(self.position).map(|t| &t.kind)
	}

	fn peek_keyword(&self, keyword: Keyword) -> bool {
		self.peek() == Some(&TokenKind::Keyword(keyword))
	}

	fn peek_nth_is_keyword(&self, n: usize, keyword: Keyword) -> bool {
		self.tokens.get(self.position + n).map(|t| &t.kind) == Some(&TokenKind::Keyword(keyword))
	}

	fn current_position(&self) -> usize {
		self.tokens.get(self.position).map(|t| t.position).unwrap_or(self.end)
	}

	fn is_eof(&self) -> bool {
		self.position >= self.tokens.len()
	}

	fn unexpected(&self, expected: &str) -> Error {
		match self.tokens.get(self.position) {
			Some(token) => Error::parse(format!("expected {}, found {}", expected, token.kind), token.position),
			None => Error::parse(format!("expected {}, found end of input", expected), self.end),
		}
	}
}

/// Integers take the smallest of Int4 and Int8 that holds them, anything
/// larger or with a fraction becomes a decimal.
fn number_literal(text: &str, position: usize) -> Result<Value> {
	if !text.contains('.') {
		if let Ok(value) = text.parse::<i32>() {
			return Ok(Value::Int4(value));
		}
		if let Ok(value) = text.parse::<i64>() {
			return Ok(Value::Int8(value));
		}
	}
	Decimal::parse(text).map(Value::Decimal).map_err(|e| at(e, position))
}

fn at(error: TypeError, position: usize) -> Error {
	Error::parse(error.to_string(), position)
}
