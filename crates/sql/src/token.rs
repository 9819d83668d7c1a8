// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use crate::{Error, ParserConfig, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	/// Character offset of the first character of the token.
	pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	// Keywords
	Keyword(Keyword),
	// Identifiers, unquoted ones already case folded
	Ident(String),
	QuotedIdent(String),
	// Literals, numbers kept as written
	Number(String),
	StringLit(String),
	// Operators & punctuation
	Asterisk,   // *
	Comma,      // ,
	Dot,        // .
	Semicolon,  // ;
	OpenParen,  // (
	CloseParen, // )
	Plus,       // +
	Minus,      // -
	Slash,      // /
	Percent,    // %
	Eq,         // =
	NotEq,      // <> or !=
	Lt,         // <
	Gt,         // >
	LtEq,       // <=
	GtEq,       // >=
	Question,   // ?
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Keyword {
	Select,
	From,
	Where,
	And,
	Or,
	Not,
	As,
	Distinct,
	Insert,
	Into,
	Values,
	Update,
	Set,
	Delete,
	Create,
	Table,
	Join,
	Inner,
	Left,
	Outer,
	On,
	Null,
	True,
	False,
	Is,
	In,
	Exists,
	Union,
	Intersect,
	Except,
	All,
	// Typed literals
	Date,
	Time,
	Timestamp,
	Interval,
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			TokenKind::Keyword(keyword) => write!(f, "{}", format!("{:?}", keyword).to_uppercase()),
			TokenKind::Ident(name) => f.write_str(name),
			TokenKind::QuotedIdent(name) => write!(f, "quoted identifier {}", name),
			TokenKind::Number(text) => f.write_str(text),
			TokenKind::StringLit(text) => write!(f, "'{}'", text),
			TokenKind::Asterisk => f.write_str("*"),
			TokenKind::Comma => f.write_str(","),
			TokenKind::Dot => f.write_str("."),
			TokenKind::Semicolon => f.write_str(";"),
			TokenKind::OpenParen => f.write_str("("),
			TokenKind::CloseParen => f.write_str(")"),
			TokenKind::Plus => f.write_str("+"),
			TokenKind::Minus => f.write_str("-"),
			TokenKind::Slash => f.write_str("/"),
			TokenKind::Percent => f.write_str("%"),
			TokenKind::Eq => f.write_str("="),
			TokenKind::NotEq => f.write_str("<>"),
			TokenKind::Lt => f.write_str("<"),
			TokenKind::Gt => f.write_str(">"),
			TokenKind::LtEq => f.write_str("<="),
			TokenKind::GtEq => f.write_str(">="),
			TokenKind::Question => f.write_str("?"),
		}
	}
}

impl Keyword {
	fn from_word(upper: &str) -> Option<Keyword> {
		let keyword = match upper {
			"SELECT" => Keyword::Select,
			"FROM" => Keyword::From,
			"WHERE" => Keyword::Where,
			"AND" => Keyword::And,
			"OR" => Keyword::Or,
			"NOT" => Keyword::Not,
			"AS" => Keyword::As,
			"DISTINCT" => Keyword::Distinct,
			"INSERT" => Keyword::Insert,
			"INTO" => Keyword::Into,
			"VALUES" => Keyword::Values,
			"UPDATE" => Keyword::Update,
			"SET" => Keyword::Set,
			"DELETE" => Keyword::Delete,
			"CREATE" => Keyword::Create,
			"TABLE" => Keyword::Table,
			"JOIN" => Keyword::Join,
			"INNER" => Keyword::Inner,
			"LEFT" => Keyword::Left,
			"OUTER" => Keyword::Outer,
			"ON" => Keyword::On,
			"NULL" => Keyword::Null,
			"TRUE" => Keyword::True,
			"FALSE" => Keyword::False,
			"IS" => Keyword::Is,
			"IN" => Keyword::In,
			"EXISTS" => Keyword::Exists,
			"UNION" => Keyword::Union,
			"INTERSECT" => Keyword::Intersect,
			"EXCEPT" => Keyword::Except,
			"ALL" => Keyword::All,
			"DATE" => Keyword::Date,
			"TIME" => Keyword::Time,
			"TIMESTAMP" => Keyword::Timestamp,
			"INTERVAL" => Keyword::Interval,
			_ => return None,
		};
		Some(keyword)
	}
}

pub fn tokenize(sql: &str, config: &ParserConfig) -> Result<Vec<Token>> {
	let mut tokens = Vec::new();
	let chars: Vec<char> = sql.chars().collect();
	let len = chars.len();
	let mut i = 0;

	while i < len {
		let c = chars[i];
		let start = i;
		let mut push = |kind: TokenKind| {
			tokens.push(Token {
				kind,
				position: start,
			})
		};

		// Skip whitespace
		if c.is_whitespace() {
			i += 1;
			continue;
		}

		// Skip line comments (-- ...)
		if c == '-' && i + 1 < len && chars[i + 1] == '-' {
			while i < len && chars[i] != '\n' {
				i += 1;
			}
			continue;
		}

		// Quoted identifiers
		if c == config.quote && c != '\'' {
			i += 1;
			let mut s = String::new();
			while i < len {
				if chars[i] == config.quote {
					// A doubled quote escapes itself
					if i + 1 < len && chars[i + 1] == config.quote {
						s.push(config.quote);
						i += 2;
					} else {
						break;
					}
				} else {
					s.push(chars[i]);
					i += 1;
				}
			}
			if i >= len {
				return Err(Error::parse("unterminated quoted identifier", start));
			}
			i += 1;
			if s.is_empty() {
				return Err(Error::parse("empty quoted identifier", start));
			}
			push(TokenKind::QuotedIdent(s));
			continue;
		}

		// Operators and punctuation
		let single = match c {
			'*' => Some(TokenKind::Asterisk),
			',' => Some(TokenKind::Comma),
			'.' => Some(TokenKind::Dot),
			';' => Some(TokenKind::Semicolon),
			'(' => Some(TokenKind::OpenParen),
			')' => Some(TokenKind::CloseParen),
			'+' => Some(TokenKind::Plus),
			'-' => Some(TokenKind::Minus),
			'/' => Some(TokenKind::Slash),
			'%' => Some(TokenKind::Percent),
			'?' => Some(TokenKind::Question),
			_ => None,
		};
		if let Some(kind) = single {
			push(kind);
			i += 1;
			continue;
		}

		match c {
			'=' => {
				if config.is_lenient() && i + 1 < len && chars[i + 1] == '=' {
					i += 2;
				} else {
					i += 1;
				}
				push(TokenKind::Eq);
				continue;
			}
			'<' => {
				if i + 1 < len && chars[i + 1] == '=' {
					push(TokenKind::LtEq);
					i += 2;
				} else if i + 1 < len && chars[i + 1] == '>' {
					push(TokenKind::NotEq);
					i += 2;
				} else {
					push(TokenKind::Lt);
					i += 1;
				}
				continue;
			}
			'>' => {
				if i + 1 < len && chars[i + 1] == '=' {
					push(TokenKind::GtEq);
					i += 2;
				} else {
					push(TokenKind::Gt);
					i += 1;
				}
				continue;
			}
			'!' => {
				if i + 1 < len && chars[i + 1] == '=' {
					if config.is_strict() {
						return Err(Error::parse("'!=' is not standard, use '<>'", i));
					}
					push(TokenKind::NotEq);
					i += 2;
					continue;
				}
				return Err(Error::parse("unexpected character '!'", i));
			}
			_ => {}
		}

		// String literals
		if c == '\'' {
			i += 1;
			let mut s = String::new();
			while i < len {
				if chars[i] == '\'' {
					// Check for escaped single quote ''
					if i + 1 < len && chars[i + 1] == '\'' {
						s.push('\'');
						i += 2;
					} else {
						break;
					}
				} else {
					s.push(chars[i]);
					i += 1;
				}
			}
			if i >= len {
				return Err(Error::parse("unterminated string literal", start));
			}
			i += 1; // skip closing quote
			push(TokenKind::StringLit(s));
			continue;
		}

		// Numeric literals
		if c.is_ascii_digit() {
			while i < len && chars[i].is_ascii_digit() {
				i += 1;
			}
			if i < len && chars[i] == '.' && i + 1 < len && chars[i + 1].is_ascii_digit() {
				i += 1; // skip dot
				while i < len && chars[i].is_ascii_digit() {
					i += 1;
				}
			}
			push(TokenKind::Number(chars[start..i].iter().collect()));
			continue;
		}

		// Identifiers and keywords
		if c.is_alphabetic() || c == '_' {
			while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
				i += 1;
			}
			let word: String = chars[start..i].iter().collect();
			let kind = match Keyword::from_word(&word.to_ascii_uppercase()) {
				Some(keyword) => TokenKind::Keyword(keyword),
				None if config.case_sensitive => TokenKind::Ident(word),
				None => TokenKind::Ident(word.to_lowercase()),
			};
			push(kind);
			continue;
		}

		return Err(Error::parse(format!("unexpected character '{c}'"), i));
	}

	Ok(tokens)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Conformance;

	fn kinds(sql: &str, config: &ParserConfig) -> Vec<TokenKind> {
		tokenize(sql, config).unwrap().into_iter().map(|t| t.kind).collect()
	}

	#[test]
	fn test_simple_select() {
		let tokens = kinds("SELECT id, name FROM users", &ParserConfig::default());
		assert_eq!(
			tokens,
			vec![
				TokenKind::Keyword(Keyword::Select),
				TokenKind::Ident("id".into()),
				TokenKind::Comma,
				TokenKind::Ident("name".into()),
				TokenKind::Keyword(Keyword::From),
				TokenKind::Ident("users".into()),
			]
		);
	}

	#[test]
	fn test_positions() {
		let tokens = tokenize("a  <> 'x'", &ParserConfig::default()).unwrap();
		let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
		assert_eq!(positions, vec![0, 3, 6]);
	}

	#[test]
	fn test_string_literal() {
		let tokens = kinds("SELECT 'it''s'", &ParserConfig::default());
		assert_eq!(tokens, vec![TokenKind::Keyword(Keyword::Select), TokenKind::StringLit("it's".into())]);
	}

	#[test]
	fn test_unterminated_string() {
		let err = tokenize("SELECT 'abc", &ParserConfig::default()).unwrap_err();
		assert_eq!(err.position(), 7);
	}

	#[test]
	fn test_case_folding() {
		let folded = kinds("Users", &ParserConfig::default());
		assert_eq!(folded, vec![TokenKind::Ident("users".into())]);

		let kept = kinds("Users", &ParserConfig::default().with_case_sensitive(true));
		assert_eq!(kept, vec![TokenKind::Ident("Users".into())]);
	}

	#[test]
	fn test_quoted_identifier_keeps_case() {
		let tokens = kinds(r#""Select""#, &ParserConfig::default());
		assert_eq!(tokens, vec![TokenKind::QuotedIdent("Select".into())]);

		let tokens = kinds("`My Table`", &ParserConfig::default().with_quote('`'));
		assert_eq!(tokens, vec![TokenKind::QuotedIdent("My Table".into())]);
	}

	#[test]
	fn test_comparison_operators() {
		let tokens = kinds("a <> b != c", &ParserConfig::default());
		assert_eq!(
			tokens,
			vec![
				TokenKind::Ident("a".into()),
				TokenKind::NotEq,
				TokenKind::Ident("b".into()),
				TokenKind::NotEq,
				TokenKind::Ident("c".into()),
			]
		);
	}

	#[test]
	fn test_strict_rejects_bang_equal() {
		let config = ParserConfig::default().with_conformance(Conformance::Strict);
		assert!(tokenize("a != b", &config).is_err());
		assert!(tokenize("a <> b", &config).is_ok());
	}

	#[test]
	fn test_lenient_double_equal() {
		let config = ParserConfig::default().with_conformance(Conformance::Lenient);
		assert_eq!(
			kinds("a == b", &config),
			vec![TokenKind::Ident("a".into()), TokenKind::Eq, TokenKind::Ident("b".into())]
		);
		assert_eq!(kinds("a == b", &ParserConfig::default()).len(), 4);
	}

	#[test]
	fn test_numeric_literals() {
		let tokens = kinds("42 3.14 ?", &ParserConfig::default());
		assert_eq!(
			tokens,
			vec![TokenKind::Number("42".into()), TokenKind::Number("3.14".into()), TokenKind::Question]
		);
	}

	#[test]
	fn test_comment_skipped() {
		let tokens = kinds("1 -- trailing\n+ 2", &ParserConfig::default());
		assert_eq!(
			tokens,
			vec![TokenKind::Number("1".into()), TokenKind::Plus, TokenKind::Number("2".into())]
		);
	}
}
