// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
	Literal(char),
	/// `_`
	One,
	/// `%`
	Any,
}

/// A SQL `LIKE` pattern over object names.
///
/// `%` matches any run of characters, `_` exactly one, and `\` escapes the
/// next character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
	text: String,
	tokens: Vec<Token>,
	case_sensitive: bool,
}

impl Pattern {
	pub fn like(text: impl Into<String>) -> Self {
		let text = text.into();
		let mut tokens = Vec::with_capacity(text.len());
		let mut chars = text.chars();
		while let Some(c) = chars.next() {
			match c {
				'%' => {
					if tokens.last() != Some(&Token::Any) {
						tokens.push(Token::Any);
					}
				}
				'_' => tokens.push(Token::One),
				'\\' => match chars.next() {
					Some(escaped) => tokens.push(Token::Literal(escaped)),
					None => tokens.push(Token::Literal('\\')),
				},
				c => tokens.push(Token::Literal(c)),
			}
		}
		Self {
			text,
			tokens,
			case_sensitive: true,
		}
	}

	/// Matches exactly `name`, wildcard characters included.
	pub fn exact(name: impl Into<String>) -> Self {
		let text = name.into();
		let tokens = text.chars().map(Token::Literal).collect();
		Self {
			text,
			tokens,
			case_sensitive: true,
		}
	}

	pub fn case_insensitive(mut self) -> Self {
		self.case_sensitive = false;
		self
	}

	pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
		self.case_sensitive = case_sensitive;
		self
	}

	pub fn is_case_sensitive(&self) -> bool {
		self.case_sensitive
	}

	/// The single name this pattern matches, if it contains no wildcard.
	pub fn as_literal(&self) -> Option<String> {
		self.tokens
			.iter()
			.map(|t| match t {
				Token::Literal(c) => Some(*c),
				_ => None,
			})
			.collect()
	}

	pub fn matches(&self, name: &str) -> bool {
		let name: Vec<char> = name.chars().collect();
		let eq = |p: char, n: char| {
			if self.case_sensitive {
				p == n
			} else {
				p.to_lowercase().eq(n.to_lowercase())
			}
		};

		// iterative matcher with single backtrack point on the last `%`
		let (mut p, mut n) = (0usize, 0usize);
		let mut star: Option<(usize, usize)> = None;
		while n < name.len() {
			match self.tokens.get(p) {
				Some(Token::Literal(c)) if eq(*c, name[n]) => {
					p += 1;
					n += 1;
				}
				Some(Token::One) => {
					p += 1;
					n += 1;
				}
				Some(Token::Any) => {
					star = Some((p, n));
					p += 1;
				}
				_ => match star {
					Some((sp, sn)) => {
						p = sp + 1;
						n = sn + 1;
						star = Some((sp, sn + 1));
					}
					None => return false,
				},
			}
		}
		self.tokens[p..].iter().all(|t| *t == Token::Any)
	}
}

impl Display for Pattern {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text)
	}
}
