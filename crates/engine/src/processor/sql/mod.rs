// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod scope;
mod translate;

use polystore_core::ResourceId;
use polystore_plan::decorrelate;
use polystore_sql::{ParserConfig, ast::Statement};
use polystore_transaction::Transaction;
use tracing::{debug, instrument};
use translate::Translator;

use crate::{
	EngineConfig, Language, Result,
	processor::{QueryParameters, QueryProcessor, Translation, empty_plan},
};

/// The relational pipeline. Tables are declared up front, so statements are
/// validated against their columns and never create objects implicitly.
pub struct SqlProcessor {
	config: ParserConfig,
	lock_resource: ResourceId,
}

impl SqlProcessor {
	pub fn new(config: ParserConfig, lock_resource: impl Into<ResourceId>) -> Self {
		Self {
			config,
			lock_resource: lock_resource.into(),
		}
	}

	pub fn from_config(config: &EngineConfig) -> Self {
		Self::new(config.sql.clone(), config.global_lock_resource.as_str())
	}
}

impl QueryProcessor for SqlProcessor {
	type Statement = Statement;

	fn language(&self) -> Language {
		Language::Sql
	}

	#[instrument(name = "engine::sql::parse", level = "debug", skip(self))]
	fn parse(&self, text: &str) -> Result<Statement> {
		Ok(polystore_sql::parse(text, &self.config)?)
	}

	fn lock_resource(&self) -> &ResourceId {
		&self.lock_resource
	}

	fn needs_implicit_schema(&self, _statement: &Statement, _transaction: &Transaction, _params: &QueryParameters) -> bool {
		false
	}

	#[instrument(name = "engine::sql::validate", level = "debug", skip_all)]
	fn validate(&self, statement: &Statement, transaction: &Transaction, params: &QueryParameters) -> Result<()> {
		let mut translator = Translator::new(transaction.snapshot().clone(), params);
		translator.plan(statement)?;
		Ok(())
	}

	#[instrument(name = "engine::sql::translate", level = "debug", skip_all, fields(transaction = %transaction.id()))]
	fn translate(
		&self,
		statement: &Statement,
		transaction: &mut Transaction,
		params: &QueryParameters,
	) -> Result<Translation> {
		let mut translator = Translator::new(transaction.snapshot().clone(), params);

		if let Statement::CreateTable(create) = statement {
			let to_create = translator.table_to_create(create)?;
			let table = transaction.create_table(to_create)?;
			debug!(table = %table.name, id = %table.id, "table creation buffered");
			return Ok(Translation::new(empty_plan()));
		}

		let plan = translator.plan(statement)?;
		Ok(Translation::new(decorrelate(&plan)))
	}
}
