// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod translate;

use polystore_catalog::{CatalogSnapshot, CollectionDef, NamespaceDef};
use polystore_core::ResourceId;
use polystore_mql::ast::Statement;
use polystore_plan::decorrelate;
use polystore_transaction::{CollectionToCreate, Transaction};
use tracing::{debug, instrument};

use crate::{
	EngineConfig, Error, Language, Result, SchemaGenerationError,
	processor::{
		QueryParameters, QueryProcessor, Translation, commit_implicit, empty_plan, find_collection, resolve_namespace,
	},
};

/// The document pipeline. Collections are schemaless, so there is nothing to
/// validate, and inserting into a missing collection creates it.
pub struct MqlProcessor {
	lock_resource: ResourceId,
}

impl MqlProcessor {
	pub fn new(lock_resource: impl Into<ResourceId>) -> Self {
		Self {
			lock_resource: lock_resource.into(),
		}
	}

	pub fn from_config(config: &EngineConfig) -> Self {
		Self::new(config.global_lock_resource.as_str())
	}
}

fn collection(snapshot: &CatalogSnapshot, namespace: &NamespaceDef, name: &str) -> Result<CollectionDef> {
	find_collection(snapshot, namespace, name)
		.ok_or_else(|| Error::not_found("collection", format!("{}.{}", namespace.name, name)))
}

impl QueryProcessor for MqlProcessor {
	type Statement = Statement;

	fn language(&self) -> Language {
		Language::Mql
	}

	#[instrument(name = "engine::mql::parse", level = "debug", skip(self))]
	fn parse(&self, text: &str) -> Result<Statement> {
		Ok(polystore_mql::parse(text)?)
	}

	fn lock_resource(&self) -> &ResourceId {
		&self.lock_resource
	}

	#[instrument(name = "engine::mql::needs_implicit_schema", level = "trace", skip_all)]
	fn needs_implicit_schema(&self, statement: &Statement, transaction: &Transaction, params: &QueryParameters) -> bool {
		let Statement::Insert {
			collection,
			..
		} = statement
		else {
			return false;
		};
		let snapshot = transaction.snapshot();
		match resolve_namespace(snapshot, &params.namespace) {
			Ok(namespace) => find_collection(snapshot, &namespace, collection).is_none(),
			Err(_) => false,
		}
	}

	#[instrument(name = "engine::mql::auto_generate_schema", level = "debug", skip_all, fields(transaction = %transaction.id()))]
	fn auto_generate_schema(
		&self,
		statement: &Statement,
		transaction: &mut Transaction,
		params: &QueryParameters,
	) -> Result<()> {
		let Some(name) = statement.collection() else {
			commit_implicit(transaction)?;
			return Err(SchemaGenerationError::NoTarget.into());
		};

		let namespace = resolve_namespace(transaction.snapshot(), &params.namespace)?;
		let created = transaction.create_collection(CollectionToCreate {
			namespace: namespace.id,
			name: name.to_string(),
		})?;
		debug!(collection = %created.name, namespace = %namespace.name, "implicit collection generated");
		commit_implicit(transaction)
	}

	fn validate(&self, _statement: &Statement, _transaction: &Transaction, _params: &QueryParameters) -> Result<()> {
		Err(Error::Unsupported {
			operation: "validate",
			language: Language::Mql,
		})
	}

	#[instrument(name = "engine::mql::translate", level = "debug", skip_all, fields(transaction = %transaction.id()))]
	fn translate(
		&self,
		statement: &Statement,
		transaction: &mut Transaction,
		params: &QueryParameters,
	) -> Result<Translation> {
		let snapshot = transaction.snapshot().clone();
		let namespace = || resolve_namespace(&snapshot, &params.namespace);

		let plan = match statement {
			Statement::Use(name) => {
				let mut translation = Translation::new(empty_plan());
				translation.namespace = Some(resolve_namespace(&snapshot, name)?.name);
				return Ok(translation);
			}
			Statement::CreateCollection(name) => {
				let created = transaction.create_collection(CollectionToCreate {
					namespace: namespace()?.id,
					name: name.clone(),
				})?;
				debug!(collection = %created.name, "collection creation buffered");
				empty_plan()
			}
			Statement::Find {
				collection: name,
				filter,
				projection,
			} => {
				let plan = translate::filtered_scan(&collection(&snapshot, &namespace()?, name)?, filter);
				match projection {
					Some(projection) => translate::project(plan, projection),
					None => plan,
				}
			}
			Statement::Count {
				collection: name,
				filter,
			} => translate::count(translate::filtered_scan(&collection(&snapshot, &namespace()?, name)?, filter)),
			Statement::Insert {
				collection: name,
				documents,
			} => translate::insert(&collection(&snapshot, &namespace()?, name)?, documents)?,
			Statement::Update {
				collection: name,
				filter,
				set,
			} => translate::update(&collection(&snapshot, &namespace()?, name)?, filter, set)?,
			Statement::Delete {
				collection: name,
				filter,
			} => translate::delete(&collection(&snapshot, &namespace()?, name)?, filter),
		};

		Ok(Translation::new(decorrelate(&plan)))
	}
}

#[cfg(test)]
mod tests {
	use polystore_plan::{ModifyOperation, PlanNode};

	use super::*;
	use crate::test_utils::test_environment;

	fn params() -> QueryParameters {
		QueryParameters::new("docs")
	}

	#[test]
	fn test_validate_is_unsupported() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse("db.people.find({})").unwrap();
		let transaction = environment.transactions().begin();
		let err = processor.validate(&statement, &transaction, &params()).unwrap_err();
		assert!(matches!(
			err,
			Error::Unsupported {
				operation: "validate",
				language: Language::Mql
			}
		));
	}

	#[test]
	fn test_needs_implicit_schema_only_for_missing_insert_target() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let transaction = environment.transactions().begin();

		let missing = processor.parse(r#"db.pets.insertOne({"name": "rex"})"#).unwrap();
		let existing = processor.parse(r#"db.people.insertOne({"name": "ada"})"#).unwrap();
		let find_missing = processor.parse("db.pets.find({})").unwrap();

		assert!(processor.needs_implicit_schema(&missing, &transaction, &params()));
		assert!(!processor.needs_implicit_schema(&existing, &transaction, &params()));
		assert!(!processor.needs_implicit_schema(&find_missing, &transaction, &params()));
		assert!(!processor.needs_implicit_schema(&missing, &transaction, &QueryParameters::new("nowhere")));
	}

	#[test]
	fn test_auto_generate_creates_and_commits() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse(r#"db.pets.insertOne({"name": "rex"})"#).unwrap();
		let mut transaction = environment.transactions().begin();

		processor.auto_generate_schema(&statement, &mut transaction, &params()).unwrap();
		assert!(!transaction.is_active());

		let fresh = environment.transactions().begin();
		assert!(!processor.needs_implicit_schema(&statement, &fresh, &params()));
	}

	#[test]
	fn test_auto_generate_without_target_commits_then_fails() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse("use docs").unwrap();
		let mut transaction = environment.transactions().begin();

		let err = processor.auto_generate_schema(&statement, &mut transaction, &params()).unwrap_err();
		assert!(matches!(err, Error::SchemaGeneration(SchemaGenerationError::NoTarget)));
		assert!(!transaction.is_active());
	}

	#[test]
	fn test_translate_find_with_filter() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse(r#"db.people.find({"age": {"$gt": 30}}, {"name": 1})"#).unwrap();
		let mut transaction = environment.transactions().begin();

		let translation = processor.translate(&statement, &mut transaction, &params()).unwrap();
		let PlanNode::Project(project) = translation.plan.as_ref() else {
			panic!("expected project, got {}", translation.plan.name());
		};
		assert!(matches!(project.input.as_ref(), PlanNode::Filter(_)));
		assert_eq!(translation.row_shape.names(), vec!["_id", "name"]);
	}

	#[test]
	fn test_translate_delete_targets_collection() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse(r#"db.people.deleteMany({"age": {"$lt": 18}})"#).unwrap();
		let mut transaction = environment.transactions().begin();

		let translation = processor.translate(&statement, &mut transaction, &params()).unwrap();
		let PlanNode::TableModify(modify) = translation.plan.as_ref() else {
			panic!("expected table modify");
		};
		assert_eq!(modify.operation, ModifyOperation::Delete);
		assert_eq!(modify.name, "people");
	}

	#[test]
	fn test_translate_missing_collection() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse("db.pets.count({})").unwrap();
		let mut transaction = environment.transactions().begin();

		let err = processor.translate(&statement, &mut transaction, &params()).unwrap_err();
		assert!(matches!(err, Error::NotFound { kind: "collection", .. }));
	}

	#[test]
	fn test_use_reports_namespace() {
		let environment = test_environment();
		let processor = MqlProcessor::from_config(environment.config());
		let statement = processor.parse("use public").unwrap();
		let mut transaction = environment.transactions().begin();

		let translation = processor.translate(&statement, &mut transaction, &params()).unwrap();
		assert_eq!(translation.namespace.as_deref(), Some("public"));

		let statement = processor.parse("use nowhere").unwrap();
		assert!(processor.translate(&statement, &mut transaction, &params()).is_err());
	}
}
