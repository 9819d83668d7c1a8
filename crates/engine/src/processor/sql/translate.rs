// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_catalog::{CatalogSnapshot, CollectionDef, ColumnDef, NamespaceDef, NamespaceKind, TableDef};
use polystore_core::CorrelationId;
use polystore_plan::{
	BinaryOp, CorrelateNode, Expression, Field, FilterNode, JoinKind, JoinNode, ModifyOperation, PlanNode, PlanRef,
	ProjectNode, RowShape, ScanNode, SetOperationKind, SetOperationNode, Source, TableModifyNode, ValuesNode,
	conjunction,
};
use polystore_sql::ast::{
	BinaryOperator, CreateTableStatement, DeleteStatement, Expr, InsertSource, InsertStatement, JoinType, ObjectName,
	Query, SelectItem, SelectStatement, SetOperator, Statement, TableRef, UnaryOperator, UpdateStatement,
};
use polystore_transaction::{ColumnToCreate, TableToCreate};
use polystore_type::Value;
use tracing::trace;

use super::scope::Scope;
use crate::{Error, QueryParameters, Result, processor::empty_plan};

enum Resolved {
	Table(TableDef),
	Collection(CollectionDef),
}

/// A `WHERE` conjunct that becomes a dependent join.
enum SubqueryPredicate<'s> {
	Exists {
		query: &'s Query,
		negated: bool,
	},
	In {
		expr: &'s Expr,
		query: &'s Query,
		negated: bool,
	},
}

/// Lowers SQL statements to plans against one catalog snapshot.
pub(crate) struct Translator<'a> {
	snapshot: CatalogSnapshot,
	params: &'a QueryParameters,
	next_correlation: u64,
	/// Scopes of the enclosing queries, innermost last.
	outer: Vec<(CorrelationId, Scope)>,
}

impl<'a> Translator<'a> {
	pub fn new(snapshot: CatalogSnapshot, params: &'a QueryParameters) -> Self {
		Self {
			snapshot,
			params,
			next_correlation: 1,
			outer: Vec::new(),
		}
	}

	/// The plan of any statement. `CREATE TABLE` is only checked and yields
	/// an empty plan.
	pub fn plan(&mut self, statement: &Statement) -> Result<PlanRef> {
		match statement {
			Statement::Query(query) => Ok(self.query(query)?.0),
			Statement::Insert(insert) => self.insert(insert),
			Statement::Update(update) => self.update(update),
			Statement::Delete(delete) => self.delete(delete),
			Statement::CreateTable(create) => {
				self.table_to_create(create)?;
				Ok(empty_plan())
			}
		}
	}

	fn namespace(&self, name: Option<&str>) -> Result<NamespaceDef> {
		let name = name.unwrap_or(&self.params.namespace);
		self.snapshot.find_namespace_by_name(name).cloned().ok_or_else(|| Error::not_found("namespace", name))
	}

	fn resolve(&self, name: &ObjectName) -> Result<Resolved> {
		let namespace = self.namespace(name.namespace.as_deref())?;
		if let Some(table) = self.snapshot.find_table_by_name(namespace.id, &name.name) {
			return Ok(Resolved::Table(table.clone()));
		}
		if let Some(collection) = self.snapshot.find_collection_by_name(namespace.id, &name.name) {
			return Ok(Resolved::Collection(collection.clone()));
		}
		Err(Error::not_found("table", name.to_string()))
	}

	fn resolve_table(&self, name: &ObjectName) -> Result<TableDef> {
		match self.resolve(name)? {
			Resolved::Table(table) => Ok(table),
			Resolved::Collection(_) => {
				Err(Error::validation(format!("'{}' is a document collection and cannot be modified with SQL", name)))
			}
		}
	}

	fn scan(&self, table: &TableRef) -> Result<(PlanRef, Scope)> {
		match self.resolve(&table.name)? {
			Resolved::Table(def) => Ok(table_scan(&def, table.reference_name())),
			Resolved::Collection(def) => {
				let node = ScanNode {
					source: Source::Collection(def.id),
					name: def.name,
					shape: RowShape::document(),
					partitions: def.partitions,
				};
				let scope = Scope::from_shape(table.reference_name(), &node.shape);
				Ok((PlanNode::Scan(node).into_ref(), scope))
			}
		}
	}

	pub fn query(&mut self, query: &Query) -> Result<(PlanRef, Scope)> {
		match query {
			Query::Select(select) => self.select(select),
			Query::SetOperation {
				op,
				all,
				left,
				right,
			} => {
				let (left, left_scope) = self.query(left)?;
				let (right, right_scope) = self.query(right)?;
				let kind = match op {
					SetOperator::Union => SetOperationKind::Union,
					SetOperator::Intersect => SetOperationKind::Intersect,
					SetOperator::Except => SetOperationKind::Minus,
				};
				if left_scope.arity() != right_scope.arity() {
					return Err(Error::validation(format!(
						"each {} input must have the same number of columns, found {} and {}",
						kind,
						left_scope.arity(),
						right_scope.arity()
					)));
				}

				let node = SetOperationNode {
					kind,
					inputs: vec![left, right],
					all: *all,
				};
				Ok((PlanNode::SetOperation(node).into_ref(), Scope::unqualified(&left_scope.shape())))
			}
		}
	}

	fn select(&mut self, select: &SelectStatement) -> Result<(PlanRef, Scope)> {
		let (mut plan, mut scope) = match &select.from {
			Some(table) => self.scan(table)?,
			None => (
				PlanNode::Values(ValuesNode {
					rows: vec![vec![]],
					shape: RowShape::default(),
				})
				.into_ref(),
				Scope::default(),
			),
		};

		for join in &select.joins {
			let (right, right_scope) = self.scan(&join.table)?;
			let combined = scope.concat(&right_scope);
			let condition = self.expression(&join.on, &combined)?;
			let kind = match join.join_type {
				JoinType::Inner => JoinKind::Inner,
				JoinType::Left => JoinKind::Left,
			};
			plan = PlanNode::Join(JoinNode {
				left: plan,
				right,
				kind,
				condition: Some(condition),
			})
			.into_ref();
			scope = combined;
		}

		if let Some(selection) = &select.selection {
			plan = self.selection(plan, &scope, selection)?;
		}

		let (plan, scope) = self.projection(plan, scope, &select.items)?;
		if !select.distinct {
			return Ok((plan, scope));
		}

		let distinct = SetOperationNode {
			kind: SetOperationKind::Union,
			inputs: vec![plan],
			all: false,
		};
		Ok((PlanNode::SetOperation(distinct).into_ref(), scope))
	}

	/// Plain conjuncts filter first, subquery conjuncts then become one
	/// dependent join each.
	fn selection(&mut self, input: PlanRef, scope: &Scope, selection: &Expr) -> Result<PlanRef> {
		let mut plain = Vec::new();
		let mut subqueries = Vec::new();
		for conjunct in split_conjuncts(selection) {
			match conjunct {
				Expr::Exists {
					query,
					negated,
				} => subqueries.push(SubqueryPredicate::Exists {
					query,
					negated: *negated,
				}),
				Expr::InSubquery {
					expr,
					query,
					negated,
				} => subqueries.push(SubqueryPredicate::In {
					expr,
					query,
					negated: *negated,
				}),
				other => plain.push(self.expression(other, scope)?),
			}
		}

		let mut plan = input;
		if let Some(condition) = conjunction(plain).map(Expression::fold) {
			if condition != Expression::Constant(Value::Boolean(true)) {
				plan = PlanNode::Filter(FilterNode {
					input: plan,
					condition,
				})
				.into_ref();
			}
		}

		for predicate in subqueries {
			plan = self.correlate(plan, scope, predicate)?;
		}
		Ok(plan)
	}

	fn correlate(&mut self, left: PlanRef, scope: &Scope, predicate: SubqueryPredicate<'_>) -> Result<PlanRef> {
		let correlation = CorrelationId(self.next_correlation);
		self.next_correlation += 1;

		self.outer.push((correlation, scope.clone()));
		let right = self.subquery(correlation, scope, &predicate);
		self.outer.pop();
		let right = right?;

		let negated = match predicate {
			SubqueryPredicate::Exists {
				negated,
				..
			}
			| SubqueryPredicate::In {
				negated,
				..
			} => negated,
		};
		let kind = if negated {
			JoinKind::Anti
		} else {
			JoinKind::Semi
		};
		trace!(correlation = %correlation, kind = %kind, "subquery correlated");

		Ok(PlanNode::Correlate(CorrelateNode {
			left,
			right,
			correlation,
			kind,
		})
		.into_ref())
	}

	fn subquery(
		&mut self,
		correlation: CorrelationId,
		scope: &Scope,
		predicate: &SubqueryPredicate<'_>,
	) -> Result<PlanRef> {
		match predicate {
			SubqueryPredicate::Exists {
				query,
				..
			} => Ok(self.query(query)?.0),
			SubqueryPredicate::In {
				expr,
				query,
				..
			} => {
				let (plan, inner) = self.query(query)?;
				if inner.arity() != 1 {
					return Err(Error::validation(format!(
						"subquery of IN must return one column, found {}",
						inner.arity()
					)));
				}
				let outer_value = self.expression(expr, scope)?.transform(&mut |e| match e {
					Expression::Column(column) => Expression::Correlated {
						correlation,
						column,
					},
					other => other,
				});
				Ok(PlanNode::Filter(FilterNode {
					input: plan,
					condition: Expression::eq(Expression::Column(0), outer_value),
				})
				.into_ref())
			}
		}
	}

	fn projection(&self, input: PlanRef, scope: Scope, items: &[SelectItem]) -> Result<(PlanRef, Scope)> {
		if matches!(items, [SelectItem::Wildcard]) {
			return Ok((input, scope));
		}

		let mut expressions = Vec::with_capacity(items.len());
		let mut names = Vec::with_capacity(items.len());
		for item in items {
			match item {
				SelectItem::Wildcard => {
					for (index, column) in scope.columns.iter().enumerate() {
						expressions.push(Expression::Column(index));
						names.push(column.name.clone());
					}
				}
				SelectItem::Expr {
					expr,
					alias,
				} => {
					let name = match (alias, expr) {
						(Some(alias), _) => alias.clone(),
						(
							None,
							Expr::Column {
								name,
								..
							},
						) => name.clone(),
						(None, _) => format!("column{}", expressions.len() + 1),
					};
					expressions.push(self.expression(expr, &scope)?);
					names.push(name);
				}
			}
		}

		let plan = PlanNode::Project(ProjectNode {
			input,
			expressions,
			names,
		})
		.into_ref();
		let scope = Scope::unqualified(&plan.row_shape());
		Ok((plan, scope))
	}

	fn insert(&mut self, insert: &InsertStatement) -> Result<PlanRef> {
		let table = self.resolve_table(&insert.table)?;
		let targets = target_columns(&table, &insert.columns)?;

		if let Some(column) =
			table.columns.iter().enumerate().find(|(index, c)| !c.nullable && !targets.contains(index)).map(|(_, c)| c)
		{
			return Err(Error::validation(format!(
				"column '{}' of '{}' is NOT NULL and has no value",
				column.name, table.name
			)));
		}

		let input = match &insert.source {
			InsertSource::Values(rows) => {
				let empty = Scope::default();
				let mut lowered = Vec::with_capacity(rows.len());
				for (number, row) in rows.iter().enumerate() {
					if row.len() != targets.len() {
						return Err(Error::validation(format!(
							"VALUES row {} has {} values, expected {}",
							number + 1,
							row.len(),
							targets.len()
						)));
					}
					let mut values = vec![Expression::Constant(Value::Undefined); table.columns.len()];
					for (expr, &index) in row.iter().zip(&targets) {
						let expression = self.expression(expr, &empty)?;
						check_assignable(&table.columns[index], &expression)?;
						values[index] = expression;
					}
					lowered.push(values);
				}
				PlanNode::Values(ValuesNode {
					rows: lowered,
					shape: table_shape(&table),
				})
				.into_ref()
			}
			InsertSource::Query(query) => {
				let (plan, scope) = self.query(query)?;
				if scope.arity() != targets.len() {
					return Err(Error::validation(format!(
						"INSERT query returns {} columns, expected {}",
						scope.arity(),
						targets.len()
					)));
				}
				// reorder into table column order
				let expressions = (0..table.columns.len())
					.map(|index| match targets.iter().position(|t| *t == index) {
						Some(position) => Expression::Column(position),
						None => Expression::Constant(Value::Undefined),
					})
					.collect();
				PlanNode::Project(ProjectNode {
					input: plan,
					expressions,
					names: table.column_names(),
				})
				.into_ref()
			}
		};

		let sources = (0..table.columns.len()).map(Expression::Column).collect();
		Ok(table_modify(&table, input, ModifyOperation::Insert, table.column_names(), sources))
	}

	fn update(&mut self, update: &UpdateStatement) -> Result<PlanRef> {
		let table = self.resolve_table(&update.table)?;
		let (mut plan, scope) = table_scan(&table, &update.table.name);
		if let Some(selection) = &update.selection {
			plan = self.selection(plan, &scope, selection)?;
		}

		let mut columns: Vec<String> = Vec::with_capacity(update.assignments.len());
		let mut sources = Vec::with_capacity(update.assignments.len());
		for assignment in &update.assignments {
			let index = table
				.column_index(&assignment.column)
				.ok_or_else(|| Error::not_found("column", format!("{}.{}", table.name, assignment.column)))?;
			if columns.contains(&assignment.column) {
				return Err(Error::validation(format!("column '{}' assigned more than once", assignment.column)));
			}
			let expression = self.expression(&assignment.value, &scope)?;
			check_assignable(&table.columns[index], &expression)?;
			columns.push(assignment.column.clone());
			sources.push(expression);
		}

		Ok(table_modify(&table, plan, ModifyOperation::Update, columns, sources))
	}

	fn delete(&mut self, delete: &DeleteStatement) -> Result<PlanRef> {
		let table = self.resolve_table(&delete.table)?;
		let (mut plan, scope) = table_scan(&table, &delete.table.name);
		if let Some(selection) = &delete.selection {
			plan = self.selection(plan, &scope, selection)?;
		}
		Ok(table_modify(&table, plan, ModifyOperation::Delete, vec![], vec![]))
	}

	pub fn table_to_create(&self, create: &CreateTableStatement) -> Result<TableToCreate> {
		let namespace = self.namespace(create.name.namespace.as_deref())?;
		if namespace.kind != NamespaceKind::Relational {
			return Err(Error::validation(format!("namespace '{}' cannot hold tables", namespace.name)));
		}
		if self.snapshot.find_table_by_name(namespace.id, &create.name.name).is_some()
			|| self.snapshot.find_collection_by_name(namespace.id, &create.name.name).is_some()
		{
			return Err(Error::validation(format!("'{}' already exists", create.name)));
		}
		if create.columns.is_empty() {
			return Err(Error::validation(format!("table '{}' needs at least one column", create.name)));
		}

		let mut columns: Vec<ColumnToCreate> = Vec::with_capacity(create.columns.len());
		for column in &create.columns {
			if columns.iter().any(|c| c.name == column.name) {
				return Err(Error::validation(format!("column '{}' defined more than once", column.name)));
			}
			columns.push(ColumnToCreate {
				name: column.name.clone(),
				ty: column.ty,
				nullable: column.nullable,
			});
		}

		Ok(TableToCreate {
			namespace: namespace.id,
			name: create.name.name.clone(),
			columns,
		})
	}

	fn expression(&self, expr: &Expr, scope: &Scope) -> Result<Expression> {
		Ok(self.lower(expr, scope)?.fold())
	}

	fn lower(&self, expr: &Expr, scope: &Scope) -> Result<Expression> {
		match expr {
			Expr::Literal(value) => Ok(Expression::Constant(value.clone())),
			Expr::Column {
				qualifier,
				name,
			} => self.column(qualifier.as_deref(), name, scope),
			Expr::Parameter(index) => self
				.params
				.values
				.get(*index)
				.cloned()
				.map(Expression::Constant)
				.ok_or_else(|| Error::validation(format!("no value bound for parameter {}", index + 1))),
			Expr::Binary {
				op,
				left,
				right,
			} => Ok(Expression::binary(binary_op(*op), self.lower(left, scope)?, self.lower(right, scope)?)),
			Expr::Unary {
				op: UnaryOperator::Not,
				expr,
			} => Ok(Expression::Not(Box::new(self.lower(expr, scope)?))),
			Expr::Unary {
				op: UnaryOperator::Minus,
				expr,
			} => Ok(Expression::binary(
				BinaryOp::Multiply,
				self.lower(expr, scope)?,
				Expression::Constant(Value::Int1(-1)),
			)),
			Expr::IsNull {
				expr,
				negated,
			} => {
				let is_null = Expression::IsNull(Box::new(self.lower(expr, scope)?));
				Ok(if *negated {
					Expression::Not(Box::new(is_null))
				} else {
					is_null
				})
			}
			Expr::InList {
				expr,
				list,
				negated,
			} => {
				let value = self.lower(expr, scope)?;
				let mut alternatives = Vec::with_capacity(list.len());
				for item in list {
					alternatives.push(Expression::eq(value.clone(), self.lower(item, scope)?));
				}
				let any = alternatives
					.into_iter()
					.reduce(|l, r| Expression::binary(BinaryOp::Or, l, r))
					.unwrap_or(Expression::Constant(Value::Boolean(false)));
				Ok(if *negated {
					Expression::Not(Box::new(any))
				} else {
					any
				})
			}
			Expr::InSubquery {
				..
			}
			| Expr::Exists {
				..
			} => Err(Error::validation("subqueries are only supported as WHERE conditions")),
		}
	}

	/// Local columns first, then enclosing queries from the innermost out.
	fn column(&self, qualifier: Option<&str>, name: &str, scope: &Scope) -> Result<Expression> {
		if let Some(index) = scope.resolve(qualifier, name)? {
			return Ok(Expression::Column(index));
		}
		for (correlation, outer) in self.outer.iter().rev() {
			if let Some(column) = outer.resolve(qualifier, name)? {
				return Ok(Expression::Correlated {
					correlation: *correlation,
					column,
				});
			}
		}
		if scope.has_document(qualifier) {
			return Ok(Expression::Field(name.to_string()));
		}
		let display = match qualifier {
			Some(qualifier) => format!("{}.{}", qualifier, name),
			None => name.to_string(),
		};
		Err(Error::not_found("column", display))
	}
}

fn split_conjuncts(expr: &Expr) -> Vec<&Expr> {
	match expr {
		Expr::Binary {
			op: BinaryOperator::And,
			left,
			right,
		} => {
			let mut result = split_conjuncts(left);
			result.extend(split_conjuncts(right));
			result
		}
		other => vec![other],
	}
}

fn binary_op(op: BinaryOperator) -> BinaryOp {
	match op {
		BinaryOperator::Plus => BinaryOp::Add,
		BinaryOperator::Minus => BinaryOp::Subtract,
		BinaryOperator::Multiply => BinaryOp::Multiply,
		BinaryOperator::Divide => BinaryOp::Divide,
		BinaryOperator::Modulo => BinaryOp::Remainder,
		BinaryOperator::Eq => BinaryOp::Equal,
		BinaryOperator::NotEq => BinaryOp::NotEqual,
		BinaryOperator::Lt => BinaryOp::LessThan,
		BinaryOperator::LtEq => BinaryOp::LessThanEqual,
		BinaryOperator::Gt => BinaryOp::GreaterThan,
		BinaryOperator::GtEq => BinaryOp::GreaterThanEqual,
		BinaryOperator::And => BinaryOp::And,
		BinaryOperator::Or => BinaryOp::Or,
	}
}

fn table_shape(table: &TableDef) -> RowShape {
	RowShape::new(table.columns.iter().map(|c| Field::new(c.name.clone(), c.ty)).collect())
}

fn table_scan(table: &TableDef, reference: &str) -> (PlanRef, Scope) {
	let node = ScanNode {
		source: Source::Table(table.id),
		name: table.name.clone(),
		shape: table_shape(table),
		partitions: table.partitions.clone(),
	};
	let scope = Scope::from_shape(reference, &node.shape);
	(PlanNode::Scan(node).into_ref(), scope)
}

fn table_modify(
	table: &TableDef,
	input: PlanRef,
	operation: ModifyOperation,
	updated_columns: Vec<String>,
	source_expressions: Vec<Expression>,
) -> PlanRef {
	PlanNode::TableModify(TableModifyNode {
		input,
		target: Source::Table(table.id),
		name: table.name.clone(),
		operation,
		updated_columns,
		source_expressions,
		fields: table.column_names(),
		partitions: table.partitions.clone(),
	})
	.into_ref()
}

/// Positions of the listed columns in table order; all columns when none are
/// listed.
fn target_columns(table: &TableDef, columns: &[String]) -> Result<Vec<usize>> {
	if columns.is_empty() {
		return Ok((0..table.columns.len()).collect());
	}
	let mut result = Vec::with_capacity(columns.len());
	for name in columns {
		let index = table
			.column_index(name)
			.ok_or_else(|| Error::not_found("column", format!("{}.{}", table.name, name)))?;
		if result.contains(&index) {
			return Err(Error::validation(format!("column '{}' specified more than once", name)));
		}
		result.push(index);
	}
	Ok(result)
}

/// Rejects constants that can never be stored in `column`. Numbers convert
/// between each other.
fn check_assignable(column: &ColumnDef, expression: &Expression) -> Result<()> {
	let Expression::Constant(value) = expression else {
		return Ok(());
	};
	if value.is_undefined() {
		if column.nullable {
			return Ok(());
		}
		return Err(Error::validation(format!("column '{}' is NOT NULL", column.name)));
	}
	let ty = value.get_type();
	if ty == column.ty || (ty.is_number() && column.ty.is_number()) {
		return Ok(());
	}
	Err(Error::validation(format!("cannot assign {} to column '{}' of type {}", ty, column.name, column.ty)))
}
