//! Fluent construction of logical plans.

use std::collections::BTreeSet;
use std::sync::Arc;

use scope::{ColumnInScope, OperatorScope};

use crate::catalog::function::{BindData, CatalogTableFunction, TableFunctionRef};
use crate::catalog::CatalogRef;
use crate::datatypes::DataType;
use crate::error::OptimizerError;
use crate::meta::{ColumnBinding, OperatorIdGenerator};
use crate::operators::relational::logical::{
    JoinType, LogicalAggregate, LogicalDummyScan, LogicalEmpty, LogicalExpressionGet, LogicalFilter, LogicalGet,
    LogicalJoin, LogicalLimit, LogicalOrder, LogicalProjection, LogicalUnion, OrderingOption, TableFilterSet,
};
use crate::operators::scalar::aggregates::AggregateFunction;
use crate::operators::scalar::expr::{BinaryOp, ExprRewriter};
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;

mod scope;

/// Provides API to build a [logical plan](crate::operators::LogicalOperator).
///
/// Column references created by [col](crate::operators::scalar::col) are resolved against the output columns
/// of the current operator and every operator that produces columns is assigned a unique id.
/// Builders created by [new_relation_builder](Self::new_relation_builder) share the id sequence with their parent.
#[derive(Debug, Clone)]
pub struct OperatorBuilder {
    catalog: CatalogRef,
    ids: OperatorIdGenerator,
    scope: OperatorScope,
    operator: Option<LogicalOperator>,
}

impl OperatorBuilder {
    /// Creates a new instance of OperatorBuilder.
    pub fn new(catalog: CatalogRef) -> Self {
        OperatorBuilder {
            catalog,
            ids: OperatorIdGenerator::new(),
            scope: OperatorScope::default(),
            operator: None,
        }
    }

    /// Creates a builder that can be used to construct an independent operator tree (e.g. the right side of a join).
    pub fn new_relation_builder(&self) -> Self {
        OperatorBuilder {
            catalog: self.catalog.clone(),
            ids: self.ids.clone(),
            scope: OperatorScope::default(),
            operator: None,
        }
    }

    /// Adds a scan operator that reads the given columns of the table `source` from the catalog.
    /// A scan operator can only be added as a leaf node of a tree.
    pub fn get(self, source: &str, columns: Vec<impl Into<String>>) -> Result<Self, OptimizerError> {
        self.get_with_function(source, columns, Arc::new(CatalogTableFunction::new()))
    }

    /// Adds a scan operator that reads data using the given table function.
    pub fn get_with_function(
        mut self,
        source: &str,
        columns: Vec<impl Into<String>>,
        function: TableFunctionRef,
    ) -> Result<Self, OptimizerError> {
        self.expect_leaf("scan")?;

        let table = self
            .catalog
            .get_table(source)
            .ok_or_else(|| OptimizerError::argument(format!("Table does not exist. Table: {}", source)))?;

        let table_index = self.ids.next_id();
        let mut names = Vec::new();
        let mut types = Vec::new();
        let mut column_ids = Vec::new();
        let mut scope = Vec::new();

        for (i, name) in columns.into_iter().map(|c| c.into()).enumerate() {
            let position = table.columns().iter().position(|c| c.name().eq_ignore_ascii_case(&name));
            let position = position.ok_or_else(|| {
                OptimizerError::argument(format!("Column does not exist. Column: {}. Table: {}", name, source))
            })?;
            let column = &table.columns()[position];

            scope.push(ColumnInScope {
                name: column.name().to_string(),
                binding: ColumnBinding::new(table_index, i),
                data_type: column.data_type().clone(),
            });
            names.push(column.name().to_string());
            types.push(column.data_type().clone());
            column_ids.push(position);
        }

        let get = LogicalGet {
            table_index,
            function,
            bind_data: BindData {
                table: table.name().to_string(),
                column_ids,
            },
            names,
            types,
            table_filters: TableFilterSet::default(),
        };
        self.add_operator(get, OperatorScope::from_columns(scope));
        Ok(self)
    }

    /// Pushes the given filter on the column `column` into the scan operator.
    /// The current operator must be a scan.
    pub fn table_filter(mut self, column: &str, filter: ScalarExpr) -> Result<Self, OptimizerError> {
        let position = self.scope.position_of(column)?;
        let filter = self.resolve(filter)?;
        match self.operator.as_mut() {
            Some(LogicalOperator::Get(get)) => {
                get.table_filters.push_filter(position, filter);
                Ok(self)
            }
            _ => Err(OptimizerError::argument("Table filters can only be added to a scan operator")),
        }
    }

    /// Adds a filter operator to an operator tree.
    pub fn select(mut self, filter: ScalarExpr) -> Result<Self, OptimizerError> {
        let input = self.take_input("filter")?;
        let predicate = self.resolve(filter)?;
        no_aggregates(&predicate, "WHERE clause")?;
        if resolve_expr_type(&predicate, &self.scope)? != DataType::Bool {
            return Err(OptimizerError::argument(format!("Filter expression must be boolean: {}", predicate)));
        }

        let scope = self.scope.clone();
        let filter = LogicalFilter {
            predicate,
            input: Box::new(input),
        };
        self.add_operator(filter, scope);
        Ok(self)
    }

    /// Adds a projection operator to an operator tree.
    /// Use [aggregate](Self::aggregate) to add an aggregate operator.
    pub fn project(mut self, exprs: Vec<ScalarExpr>) -> Result<Self, OptimizerError> {
        let input = self.take_input("projection")?;
        let table_index = self.ids.next_id();

        let mut columns = Vec::with_capacity(exprs.len());
        let mut resolved = Vec::with_capacity(exprs.len());
        for (i, expr) in exprs.into_iter().enumerate() {
            let name = expr.name();
            let expr = self.resolve(expr)?;
            no_aggregates(&expr, "projection")?;
            columns.push(ColumnInScope {
                name,
                binding: ColumnBinding::new(table_index, i),
                data_type: resolve_expr_type(&expr, &self.scope)?,
            });
            resolved.push(expr);
        }

        let projection = LogicalProjection {
            table_index,
            exprs: resolved,
            input: Box::new(input),
        };
        self.add_operator(projection, OperatorScope::from_columns(columns));
        Ok(self)
    }

    /// Adds an aggregate operator. The output columns are the group expressions followed
    /// by the aggregate expressions. Without group expressions the aggregate returns exactly one row.
    pub fn aggregate(self, aggregates: Vec<ScalarExpr>, groups: Vec<ScalarExpr>) -> Result<Self, OptimizerError> {
        let grouping_sets = if groups.is_empty() {
            vec![]
        } else {
            vec![(0..groups.len()).collect()]
        };
        self.aggregate_with_grouping_sets(aggregates, groups, grouping_sets)
    }

    /// Adds an aggregate operator with the given grouping sets (`GROUP BY GROUPING SETS (...)`).
    /// Each grouping set lists positions of expressions in `groups`.
    pub fn aggregate_with_grouping_sets(
        mut self,
        aggregates: Vec<ScalarExpr>,
        groups: Vec<ScalarExpr>,
        grouping_sets: Vec<Vec<usize>>,
    ) -> Result<Self, OptimizerError> {
        let input = self.take_input("aggregate")?;
        let group_index = self.ids.next_id();
        let aggregate_index = self.ids.next_id();

        let mut columns = Vec::with_capacity(groups.len() + aggregates.len());
        let mut group_exprs = Vec::with_capacity(groups.len());
        for (i, expr) in groups.into_iter().enumerate() {
            let name = expr.name();
            let expr = self.resolve(expr)?;
            no_aggregates(&expr, "GROUP BY clause")?;
            columns.push(ColumnInScope {
                name,
                binding: ColumnBinding::new(group_index, i),
                data_type: resolve_expr_type(&expr, &self.scope)?,
            });
            group_exprs.push(expr);
        }

        let mut aggregate_exprs = Vec::with_capacity(aggregates.len());
        for (i, expr) in aggregates.into_iter().enumerate() {
            let name = expr.name();
            let expr = self.resolve(expr)?;
            if !matches!(expr.strip_alias(), ScalarExpr::Aggregate { .. }) {
                return Err(OptimizerError::argument(format!("Expected an aggregate expression: {}", expr)));
            }
            columns.push(ColumnInScope {
                name,
                binding: ColumnBinding::new(aggregate_index, i),
                data_type: resolve_expr_type(&expr, &self.scope)?,
            });
            aggregate_exprs.push(expr);
        }

        let mut sets = Vec::with_capacity(grouping_sets.len());
        for set in grouping_sets {
            if let Some(i) = set.iter().find(|i| **i >= group_exprs.len()) {
                return Err(OptimizerError::argument(format!("Grouping set references an unknown group: {}", i)));
            }
            sets.push(set.into_iter().collect::<BTreeSet<_>>());
        }

        let mut aggregate = LogicalAggregate::new(group_index, aggregate_index, group_exprs, aggregate_exprs, input);
        aggregate.grouping_sets = sets;
        self.add_operator(aggregate, OperatorScope::from_columns(columns));
        Ok(self)
    }

    /// Adds a join operator. Joins without a condition are cross joins.
    pub fn join(mut self, mut right: OperatorBuilder, condition: Option<ScalarExpr>) -> Result<Self, OptimizerError> {
        let left = self.take_input("join")?;
        let right_input = right.take_input("join")?;

        self.scope = self.scope.join(&right.scope);
        let (join_type, condition) = match condition {
            Some(condition) => {
                let condition = self.resolve(condition)?;
                no_aggregates(&condition, "join condition")?;
                (JoinType::Inner, Some(condition))
            }
            None => (JoinType::Cross, None),
        };

        let scope = self.scope.clone();
        let join = LogicalJoin {
            join_type,
            left: Box::new(left),
            right: Box::new(right_input),
            condition,
        };
        self.add_operator(join, scope);
        Ok(self)
    }

    /// Adds a `UNION ALL` operator.
    pub fn union_all(self, right: OperatorBuilder) -> Result<Self, OptimizerError> {
        self.add_union(right, true)
    }

    /// Adds a `UNION` operator.
    pub fn union(self, right: OperatorBuilder) -> Result<Self, OptimizerError> {
        self.add_union(right, false)
    }

    /// Adds a limit operator.
    pub fn limit(self, rows: u64) -> Result<Self, OptimizerError> {
        self.limit_with_offset(rows, 0)
    }

    /// Adds a limit operator that skips the first `offset` rows.
    pub fn limit_with_offset(mut self, rows: u64, offset: u64) -> Result<Self, OptimizerError> {
        let input = self.take_input("limit")?;
        let scope = self.scope.clone();
        let limit = LogicalLimit {
            limit: rows,
            offset,
            input: Box::new(input),
        };
        self.add_operator(limit, scope);
        Ok(self)
    }

    /// Adds an order operator.
    pub fn order_by(mut self, ordering: Vec<OrderingOption>) -> Result<Self, OptimizerError> {
        let input = self.take_input("order")?;
        let mut options = Vec::with_capacity(ordering.len());
        for option in ordering {
            let expr = self.resolve(option.expr)?;
            options.push(OrderingOption {
                expr,
                descending: option.descending,
            });
        }

        let scope = self.scope.clone();
        let order = LogicalOrder {
            ordering: options,
            input: Box::new(input),
        };
        self.add_operator(order, scope);
        Ok(self)
    }

    /// Adds an operator that returns the given list of rows. Output columns are named `column1`, `column2`, ...
    /// Such operator can only be added as a leaf node of a tree.
    pub fn values(mut self, rows: Vec<Vec<ScalarExpr>>) -> Result<Self, OptimizerError> {
        self.expect_leaf("VALUES")?;
        let num_columns = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(OptimizerError::argument("VALUES list is empty")),
        };
        if rows.iter().any(|row| row.len() != num_columns) {
            return Err(OptimizerError::argument("VALUE lists must all have the same length"));
        }

        let mut resolved = Vec::with_capacity(rows.len());
        for row in rows {
            let row: Result<Vec<_>, _> = row.into_iter().map(|expr| self.resolve(expr)).collect();
            resolved.push(row?);
        }

        let empty = OperatorScope::default();
        let mut types = Vec::with_capacity(num_columns);
        for i in 0..num_columns {
            let mut data_type = DataType::Null;
            for row in resolved.iter() {
                let value_type = resolve_expr_type(&row[i], &empty)?;
                data_type = match (data_type, value_type) {
                    (DataType::Null, t) => t,
                    (t, DataType::Null) => t,
                    (l, r) if l == r => l,
                    (l, r) => {
                        let message = format!("VALUES column{} has values of different types: {} and {}", i + 1, l, r);
                        return Err(OptimizerError::argument(message));
                    }
                };
            }
            types.push(data_type);
        }

        let input = LogicalDummyScan {
            table_index: self.ids.next_id(),
        };
        let table_index = self.ids.next_id();
        let columns = types
            .iter()
            .enumerate()
            .map(|(i, data_type)| ColumnInScope {
                name: format!("column{}", i + 1),
                binding: ColumnBinding::new(table_index, i),
                data_type: data_type.clone(),
            })
            .collect();

        let expression_get = LogicalExpressionGet {
            table_index,
            types,
            expressions: resolved,
            input: Box::new(LogicalOperator::DummyScan(input)),
        };
        self.add_operator(expression_get, OperatorScope::from_columns(columns));
        Ok(self)
    }

    /// Adds an operator that produces no rows and has the given columns.
    /// Such operator can only be added as a leaf node of a tree.
    pub fn empty(mut self, columns: Vec<(&str, DataType)>) -> Result<Self, OptimizerError> {
        self.expect_leaf("empty")?;
        let table_index = self.ids.next_id();
        let scope = columns
            .iter()
            .enumerate()
            .map(|(i, (name, data_type))| ColumnInScope {
                name: name.to_string(),
                binding: ColumnBinding::new(table_index, i),
                data_type: data_type.clone(),
            })
            .collect();
        let empty = LogicalEmpty {
            table_index,
            types: columns.into_iter().map(|(_, data_type)| data_type).collect(),
        };
        self.add_operator(empty, OperatorScope::from_columns(scope));
        Ok(self)
    }

    /// Creates an operator tree and returns its root.
    pub fn build(self) -> Result<LogicalOperator, OptimizerError> {
        self.operator.ok_or_else(|| OptimizerError::argument("Build: No operator"))
    }

    fn add_union(mut self, mut right: OperatorBuilder, all: bool) -> Result<Self, OptimizerError> {
        let left = self.take_input("union")?;
        let right_input = right.take_input("union")?;

        let left_columns = self.scope.columns();
        let right_columns = right.scope.columns();
        if left_columns.len() != right_columns.len() {
            return Err(OptimizerError::argument("UNION: Number of columns does not match"));
        }
        for (l, r) in left_columns.iter().zip(right_columns.iter()) {
            if l.data_type != r.data_type {
                let message = format!("UNION: Data type does not match. {}: {} {}: {}", l.name, l.data_type, r.name, r.data_type);
                return Err(OptimizerError::argument(message));
            }
        }

        let table_index = self.ids.next_id();
        let columns: Vec<_> = left_columns
            .iter()
            .enumerate()
            .map(|(i, c)| ColumnInScope {
                name: c.name.clone(),
                binding: ColumnBinding::new(table_index, i),
                data_type: c.data_type.clone(),
            })
            .collect();

        let union = LogicalUnion {
            table_index,
            column_count: columns.len(),
            all,
            left: Box::new(left),
            right: Box::new(right_input),
        };
        self.add_operator(union, OperatorScope::from_columns(columns));
        Ok(self)
    }

    fn add_operator<T>(&mut self, operator: T, scope: OperatorScope)
    where
        T: Into<LogicalOperator>,
    {
        self.operator = Some(operator.into());
        self.scope = scope;
    }

    fn take_input(&mut self, operator: &str) -> Result<LogicalOperator, OptimizerError> {
        self.operator
            .take()
            .ok_or_else(|| OptimizerError::argument(format!("No input operator for {}", operator)))
    }

    fn expect_leaf(&self, operator: &str) -> Result<(), OptimizerError> {
        if self.operator.is_some() {
            let message = format!("Adding {} operator on top of another operator is not allowed", operator);
            Err(OptimizerError::argument(message))
        } else {
            Ok(())
        }
    }

    fn resolve(&self, expr: ScalarExpr) -> Result<ScalarExpr, OptimizerError> {
        let mut rewriter = ResolveColumns { scope: &self.scope };
        expr.rewrite(&mut rewriter)
    }
}

/// Replaces references to columns by name with references to columns by binding.
struct ResolveColumns<'a> {
    scope: &'a OperatorScope,
}

impl ExprRewriter for ResolveColumns<'_> {
    type Error = OptimizerError;

    fn rewrite(&mut self, expr: ScalarExpr) -> Result<ScalarExpr, Self::Error> {
        match expr {
            ScalarExpr::ColumnName(name) => {
                let column = self.scope.find_column_by_name(&name)?;
                Ok(ScalarExpr::Column(column.binding))
            }
            ScalarExpr::Column(binding) if self.scope.find_column_by_binding(&binding).is_none() => {
                Err(OptimizerError::argument(format!("Unexpected column: <{}>. {}", binding, self.scope)))
            }
            _ => Ok(expr),
        }
    }
}

fn no_aggregates(expr: &ScalarExpr, clause: &str) -> Result<(), OptimizerError> {
    fn has_aggregates(expr: &ScalarExpr) -> bool {
        match expr {
            ScalarExpr::Column(_) | ScalarExpr::ColumnName(_) | ScalarExpr::Scalar(_) => false,
            ScalarExpr::BinaryExpr { lhs, rhs, .. } => has_aggregates(lhs) || has_aggregates(rhs),
            ScalarExpr::Not(expr) | ScalarExpr::IsNull(expr) | ScalarExpr::Alias(expr, _) => has_aggregates(expr),
            ScalarExpr::Aggregate { .. } => true,
        }
    }
    if has_aggregates(expr) {
        Err(OptimizerError::argument(format!("Aggregate expressions are not allowed in {}: {}", clause, expr)))
    } else {
        Ok(())
    }
}

/// Returns the type of the given expression. Column references must be resolved.
fn resolve_expr_type(expr: &ScalarExpr, scope: &OperatorScope) -> Result<DataType, OptimizerError> {
    match expr {
        ScalarExpr::Column(binding) => scope
            .find_column_by_binding(binding)
            .map(|c| c.data_type.clone())
            .ok_or_else(|| OptimizerError::internal(format!("Unresolved column: {}", binding))),
        ScalarExpr::ColumnName(name) => Err(OptimizerError::internal(format!("Unresolved column: {}", name))),
        ScalarExpr::Scalar(value) => Ok(value.data_type()),
        ScalarExpr::BinaryExpr { lhs, op, rhs } => {
            let lhs_type = resolve_expr_type(lhs, scope)?;
            let rhs_type = resolve_expr_type(rhs, scope)?;
            let expect_bool = matches!(op, BinaryOp::And | BinaryOp::Or);
            let compatible = match (&lhs_type, &rhs_type) {
                (DataType::Null, _) | (_, DataType::Null) => true,
                (l, _) if expect_bool && l != &DataType::Bool => false,
                (l, r) => l == r,
            };
            if compatible {
                Ok(DataType::Bool)
            } else {
                Err(OptimizerError::argument(format!(
                    "Expression {} is not supported for types {} and {}",
                    expr, lhs_type, rhs_type
                )))
            }
        }
        ScalarExpr::Not(expr) => match resolve_expr_type(expr, scope)? {
            DataType::Bool | DataType::Null => Ok(DataType::Bool),
            data_type => Err(OptimizerError::argument(format!("NOT expects a boolean but got {}", data_type))),
        },
        ScalarExpr::IsNull(_) => Ok(DataType::Bool),
        ScalarExpr::Alias(expr, _) => resolve_expr_type(expr, scope),
        ScalarExpr::Aggregate { func, args, .. } => {
            let arg_type = match args.as_slice() {
                [] if func == &AggregateFunction::Count => None,
                [arg] => Some(resolve_expr_type(arg, scope)?),
                _ => {
                    let message = format!("Aggregate function {} expects a single argument: {}", func, expr);
                    return Err(OptimizerError::argument(message));
                }
            };
            match (func, arg_type) {
                (AggregateFunction::Count, _) => Ok(DataType::Int64),
                (AggregateFunction::Avg, _) => Ok(DataType::Float64),
                (AggregateFunction::Sum, Some(DataType::Int32)) | (AggregateFunction::Sum, Some(DataType::Int64)) => {
                    Ok(DataType::Int64)
                }
                (AggregateFunction::Sum, Some(DataType::Float64)) => Ok(DataType::Float64),
                (AggregateFunction::Sum, Some(data_type)) => {
                    Err(OptimizerError::argument(format!("sum is not supported for type {}", data_type)))
                }
                (_, Some(data_type)) => Ok(data_type),
                (_, None) => Err(OptimizerError::internal("Aggregate without arguments")),
            }
        }
    }
}
