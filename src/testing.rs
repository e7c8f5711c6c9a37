use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Once};

use crate::catalog::mutable::MutableCatalog;
use crate::catalog::{TableBuilder, DEFAULT_SCHEMA};
use crate::context::QueryContext;
use crate::datatypes::DataType;
use crate::error::OptimizerError;
use crate::meta::ColumnBinding;
use crate::operators::builder::OperatorBuilder;
use crate::operators::format::format_operator_tree;
use crate::operators::relational::logical::LogicalAggregate;
use crate::operators::scalar::aggregates::AggregateFunction;
use crate::operators::scalar::value::ScalarValue;
use crate::operators::scalar::{BinaryOp, ScalarExpr};
use crate::operators::LogicalOperator;
use crate::statistics::column::ColumnStatistics;
use crate::statistics::partition::{CountType, PartitionStatistics};
use crate::statistics::propagator::StatisticsPropagator;
use crate::statistics::{NodeStatistics, StatisticsMap};

static INIT_LOG: Once = Once::new();

/// A row of a table or a row returned by an operator.
pub type Row = Vec<ScalarValue>;

/// Provides a test setup for the [statistics propagator].
///
/// [statistics propagator]: crate::statistics::propagator::StatisticsPropagator
pub struct PropagatorTester {
    catalog: Arc<MutableCatalog>,
    data: HashMap<String, Vec<Row>>,
}

impl PropagatorTester {
    pub fn new() -> Self {
        INIT_LOG.call_once(pretty_env_logger::init);

        PropagatorTester {
            catalog: Arc::new(MutableCatalog::new()),
            data: HashMap::new(),
        }
    }

    /// Adds a table with the given name to the catalog. The table has no data.
    pub fn add_table<F>(&mut self, name: &str, f: F)
    where
        F: FnOnce(TableBuilder) -> TableBuilder,
    {
        let table = f(TableBuilder::new(name)).build().expect("Failed to build a table");
        self.catalog.add_table(DEFAULT_SCHEMA, table).expect("Failed to add a table");
    }

    /// Adds a table that stores the given partitions. The row count of each partition is reported as
    /// the number of rows in that partition with the given count type.
    pub fn add_table_with_data(&mut self, name: &str, columns: &[(&str, DataType)], partitions: Vec<(Vec<Row>, CountType)>) {
        let mut builder = TableBuilder::new(name);
        for (column, data_type) in columns {
            builder = builder.add_column(column, data_type.clone());
        }

        let mut rows = Vec::new();
        for (partition, count_type) in partitions {
            builder = builder.add_partition(PartitionStatistics {
                count: partition.len() as u64,
                count_type,
            });
            rows.extend(partition);
        }
        builder = builder.add_row_count(rows.len() as u64);

        let table = builder.build().expect("Failed to build a table");
        self.catalog.add_table(DEFAULT_SCHEMA, table).expect("Failed to add a table");
        self.data.insert(name.to_string(), rows);
    }

    pub fn catalog(&self) -> &MutableCatalog {
        &self.catalog
    }

    pub fn context(&self) -> QueryContext {
        QueryContext::new(self.catalog.clone())
    }

    /// Builds a plan using the given function.
    pub fn build<F>(&self, f: F) -> LogicalOperator
    where
        F: FnOnce(OperatorBuilder) -> Result<OperatorBuilder, OptimizerError>,
    {
        let builder = OperatorBuilder::new(self.catalog.clone());
        f(builder).and_then(|b| b.build()).expect("Failed to build an operator tree")
    }

    /// Builds a plan using the given function and propagates statistics through it.
    pub fn propagate<F>(&self, f: F) -> PropagationResult
    where
        F: FnOnce(OperatorBuilder) -> Result<OperatorBuilder, OptimizerError>,
    {
        self.propagate_with(f, |propagator| propagator)
    }

    /// Same as [propagate](Self::propagate) but allows to configure the propagator.
    pub fn propagate_with<F, C>(&self, f: F, configure: C) -> PropagationResult
    where
        F: FnOnce(OperatorBuilder) -> Result<OperatorBuilder, OptimizerError>,
        C: for<'a> FnOnce(StatisticsPropagator<'a>) -> StatisticsPropagator<'a>,
    {
        let mut plan = self.build(f);
        let context = self.context();
        let mut propagator = configure(StatisticsPropagator::new(&context));
        let statistics = propagator.propagate(&mut plan).expect("Failed to propagate statistics");

        PropagationResult {
            plan,
            statistics,
            statistics_map: propagator.into_statistics_map(),
        }
    }

    /// Executes the given plan against the data added by [add_table_with_data](Self::add_table_with_data).
    pub fn execute(&self, plan: &LogicalOperator) -> Vec<Row> {
        execute(plan, &self.data)
    }
}

/// The result of [PropagatorTester::propagate].
pub struct PropagationResult {
    /// The plan after statistics propagation.
    pub plan: LogicalOperator,
    /// Statistics of the root operator.
    pub statistics: Option<NodeStatistics>,
    /// Column statistics.
    pub statistics_map: StatisticsMap,
}

impl PropagationResult {
    /// Returns statistics of the i-th column of the given operator.
    pub fn column(&self, operator_id: usize, column: usize) -> Option<&ColumnStatistics> {
        self.statistics_map.get(&ColumnBinding::new(operator_id, column))
    }

    /// Returns the first aggregate operator of the plan.
    pub fn aggregate(&self) -> Option<&LogicalAggregate> {
        fn find(operator: &LogicalOperator) -> Option<&LogicalAggregate> {
            match operator {
                LogicalOperator::Aggregate(aggr) => Some(aggr),
                _ => operator.children().into_iter().find_map(find),
            }
        }
        find(&self.plan)
    }

    pub fn expect_plan(&self, expected: &str) {
        let actual = format_operator_tree(&self.plan);
        assert_eq!(actual, expected.trim(), "Unexpected plan");
    }
}

fn execute(operator: &LogicalOperator, data: &HashMap<String, Vec<Row>>) -> Vec<Row> {
    match operator {
        LogicalOperator::Get(get) => {
            let rows = data
                .get(&get.bind_data.table)
                .unwrap_or_else(|| panic!("No data for table {}", get.bind_data.table));
            let bindings = operator.output_bindings();
            rows.iter()
                .map(|row| get.bind_data.column_ids.iter().map(|i| row[*i].clone()).collect::<Row>())
                .filter(|row| get.table_filters.iter().all(|(_, filter)| is_true(&eval(filter, &bindings, row))))
                .collect()
        }
        LogicalOperator::Projection(projection) => {
            let bindings = projection.input.output_bindings();
            execute(&projection.input, data)
                .iter()
                .map(|row| projection.exprs.iter().map(|expr| eval(expr, &bindings, row)).collect())
                .collect()
        }
        LogicalOperator::Filter(filter) => {
            let bindings = filter.input.output_bindings();
            execute(&filter.input, data)
                .into_iter()
                .filter(|row| is_true(&eval(&filter.predicate, &bindings, row)))
                .collect()
        }
        LogicalOperator::Aggregate(aggr) => {
            let bindings = aggr.input.output_bindings();
            let rows = execute(&aggr.input, data);
            let mut groups: BTreeMap<Row, Vec<Row>> = BTreeMap::new();
            if aggr.groups.is_empty() {
                groups.insert(vec![], vec![]);
            }
            for row in rows {
                let key = aggr.groups.iter().map(|expr| eval(expr, &bindings, &row)).collect();
                groups.entry(key).or_default().push(row);
            }
            groups
                .into_iter()
                .map(|(mut key, rows)| {
                    key.extend(aggr.aggregates.iter().map(|expr| eval_count(expr, &bindings, &rows)));
                    key
                })
                .collect()
        }
        LogicalOperator::DummyScan(_) => vec![vec![]],
        LogicalOperator::ExpressionGet(get) => {
            let bindings = get.input.output_bindings();
            let mut result = Vec::new();
            for row in execute(&get.input, data) {
                for exprs in get.expressions.iter() {
                    result.push(exprs.iter().map(|expr| eval(expr, &bindings, &row)).collect());
                }
            }
            result
        }
        LogicalOperator::Empty(_) => vec![],
        _ => panic!("Unsupported operator: {}", format_operator_tree(operator)),
    }
}

fn eval_count(expr: &ScalarExpr, bindings: &[ColumnBinding], rows: &[Row]) -> ScalarValue {
    match expr.strip_alias() {
        ScalarExpr::Aggregate {
            func: AggregateFunction::Count,
            distinct: false,
            args,
            filter,
        } => {
            let count = rows
                .iter()
                .filter(|row| filter.as_ref().map(|f| is_true(&eval(f, bindings, row))).unwrap_or(true))
                .filter(|row| args.iter().all(|arg| !eval(arg, bindings, row).is_null()))
                .count();
            ScalarValue::Int64(count as i64)
        }
        _ => panic!("Unsupported aggregate: {}", expr),
    }
}

fn eval(expr: &ScalarExpr, bindings: &[ColumnBinding], row: &[ScalarValue]) -> ScalarValue {
    match expr {
        ScalarExpr::Column(binding) => {
            let i = bindings.iter().position(|b| b == binding).unwrap_or_else(|| panic!("Unknown column: {}", binding));
            row[i].clone()
        }
        ScalarExpr::Scalar(value) => value.clone(),
        ScalarExpr::Alias(expr, _) => eval(expr, bindings, row),
        ScalarExpr::IsNull(expr) => ScalarValue::Bool(eval(expr, bindings, row).is_null()),
        ScalarExpr::Not(expr) => match eval(expr, bindings, row) {
            ScalarValue::Bool(value) => ScalarValue::Bool(!value),
            _ => ScalarValue::Null,
        },
        ScalarExpr::BinaryExpr { lhs, op, rhs } => {
            let lhs = eval(lhs, bindings, row);
            let rhs = eval(rhs, bindings, row);
            match op {
                BinaryOp::And => match (lhs, rhs) {
                    (ScalarValue::Bool(false), _) | (_, ScalarValue::Bool(false)) => ScalarValue::Bool(false),
                    (ScalarValue::Bool(true), ScalarValue::Bool(true)) => ScalarValue::Bool(true),
                    _ => ScalarValue::Null,
                },
                BinaryOp::Or => match (lhs, rhs) {
                    (ScalarValue::Bool(true), _) | (_, ScalarValue::Bool(true)) => ScalarValue::Bool(true),
                    (ScalarValue::Bool(false), ScalarValue::Bool(false)) => ScalarValue::Bool(false),
                    _ => ScalarValue::Null,
                },
                _ if lhs.is_null() || rhs.is_null() => ScalarValue::Null,
                _ => {
                    let ordering = lhs.cmp(&rhs);
                    let result = match op {
                        BinaryOp::Eq => ordering == Ordering::Equal,
                        BinaryOp::NotEq => ordering != Ordering::Equal,
                        BinaryOp::Lt => ordering == Ordering::Less,
                        BinaryOp::LtEq => ordering != Ordering::Greater,
                        BinaryOp::Gt => ordering == Ordering::Greater,
                        BinaryOp::GtEq => ordering != Ordering::Less,
                        BinaryOp::And | BinaryOp::Or => unreachable!(),
                    };
                    ScalarValue::Bool(result)
                }
            }
        }
        ScalarExpr::ColumnName(_) | ScalarExpr::Aggregate { .. } => panic!("Unable to evaluate: {}", expr),
    }
}

fn is_true(value: &ScalarValue) -> bool {
    matches!(value, ScalarValue::Bool(true))
}
