use crate::meta::ColumnBinding;
use crate::operators::scalar::aggregates::AggregateFunction;
use crate::operators::scalar::value::ScalarValue;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Scalar expressions supported by the optimizer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ScalarExpr {
    /// A reference to a column produced by an operator.
    Column(ColumnBinding),
    /// OperatorBuilder replaces column(name) expressions with column(binding) expressions.
    ColumnName(String),
    Scalar(ScalarValue),
    BinaryExpr {
        lhs: Box<ScalarExpr>,
        op: BinaryOp,
        rhs: Box<ScalarExpr>,
    },
    Not(Box<ScalarExpr>),
    IsNull(Box<ScalarExpr>),
    Alias(Box<ScalarExpr>, String),
    Aggregate {
        func: AggregateFunction,
        distinct: bool,
        args: Vec<ScalarExpr>,
        /// `FILTER (WHERE ...)` clause.
        filter: Option<Box<ScalarExpr>>,
    },
}

impl ScalarExpr {
    /// Returns the name of the column this expression produces when it is a member of a projection list.
    /// The name of an aliased expression is its alias.
    pub fn name(&self) -> String {
        match self {
            ScalarExpr::Alias(_, name) => name.clone(),
            ScalarExpr::ColumnName(name) => name.clone(),
            _ => format!("{}", self),
        }
    }

    /// Returns the expression wrapped by any number of aliases.
    pub fn strip_alias(&self) -> &ScalarExpr {
        match self {
            ScalarExpr::Alias(expr, _) => expr.strip_alias(),
            _ => self,
        }
    }

    /// Returns `true` if this is a `count(*)` aggregate without a filter clause.
    pub fn is_count_star(&self) -> bool {
        matches!(
            self.strip_alias(),
            ScalarExpr::Aggregate {
                func: AggregateFunction::Count,
                distinct: false,
                args,
                filter: None,
            } if args.is_empty()
        )
    }

    /// Performs a depth-first traversal of this expression and recursively rewrites it using the given `rewriter`.
    ///
    /// If an error is returned then traversal terminates.
    pub fn rewrite<V>(self, rewriter: &mut V) -> Result<Self, V::Error>
    where
        V: ExprRewriter,
    {
        let expr = match self {
            ScalarExpr::Column(_) | ScalarExpr::ColumnName(_) | ScalarExpr::Scalar(_) => rewriter.rewrite(self)?,
            ScalarExpr::BinaryExpr { lhs, op, rhs } => {
                let lhs = rewrite_boxed(*lhs, rewriter)?;
                let rhs = rewrite_boxed(*rhs, rewriter)?;
                rewriter.rewrite(ScalarExpr::BinaryExpr { lhs, op, rhs })?
            }
            ScalarExpr::Not(expr) => {
                let expr = rewrite_boxed(*expr, rewriter)?;
                rewriter.rewrite(ScalarExpr::Not(expr))?
            }
            ScalarExpr::IsNull(expr) => {
                let expr = rewrite_boxed(*expr, rewriter)?;
                rewriter.rewrite(ScalarExpr::IsNull(expr))?
            }
            ScalarExpr::Alias(expr, name) => {
                let expr = rewrite_boxed(*expr, rewriter)?;
                rewriter.rewrite(ScalarExpr::Alias(expr, name))?
            }
            ScalarExpr::Aggregate {
                func,
                distinct,
                args,
                filter,
            } => {
                let args: Result<Vec<_>, _> = args.into_iter().map(|e| e.rewrite(rewriter)).collect();
                let filter = match filter {
                    Some(filter) => Some(rewrite_boxed(*filter, rewriter)?),
                    None => None,
                };
                rewriter.rewrite(ScalarExpr::Aggregate {
                    func,
                    distinct,
                    args: args?,
                    filter,
                })?
            }
        };
        Ok(expr)
    }
}

/// Called by [ScalarExpr::rewrite] during a traversal of an expression tree.
pub trait ExprRewriter {
    /// The error type returned when operation fails.
    type Error;

    /// Rewrites the given expression. Called after all children of the given expression are rewritten.
    fn rewrite(&mut self, expr: ScalarExpr) -> Result<ScalarExpr, Self::Error>;
}

fn rewrite_boxed<V>(expr: ScalarExpr, rewriter: &mut V) -> Result<Box<ScalarExpr>, V::Error>
where
    V: ExprRewriter,
{
    let new_expr = expr.rewrite(rewriter)?;
    Ok(Box::new(new_expr))
}

/// Binary operators.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::And => write!(f, "AND"),
            BinaryOp::Or => write!(f, "OR"),
            BinaryOp::Eq => write!(f, "="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::GtEq => write!(f, ">="),
        }
    }
}

impl Display for ScalarExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarExpr::Column(binding) => write!(f, "col:{}", binding),
            ScalarExpr::ColumnName(name) => write!(f, "{}", name),
            ScalarExpr::Scalar(value) => write!(f, "{}", value),
            ScalarExpr::BinaryExpr { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            ScalarExpr::Not(expr) => write!(f, "NOT {}", expr),
            ScalarExpr::IsNull(expr) => write!(f, "{} IS NULL", expr),
            ScalarExpr::Alias(expr, name) => write!(f, "{} AS {}", expr, name),
            ScalarExpr::Aggregate {
                func,
                distinct,
                args,
                filter,
            } => {
                write!(f, "{}(", func)?;
                if *distinct {
                    write!(f, "DISTINCT ")?;
                }
                if args.is_empty() {
                    write!(f, "*")?;
                } else {
                    write!(f, "{}", args.iter().join(", "))?;
                }
                write!(f, ")")?;
                if let Some(filter) = filter {
                    write!(f, " FILTER (WHERE {})", filter)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::operators::scalar::{aggr, col, count_star, scalar};

    #[test]
    fn test_count_star() {
        assert!(count_star().is_count_star(), "count(*)");
        assert!(ScalarExpr::Alias(Box::new(count_star()), "c".into()).is_count_star(), "count(*) AS c");

        let with_filter = ScalarExpr::Aggregate {
            func: AggregateFunction::Count,
            distinct: false,
            args: vec![],
            filter: Some(Box::new(scalar(true))),
        };
        assert!(!with_filter.is_count_star(), "count(*) FILTER");
        assert!(!aggr("count", vec![col("a1")]).is_count_star(), "count(a1)");
        assert!(!aggr("sum", vec![]).is_count_star(), "sum()");
    }

    struct RenameColumns;

    impl ExprRewriter for RenameColumns {
        type Error = ();

        fn rewrite(&mut self, expr: ScalarExpr) -> Result<ScalarExpr, Self::Error> {
            match expr {
                ScalarExpr::ColumnName(name) => Ok(ScalarExpr::ColumnName(format!("{}_x", name))),
                _ => Ok(expr),
            }
        }
    }

    #[test]
    fn test_rewrite_nested_expressions() {
        let not_null = ScalarExpr::Not(Box::new(ScalarExpr::IsNull(Box::new(col("a1")))));
        let expr = ScalarExpr::Alias(Box::new(not_null), "b".into());
        let expr = expr.rewrite(&mut RenameColumns).expect("rewrite");
        assert_eq!(format!("{}", expr), "NOT a1_x IS NULL AS b");

        let filter = ScalarExpr::IsNull(Box::new(col("a2")));
        let expr = crate::operators::scalar::with_filter(aggr("count", vec![col("a1")]), filter);
        let expr = expr.rewrite(&mut RenameColumns).expect("rewrite");
        assert_eq!(format!("{}", expr), "count(a1_x) FILTER (WHERE a2_x IS NULL)");
    }

    #[test]
    fn test_names() {
        let filter = ScalarExpr::BinaryExpr {
            lhs: Box::new(ScalarExpr::Column(ColumnBinding::new(1, 1))),
            op: BinaryOp::Gt,
            rhs: Box::new(scalar(0)),
        };
        let expr = ScalarExpr::Aggregate {
            func: AggregateFunction::Count,
            distinct: false,
            args: vec![],
            filter: Some(Box::new(filter)),
        };
        assert_eq!(expr.name(), "count(*) FILTER (WHERE col:1.1 > 0)");

        let expr = ScalarExpr::Aggregate {
            func: AggregateFunction::Count,
            distinct: true,
            args: vec![ScalarExpr::Column(ColumnBinding::new(1, 0))],
            filter: None,
        };
        assert_eq!(expr.name(), "count(DISTINCT col:1.0)");
        assert_eq!(ScalarExpr::Alias(Box::new(expr), "n".into()).name(), "n");
    }
}
