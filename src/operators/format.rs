//! Textual representation of logical plans.

use std::fmt::Display;

use itertools::Itertools;

use crate::operators::LogicalOperator;

/// Builds the following textual representation of the given operator tree:
///
/// ```text:
///  RootExpr [root-expr-attributes]
///    input: Expr_0 [expr_0-attributes]
///      input: LeafExpr_0 [leaf-expr_0-attributes]
///    ...
/// ```
pub fn format_operator_tree(operator: &LogicalOperator) -> String {
    let mut fmt = StringOperatorFormatter::new(0);
    operator.format_expr(&mut fmt);
    fmt.finish()
}

/// Allows operators to describe themselves. See [format_operator_tree].
pub trait OperatorFormatter {
    /// Writes the name of an operator.
    fn write_name(&mut self, name: &str);

    /// Writes a value of `source` attribute of an operator.
    fn write_source(&mut self, source: &str);

    /// Writes a value of some attribute of an operator.
    fn write_value<D>(&mut self, name: &str, value: D)
    where
        D: Display;

    /// Writes values of some attribute of an operator. Does nothing if `values` is empty.
    fn write_values<D>(&mut self, name: &str, values: &[D])
    where
        D: Display;

    /// Writes an input operator.
    fn write_input(&mut self, name: &str, input: &LogicalOperator);
}

struct StringOperatorFormatter {
    depth: usize,
    header: String,
    inputs: Vec<String>,
}

impl StringOperatorFormatter {
    fn new(depth: usize) -> Self {
        StringOperatorFormatter {
            depth,
            header: String::new(),
            inputs: Vec::new(),
        }
    }

    fn finish(self) -> String {
        let mut buf = self.header;
        for input in self.inputs {
            buf.push('\n');
            buf.push_str(input.as_str());
        }
        buf
    }
}

impl OperatorFormatter for StringOperatorFormatter {
    fn write_name(&mut self, name: &str) {
        self.header.push_str(name);
    }

    fn write_source(&mut self, source: &str) {
        self.header.push(' ');
        self.header.push_str(source);
    }

    fn write_value<D>(&mut self, name: &str, value: D)
    where
        D: Display,
    {
        self.header.push(' ');
        if !name.is_empty() {
            self.header.push_str(name);
            self.header.push('=');
        }
        self.header.push_str(value.to_string().as_str());
    }

    fn write_values<D>(&mut self, name: &str, values: &[D])
    where
        D: Display,
    {
        if values.is_empty() {
            return;
        }
        self.header.push(' ');
        self.header.push_str(name);
        self.header.push_str("=[");
        self.header.push_str(values.iter().join(", ").as_str());
        self.header.push(']');
    }

    fn write_input(&mut self, name: &str, input: &LogicalOperator) {
        let mut fmt = StringOperatorFormatter::new(self.depth + 1);
        input.format_expr(&mut fmt);

        let padding = "  ".repeat(self.depth + 1);
        let input = format!("{}{}: {}", padding, name, fmt.finish());
        self.inputs.push(input);
    }
}
