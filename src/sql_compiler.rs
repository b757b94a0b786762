//! SQL compiler that renders condition trees and assembles the final query text.

use tracing::debug;

use crate::ast::{ConditionNode, QuerySpec};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::parser::Parser;
use crate::value::ValueSerializer;

/// Flattens a condition tree into a boolean expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer {
    serializer: ValueSerializer,
}

impl TreeRenderer {
    pub fn new(serializer: ValueSerializer) -> Self {
        Self { serializer }
    }

    /// Render `node` without surrounding parentheses. Nested groups are
    /// parenthesized, the ungrouped left side of an OR chain is not.
    /// Children that render to nothing are dropped.
    pub fn render(&self, node: &ConditionNode) -> Result<String, CompileError> {
        match node {
            ConditionNode::Leaf(leaf) => {
                let fragment = self.serializer.render(&leaf.value, leaf.operator)?;
                Ok(format!("{} {}", leaf.field, fragment))
            }
            ConditionNode::Combinator { logic, children, .. } => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    let text = self.render(child)?;
                    if text.is_empty() {
                        continue;
                    }
                    if child.is_group() {
                        parts.push(format!("({text})"));
                    } else {
                        parts.push(text);
                    }
                }
                let separator = format!(" {} ", logic.keyword());
                Ok(parts.join(&separator))
            }
        }
    }
}

/// SQL Compiler that converts filter documents to query text
#[derive(Debug, Clone, Default)]
pub struct SqlCompiler {
    config: CompilerConfig,
    renderer: TreeRenderer,
}

impl SqlCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: CompilerConfig) -> Self {
        let renderer = TreeRenderer::new(ValueSerializer::new(config.quote_escaping));
        Self { config, renderer }
    }

    /// Parse a JSON document and compile it into query text.
    pub fn compile(&self, document: &str) -> Result<String, CompileError> {
        let spec = Parser::new(self.config.max_depth).parse_document(document)?;
        self.assemble(&spec)
    }

    /// Assemble the clauses of `spec` in the fixed order select, from, where,
    /// order, limit, joined by newlines and terminated with `;`.
    pub fn assemble(&self, spec: &QuerySpec) -> Result<String, CompileError> {
        if spec.table.is_empty() {
            return Err(CompileError::MissingTable);
        }

        let mut clauses = Vec::with_capacity(5);

        if spec.select_fields.is_empty() {
            clauses.push("select *".to_string());
        } else {
            clauses.push(format!("select {}", spec.select_fields.join(", ")));
        }

        clauses.push(format!("from {}", spec.table));

        if let Some(filter) = &spec.filter {
            let condition = self.renderer.render(filter)?;
            if !condition.is_empty() {
                clauses.push(format!("where {condition}"));
            }
        }

        if let Some(order) = &spec.order_by {
            clauses.push(format!("order by {} {}", order.field, order.direction));
        }

        if let Some(limit) = spec.limit {
            clauses.push(format!("limit {limit}"));
        }

        debug!(table = %spec.table, clauses = clauses.len(), "assembled query");

        Ok(clauses.join("\n") + ";")
    }
}
