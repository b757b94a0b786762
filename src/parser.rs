//! 输入文档的语法分析器
//!
//! ## 解析流程
//!
//! ```text
//! parse_document()
//!   ├─ serde_json 解析 (保持对象键的顺序)
//!   ├─ "select" → 字段列表, 缺省为 *
//!   ├─ "from"   → 表名, 缺失或为空时立即返回 MissingTable
//!   ├─ "where"  → build_condition()
//!   │              ├─ parse_key() 对每个键分类
//!   │              ├─ 普通键      → 叶子节点, 按文档顺序用 AND 连接
//!   │              ├─ and / and_* → 递归构建, 在原位置 AND 连接
//!   │              └─ or / or_*   → 递归构建, 最后 OR 连接到累积结果
//!   ├─ "order"  → 第一个 (字段, 方向)
//!   └─ "limit"  → 非负整数, 其他值忽略
//! ```
//!
//! ## 优先级
//!
//! AND 与 OR 同级, 从左到右累积, OR 左侧不加括号：
//!
//! ```text
//! {"a": 1, "or_x": {"b": 2}, "and_y": {"c": 3}}
//!   => a = 1 and (c = 3) or (b = 2)
//! {"and_y": {"c": 3}, "a": 1}
//!   => (c = 3) and a = 1
//! ```

use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::ast::{ConditionLeaf, ConditionNode, FilterValue, Logic, Numeric, OrderBy, QuerySpec};
use crate::error::CompileError;
use crate::key_grammar::{parse_key, KeyClass};

pub struct Parser {
    max_depth: usize,
}

impl Parser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// 将JSON文档解析为 QuerySpec
    pub fn parse_document(&self, text: &str) -> Result<QuerySpec, CompileError> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| CompileError::DocumentParse(e.to_string()))?;
        let Value::Object(document) = document else {
            return Err(CompileError::DocumentParse(
                "expected a JSON object at the top level".to_string(),
            ));
        };

        let select_fields = parse_select(document.get("select"))?;
        let table = parse_table(document.get("from"))?;
        // 表名在 where 之前检查
        if table.is_empty() {
            return Err(CompileError::MissingTable);
        }

        let filter = match document.get("where") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(Value::Object(conditions)) => Some(self.build_condition(conditions)?),
            Some(_) => return Err(CompileError::type_mismatch("where", "a mapping")),
        };

        let order_by = parse_order(document.get("order"))?;
        let limit = document.get("limit").and_then(parse_limit);

        debug!(
            table = %table,
            fields = select_fields.len(),
            has_filter = filter.is_some(),
            "parsed query document"
        );

        Ok(QuerySpec {
            select_fields,
            table,
            filter,
            order_by,
            limit,
        })
    }

    /// 将过滤条件映射构建为条件树
    pub fn build_condition(&self, conditions: &Map<String, Value>) -> Result<ConditionNode, CompileError> {
        self.build_at_depth(conditions, 0)
    }

    fn build_at_depth(
        &self,
        conditions: &Map<String, Value>,
        depth: usize,
    ) -> Result<ConditionNode, CompileError> {
        if depth > self.max_depth {
            return Err(CompileError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let mut conjuncts = Vec::new();
        let mut or_branches = Vec::new();

        for (key, value) in conditions {
            match parse_key(key)? {
                KeyClass::Combinator(logic) => {
                    let Value::Object(nested) = value else {
                        return Err(CompileError::type_mismatch(key.as_str(), "a mapping"));
                    };
                    trace!(key = %key, ?logic, depth, "nested condition group");
                    let subtree = self.build_at_depth(nested, depth + 1)?;
                    match logic {
                        Logic::And => conjuncts.push(subtree),
                        Logic::Or => or_branches.push(subtree),
                    }
                }
                KeyClass::Comparison { field, operator } => {
                    trace!(key = %key, field, %operator, "comparison");
                    let value = filter_value(key, value)?;
                    conjuncts.push(ConditionNode::Leaf(ConditionLeaf::new(field, operator, value)));
                }
            }
        }

        // 普通条件与 AND 分组按文档顺序连接, OR 分组放在最后
        let tree = or_branches
            .into_iter()
            .fold(ConditionNode::all(conjuncts), ConditionNode::or);
        Ok(tree)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(crate::config::CompilerConfig::default().max_depth)
    }
}

/// 将JSON值转换为条件值, 数组和对象不是合法的比较值
fn filter_value(key: &str, value: &Value) -> Result<FilterValue, CompileError> {
    match value {
        Value::Null => Ok(FilterValue::Null),
        Value::Bool(b) => Ok(FilterValue::Bool(*b)),
        Value::Number(n) => numeric(n)
            .map(FilterValue::Number)
            .ok_or_else(|| CompileError::type_mismatch(key, "a finite number")),
        Value::String(s) => Ok(FilterValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => {
            Err(CompileError::type_mismatch(key, "a null, boolean, number or string"))
        }
    }
}

/// 整数保持精确值, 只有小数才走 f64
fn numeric(n: &Number) -> Option<Numeric> {
    if let Some(i) = n.as_i64() {
        Some(Numeric::Integer(i.into()))
    } else if let Some(u) = n.as_u64() {
        Some(Numeric::Integer(u.into()))
    } else {
        n.as_f64().map(Numeric::Float)
    }
}

fn parse_select(value: Option<&Value>) -> Result<Vec<String>, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(field) => Ok(field.clone()),
                other => Err(CompileError::DocumentParse(format!(
                    "'select' entries must be strings, found {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(CompileError::DocumentParse(format!(
            "'select' must be a list of strings, found {other}"
        ))),
    }
}

fn parse_table(value: Option<&Value>) -> Result<String, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(table)) => Ok(table.clone()),
        Some(other) => Err(CompileError::DocumentParse(format!(
            "'from' must be a string, found {other}"
        ))),
    }
}

fn parse_order(value: Option<&Value>) -> Result<Option<OrderBy>, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(order)) => {
            let Some((field, direction)) = order.iter().next() else {
                return Ok(None);
            };
            let Value::String(direction) = direction else {
                return Err(CompileError::type_mismatch(field.as_str(), "a string direction"));
            };
            Ok(Some(OrderBy {
                field: field.clone(),
                direction: direction.clone(),
            }))
        }
        Some(_) => Err(CompileError::type_mismatch("order", "a mapping")),
    }
}

/// 只接受非负整数 (或其字符串形式), 其他值直接忽略
fn parse_limit(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
