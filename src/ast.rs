use std::fmt;

/// 一次编译的完整输入, 由输入文档构建后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// 选择的字段, 为空时表示 `*`
    pub select_fields: Vec<String>,
    pub table: String,
    pub filter: Option<ConditionNode>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
}

impl QuerySpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            select_fields: Vec::new(),
            table: table.into(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }
}

/// 排序指令, 例如：`{"name": "desc"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    /// 原样输出, 不做校验
    pub direction: String,
}

/// 条件表达式树
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// 叶子节点：单个字段比较
    Leaf(ConditionLeaf),
    /// 逻辑组合 (AND / OR), 子节点保持输入顺序
    Combinator {
        logic: Logic,
        children: Vec<ConditionNode>,
        /// 作为子节点时是否加括号。
        /// 输入中的 and/or 分组为 true; OR 左侧的累积结果为 false
        grouped: bool,
    },
}

impl ConditionNode {
    /// 将子节点用 AND 连接
    pub fn all(children: Vec<ConditionNode>) -> Self {
        ConditionNode::Combinator {
            logic: Logic::And,
            children,
            grouped: true,
        }
    }

    /// 将子节点用 OR 连接
    pub fn any(children: Vec<ConditionNode>) -> Self {
        ConditionNode::Combinator {
            logic: Logic::Or,
            children,
            grouped: true,
        }
    }

    /// 作为子节点渲染时需要括号
    pub fn is_group(&self) -> bool {
        matches!(self, ConditionNode::Combinator { grouped: true, .. })
    }

    /// 将 `rhs` 用 OR 连接到当前累积结果上。
    ///
    /// AND 与 OR 同级、从左到右累积, 左侧不加括号：
    /// `a and b` 与 `(c)` 得到 `a and b or (c)`。
    pub fn or(self, rhs: ConditionNode) -> Self {
        match self {
            ConditionNode::Combinator {
                logic: Logic::Or,
                mut children,
                grouped,
            } => {
                children.push(rhs);
                ConditionNode::Combinator {
                    logic: Logic::Or,
                    children,
                    grouped,
                }
            }
            ConditionNode::Combinator {
                logic: Logic::And,
                mut children,
                ..
            } if children.len() <= 1 => {
                children.push(rhs);
                ConditionNode::any(children)
            }
            ConditionNode::Combinator {
                logic: Logic::And,
                children,
                ..
            } => ConditionNode::any(vec![
                ConditionNode::Combinator {
                    logic: Logic::And,
                    children,
                    grouped: false,
                },
                rhs,
            ]),
            leaf => ConditionNode::any(vec![leaf, rhs]),
        }
    }
}

/// 字段比较, 例如：`>=age: 18`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLeaf {
    pub field: String,
    pub operator: ComparisonOp,
    pub value: FilterValue,
}

impl ConditionLeaf {
    pub fn new(field: impl Into<String>, operator: ComparisonOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// 逻辑连接符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn keyword(self) -> &'static str {
        match self {
            Logic::And => "and",
            Logic::Or => "or",
        }
    }
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,    // =
    NotEq, // !=
    Lt,    // <
    Lte,   // <=
    Gt,    // >
    Gte,   // >=
    Like,  // like
}

impl ComparisonOp {
    /// SQL 中的运算符文本
    pub fn sql(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Like => "like",
        }
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            ComparisonOp::Lt | ComparisonOp::Lte | ComparisonOp::Gt | ComparisonOp::Gte
        )
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// 数值字面量。整数保持原样, 超过 2^53 也不会丢失精度
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i128),
    Float(f64),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(n) => write!(f, "{n}"),
            // 整数值的浮点数输出为 `10` 而不是 `10.0`
            Numeric::Float(n) => write!(f, "{n}"),
        }
    }
}

/// 条件值：只允许这四种字面量
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(Numeric),
    Text(String),
}

impl FilterValue {
    /// 用于错误信息的类型名
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::Bool(_) => "boolean",
            FilterValue::Number(_) => "number",
            FilterValue::Text(_) => "text",
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(Numeric::Float(n))
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(Numeric::Integer(n.into()))
    }
}

impl From<u64> for FilterValue {
    fn from(n: u64) -> Self {
        FilterValue::Number(Numeric::Integer(n.into()))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}
