//! Rendering of literal values into SQL fragments.

use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOp, FilterValue};
use crate::error::CompileError;

/// How single quotes inside text literals are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteEscaping {
    /// Text is embedded as-is.
    #[default]
    Verbatim,
    /// Every `'` is written as `''`.
    Doubled,
}

/// Turns a value and its operator into the text following the field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer {
    escaping: QuoteEscaping,
}

impl ValueSerializer {
    pub fn new(escaping: QuoteEscaping) -> Self {
        Self { escaping }
    }

    pub fn render(&self, value: &FilterValue, op: ComparisonOp) -> Result<String, CompileError> {
        let fragment = match (value, op) {
            (FilterValue::Null, ComparisonOp::Eq) => "is null".to_string(),
            (FilterValue::Null, ComparisonOp::NotEq) => "is not null".to_string(),
            (FilterValue::Bool(b), ComparisonOp::Eq) => format!("is {b}"),
            (FilterValue::Bool(b), ComparisonOp::NotEq) => format!("is not {b}"),
            (FilterValue::Text(s), _) => format!("{} '{}'", op.sql(), self.quote_body(s)),
            (FilterValue::Number(n), op)
                if matches!(op, ComparisonOp::Eq | ComparisonOp::NotEq) || op.is_ordering() =>
            {
                format!("{} {}", op.sql(), n)
            }
            (value, op) => {
                return Err(CompileError::InvalidOperatorForType {
                    operator: op,
                    kind: value.kind(),
                })
            }
        };
        Ok(fragment)
    }

    fn quote_body(&self, text: &str) -> String {
        match self.escaping {
            QuoteEscaping::Verbatim => text.to_string(),
            QuoteEscaping::Doubled => text.replace('\'', "''"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPS: [ComparisonOp; 7] = [
        ComparisonOp::Eq,
        ComparisonOp::NotEq,
        ComparisonOp::Lt,
        ComparisonOp::Lte,
        ComparisonOp::Gt,
        ComparisonOp::Gte,
        ComparisonOp::Like,
    ];

    fn render(value: FilterValue, op: ComparisonOp) -> Result<String, CompileError> {
        ValueSerializer::default().render(&value, op)
    }

    #[test]
    fn test_null_values() {
        assert_eq!(render(FilterValue::Null, ComparisonOp::Eq).unwrap(), "is null");
        assert_eq!(render(FilterValue::Null, ComparisonOp::NotEq).unwrap(), "is not null");
        for op in [ComparisonOp::Lt, ComparisonOp::Gte, ComparisonOp::Like] {
            assert_eq!(
                render(FilterValue::Null, op),
                Err(CompileError::InvalidOperatorForType { operator: op, kind: "null" })
            );
        }
    }

    #[test]
    fn test_bool_values() {
        assert_eq!(render(FilterValue::Bool(true), ComparisonOp::Eq).unwrap(), "is true");
        assert_eq!(render(FilterValue::Bool(false), ComparisonOp::NotEq).unwrap(), "is not false");
        assert!(render(FilterValue::Bool(true), ComparisonOp::Gt).is_err());
        assert!(render(FilterValue::Bool(true), ComparisonOp::Like).is_err());
    }

    #[test]
    fn test_text_values() {
        let text = || FilterValue::from("open");
        assert_eq!(render(text(), ComparisonOp::Eq).unwrap(), "= 'open'");
        assert_eq!(render(text(), ComparisonOp::NotEq).unwrap(), "!= 'open'");
        assert_eq!(render(text(), ComparisonOp::Lte).unwrap(), "<= 'open'");
        assert_eq!(render(text(), ComparisonOp::Gt).unwrap(), "> 'open'");
        assert_eq!(render(text(), ComparisonOp::Like).unwrap(), "like 'open'");
    }

    #[test]
    fn test_number_values() {
        assert_eq!(render(FilterValue::from(10_i64), ComparisonOp::Eq).unwrap(), "= 10");
        assert_eq!(render(FilterValue::from(10.0), ComparisonOp::Eq).unwrap(), "= 10");
        assert_eq!(render(FilterValue::from(-3_i64), ComparisonOp::NotEq).unwrap(), "!= -3");
        assert_eq!(render(FilterValue::from(1.5), ComparisonOp::Gte).unwrap(), ">= 1.5");
        assert_eq!(render(FilterValue::from(2_i64), ComparisonOp::Lt).unwrap(), "< 2");
        assert_eq!(
            render(FilterValue::from(9_007_199_254_740_993_u64), ComparisonOp::Eq).unwrap(),
            "= 9007199254740993"
        );
        assert_eq!(
            render(FilterValue::from(1_i64), ComparisonOp::Like),
            Err(CompileError::InvalidOperatorForType {
                operator: ComparisonOp::Like,
                kind: "number"
            })
        );
    }

    #[test]
    fn test_null_bool_and_number_are_never_quoted() {
        let values = [
            FilterValue::Null,
            FilterValue::Bool(true),
            FilterValue::Bool(false),
            FilterValue::from(0_i64),
            FilterValue::from(42_u64),
            FilterValue::from(-7.25),
        ];
        for value in &values {
            for op in ALL_OPS {
                if let Ok(fragment) = ValueSerializer::default().render(value, op) {
                    assert!(!fragment.contains('\''), "{fragment:?} contains a quote");
                }
            }
        }
    }

    #[test]
    fn test_quote_escaping_modes() {
        let value = FilterValue::from("O'Brien");
        let verbatim = ValueSerializer::new(QuoteEscaping::Verbatim);
        let doubled = ValueSerializer::new(QuoteEscaping::Doubled);
        assert_eq!(verbatim.render(&value, ComparisonOp::Eq).unwrap(), "= 'O'Brien'");
        assert_eq!(doubled.render(&value, ComparisonOp::Eq).unwrap(), "= 'O''Brien'");
    }
}
