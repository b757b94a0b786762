//! Classification of filter mapping keys.
//!
//! A key either names a combinator (`and`, `or`, `and_<suffix>`, `or_<suffix>`)
//! or a field, optionally prefixed by an operator token made of `<>=!`.

use crate::ast::{ComparisonOp, Logic};
use crate::error::CompileError;

const OPERATOR_CHARS: &[u8] = b"<>=!";

/// The meaning of a single mapping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass<'a> {
    /// The value is a nested mapping joined with this logic.
    Combinator(Logic),
    /// The value is compared against `field`.
    Comparison {
        field: &'a str,
        operator: ComparisonOp,
    },
}

pub fn parse_key(key: &str) -> Result<KeyClass<'_>, CompileError> {
    if let Some(logic) = combinator(key) {
        return Ok(KeyClass::Combinator(logic));
    }

    let split = operator_prefix_len(key);
    if split == 0 {
        return Ok(KeyClass::Comparison {
            field: key,
            operator: ComparisonOp::Eq,
        });
    }

    let (token, field) = key.split_at(split);
    let operator = match token {
        "=" => ComparisonOp::Eq,
        "!" => ComparisonOp::NotEq,
        ">" => ComparisonOp::Gt,
        "<" => ComparisonOp::Lt,
        ">=" => ComparisonOp::Gte,
        "<=" => ComparisonOp::Lte,
        _ => {
            return Err(CompileError::UnknownOperator {
                key: key.to_string(),
                token: token.to_string(),
            })
        }
    };

    Ok(KeyClass::Comparison { field, operator })
}

/// `and` / `or`, bare or followed by `_` and a non-empty suffix.
fn combinator(key: &str) -> Option<Logic> {
    [("and", Logic::And), ("or", Logic::Or)]
        .into_iter()
        .find_map(|(word, logic)| {
            let rest = key.strip_prefix(word)?;
            let marked = rest.is_empty()
                || rest.strip_prefix('_').is_some_and(|suffix| !suffix.is_empty());
            marked.then_some(logic)
        })
}

/// Length of the leading operator token. At least one character is always
/// left over for the field name.
fn operator_prefix_len(key: &str) -> usize {
    let run = key
        .bytes()
        .take_while(|b| OPERATOR_CHARS.contains(b))
        .count();
    run.min(key.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(key: &str) -> (ComparisonOp, &str) {
        match parse_key(key).unwrap() {
            KeyClass::Comparison { field, operator } => (operator, field),
            other => panic!("expected comparison for {key:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_operator_prefixes() {
        assert_eq!(comparison(">=age"), (ComparisonOp::Gte, "age"));
        assert_eq!(comparison("<=age"), (ComparisonOp::Lte, "age"));
        assert_eq!(comparison(">age"), (ComparisonOp::Gt, "age"));
        assert_eq!(comparison("<age"), (ComparisonOp::Lt, "age"));
        assert_eq!(comparison("=age"), (ComparisonOp::Eq, "age"));
        assert_eq!(comparison("!age"), (ComparisonOp::NotEq, "age"));
    }

    #[test]
    fn test_bare_field_defaults_to_eq() {
        assert_eq!(comparison("age"), (ComparisonOp::Eq, "age"));
        assert_eq!(comparison("android"), (ComparisonOp::Eq, "android"));
        assert_eq!(comparison("order_id"), (ComparisonOp::Eq, "order_id"));
        assert_eq!(comparison("and_"), (ComparisonOp::Eq, "and_"));
    }

    #[test]
    fn test_combinators() {
        assert_eq!(parse_key("and_extra").unwrap(), KeyClass::Combinator(Logic::And));
        assert_eq!(parse_key("or_priority").unwrap(), KeyClass::Combinator(Logic::Or));
        assert_eq!(parse_key("and").unwrap(), KeyClass::Combinator(Logic::And));
        assert_eq!(parse_key("or").unwrap(), KeyClass::Combinator(Logic::Or));
    }

    #[test]
    fn test_unknown_operator() {
        for key in ["!=age", "<>age", "==age", "=>age"] {
            match parse_key(key) {
                Err(CompileError::UnknownOperator { key: k, .. }) => assert_eq!(k, key),
                other => panic!("expected UnknownOperator for {key:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_operator_only_key_keeps_one_field_char() {
        assert_eq!(comparison(">="), (ComparisonOp::Gt, "="));
    }
}
