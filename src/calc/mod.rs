//! Arithmetic for the amount-entry calculator.
//!
//! Expressions are tokenized, parsed into an [`Expr`] tree by recursive descent and evaluated.
//! Only `+ - * /`, parentheses and decimal literals are understood. `×` and `÷` are accepted as
//! aliases, and full-width input is normalized first.

mod input;
mod lexer;
mod parser;

pub use input::CalculatorInput;
pub use lexer::{tokenize, Token};
pub use parser::{parse, BinaryOp, Expr, MAX_DEPTH};

use thiserror::Error;

/// Why an expression produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("the expression is empty")]
    Empty,
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },
    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },
    #[error("unexpected '{token}' at position {position}")]
    UnexpectedToken { token: Token, position: usize },
    #[error("the expression ended unexpectedly")]
    UnexpectedEnd,
    #[error("the expression is nested too deeply")]
    TooDeep,
    #[error("division by zero")]
    DivisionByZero,
    #[error("the result is not a finite number")]
    NonFinite,
}

/// Evaluates an arithmetic expression such as `1200×3 + 500`.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    let expr = parse(&tokens)?;
    expr.eval()
}

/// Like [`evaluate`], with every failure collapsed into `None`.
pub fn safe_evaluate(expression: &str) -> Option<f64> {
    evaluate(expression).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("1+2*3").unwrap(), 7.0);
        assert_eq!(evaluate("(1+2)*3").unwrap(), 9.0);
        assert_eq!(evaluate("10-4-3").unwrap(), 3.0);
        assert_eq!(evaluate("100/10/5").unwrap(), 2.0);
    }

    #[test]
    fn test_aliases_and_full_width() {
        assert_eq!(evaluate("1200×3").unwrap(), 3600.0);
        assert_eq!(evaluate("900÷3").unwrap(), 300.0);
        assert_eq!(evaluate("１２＋３").unwrap(), 15.0);
    }

    #[test]
    fn test_decimals_and_unary() {
        assert_eq!(evaluate("0.5 + .25").unwrap(), 0.75);
        assert_eq!(evaluate("3×-2").unwrap(), -6.0);
        assert_eq!(evaluate("-(2+3)").unwrap(), -5.0);
    }

    #[test]
    fn test_failures_have_no_result() {
        assert_eq!(safe_evaluate("1/0"), None);
        assert_eq!(safe_evaluate(""), None);
        assert_eq!(safe_evaluate("2+"), None);
        assert_eq!(safe_evaluate("(1+2"), None);
        assert_eq!(safe_evaluate("1+2)"), None);
        assert_eq!(safe_evaluate("alert(1)"), None);
        assert_eq!(safe_evaluate("1..2"), None);
    }

    #[test]
    fn test_deep_nesting_has_no_result() {
        let parens = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(safe_evaluate(&parens), None);
        assert_eq!(evaluate(&parens), Err(CalcError::TooDeep));
        assert_eq!(safe_evaluate(&format!("{}1", "-".repeat(20_000))), None);
        assert_eq!(safe_evaluate(&vec!["1"; 20_000].join("+")), None);
        assert_eq!(safe_evaluate("((((2))))*-(-3)"), Some(6.0));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(evaluate("4/(2-2)"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert_eq!(evaluate("1+"), Err(CalcError::UnexpectedEnd));
        assert!(matches!(
            evaluate("2^3"),
            Err(CalcError::UnexpectedChar { ch: '^', position: 1 })
        ));
    }
}
