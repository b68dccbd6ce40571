//! Script error types.

use rhai::{EvalAltResult, ParseError};
use thiserror::Error;

/// Errors raised while loading or evaluating a user script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script text could not be parsed.
    #[error("Script parse error: {0}")]
    Parse(#[from] ParseError),

    /// Evaluation raised an error.
    #[error("Script evaluation failed: {0}")]
    Eval(#[from] Box<EvalAltResult>),

    /// A function returned a value of the wrong type.
    #[error("Function '{function}' returned {actual}, expected {expected}")]
    ReturnType {
        function: String,
        expected: &'static str,
        actual: String,
    },
}

impl ScriptError {
    /// The evaluator's error, if this is an evaluation failure.
    pub fn eval_error(&self) -> Option<&EvalAltResult> {
        match self {
            ScriptError::Eval(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::Position;

    #[test]
    fn test_eval_error_accessor() {
        let err = ScriptError::from(Box::new(EvalAltResult::ErrorFunctionNotFound(
            "f ()".to_string(),
            Position::NONE,
        )));
        assert!(matches!(
            err.eval_error(),
            Some(EvalAltResult::ErrorFunctionNotFound(..))
        ));
    }

    #[test]
    fn test_return_type_display() {
        let err = ScriptError::ReturnType {
            function: "getTileUrl".to_string(),
            expected: "string",
            actual: "i64".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Function 'getTileUrl' returned i64, expected string"
        );
        assert!(err.eval_error().is_none());
    }
}
