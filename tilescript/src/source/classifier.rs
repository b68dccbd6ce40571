//! Tells "the optional hook is not defined" apart from real hook failures.

use rhai::EvalAltResult;

use crate::provider::CONNECTION_TYPE_NAME;
use crate::script::ScriptError;

/// Name of the optional header hook scripts may define.
pub const HEADER_HOOK_NAME: &str = "addHeaders";

/// Recognizes the evaluator's "function not found" failure for one
/// specific hook and parameter type.
///
/// Only an exact signature match counts. A script that defines the hook but
/// calls some other undefined function from inside it still fails.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    absent_signature: String,
}

impl ErrorClassifier {
    pub fn for_hook(hook_name: &str, param_type: &str) -> Self {
        Self {
            absent_signature: format!("{} ({})", hook_name, param_type),
        }
    }

    /// Classifier for `addHeaders(TileConnection)`.
    pub fn header_hook() -> Self {
        Self::for_hook(HEADER_HOOK_NAME, CONNECTION_TYPE_NAME)
    }

    pub fn signature(&self) -> &str {
        &self.absent_signature
    }

    /// Returns true if `error` only says the hook is not defined.
    pub fn is_hook_absent(&self, error: &ScriptError) -> bool {
        matches!(
            error.eval_error(),
            Some(EvalAltResult::ErrorFunctionNotFound(signature, _))
                if *signature == self.absent_signature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::Position;

    fn not_found(signature: &str) -> ScriptError {
        ScriptError::Eval(Box::new(EvalAltResult::ErrorFunctionNotFound(
            signature.to_string(),
            Position::NONE,
        )))
    }

    #[test]
    fn test_header_hook_signature() {
        assert_eq!(
            ErrorClassifier::header_hook().signature(),
            "addHeaders (TileConnection)"
        );
    }

    #[test]
    fn test_exact_signature_is_absent() {
        let classifier = ErrorClassifier::header_hook();
        assert!(classifier.is_hook_absent(&not_found("addHeaders (TileConnection)")));
    }

    #[test]
    fn test_other_missing_function_is_real_failure() {
        let classifier = ErrorClassifier::header_hook();
        assert!(!classifier.is_hook_absent(&not_found("helper (TileConnection)")));
        assert!(!classifier.is_hook_absent(&not_found("addHeaders (i64)")));
        assert!(!classifier.is_hook_absent(&not_found("addHeaders ()")));
    }

    #[test]
    fn test_non_lookup_failures_are_real() {
        let classifier = ErrorClassifier::header_hook();
        let runtime = ScriptError::Eval(Box::new(EvalAltResult::ErrorRuntime(
            "addHeaders (TileConnection)".into(),
            Position::NONE,
        )));
        assert!(!classifier.is_hook_absent(&runtime));

        let return_type = ScriptError::ReturnType {
            function: HEADER_HOOK_NAME.to_string(),
            expected: "()",
            actual: "i64".to_string(),
        };
        assert!(!classifier.is_hook_absent(&return_type));
    }
}
