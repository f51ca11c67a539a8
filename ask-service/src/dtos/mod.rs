use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Any JSON value is accepted for `question`; only falsy values (`null`,
/// `""`, `false`, `0`) count as missing. Non-string values that get past
/// validation are refused by the handler as an upstream failure.
#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(required, custom(function = "question_present"))]
    pub question: Option<Value>,
}

fn question_present(question: &Value) -> Result<(), ValidationError> {
    let present = match question {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };

    if present {
        Ok(())
    } else {
        Err(ValidationError::new("required"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
