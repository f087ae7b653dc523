// Wire envelope: {ok:true,data} | {ok:false,error{code,message,details?}}
use crate::error::ForecastError;
use serde::Serialize;

/// Error body carried by a failed envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// The one shape every public operation resolves to. No raw error object
/// crosses the process boundary.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success { ok: bool, data: T },
    Failure { ok: bool, error: ErrorBody },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success { ok: true, data }
    }

    pub fn failure(err: &ForecastError) -> Self {
        Self::Failure {
            ok: false,
            error: ErrorBody {
                code: err.code(),
                message: err.to_string(),
                details: err.details(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl<T> From<Result<T, ForecastError>> for Envelope<T> {
    fn from(result: Result<T, ForecastError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_with_ok_true() {
        let env = Envelope::success(json!({"value": 1}));
        let out = serde_json::to_value(&env).unwrap();
        assert_eq!(out, json!({"ok": true, "data": {"value": 1}}));
    }

    #[test]
    fn failure_serializes_code_and_message() {
        let err = ForecastError::invalid_input("weekStart", "expected YYYY-MM-DD");
        let env: Envelope<serde_json::Value> = Envelope::failure(&err);
        let out = serde_json::to_value(&env).unwrap();
        assert_eq!(out["ok"], json!(false));
        assert_eq!(out["error"]["code"], json!("invalid_input"));
        assert_eq!(out["error"]["message"], json!("invalid input: expected YYYY-MM-DD"));
        assert_eq!(out["error"]["details"], json!("field: weekStart"));
    }

    #[test]
    fn failure_omits_absent_details() {
        let err = ForecastError::Config("bad blend".into());
        let env: Envelope<()> = Envelope::failure(&err);
        let out = serde_json::to_value(&env).unwrap();
        assert!(out["error"].get("details").is_none());
    }
}
