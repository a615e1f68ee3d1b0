//! Response envelope validation

use serde_json::{Map, Value};

use crate::error::{Rejection, Result};

/// Checks a parsed envelope and hands out its `data` object
pub struct ResponseValidator;

impl ResponseValidator {
    /// Accept the envelope for `kind` and return its payload object
    ///
    /// Requires `msg` to equal `kind` exactly and `result` to be `"ok"` or
    /// `true`; `data` must then be an object.
    pub fn validate<'a>(kind: &str, envelope: &'a Value) -> Result<&'a Map<String, Value>> {
        let root = envelope.as_object().ok_or(Rejection::NotAnObject)?;

        let msg = root
            .get("msg")
            .and_then(Value::as_str)
            .ok_or(Rejection::MissingKind)?;
        if msg != kind {
            return Err(Rejection::KindMismatch {
                expected: kind.to_string(),
                actual: msg.to_string(),
            }
            .into());
        }

        match root.get("result") {
            Some(Value::String(s)) if s == "ok" => {}
            Some(Value::Bool(true)) => {}
            Some(other) => return Err(Rejection::Unsuccessful(other.to_string()).into()),
            None => return Err(Rejection::Unsuccessful("missing".to_string()).into()),
        }

        match root.get("data") {
            Some(Value::Object(data)) => Ok(data),
            Some(_) => Err(Rejection::DataNotObject.into()),
            None => Err(Rejection::MissingData.into()),
        }
    }
}
