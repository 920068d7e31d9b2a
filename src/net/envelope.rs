//! Response envelope shared by every endpoint.

#[cfg(test)]
#[path = "envelope_test.rs"]
mod envelope_test;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Envelope code signalling success.
pub const SUCCESS_CODE: i64 = 200;

/// `{code, message, data, timestamp?}` wrapper around every response body.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: T,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl<T> Envelope<T> {
    /// Discard the envelope, yielding `data` on success or a business error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Business`] when `code` is not [`SUCCESS_CODE`].
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.code == SUCCESS_CODE {
            Ok(self.data)
        } else {
            Err(ApiError::business(self.code, self.message))
        }
    }
}

/// Decode a raw response body into the payload it carries.
///
/// The envelope is parsed first with an untyped `data` so that a business
/// failure (whose `data` is usually `null`) is reported as such rather than
/// as a payload decode error.
pub(crate) fn unwrap_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let raw: Envelope<Option<serde_json::Value>> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let data = raw.into_result()?.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
}
