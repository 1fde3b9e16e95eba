//! Inspection of successful API response payloads.
//!
//! The Dinahosting API can answer HTTP 200 (OK) with a JSON body describing a failure, e.g. a
//! record that already exists. By default the [`ProviderClient`][super::ProviderClient] treats
//! every HTTP 200 JSON response as success. A [`ResponseValidator`] can be installed with
//! [`ProviderClient::with_validator`][super::ProviderClient::with_validator] to turn such bodies
//! into [`Error::Rejected`][crate::error::Error::Rejected] errors.

use serde_json::Value;
use std::sync::Arc;

/// A callback given each parsed response body. Returning `Err` with a message rejects the
/// response.
pub type ResponseValidator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// The `responseCode` Dinahosting reports for a successful call.
pub const DINAHOSTING_SUCCESS: i64 = 1000;

/// A validator rejecting bodies whose numeric `responseCode` field differs from `expected`.
/// Bodies without a numeric `responseCode` pass.
#[must_use]
pub fn response_code(expected: i64) -> ResponseValidator {
    Arc::new(move |body: &Value| {
        match body.get("responseCode").and_then(Value::as_i64) {
            Some(code) if code != expected => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("no message");
                Err(format!("responseCode {code}: {message}"))
            }
            _ => Ok(()),
        }
    })
}
