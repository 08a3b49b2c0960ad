//! Classification of raw API responses

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FailedResponse, HeyboxError, Result};
use crate::registry::ErrorRegistry;
use crate::transport::HttpResponse;

/// Status value of a successful response envelope
const STATUS_OK: &str = "ok";

/// Turn a raw response into the decoded body or a classified error.
///
/// - status outside `200..300` → `ActionFailed`
/// - 2xx with a body that is not a JSON object → `ActionFailed`
/// - 2xx with `status != "ok"` → `SendMessage`, kind looked up from `msg`
/// - otherwise the decoded body is returned unchanged
pub fn classify_response(response: &HttpResponse, registry: &ErrorRegistry) -> Result<Value> {
    if !response.is_success() {
        let failed = FailedResponse::from_response(response);
        warn!(status = failed.status_code, msg = ?failed.msg(), "API request rejected");
        return Err(HeyboxError::ActionFailed(failed));
    }

    let body: Value = match serde_json::from_slice::<Value>(&response.body) {
        Ok(body) if body.is_object() => body,
        _ => {
            warn!(
                status = response.status_code,
                body_preview = %String::from_utf8_lossy(&response.body).chars().take(200).collect::<String>(),
                "Malformed success response"
            );
            return Err(HeyboxError::ActionFailed(FailedResponse {
                status_code: response.status_code,
                body: None,
            }));
        }
    };

    if body.get("status").and_then(Value::as_str) != Some(STATUS_OK) {
        let response = FailedResponse {
            status_code: response.status_code,
            body: Some(body),
        };
        let kind = registry.classify(response.msg());
        warn!(%kind, msg = ?response.msg(), "Action reported failure");
        return Err(HeyboxError::SendMessage { kind, response });
    }

    debug!(status = response.status_code, "API request succeeded");
    Ok(body)
}
