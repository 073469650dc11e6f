use serde_json::{json, Value};
use stockledger_canonical::{EventId, IdempotencyKey, RequestId};
use stockledger_core::{LedgerEvent, Rejection};

/// Returned with 200 when a retry resolves to the stored event.
pub const IDEMPOTENT_REPLAY: &str = "IDEMPOTENT_REPLAY";
/// Returned with 403 when the context carries no tenant.
pub const TENANT_UNRESOLVED: &str = "TENANT_UNRESOLVED";
/// Returned with 409 when a key is reused for a different payload.
pub const IDEMPOTENCY_KEY_REUSE_MISMATCH: &str = "IDEMPOTENCY_KEY_REUSE_MISMATCH";
/// Returned with 500 when the event could not be persisted.
pub const LEDGER_STORE_APPEND_FAILED: &str = "LEDGER_STORE_APPEND_FAILED";

/// HTTP-shaped result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestResponse {
    /// Status code.
    pub status: u16,
    /// JSON body.
    pub body: Value,
}

impl IngestResponse {
    /// 201: new event appended.
    pub fn created(event: &LedgerEvent, request_id: &RequestId) -> Self {
        Self {
            status: 201,
            body: json!({
                "ok": true,
                "replay": false,
                "event": event,
                "requestId": request_id,
            }),
        }
    }

    /// 200: retry of an accepted write.
    pub fn replayed(event: &LedgerEvent, request_id: &RequestId) -> Self {
        Self {
            status: 200,
            body: json!({
                "ok": true,
                "replay": true,
                "event": event,
                "code": IDEMPOTENT_REPLAY,
                "requestId": request_id,
            }),
        }
    }

    /// 400: validation failure.
    pub fn rejected(rejection: &Rejection, request_id: &RequestId) -> Self {
        Self {
            status: 400,
            body: json!({
                "ok": false,
                "error": rejection.kind().as_str(),
                "code": rejection.code,
                "details": rejection.details,
                "requestId": request_id,
            }),
        }
    }

    /// 403: no tenant.
    pub fn tenant_unresolved(request_id: &RequestId) -> Self {
        Self::failure(403, TENANT_UNRESOLVED, json!({}), request_id)
    }

    /// 409: key reused with a different canonical payload.
    pub fn conflict(
        key: &IdempotencyKey,
        existing: &EventId,
        request_id: &RequestId,
    ) -> Self {
        Self::failure(
            409,
            IDEMPOTENCY_KEY_REUSE_MISMATCH,
            json!({ "idempotencyKey": key, "existingEventId": existing }),
            request_id,
        )
    }

    /// 500: persistence failed; the caller retries with the same key.
    pub fn store_failure(request_id: &RequestId) -> Self {
        Self::failure(500, LEDGER_STORE_APPEND_FAILED, json!({}), request_id)
    }

    fn failure(status: u16, code: &str, details: Value, request_id: &RequestId) -> Self {
        Self {
            status,
            body: json!({
                "ok": false,
                "error": code,
                "code": code,
                "details": details,
                "requestId": request_id,
            }),
        }
    }

    /// True for 200 and 201.
    pub fn is_success(&self) -> bool {
        self.status == 200 || self.status == 201
    }

    /// The `code` field, if the body has one.
    pub fn code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    /// The `event` field, if the body has one.
    pub fn event(&self) -> Option<&Value> {
        self.body.get("event")
    }
}
