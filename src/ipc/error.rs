use serde::Serialize;
use serde_json::json;

/// Stable error codes the UI shell switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadJson,
    BadParams,
    BadState,
    BadTransition,
    Locked,
    NoWorkspace,
    DbOpenFailed,
    EncodeFailed,
    BackupFailed,
    NotImplemented,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadJson => "bad_json",
            ErrorCode::BadParams => "bad_params",
            ErrorCode::BadState => "bad_state",
            ErrorCode::BadTransition => "bad_transition",
            ErrorCode::Locked => "locked",
            ErrorCode::NoWorkspace => "no_workspace",
            ErrorCode::DbOpenFailed => "db_open_failed",
            ErrorCode::EncodeFailed => "encode_failed",
            ErrorCode::BackupFailed => "backup_failed",
            ErrorCode::NotImplemented => "not_implemented",
        }
    }
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

/// Error envelope. `id` is absent when the request line could not be parsed.
pub fn err(
    id: Option<&str>,
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code.as_str(),
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    let mut resp = json!({
        "ok": false,
        "error": error,
    });
    if let Some(id) = id {
        resp["id"] = json!(id);
    }
    resp
}

/// Reply for a stdin line that is not a request object.
pub fn unparsable_line(message: impl Into<String>) -> serde_json::Value {
    err(None, ErrorCode::BadJson, message, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_like_their_wire_names() {
        for code in [
            ErrorCode::BadJson,
            ErrorCode::Locked,
            ErrorCode::NoWorkspace,
            ErrorCode::NotImplemented,
        ] {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
        }
    }

    #[test]
    fn envelope_without_request_id() {
        let resp = unparsable_line("expected value");
        assert!(resp.get("id").is_none());
        assert_eq!(resp["ok"], json!(false));
        assert_eq!(resp["error"]["code"], json!("bad_json"));

        let resp = err(
            Some("7"),
            ErrorCode::Locked,
            "log in first",
            Some(json!({ "screen": "LOGIN" })),
        );
        assert_eq!(resp["id"], json!("7"));
        assert_eq!(resp["error"]["details"]["screen"], json!("LOGIN"));
    }
}
