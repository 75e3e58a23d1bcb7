use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::require_unlocked;
use crate::ipc::types::{AppState, Request};
use crate::stats::aggregate;

fn handle_stats_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    match serde_json::to_value(aggregate(&state.students)) {
        Ok(v) => ok(&req.id, v),
        Err(e) => err(Some(&req.id), ErrorCode::EncodeFailed, e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.get" => Some(match require_unlocked(state, req) {
            Ok(()) => handle_stats_get(state, req),
            Err(resp) => resp,
        }),
        _ => None,
    }
}
