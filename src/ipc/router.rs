use std::time::Instant;

use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::{err, ErrorCode};

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    // Timed screen transitions fire lazily, before anything observes the state.
    state.screen.tick(Instant::now());

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::screen::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::stats::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::reminder::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::backup::try_handle(state, &req) {
        return resp;
    }

    err(
        Some(&req.id),
        ErrorCode::NotImplemented,
        format!("unknown method: {}", req.method),
        None,
    )
}
