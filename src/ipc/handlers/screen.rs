use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::{param_str, screen_json};
use crate::ipc::types::{AppState, Request};
use crate::screen::{LoginOutcome, Screen};
use serde_json::json;
use std::time::Instant;
use tracing::info;

fn handle_screen_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, screen_json(state))
}

fn handle_screen_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(secret) = param_str(req, "secret") else {
        return err(Some(&req.id), ErrorCode::BadParams, "missing secret", None);
    };

    let outcome = state.screen.login(secret, Instant::now());
    if outcome == LoginOutcome::NotAvailable {
        return err(
            Some(&req.id),
            ErrorCode::BadState,
            "login is only available on the login screen",
            Some(json!({ "screen": state.screen.screen() })),
        );
    }
    if outcome == LoginOutcome::Accepted {
        info!("login accepted");
    }

    let mut result = screen_json(state);
    result["ok"] = json!(outcome == LoginOutcome::Accepted);
    ok(&req.id, result)
}

fn handle_screen_navigate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let target = match req
        .params
        .get("screen")
        .cloned()
        .map(serde_json::from_value::<Screen>)
    {
        Some(Ok(s)) => s,
        Some(Err(e)) => return err(Some(&req.id), ErrorCode::BadParams, format!("unknown screen: {e}"), None),
        None => return err(Some(&req.id), ErrorCode::BadParams, "missing screen", None),
    };

    match state.screen.navigate(target, Instant::now()) {
        Ok(_) => ok(&req.id, screen_json(state)),
        Err(e) => err(Some(&req.id), ErrorCode::BadTransition, e.to_string(), None),
    }
}

fn handle_screen_back(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.screen.back(Instant::now()) {
        Ok(_) => ok(&req.id, screen_json(state)),
        Err(e) => err(Some(&req.id), ErrorCode::BadTransition, e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "screen.get" => Some(handle_screen_get(state, req)),
        "screen.login" => Some(handle_screen_login(state, req)),
        "screen.navigate" => Some(handle_screen_navigate(state, req)),
        "screen.back" => Some(handle_screen_back(state, req)),
        _ => None,
    }
}
