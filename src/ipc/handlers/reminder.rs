use crate::ipc::error::ok;
use crate::ipc::helpers::{require_unlocked, views};
use crate::ipc::types::{AppState, Request};
use crate::reminder::{compose_reminder, defaulters};
use serde_json::json;
use tracing::info;

fn handle_reminder_preview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owing = defaulters(&state.students);
    ok(
        &req.id,
        json!({
            "recipientsCount": owing.len(),
            "defaulters": views(owing),
        }),
    )
}

fn handle_reminder_compose(state: &mut AppState, req: &Request) -> serde_json::Value {
    match compose_reminder(&state.students, &state.config) {
        Some(r) => {
            info!(recipients = r.recipients_count, "reminder composed");
            ok(
                &req.id,
                json!({
                    "sendEnabled": true,
                    "recipientsCount": r.recipients_count,
                    "messageText": r.message_text,
                    "url": r.url,
                }),
            )
        }
        None => ok(
            &req.id,
            json!({
                "sendEnabled": false,
                "recipientsCount": 0,
            }),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: fn(&mut AppState, &Request) -> serde_json::Value = match req.method.as_str() {
        "reminder.preview" => handle_reminder_preview,
        "reminder.compose" => handle_reminder_compose,
        _ => return None,
    };
    if let Err(resp) = require_unlocked(state, req) {
        return Some(resp);
    }
    Some(handler(state, req))
}
