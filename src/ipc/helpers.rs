use serde_json::json;

use super::error::{err, ErrorCode};
use super::types::{AppState, Request};
use crate::model::{Student, StudentView};

pub fn param_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

/// Refuses record access until the login gate has been passed.
pub fn require_unlocked(state: &AppState, req: &Request) -> Result<(), serde_json::Value> {
    if state.screen.is_unlocked() {
        return Ok(());
    }
    Err(err(
        Some(&req.id),
        ErrorCode::Locked,
        "log in first",
        Some(json!({ "screen": state.screen.screen() })),
    ))
}

pub fn views<'a, I>(students: I) -> serde_json::Value
where
    I: IntoIterator<Item = &'a Student>,
{
    json!(students
        .into_iter()
        .map(StudentView::from)
        .collect::<Vec<_>>())
}

pub fn screen_json(state: &AppState) -> serde_json::Value {
    let screen = state.screen.screen();
    json!({
        "screen": screen,
        "title": screen.title(),
        "showBack": screen.show_back(),
        "loginError": state.screen.login_error_visible(),
    })
}
