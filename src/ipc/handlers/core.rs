use crate::config::AppConfig;
use crate::db::SqliteSlot;
use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::param_str;
use crate::ipc::types::{AppState, Request};
use crate::model::ClassName;
use crate::store::RecordStore;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "screen": state.screen.screen(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(path) = param_str(req, "path").map(PathBuf::from) else {
        return err(Some(&req.id), ErrorCode::BadParams, "missing params.path", None);
    };

    let config = AppConfig::load(&path);
    match SqliteSlot::open(&path, config.storage_key.clone()) {
        Ok(slot) => {
            let store = RecordStore::new(slot);
            state.students = store.list();
            state.store = Some(store);
            state.screen.apply_config(&config);
            state.config = config;
            state.workspace = Some(path.clone());
            info!(
                workspace = %path.display(),
                students = state.students.len(),
                "workspace opened"
            );
            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "studentCount": state.students.len(),
                }),
            )
        }
        Err(e) => err(Some(&req.id), ErrorCode::DbOpenFailed, format!("{e:?}"), None),
    }
}

fn handle_classes_options(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let labels: Vec<&str> = ClassName::ALL.iter().map(|c| c.label()).collect();
    ok(&req.id, json!({ "classes": labels }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "classes.options" => Some(handle_classes_options(state, req)),
        _ => None,
    }
}
