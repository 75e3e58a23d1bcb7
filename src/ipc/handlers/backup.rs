use crate::backup;
use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::{param_str, require_unlocked};
use crate::ipc::types::{AppState, Request};
use crate::store::{decode_collection, encode_collection};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(out_path) = param_str(req, "outPath").map(PathBuf::from) else {
        return err(Some(&req.id), ErrorCode::BadParams, "missing outPath", None);
    };
    if state.store.is_none() {
        return err(Some(&req.id), ErrorCode::NoWorkspace, "select a workspace first", None);
    }

    let payload = match encode_collection(&state.students) {
        Ok(p) => p,
        Err(e) => return err(Some(&req.id), ErrorCode::BackupFailed, e.to_string(), None),
    };
    match backup::export_slot_bundle(&payload, state.students.len(), &out_path) {
        Ok(summary) => {
            info!(out = %out_path.display(), "backup exported");
            ok(
                &req.id,
                json!({
                    "bundleFormat": summary.bundle_format,
                    "entryCount": summary.entry_count,
                    "studentCount": state.students.len(),
                    "sha256": summary.sha256,
                }),
            )
        }
        Err(e) => err(Some(&req.id), ErrorCode::BackupFailed, format!("{e:#}"), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(in_path) = param_str(req, "inPath").map(PathBuf::from) else {
        return err(Some(&req.id), ErrorCode::BadParams, "missing inPath", None);
    };
    let Some(store) = state.store.as_mut() else {
        return err(Some(&req.id), ErrorCode::NoWorkspace, "select a workspace first", None);
    };

    let bundle = match backup::read_slot_bundle(&in_path) {
        Ok(b) => b,
        Err(e) => return err(Some(&req.id), ErrorCode::BackupFailed, format!("{e:#}"), None),
    };
    let students = match decode_collection(&bundle.payload) {
        Ok(s) => s,
        Err(e) => return err(Some(&req.id), ErrorCode::BackupFailed, e.to_string(), None),
    };
    let m = match store.replace_all(students) {
        Ok(m) => m,
        Err(e) => return err(Some(&req.id), ErrorCode::BackupFailed, e.to_string(), None),
    };
    if !m.applied {
        return err(Some(&req.id), ErrorCode::BackupFailed, "could not save restored students", None);
    }

    state.students = m.students;
    info!(
        input = %in_path.display(),
        students = state.students.len(),
        "backup imported"
    );
    ok(
        &req.id,
        json!({
            "bundleFormatDetected": bundle.bundle_format_detected,
            "studentCount": state.students.len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: fn(&mut AppState, &Request) -> serde_json::Value = match req.method.as_str() {
        "backup.export" => handle_backup_export,
        "backup.import" => handle_backup_import,
        _ => return None,
    };
    if let Err(resp) = require_unlocked(state, req) {
        return Some(resp);
    }
    Some(handler(state, req))
}
