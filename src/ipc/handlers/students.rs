use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::{param_str, require_unlocked, views};
use crate::ipc::types::{AppState, Request};
use crate::model::{filter_students, ClassFilter, Student, StudentDraft, StudentView};
use crate::screen::Screen;
use serde_json::json;
use std::time::Instant;
use tracing::debug;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let search = param_str(req, "search").unwrap_or("");
    let Some(class) = ClassFilter::parse(param_str(req, "className")) else {
        return err(Some(&req.id), ErrorCode::BadParams, "unknown className", None);
    };
    let hits = filter_students(&state.students, search, class);
    ok(&req.id, json!({ "students": views(hits) }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let draft: StudentDraft = match serde_json::from_value(req.params.clone()) {
        Ok(d) => d,
        Err(e) => return err(Some(&req.id), ErrorCode::BadParams, e.to_string(), None),
    };
    let Some(store) = state.store.as_mut() else {
        return err(Some(&req.id), ErrorCode::NoWorkspace, "select a workspace first", None);
    };

    let student = match draft.into_student(chrono::Utc::now()) {
        Ok(s) => s,
        Err(reason) => {
            // Incomplete forms are simply not submitted.
            debug!(%reason, "student draft rejected");
            return ok(
                &req.id,
                json!({
                    "created": false,
                    "rejected": reason.to_string(),
                    "students": views(&state.students),
                }),
            );
        }
    };

    let m = store.add(student.clone());
    state.students = m.students;
    if m.applied && state.screen.screen() == Screen::AddStudent {
        let _ = state.screen.back(Instant::now());
    }

    ok(
        &req.id,
        json!({
            "created": m.applied,
            "student": m.applied.then(|| StudentView::from(&student)),
            "students": views(&state.students),
            "screen": state.screen.screen(),
        }),
    )
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student: Student = match req.params.get("student").cloned() {
        Some(v) => match serde_json::from_value(v) {
            Ok(s) => s,
            Err(e) => return err(Some(&req.id), ErrorCode::BadParams, e.to_string(), None),
        },
        None => return err(Some(&req.id), ErrorCode::BadParams, "missing student", None),
    };
    let Some(store) = state.store.as_mut() else {
        return err(Some(&req.id), ErrorCode::NoWorkspace, "select a workspace first", None);
    };

    // Same rule as the add form: a blank edit never reaches the slot.
    if student.name.trim().is_empty() || !student.is_well_formed() {
        return ok(
            &req.id,
            json!({
                "matched": false,
                "applied": false,
                "rejected": "name is required and amounts must be zero or more",
                "students": views(&state.students),
            }),
        );
    }

    let m = store.update(student);
    state.students = m.students;
    ok(
        &req.id,
        json!({
            "matched": m.matched,
            "applied": m.applied,
            "students": views(&state.students),
        }),
    )
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student_id) = param_str(req, "studentId").map(str::to_string) else {
        return err(Some(&req.id), ErrorCode::BadParams, "missing studentId", None);
    };
    let Some(store) = state.store.as_mut() else {
        return err(Some(&req.id), ErrorCode::NoWorkspace, "select a workspace first", None);
    };

    let m = store.remove(&student_id);
    state.students = m.students;
    ok(
        &req.id,
        json!({
            "removed": m.applied,
            "matched": m.matched,
            "students": views(&state.students),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: fn(&mut AppState, &Request) -> serde_json::Value = match req.method.as_str() {
        "students.list" => handle_students_list,
        "students.create" => handle_students_create,
        "students.update" => handle_students_update,
        "students.delete" => handle_students_delete,
        _ => return None,
    };
    if let Err(resp) = require_unlocked(state, req) {
        return Some(resp);
    }
    Some(handler(state, req))
}
