use std::path::PathBuf;
use std::time::Instant;

use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::SqliteSlot;
use crate::model::Student;
use crate::screen::ScreenController;
use crate::store::RecordStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything the sidecar holds for the session. `students` is the
/// in-memory copy, replaced wholesale with whatever the store returns.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub config: AppConfig,
    pub store: Option<RecordStore<SqliteSlot>>,
    pub students: Vec<Student>,
    pub screen: ScreenController,
}

impl AppState {
    pub fn new(now: Instant) -> Self {
        let config = AppConfig::default();
        let screen = ScreenController::new(&config, now);
        Self {
            workspace: None,
            config,
            store: None,
            students: Vec::new(),
            screen,
        }
    }
}
