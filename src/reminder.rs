use serde::Serialize;

use crate::config::AppConfig;
use crate::model::{format_amount, Student};

const HEADER: &str = "Following students have pending fees:";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub recipients_count: usize,
    pub message_text: String,
    /// Link handed to the host's "open external link" capability.
    pub url: String,
}

pub fn defaulters(students: &[Student]) -> Vec<&Student> {
    students.iter().filter(|s| s.is_defaulter()).collect()
}

pub fn reminder_line(s: &Student, currency: &str) -> String {
    format!(
        "{} ({}): {}{}",
        s.name,
        s.class_name,
        currency,
        format_amount(s.due())
    )
}

/// Composes the reminder for every defaulter. Returns `None` when nobody
/// owes anything, in which case sending is disabled.
pub fn compose_reminder(students: &[Student], cfg: &AppConfig) -> Option<Reminder> {
    let owing = defaulters(students);
    if owing.is_empty() {
        return None;
    }
    let list = owing
        .iter()
        .map(|s| reminder_line(s, &cfg.currency_symbol))
        .collect::<Vec<_>>()
        .join("\n");
    let message_text = format!("{HEADER}\n\n{list}");
    let url = format!(
        "{}?text={}",
        cfg.messaging_base_url,
        urlencoding::encode(&message_text)
    );

    Some(Reminder {
        recipients_count: owing.len(),
        message_text,
        url,
    })
}
