//! Screen state machine.
//!
//! `Splash -> Login -> Dashboard -> {work screen} -> Dashboard`. The two timed
//! transitions (splash auto-advance, login error auto-clear) are deadlines
//! checked against a monotonic clock whenever the controller is consulted.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    Splash,
    Login,
    Dashboard,
    AddStudent,
    FeesReminder,
    ViewStudents,
    RemoveStudents,
}

impl Screen {
    pub fn is_work_screen(self) -> bool {
        matches!(
            self,
            Screen::AddStudent | Screen::FeesReminder | Screen::ViewStudents | Screen::RemoveStudents
        )
    }

    /// Header title for screens that show the app header.
    pub fn title(self) -> Option<&'static str> {
        match self {
            Screen::Splash | Screen::Login => None,
            Screen::Dashboard => Some("Shivsadhana Academy"),
            Screen::AddStudent => Some("Add New Student"),
            Screen::FeesReminder => Some("Fee Reminders"),
            Screen::ViewStudents => Some("All Students"),
            Screen::RemoveStudents => Some("Remove Students"),
        }
    }

    pub fn show_back(self) -> bool {
        self.is_work_screen()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot go from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: Screen,
    pub to: Screen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected,
    /// Not on the login screen (still on splash, or already past it).
    NotAvailable,
}

#[derive(Debug, Clone)]
pub struct ScreenController {
    screen: Screen,
    started_at: Instant,
    splash_delay: Duration,
    error_for: Duration,
    login_error_until: Option<Instant>,
    access_code: String,
}

impl ScreenController {
    pub fn new(cfg: &AppConfig, now: Instant) -> Self {
        Self {
            screen: Screen::Splash,
            started_at: now,
            splash_delay: cfg.splash_delay(),
            error_for: cfg.login_error_duration(),
            login_error_until: None,
            access_code: cfg.access_code.clone(),
        }
    }

    /// Picks up timings and the access code from a newly loaded config. The
    /// splash deadline stays anchored to process start.
    pub fn apply_config(&mut self, cfg: &AppConfig) {
        self.splash_delay = cfg.splash_delay();
        self.error_for = cfg.login_error_duration();
        self.access_code = cfg.access_code.clone();
    }

    pub fn tick(&mut self, now: Instant) {
        if self.screen == Screen::Splash && now >= self.started_at + self.splash_delay {
            self.screen = Screen::Login;
        }
        if self.login_error_until.is_some_and(|until| now >= until) {
            self.login_error_until = None;
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// True once the login gate has been passed.
    pub fn is_unlocked(&self) -> bool {
        !matches!(self.screen, Screen::Splash | Screen::Login)
    }

    pub fn login_error_visible(&self) -> bool {
        self.login_error_until.is_some()
    }

    pub fn login(&mut self, secret: &str, now: Instant) -> LoginOutcome {
        self.tick(now);
        if self.screen != Screen::Login {
            return LoginOutcome::NotAvailable;
        }
        if secret == self.access_code {
            self.screen = Screen::Dashboard;
            self.login_error_until = None;
            LoginOutcome::Accepted
        } else {
            self.login_error_until = Some(now + self.error_for);
            LoginOutcome::Rejected
        }
    }

    pub fn navigate(&mut self, to: Screen, now: Instant) -> Result<Screen, InvalidTransition> {
        self.tick(now);
        let from = self.screen;
        let allowed = (from == Screen::Dashboard && to.is_work_screen())
            || (from.is_work_screen() && to == Screen::Dashboard)
            || (from == to && self.is_unlocked());
        if !allowed {
            return Err(InvalidTransition { from, to });
        }
        self.screen = to;
        Ok(to)
    }

    pub fn back(&mut self, now: Instant) -> Result<Screen, InvalidTransition> {
        self.navigate(Screen::Dashboard, now)
    }
}
