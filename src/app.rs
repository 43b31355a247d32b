//! Application state and request lifecycle
//!
//! The app owns the input buffer, the theme, and one `RequestState` value.
//! Every recommendation request carries a sequence number so a completion
//! arriving for a superseded request can be dropped instead of clobbering
//! the current state.

use anyhow::{Context, Result};
use std::process::Command;

use crate::api::Recommendation;
use crate::theme::Theme;

/// Messages sent from background tasks to the main app
#[derive(Debug)]
pub enum AppMessage {
    /// Recommendation request finished
    RecommendComplete {
        seq: u64,
        result: Result<Vec<Recommendation>, String>,
    },
    /// Startup health check finished
    HealthChecked(Result<String, String>),
}

/// Request lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// No search performed yet
    Idle,
    /// Exactly one request outstanding
    Loading,
    /// Last request failed with a message
    Error(String),
    /// Last request succeeded with zero recommendations
    Empty,
    /// Last request succeeded with ranked recommendations
    Results(Vec<Recommendation>),
}

/// Main application structure
pub struct App {
    pub state: RequestState,
    pub input: String,
    pub selected_index: usize,
    pub theme: Theme,
    /// Transient notice shown in the help bar (health check, browser opens)
    pub status_message: String,
    request_seq: u64,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            state: RequestState::Idle,
            input: String::new(),
            selected_index: 0,
            theme,
            status_message: String::new(),
            request_seq: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    /// Gate and dispatch one submission
    ///
    /// Returns the sequence number and trimmed query when a request should
    /// go out; `None` while a request is outstanding or when the input is
    /// blank. Dispatching clears any previous error or results.
    pub fn submit(&mut self) -> Option<(u64, String)> {
        if self.is_loading() {
            return None;
        }

        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();

        self.request_seq += 1;
        self.state = RequestState::Loading;
        self.selected_index = 0;

        Some((self.request_seq, query))
    }

    /// Apply a request completion
    ///
    /// Completions for anything but the most recently issued request are
    /// dropped.
    pub fn finish_request(&mut self, seq: u64, result: Result<Vec<Recommendation>, String>) {
        if seq != self.request_seq {
            return;
        }

        self.selected_index = 0;
        self.state = match result {
            Ok(recommendations) if recommendations.is_empty() => RequestState::Empty,
            Ok(recommendations) => RequestState::Results(recommendations),
            Err(message) => RequestState::Error(message),
        };
    }

    /// Record the startup health check outcome
    pub fn record_health(&mut self, result: Result<String, String>) {
        self.status_message = match result {
            Ok(status) => format!("Backend: {}", status),
            Err(e) => format!("Backend unreachable: {}", e),
        };
    }

    /// Currently displayed recommendations, empty outside the Results state
    pub fn results(&self) -> &[Recommendation] {
        match &self.state {
            RequestState::Results(list) => list,
            _ => &[],
        }
    }

    /// Move selection to the next row
    pub fn next_result(&mut self) {
        let len = self.results().len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    /// Move selection to the previous row
    pub fn previous_result(&mut self) {
        let len = self.results().len();
        if len > 0 {
            if self.selected_index == 0 {
                self.selected_index = len - 1;
            } else {
                self.selected_index -= 1;
            }
        }
    }

    /// Open the selected recommendation in the system browser
    pub fn open_selected(&mut self) {
        let url = match self.results().get(self.selected_index) {
            Some(rec) => rec.assessment_url.clone(),
            None => return,
        };

        self.status_message = match open_url(&url) {
            Ok(()) => format!("Opened {}", url),
            Err(e) => format!("Failed to open URL: {}", e),
        };
    }

    /// Flip the theme, persisting the new preference
    pub fn toggle_theme(&mut self) {
        if let Err(e) = self.theme.toggle() {
            self.status_message = format!("Failed to save theme: {}", e);
        }
    }
}

/// Open URL in default browser
fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open")
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to open browser")?;
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", "", url])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to open browser")?;
    }

    Ok(())
}
