mod update;

use std::time::{Duration, Instant};

use ratatui::Frame;

use scholarscope_core::dataset::{VenueOption, venue_options};
use scholarscope_core::{
    ControllerEvent, DatasetView, HistoryEntry, HistoryStore, Report, ReportController,
};

use crate::theme::Theme;

/// How long a status message stays in the footer.
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Report,
    History,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Home, Screen::Report, Screen::History];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Report => "Generate Report",
            Screen::History => "History",
        }
    }

    pub fn next(self) -> Screen {
        match self {
            Screen::Home => Screen::Report,
            Screen::Report => Screen::History,
            Screen::History => Screen::Home,
        }
    }
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a profile URL into the search bar.
    Locator,
    /// Save modal is open: typing a comment, arrows move the rating.
    Comment,
    /// Yes/no prompt (clear history).
    Confirm,
}

/// Transient footer message.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    pub expires: Instant,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub confirm_clear: bool,
    /// Set after the first Enter on an unrated save; the next Enter saves.
    pub unrated_save_warned: bool,

    pub controller: ReportController,
    pub history: HistoryStore,
    /// History as last read from the store; refreshed on entering the screen
    /// and after every mutation.
    pub history_entries: Vec<HistoryEntry>,
    pub history_cursor: usize,

    pub locator_input: String,
    pub dataset: DatasetView,
    /// Highlighted row in the venue sidebar.
    pub venue_cursor: usize,
    pub status: Option<StatusLine>,
}

impl App {
    pub fn new(controller: ReportController, history: HistoryStore, theme: Theme) -> Self {
        let locator_input = controller.locator().unwrap_or_default().to_string();
        let history_entries = history.list();
        Self {
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            theme,
            tick: 0,
            should_quit: false,
            show_help: false,
            confirm_clear: false,
            unrated_save_warned: false,
            controller,
            history,
            history_entries,
            history_cursor: 0,
            locator_input,
            dataset: DatasetView::new(),
            venue_cursor: 0,
            status: None,
        }
    }

    /// Feed a controller event through and react to committed outcomes.
    pub fn handle_controller_event(&mut self, event: ControllerEvent) {
        let settled = matches!(event, ControllerEvent::Settled { .. });
        let failed = matches!(event, ControllerEvent::Fetched { result: Err(_), .. });
        if !self.controller.handle_event(event) {
            return;
        }

        if settled {
            // A new report invalidates any venue filter and page position.
            self.dataset.reset();
            self.venue_cursor = 0;
            if let Some(report) = self.controller.current_report() {
                let text = format!("Report ready: {}", report.profile.name);
                self.set_status(text, false);
            }
        } else if failed && let Some(err) = self.controller.last_error() {
            let text = format!("Failed to fetch data: {err}");
            self.set_status(text, true);
        }
    }

    pub fn report(&self) -> Option<&Report> {
        self.controller.current_report()
    }

    /// Sidebar entries for the current report ("All Publications" first).
    pub fn venue_options(&self) -> Vec<VenueOption> {
        self.report()
            .map(|r| venue_options(&r.papers))
            .unwrap_or_default()
    }

    pub fn refresh_history(&mut self) {
        self.history_entries = self.history.list();
        if self.history_cursor >= self.history_entries.len() {
            self.history_cursor = self.history_entries.len().saturating_sub(1);
        }
    }

    pub fn selected_history(&self) -> Option<&HistoryEntry> {
        self.history_entries.get(self.history_cursor)
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error,
            expires: Instant::now() + STATUS_TTL,
        });
    }

    pub fn view(&self, f: &mut Frame) {
        crate::view::render(f, self);
    }
}
