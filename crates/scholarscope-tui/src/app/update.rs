use std::time::Instant;

use scholarscope_core::history::MAX_RATING;

use super::{App, InputMode, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                if self
                    .status
                    .as_ref()
                    .is_some_and(|s| Instant::now() >= s.expires)
                {
                    self.status = None;
                }
                return false;
            }
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        // Help overlay swallows everything until dismissed
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::Cancel) {
                self.show_help = false;
            }
            return false;
        }

        match self.input_mode {
            InputMode::Confirm => self.update_confirm(action),
            InputMode::Locator => self.update_locator(action),
            InputMode::Comment => self.update_comment(action),
            InputMode::Normal => self.update_normal(action),
        }
        false
    }

    fn update_confirm(&mut self, action: Action) {
        match action {
            Action::Confirm => {
                self.confirm_clear = false;
                self.input_mode = InputMode::Normal;
                match self.history.clear_all() {
                    Ok(()) => {
                        self.refresh_history();
                        self.history_cursor = 0;
                        self.set_status("History cleared", false);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to clear history");
                        self.set_status(format!("Could not clear history: {e}"), true);
                    }
                }
            }
            Action::Cancel => {
                self.confirm_clear = false;
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn update_locator(&mut self, action: Action) {
        match action {
            Action::TextInput(c) => self.locator_input.push(c),
            Action::Backspace => {
                self.locator_input.pop();
            }
            Action::Confirm => {
                if self.controller.submit(&self.locator_input) {
                    self.input_mode = InputMode::Normal;
                    self.status = None;
                } else if self.locator_input.trim().is_empty() {
                    self.set_status("Enter a Google Scholar profile URL", true);
                }
            }
            Action::Cancel => self.input_mode = InputMode::Normal,
            _ => {}
        }
    }

    fn update_comment(&mut self, action: Action) {
        if action != Action::Confirm {
            self.unrated_save_warned = false;
        }
        match action {
            Action::TextInput(c) => self.controller.comment_mut().push(c),
            Action::Backspace => {
                self.controller.comment_mut().pop();
            }
            Action::RatingUp => {
                let rating = self.controller.draft().rating;
                self.controller.set_rating((rating + 1).min(MAX_RATING));
            }
            Action::RatingDown => {
                let rating = self.controller.draft().rating;
                self.controller.set_rating(rating.saturating_sub(1));
            }
            Action::Confirm => self.confirm_save(),
            Action::Cancel => {
                self.controller.cancel_save();
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn confirm_save(&mut self) {
        if self.controller.draft().rating == 0 && !self.unrated_save_warned {
            self.unrated_save_warned = true;
            self.set_status(
                format!("Not rated yet (1-{MAX_RATING}); press Enter again to save unrated"),
                true,
            );
            return;
        }
        self.unrated_save_warned = false;
        match self.controller.confirm_save(&self.history) {
            Ok(entry) => {
                self.input_mode = InputMode::Normal;
                self.refresh_history();
                self.set_status(format!("Saved {} to history", entry.name), false);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save report to history");
                self.set_status(format!("Could not save: {e}"), true);
            }
        }
    }

    fn update_normal(&mut self, action: Action) {
        match action {
            Action::ShowScreen(screen) => {
                self.switch_to(screen);
                return;
            }
            Action::NextScreen => {
                self.switch_to(self.screen.next());
                return;
            }
            Action::ToggleHelp => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Home => {
                if matches!(action, Action::DrillIn | Action::StartEditing) {
                    self.switch_to(Screen::Report);
                    self.begin_editing();
                }
            }
            Screen::Report => self.update_report(action),
            Screen::History => self.update_history(action),
        }
    }

    fn update_report(&mut self, action: Action) {
        let option_count = self.venue_options().len();
        match action {
            Action::StartEditing => self.begin_editing(),
            Action::DrillIn => {
                if self.report().is_none() {
                    self.begin_editing();
                } else if let Some(option) = self.venue_options().into_iter().nth(self.venue_cursor)
                {
                    self.dataset.select_venue(option.venue);
                }
            }
            Action::Cancel => {
                self.dataset.select_venue(None);
                self.venue_cursor = 0;
            }
            Action::MoveDown => {
                if self.venue_cursor + 1 < option_count {
                    self.venue_cursor += 1;
                }
            }
            Action::MoveUp => self.venue_cursor = self.venue_cursor.saturating_sub(1),
            Action::NextPage => {
                if let Some(report) = self.controller.current_report() {
                    self.dataset.next_page(&report.papers);
                }
            }
            Action::PrevPage => {
                if let Some(report) = self.controller.current_report() {
                    self.dataset.prev_page(&report.papers);
                }
            }
            Action::OpenSave => {
                if self.controller.open_save() {
                    self.unrated_save_warned = false;
                    self.input_mode = InputMode::Comment;
                } else if self.controller.draft().saved {
                    self.set_status("Already saved to history", false);
                } else {
                    self.set_status("Generate a report before saving", true);
                }
            }
            _ => {}
        }
    }

    fn update_history(&mut self, action: Action) {
        match action {
            Action::MoveDown => {
                if self.history_cursor + 1 < self.history_entries.len() {
                    self.history_cursor += 1;
                }
            }
            Action::MoveUp => self.history_cursor = self.history_cursor.saturating_sub(1),
            Action::DeleteEntry => {
                let Some(id) = self.selected_history().map(|h| h.id.clone()) else {
                    return;
                };
                match self.history.remove(&id) {
                    Ok(_) => {
                        self.refresh_history();
                        self.set_status("Entry removed", false);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, %id, "failed to remove history entry");
                        self.set_status(format!("Could not remove entry: {e}"), true);
                    }
                }
            }
            Action::ClearHistory => {
                if !self.history_entries.is_empty() {
                    self.confirm_clear = true;
                    self.input_mode = InputMode::Confirm;
                }
            }
            _ => {}
        }
    }

    fn switch_to(&mut self, screen: Screen) {
        if screen == Screen::History {
            self.refresh_history();
        }
        self.screen = screen;
    }

    /// Focus the search bar, unless a request is in flight.
    fn begin_editing(&mut self) {
        if self.controller.is_pending() {
            self.set_status("Analysis in progress", false);
            return;
        }
        self.input_mode = InputMode::Locator;
    }
}
