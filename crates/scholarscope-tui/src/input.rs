use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::{InputMode, Screen};

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Locator => map_key_locator(key),
                InputMode::Comment => map_key_comment(key),
                InputMode::Confirm => map_key_confirm(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

/// Expand a bracketed paste into one `TextInput` per character.
pub fn paste_actions(event: &Event, input_mode: &InputMode) -> Vec<Action> {
    match event {
        Event::Paste(text) if *input_mode != InputMode::Normal => text
            .chars()
            .filter(|c| !c.is_control())
            .map(Action::TextInput)
            .collect(),
        _ => vec![map_event(event, input_mode)],
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('1') => Action::ShowScreen(Screen::Home),
        KeyCode::Char('2') => Action::ShowScreen(Screen::Report),
        KeyCode::Char('3') => Action::ShowScreen(Screen::History),
        KeyCode::Tab => Action::NextScreen,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Action::NextPage,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Action::PrevPage,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('/') | KeyCode::Char('i') => Action::StartEditing,
        KeyCode::Char('s') => Action::OpenSave,
        KeyCode::Char('d') | KeyCode::Delete => Action::DeleteEntry,
        KeyCode::Char('D') => Action::ClearHistory,
        _ => Action::None,
    }
}

fn map_key_locator(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Cancel,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::TextInput(c),
        _ => Action::None,
    }
}

fn map_key_comment(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Cancel,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Right | KeyCode::Up => Action::RatingUp,
        KeyCode::Left | KeyCode::Down => Action::RatingDown,
        KeyCode::Char(c) => Action::TextInput(c),
        _ => Action::None,
    }
}

fn map_key_confirm(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        for mode in [
            InputMode::Normal,
            InputMode::Locator,
            InputMode::Comment,
            InputMode::Confirm,
        ] {
            assert_eq!(map_event(&ev, &mode), Action::Quit);
        }
    }

    #[test]
    fn q_is_text_while_editing() {
        let ev = press(KeyCode::Char('q'));
        assert_eq!(map_event(&ev, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&ev, &InputMode::Locator), Action::TextInput('q'));
        assert_eq!(map_event(&ev, &InputMode::Comment), Action::TextInput('q'));
        assert_eq!(map_event(&ev, &InputMode::Confirm), Action::None);
    }

    #[test]
    fn arrows_adjust_rating_in_comment_mode() {
        assert_eq!(
            map_event(&press(KeyCode::Right), &InputMode::Comment),
            Action::RatingUp
        );
        assert_eq!(
            map_event(&press(KeyCode::Left), &InputMode::Comment),
            Action::RatingDown
        );
    }

    #[test]
    fn paste_expands_to_text_input() {
        let ev = Event::Paste("ab\n".into());
        assert_eq!(
            paste_actions(&ev, &InputMode::Locator),
            vec![Action::TextInput('a'), Action::TextInput('b')]
        );
        assert_eq!(paste_actions(&ev, &InputMode::Normal), vec![Action::None]);
    }
}
