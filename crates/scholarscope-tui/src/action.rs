use crate::app::Screen;

/// Every user-driven state change the app understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    ShowScreen(Screen),
    NextScreen,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    DrillIn,
    ToggleHelp,

    // Text entry (locator bar and save comment)
    StartEditing,
    TextInput(char),
    Backspace,
    Confirm,
    Cancel,

    // Save workflow
    OpenSave,
    RatingUp,
    RatingDown,

    // History
    DeleteEntry,
    ClearHistory,
}
