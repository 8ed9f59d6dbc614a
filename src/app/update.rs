use crate::app::Model;
use crate::keymap::Action;

/// Everything the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Move the cursor to the previous discussion
    CursorUp,
    /// Move the cursor to the next discussion
    CursorDown,
    /// Select the previous section
    PrevSection,
    /// Select the next section
    NextSection,
    /// Terminal resized
    Resize(u16, u16),
    /// Quit the application
    Quit,
}

impl From<Action> for Message {
    fn from(action: Action) -> Self {
        match action {
            Action::Quit => Self::Quit,
            Action::CursorUp => Self::CursorUp,
            Action::CursorDown => Self::CursorDown,
            Action::PrevSection => Self::PrevSection,
            Action::NextSection => Self::NextSection,
        }
    }
}

/// Pure function that updates the model based on a message.
///
/// Every state transition happens here and none of them can fail: cursor
/// moves clamp to the collections and resizes saturate at zero.
pub fn update(mut model: Model, msg: Message) -> Model {
    tracing::debug!(?msg, cursor = ?model.cursor, "update");
    match msg {
        Message::CursorUp => model.cursor_up(),
        Message::CursorDown => model.cursor_down(),
        Message::PrevSection => model.prev_section(),
        Message::NextSection => model.next_section(),
        Message::Resize(width, height) => model.handle_resize(width, height),
        Message::Quit => model.should_quit = true,
    }
    model
}
