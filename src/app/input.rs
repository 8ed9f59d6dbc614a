use crossterm::event::{Event, KeyEvent, KeyEventKind};

use crate::app::{App, Message};
use crate::keymap::KeyMap;

/// Map a terminal event to a message.
///
/// Only key presses go through the key map; releases and repeats reported
/// by enhanced keyboard protocols are dropped. Focus, mouse and paste events
/// are ignored.
pub fn message_for_event(event: &Event, keymap: &KeyMap) -> Option<Message> {
    match event {
        Event::Key(key) => message_for_key(*key, keymap),
        Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
        _ => None,
    }
}

fn message_for_key(key: KeyEvent, keymap: &KeyMap) -> Option<Message> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    keymap.action_for(key).map(Message::from)
}

impl App {
    pub(super) fn handle_event(&self, event: &Event) -> Option<Message> {
        let msg = message_for_event(event, &self.keymap);
        if msg.is_none() {
            tracing::trace!(?event, "ignored event");
        }
        msg
    }
}
