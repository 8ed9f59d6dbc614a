use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Result, bail};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::discussion::{Discussion, Section};
use crate::keymap::{Action, KeyBind, KeyMap};

use super::{
    App, EventSource, LOADING_TEXT, Message, Model, QuitSignal, Renderer, message_for_event,
    update,
};

fn create_test_model(titles: &[&str]) -> Model {
    Model::new(titles.iter().map(|t| Discussion::titled(*t)).collect())
}

fn create_sectioned_model() -> Model {
    let ideas = Section::new("Ideas", "C1");
    let q_and_a = Section::new("Q&A", "C2");
    let general = Section::new("General", "C3");
    Model::new(vec![
        Discussion::titled("a").with_category(ideas),
        Discussion::titled("b").with_category(q_and_a),
        Discussion::titled("c").with_category(general),
    ])
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn apply(model: Model, msgs: &[Message]) -> Model {
    msgs.iter().fold(model, |m, msg| update(m, *msg))
}

#[test]
fn test_new_model_starts_loading_at_origin() {
    let model = create_test_model(&["Alpha"]);
    assert!(!model.ready);
    assert_eq!(model.cursor.item, 0);
    assert_eq!(model.cursor.section, 0);
    assert!(model.sections.is_empty());
}

#[test]
fn test_render_text_before_resize_is_loading_placeholder() {
    let model = create_test_model(&["Alpha", "Beta"]);
    assert_eq!(model.render_text(), LOADING_TEXT);
    assert_eq!(model.render_text(), "Loading...");
}

#[test]
fn test_render_text_after_resize_marks_cursor_row() {
    let model = update(create_test_model(&["A", "B"]), Message::Resize(80, 24));
    let text = model.render_text();

    assert_eq!(
        text,
        "Discussions\n===========\n\n> A\n  B\n\nUse ↑/↓ to navigate, q to quit\n"
    );
    assert!(text.lines().any(|l| l == "> A"));
    assert!(text.lines().any(|l| l == "  B"));
}

#[test]
fn test_render_text_moves_marker_with_cursor() {
    let model = apply(
        create_test_model(&["A", "B"]),
        &[Message::Resize(80, 24), Message::CursorDown],
    );
    let text = model.render_text();
    assert!(text.lines().any(|l| l == "  A"));
    assert!(text.lines().any(|l| l == "> B"));
}

#[test]
fn test_cursor_down_clamps_at_last_item() {
    let model = create_test_model(&["Alpha", "Beta", "Gamma"]);
    let model = apply(model, &[Message::CursorDown, Message::CursorDown]);
    assert_eq!(model.cursor.item, 2);

    let model = update(model, Message::CursorDown);
    assert_eq!(model.cursor.item, 2);
}

#[test]
fn test_cursor_up_clamps_at_zero() {
    let model = create_test_model(&["Alpha", "Beta"]);
    let model = apply(model, &[Message::CursorDown, Message::CursorUp, Message::CursorUp]);
    assert_eq!(model.cursor.item, 0);
}

#[test]
fn test_empty_list_keeps_cursor_at_zero() {
    let model = apply(
        create_test_model(&[]),
        &[
            Message::CursorDown,
            Message::CursorDown,
            Message::CursorUp,
            Message::NextSection,
            Message::PrevSection,
        ],
    );
    assert_eq!(model.cursor.item, 0);
    assert_eq!(model.cursor.section, 0);
    assert!(model.selected().is_none());
}

#[test]
fn test_first_resize_lays_out_panes() {
    let model = update(create_test_model(&["A"]), Message::Resize(100, 40));
    assert!(model.ready);
    assert_eq!(model.content_width(), 50);
    assert_eq!(model.content_height(), 33);
    assert_eq!(model.preview_height(), 35);
    assert_eq!(model.preview_width(), 50);
    assert_eq!(model.preview.width(), 0);
}

#[test]
fn test_later_resize_keeps_content_width() {
    let model = update(create_test_model(&["A"]), Message::Resize(100, 40));
    let (w, ch, ph) = (
        model.content_width(),
        model.content_height(),
        model.preview_height(),
    );

    let model = update(model, Message::Resize(100, 20));
    assert_eq!(model.content_width(), w);
    assert_ne!(model.content_height(), ch);
    assert_ne!(model.preview_height(), ph);
    assert_eq!(model.content_height(), 13);
    assert_eq!(model.preview_height(), 15);

    let model = update(model, Message::Resize(200, 20));
    assert_eq!(model.content_width(), 50);
    assert_eq!(model.width, 200);
}

#[test]
fn test_tiny_terminal_saturates_dimensions() {
    let model = update(create_test_model(&["A"]), Message::Resize(10, 3));
    assert!(model.ready);
    assert_eq!(model.content_width(), 0);
    assert_eq!(model.content_height(), 0);
    assert_eq!(model.preview_height(), 0);
}

#[test]
fn test_preview_height_boundary_at_margins() {
    // Six rows of margin: the preview pane appears at height 6.
    let heights = [(5, 0), (6, 1), (7, 2)];
    for (height, expected) in heights {
        let model = update(create_test_model(&["A"]), Message::Resize(100, height));
        assert_eq!(model.preview_height(), expected, "height {height}");
    }
    let model = update(create_test_model(&["A"]), Message::Resize(100, 40));
    let model = update(model, Message::Resize(100, 5));
    assert_eq!(model.preview_height(), 0);
}

#[test]
fn test_sections_populate_on_first_resize() {
    let model = create_sectioned_model();
    assert!(model.sections.is_empty());

    let model = update(model, Message::Resize(80, 24));
    let names: Vec<_> = model.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Ideas", "Q&A", "General"]);
}

#[test]
fn test_section_navigation_clamps_both_ends() {
    let model = update(create_sectioned_model(), Message::Resize(80, 24));
    let model = apply(
        model,
        &[
            Message::NextSection,
            Message::NextSection,
            Message::NextSection,
        ],
    );
    assert_eq!(model.cursor.section, 2);
    assert_eq!(model.current_section().map(|s| s.category_id.as_str()), Some("C3"));

    let model = apply(
        model,
        &[
            Message::PrevSection,
            Message::PrevSection,
            Message::PrevSection,
        ],
    );
    assert_eq!(model.cursor.section, 0);
}

#[test]
fn test_section_navigation_before_layout_stays_at_zero() {
    let model = update(create_sectioned_model(), Message::NextSection);
    assert_eq!(model.cursor.section, 0);
}

#[test]
fn test_section_moves_leave_item_cursor_alone() {
    let model = apply(
        create_sectioned_model(),
        &[
            Message::Resize(80, 24),
            Message::CursorDown,
            Message::NextSection,
        ],
    );
    assert_eq!(model.cursor.item, 1);
    assert_eq!(model.cursor.section, 1);
}

#[test]
fn test_quit_message_sets_should_quit() {
    let model = update(create_test_model(&["A"]), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_handle_key_dispatches_through_keymap() {
    let keymap = KeyMap::default();
    let mut model = create_test_model(&["Alpha", "Beta", "Gamma"]);

    assert_eq!(model.handle_key(&keymap, press(KeyCode::Down)), None);
    assert_eq!(model.handle_key(&keymap, press(KeyCode::Char('j'))), None);
    assert_eq!(model.cursor.item, 2);
    assert_eq!(model.handle_key(&keymap, press(KeyCode::Up)), None);
    assert_eq!(model.cursor.item, 1);
}

#[test]
fn test_handle_key_unbound_key_is_noop() {
    let keymap = KeyMap::default();
    let mut model = create_test_model(&["Alpha", "Beta"]);
    assert_eq!(model.handle_key(&keymap, press(KeyCode::Char('z'))), None);
    assert_eq!(model.cursor.item, 0);
    assert!(!model.should_quit);
}

#[test]
fn test_handle_key_quit_returns_signal() {
    let keymap = KeyMap::default();
    let mut model = create_test_model(&["Alpha"]);
    assert_eq!(
        model.handle_key(&keymap, press(KeyCode::Char('q'))),
        Some(QuitSignal)
    );
    assert!(model.should_quit);
}

#[test]
fn test_handle_key_respects_rebinding() {
    let mut keymap = KeyMap::default();
    keymap.bind(Action::CursorDown, KeyBind::plain(KeyCode::Char('n')));
    let mut model = create_test_model(&["Alpha", "Beta"]);

    model.handle_key(&keymap, press(KeyCode::Down));
    assert_eq!(model.cursor.item, 0);
    model.handle_key(&keymap, press(KeyCode::Char('n')));
    assert_eq!(model.cursor.item, 1);
}

#[test]
fn test_message_for_event_maps_resize_and_keys() {
    let keymap = KeyMap::default();
    assert_eq!(
        message_for_event(&Event::Resize(120, 30), &keymap),
        Some(Message::Resize(120, 30))
    );
    assert_eq!(
        message_for_event(&Event::Key(press(KeyCode::Right)), &keymap),
        Some(Message::NextSection)
    );
    assert_eq!(message_for_event(&Event::FocusGained, &keymap), None);
}

#[test]
fn test_message_for_event_ignores_key_release() {
    let keymap = KeyMap::default();
    let release = KeyEvent::new_with_kind_and_state(
        KeyCode::Char('q'),
        KeyModifiers::NONE,
        KeyEventKind::Release,
        KeyEventState::NONE,
    );
    assert_eq!(message_for_event(&Event::Key(release), &keymap), None);
}

#[test]
fn test_cursor_stays_visible_in_content_viewport() {
    let titles: Vec<String> = (0..30).map(|i| i.to_string()).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let mut model = update(create_test_model(&refs), Message::Resize(80, 17));
    assert_eq!(model.content_height(), 10);

    for _ in 0..25 {
        model = update(model, Message::CursorDown);
    }
    assert!(model.content.visible_range().contains(&25));

    // Shrinking keeps the cursor on screen.
    let model = update(model, Message::Resize(80, 12));
    assert!(model.content.visible_range().contains(&25));
}

/// Replays a fixed list of events, failing if the loop asks for more.
struct ScriptedEvents {
    events: VecDeque<Event>,
}

impl ScriptedEvents {
    fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => bail!("event script exhausted"),
        }
    }
}

/// Counts frames and remembers the last text rendering.
#[derive(Default)]
struct RecordingRenderer {
    size: (u16, u16),
    frames: usize,
    last: String,
}

impl Renderer for RecordingRenderer {
    fn area_size(&self) -> Result<(u16, u16)> {
        Ok(self.size)
    }

    fn render_model(&mut self, model: &Model) -> Result<()> {
        self.frames += 1;
        self.last = model.render_text();
        Ok(())
    }
}

#[test]
fn test_event_loop_runs_until_quit() {
    let app = App::new(vec![
        Discussion::titled("Alpha"),
        Discussion::titled("Beta"),
        Discussion::titled("Gamma"),
    ]);
    let mut model = Model::new(vec![
        Discussion::titled("Alpha"),
        Discussion::titled("Beta"),
        Discussion::titled("Gamma"),
    ]);
    let mut renderer = RecordingRenderer {
        size: (100, 40),
        ..RecordingRenderer::default()
    };
    let mut events = ScriptedEvents::new([
        Event::Key(press(KeyCode::Down)),
        Event::Key(press(KeyCode::Char('x'))),
        Event::Resize(100, 20),
        Event::Key(press(KeyCode::Down)),
        Event::Key(press(KeyCode::Down)),
        Event::Key(press(KeyCode::Char('q'))),
    ]);

    app.event_loop(&mut renderer, &mut events, &mut model)
        .unwrap();

    assert!(model.should_quit);
    assert!(model.ready);
    assert_eq!(model.cursor.item, 2);
    assert_eq!(model.content_width(), 50);
    assert_eq!(model.content_height(), 13);
    assert!(renderer.frames >= 2);
    assert!(renderer.last.lines().any(|l| l == "> Gamma"));
}

#[test]
fn test_event_loop_propagates_source_errors() {
    let app = App::new(vec![Discussion::titled("Alpha")]);
    let mut model = Model::new(vec![Discussion::titled("Alpha")]);
    let mut renderer = RecordingRenderer {
        size: (80, 24),
        ..RecordingRenderer::default()
    };
    let mut events = ScriptedEvents::new([Event::Key(press(KeyCode::Down))]);

    let err = app
        .event_loop(&mut renderer, &mut events, &mut model)
        .unwrap_err();
    assert!(err.to_string().contains("exhausted"));
    assert!(model.ready);
}

#[test]
fn test_event_loop_draws_into_test_backend() {
    let app = App::new(vec![Discussion::titled("Alpha"), Discussion::titled("Beta")]);
    let mut model = Model::new(vec![Discussion::titled("Alpha"), Discussion::titled("Beta")]);
    let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
    let mut events = ScriptedEvents::new([
        Event::Key(press(KeyCode::Char('j'))),
        Event::Key(press(KeyCode::Char('q'))),
    ]);

    app.event_loop(&mut terminal, &mut events, &mut model)
        .unwrap();

    let buffer = terminal.backend().buffer();
    let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(content.contains("> Beta"));
    assert!(content.contains("  Alpha"));
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn nav_message() -> impl Strategy<Value = Message> {
        prop_oneof![
            Just(Message::CursorUp),
            Just(Message::CursorDown),
            Just(Message::PrevSection),
            Just(Message::NextSection),
            (0..300u16, 0..100u16).prop_map(|(w, h)| Message::Resize(w, h)),
        ]
    }

    proptest! {
        #[test]
        fn cursor_always_in_bounds(
            item_count in 0..20usize,
            section_count in 0..5usize,
            msgs in prop::collection::vec(nav_message(), 0..200),
        ) {
            let items = (0..item_count)
                .map(|i| {
                    let id = i % section_count.max(1);
                    let d = Discussion::titled(format!("item {i}"));
                    if section_count == 0 {
                        d
                    } else {
                        d.with_category(Section::new(format!("s{id}"), format!("C{id}")))
                    }
                })
                .collect();
            let mut model = Model::new(items);
            for msg in msgs {
                model = update(model, msg);
                prop_assert!(model.cursor.item < item_count.max(1));
                prop_assert!(model.cursor.section < model.sections.len().max(1));
                prop_assert!(model.content.visible_range().end <= item_count);
            }
        }

        #[test]
        fn cursor_down_reaches_but_never_passes_end(
            item_count in 1..50usize,
            presses in 0..100usize,
        ) {
            let mut model = Model::new(
                (0..item_count).map(|i| Discussion::titled(i.to_string())).collect(),
            );
            for _ in 0..presses {
                model = update(model, Message::CursorDown);
            }
            prop_assert_eq!(model.cursor.item, presses.min(item_count - 1));
        }

        #[test]
        fn resize_after_first_never_changes_width(
            first in (0..300u16, 0..100u16),
            rest in prop::collection::vec((0..300u16, 0..100u16), 1..20),
        ) {
            let mut model = update(Model::new(Vec::new()), Message::Resize(first.0, first.1));
            let width = model.content_width();
            for (w, h) in rest {
                model = update(model, Message::Resize(w, h));
                prop_assert_eq!(model.content_width(), width);
            }
        }
    }
}
