//! Drive the app through messages the way the event loop does, without a
//! terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use mdpad::app::{App, Message, Model};
use mdpad::commands::{Command, CommandStyle};
use mdpad::dialog::ListKind;

fn key(code: KeyCode) -> Message {
    Message::DialogKey(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, model: &mut Model, text: &str) {
    for ch in text.chars() {
        app.dispatch(model, key(KeyCode::Char(ch)));
    }
}

fn start(text: &str) -> (App, Model) {
    let mut app = App::new();
    let mut model = app.init_model(100, 30, 0);
    model.load_document(text);
    (app, model)
}

#[test]
fn test_write_a_small_document() {
    let (mut app, mut model) = start("");

    app.dispatch(&mut model, Message::Command(Command::Header(1)));
    // Header placeholder is selected; typing replaces it.
    for ch in "Shopping".chars() {
        app.dispatch(&mut model, Message::EditorInsertChar(ch));
    }
    app.dispatch(&mut model, Message::EditorSplitLine);
    app.dispatch(&mut model, Message::EditorSplitLine);

    app.dispatch(
        &mut model,
        Message::Command(Command::List(ListKind::Bulleted)),
    );
    type_text(&mut app, &mut model, "milk");
    app.dispatch(&mut model, key(KeyCode::Enter));
    type_text(&mut app, &mut model, "eggs");
    app.dispatch(
        &mut model,
        Message::DialogKey(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
    );

    assert_eq!(model.buffer.text(), "\n\n# Shopping\n\n- milk\n- eggs");
    assert!(model.dialogs.is_empty());
}

#[test]
fn test_link_dialog_validation_then_insert() {
    let (mut app, mut model) = start("see ");
    model.buffer.move_to_end(false);

    app.dispatch(&mut model, Message::Command(Command::Link));
    app.dispatch(&mut model, key(KeyCode::Enter));
    let dialog = model.dialogs.top().unwrap();
    assert_eq!(dialog.error(), Some("URL is required"));

    type_text(&mut app, &mut model, "https://example.com");
    app.dispatch(&mut model, key(KeyCode::Tab));
    type_text(&mut app, &mut model, "docs");
    app.dispatch(&mut model, key(KeyCode::Enter));

    assert_eq!(model.buffer.text(), "see [docs](https://example.com)");
}

#[test]
fn test_wrapping_a_selection() {
    let (mut app, mut model) = start("make this loud");
    model.buffer.move_to(0, 5);
    model.buffer.extend_to(0, 9);

    app.dispatch(&mut model, Message::Command(Command::Bold));
    assert_eq!(model.buffer.text(), "make **this** loud");
    assert_eq!(model.buffer.selected_text(), "this");

    app.dispatch(&mut model, Message::Command(Command::Strikethrough));
    assert_eq!(model.buffer.text(), "make **~~this~~** loud");
}

#[test]
fn test_static_commands_skip_dialogs() {
    let mut app = App::new().with_command_style(CommandStyle::Static);
    let mut model = app.init_model(100, 30, 0);
    model.load_document("intro");

    app.dispatch(&mut model, Message::Command(Command::Code));
    assert!(model.dialogs.is_empty());
    assert!(model.buffer.text().starts_with("intro\n```"));
}
