use std::path::Path;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::context::ClientContext;
use crate::model::ClientConfig;
use crate::notify::ToastStyle;
use crate::hooks::{TypesHook, types_query};
use crate::store::LocalStore;
use crate::test_support::MemoryBackend;
use crate::tui_shell::ModalKind;
use crate::tui_shell::app::handle_key;

fn anonymous_app(root: &Path) -> App {
    let store = Arc::new(LocalStore::open(root).unwrap());
    store
        .write_config(&ClientConfig::new("http://127.0.0.1:9", "anon"))
        .unwrap();
    App::load(ClientContext::open(store).unwrap())
}

fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn text_action(app: &App) -> Option<TextInputAction> {
    match &app.modal.as_ref()?.kind {
        ModalKind::TextInput { action, .. } => Some(action.clone()),
        _ => None,
    }
}

#[test]
fn auth_code_is_taken_from_redirect_url() {
    assert_eq!(extract_auth_code(" abc123 "), "abc123");
    assert_eq!(
        extract_auth_code("http://localhost:3000/callback?code=xyz&state=1"),
        "xyz"
    );
    assert_eq!(
        extract_auth_code("http://localhost:3000/callback"),
        "http://localhost:3000/callback"
    );
}

#[test]
fn password_login_asks_email_then_masked_password() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = anonymous_app(tmp.path());

    press(&mut app, KeyCode::Char('p'));
    assert_eq!(text_action(&app), Some(TextInputAction::LoginEmail));

    type_text(&mut app, "me@example.com");
    press(&mut app, KeyCode::Enter);
    assert_eq!(text_action(&app), Some(TextInputAction::LoginPassword));
    assert!(app.modal.as_ref().unwrap().input.secret);
    assert_eq!(
        app.login_wizard.as_ref().unwrap().email.as_deref(),
        Some("me@example.com")
    );

    press(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
    assert!(app.login_wizard.is_none());
}

#[test]
fn invalid_email_keeps_the_modal_open() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = anonymous_app(tmp.path());

    press(&mut app, KeyCode::Char('o'));
    type_text(&mut app, "not-an-email");
    press(&mut app, KeyCode::Enter);

    let modal = app.modal.as_ref().unwrap();
    assert_eq!(text_action(&app), Some(TextInputAction::OtpEmail));
    assert!(modal.lines.iter().any(|l| l.starts_with("error:")));
}

#[test]
fn verify_without_pending_code_and_unconfigured_browser_fail_softly() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = anonymous_app(tmp.path());

    press(&mut app, KeyCode::Char('v'));
    assert!(app.modal.is_none());
    assert_eq!(app.last_toast().unwrap().style, ToastStyle::Failure);

    press(&mut app, KeyCode::Char('b'));
    assert!(app.modal.is_none());
    assert_eq!(
        app.last_toast().unwrap().title,
        "Browser sign-in is not configured"
    );
}

#[test]
fn create_requires_a_session_and_q_quits() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = anonymous_app(tmp.path());

    app.start_create_wizard();
    assert!(app.create_wizard.is_none());
    assert_eq!(app.last_toast().unwrap().title, "Sign in first");

    press(&mut app, KeyCode::Char('q'));
    assert!(app.quit);
}

#[test]
fn ctrl_c_quits_even_with_a_modal_open() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = anonymous_app(tmp.path());

    press(&mut app, KeyCode::Char('p'));
    assert!(app.modal.is_some());
    handle_key(
        &mut app,
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    );
    assert!(app.quit);
}

#[test]
fn create_kind_choice_follows_fetched_type_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = anonymous_app(tmp.path());
    let backend = MemoryBackend::with_types();
    app.types = TypesHook::new(types_query());
    app.types.mount(&backend);

    app.create_wizard = Some(CreateWizard::default());
    app.ask_create_kind(Vec::new());
    let options = match &app.modal.as_ref().unwrap().kind {
        ModalKind::Choice { options, .. } => options.clone(),
        other => panic!("expected a choice modal, got {:?}", other),
    };
    assert_eq!(options, vec!["🔗 Link", "🖼 Image", "💬 Text"]);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(
        app.create_wizard.as_ref().unwrap().form.kind,
        Some(ParticleKind::Text)
    );
    assert_eq!(text_action(&app), Some(TextInputAction::CreateContent));
}
