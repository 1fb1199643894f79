use std::io;

use anyhow::Context;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.sync_session();

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

pub(in crate::tui_shell) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    if app.modal.is_some() {
        modal::handle_modal_key(app, key);
        return;
    }

    if app.auth.context().is_authenticated() {
        handle_list_key(app, key);
    } else {
        handle_login_key(app, key);
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('p') => app.start_password_login(),
        KeyCode::Char('o') => app.start_otp_login(),
        KeyCode::Char('v') => app.start_otp_verify(),
        KeyCode::Char('b') => app.start_oauth_login(),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,

        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Home => app.selected = 0,
        KeyCode::End => {
            let n = app.visible().len();
            app.selected = n.saturating_sub(1);
        }

        KeyCode::Enter => app.show_selected(),
        KeyCode::Char('t') => app.cycle_filter(),
        KeyCode::Char('r') => app.refresh(),

        KeyCode::Char('c') => app.copy_selected(),
        KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('p') => app.toggle_public_selected(),
        KeyCode::Char('a') => app.toggle_archive_selected(),
        KeyCode::Char('g') => app.start_tag_selected(),
        KeyCode::Char('d') => app.confirm_destroy_selected(),
        KeyCode::Char('n') => app.start_create_wizard(),
        KeyCode::Char('L') => app.confirm_logout(),

        _ => {}
    }
}
