use anyhow::Result;

mod app;
mod input;
mod modal;
mod view;
mod views;
mod wizard;

// Core TUI types shared by submodules via `super::...`.
use app::{App, ChoiceAction, Modal, ModalKind, PendingAction, TextInputAction, fmt_ts_list, fmt_ts_ui};
use view::{RenderCtx, render_view_chrome};

pub(crate) fn run() -> Result<()> {
    app::run()
}
