pub mod actions;
pub mod backend;
pub mod completion;
pub mod context;
pub mod create;
pub mod hooks;
pub mod host;
pub mod model;
pub mod notify;
pub mod remote;
pub mod session;
pub mod store;
pub mod tui;
pub mod utils;

mod tui_shell;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
