// Terminal UI for browsing the collection, built on ratatui
// The gallery wall, more or less

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{Action, App, InputMode, ViewStatus};
pub use runner::run_tui;
