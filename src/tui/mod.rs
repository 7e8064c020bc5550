//! Terminal UI components using ratatui

mod terminal;
mod ui;

pub use terminal::{install_panic_hook, Tui};
pub use ui::render;
