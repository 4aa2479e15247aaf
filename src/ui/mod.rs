//! Ratatui front-end: a single screen holding the add-book form, the search
//! box, the books table, and a popup for notices.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
