//! Core library surface for the Library Manager TUI application.
//!
//! The `bin` target wires these pieces together; keeping them in a library
//! lets the controller and persistence layer be exercised without a terminal.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Config;
pub use controller::{LibraryController, Notice, NoticeKind, Notify, ViewState};
pub use db::{ConnectionFactory, SqliteConnector};
pub use error::StoreError;
pub use models::{Book, BookStatus};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
