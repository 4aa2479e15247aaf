//! Domain models that mirror the SQLite schema and get passed between the
//! persistence layer, the controller, and the TUI. They stay plain data holders
//! so the other layers can focus on presentation and persistence logic.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A catalog entry in the `books` table.
pub struct Book {
    /// Primary key assigned by the store on insert. Never changes afterwards.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Whether the book is currently lent out.
    pub is_borrowed: bool,
}

impl Book {
    /// Status derived from the borrow flag, used by the table and by the
    /// borrow/return guards.
    pub fn status(&self) -> BookStatus {
        if self.is_borrowed {
            BookStatus::Borrowed
        } else {
            BookStatus::Available
        }
    }
}

/// What the status column shows for a book.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
